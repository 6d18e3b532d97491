/// Escapes markup characters and drops characters XML 1.0 does not allow in
/// a document (C0 controls other than tab, newline and carriage return, plus
/// U+FFFE and U+FFFF).
pub fn escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for character in input.chars() {
        match character {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&apos;"),
            other if !is_xml_char(other) => {}
            other => output.push(other),
        }
    }
    output
}

fn is_xml_char(character: char) -> bool {
    matches!(character, '\t' | '\n' | '\r')
        || (character >= '\u{20}' && !matches!(character, '\u{FFFE}' | '\u{FFFF}'))
}
