use crate::error::{FeedError, Result};
use crate::types::{FeedItem, FeedMetadata};
use crate::xml::escape;

const RFC822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemOrder {
    #[default]
    Input,
    NewestFirst,
}

pub fn order_items(items: &mut [FeedItem], order: ItemOrder) {
    match order {
        ItemOrder::Input => {}
        ItemOrder::NewestFirst => items.sort_by(|a, b| b.publish_date.cmp(&a.publish_date)),
    }
}

/// Renders an RSS 2.0 document. Items are written in the order given.
pub fn render_rss(metadata: &FeedMetadata, items: &[FeedItem]) -> Result<String> {
    for (index, item) in items.iter().enumerate() {
        if item.title.trim().is_empty() {
            return Err(FeedError::Serialization {
                message: format!("item {index} has no title"),
            });
        }
        if item.link.trim().is_empty() {
            return Err(FeedError::Serialization {
                message: format!("item {index} ('{}') has no link", item.title),
            });
        }
    }

    let mut rendered_items = String::new();
    for item in items {
        rendered_items.push_str(&format!(
            r#"    <item>
      <title>{}</title>
      <link>{}</link>
      <guid isPermaLink="{}">{}</guid>
      <description>{}</description>
      <pubDate>{}</pubDate>
    </item>
"#,
            escape(&item.title),
            escape(&item.link),
            item.guid_is_permalink(),
            escape(item.guid()),
            escape(&item.description),
            item.publish_date.format(RFC822_FORMAT),
        ));
    }

    let custom_xml = if metadata.custom_xml.is_empty() {
        String::new()
    } else {
        format!("    {}\n", metadata.custom_xml)
    };

    Ok(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>{}</title>
    <description>{}</description>
    <link>{}</link>
{}{}  </channel>
</rss>
"#,
        escape(&metadata.title),
        escape(&metadata.description),
        escape(&metadata.base_url),
        custom_xml,
        rendered_items
    ))
}
