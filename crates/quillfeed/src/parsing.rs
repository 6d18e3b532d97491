use crate::error::{FeedError, Result};
use crate::types::Frontmatter;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn extract_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let content = content.replace("\r\n", "\n");
    let content = content.trim_start_matches('\u{feff}').trim_start();

    if content.starts_with("+++") {
        parse_toml_frontmatter(content, path)
    } else if content.starts_with("---") {
        parse_yaml_frontmatter(content, path)
    } else {
        Ok((Frontmatter::default(), content.to_string()))
    }
}

fn parse_toml_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let rest = &content[3..];

    let end_index =
        find_closing_delimiter(rest, "+++").ok_or_else(|| FeedError::InvalidFrontmatter {
            path: path.to_path_buf(),
        })?;

    let frontmatter_str = &rest[..end_index];
    let body = &rest[end_index + 3..];

    let table: toml::Table =
        toml::from_str(frontmatter_str).map_err(|error| FeedError::TomlParse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;

    let raw = table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json(value)))
        .collect();

    Ok((Frontmatter { raw }, body.trim().to_string()))
}

fn parse_yaml_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let rest = &content[3..];

    let end_index =
        find_closing_delimiter(rest, "---").ok_or_else(|| FeedError::InvalidFrontmatter {
            path: path.to_path_buf(),
        })?;

    let frontmatter_str = &rest[..end_index];
    let body = &rest[end_index + 3..];

    if frontmatter_str.trim().is_empty() {
        return Ok((Frontmatter::default(), body.trim().to_string()));
    }

    let raw: HashMap<String, Value> =
        serde_yml::from_str(frontmatter_str).map_err(|error| FeedError::YamlParse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;

    Ok((Frontmatter { raw }, body.trim().to_string()))
}

fn find_closing_delimiter(content: &str, delimiter: &str) -> Option<usize> {
    let mut position = 0;

    for line in content.lines() {
        if line.trim() == delimiter {
            return Some(position);
        }
        position += line.len() + 1;
    }

    None
}

// TOML datetimes would otherwise deserialize as an opaque wrapper map.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(string) => Value::String(string),
        toml::Value::Integer(integer) => Value::from(integer),
        toml::Value::Float(float) => Value::from(float),
        toml::Value::Boolean(boolean) => Value::Bool(boolean),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(array) => Value::Array(array.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

/// Parses a frontmatter date. Values without an offset are taken as UTC,
/// bare dates as midnight UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(datetime.with_timezone(&Utc));
    }

    if let Ok(datetime) = DateTime::parse_from_rfc2822(input) {
        return Some(datetime.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}
