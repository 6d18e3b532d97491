use crate::error::{FeedError, Result};
use crate::parsing::parse_date;
use crate::types::{DocumentHandle, FeedItem};
use serde_json::Value;
use std::path::Path;
use url::Url;

const DATE_KEYS: [&str; 2] = ["date", "pubDate"];

#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    pub base_url: String,
    pub path_prefix: String,
}

impl MapOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path_prefix: String::new(),
        }
    }

    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }
}

pub fn map_document(document: &DocumentHandle, options: &MapOptions) -> Result<FeedItem> {
    let frontmatter = &document.frontmatter;

    let title = frontmatter
        .get_string("title")
        .ok_or_else(|| FeedError::MissingField {
            field: "title".to_string(),
            path: document.path.clone(),
        })?;

    let date_value = DATE_KEYS
        .iter()
        .find_map(|key| frontmatter.raw.get(*key))
        .ok_or_else(|| FeedError::MissingField {
            field: "date".to_string(),
            path: document.path.clone(),
        })?;

    let publish_date = match date_value {
        Value::String(date) => parse_date(date),
        _ => None,
    }
    .ok_or_else(|| FeedError::InvalidDate {
        value: display_value(date_value),
        path: document.path.clone(),
    })?;

    let description = frontmatter.get_string("description").unwrap_or_default();

    let slug = frontmatter
        .get_string("slug")
        .unwrap_or_else(|| slug_from_path(&document.path));

    let link = join_url(&options.base_url, &[&options.path_prefix, &slug])?;
    let guid = frontmatter.get_string("guid");

    Ok(FeedItem {
        title,
        publish_date,
        description,
        link,
        guid,
    })
}

pub fn map_documents<'a>(
    documents: impl IntoIterator<Item = &'a DocumentHandle>,
    options: &MapOptions,
) -> Result<Vec<FeedItem>> {
    documents
        .into_iter()
        .map(|document| map_document(document, options))
        .collect()
}

/// File name without its directory or extension.
pub fn slug_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Appends path segments to `base_url`, percent-encoding each one. Empty
/// segments and stray slashes are dropped.
pub fn join_url(base_url: &str, segments: &[&str]) -> Result<String> {
    let trimmed = base_url.trim_end_matches('/');
    let mut url = Url::parse(trimmed).map_err(|error| FeedError::InvalidBaseUrl {
        url: base_url.to_string(),
        message: error.to_string(),
    })?;

    url.path_segments_mut()
        .map_err(|_| FeedError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: "URL cannot have a path".to_string(),
        })?
        .pop_if_empty()
        .extend(
            segments
                .iter()
                .flat_map(|segment| segment.split('/'))
                .filter(|part| !part.is_empty()),
        );

    Ok(url.into())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(string) => string.clone(),
        other => other.to_string(),
    }
}
