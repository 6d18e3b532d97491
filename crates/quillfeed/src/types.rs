use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_CUSTOM_DATA: &str = "<language>en-us</language>";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub title: String,
    pub base_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub path_prefix: String,
    #[serde(default = "default_custom_data")]
    pub custom_data: String,
    #[serde(default)]
    pub newest_first: bool,
    #[serde(default)]
    pub recursive: bool,
}

pub fn default_content_dir() -> PathBuf {
    PathBuf::from("posts")
}

pub fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string()]
}

pub fn default_custom_data() -> String {
    DEFAULT_CUSTOM_DATA.to_string()
}

impl FeedConfig {
    pub fn metadata(&self) -> FeedMetadata {
        FeedMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            base_url: self.base_url.clone(),
            custom_xml: self.custom_data.clone(),
        }
    }
}

/// Channel-level data for one rendered feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMetadata {
    pub title: String,
    pub description: String,
    pub base_url: String,
    /// Written into `<channel>` as-is, without escaping.
    pub custom_xml: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub publish_date: DateTime<Utc>,
    pub description: String,
    pub link: String,
    #[serde(default)]
    pub guid: Option<String>,
}

impl FeedItem {
    pub fn guid(&self) -> &str {
        self.guid.as_deref().unwrap_or(&self.link)
    }

    pub fn guid_is_permalink(&self) -> bool {
        self.guid.is_none()
    }
}

/// A discovered post file and its parsed frontmatter.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub frontmatter: Frontmatter,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(flatten)]
    pub raw: HashMap<String, Value>,
}

impl Frontmatter {
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.raw.get(key).and_then(|v| v.as_str().map(String::from))
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.raw.get(key).and_then(|v| v.as_bool())
    }
}
