use crate::collector::PostCollector;
use crate::error::{FeedError, Result};
use crate::feeds::{ItemOrder, order_items, render_rss};
use crate::mapper::{MapOptions, map_documents};
use crate::types::{FeedConfig, FeedItem};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub const CONFIG_FILE: &str = "quillfeed.toml";

pub fn load_config(input_dir: &Path) -> Result<FeedConfig> {
    let config_path = input_dir.join(CONFIG_FILE);

    if !config_path.exists() {
        return Err(FeedError::ConfigNotFound { path: config_path });
    }

    let content = fs::read_to_string(&config_path)?;
    let mut config: FeedConfig =
        toml::from_str(&content).map_err(|error| FeedError::TomlParse {
            path: config_path.clone(),
            message: error.to_string(),
        })?;

    config.base_url = validate_base_url(&config.base_url)?;

    Ok(config)
}

/// Checks that `url` is an absolute http(s) URL with a host and returns it
/// without trailing slashes.
pub fn validate_base_url(url: &str) -> Result<String> {
    let invalid = |message: String| FeedError::InvalidBaseUrl {
        url: url.to_string(),
        message,
    };

    let parsed = Url::parse(url).map_err(|error| invalid(error.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "scheme '{}' not supported, must be http or https",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL must have a host".to_string()));
    }

    Ok(url.trim_end_matches('/').to_string())
}

/// Runs collection, mapping and serialization for one site.
///
/// The builder holds only read-only configuration, so one instance can be
/// shared across requests and [`FeedBuilder::build`] called repeatedly.
#[derive(Debug, Clone)]
pub struct FeedBuilder {
    input_dir: PathBuf,
    config: FeedConfig,
    include_drafts: bool,
}

impl FeedBuilder {
    pub fn new(input_dir: impl AsRef<Path>, config: FeedConfig) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            config,
            include_drafts: false,
        }
    }

    pub fn from_dir(input_dir: impl AsRef<Path>) -> Result<Self> {
        let config = load_config(input_dir.as_ref())?;
        Ok(Self::new(input_dir, config))
    }

    pub fn include_drafts(mut self, include: bool) -> Self {
        self.include_drafts = include;
        self
    }

    pub fn base_url(mut self, url: &str) -> Result<Self> {
        self.config.base_url = validate_base_url(url)?;
        Ok(self)
    }

    pub fn newest_first(mut self, newest_first: bool) -> Self {
        self.config.newest_first = newest_first;
        self
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn content_dir(&self) -> PathBuf {
        self.input_dir.join(&self.config.content_dir)
    }

    fn order(&self) -> ItemOrder {
        if self.config.newest_first {
            ItemOrder::NewestFirst
        } else {
            ItemOrder::Input
        }
    }

    pub fn collect_items(&self) -> Result<Vec<FeedItem>> {
        let collector = PostCollector::new(self.content_dir(), self.config.extensions.as_slice())?
            .recursive(self.config.recursive);
        let options =
            MapOptions::new(&self.config.base_url).path_prefix(&self.config.path_prefix);

        let mut documents = Vec::new();
        for document in &collector {
            let document = document?;

            if document.frontmatter.get_bool("draft").unwrap_or(false) && !self.include_drafts {
                tracing::debug!(path = %document.path.display(), "skipping draft");
                continue;
            }

            documents.push(document);
        }

        let mut items = map_documents(&documents, &options)?;

        let mut seen_links: HashMap<&str, &Path> = HashMap::new();
        for (document, item) in documents.iter().zip(&items) {
            if let Some(existing_path) = seen_links.insert(&item.link, &document.path) {
                return Err(FeedError::DuplicateLink {
                    link: item.link.clone(),
                    path: document.path.clone(),
                    existing_path: existing_path.to_path_buf(),
                });
            }
        }

        order_items(&mut items, self.order());

        Ok(items)
    }

    pub fn build(&self) -> Result<String> {
        let items = self.collect_items()?;
        let xml = render_rss(&self.config.metadata(), &items)?;

        tracing::info!(
            items = items.len(),
            content_dir = %self.content_dir().display(),
            "built feed"
        );

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_site() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
title = "Example"
base_url = "https://example.com/"
description = "An example blog"
"#,
        )
        .unwrap();

        fs::create_dir_all(dir.path().join("posts")).unwrap();

        fs::write(
            dir.path().join("posts/a.md"),
            r#"---
title: A
date: 2024-01-01
description: First letter
---

Post A"#,
        )
        .unwrap();

        fs::write(
            dir.path().join("posts/b.mdx"),
            r#"+++
title = "B"
date = 2024-02-01
+++

Post B"#,
        )
        .unwrap();

        dir
    }

    fn sorted_links(items: &[FeedItem]) -> Vec<&str> {
        let mut links: Vec<&str> = items.iter().map(|item| item.link.as_str()).collect();
        links.sort();
        links
    }

    #[test]
    fn test_build_feed() {
        let dir = create_test_site();
        let xml = FeedBuilder::from_dir(dir.path()).unwrap().build().unwrap();

        assert!(xml.contains("<channel>\n    <title>Example</title>"));
        assert!(xml.contains("<link>https://example.com/a</link>"));
        assert!(xml.contains("<link>https://example.com/b</link>"));
        assert!(xml.contains("<language>en-us</language>"));
        assert_eq!(xml.matches("<item>").count(), 2);
    }

    #[test]
    fn test_config_trims_base_url() {
        let dir = create_test_site();
        let builder = FeedBuilder::from_dir(dir.path()).unwrap();
        assert_eq!(builder.config().base_url, "https://example.com");
    }

    #[test]
    fn test_base_url_override() {
        let dir = create_test_site();
        let builder = FeedBuilder::from_dir(dir.path())
            .unwrap()
            .base_url("http://localhost:3000/")
            .unwrap();
        let items = builder.collect_items().unwrap();

        assert_eq!(
            sorted_links(&items),
            vec!["http://localhost:3000/a", "http://localhost:3000/b"]
        );
    }

    #[test]
    fn test_newest_first() {
        let dir = create_test_site();
        let builder = FeedBuilder::from_dir(dir.path()).unwrap().newest_first(true);
        let items = builder.collect_items().unwrap();

        let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn test_empty_content_dir_builds_empty_feed() {
        let dir = create_test_site();
        fs::remove_file(dir.path().join("posts/a.md")).unwrap();
        fs::remove_file(dir.path().join("posts/b.mdx")).unwrap();

        let xml = FeedBuilder::from_dir(dir.path()).unwrap().build().unwrap();
        assert!(xml.contains("<rss version=\"2.0\">"));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn test_missing_date_fails_build() {
        let dir = create_test_site();
        fs::write(
            dir.path().join("posts/undated.md"),
            "---\ntitle: Undated\n---\n\nNo date here",
        )
        .unwrap();

        let result = FeedBuilder::from_dir(dir.path()).unwrap().build();
        assert!(matches!(
            result,
            Err(FeedError::MissingField { ref field, .. }) if field == "date"
        ));
    }

    #[test]
    fn test_draft_posts_excluded_by_default() {
        let dir = create_test_site();
        fs::write(
            dir.path().join("posts/draft.md"),
            "---\ntitle: Draft\ndate: 2024-03-01\ndraft: true\n---\n\nNot yet",
        )
        .unwrap();

        let builder = FeedBuilder::from_dir(dir.path()).unwrap();
        let items = builder.collect_items().unwrap();
        assert!(items.iter().all(|item| item.title != "Draft"));

        let items = builder.include_drafts(true).collect_items().unwrap();
        assert!(items.iter().any(|item| item.title == "Draft"));
    }

    #[test]
    fn test_duplicate_links_error() {
        let dir = create_test_site();
        fs::write(
            dir.path().join("posts/other.md"),
            "---\ntitle: Other\ndate: 2024-03-01\nslug: a\n---\n",
        )
        .unwrap();

        let result = FeedBuilder::from_dir(dir.path()).unwrap().collect_items();
        assert!(matches!(result, Err(FeedError::DuplicateLink { .. })));
    }

    #[test]
    fn test_path_prefix_and_extensions_from_config() {
        let dir = create_test_site();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
title = "Example"
base_url = "https://example.com"
extensions = ["md"]
path_prefix = "posts"
"#,
        )
        .unwrap();

        let items = FeedBuilder::from_dir(dir.path())
            .unwrap()
            .collect_items()
            .unwrap();
        assert_eq!(sorted_links(&items), vec!["https://example.com/posts/a"]);
    }

    #[test]
    fn test_relative_base_url_rejected() {
        let dir = create_test_site();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "title = \"Example\"\nbase_url = \"example.com\"\n",
        )
        .unwrap();

        let result = FeedBuilder::from_dir(dir.path());
        assert!(matches!(result, Err(FeedError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_base_url_override_validated() {
        let dir = create_test_site();
        let builder = FeedBuilder::from_dir(dir.path()).unwrap();

        assert!(matches!(
            builder.clone().base_url("ftp://example.com"),
            Err(FeedError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            builder.base_url("/relative/path"),
            Err(FeedError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_validate_base_url() {
        assert_eq!(
            validate_base_url("https://example.com/blog/").unwrap(),
            "https://example.com/blog"
        );
        assert_eq!(
            validate_base_url("http://localhost:3000").unwrap(),
            "http://localhost:3000"
        );
        assert!(validate_base_url("example.com").is_err());
        assert!(validate_base_url("mailto:me@example.com").is_err());
    }

    #[test]
    fn test_file_names_are_percent_encoded_in_links() {
        let dir = create_test_site();
        fs::write(
            dir.path().join("posts/my post.md"),
            "---\ntitle: Spaced\ndate: 2024-03-01\n---\n",
        )
        .unwrap();

        let items = FeedBuilder::from_dir(dir.path())
            .unwrap()
            .collect_items()
            .unwrap();
        assert!(
            items
                .iter()
                .any(|item| item.link == "https://example.com/my%20post")
        );
        assert!(items.iter().all(|item| !item.link.contains(' ')));
    }

    #[test]
    fn test_config_not_found() {
        let dir = TempDir::new().unwrap();
        let result = FeedBuilder::from_dir(dir.path());
        assert!(matches!(result, Err(FeedError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_invalid_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "description = \"no title\"").unwrap();
        let result = FeedBuilder::from_dir(dir.path());
        assert!(matches!(result, Err(FeedError::TomlParse { .. })));
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = create_test_site();
        fs::remove_dir_all(dir.path().join("posts")).unwrap();

        let result = FeedBuilder::from_dir(dir.path()).unwrap().build();
        assert!(matches!(result, Err(FeedError::Collection { .. })));
    }
}
