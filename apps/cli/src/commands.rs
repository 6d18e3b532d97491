use crate::server::{AppState, FEED_ROUTE, create_router};
use quillfeed::{CONFIG_FILE, FeedBuilder};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn escape_toml_string(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for character in input.chars() {
        match character {
            '\\' => output.push_str("\\\\"),
            '"' => output.push_str("\\\""),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            control if control < '\u{0020}' => {
                output.push_str(&format!("\\u{:04X}", control as u32));
            }
            other => output.push(other),
        }
    }
    output
}

fn default_config(title: &str) -> String {
    let escaped_title = escape_toml_string(title);
    format!(
        r#"title = "{escaped_title}"
base_url = "http://localhost:3000"
description = "My personal blog"
content_dir = "posts"
extensions = ["md", "mdx"]
custom_data = "<language>en-us</language>"
"#
    )
}

const SAMPLE_POST: &str = r#"---
title: Hello World
date: 2024-01-01
description: The first post on this blog.
---

This is your first blog post. Start writing!
"#;

pub fn init_site(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() {
        return Err(format!("{CONFIG_FILE} already exists in {}", dir.display()).into());
    }

    let title = dir
        .canonicalize()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().to_string()))
        .unwrap_or_else(|| "My Blog".to_string());

    let posts_dir = dir.join("posts");
    fs::create_dir_all(&posts_dir)?;
    fs::write(&config_path, default_config(&title))?;

    let sample_path = posts_dir.join("hello-world.md");
    if !sample_path.exists() {
        fs::write(&sample_path, SAMPLE_POST)?;
    }

    println!("Initialized feed in {}", dir.display());

    Ok(())
}

fn feed_builder(
    input: &Path,
    drafts: bool,
    base_url: Option<&str>,
    newest_first: bool,
) -> Result<FeedBuilder, Box<dyn std::error::Error>> {
    let mut builder = FeedBuilder::from_dir(input)?.include_drafts(drafts);

    if let Some(url) = base_url {
        builder = builder.base_url(url)?;
    }

    if newest_first {
        builder = builder.newest_first(true);
    }

    Ok(builder)
}

pub fn build_feed(
    input: &Path,
    output: &Path,
    drafts: bool,
    base_url: Option<&str>,
    newest_first: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let builder = feed_builder(input, drafts, base_url, newest_first)?;
    let xml = builder.build()?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, xml)?;

    println!("Wrote {} in {:.2?}", output.display(), start.elapsed());

    Ok(())
}

pub async fn serve_feed(
    input: &Path,
    host: &str,
    port: u16,
    drafts: bool,
    newest_first: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let builder = feed_builder(input, drafts, None, newest_first)?;

    // Fail at startup rather than on the first request.
    builder.collect_items()?;

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let title = builder.config().title.clone();
    let app = create_router(AppState {
        builder: Arc::new(builder),
    });

    tracing::info!(%title, "Serving feed at http://{addr}{FEED_ROUTE}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
