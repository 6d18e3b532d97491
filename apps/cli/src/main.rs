mod commands;
mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quillfeed")]
#[command(about = "Build and serve an RSS feed for a markdown blog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter quillfeed.toml and sample post
    Init {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Write the feed to a file
    Build {
        #[arg(long, short, default_value = ".")]
        input: PathBuf,

        #[arg(long, short, default_value = "dist/feed.xml")]
        output: PathBuf,

        #[arg(long)]
        drafts: bool,

        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        newest_first: bool,
    },
    /// Serve the feed, rebuilt on every request
    Serve {
        #[arg(long, short, default_value = ".")]
        input: PathBuf,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value = "3000")]
        port: u16,

        #[arg(long)]
        drafts: bool,

        #[arg(long)]
        newest_first: bool,
    },
}

/// `RUST_LOG`-style directives when they parse, otherwise `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { dir } => commands::init_site(&dir),
        Commands::Build {
            input,
            output,
            drafts,
            base_url,
            newest_first,
        } => commands::build_feed(&input, &output, drafts, base_url.as_deref(), newest_first),
        Commands::Serve {
            input,
            host,
            port,
            drafts,
            newest_first,
        } => commands::serve_feed(&input, &host, port, drafts, newest_first).await,
    };

    if let Err(error) = result {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
