mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod request;
mod theme;
mod widgets;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;

use blog_proto::{BlogClient, Config, PostId};

use crate::action::Screen;

/// Terminal client for a json-server style `/blogs` collection.
#[derive(Debug, Parser)]
#[command(name = "blogdeck", version, about)]
struct Args {
    /// API base URL; overrides `api.base_url` from the config file.
    #[arg(long, env = "BLOGDECK_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Open this post's detail screen instead of the list.
    #[arg(long, value_name = "ID")]
    post: Option<String>,
}

impl Args {
    fn initial_screen(&self) -> Screen {
        match &self.post {
            Some(id) => Screen::Detail(PostId::new(id.trim())),
            None => Screen::List,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = blog_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;
    let log_path = blog_proto::platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("blogdeck log: {}", log_path.display());
    tracing::info!("blogdeck starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }
    config.validate()?;
    tracing::info!(url = %config.collection_url(), "using API");

    let client = BlogClient::new(&config)?;

    // ── Request channel (App → worker) ───────────────────────────────────────
    let (req_tx, req_rx) = mpsc::channel(64);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(&config, req_tx);
    app.run(client, req_rx, args.initial_screen()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_flag_opens_detail() {
        let args = Args::try_parse_from(["blogdeck", "--post", "42"]).unwrap();
        assert_eq!(args.initial_screen(), Screen::Detail(PostId::from(42)));
    }

    #[test]
    fn test_defaults_to_list() {
        let args = Args::try_parse_from(["blogdeck", "--config", "/tmp/x.toml"]).unwrap();
        assert_eq!(args.initial_screen(), Screen::List);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/x.toml")));
    }
}
