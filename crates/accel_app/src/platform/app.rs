use std::path::Path;
use std::sync::Arc;

use accel_core::{PageResult, Record, Topic};
use accel_engine::{
    LiveBook, PipelineConfig, PipelineDriver, PushTransport, RecordStream, ReqwestHistoryClient,
    Sources, StaticStream, SubscriptionRegistry, TransportError, WsPushTransport,
};
use accel_logging::{accel_info, accel_warn};
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::cli::CliArgs;
use super::config::{load_config, AppConfig};
use super::{logging, render};

pub async fn run_app() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(args.log.unwrap_or_default(), level);

    let mut config = args
        .config
        .as_deref()
        .map(load_config)
        .unwrap_or_default();
    config.apply_cli(&args);
    accel_info!("Starting with {:?}", config.mode);

    let external = match &args.records_file {
        Some(path) => Some(load_records_file(path)?),
        None => None,
    };
    let book = Arc::new(LiveBook::new());
    let transport = connect_push_channel(&config, book.clone()).await;
    let history = ReqwestHistoryClient::new(config.history_settings())
        .context("building history client")?;

    let sources = Sources {
        history: Arc::new(history),
        live: book,
        registry: Arc::new(SubscriptionRegistry::new(transport)),
        external,
    };
    let handle = PipelineDriver::spawn(
        PipelineConfig {
            mode: config.mode,
            initial_page: args.page,
        },
        sources,
    );

    println!("commands: <page number>, n(ext), p(rev), q(uit)");
    let mut views = handle.view();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                print!("{}", render::render(&view, config.page_size));
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        accel_warn!("Failed to read stdin: {}", err);
                        break;
                    }
                };
                let current = views.borrow().page;
                match parse_command(&line, current) {
                    Some(Command::Page(page)) => handle.set_page(page),
                    Some(Command::Quit) => break,
                    None => println!("unknown command: {}", line.trim()),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await;
    accel_info!("Stopped");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Page(u32),
    Quit,
}

fn parse_command(line: &str, current: u32) -> Option<Command> {
    match line.trim() {
        "n" | "next" => Some(Command::Page(current.saturating_add(1))),
        "p" | "prev" => Some(Command::Page(current.saturating_sub(1).max(1))),
        "q" | "quit" => Some(Command::Quit),
        other => other.parse().ok().map(Command::Page),
    }
}

/// Reads a JSON file in either response shape and replays it as an external stream.
fn load_records_file(path: &Path) -> anyhow::Result<Arc<dyn RecordStream>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let result: PageResult =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    let records: Vec<Record> = result.into_page().records;
    accel_info!("Serving {} records from {:?}", records.len(), path);
    Ok(Arc::new(StaticStream::single(records)))
}

async fn connect_push_channel(config: &AppConfig, book: Arc<LiveBook>) -> Arc<dyn PushTransport> {
    match WsPushTransport::connect(&config.ws_url, book.clone()).await {
        Ok((transport, _reader)) => Arc::new(transport),
        Err(err) => {
            accel_warn!("Push channel unavailable at {}: {}", config.ws_url, err);
            book.close();
            Arc::new(Disconnected)
        }
    }
}

/// Stand-in used when the push channel could not be opened.
struct Disconnected;

impl PushTransport for Disconnected {
    fn subscribe(&self, topic: Topic) -> Result<(), TransportError> {
        accel_warn!("Cannot subscribe to {} while disconnected", topic);
        Err(TransportError::Closed)
    }

    fn unsubscribe(&self, _topic: Topic) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_move_the_page_cursor() {
        assert_eq!(parse_command("n", 3), Some(Command::Page(4)));
        assert_eq!(parse_command(" prev ", 3), Some(Command::Page(2)));
        assert_eq!(parse_command("p", 1), Some(Command::Page(1)));
        assert_eq!(parse_command("12", 3), Some(Command::Page(12)));
        assert_eq!(parse_command("q", 3), Some(Command::Quit));
        assert_eq!(parse_command("hello", 3), None);
    }

    #[test]
    fn records_file_accepts_both_shapes() {
        let temp = tempfile::TempDir::new().unwrap();
        let bare = temp.path().join("bare.json");
        std::fs::write(&bare, r#"[{"height": 1}]"#).unwrap();
        let envelope = temp.path().join("envelope.json");
        std::fs::write(&envelope, r#"{"body": [{"height": 1}, {"height": 2}]}"#).unwrap();

        assert!(load_records_file(&bare).is_ok());
        assert!(load_records_file(&envelope).is_ok());
        assert!(load_records_file(&temp.path().join("missing.json")).is_err());
    }
}
