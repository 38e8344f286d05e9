#![forbid(unsafe_code)]

mod entry;
mod server;
mod support;
mod tools;

pub(crate) use support::*;

use mq_client::{FileFlagStore, Session, SessionConfig, SqliteGateway, SyncConfig};
use mq_storage::SqliteStore;
use std::sync::Arc;

const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "mission-quest-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) struct McpServer {
    initialized: bool,
    runtime: tokio::runtime::Runtime,
    session: Session,
}

fn usage() -> &'static str {
    "mq_mcp - Mission Quest board server (stdio JSON-RPC)\n\n\
USAGE:\n\
  mq_mcp [--storage-dir DIR] [--pin PIN] [--milestone-policy ratchet|symmetric]\n\
         [--reconcile keep|rollback]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version and exit\n\
\n\
ENVIRONMENT:\n\
  MQ_STORAGE_DIR, MQ_PARENT_PIN, MQ_MILESTONE_POLICY, MQ_RECONCILE\n\
  MQ_LOG           tracing filter for stderr logs (default: warn)\n"
}

fn version_line() -> String {
    format!("mq_mcp {SERVER_VERSION}")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{}", version_line());
        return Ok(());
    }

    init_logging();

    let config = match RuntimeConfig::from_sources(&args, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("mq_mcp: {err}");
            std::process::exit(2);
        }
    };
    tracing::info!(
        storage_dir = %config.storage_dir.display(),
        milestone_policy = config.milestone_policy.as_str(),
        reconcile = config.reconcile_policy.as_str(),
        "starting mq_mcp"
    );

    let store = SqliteStore::open(&config.storage_dir)?;
    let gateway = Arc::new(SqliteGateway::new(store));
    let flags = Box::new(FileFlagStore::in_dir(&config.storage_dir));
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;

    let session_config = SessionConfig {
        sync: SyncConfig {
            milestone_policy: config.milestone_policy,
            reconcile_policy: config.reconcile_policy,
        },
        pin: config.pin,
    };
    let (session, report) = runtime.block_on(Session::open(gateway, flags, session_config));
    if report.is_degraded() {
        tracing::warn!(failed = ?report.failed, "initial load degraded");
    }

    let mut server = McpServer::new(runtime, session);
    let result = entry::run_stdio(&mut server);
    if let Err(err) = &result {
        tracing::error!(error = %err, "stdio loop stopped");
    }
    result
}

/// Logs go to stderr; stdout carries the protocol.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("MQ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
