//! # smsrelayd — SMS relay daemon
//!
//! Composition root that wires all adapters together and runs the watcher.
//!
//! ## Responsibilities
//! - Initialise logging (`RUST_LOG` overrides the default filter)
//! - Load the rule set from `config.toml` beside the executable
//! - Connect to the system bus and subscribe to new-message notifications
//! - Construct the dispatcher and watcher, injecting adapters via port traits
//! - Run until a fatal error or SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.
//!
//! Every error reaching `main` is fatal: it is logged and the process exits
//! with a failure status, leaving restarts to the service supervisor.

mod config;

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use smsrelay_adapter_modem_manager::{ModemError, ModemManagerSource};
use smsrelay_adapter_shell::ShellRunner;
use smsrelay_app::dispatcher::Dispatcher;
use smsrelay_app::watcher::Watcher;
use smsrelay_domain::error::SmsRelayError;

use crate::config::{Config, ConfigError};

const DEFAULT_LOG_FILTER: &str = "smsrelayd=info,smsrelay_app=info,\
smsrelay_adapter_modem_manager=info,smsrelay_adapter_shell=info";

/// Anything that stops the daemon.
#[derive(Debug, thiserror::Error)]
enum DaemonError {
    #[error("error reading config")]
    Config(#[from] ConfigError),
    #[error("modem manager error")]
    Modem(#[from] ModemError),
    #[error("message relay stopped")]
    Relay(#[from] SmsRelayError),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %error_chain(&err), "fatal error, exiting");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DaemonError> {
    let rules = Arc::new(Config::load()?.into_rule_set()?);
    tracing::info!(rules = rules.len(), "config loaded");

    tracing::info!("connecting to system D-Bus");
    let source = ModemManagerSource::connect().await?;

    tracing::info!("registering for incoming message notifications");
    let notifications = source.subscribe_added().await?;

    let watcher = Watcher::new(source, Dispatcher::new(rules, ShellRunner::new()));

    tokio::select! {
        result = watcher.run(notifications) => result?,
        () = shutdown_signal() => tracing::info!("shutdown signal received, exiting"),
    }

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolve once SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Render an error and all of its sources on one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
