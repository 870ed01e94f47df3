//! Application execution logic.
//!
//! This module contains the watch loop that registers for change
//! notifications and prints them until shutdown, plus the interface listing.

use std::future::Future;
use std::io::Write;

use thiserror::Error;
use tokio::signal;
use tokio_stream::StreamExt;

use netwatch::config::{ListFilter, ValidatedConfig};
use netwatch::monitor::platform::PlatformNotifyHost;
use netwatch::monitor::{Notification, NotifyHost, Subscription, SubscriptionError};
use netwatch::network::{DirectoryError, InterfaceDirectory, InterfaceTable};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Registering for change notifications failed.
    #[error("{0}")]
    Register(#[source] SubscriptionError),

    /// Cancelling change notifications failed during shutdown.
    #[error("{0}")]
    Unregister(#[source] SubscriptionError),

    /// Unexpected stream termination.
    #[error("Notification stream terminated unexpectedly")]
    StreamTerminated,

    /// Failed to read the interface table.
    #[error("Failed to list interfaces: {0}")]
    Directory(#[from] DirectoryError),

    /// Failed to encode output as JSON.
    #[error("Failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write output.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Runs the watch command against the platform host until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// See [`watch`].
///
/// Excluded from coverage - requires platform APIs and signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute_watch(config: &ValidatedConfig) -> Result<(), RunError> {
    let mut stdout = std::io::stdout().lock();
    watch(
        PlatformNotifyHost::new(),
        config,
        &mut stdout,
        shutdown_signal(),
    )
    .await
}

/// Runs the list command against the platform interface table.
///
/// # Errors
///
/// See [`list`].
pub fn execute_list(config: &ValidatedConfig) -> Result<(), RunError> {
    let directory = InterfaceDirectory::platform();
    let mut stdout = std::io::stdout().lock();
    let shown = list(&directory, &config.list, config.json, &mut stdout)?;
    tracing::debug!("Listed {shown} interface(s)");
    Ok(())
}

/// Registers with `host`, prints each notification to `out`, and unregisters
/// once `shutdown` completes.
///
/// A failed registration is cleaned up before the error is returned, since a
/// handle that did register stays active until cancelled.
///
/// # Errors
///
/// Returns an error if:
/// - Either subscribe call fails
/// - The stream ends while registered
/// - Output cannot be encoded or written
/// - Cancelling either registration fails
pub async fn watch<H, W, F>(
    host: H,
    config: &ValidatedConfig,
    out: &mut W,
    shutdown: F,
) -> Result<(), RunError>
where
    H: NotifyHost,
    W: Write,
    F: Future<Output = ()>,
{
    let mut subscription = Subscription::new(host).with_family(config.family);
    let mut stream = subscription
        .take_stream()
        .ok_or(RunError::StreamTerminated)?;

    if let Err(e) = subscription.register(config.initial_notification) {
        if let Err(cleanup) = subscription.unregister() {
            tracing::warn!("Cleanup after failed registration also failed: {cleanup}");
        }
        return Err(RunError::Register(e));
    }

    tracing::info!(
        "Watching {} interface and address changes",
        subscription.family()
    );

    tokio::pin!(shutdown);

    let outcome = loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                break Ok(());
            }

            next = stream.next() => {
                match next {
                    Some(notification) => {
                        if let Err(e) = write_notification(out, &notification, config.json) {
                            break Err(e);
                        }
                    }
                    None => break Err(RunError::StreamTerminated),
                }
            }
        }
    };

    if let Err(e) = subscription.unregister() {
        // The error that ended the loop is the one worth reporting
        if outcome.is_err() {
            tracing::warn!("Cleanup after watch failure also failed: {e}");
            return outcome;
        }
        return Err(RunError::Unregister(e));
    }

    // Records queued before cancellation completed are still worth printing
    if outcome.is_ok() {
        while let Some(notification) = stream.try_next() {
            write_notification(out, &notification, config.json)?;
        }
    }

    outcome
}

/// Prints the interfaces selected by `filter`, returning how many were shown.
///
/// # Errors
///
/// Returns an error if the interface table cannot be read or output fails.
pub fn list<T, W>(
    directory: &InterfaceDirectory<T>,
    filter: &ListFilter,
    json: bool,
    out: &mut W,
) -> Result<usize, RunError>
where
    T: InterfaceTable,
    W: Write,
{
    let interfaces = if filter.all {
        directory.list_all()?
    } else {
        directory.list_filtered(filter.include, filter.exclude)?
    };

    let unresolved = interfaces.iter().filter(|i| i.is_unresolved()).count();
    if unresolved > 0 {
        tracing::debug!("{unresolved} interface(s) shown without an IPv4 address");
    }

    if json {
        writeln!(out, "{}", serde_json::to_string(&interfaces)?)?;
    } else {
        for interface in &interfaces {
            writeln!(out, "{interface}")?;
        }
    }

    Ok(interfaces.len())
}

/// Writes one notification as a text line or a JSON line.
fn write_notification<W: Write>(
    out: &mut W,
    notification: &Notification,
    json: bool,
) -> Result<(), RunError> {
    if json {
        writeln!(out, "{}", serde_json::to_string(notification)?)?;
    } else {
        writeln!(out, "{notification}")?;
    }
    out.flush()?;
    Ok(())
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed, that signal source is ignored and the
/// other one still applies.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
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
