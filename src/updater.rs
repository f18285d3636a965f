//! Dashboard Updater
//!
//! The polling daemon: one refresh immediately on start, then a fixed
//! repeating interval, indefinitely. Uses `tokio::time::interval` for
//! the tick loop and `Arc<AtomicBool>` for shutdown signaling, so tests
//! can stop the loop deterministically instead of relying on process
//! exit. A failed cycle never halts the timer.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::client::StatusSource;
use crate::error::UpdateError;
use crate::render;
use crate::view::{Document, MissingSlot, ViewBindings};

/// Fixed text shown in the last-update slot when a cycle fails. All
/// other slots keep whatever the last successful cycle rendered.
pub const ERROR_TEXT: &str = "Error loading data";

/// Options for creating a dashboard updater.
pub struct DashboardUpdaterOptions {
    /// Refresh interval in seconds. Defaults to 30.
    pub refresh_interval_secs: u64,
    /// Where to write the rendered page each cycle, if anywhere.
    pub output_path: Option<PathBuf>,
}

impl Default for DashboardUpdaterOptions {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
            output_path: None,
        }
    }
}

/// Everything one refresh cycle touches: the snapshot source, the page,
/// and the slot handles resolved at startup.
struct UpdaterInner {
    source: Box<dyn StatusSource>,
    document: Document,
    bindings: ViewBindings,
    output_path: Option<PathBuf>,
}

impl UpdaterInner {
    async fn refresh(&mut self) -> Result<(), UpdateError> {
        let snapshot = self.source.fetch_status().await?;
        render::apply(&mut self.document, &self.bindings, &snapshot)?;
        self.write_output()?;
        Ok(())
    }

    fn write_output(&self) -> Result<(), UpdateError> {
        if let Some(path) = &self.output_path {
            fs::write(path, self.document.to_html())?;
        }
        Ok(())
    }
}

/// The dashboard updater daemon. Runs a background tokio task that
/// fetches and renders the status document on every tick.
pub struct DashboardUpdater {
    /// Atomic flag indicating whether the daemon is running.
    running: Arc<AtomicBool>,
    /// Handle to the spawned background task.
    interval_handle: Option<JoinHandle<()>>,
    /// Refresh interval in seconds.
    refresh_interval_secs: u64,
    inner: Arc<Mutex<UpdaterInner>>,
}

/// Create a new dashboard updater over the given source and page.
///
/// Resolves the view bindings up front; a page missing a required slot
/// fails here, before any polling starts.
pub fn create_dashboard_updater(
    source: Box<dyn StatusSource>,
    document: Document,
    options: DashboardUpdaterOptions,
) -> Result<DashboardUpdater, MissingSlot> {
    let bindings = ViewBindings::resolve(&document)?;

    Ok(DashboardUpdater {
        running: Arc::new(AtomicBool::new(false)),
        interval_handle: None,
        refresh_interval_secs: options.refresh_interval_secs,
        inner: Arc::new(Mutex::new(UpdaterInner {
            source,
            document,
            bindings,
            output_path: options.output_path,
        })),
    })
}

impl DashboardUpdater {
    /// Start the polling loop.
    ///
    /// The first tick completes immediately, so the initial refresh
    /// happens on start rather than one interval later. Cycles run
    /// sequentially on the daemon task; a tick fires only after the
    /// previous cycle's awaits complete.
    pub fn start(&mut self) {
        if self.running.load(Ordering::SeqCst) {
            warn!("Dashboard updater is already running");
            return;
        }

        self.running.store(true, Ordering::SeqCst);
        info!(
            "Starting dashboard updater with {}s refresh interval",
            self.refresh_interval_secs
        );

        let running = Arc::clone(&self.running);
        let inner = Arc::clone(&self.inner);
        let interval_secs = self.refresh_interval_secs;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

            loop {
                interval.tick().await;

                if !running.load(Ordering::SeqCst) {
                    info!("Dashboard updater stopping");
                    break;
                }

                let mut guard = inner.lock().await;
                // A failed cycle is already logged and rendered; the
                // loop just moves on to the next tick.
                let _ = cycle(&mut guard).await;
            }
        });

        self.interval_handle = Some(handle);
    }

    /// Stop the polling loop.
    pub fn stop(&mut self) {
        if !self.running.load(Ordering::SeqCst) {
            debug!("Dashboard updater is not running");
            return;
        }

        info!("Stopping dashboard updater");
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.interval_handle.take() {
            handle.abort();
        }
    }

    /// Returns whether the daemon is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run a single refresh cycle outside the timer, with the same
    /// error handling the loop applies, and report the outcome.
    pub async fn refresh_now(&self) -> Result<(), UpdateError> {
        let mut guard = self.inner.lock().await;
        cycle(&mut guard).await
    }

    /// Current content of one page slot, as stored.
    pub async fn slot_content(&self, id: &str) -> Option<String> {
        let guard = self.inner.lock().await;
        guard.document.content(id).map(|s| s.to_string())
    }

    /// The rendered page as it stands now.
    pub async fn page_html(&self) -> String {
        let guard = self.inner.lock().await;
        guard.document.to_html()
    }
}

/// One guarded refresh cycle: on any error, log it, put the fixed error
/// text in the last-update slot, and leave every other slot untouched
/// so stale data stays visible.
async fn cycle(inner: &mut UpdaterInner) -> Result<(), UpdateError> {
    match inner.refresh().await {
        Ok(()) => {
            debug!("Dashboard refreshed");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Dashboard refresh failed");
            inner
                .document
                .set_text(&inner.bindings.last_update, ERROR_TEXT);
            if let Err(write_err) = inner.write_output() {
                warn!(error = %write_err, "Failed to write page after refresh error");
            }
            Err(e)
        }
    }
}
