//! Route table watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by writing a temporary file and renaming it over the table are
//! still seen. Events for other files in that directory are ignored, and a
//! burst of events is collapsed into one reload once the file has been
//! quiet for [`DEBOUNCE`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouterConfig;

/// Quiet period after the last change before the table is reloaded.
pub const DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches one route table file and sends every version that loads and
/// validates.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for reloaded tables.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Updates stop when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| notify::Error::generic("route table path has no file name"))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (change_tx, change_rx) = std_mpsc::channel::<()>();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, &file_name) => {
                    let _ = change_tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let path = self.path.clone();
        let update_tx = self.update_tx;
        thread::Builder::new()
            .name("treemux-config-watcher".into())
            .spawn(move || reload_loop(&path, &change_rx, &update_tx))
            .map_err(notify::Error::io)?;

        tracing::info!(path = ?self.path, "Route table watcher started");
        Ok(watcher)
    }
}

/// Whether `event` changes the watched file.
fn touches(event: &Event, file_name: &OsString) -> bool {
    let kind = &event.kind;
    (kind.is_modify() || kind.is_create())
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

/// Runs until the watcher, and with it the change sender, is dropped or
/// nobody listens for updates any more.
fn reload_loop(
    path: &Path,
    changes: &std_mpsc::Receiver<()>,
    updates: &mpsc::UnboundedSender<RouterConfig>,
) {
    while changes.recv().is_ok() {
        while changes.recv_timeout(DEBOUNCE).is_ok() {}

        tracing::info!(path = ?path, "Route table change detected, reloading");
        match load_config(path) {
            Ok(config) => {
                if updates.send(config).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload route table, keeping current tree");
            }
        }
    }
}
