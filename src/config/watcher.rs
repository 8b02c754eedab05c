//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself, so editors
//! and deploy tools that replace the file by rename are still picked up.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::AppConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<AppConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();
        let file_name: Option<OsString> = path.file_name().map(|name| name.to_os_string());
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|changed| changed.file_name() == file_name.as_deref());
                    if !touches_config {
                        return;
                    }

                    tracing::info!(path = ?path, "Config file change detected, reloading");
                    match load_config(&path) {
                        Ok(new_config) => {
                            if tx.send(new_config).is_err() {
                                tracing::debug!("Config receiver dropped, ignoring update");
                            }
                        }
                        Err(e) => {
                            tracing::error!(
                                error = %e,
                                "Failed to reload config, keeping current configuration"
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tokio::time::{sleep, timeout};

    /// Replace `path` atomically so the watcher never reads a half-written file.
    fn replace_file(path: &Path, content: &str) {
        let staging = path.with_extension("toml.staging");
        fs::write(&staging, content).unwrap();
        fs::rename(&staging, path).unwrap();
    }

    async fn next_with_routes(
        rx: &mut mpsc::UnboundedReceiver<AppConfig>,
        routes: usize,
    ) -> Option<AppConfig> {
        timeout(Duration::from_secs(10), async {
            while let Some(config) = rx.recv().await {
                if config.routes.len() == routes {
                    return Some(config);
                }
            }
            None
        })
        .await
        .ok()
        .flatten()
    }

    #[tokio::test]
    async fn test_reloads_valid_file_and_ignores_invalid_one() {
        let dir = std::env::temp_dir().join(format!("dispersion-watch-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dispersion.toml");
        replace_file(&path, "[[routes]]\npattern = \"a\"\nrewrite = \"b\"\n");

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _watcher = watcher.run().unwrap();

        replace_file(
            &path,
            "[[routes]]\npattern = \"a\"\nrewrite = \"b\"\n\n\
             [[routes]]\nname = \"blog\"\npattern = \"blog/[*]\"\nrewrite = \"posts/[*0]\"\n",
        );
        let config = next_with_routes(&mut rx, 2)
            .await
            .expect("validated config was not delivered");
        assert_eq!(config.routes[1].name.as_deref(), Some("blog"));

        // Let duplicate events for the same change settle, then drain them.
        sleep(Duration::from_millis(500)).await;
        while rx.try_recv().is_ok() {}

        replace_file(
            &path,
            "[[routes]]\npattern = \"blog/[*]\"\nrewrite = \"posts/[*5]\"\n",
        );
        sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
