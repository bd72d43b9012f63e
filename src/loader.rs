//! Background loading of the package-info response
//!
//! The only asynchronous boundary in the system: the package info is
//! requested once and the scan resumes when the response arrives.
//! Everything after that single resumption runs synchronously.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::moduleinfo::PackageInfoResponse;

/// Loads the package-info document off the main thread
pub struct InfoLoader {
    rx: Option<Receiver<Option<PackageInfoResponse>>>,
    loading: bool,
}

impl Default for InfoLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl InfoLoader {
    pub fn new() -> Self {
        Self {
            rx: None,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Spawn a background thread to read and parse the response document
    pub fn load(&mut self, path: PathBuf) {
        if self.loading {
            return;
        }

        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);
        self.loading = true;

        thread::spawn(move || {
            let result = std::fs::read(&path)
                .map_err(|e| e.to_string())
                .and_then(|bytes| {
                    serde_json::from_slice::<PackageInfoResponse>(&bytes)
                        .map_err(|e| e.to_string())
                });
            match result {
                Ok(resp) => {
                    let _ = tx.send(Some(resp));
                }
                Err(e) => {
                    log::warn!("failed to load package info from {}: {}", path.display(), e);
                    let _ = tx.send(None);
                }
            }
        });
    }

    /// Poll for the response. Outer `None` means still loading; inner
    /// `None` means the load failed (already logged by the worker).
    pub fn poll(&mut self) -> Option<Option<PackageInfoResponse>> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(resp) => {
                self.loading = false;
                self.rx = None;
                Some(resp)
            }
            Err(TryRecvError::Disconnected) => {
                log::debug!("package info loader disconnected");
                self.loading = false;
                self.rx = None;
                Some(None)
            }
            Err(TryRecvError::Empty) => None,
        }
    }
}
