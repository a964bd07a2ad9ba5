// lifecycle.rs
use log::{error, info};
use rocket::{get, Shutdown};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::StoreError;

/// Shutdown state shared by the routes and the binary.
///
/// A storage failure marks the lifecycle as failed and asks Rocket to shut
/// down; the binary turns that into a non-zero exit status.
#[derive(Debug, Default)]
pub struct Lifecycle {
    failed: AtomicBool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn fail(&self, err: &StoreError, shutdown: Shutdown) {
        error!("Storage failure, shutting down: {}", err);
        self.failed.store(true, Ordering::SeqCst);
        shutdown.notify();
    }
}

/// Administrative shutdown, mounted only for file-backed storage.
#[get("/exit")]
pub fn exit(shutdown: Shutdown) -> &'static str {
    info!("Received exit request. Exiting...");
    shutdown.notify();
    "Exiting\n"
}
