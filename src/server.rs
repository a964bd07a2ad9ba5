use log::info;
use rocket::{routes, Build, Rocket};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::StoreError;
use crate::lifecycle::{self, Lifecycle};
use crate::routes::{book_routes, SharedStore};
use crate::storage::{FileStore, MemoryStore};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_FILE: &str = "data.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    File,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "file" => Ok(StorageKind::File),
            other => Err(format!("unknown storage kind '{}'", other)),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Memory => write!(f, "memory"),
            StorageKind::File => write!(f, "file"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub storage: StorageKind,
    /// Only read when `storage` is [`StorageKind::File`].
    pub data_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            storage: StorageKind::File,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

pub struct ServerNode {
    config: ServerConfig,
    store: SharedStore,
    lifecycle: Arc<Lifecycle>,
}

impl ServerNode {
    /// Opens the configured store. Fails if the data file exists but cannot
    /// be read as a book collection.
    pub fn new(config: ServerConfig) -> Result<Self, StoreError> {
        let store: SharedStore = match config.storage {
            StorageKind::Memory => {
                info!("Using in-memory book store.");
                Arc::new(MemoryStore::new())
            }
            StorageKind::File => {
                info!("Using file book store at {}.", config.data_file.display());
                Arc::new(FileStore::open(&config.data_file)?)
            }
        };
        Ok(ServerNode {
            config,
            store,
            lifecycle: Arc::new(Lifecycle::new()),
        })
    }

    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.lifecycle.clone()
    }

    pub fn build(&self) -> Rocket<Build> {
        let mut shutdown = rocket::config::Shutdown::default();
        shutdown.ctrlc = true;
        #[cfg(unix)]
        {
            use rocket::config::Sig;
            shutdown.signals.insert(Sig::Term);
            shutdown.signals.insert(Sig::Int);
        }
        let figment = rocket::Config::figment()
            .merge(("address", self.config.address))
            .merge(("port", self.config.port))
            .merge(("shutdown", shutdown));

        let rocket = rocket::custom(figment)
            .manage(self.store.clone())
            .manage(self.lifecycle.clone())
            .mount("/", book_routes());
        match self.config.storage {
            StorageKind::File => rocket.mount("/", routes![lifecycle::exit]),
            StorageKind::Memory => rocket,
        }
    }
}
