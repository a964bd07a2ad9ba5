use book_server::server::{ServerConfig, ServerNode, StorageKind, DEFAULT_DATA_FILE, DEFAULT_PORT};
use clap::{App, Arg, ArgMatches};
use log::{info, LevelFilter};
use std::net::IpAddr;
use std::path::PathBuf;

fn setup_logger(level: LevelFilter, log_file: Option<&str>) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .chain(std::io::stdout());
    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }
    dispatch.apply()?;
    Ok(())
}

/// Command line value first, then the environment, then `None`.
fn setting(matches: &ArgMatches, name: &str, env: &str) -> Option<String> {
    matches
        .value_of(name)
        .map(String::from)
        .or_else(|| std::env::var(env).ok())
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let matches = App::new("book-server")
        .version("1.0")
        .about("A small JSON CRUD service for books")
        .arg(
            Arg::new("address")
                .long("address")
                .takes_value(true)
                .help("Address to listen on [env: BOOKS_ADDRESS, default: 0.0.0.0]"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .takes_value(true)
                .help("Port to listen on [env: BOOKS_PORT, default: 8080]"),
        )
        .arg(
            Arg::new("storage")
                .long("storage")
                .takes_value(true)
                .possible_values(["memory", "file"])
                .help("Book storage backend [env: BOOKS_STORAGE, default: file]"),
        )
        .arg(
            Arg::new("data_file")
                .long("data-file")
                .takes_value(true)
                .help("JSON file for file storage [env: BOOKS_DATA_FILE]"),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .takes_value(true)
                .help("Log level [env: BOOKS_LOG_LEVEL, default: info]"),
        )
        .arg(
            Arg::new("log_file")
                .long("log-file")
                .takes_value(true)
                .help("Also write logs to this file [env: BOOKS_LOG_FILE]"),
        )
        .get_matches();

    let log_level = match setting(&matches, "log_level", "BOOKS_LOG_LEVEL") {
        Some(level) => level
            .parse::<LevelFilter>()
            .map_err(|e| anyhow::anyhow!("invalid log level '{}': {}", level, e))?,
        None => LevelFilter::Info,
    };
    let log_file = setting(&matches, "log_file", "BOOKS_LOG_FILE");
    setup_logger(log_level, log_file.as_deref())?;

    let mut config = ServerConfig::default();
    if let Some(address) = setting(&matches, "address", "BOOKS_ADDRESS") {
        config.address = address.parse::<IpAddr>()?;
    }
    config.port = match setting(&matches, "port", "BOOKS_PORT") {
        Some(port) => port.parse::<u16>()?,
        None => DEFAULT_PORT,
    };
    if let Some(storage) = setting(&matches, "storage", "BOOKS_STORAGE") {
        config.storage = storage.parse::<StorageKind>().map_err(anyhow::Error::msg)?;
    }
    config.data_file = PathBuf::from(
        setting(&matches, "data_file", "BOOKS_DATA_FILE")
            .unwrap_or_else(|| String::from(DEFAULT_DATA_FILE)),
    );

    info!(
        "Starting book server on {}:{} with {} storage",
        config.address, config.port, config.storage
    );
    let server_node = ServerNode::new(config)?;
    server_node
        .build()
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("book server failed: {}", e))?;

    if server_node.lifecycle().has_failed() {
        anyhow::bail!("book server stopped after a storage failure");
    }
    info!("Book server stopped");
    Ok(())
}
