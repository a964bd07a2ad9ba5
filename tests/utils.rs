#![allow(dead_code)]

use book_server::book::Book;
use book_server::server::{ServerConfig, ServerNode, StorageKind};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use std::path::Path;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn get_server_config(storage: StorageKind, data_file: &Path) -> ServerConfig {
    ServerConfig {
        storage,
        data_file: data_file.to_path_buf(),
        ..ServerConfig::default()
    }
}

pub fn launch_memory_node() -> (ServerNode, Client) {
    init_logger();
    let node = ServerNode::new(get_server_config(StorageKind::Memory, Path::new("unused.json")))
        .expect("memory store opens");
    let client = Client::tracked(node.build()).expect("valid rocket instance");
    (node, client)
}

pub fn launch_file_node(data_file: &Path) -> (ServerNode, Client) {
    init_logger();
    let node = ServerNode::new(get_server_config(StorageKind::File, data_file))
        .expect("file store opens");
    let client = Client::tracked(node.build()).expect("valid rocket instance");
    (node, client)
}

pub fn create_book(client: &Client, title: &str) -> Book {
    let response = client
        .post("/books/")
        .header(ContentType::JSON)
        .body(format!(r#"{{"title":"{}"}}"#, title))
        .dispatch();
    assert_eq!(response.status(), Status::Created);
    response.into_json::<Book>().expect("book body")
}
