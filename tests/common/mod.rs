// tests/common/mod.rs

#![allow(dead_code)] // Each integration test uses a different subset of these helpers.

use repo_harvester::forge::{ApiResponse, Transport};
use repo_harvester::Result;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::collections::{BTreeSet, HashMap};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;
use url::Url;

// Helper function to get the binary command
pub fn harvester_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("repo-harvester"))
}

pub fn create_file(dir_path: &Path, relative_path: &str, content: &str) {
    let file_path = dir_path.join(relative_path);
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&file_path, content).unwrap();
}

/// Collects every file under `root` as `/`-separated relative paths.
pub fn list_files(root: &Path) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect();
                found.insert(parts.join("/"));
            }
        }
    }
    found
}

/// An in-memory forge: canned responses keyed by full URL, 404 for anything
/// else. Every request is recorded.
#[derive(Default)]
pub struct MemoryForge {
    routes: Mutex<HashMap<String, (u16, String)>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryForge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &Url, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

impl Transport for MemoryForge {
    fn get(&self, url: &Url) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        let (status, body) = self
            .routes
            .lock()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .unwrap_or((404, r#"{"message": "Not Found"}"#.to_string()));
        Ok(ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.into_bytes(),
        })
    }
}

/// A minimal HTTP/1.1 server on 127.0.0.1 for exercising the real client.
///
/// The handler receives the request target (path and query) and returns a
/// status and a JSON body. Every request head is recorded, lowercased.
/// Only body-less requests are read, and every response closes the connection.
pub struct StubServer {
    addr: SocketAddr,
    heads: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start<H>(handler: H) -> Self
    where
        H: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let heads = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&heads);
        let handler = Arc::new(handler);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let recorded = Arc::clone(&recorded);
                let handler = Arc::clone(&handler);
                thread::spawn(move || serve(stream, &*handler, &recorded));
            }
        });
        Self { addr, heads }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn heads(&self) -> Vec<String> {
        self.heads.lock().unwrap().clone()
    }

    /// Request targets received so far, e.g. `/repos/o/r`.
    pub fn targets(&self) -> Vec<String> {
        self.heads()
            .iter()
            .filter_map(|h| h.split_whitespace().nth(1).map(str::to_string))
            .collect()
    }
}

fn serve(
    mut stream: TcpStream,
    handler: &dyn Fn(&str) -> (u16, String),
    heads: &Mutex<Vec<String>>,
) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let head = String::from_utf8_lossy(&buf).to_lowercase();
    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    heads.lock().unwrap().push(head);

    let (status, body) = handler(&target);
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
