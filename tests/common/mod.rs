//! Purpose: Loopback stub serving canned PokéAPI JSON for integration tests.
//! Exports: `StubApi` plus fixture builders for list/detail/species payloads.
//! Role: Stand-in for the upstream catalog API; no network beyond 127.0.0.1.
//! Invariants: Routes are keyed by exact path (query stripped); unknown paths answer 404.
//! Invariants: Connections close after one response so clients never pool them.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{Value, json};

pub struct StubApi {
    base_url: String,
    routes: Arc<Mutex<HashMap<String, (u16, String)>>>,
}

impl StubApi {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let addr = listener.local_addr().expect("stub addr");
        let routes: Arc<Mutex<HashMap<String, (u16, String)>>> =
            Arc::new(Mutex::new(HashMap::new()));
        let handler_routes = Arc::clone(&routes);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let routes = Arc::clone(&handler_routes);
                thread::spawn(move || handle_connection(stream, &routes));
            }
        });
        Self {
            base_url: format!("http://{addr}/api/v2"),
            routes,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_json(&self, path: &str, body: Value) {
        self.set_response(path, 200, &body.to_string());
    }

    pub fn set_response(&self, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .expect("routes lock")
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn remove(&self, path: &str) {
        self.routes.lock().expect("routes lock").remove(path);
    }

    /// Seeds the list route and one detail route per name, ids 1-based by
    /// position, each with a single type tag and position-derived measurements.
    pub fn seed_catalog(&self, names: &[&str], types: &[&str]) {
        self.set_json("/api/v2/pokemon", list_json(names));
        for (index, name) in names.iter().enumerate() {
            let id = index as u32 + 1;
            let tag = types.get(index).copied().unwrap_or("normal");
            self.set_json(
                &format!("/api/v2/pokemon/{id}"),
                detail_json(id, name, 7 + id, 10 * id, &[tag]),
            );
        }
    }
}

fn handle_connection(stream: TcpStream, routes: &Mutex<HashMap<String, (u16, String)>>) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => {}
            Err(_) => return,
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let path = path.split('?').next().unwrap_or(path);
    let (status, body) = routes
        .lock()
        .expect("routes lock")
        .get(path)
        .cloned()
        .unwrap_or((404, r#"{"detail":"Not Found"}"#.to_string()));
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };

    let mut stream = stream;
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
}

pub fn list_json(names: &[&str]) -> Value {
    json!({
        "count": names.len(),
        "next": null,
        "previous": null,
        "results": names
            .iter()
            .map(|name| json!({ "name": name, "url": format!("https://pokeapi.co/api/v2/pokemon/{name}/") }))
            .collect::<Vec<_>>(),
    })
}

pub fn detail_json(id: u32, name: &str, height: u32, weight: u32, types: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "height": height,
        "weight": weight,
        "sprites": {
            "front_default": format!("https://sprites.test/{id}.png"),
            "front_shiny": null,
            "back_default": null,
            "back_shiny": null,
            "other": {
                "official-artwork": {
                    "front_default": format!("https://artwork.test/{id}.png")
                }
            }
        },
        "types": types
            .iter()
            .enumerate()
            .map(|(slot, tag)| json!({
                "slot": slot + 1,
                "type": { "name": tag, "url": "" }
            }))
            .collect::<Vec<_>>(),
        "abilities": [
            { "slot": 1, "is_hidden": false, "ability": { "name": "overgrow", "url": "" } },
            { "slot": 3, "is_hidden": true, "ability": { "name": "chlorophyll", "url": "" } }
        ],
        "stats": [
            { "base_stat": 45, "effort": 0, "stat": { "name": "hp", "url": "" } },
            { "base_stat": 49, "effort": 0, "stat": { "name": "attack", "url": "" } }
        ],
    })
}

pub fn species_json(entries: &[(&str, &str)]) -> Value {
    json!({
        "name": "stub-species",
        "flavor_text_entries": entries
            .iter()
            .map(|(language, text)| json!({
                "flavor_text": text,
                "language": { "name": language, "url": "" },
                "version": { "name": "red", "url": "" }
            }))
            .collect::<Vec<_>>(),
    })
}
