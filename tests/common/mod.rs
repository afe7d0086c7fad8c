//! In-process HTTP fixture for the remote task store
//!
//! Implements the store's five endpoints over `tiny_http` with a
//! shared in-memory state, so contract and CLI tests run against real
//! HTTP without a network.

#![allow(dead_code)]

use std::io::Read;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Response, Server, StatusCode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: u64,
    pub name: String,
    pub cost: f64,
    pub due_date: String,
    pub order: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftBody {
    name: String,
    cost: f64,
    due_date: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditBody {
    id: u64,
    name: String,
    cost: f64,
    due_date: String,
}

#[derive(Deserialize)]
struct OrderBody {
    updates: Vec<OrderEntry>,
}

#[derive(Deserialize)]
struct OrderEntry {
    id: u64,
    order: u32,
}

/// A running fixture store; shuts down on drop
pub struct FakeStore {
    pub base_url: String,
    state: Arc<Mutex<Vec<TaskRecord>>>,
    order_calls: Arc<AtomicUsize>,
    running: Arc<AtomicBool>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::with_tasks(&[])
    }

    /// Starts a store seeded with `(name, cost, due_date)` rows
    pub fn with_tasks(seed: &[(&str, f64, &str)]) -> Self {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let base_url = format!("http://{}", server.server_addr());

        let state: Arc<Mutex<Vec<TaskRecord>>> = Arc::new(Mutex::new(
            seed.iter()
                .enumerate()
                .map(|(i, (name, cost, due))| TaskRecord {
                    id: i as u64 + 1,
                    name: name.to_string(),
                    cost: *cost,
                    due_date: due.to_string(),
                    order: i as u32 + 1,
                })
                .collect(),
        ));
        let next_id = AtomicU64::new(seed.len() as u64 + 1);
        let order_calls = Arc::new(AtomicUsize::new(0));
        let running = Arc::new(AtomicBool::new(true));

        {
            let state = Arc::clone(&state);
            let order_calls = Arc::clone(&order_calls);
            let running = Arc::clone(&running);
            thread::spawn(move || loop {
                let request = match server.recv_timeout(Duration::from_millis(200)) {
                    Ok(Some(request)) => request,
                    Ok(None) => {
                        if running.load(Ordering::SeqCst) {
                            continue;
                        }
                        break;
                    }
                    Err(_) => break,
                };
                handle(request, &state, &order_calls, &next_id);
            });
        }

        Self {
            base_url,
            state,
            order_calls,
            running,
        }
    }

    /// Current server-side task rows, sorted by order
    pub fn snapshot(&self) -> Vec<TaskRecord> {
        let mut tasks = self.state.lock().unwrap().clone();
        tasks.sort_by_key(|t| t.order);
        tasks
    }

    /// How many `PUT /tasks/order` requests the store has served
    pub fn order_call_count(&self) -> usize {
        self.order_calls.load(Ordering::SeqCst)
    }
}

impl Drop for FakeStore {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

fn handle(
    mut request: tiny_http::Request,
    state: &Mutex<Vec<TaskRecord>>,
    order_calls: &AtomicUsize,
    next_id: &AtomicU64,
) {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let url = request.url().to_string();
    let method = request.method().clone();

    let response = match (&method, url.as_str()) {
        (Method::Get, "/tasks") => {
            let mut tasks = state.lock().unwrap().clone();
            tasks.sort_by_key(|t| t.order);
            json_response(&tasks, 200)
        }

        (Method::Post, "/tasks") => match serde_json::from_str::<DraftBody>(&body) {
            Ok(draft) => {
                let mut tasks = state.lock().unwrap();
                if tasks.iter().any(|t| t.name == draft.name) {
                    empty_response(400)
                } else {
                    let record = TaskRecord {
                        id: next_id.fetch_add(1, Ordering::SeqCst),
                        name: draft.name,
                        cost: draft.cost,
                        due_date: draft.due_date,
                        order: tasks.len() as u32 + 1,
                    };
                    tasks.push(record.clone());
                    json_response(&record, 201)
                }
            }
            Err(_) => empty_response(422),
        },

        (Method::Put, "/tasks/order") => match serde_json::from_str::<OrderBody>(&body) {
            Ok(order) => {
                order_calls.fetch_add(1, Ordering::SeqCst);
                let mut tasks = state.lock().unwrap();
                for entry in order.updates {
                    if let Some(t) = tasks.iter_mut().find(|t| t.id == entry.id) {
                        t.order = entry.order;
                    }
                }
                empty_response(200)
            }
            Err(_) => empty_response(422),
        },

        (Method::Put, "/tasks") => match serde_json::from_str::<EditBody>(&body) {
            Ok(edit) => {
                let mut tasks = state.lock().unwrap();
                match tasks.iter_mut().find(|t| t.id == edit.id) {
                    Some(t) => {
                        t.name = edit.name;
                        t.cost = edit.cost;
                        t.due_date = edit.due_date;
                        empty_response(200)
                    }
                    None => empty_response(404),
                }
            }
            Err(_) => empty_response(422),
        },

        (Method::Delete, path) if path.starts_with("/tasks/") => {
            match path["/tasks/".len()..].parse::<u64>() {
                Ok(id) => {
                    let mut tasks = state.lock().unwrap();
                    match tasks.iter().position(|t| t.id == id) {
                        Some(index) => {
                            tasks.remove(index);
                            // Orders stay dense after a delete.
                            tasks.sort_by_key(|t| t.order);
                            for (i, t) in tasks.iter_mut().enumerate() {
                                t.order = i as u32 + 1;
                            }
                            empty_response(200)
                        }
                        None => empty_response(404),
                    }
                }
                Err(_) => empty_response(404),
            }
        }

        _ => empty_response(405),
    };

    let _ = request.respond(response);
}

fn json_response<T: Serialize>(data: &T, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_vec(data).expect("fixture json");
    Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(Header::from_bytes("Content-Type", "application/json").expect("header"))
}

fn empty_response(status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_data(Vec::new()).with_status_code(StatusCode(status))
}
