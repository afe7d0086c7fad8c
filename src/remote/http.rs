//! HTTP implementation of the task repository
//!
//! Endpoints:
//!
//! | Operation      | Request                                  |
//! |----------------|------------------------------------------|
//! | `fetch_all`    | `GET /tasks`                             |
//! | `create`       | `POST /tasks` `{name, cost, dueDate}`    |
//! | `update_order` | `PUT /tasks/order` `{updates: [...]}`    |
//! | `update_task`  | `PUT /tasks` `{id, name, cost, dueDate}` |
//! | `delete_task`  | `DELETE /tasks/{id}`                     |

use std::time::Duration;

use serde::Serialize;

use super::{RemoteError, TaskRepository};
use crate::domain::{OrderUpdate, Task, TaskDraft, TaskFields, TaskId};

/// Blocking HTTP client for the remote task store
pub struct HttpTaskStore {
    agent: ureq::Agent,
    base_url: String,
}

/// Body of `PUT /tasks`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EditBody<'a> {
    id: TaskId,
    name: &'a str,
    cost: f64,
    due_date: chrono::NaiveDate,
}

/// Body of `PUT /tasks/order`
#[derive(Serialize)]
struct OrderBody<'a> {
    updates: &'a [OrderUpdate],
}

impl HttpTaskStore {
    /// Creates a client for the store at `base_url`
    ///
    /// The timeout bounds every request; there are no retries.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { agent, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport_error(err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::Status(status, _) => RemoteError::Api { status },
        ureq::Error::Transport(t) => RemoteError::Network(t.to_string()),
    }
}

fn decode_error(err: std::io::Error) -> RemoteError {
    RemoteError::Network(format!("invalid response body: {}", err))
}

impl TaskRepository for HttpTaskStore {
    fn fetch_all(&self) -> Result<Vec<Task>, RemoteError> {
        let response = self
            .agent
            .get(&self.url("/tasks"))
            .call()
            .map_err(transport_error)?;
        response.into_json().map_err(decode_error)
    }

    fn create(&self, draft: &TaskDraft) -> Result<Task, RemoteError> {
        let response = self
            .agent
            .post(&self.url("/tasks"))
            .send_json(draft)
            .map_err(|err| match err {
                // The store signals a same-name active task with 400
                ureq::Error::Status(400, _) => RemoteError::Duplicate(draft.name.clone()),
                other => transport_error(other),
            })?;
        response.into_json().map_err(decode_error)
    }

    fn update_order(&self, updates: &[OrderUpdate]) -> Result<(), RemoteError> {
        self.agent
            .put(&self.url("/tasks/order"))
            .send_json(OrderBody { updates })
            .map_err(transport_error)?;
        Ok(())
    }

    fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<(), RemoteError> {
        self.agent
            .put(&self.url("/tasks"))
            .send_json(EditBody {
                id,
                name: &fields.name,
                cost: fields.cost,
                due_date: fields.due_date,
            })
            .map_err(|err| match err {
                ureq::Error::Status(404, _) => RemoteError::NotFound(id),
                other => transport_error(other),
            })?;
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> Result<(), RemoteError> {
        self.agent
            .delete(&self.url(&format!("/tasks/{}", id)))
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(404, _) => RemoteError::NotFound(id),
                other => transport_error(other),
            })?;
        Ok(())
    }
}
