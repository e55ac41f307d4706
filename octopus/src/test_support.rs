//! Test-only helpers: a scripted transport, a recording build log and JSON fixtures.

use std::sync::Mutex;

use crate::io::build_log::BuildLog;
use crate::io::error::ApiError;
use crate::io::transport::{Transport, WebResponse};

/// Host used by API clients built over a [`ScriptedTransport`].
pub const TEST_HOST: &str = "http://octopus.test";

/// A request observed by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
enum Reply {
    Response(WebResponse),
    Failure(String),
}

#[derive(Debug, Clone)]
struct Route {
    method: &'static str,
    path: String,
    reply: Reply,
}

/// Transport returning canned replies per method and path.
///
/// Unscripted paths answer `404`. Every request is recorded in order.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, path: &str, code: u16, body: &str) -> Self {
        self.route("GET", path, Reply::Response(WebResponse::new(code, body)))
    }

    pub fn on_post(self, path: &str, code: u16, body: &str) -> Self {
        self.route("POST", path, Reply::Response(WebResponse::new(code, body)))
    }

    /// Make GET `path` fail at the network level.
    pub fn fail_get(self, path: &str, message: &str) -> Self {
        self.route("GET", path, Reply::Failure(message.to_string()))
    }

    /// Make POST `path` fail at the network level.
    pub fn fail_post(self, path: &str, message: &str) -> Self {
        self.route("POST", path, Reply::Failure(message.to_string()))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn posts(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == "POST")
            .collect()
    }

    /// Paths requested so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.path)
            .collect()
    }

    fn route(mut self, method: &'static str, path: &str, reply: Reply) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            reply,
        });
        self
    }

    fn dispatch(
        &self,
        method: &'static str,
        path: &str,
        body: Option<&str>,
    ) -> Result<WebResponse, ApiError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(RecordedRequest {
                method,
                path: path.to_string(),
                body: body.map(str::to_string),
            });
        let route = self
            .routes
            .iter()
            .find(|route| route.method == method && route.path == path);
        match route.map(|route| &route.reply) {
            Some(Reply::Response(response)) => Ok(response.clone()),
            Some(Reply::Failure(message)) => Err(ApiError::Transport {
                url: format!("{TEST_HOST}/api/{path}"),
                message: message.clone(),
            }),
            None => Ok(WebResponse::new(404, format!("no scripted route for {method} {path}"))),
        }
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, path: &str) -> Result<WebResponse, ApiError> {
        self.dispatch("GET", path, None)
    }

    fn post(&self, path: &str, json_body: &str) -> Result<WebResponse, ApiError> {
        self.dispatch("POST", path, Some(json_body))
    }
}

/// Severity of a [`RecordingLog`] line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Fatal,
}

/// Build log that keeps every line in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().expect("log lock").clone()
    }

    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(line_level, _)| *line_level == level)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn fatals(&self) -> Vec<String> {
        self.messages(LogLevel::Fatal)
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.lines
            .lock()
            .expect("log lock")
            .push((level, message.to_string()));
    }
}

impl BuildLog for RecordingLog {
    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn fatal(&self, message: &str) {
        self.push(LogLevel::Fatal, message);
    }
}

/// JSON for a single release in channel `Channels-1`.
pub fn release_json(id: &str, version: &str) -> String {
    serde_json::json!({
        "Id": id,
        "Version": version,
        "ChannelId": "Channels-1",
        "ReleaseNotes": format!("Notes for {version}"),
        "Links": { "Web": format!("/app#/releases/{id}") }
    })
    .to_string()
}

/// Paged collection body (`{"Items": [...]}`) wrapping raw JSON items.
pub fn releases_page(items: &[String]) -> String {
    format!(
        "{{\"ItemType\":\"Release\",\"TotalResults\":{},\"Items\":[{}]}}",
        items.len(),
        items.join(",")
    )
}

/// JSON array of `{Id, Name}` records, as returned by `projects/all` and `environments/all`.
pub fn named_list(records: &[(&str, &str)]) -> String {
    let items: Vec<serde_json::Value> = records
        .iter()
        .map(|(id, name)| serde_json::json!({ "Id": id, "Name": name }))
        .collect();
    serde_json::Value::Array(items).to_string()
}
