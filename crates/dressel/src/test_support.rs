use std::collections::HashMap;
use std::sync::Mutex;

use crate::{FetchError, FetchOutcome, ResourcePath, ResourceSource};

#[derive(Debug, Clone)]
enum Canned {
    Body(Vec<u8>),
    Status(u16),
}

/// In-memory archive for testing. Unknown paths answer 404; every request is
/// recorded in order.
pub struct InMemoryArchive {
    label: String,
    resources: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl InMemoryArchive {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            resources: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Serve `body` with status 200 at `path`.
    pub fn add(&mut self, path: &str, body: impl Into<Vec<u8>>) {
        self.resources
            .insert(path.to_owned(), Canned::Body(body.into()));
    }

    /// Answer requests for `path` with a bare status code.
    pub fn add_status(&mut self, path: &str, status: u16) {
        self.resources.insert(path.to_owned(), Canned::Status(status));
    }

    /// Paths requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait::async_trait]
impl ResourceSource for InMemoryArchive {
    fn label(&self) -> &str {
        &self.label
    }

    async fn get(&self, path: &ResourcePath) -> Result<FetchOutcome<Vec<u8>>, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(path.as_str().to_owned());
        }

        Ok(match self.resources.get(path.as_str()) {
            Some(Canned::Body(body)) => FetchOutcome::Success(body.clone()),
            Some(Canned::Status(404)) | None => FetchOutcome::NotFound,
            Some(Canned::Status(status)) => FetchOutcome::ProtocolError { status: *status },
        })
    }
}
