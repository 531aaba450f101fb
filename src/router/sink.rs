//! Incremental response writer.

use std::collections::HashMap;

use log::warn;

use crate::server::{HttpResponse, StatusCode};

/// Buffers what a request's handler and middleware write.
///
/// Follows the usual single-header-write rule: the first status write
/// commits the status and headers. Later status writes are dropped with a
/// warning and header changes after the commit are ignored. Body bytes
/// always append. Writing a body before any status commits `200 OK`.
#[derive(Debug, Default)]
pub struct ResponseSink {
    status: Option<StatusCode>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header. No effect once the status has been written.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        if self.status.is_none() {
            self.headers.insert(name.into(), value.into());
        }
    }

    /// Commit the status line.
    pub fn write_status(&mut self, status: StatusCode) {
        match self.status {
            None => self.status = Some(status),
            Some(committed) => warn!(
                "Superfluous status write {} ignored, {} already sent",
                status as u16, committed as u16
            ),
        }
    }

    /// Append body bytes, committing `200 OK` if nothing was written yet.
    pub fn write(&mut self, bytes: &[u8]) {
        if self.status.is_none() {
            self.status = Some(StatusCode::Ok);
        }
        self.body.extend_from_slice(bytes);
    }

    /// The committed status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether anything has been written yet.
    pub fn is_written(&self) -> bool {
        self.status.is_some()
    }

    /// Turn the buffered writes into a response ready for the wire.
    pub fn into_response(self) -> HttpResponse {
        let mut response = HttpResponse::new(self.status.unwrap_or(StatusCode::Ok));
        for (name, value) in self.headers {
            response = response.with_header(name, value);
        }
        response.with_body_bytes(self.body)
    }
}
