//! Per-request state handed to middleware and handlers.

use std::collections::HashMap;

use log::error;
use serde::Serialize;

use crate::parser::HttpRequest;
use crate::router::extensions::Extensions;
use crate::router::sink::ResponseSink;
use crate::server::StatusCode;

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";

/// The request being served, its response sink, and its path parameters.
///
/// One `Context` exists per in-flight request and is dropped once the
/// response has been produced.
pub struct Context {
    request: HttpRequest,
    response: ResponseSink,
    params: HashMap<String, String>,
    extensions: Extensions,
}

impl Context {
    pub fn new(request: HttpRequest) -> Self {
        Self {
            request,
            response: ResponseSink::new(),
            params: HashMap::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn response(&self) -> &ResponseSink {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ResponseSink {
        &mut self.response
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Write a plain-text response.
    ///
    /// Only one write per request is meaningful; see [`ResponseSink`].
    pub fn text(&mut self, status: StatusCode, body: impl AsRef<str>) {
        self.response.set_header("Content-Type", TEXT_CONTENT_TYPE);
        self.response.write_status(status);
        self.response.write(body.as_ref().as_bytes());
    }

    /// Write `value` as JSON.
    ///
    /// If serialization fails a `500` with a generic body goes out instead.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.response.set_header("Content-Type", JSON_CONTENT_TYPE);
                self.response.write_status(status);
                self.response.write(&body);
            }
            Err(e) => {
                error!("Failed to serialize response body: {e}");
                self.text(StatusCode::InternalServerError, "Internal Server Error");
            }
        }
    }

    /// The bound path parameter, or `""` when there is none by that name.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or("")
    }

    pub(crate) fn bind_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    pub(crate) fn into_response(self) -> crate::server::HttpResponse {
        self.response.into_response()
    }
}
