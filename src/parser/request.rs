//! HTTP request parsing and representation.

use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;

use url::form_urlencoded;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Represents an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request target as sent, including any query string
    pub path: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
    /// The request body
    pub body: Vec<u8>,
    /// Decoded query parameters
    pub query_params: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a new HTTP request with an empty body.
    ///
    /// Query parameters are decoded from `path` up front.
    pub fn new(method: Method, path: String, version: HttpVersion, headers: HashMap<String, String>) -> Self {
        let query_params = path
            .split_once('?')
            .map(|(_, query)| decode_pairs(query.as_bytes()))
            .unwrap_or_default();

        Self {
            method,
            path,
            version,
            headers,
            body: Vec::new(),
            query_params,
        }
    }

    /// Create a new HTTP request with a body.
    pub fn with_body(method: Method, path: String, version: HttpVersion, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        let mut request = Self::new(method, path, version, headers);
        request.body = body;
        request
    }

    /// The request path without its query string, still percent-encoded.
    pub fn uri_path(&self) -> &str {
        match self.path.split_once('?') {
            Some((path, _)) => path,
            None => &self.path,
        }
    }

    /// The percent-decoded path without its query string. This is what routes match against.
    ///
    /// A path that does not decode to UTF-8 is returned as sent.
    pub fn route_path(&self) -> Cow<'_, str> {
        let raw = self.uri_path();
        urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
    }

    /// Case-insensitive header lookup.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                Some(v)
            } else {
                None
            }
        })
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// Whether the body is `application/x-www-form-urlencoded`.
    pub fn is_form(&self) -> bool {
        self.get_header("Content-Type")
            .and_then(|ct| ct.split(';').next())
            .map(|media_type| media_type.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
            .unwrap_or(false)
    }

    /// Look up a form field.
    ///
    /// Fields in a url-encoded body take precedence over the query string.
    /// Returns `None` when the field is absent from both.
    pub fn form_value(&self, name: &str) -> Option<String> {
        if self.is_form() {
            let from_body = form_urlencoded::parse(&self.body)
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned());
            if from_body.is_some() {
                return from_body;
            }
        }
        self.query_params.get(name).cloned()
    }
}

fn decode_pairs(input: &[u8]) -> HashMap<String, String> {
    form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Locate the blank line that ends the header block.
///
/// Returns `(head_len, body_start)`. Both `\r\n\r\n` and a bare `\n\n` are
/// accepted; whichever comes first wins.
pub fn header_end(input: &[u8]) -> Option<(usize, usize)> {
    let crlf = input.windows(4).position(|w| w == b"\r\n\r\n").map(|i| (i, i + 4));
    let lf = input.windows(2).position(|w| w == b"\n\n").map(|i| (i, i + 2));
    match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Read the declared `Content-Length` from a header block, `0` if absent.
pub fn content_length(head: &[u8]) -> Result<usize, Error> {
    let head = std::str::from_utf8(head)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;
    for line in head.lines().skip(1) {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("Content-Length") {
                let value = value.trim();
                return value
                    .parse::<usize>()
                    .map_err(|_| Error::InvalidContentLength(value.to_string()));
            }
        }
    }
    Ok(0)
}

/// Parse an HTTP request from a byte slice.
///
/// Anything after the header block is the body, cut to `Content-Length`
/// when the header is present.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    if input.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let (head, body) = match header_end(input) {
        Some((head_len, body_start)) => (&input[..head_len], &input[body_start..]),
        None => (input, &input[input.len()..]),
    };

    let head_str = std::str::from_utf8(head)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;

    let mut lines = head_str.lines();

    let request_line = lines.next().ok_or(Error::EmptyRequest)?;

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    }

    let method = Method::from_str(parts[0])?;

    let path = parts[1].to_string();
    if !path.starts_with('/') {
        return Err(Error::InvalidPath);
    }

    let version = HttpVersion::from_str(parts[2])?;

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }

        let (name, value) = line.split_once(':').ok_or(Error::InvalidHeaderFormat)?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }

    if version.requires_host() && !headers.keys().any(|k| k.eq_ignore_ascii_case("Host")) {
        return Err(Error::MissingHeader("Host".to_string()));
    }

    let declared = content_length(head)?;
    let body = body[..declared.min(body.len())].to_vec();

    Ok(HttpRequest::with_body(method, path, version, headers, body))
}
