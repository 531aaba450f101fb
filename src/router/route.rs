//! Registered routes and the `/segment/:name` path shape.

use std::sync::OnceLock;

use regex::Regex;

use crate::parser::Method;
use crate::router::handler::HandlerFn;

/// Key of the route table: a method and a lower-cased path or pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: Method,
    pub path: String,
}

impl RouteKey {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_lowercase(),
        }
    }
}

/// How a route matches a request path.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Compared against the lower-cased request path.
    Exact,
    /// `^/(?i:prefix)/(\w+=?)$`, capturing the parameter value.
    Param(Regex),
    /// The pattern failed to compile. Resolving against it is a routing fault.
    Broken(String),
}

/// A registered (method, path) to handler binding.
#[derive(Clone)]
pub struct Route {
    pub method: Method,
    /// The path as registered, or the match expression for parameterized routes.
    pub path: String,
    /// The path exactly as passed to [`Route::new`], e.g. `/hash/:id`.
    pub template: String,
    pub handler: HandlerFn,
    /// Name of the trailing path parameter, if any.
    pub named_param: Option<String>,
    pub matcher: Matcher,
}

impl Route {
    /// Build a route, detecting the `/segment/:name` shape.
    ///
    /// Only a two-segment path whose last segment is `:name` becomes a
    /// parameterized route. Anything else is taken literally, so a colon in
    /// another position produces a route no real request path will match.
    pub fn new(method: Method, path: &str, handler: HandlerFn) -> Self {
        match split_named_param(path) {
            Some((prefix, name)) => {
                let pattern = format!(r"^/(?i:{})/(\w+=?)$", regex::escape(prefix));
                let matcher = match Regex::new(&pattern) {
                    Ok(re) => Matcher::Param(re),
                    Err(e) => Matcher::Broken(e.to_string()),
                };
                Self {
                    method,
                    path: pattern,
                    template: path.to_string(),
                    handler,
                    named_param: Some(name.to_string()),
                    matcher,
                }
            }
            None => Self {
                method,
                path: path.to_string(),
                template: path.to_string(),
                handler,
                named_param: None,
                matcher: Matcher::Exact,
            },
        }
    }

    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.method, &self.path)
    }

    pub fn is_parameterized(&self) -> bool {
        self.named_param.is_some()
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("template", &self.template)
            .field("path", &self.path)
            .field("named_param", &self.named_param)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

fn named_param_shape() -> Option<&'static Regex> {
    static SHAPE: OnceLock<Option<Regex>> = OnceLock::new();
    SHAPE
        .get_or_init(|| Regex::new(r"^/(\w+)/:(\w+)$").ok())
        .as_ref()
}

/// Split `/prefix/:name` into `("prefix", "name")`.
fn split_named_param(path: &str) -> Option<(&str, &str)> {
    let caps = named_param_shape()?.captures(path)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}
