//! Method + path lookup.

use std::collections::HashMap;

use crate::parser::Method;
use crate::router::route::{Matcher, Route, RouteKey};
use crate::server::Error;

/// A successful resolution.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    /// Parameter name and the value taken from the request path.
    pub param: Option<(&'a str, String)>,
}

/// All registered routes.
///
/// Exact routes are hashed by `(method, lowercase path)`. Parameterized
/// routes live in a list kept in registration order, which is also the
/// order they are tried in.
#[derive(Debug, Default)]
pub struct RouteTable {
    exact: HashMap<RouteKey, Route>,
    parameterized: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route. A route with the same key is replaced in place.
    pub fn insert(&mut self, route: Route) {
        let key = route.key();
        if !route.is_parameterized() {
            self.exact.insert(key, route);
            return;
        }

        match self.parameterized.iter_mut().find(|r| r.key() == key) {
            Some(existing) => *existing = route,
            None => self.parameterized.push(route),
        }
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.parameterized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every route: exact ones first (unordered), then parameterized ones in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.exact.values().chain(self.parameterized.iter())
    }

    /// Find the route for a request.
    ///
    /// The exact table is consulted first; the parameterized list is only
    /// scanned on a miss, and the first route whose pattern matches wins.
    /// `Ok(None)` means nothing matched. A parameterized route with a
    /// broken pattern reached during the scan is a routing fault.
    pub fn resolve(&self, method: Method, path: &str) -> Result<Option<RouteMatch<'_>>, Error> {
        if let Some(route) = self.exact.get(&RouteKey::new(method, path)) {
            return Ok(Some(RouteMatch { route, param: None }));
        }

        for route in self.parameterized.iter().filter(|r| r.method == method) {
            let re = match &route.matcher {
                Matcher::Param(re) => re,
                Matcher::Broken(reason) => {
                    return Err(Error::Routing(format!("route {} is unusable: {reason}", route.path)));
                }
                Matcher::Exact => continue,
            };

            let Some(caps) = re.captures(path) else {
                continue;
            };

            let value = caps
                .get(1)
                .ok_or_else(|| Error::Routing(format!("route {} matched without a parameter", route.path)))?;
            let param = route
                .named_param
                .as_deref()
                .map(|name| (name, value.as_str().to_string()));

            return Ok(Some(RouteMatch { route, param }));
        }

        Ok(None)
    }
}
