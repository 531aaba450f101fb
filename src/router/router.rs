//! Route registration and request dispatch.

use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::parser::{HttpRequest, Method};
use crate::router::context::Context;
use crate::router::handler::HandlerFn;
use crate::router::middleware::MiddlewareChain;
use crate::router::route::Route;
use crate::router::table::RouteTable;
use crate::server::{HttpResponse, StatusCode};

/// Routes plus the middleware wrapped around them.
///
/// Build it once at startup, then hand it to the server. Dispatch only
/// reads it, so it can be shared between requests without a lock.
#[derive(Default)]
pub struct Router {
    table: RouteTable,
    middleware: MiddlewareChain,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `path`.
    ///
    /// `path` is either a literal (matched case-insensitively) or
    /// `/segment/:name`. Registering the same method and path again replaces
    /// the earlier handler.
    pub fn route<F>(&mut self, method: Method, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.table.insert(Route::new(method, path, Arc::new(handler)));
        self
    }

    pub fn get<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.route(Method::GET, path, handler)
    }

    pub fn post<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.route(Method::POST, path, handler)
    }

    /// Register `handler` for both GET and POST.
    pub fn any<F>(&mut self, path: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        let handler: HandlerFn = Arc::new(handler);
        for method in [Method::GET, Method::POST] {
            self.table.insert(Route::new(method, path, Arc::clone(&handler)));
        }
        self
    }

    /// Add a middleware step that runs before the route handler.
    pub fn before<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.middleware.push_pre(Arc::new(middleware));
        self
    }

    /// Add a middleware step that runs after the route handler.
    pub fn after<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.middleware.push_post(Arc::new(middleware));
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    /// Log every registered route.
    pub fn log_routes(&self) {
        if self.table.is_empty() {
            warn!("No endpoints registered");
            return;
        }
        info!("Registered endpoints:");
        for route in self.table.iter() {
            info!("  {} {}", route.method, route.template);
        }
    }

    /// Serve one request.
    ///
    /// Runs every pre-middleware, then the matched handler (or the built-in
    /// not-found handler), then every post-middleware, all against the same
    /// [`Context`]. The handler is not given a timeout.
    pub fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        let mut ctx = Context::new(request);

        for entry in self.middleware.pre() {
            (entry.handler)(&mut ctx);
        }

        let method = ctx.request().method;
        let path = ctx.request().route_path().into_owned();

        match self.table.resolve(method, &path) {
            Ok(Some(found)) => {
                if let Some((name, value)) = found.param {
                    ctx.bind_param(name, value);
                }
                (found.route.handler)(&mut ctx);
            }
            Ok(None) => {
                debug!("No route for {method} {path}");
                not_found(&mut ctx);
            }
            Err(e) => {
                error!("Routing {method} {path} failed: {e}");
                ctx.text(StatusCode::InternalServerError, "Internal Server Error");
            }
        }

        for entry in self.middleware.post() {
            (entry.handler)(&mut ctx);
        }

        ctx.into_response()
    }
}

fn not_found(ctx: &mut Context) {
    ctx.text(StatusCode::NotFound, "Not Found");
}
