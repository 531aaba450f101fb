//! Tests for routing and dispatch.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use serde::ser::{Error as _, Serializer};
    use serde::Serialize;

    use crate::parser::{parse_request, HttpRequest, Method};
    use crate::router::{Context, Extensions, Matcher, ResponseSink, Route, RouteKey, RouteTable, Router};
    use crate::server::{HttpResponse, StatusCode};

    fn request(method: &str, path: &str) -> HttpRequest {
        let raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        parse_request(raw.as_bytes()).unwrap()
    }

    fn body(response: &HttpResponse) -> &str {
        std::str::from_utf8(&response.body).unwrap()
    }

    fn noop() -> crate::router::HandlerFn {
        Arc::new(|_ctx: &mut Context| {})
    }

    #[test]
    fn test_exact_route_is_case_insensitive() {
        let mut table = RouteTable::new();
        table.insert(Route::new(Method::GET, "/Health", noop()));

        for path in ["/health", "/HEALTH", "/Health", "/hEaLtH"] {
            let found = table.resolve(Method::GET, path).unwrap().expect(path);
            assert_eq!(found.route.path, "/Health");
            assert!(found.param.is_none());
        }
        assert!(table.resolve(Method::POST, "/health").unwrap().is_none());
        assert!(table.resolve(Method::GET, "/health/").unwrap().is_none());
    }

    #[test]
    fn test_named_param_registration() {
        let route = Route::new(Method::GET, "/hash/:id", noop());

        assert!(route.is_parameterized());
        assert_eq!(route.named_param.as_deref(), Some("id"));
        assert_eq!(route.path, r"^/(?i:hash)/(\w+=?)$");
        assert!(matches!(route.matcher, Matcher::Param(_)));
        assert_eq!(route.key(), RouteKey::new(Method::GET, r"^/(?i:hash)/(\w+=?)$"));
    }

    #[test]
    fn test_unsupported_param_shapes_stay_literal() {
        for path in ["/a/b/:id", "/:id", "/a/:id/b", "/a/:id-x"] {
            let route = Route::new(Method::GET, path, noop());
            assert!(!route.is_parameterized(), "{path} should be literal");
            assert!(matches!(route.matcher, Matcher::Exact));
        }

        let mut table = RouteTable::new();
        table.insert(Route::new(Method::GET, "/a/b/:id", noop()));
        assert!(table.resolve(Method::GET, "/a/b/42").unwrap().is_none());
    }

    #[test]
    fn test_param_route_matches_one_trailing_segment() {
        let mut table = RouteTable::new();
        table.insert(Route::new(Method::GET, "/x/:id", noop()));

        let found = table.resolve(Method::GET, "/x/ABC123").unwrap().unwrap();
        assert_eq!(found.param, Some(("id", "ABC123".to_string())));

        let padded = table.resolve(Method::GET, "/x/abc=").unwrap().unwrap();
        assert_eq!(padded.param, Some(("id", "abc=".to_string())));

        assert!(table.resolve(Method::GET, "/x").unwrap().is_none());
        assert!(table.resolve(Method::GET, "/x/").unwrap().is_none());
        assert!(table.resolve(Method::GET, "/x/ABC123/extra").unwrap().is_none());
        assert!(table.resolve(Method::GET, "/x/AB-C").unwrap().is_none());
        assert!(table.resolve(Method::POST, "/x/ABC123").unwrap().is_none());
    }

    #[test]
    fn test_exact_route_wins_over_param_route() {
        let mut table = RouteTable::new();
        table.insert(Route::new(Method::GET, "/hash/:id", noop()));
        table.insert(Route::new(Method::GET, "/hash/stats", noop()));

        let found = table.resolve(Method::GET, "/hash/stats").unwrap().unwrap();
        assert_eq!(found.route.path, "/hash/stats");
        assert!(found.param.is_none());
    }

    #[test]
    fn test_param_routes_scan_in_registration_order() {
        let mut broken = Route::new(Method::GET, "/later/:id", noop());
        broken.matcher = Matcher::Broken("bad pattern".to_string());

        let mut table = RouteTable::new();
        table.insert(Route::new(Method::GET, "/item/:first", noop()));
        table.insert(broken);
        table.insert(Route::new(Method::GET, "/other/:x", noop()));

        // Found before the scan reaches the broken entry.
        let found = table.resolve(Method::GET, "/ITEM/7").unwrap().unwrap();
        assert_eq!(found.param, Some(("first", "7".to_string())));
        // Registered after it, so never reached.
        assert!(table.resolve(Method::GET, "/other/7").is_err());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_reregistration_replaces_in_place() {
        let mut table = RouteTable::new();
        table.insert(Route::new(Method::GET, "/a/:one", noop()));
        table.insert(Route::new(Method::GET, "/b/:two", noop()));
        table.insert(Route::new(Method::GET, "/A/:three", noop()));
        table.insert(Route::new(Method::GET, "/health", noop()));
        table.insert(Route::new(Method::GET, "/HEALTH", noop()));

        assert_eq!(table.len(), 3);
        let found = table.resolve(Method::GET, "/a/1").unwrap().unwrap();
        assert_eq!(found.param, Some(("three", "1".to_string())));
        let order: Vec<_> = table.iter().filter_map(|r| r.named_param.clone()).collect();
        assert_eq!(order, vec!["three".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_later_registration_replaces_handler() {
        let mut router = Router::new();
        router.get("/v", |ctx: &mut Context| ctx.text(StatusCode::Ok, "first"));
        router.get("/V", |ctx: &mut Context| ctx.text(StatusCode::Ok, "second"));

        let response = router.dispatch(request("GET", "/v"));
        assert_eq!(body(&response), "second");
    }

    #[test]
    fn test_dispatch_binds_param() {
        let mut router = Router::new();
        router.get("/health/:id", |ctx: &mut Context| {
            let id = ctx.param("id").to_string();
            let missing = ctx.param("nope").to_string();
            ctx.text(StatusCode::Ok, format!("{id}|{missing}"));
        });

        let response = router.dispatch(request("GET", "/health/abc123"));
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(body(&response), "abc123|");
    }

    #[test]
    fn test_dispatch_matches_percent_decoded_path() {
        let mut router = Router::new();
        router.get("/health", |ctx: &mut Context| ctx.text(StatusCode::Ok, "OK"));
        router.get("/hash/:id", |ctx: &mut Context| {
            let id = ctx.param("id").to_string();
            ctx.text(StatusCode::Ok, id);
        });

        let response = router.dispatch(request("GET", "/h%65alth"));
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(body(&response), "OK");

        let response = router.dispatch(request("GET", "/hash/abc%3D"));
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(body(&response), "abc=");
    }

    #[test]
    fn test_route_keeps_registered_template() {
        let param = Route::new(Method::GET, "/hash/:id", noop());
        assert_eq!(param.template, "/hash/:id");
        assert_ne!(param.path, param.template);

        let exact = Route::new(Method::GET, "/Health", noop());
        assert_eq!(exact.template, "/Health");

        let mut router = Router::new();
        router.get("/hash/:id", |_ctx: &mut Context| {}).get("/health", |_ctx: &mut Context| {});
        let mut templates: Vec<_> = router.routes().iter().map(|r| r.template.as_str()).collect();
        templates.sort_unstable();
        assert_eq!(templates, vec!["/hash/:id", "/health"]);
        assert!(!router.routes().is_empty());
        assert!(Router::new().routes().is_empty());
    }

    #[test]
    fn test_unmatched_request_gets_404_and_no_handler_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        for path in ["/a", "/b/:id"] {
            let calls = Arc::clone(&calls);
            router.any(path, move |_ctx: &mut Context| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        for (method, path) in [("GET", "/c"), ("PUT", "/a"), ("GET", "/b"), ("GET", "/b/1/2")] {
            let response = router.dispatch(request(method, path));
            assert_eq!(response.status, StatusCode::NotFound);
            assert_eq!(body(&response), "Not Found");
            assert_eq!(response.header("Content-Type"), Some("text/plain; charset=utf-8"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_any_registers_get_and_post() {
        let mut router = Router::new();
        router.any("/shutdown", |ctx: &mut Context| ctx.text(StatusCode::Ok, "bye"));

        assert!(router.routes().resolve(Method::GET, "/shutdown").unwrap().is_some());
        assert!(router.routes().resolve(Method::POST, "/shutdown").unwrap().is_some());
        assert!(router.routes().resolve(Method::PUT, "/shutdown").unwrap().is_none());
    }

    #[test]
    fn test_middleware_order_is_pre_handler_post() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let step = |name: &'static str| {
            let trace = Arc::clone(&trace);
            move |_ctx: &mut Context| trace.lock().unwrap().push(name)
        };

        let mut router = Router::new();
        router.after(step("C"));
        router.before(step("A"));
        router.get("/one", step("handler"));
        router.get("/two/:id", step("handler"));
        router.before(step("B"));
        router.after(step("D"));

        for path in ["/one", "/two/9", "/missing"] {
            trace.lock().unwrap().clear();
            router.dispatch(request("GET", path));
            let expected: Vec<&str> = if path == "/missing" {
                vec!["A", "B", "C", "D"]
            } else {
                vec!["A", "B", "handler", "C", "D"]
            };
            assert_eq!(*trace.lock().unwrap(), expected, "order for {path}");
        }

        let pre: Vec<usize> = router.middleware().pre().iter().map(|e| e.order).collect();
        assert_eq!(pre, vec![0, 1]);
    }

    #[test]
    fn test_pre_middleware_write_does_not_short_circuit() {
        let handler_ran = Arc::new(AtomicUsize::new(0));
        let mut router = Router::new();
        router.before(|ctx: &mut Context| ctx.text(StatusCode::Ok, "OK"));
        let ran = Arc::clone(&handler_ran);
        router.get("/health", move |_ctx: &mut Context| {
            ran.fetch_add(1, Ordering::SeqCst);
        });

        let response = router.dispatch(request("GET", "/health"));
        assert_eq!(handler_ran.load(Ordering::SeqCst), 1);
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(body(&response), "OK");
    }

    #[test]
    fn test_post_middleware_can_write() {
        let mut router = Router::new();
        router.after(|ctx: &mut Context| ctx.text(StatusCode::Ok, "OK"));
        router.get("/health", |_ctx: &mut Context| {});

        let response = router.dispatch(request("GET", "/health"));
        assert_eq!(body(&response), "OK");
    }

    #[test]
    fn test_second_write_keeps_first_status() {
        let mut router = Router::new();
        router.get("/twice", |ctx: &mut Context| {
            ctx.text(StatusCode::Created, "one");
            ctx.text(StatusCode::BadRequest, "two");
        });

        let response = router.dispatch(request("GET", "/twice"));
        assert_eq!(response.status, StatusCode::Created);
        assert_eq!(body(&response), "onetwo");
    }

    #[test]
    fn test_silent_handler_yields_empty_200() {
        let mut router = Router::new();
        router.get("/quiet", |_ctx: &mut Context| {});

        let response = router.dispatch(request("GET", "/quiet"));
        assert_eq!(response.status, StatusCode::Ok);
        assert!(response.body.is_empty());
        assert_eq!(response.header("Content-Length"), Some("0"));
    }

    #[derive(Serialize)]
    struct Stat {
        total: u32,
        average: f64,
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("no"))
        }
    }

    #[test]
    fn test_json_response() {
        let mut ctx = Context::new(request("GET", "/stats"));
        ctx.json(StatusCode::Ok, &Stat { total: 2, average: 1.25 });

        let response = ctx.into_response();
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(body(&response), r#"{"total":2,"average":1.25}"#);
    }

    #[test]
    fn test_json_serialization_failure_becomes_500() {
        let mut ctx = Context::new(request("GET", "/stats"));
        ctx.json(StatusCode::Ok, &Unserializable);

        let response = ctx.into_response();
        assert_eq!(response.status, StatusCode::InternalServerError);
        assert_eq!(body(&response), "Internal Server Error");
        assert_eq!(response.header("Content-Type"), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_broken_param_route_is_a_routing_fault() {
        let mut route = Route::new(Method::GET, "/x/:id", noop());
        route.matcher = Matcher::Broken("unclosed group".to_string());
        let mut table = RouteTable::new();
        table.insert(route);

        assert!(table.resolve(Method::GET, "/x/1").is_err());
        // Exact routes still resolve before the scan is reached.
        table.insert(Route::new(Method::GET, "/x/exact", noop()));
        assert!(table.resolve(Method::GET, "/x/exact").unwrap().is_some());
    }

    #[test]
    fn test_sink_ignores_headers_after_commit() {
        let mut sink = ResponseSink::new();
        assert!(!sink.is_written());
        sink.set_header("X-Before", "1");
        sink.write_status(StatusCode::Created);
        sink.set_header("X-After", "1");
        sink.write(b"done");

        assert_eq!(sink.status(), Some(StatusCode::Created));
        assert_eq!(sink.body(), b"done");
        let response = sink.into_response();
        assert_eq!(response.header("X-Before"), Some("1"));
        assert_eq!(response.header("X-After"), None);
    }

    #[test]
    fn test_extensions_hold_one_value_per_type() {
        let mut ext = Extensions::new();
        assert!(ext.insert(5u32).is_none());
        assert_eq!(ext.insert(6u32), Some(5));
        ext.insert("label");
        assert_eq!(ext.get::<u32>(), Some(&6));
        assert_eq!(ext.get::<&str>(), Some(&"label"));
        assert!(ext.get::<u64>().is_none());
    }
}
