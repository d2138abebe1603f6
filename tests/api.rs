#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use lifedash::api::auth::{AuthError, Authenticator};
    use lifedash::api::{router, AppState};
    use lifedash::db::db::{Database, Db};
    use lifedash::db::users::Users;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use tower::ServiceExt;

    struct ApiTestContext {
        _temp_dir: TempDir,
        db: Database,
        state: AppState,
        app: Router,
        user_id: String,
        token: String,
    }

    impl AsyncTestContext for ApiTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("lifedash.db")).unwrap().into_shared();
            let (user_id, token) = db.with_conn(|conn| {
                let users = Users::new(conn);
                let user = users.create("alice").unwrap();
                let token = users.issue_token(&user.id).unwrap();
                (user.id, token)
            });

            let state = AppState::new(db.clone());
            ApiTestContext {
                _temp_dir: temp_dir,
                db,
                app: router(state.clone()),
                state,
                user_id,
                token,
            }
        }
    }

    impl ApiTestContext {
        async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
            (status, headers, body)
        }

        async fn get(&self, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
            let request = Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
                .body(Body::empty())
                .unwrap();
            self.send(request).await
        }

        async fn post_import(&self, body: impl Into<Body>) -> (StatusCode, Value) {
            let request = Request::builder()
                .method("POST")
                .uri("/import")
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap();
            let (status, _, body) = self.send(request).await;
            (status, serde_json::from_slice(&body).unwrap())
        }
    }

    fn json_body(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_health_is_public(ctx: &mut ApiTestContext) {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _, body) = ctx.send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body), json!({"status": "ok"}));
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_requests_without_credentials_are_unauthorized(ctx: &mut ApiTestContext) {
        for (method, uri) in [("GET", "/export"), ("POST", "/import"), ("GET", "/export?format=xlsx")] {
            let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
            let (status, _, body) = ctx.send(request).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(json_body(&body), json!({"error": "Unauthorized"}));
        }

        let request = Request::builder()
            .uri("/export")
            .header(header::AUTHORIZATION, "Bearer not-a-token")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = ctx.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_session_cookie_is_accepted(ctx: &mut ApiTestContext) {
        let request = Request::builder()
            .uri("/export?modules=health")
            .header(header::COOKIE, format!("theme=dark; session={}", ctx.token))
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = ctx.send(request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_export_json_defaults(ctx: &mut ApiTestContext) {
        ctx.post_import(json!({"health": [{"date": "2026-01-01"}]}).to_string()).await;

        let (status, headers, body) = ctx.get("/export?modules=health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");

        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"lifedash-export-"));
        assert!(disposition.ends_with(".json\""));

        let bundle = json_body(&body);
        let keys: Vec<&str> = bundle.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["metadata", "health"]);
        assert_eq!(bundle["metadata"]["userId"], json!(ctx.user_id));
        assert_eq!(bundle["health"][0]["date"], "2026-01-01");
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_export_text_formats(ctx: &mut ApiTestContext) {
        for (format, content_type, extension) in [
            ("csv", "text/csv; charset=utf-8", ".csv\""),
            ("markdown", "text/markdown; charset=utf-8", ".md\""),
            ("md", "text/markdown; charset=utf-8", ".md\""),
        ] {
            let (status, headers, body) = ctx.get(&format!("/export?format={}", format)).await;

            assert_eq!(status, StatusCode::OK, "format {}", format);
            assert_eq!(headers[header::CONTENT_TYPE], content_type);
            assert!(headers[header::CONTENT_DISPOSITION].to_str().unwrap().ends_with(extension));
            assert!(!body.is_empty());
        }
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_export_validation_errors(ctx: &mut ApiTestContext) {
        let (status, _, body) = ctx.get("/export?format=xlsx&modules=health,recipes").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = json_body(&body);
        assert_eq!(body["error"], "Invalid request");
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["format", "modules"]);

        let (status, _, body) = ctx.get("/export?startDate=2026-02-01&endDate=2026-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["details"][0]["field"], "startDate");
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_export_storage_failure_is_internal(ctx: &mut ApiTestContext) {
        ctx.db.with_conn(|conn| conn.execute("DROP TABLE projects", []).unwrap());

        let (status, _, body) = ctx.get("/export").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(&body), json!({"error": "Internal server error"}));
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_import_report(ctx: &mut ApiTestContext) {
        let bookmarks: Vec<Value> = (0..9)
            .map(|i| json!({"url": format!("https://example.com/{}", i), "title": "t"}))
            .collect();
        let payload = json!({
            "metadata": {"version": 1},
            "trading": [{"symbol": "AAPL"}],
            "bookmarks": bookmarks
        });

        let (status, report) = ctx.post_import(payload.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["results"]["trading"]["created"], 0);
        assert_eq!(report["results"]["trading"]["failed"], 1);
        assert_eq!(report["results"]["bookmarks"]["created"], 9);
        assert_eq!(report["results"]["bookmarks"]["failed"], 0);
        assert_eq!(report["totalCreated"], 9);
        assert_eq!(report["totalFailed"], 1);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_import_rejects_bad_bodies(ctx: &mut ApiTestContext) {
        let (status, body) = ctx.post_import("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "body");

        let (status, body) = ctx.post_import("[1, 2, 3]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request");
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_export_then_import_round_trip(ctx: &mut ApiTestContext) {
        let seed = json!({
            "projects": [{"name": "Garden", "status": "active"}],
            "quickNotes": [{"content": "a"}, {"content": "b"}]
        });
        ctx.post_import(seed.to_string()).await;

        let (_, _, exported) = ctx.get("/export").await;

        let bob_token = ctx.db.with_conn(|conn| {
            let users = Users::new(conn);
            let bob = users.create("bob").unwrap();
            users.issue_token(&bob.id).unwrap()
        });
        let request = Request::builder()
            .method("POST")
            .uri("/import")
            .header(header::AUTHORIZATION, format!("Bearer {}", bob_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(exported))
            .unwrap();
        let (status, _, body) = ctx.send(request).await;

        assert_eq!(status, StatusCode::OK);
        let report = json_body(&body);
        assert_eq!(report["totalCreated"], 3);
        assert_eq!(report["totalFailed"], 0);
        assert_eq!(report["results"].as_object().unwrap().len(), 7);
    }

    struct FixedUser;

    impl Authenticator for FixedUser {
        fn authenticate(&self, headers: &axum::http::HeaderMap) -> Result<String, AuthError> {
            match headers.get("x-user") {
                Some(value) => Ok(value.to_str().unwrap_or_default().to_string()),
                None => Err(AuthError::MissingCredentials),
            }
        }
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_custom_authenticator(ctx: &mut ApiTestContext) {
        let app = router(ctx.state.clone().with_authenticator(Arc::new(FixedUser)));

        let request = Request::builder().uri("/export").header("x-user", "carol").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(json_body(&body)["metadata"]["userId"], "carol");

        let request = Request::builder()
            .uri("/export")
            .header(header::AUTHORIZATION, format!("Bearer {}", ctx.token))
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.oneshot(request).await.unwrap().status(), StatusCode::UNAUTHORIZED);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_revoked_token_needs_cache_clear(ctx: &mut ApiTestContext) {
        let (status, _, _) = ctx.get("/export?modules=health").await;
        assert_eq!(status, StatusCode::OK);

        let token = ctx.token.clone();
        ctx.db.with_conn(|conn| Users::new(conn).revoke_token(&token).unwrap());
        let (status, _, _) = ctx.get("/export?modules=health").await;
        assert_eq!(status, StatusCode::OK);

        ctx.state.clear_caches();
        let (status, _, _) = ctx.get("/export?modules=health").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
