//! Store Ratings portal library.
//!
//! Role dashboards for admins, store owners and shoppers, plus the JSON API
//! used by the REST client. Exposed as a library so the binary, handler
//! tests and integration tests build the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the portal router with sessions, request tracing and static files.
///
/// Sentry layers are added by the binary so tests run without them.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::config::PortalConfig;

    async fn test_app() -> Router {
        let state = AppState::initialize(PortalConfig::default()).await.unwrap();
        app(state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn with_cookie(uri: &str, cookie: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn session_cookie(headers: &HeaderMap) -> String {
        let raw = headers[header::SET_COOKIE].to_str().unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    async fn api_login(app: &Router, email: &str, password: &str) -> String {
        let body = json!({ "email": email, "password": password });
        let request = json_request("POST", "/api/auth/login", &body, None);
        let (status, _, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, _, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_home_lists_top_rated_store() {
        let app = test_app().await;
        let (status, _, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Gourmet Delights"));
        assert!(body.contains("(6 ratings)"));
    }

    #[tokio::test]
    async fn test_dashboards_redirect_anonymous_visitors() {
        let app = test_app().await;
        for path in ["/admin/dashboard", "/store/dashboard", "/user/dashboard", "/user/stores/1"] {
            let (status, headers, _) = send(&app, get(path)).await;
            assert_eq!(status, StatusCode::SEE_OTHER, "{path}");
            assert_eq!(headers[header::LOCATION], "/login", "{path}");
        }
    }

    #[tokio::test]
    async fn test_login_page_lists_demo_accounts() {
        let app = test_app().await;
        let (status, _, body) = send(&app, get("/login")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("admin@example.com"));
        assert!(body.contains("Store@123"));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let app = test_app().await;
        let request = form("/login", "email=admin%40example.com&password=Wrong%40123", None);
        let (status, _, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid email or password"));
    }

    #[tokio::test]
    async fn test_login_grants_only_own_role_area() {
        let app = test_app().await;
        let request = form("/login", "email=admin%40example.com&password=Admin%40123", None);
        let (status, headers, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/admin/dashboard");
        let cookie = session_cookie(&headers);

        let (status, _, body) = send(&app, with_cookie("/admin/dashboard", &cookie)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Total Users"));

        let (status, headers, _) = send(&app, with_cookie("/user/dashboard", &cookie)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = test_app().await;
        let request = form("/login", "email=user%40example.com&password=User%40123", None);
        let (_, headers, _) = send(&app, request).await;
        let cookie = session_cookie(&headers);

        let (status, headers, _) = send(&app, form("/logout", "", Some(&cookie))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert!(headers[header::LOCATION].to_str().unwrap().starts_with("/login"));

        let (status, _, _) = send(&app, with_cookie("/user/dashboard", &cookie)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_signup_reports_password_mismatch() {
        let app = test_app().await;
        let body = "name=Bartholomew+Fitzgerald+Jones&email=bart%40example.com&address=\
                    &password=Secret%40123&confirm_password=Secret%40124";
        let (status, _, body) = send(&app, form("/signup", body, None)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Passwords do not match"));
    }

    #[tokio::test]
    async fn test_signup_logs_new_user_in() {
        let app = test_app().await;
        let body = "name=Bartholomew+Fitzgerald+Jones&email=bart%40example.com&address=\
                    &password=Secret%40123&confirm_password=Secret%40123";
        let (status, headers, _) = send(&app, form("/signup", body, None)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/user/dashboard");
    }

    #[tokio::test]
    async fn test_api_lists_seeded_stores() {
        let app = test_app().await;
        let (status, _, body) = send(&app, get("/api/stores")).await;
        assert_eq!(status, StatusCode::OK);
        let stores: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(stores.as_array().unwrap().len(), 8);
        assert_eq!(stores[0]["avgRating"], 4.5);

        let (_, _, body) = send(&app, get("/api/stores?q=pet")).await;
        let stores: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(stores.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_api_mutations_need_token() {
        let app = test_app().await;
        let body = json!({ "storeId": 1, "rating": 5 });
        let (status, _, body) = send(&app, json_request("POST", "/api/ratings", &body, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("message"));
    }

    #[tokio::test]
    async fn test_api_rating_upsert_updates_aggregate() {
        let app = test_app().await;
        let token = api_login(&app, "user@example.com", "User@123").await;

        let body = json!({ "storeId": 1, "rating": 2, "comment": "Too pricey" });
        let request = json_request("POST", "/api/ratings", &body, Some(&token));
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);

        let body = json!({ "storeId": 1, "rating": 3 });
        let request = json_request("POST", "/api/ratings", &body, Some(&token));
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);

        let (_, _, body) = send(&app, get("/api/stores/1")).await;
        let store: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(store["totalRatings"], 3);
        assert_eq!(store["avgRating"], 4.0);
    }

    #[tokio::test]
    async fn test_api_rating_out_of_range_is_422() {
        let app = test_app().await;
        let token = api_login(&app, "user@example.com", "User@123").await;
        let body = json!({ "storeId": 1, "rating": 6 });
        let request = json_request("POST", "/api/ratings", &body, Some(&token));
        let (status, _, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["errors"]["rating"], "Please select a rating between 1 and 5");
    }

    #[tokio::test]
    async fn test_api_logout_revokes_only_that_token() {
        let app = test_app().await;
        let first = api_login(&app, "user@example.com", "User@123").await;
        let second = api_login(&app, "user@example.com", "User@123").await;

        let request = json_request("POST", "/api/auth/logout", &json!({}), Some(&first));
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let body = json!({ "storeId": 1, "rating": 5 });
        let request = json_request("POST", "/api/ratings", &body, Some(&first));
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = json_request("POST", "/api/ratings", &body, Some(&second));
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);

        let request = json_request("POST", "/api/auth/logout", &json!({}), Some(&first));
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_api_patch_blank_comment_clears_it() {
        let app = test_app().await;
        let token = api_login(&app, "user@example.com", "User@123").await;

        let body = json!({ "storeId": 1, "rating": 4, "comment": "  Handy  " });
        let request = json_request("POST", "/api/ratings", &body, Some(&token));
        let (status, _, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);
        let rating: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(rating["comment"], "Handy");

        let uri = format!("/api/ratings/{}", rating["id"]);
        let request = json_request("PATCH", &uri, &json!({ "comment": "   " }), Some(&token));
        let (status, _, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        let rating: Value = serde_json::from_str(&body).unwrap();
        assert!(rating.get("comment").is_none());
    }

    #[tokio::test]
    async fn test_api_only_author_may_change_rating() {
        let app = test_app().await;
        let token = api_login(&app, "store@example.com", "Store@123").await;
        // Rating 1 belongs to a seeded shopper.
        let body = json!({ "rating": 1 });
        let request = json_request("PATCH", "/api/ratings/1", &body, Some(&token));
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = api_login(&app, "admin@example.com", "Admin@123").await;
        let request = Request::delete("/api/ratings/1")
            .header(header::AUTHORIZATION, format!("Bearer {admin}"))
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_api_register_refuses_admin_role() {
        let app = test_app().await;
        let body = json!({
            "name": "Bartholomew Fitzgerald Jones",
            "email": "bart@example.com",
            "password": "Secret@123",
            "role": "admin",
        });
        let request = json_request("POST", "/api/auth/register", &body, None);
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_api_store_create_validates_fields() {
        let app = test_app().await;
        let token = api_login(&app, "admin@example.com", "Admin@123").await;
        let body = json!({ "name": "Short", "address": "" });
        let request = json_request("POST", "/api/stores", &body, Some(&token));
        let (status, _, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["errors"]["name"], "Name must be at least 20 characters");
        assert_eq!(body["errors"]["category"], "Please select a category");
        assert_eq!(body["errors"]["ownerId"], "Please select a store owner");
    }

    #[tokio::test]
    async fn test_api_store_mutation_needs_admin() {
        let app = test_app().await;
        let token = api_login(&app, "user@example.com", "User@123").await;
        let request = Request::delete("/api/stores/1")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_api_deleting_user_revokes_tokens() {
        let app = test_app().await;
        let admin = api_login(&app, "admin@example.com", "Admin@123").await;
        let user = api_login(&app, "user@example.com", "User@123").await;

        let (_, _, body) = send(&app, get("/api/users?q=user%40example.com")).await;
        let users: Value = serde_json::from_str(&body).unwrap();
        let id = users[0]["id"].as_i64().unwrap();

        let request = Request::delete(format!("/api/users/{id}"))
            .header(header::AUTHORIZATION, format!("Bearer {admin}"))
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let body = json!({ "storeId": 1, "rating": 5 });
        let request = json_request("POST", "/api/ratings", &body, Some(&user));
        let (status, _, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
