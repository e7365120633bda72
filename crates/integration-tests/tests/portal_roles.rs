//! HTML portal flows driven by a cookie-keeping HTTP client.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode, header};
use store_ratings_core::StoreId;
use store_ratings_integration_tests::{ADMIN, SHOPPER, STORE_OWNER, TestServer};

fn location(response: &reqwest::Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

async fn login(server: &TestServer, browser: &Client, account: (&str, &str)) -> String {
    let response = browser
        .post(server.url("/login"))
        .form(&[("email", account.0), ("password", account.1)])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    location(&response)
}

async fn page(server: &TestServer, browser: &Client, path: &str) -> (StatusCode, String) {
    let response = browser.get(server.url(path)).send().await.unwrap();
    let status = response.status();
    (status, response.text().await.unwrap())
}

#[tokio::test]
async fn test_each_role_lands_on_its_dashboard() {
    let server = TestServer::start().await;
    let cases = [
        (ADMIN, "/admin/dashboard", "Total Stores"),
        (STORE_OWNER, "/store/dashboard", "Tech Gadgets Plus"),
        (SHOPPER, "/user/dashboard", "Welcome back"),
    ];

    for (account, dashboard, marker) in cases {
        let browser = server.browser();
        assert_eq!(login(&server, &browser, account).await, dashboard);

        let (status, body) = page(&server, &browser, dashboard).await;
        assert_eq!(status, StatusCode::OK, "{dashboard}");
        assert!(body.contains(marker), "{dashboard} should mention {marker}");
    }
}

#[tokio::test]
async fn test_other_role_areas_redirect_to_login() {
    let server = TestServer::start().await;
    let browser = server.browser();
    login(&server, &browser, STORE_OWNER).await;

    for path in ["/admin/dashboard", "/admin/users", "/user/dashboard", "/user/stores"] {
        let response = browser.get(server.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/login", "{path}");
    }
}

#[tokio::test]
async fn test_logged_in_visitor_skips_login_page() {
    let server = TestServer::start().await;
    let browser = server.browser();
    login(&server, &browser, SHOPPER).await;

    let response = browser.get(server.url("/login")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/user/dashboard");
}

#[tokio::test]
async fn test_logout_clears_session_and_api_token() {
    let server = TestServer::start().await;
    let browser = server.browser();
    login(&server, &browser, SHOPPER).await;

    let response = browser.post(server.url("/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/login"));

    let response = browser.get(server.url("/user/dashboard")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_shopper_rates_store_through_form() {
    let server = TestServer::start().await;
    let browser = server.browser();
    login(&server, &browser, SHOPPER).await;

    let (status, body) = page(&server, &browser, "/user/stores/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Rate this store"));

    let response = browser
        .post(server.url("/user/stores/1"))
        .form(&[("rating", "3"), ("comment", "Fine for cables.")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/user/stores/1"));

    let (_, body) = page(&server, &browser, "/user/stores/1").await;
    assert!(body.contains("Update your rating"));
    assert!(body.contains("Fine for cables."));

    let store = server.client().stores().get(StoreId::new(1)).await.unwrap();
    assert_eq!(store.total_ratings, 3);
    assert!((store.avg_rating - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_rating_form_rejects_missing_value() {
    let server = TestServer::start().await;
    let browser = server.browser();
    login(&server, &browser, SHOPPER).await;

    let response = browser
        .post(server.url("/user/stores/1"))
        .form(&[("rating", ""), ("comment", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let store = server.client().stores().get(StoreId::new(1)).await.unwrap();
    assert_eq!(store.total_ratings, 2);
}

#[tokio::test]
async fn test_admin_deletes_store_from_portal() {
    let server = TestServer::start().await;
    let browser = server.browser();
    login(&server, &browser, ADMIN).await;

    let response = browser
        .post(server.url("/admin/stores/8/delete"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/admin/stores"));

    let stores = server.client().stores().list(None).await.unwrap();
    assert_eq!(stores.len(), 7);
    assert!(stores.iter().all(|s| s.id != StoreId::new(8)));
}

#[tokio::test]
async fn test_admin_cannot_delete_own_account() {
    let server = TestServer::start().await;
    let browser = server.browser();
    login(&server, &browser, ADMIN).await;

    let admin = server.client_as(ADMIN).await;
    let me = admin.auth().current_user().unwrap();

    let path = format!("/admin/users/{}/delete", me.id);
    let response = browser.post(server.url(&path)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).contains("error="));

    assert!(admin.users().get(me.id).await.is_ok());
}
