mod common;

use httpmock::prelude::*;
use modkit::{ClientOptions, TracedClient};
use serde_json::json;
use url::Url;

use common::{ann, bo};
use users_console::contract::client::DirectoryApi;
use users_console::contract::model::Credentials;
use users_console::infra::directory::HttpDirectoryClient;

fn directory_for(server: &MockServer) -> HttpDirectoryClient {
    let base = Url::parse(&server.url("/api")).unwrap();
    HttpDirectoryClient::new(TracedClient::default(), base)
}

#[tokio::test]
async fn list_users_reads_one_page() {
    // Arrange
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/api/users")
            .query_param("page", "2")
            .header_exists("traceparent");
        then.status(200).json_body(json!({
            "page": 2,
            "per_page": 6,
            "total": 12,
            "total_pages": 2,
            "data": [
                {
                    "id": 1,
                    "email": "ann@x.com",
                    "first_name": "Ann",
                    "last_name": "Lee",
                    "avatar": "https://reqres.in/img/faces/1-image.jpg"
                },
                {
                    "id": 2,
                    "email": "bo@x.com",
                    "first_name": "Bo",
                    "last_name": "Kim",
                    "avatar": "https://reqres.in/img/faces/2-image.jpg"
                }
            ],
            "support": { "url": "https://reqres.in/#support-heading", "text": "ignored" }
        }));
    });

    // Act
    let page = directory_for(&server).list_users(2).await.unwrap();

    // Assert
    m.assert();
    assert_eq!(page.data, vec![ann(), bo()]);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page, Some(2));
}

#[tokio::test]
async fn missing_avatar_defaults_to_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/users");
        then.status(200).json_body(json!({
            "total_pages": 1,
            "data": [{ "id": 9, "email": "z@x.com", "first_name": "Z", "last_name": "Q" }]
        }));
    });

    let page = directory_for(&server).list_users(1).await.unwrap();
    assert_eq!(page.data[0].avatar_url, "");
}

#[tokio::test]
async fn list_users_server_error_maps_to_network_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/users");
        then.status(500);
    });

    let err = directory_for(&server).list_users(1).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn malformed_page_is_a_network_error_without_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/users");
        then.status(200).json_body(json!({ "unexpected": true }));
    });

    let err = directory_for(&server).list_users(1).await.unwrap_err();
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn update_puts_the_full_record() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(PUT).path("/api/users/1").json_body(json!({
            "id": 1,
            "first_name": "Ann",
            "last_name": "Lee",
            "email": "ann@x.com",
            "avatar": "https://reqres.in/img/faces/1-image.jpg"
        }));
        then.status(200)
            .json_body(json!({ "updatedAt": "2026-10-19T10:00:00.000Z" }));
    });

    directory_for(&server).update_user(&ann()).await.unwrap();
    m.assert();
}

#[tokio::test]
async fn update_not_found_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/api/users/2");
        then.status(404);
    });

    let err = directory_for(&server).update_user(&bo()).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(DELETE).path("/api/users/2");
        then.status(204);
    });

    directory_for(&server).delete_user(2).await.unwrap();
    m.assert();
}

#[tokio::test]
async fn login_returns_token() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST)
            .path("/api/login")
            .json_body(json!({ "email": "eve.holt@reqres.in", "password": "cityslicka" }));
        then.status(200).json_body(json!({ "token": "QpwL5tke4Pnpja7X4" }));
    });

    let token = directory_for(&server)
        .login(&Credentials::new("eve.holt@reqres.in", "cityslicka"))
        .await
        .unwrap();

    m.assert();
    assert_eq!(token.as_str(), "QpwL5tke4Pnpja7X4");
}

#[tokio::test]
async fn login_rejection_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/login");
        then.status(400).json_body(json!({ "error": "user not found" }));
    });

    let err = directory_for(&server)
        .login(&Credentials::new("nobody@x.com", "pw"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn api_key_header_is_sent_when_configured() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/users/5")
            .header("x-api-key", "reqres-free-v1");
        then.status(204);
    });

    let client = TracedClient::with_options(&ClientOptions {
        default_headers: vec![("x-api-key".into(), "reqres-free-v1".into())],
        ..Default::default()
    })
    .unwrap();
    let directory = HttpDirectoryClient::new(client, Url::parse(&server.url("/api")).unwrap());

    directory.delete_user(5).await.unwrap();
    m.assert();
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let directory = HttpDirectoryClient::new(
        TracedClient::default(),
        Url::parse("http://127.0.0.1:9/api").unwrap(),
    );

    let err = directory.list_users(1).await.unwrap_err();
    assert_eq!(err.status(), None);
}
