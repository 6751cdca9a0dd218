//! Data API integration tests against a mock backend.

use mockito::{Matcher, Server};
use schmucklicloud::{
    Condition, Error, Operator, QueryOptions, ShareLinkOptions, SortDirection, Sorting,
    StorageClient,
};
use serde_json::json;

fn envelope(status: u16, message: &str, body: serde_json::Value) -> String {
    json!({ "status": status, "message": message, "body": body }).to_string()
}

fn scoped_client(url: String) -> StorageClient {
    let mut storage = StorageClient::with_service_url("app-id", "app-secret", url).unwrap();
    storage.set_bucket(23);
    storage.set_dataset("production");
    storage
}

#[tokio::test]
async fn get_all_reflects_session_scope_in_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_header("appid", "app-id")
        .match_header("appsecret", "app-secret")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("bucket".into(), "23".into()),
            Matcher::UrlEncoded("dataset".into(), "production".into()),
            Matcher::UrlEncoded("container".into(), "messages".into()),
            Matcher::UrlEncoded("order".into(), "".into()),
            Matcher::UrlEncoded("start".into(), "".into()),
            Matcher::UrlEncoded("limit".into(), "".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(200, "Data loaded", json!([{ "id": 1 }, { "id": 2 }])))
        .create_async()
        .await;

    let storage = scoped_client(server.url());
    let result = storage
        .get_all("messages", &QueryOptions::default())
        .await
        .unwrap();

    assert!(result.is_ok());
    assert_eq!(result.data(), Some(&json!([{ "id": 1 }, { "id": 2 }])));
    mock.assert_async().await;
}

#[tokio::test]
async fn get_transmits_filter_and_order_wire_forms() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("filter".into(), r#"[["name","=","Test"]]"#.into()),
            Matcher::UrlEncoded("order".into(), r#"[["created","DESC"]]"#.into()),
            Matcher::UrlEncoded("start".into(), "0".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(200, "Data loaded", json!([{ "name": "Test" }])))
        .create_async()
        .await;

    let storage = scoped_client(server.url());
    let conditions = vec![Condition::new("name", Operator::Eq, "Test")];
    let options = QueryOptions {
        sort: vec![Sorting::new("created", SortDirection::Desc)],
        start: Some(0),
        limit: Some(10),
    };
    let result = storage.get("messages", &conditions, &options).await.unwrap();

    assert!(result.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn get_by_id_unwraps_the_first_row() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("row".into(), "42".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(200, "Data loaded", json!([{ "id": 42, "title": "hi" }])))
        .create_async()
        .await;

    let storage = scoped_client(server.url());
    let result = storage.get_by_id("messages", 42).await.unwrap();

    assert!(result.is_ok());
    assert_eq!(result.data(), Some(&json!({ "id": 42, "title": "hi" })));
}

#[tokio::test]
async fn share_password_joins_read_queries_when_set() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("share_password".into(), "secret".into()),
            Matcher::UrlEncoded("container".into(), "messages".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(200, "Data loaded", json!([])))
        .create_async()
        .await;

    let mut storage = scoped_client(server.url());
    storage.set_share_password("secret");
    storage
        .get_all("messages", &QueryOptions::default())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn insert_posts_stringified_data() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("authtoken", "session-token")
        .match_body(Matcher::PartialJson(json!({
            "bucket": 23,
            "dataset": "production",
            "container": "messages",
            "data": "{\"title\":\"hi\"}",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(201, "Row created", json!({ "id": 7 })))
        .create_async()
        .await;

    let mut storage = scoped_client(server.url());
    storage.set_auth_token("session-token", true);
    let result = storage
        .insert("messages", &json!({ "title": "hi" }))
        .await
        .unwrap();

    assert_eq!(result.status_code(), 201);
    mock.assert_async().await;
}

#[tokio::test]
async fn update_puts_row_and_data() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/")
        .match_body(Matcher::PartialJson(json!({
            "container": "messages",
            "row": 42,
            "data": "{\"title\":\"edited\"}",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(200, "Row updated", json!(null)))
        .create_async()
        .await;

    let storage = scoped_client(server.url());
    let result = storage
        .update("messages", 42, &json!({ "title": "edited" }))
        .await
        .unwrap();

    assert!(result.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_carries_optional_column() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/")
        .match_body(Matcher::PartialJson(json!({
            "container": "messages",
            "row": 42,
            "col": "title",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(200, "Column cleared", json!(null)))
        .create_async()
        .await;

    let storage = scoped_client(server.url());
    let result = storage
        .delete("messages", 42, Some("title"))
        .await
        .unwrap();

    assert!(result.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn metadata_targets_its_own_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/metadata.php")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("bucket".into(), "23".into()),
            Matcher::UrlEncoded("container".into(), "messages".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(200, "Metadata loaded", json!({ "columns": ["id", "title"] })))
        .create_async()
        .await;

    let storage = scoped_client(server.url());
    let result = storage.metadata("messages").await.unwrap();

    assert_eq!(result.data(), Some(&json!({ "columns": ["id", "title"] })));
    mock.assert_async().await;
}

#[tokio::test]
async fn create_share_link_joins_rows_and_defaults_options() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/share.php")
        .match_body(Matcher::PartialJson(json!({
            "container": "messages",
            "rows": "1,2,3",
            "password": "",
            "expires": "",
            "alias": "",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(201, "Share link created", json!({ "link": "abc123" })))
        .create_async()
        .await;

    let storage = scoped_client(server.url());
    let result = storage
        .create_share_link("messages", &[1, 2, 3], &ShareLinkOptions::default())
        .await
        .unwrap();

    assert_eq!(result.data(), Some(&json!({ "link": "abc123" })));
    mock.assert_async().await;
}

#[tokio::test]
async fn update_share_link_sends_protection_settings() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/share.php")
        .match_body(Matcher::PartialJson(json!({
            "share_id": "abc123",
            "rows": "4,5",
            "password": "pw",
            "alias": "spring-photos",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(200, "Share link updated", json!(null)))
        .create_async()
        .await;

    let storage = scoped_client(server.url());
    let options = ShareLinkOptions {
        password: Some("pw".into()),
        expires: None,
        alias: Some("spring-photos".into()),
    };
    let result = storage
        .update_share_link("abc123", &[4, 5], &options)
        .await
        .unwrap();

    assert!(result.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn read_failure_rejects_with_backend_message() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(envelope(500, "Container does not exist", json!(null)))
        .create_async()
        .await;

    let storage = scoped_client(server.url());
    let err = storage
        .get_all("messages", &QueryOptions::default())
        .await
        .unwrap_err();

    match err {
        Error::Api {
            status, message, ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Container does not exist");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn read_not_found_rejects_unlike_session_queries() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(envelope(404, "No rows found", json!(null)))
        .create_async()
        .await;

    let storage = scoped_client(server.url());
    let err = storage
        .get_all("messages", &QueryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 404, .. }));
}

#[tokio::test]
async fn transport_failure_surfaces_as_http_error() {
    // Nothing listens on port 9 (discard).
    let storage = scoped_client("http://127.0.0.1:9".to_string());
    let err = storage
        .get_all("messages", &QueryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)));
}
