use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn repo(token: &str) -> RepoRef {
    RepoRef::parse(token).unwrap()
}

fn client_for(server: &MockServer) -> GithubClient {
    GithubClient::new(&server.uri(), "test-token").unwrap()
}

#[test]
fn test_new_rejects_empty_token() {
    assert!(matches!(
        GithubClient::new(DEFAULT_API_URL, "  "),
        Err(GithubClientError::MissingToken)
    ));
}

#[test]
fn test_new_rejects_invalid_url() {
    assert!(matches!(
        GithubClient::new("not a url", "token"),
        Err(GithubClientError::InvalidUrl { .. })
    ));
    assert!(matches!(
        GithubClient::new("ftp://example.com", "token"),
        Err(GithubClientError::InvalidUrl { .. })
    ));
}

#[test]
fn test_repo_url_trims_trailing_slash() {
    let client = GithubClient::new("https://ghe.example.com/api/v3/", "token").unwrap();

    assert_eq!(
        client.repo_url(&repo("org1/repo1"), "/properties/values"),
        "https://ghe.example.com/api/v3/repos/org1/repo1/properties/values"
    );
}

#[tokio::test]
async fn test_fetch_repository_maps_custom_properties() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/org1/repo1"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("X-GitHub-Api-Version", API_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "repo1",
            "owner": { "login": "org1" },
            "custom_properties": {
                "team": "backend",
                "cost_center": 42,
                "tags": ["a", "b"]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client_for(&server)
        .fetch_repository(&repo("org1/repo1"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(snapshot.repo(), &repo("org1/repo1"));
    let properties = snapshot.custom_properties();
    assert_eq!(
        properties.get("team"),
        Some(&PropertyValue::Text("backend".into()))
    );
    assert_eq!(properties.get("cost_center"), Some(&PropertyValue::Other));
    assert_eq!(properties.get("tags"), Some(&PropertyValue::Other));
}

#[tokio::test]
async fn test_fetch_repository_without_custom_properties_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/org1/repo1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "repo1" })))
        .mount(&server)
        .await;

    let snapshot = client_for(&server)
        .fetch_repository(&repo("org1/repo1"))
        .await
        .unwrap()
        .unwrap();

    assert!(snapshot.custom_properties().is_empty());
}

#[tokio::test]
async fn test_fetch_repository_not_found_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/org1/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch_repository(&repo("org1/missing"))
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_fetch_repository_server_error_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/org1/repo1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_repository(&repo("org1/repo1"))
        .await
        .unwrap_err();

    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_repository_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/org1/repo1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_repository(&repo("org1/repo1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn test_write_custom_properties_sends_property_values() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/repos/org1/repo1/properties/values"))
        .and(header("Authorization", "Bearer test-token"))
        .and(body_json(json!({
            "properties": [
                { "property_name": "team", "value": "backend" }
            ]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let properties = BTreeMap::from([(PropertyName::new("team").unwrap(), "backend".to_string())]);

    client_for(&server)
        .write_custom_properties(&repo("org1/repo1"), &properties)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_write_custom_properties_failure_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/repos/org1/repo1/properties/values"))
        .respond_with(ResponseTemplate::new(422).set_body_string("Invalid value"))
        .mount(&server)
        .await;

    let properties = BTreeMap::from([(PropertyName::new("team").unwrap(), "nope".to_string())]);

    let err = client_for(&server)
        .write_custom_properties(&repo("org1/repo1"), &properties)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 422, .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let client = GithubClient::new("http://127.0.0.1:1", "token").unwrap();

    let err = client
        .fetch_repository(&repo("org1/repo1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Transport { .. }));
}
