use serde_json::Value;
use valet_api::routes::namespaces::CreateNamespaceRequest;
use valet_telemetry::init_test_tracing;

use crate::support::mocks::MOCK_POD_LOGS;
use crate::support::test_app::{
    spawn_test_app, spawn_test_app_with_failing_cluster_agent,
    spawn_test_app_without_cluster_agent,
};

mod support;

#[tokio::test(flavor = "multi_thread")]
async fn create_namespace_returns_created_namespace() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app().await;

    // Act
    let request = CreateNamespaceRequest {
        name: "pr-42-shop".to_string(),
    };
    let response = app.create_namespace(1, 1, &request).await;

    // Assert
    assert!(response.status().is_success());
    let body: Value = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert_eq!(body["namespace"]["metadata"]["name"], "pr-42-shop");
}

#[tokio::test(flavor = "multi_thread")]
async fn read_all_namespaces_returns_namespaces() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app().await;

    // Act
    let response = app.read_all_namespaces(1, 1).await;

    // Assert
    assert!(response.status().is_success());
    let body: Value = response
        .json()
        .await
        .expect("failed to deserialize response");
    let namespaces = body["namespaces"]
        .as_array()
        .expect("namespaces is not an array");
    assert_eq!(namespaces.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn read_pod_logs_returns_buffered_logs() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app().await;

    // Act
    let response = app.read_pod_logs(1, 1, "default", "api-0").await;

    // Assert
    assert!(response.status().is_success());
    let body: Value = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert_eq!(body["logs"], MOCK_POD_LOGS);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_scope_headers_return_400() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app().await;

    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/v1/namespaces", app.address))
        .bearer_auth(app.api_key.clone())
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert_eq!(body["error"], "The project id is missing in the request");
}

#[tokio::test(flavor = "multi_thread")]
async fn cluster_agent_failure_is_masked_as_internal_error() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app_with_failing_cluster_agent().await;

    // Act
    let response = app.read_all_namespaces(1, 1).await;

    // Assert
    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );
    let body: Value = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_cluster_agent_is_masked_as_internal_error() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app_without_cluster_agent().await;

    // Act
    let response = app.read_all_namespaces(1, 1).await;

    // Assert
    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );
    let body: Value = response
        .json()
        .await
        .expect("failed to deserialize response");
    assert_eq!(body["error"], "internal server error");
}
