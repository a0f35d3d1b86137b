use valet_telemetry::init_test_tracing;

use crate::support::test_app::spawn_test_app;

mod support;

#[tokio::test(flavor = "multi_thread")]
async fn request_without_bearer_token_is_rejected() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app().await;

    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/v1/namespaces", app.address))
        .header("project_id", 1)
        .header("cluster_id", 1)
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn request_with_invalid_bearer_token_is_rejected() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app().await;

    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/v1/namespaces", app.address))
        .bearer_auth("definitely-not-a-valid-key")
        .header("project_id", 1)
        .header("cluster_id", 1)
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn request_with_valid_bearer_token_is_accepted() {
    init_test_tracing();
    // Arrange
    let app = spawn_test_app().await;

    // Act
    let response = app.read_all_namespaces(1, 1).await;

    // Assert
    assert!(response.status().is_success());
}
