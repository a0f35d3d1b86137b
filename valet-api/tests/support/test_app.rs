#![allow(dead_code)]

use rand::random_range;
use reqwest::{IntoUrl, RequestBuilder};
use std::io;
use std::net::TcpListener;
use std::sync::Arc;
use valet_api::routes::namespaces::CreateNamespaceRequest;
use valet_api::{
    config::ApiConfig,
    encryption::{self, generate_random_key},
    github::GithubClient,
    k8s::ClusterAgent,
    startup::{get_connection_pool, run},
};
use valet_config::{Environment, load_config};

use crate::support::mocks::{FailingClusterAgent, MockClusterAgent, MockGithubClient};

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub api_key: String,
    server_handle: tokio::task::JoinHandle<io::Result<()>>,
}

impl TestApp {
    fn get_authenticated<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        self.api_client.get(url).bearer_auth(self.api_key.clone())
    }

    fn post_authenticated<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        self.api_client.post(url).bearer_auth(self.api_key.clone())
    }

    pub async fn create_namespace(
        &self,
        project_id: i64,
        cluster_id: i64,
        namespace: &CreateNamespaceRequest,
    ) -> reqwest::Response {
        self.post_authenticated(format!("{}/v1/namespaces", &self.address))
            .header("project_id", project_id)
            .header("cluster_id", cluster_id)
            .json(namespace)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn read_all_namespaces(&self, project_id: i64, cluster_id: i64) -> reqwest::Response {
        self.get_authenticated(format!("{}/v1/namespaces", &self.address))
            .header("project_id", project_id)
            .header("cluster_id", cluster_id)
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn read_pod_logs(
        &self,
        project_id: i64,
        cluster_id: i64,
        namespace: &str,
        pod_name: &str,
    ) -> reqwest::Response {
        self.get_authenticated(format!(
            "{}/v1/namespaces/{namespace}/pods/{pod_name}/logs",
            &self.address
        ))
        .header("project_id", project_id)
        .header("cluster_id", cluster_id)
        .send()
        .await
        .expect("failed to execute request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_test_app_with_agent(Some(Arc::new(MockClusterAgent) as Arc<dyn ClusterAgent>)).await
}

pub async fn spawn_test_app_without_cluster_agent() -> TestApp {
    spawn_test_app_with_agent(None).await
}

pub async fn spawn_test_app_with_failing_cluster_agent() -> TestApp {
    spawn_test_app_with_agent(Some(Arc::new(FailingClusterAgent) as Arc<dyn ClusterAgent>)).await
}

async fn spawn_test_app_with_agent(cluster_agent: Option<Arc<dyn ClusterAgent>>) -> TestApp {
    // We set the environment to dev.
    Environment::Dev.set();

    let base_address = "127.0.0.1";
    let listener =
        TcpListener::bind(format!("{base_address}:0")).expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let config = load_config::<ApiConfig>().expect("Failed to read configuration");

    // The pool is created lazily, no database is needed until a route touches it.
    let connection_pool = get_connection_pool(&config.database);

    let key = generate_random_key::<32>().expect("failed to generate random key");
    let encryption_key = encryption::EncryptionKey { id: 0, key };

    // We choose a random API key from the ones configured to show that rotation works.
    let api_key_index = random_range(0..config.api_keys.len());
    let api_key = config.api_keys[api_key_index].clone();

    let github_client = Arc::new(MockGithubClient) as Arc<dyn GithubClient>;

    let server = run(
        config,
        listener,
        connection_pool,
        encryption_key,
        cluster_agent,
        github_client,
    )
    .await
    .expect("failed to bind address");

    let server_handle = tokio::spawn(server);

    TestApp {
        address: format!("http://{base_address}:{port}"),
        api_client: reqwest::Client::new(),
        api_key,
        server_handle,
    }
}
