use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum K8sError {
    #[error("Error while communicating with the Kubernetes API: {0}")]
    Kube(#[from] kube::Error),

    #[error("Error while inferring the Kubernetes client configuration: {0}")]
    Config(#[from] kube::config::InferConfigError),
}

#[async_trait]
pub trait ClusterAgent: Send + Sync {
    async fn list_namespaces(&self) -> Result<Vec<Namespace>, K8sError>;

    async fn create_namespace(&self, name: &str) -> Result<Namespace, K8sError>;

    /// Returns the buffered logs of a single pod as one string.
    async fn get_pod_logs(&self, namespace: &str, pod_name: &str) -> Result<String, K8sError>;
}
