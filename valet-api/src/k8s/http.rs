use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, ListParams, LogParams, PostParams};
use kube::{Client, Config};

use crate::k8s::base::{ClusterAgent, K8sError};

/// [`ClusterAgent`] implementation backed by the Kubernetes API server.
#[derive(Clone)]
pub struct HttpClusterAgent {
    client: Client,
}

impl HttpClusterAgent {
    /// Builds an agent from the inferred configuration, either a local
    /// kubeconfig or the in-cluster service account.
    pub async fn new() -> Result<Self, K8sError> {
        let config = Config::infer().await?;
        let client = Client::try_from(config)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ClusterAgent for HttpClusterAgent {
    async fn list_namespaces(&self) -> Result<Vec<Namespace>, K8sError> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = namespaces.list(&ListParams::default()).await?;

        Ok(list.items)
    }

    async fn create_namespace(&self, name: &str) -> Result<Namespace, K8sError> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let namespace = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_owned()),
                ..Default::default()
            },
            ..Default::default()
        };
        let created = namespaces
            .create(&PostParams::default(), &namespace)
            .await?;

        Ok(created)
    }

    async fn get_pod_logs(&self, namespace: &str, pod_name: &str) -> Result<String, K8sError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let logs = pods.logs(pod_name, &LogParams::default()).await?;

        Ok(logs)
    }
}
