#![allow(dead_code)]

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use secrecy::SecretString;
use valet_api::github::{
    GithubClient, GithubError, PullRequestDetails, PullRequestState, WorkflowDispatchInputs,
};
use valet_api::k8s::{ClusterAgent, K8sError};

/// Log lines returned by [`MockClusterAgent::get_pod_logs`].
pub const MOCK_POD_LOGS: &str = "starting server\nlistening on 0.0.0.0:8000\n";

fn namespace_with_name(name: &str) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub struct MockClusterAgent;

#[async_trait]
impl ClusterAgent for MockClusterAgent {
    async fn list_namespaces(&self) -> Result<Vec<Namespace>, K8sError> {
        Ok(vec![
            namespace_with_name("default"),
            namespace_with_name("kube-system"),
        ])
    }

    async fn create_namespace(&self, name: &str) -> Result<Namespace, K8sError> {
        Ok(namespace_with_name(name))
    }

    async fn get_pod_logs(&self, _namespace: &str, _pod_name: &str) -> Result<String, K8sError> {
        Ok(MOCK_POD_LOGS.to_owned())
    }
}

fn kube_forbidden_error() -> kube::Error {
    kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_owned(),
        message: "namespaces is forbidden".to_owned(),
        reason: "Forbidden".to_owned(),
        code: 403,
    })
}

/// Cluster agent whose every operation fails with a Kubernetes API error.
pub struct FailingClusterAgent;

#[async_trait]
impl ClusterAgent for FailingClusterAgent {
    async fn list_namespaces(&self) -> Result<Vec<Namespace>, K8sError> {
        Err(kube_forbidden_error().into())
    }

    async fn create_namespace(&self, _name: &str) -> Result<Namespace, K8sError> {
        Err(kube_forbidden_error().into())
    }

    async fn get_pod_logs(&self, _namespace: &str, _pod_name: &str) -> Result<String, K8sError> {
        Err(kube_forbidden_error().into())
    }
}

/// GitHub client that answers with an open pull request and accepts every
/// workflow dispatch.
pub struct MockGithubClient;

#[async_trait]
impl GithubClient for MockGithubClient {
    async fn read_pull_request(
        &self,
        _token: &SecretString,
        _owner: &str,
        _repo: &str,
        number: i64,
    ) -> Result<PullRequestDetails, GithubError> {
        Ok(PullRequestDetails {
            title: format!("Pull request #{number}"),
            state: PullRequestState::Open,
        })
    }

    async fn dispatch_workflow(
        &self,
        _token: &SecretString,
        _owner: &str,
        _repo: &str,
        _workflow_file_name: &str,
        _git_ref: &str,
        _inputs: WorkflowDispatchInputs,
    ) -> Result<(), GithubError> {
        Ok(())
    }
}
