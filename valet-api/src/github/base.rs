use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Error while sending a request to the GitHub API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("The GitHub API returned status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    Open,
    Closed,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestDetails {
    pub title: String,
    pub state: PullRequestState,
}

/// Inputs passed to the preview environment workflow on dispatch.
#[derive(Debug, Serialize)]
pub struct WorkflowDispatchInputs {
    pub pr_number: String,
    pub pr_title: String,
    pub pr_branch_from: String,
    pub pr_branch_into: String,
}

#[async_trait]
pub trait GithubClient: Send + Sync {
    /// Reads the metadata of a single pull request.
    async fn read_pull_request(
        &self,
        token: &SecretString,
        owner: &str,
        repo: &str,
        number: i64,
    ) -> Result<PullRequestDetails, GithubError>;

    /// Triggers a `workflow_dispatch` event for the given workflow file on
    /// `git_ref`.
    async fn dispatch_workflow(
        &self,
        token: &SecretString,
        owner: &str,
        repo: &str,
        workflow_file_name: &str,
        git_ref: &str,
        inputs: WorkflowDispatchInputs,
    ) -> Result<(), GithubError>;
}
