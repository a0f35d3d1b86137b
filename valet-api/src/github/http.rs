use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::GithubConfig;
use crate::github::base::{
    GithubClient, GithubError, PullRequestDetails, WorkflowDispatchInputs,
};

const USER_AGENT: &str = "valet-api";
const GITHUB_JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// [`GithubClient`] implementation backed by the GitHub REST API.
pub struct HttpGithubClient {
    client: Client,
    api_base_url: String,
}

impl HttpGithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self, GithubError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[derive(Debug, Serialize)]
struct DispatchWorkflowBody {
    r#ref: String,
    inputs: WorkflowDispatchInputs,
}

#[async_trait]
impl GithubClient for HttpGithubClient {
    async fn read_pull_request(
        &self,
        token: &SecretString,
        owner: &str,
        repo: &str,
        number: i64,
    ) -> Result<PullRequestDetails, GithubError> {
        let url = format!(
            "{}/repos/{owner}/{repo}/pulls/{number}",
            self.api_base_url
        );

        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose_secret())
            .header(reqwest::header::ACCEPT, GITHUB_JSON_MEDIA_TYPE)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GithubError::Status(response.status()));
        }

        let details = response.json().await?;

        Ok(details)
    }

    async fn dispatch_workflow(
        &self,
        token: &SecretString,
        owner: &str,
        repo: &str,
        workflow_file_name: &str,
        git_ref: &str,
        inputs: WorkflowDispatchInputs,
    ) -> Result<(), GithubError> {
        let url = format!(
            "{}/repos/{owner}/{repo}/actions/workflows/{workflow_file_name}/dispatches",
            self.api_base_url
        );

        let body = DispatchWorkflowBody {
            r#ref: git_ref.to_owned(),
            inputs,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .header(reqwest::header::ACCEPT, GITHUB_JSON_MEDIA_TYPE)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GithubError::Status(response.status()));
        }

        Ok(())
    }
}
