use actix_web::{
    HttpRequest, HttpResponse, Responder, ResponseError, delete, get,
    http::{StatusCode, header::ContentType},
    post,
    web::{Data, Json, Path},
};
use reqwest::StatusCode as GithubStatusCode;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing_actix_web::RootSpan;
use utoipa::ToSchema;
use valet_config::SerializableSecretString;

use crate::db;
use crate::db::deployments::DeploymentsDbError;
use crate::db::environments::EnvironmentsDbError;
use crate::encryption::{
    DecryptionError, EncryptedSecret, EncryptionError, EncryptionKey, decrypt_secret,
    encrypt_secret,
};
use crate::github::{
    GithubClient, GithubError, PullRequestDetails, PullRequestState, WorkflowDispatchInputs,
};
use crate::routes::deployments::DeploymentResponse;
use crate::routes::{ErrorMessage, ScopeError, extract_cluster_id, extract_project_id};

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("The environment was not found in this project and cluster")]
    EnvironmentNotFound,

    #[error(
        "The base branch '{0}' is not enabled for this preview environment, please enable it in the settings page to continue"
    )]
    BaseBranchNotEnabled(String),

    #[error(
        "The head branch '{0}' is enabled for branch deploys for this preview environment, please disable it in the settings page to continue"
    )]
    DeployBranchEnabled(String),

    #[error("An error occurred while reading the pull request from the GitHub API: {0}")]
    PullRequestFetch(GithubError),

    #[error("Cannot enable a deployment for a closed pull request")]
    PullRequestClosed,

    #[error(
        "Please make sure the preview environment workflow files are present in branch {0} and are up to date with the default branch"
    )]
    WorkflowsMissing(String),

    #[error(
        "Please make sure the workflow files in branch {0} are up to date with the default branch"
    )]
    WorkflowsOutOfDate(String),

    #[error("An internal error occurred while calling the GitHub API: {0}")]
    Github(GithubError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    EnvironmentsDb(#[from] EnvironmentsDbError),

    #[error(transparent)]
    DeploymentsDb(#[from] DeploymentsDbError),

    #[error("The stored GitHub credentials could not be deserialized: {0}")]
    StoredCredentials(#[from] serde_json::Error),

    #[error(transparent)]
    Decryption(#[from] DecryptionError),

    #[error(transparent)]
    Encryption(#[from] EncryptionError),
}

impl EnvironmentError {
    pub fn to_message(&self) -> String {
        match self {
            // Do not leak internal state or stored credentials in error messages
            EnvironmentError::Github(_)
            | EnvironmentError::EnvironmentsDb(_)
            | EnvironmentError::DeploymentsDb(_)
            | EnvironmentError::StoredCredentials(_)
            | EnvironmentError::Decryption(_)
            | EnvironmentError::Encryption(_) => "internal server error".to_string(),
            // Every other message is ok, as they do not divulge sensitive information
            e => e.to_string(),
        }
    }
}

impl ResponseError for EnvironmentError {
    fn status_code(&self) -> StatusCode {
        match self {
            EnvironmentError::EnvironmentNotFound => StatusCode::NOT_FOUND,
            EnvironmentError::BaseBranchNotEnabled(_)
            | EnvironmentError::DeployBranchEnabled(_)
            | EnvironmentError::Scope(_) => StatusCode::BAD_REQUEST,
            EnvironmentError::PullRequestFetch(_)
            | EnvironmentError::PullRequestClosed
            | EnvironmentError::WorkflowsMissing(_)
            | EnvironmentError::WorkflowsOutOfDate(_) => StatusCode::CONFLICT,
            EnvironmentError::Github(_)
            | EnvironmentError::EnvironmentsDb(_)
            | EnvironmentError::DeploymentsDb(_)
            | EnvironmentError::StoredCredentials(_)
            | EnvironmentError::Decryption(_)
            | EnvironmentError::Encryption(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = ErrorMessage {
            error: self.to_message(),
        };
        let body =
            serde_json::to_string(&error_message).expect("failed to serialize error message");
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(body)
    }
}

/// Name of the workflow file the preview environment dispatches, derived from
/// the environment name.
fn preview_workflow_file_name(environment_name: &str) -> String {
    format!("valet_{environment_name}_env.yml")
}

/// Validates a pull request against the environment's branch policy.
///
/// When base branches are listed, the target branch of the pull request must
/// be one of them. Otherwise, a head branch that is already enabled for branch
/// deploys is rejected, since the branch is deployed on push and a preview
/// would duplicate it.
fn check_branch_policy(
    base_branches: &[String],
    deploy_branches: &[String],
    branch_from: &str,
    branch_into: &str,
) -> Result<(), EnvironmentError> {
    if !base_branches.is_empty() {
        if !base_branches.iter().any(|branch| branch == branch_into) {
            return Err(EnvironmentError::BaseBranchNotEnabled(
                branch_into.to_owned(),
            ));
        }
    } else if deploy_branches.iter().any(|branch| branch == branch_from) {
        return Err(EnvironmentError::DeployBranchEnabled(branch_from.to_owned()));
    }

    Ok(())
}

/// Maps a failed workflow dispatch to a caller-facing error.
///
/// GitHub answers 404 when the workflow file does not exist on the dispatch
/// branch and 422 when it exists but is not dispatchable, which for preview
/// environments means the file predates the `workflow_dispatch` trigger.
fn map_dispatch_error(err: GithubError, branch_from: &str) -> EnvironmentError {
    match err {
        GithubError::Status(GithubStatusCode::NOT_FOUND) => {
            EnvironmentError::WorkflowsMissing(branch_from.to_owned())
        }
        GithubError::Status(GithubStatusCode::UNPROCESSABLE_ENTITY) => {
            EnvironmentError::WorkflowsOutOfDate(branch_from.to_owned())
        }
        e => EnvironmentError::Github(e),
    }
}

/// Runs the GitHub side of enabling a pull request.
///
/// Validates the branch policy, reads the live pull request with the
/// environment's decrypted token, rejects closed pull requests, and
/// dispatches the preview workflow on the source branch. Records nothing
/// itself; the caller only creates a deployment once this returns `Ok`, so a
/// rejected or failed dispatch leaves no deployment behind.
async fn trigger_preview_workflow(
    github_client: &dyn GithubClient,
    encryption_key: &EncryptionKey,
    environment: &db::environments::Environment,
    pull_request: &PullRequestRequest,
) -> Result<PullRequestDetails, EnvironmentError> {
    check_branch_policy(
        &environment.base_branches,
        &environment.deploy_branches,
        &pull_request.branch_from,
        &pull_request.branch_into,
    )?;

    let encrypted_token: EncryptedSecret =
        serde_json::from_value(environment.github_token.clone())?;
    let github_token = decrypt_secret(encrypted_token, encryption_key)?;

    let details = github_client
        .read_pull_request(
            &github_token,
            &pull_request.repo_owner,
            &pull_request.repo_name,
            pull_request.number,
        )
        .await
        .map_err(EnvironmentError::PullRequestFetch)?;

    if details.state == PullRequestState::Closed {
        return Err(EnvironmentError::PullRequestClosed);
    }

    let inputs = WorkflowDispatchInputs {
        pr_number: pull_request.number.to_string(),
        pr_title: details.title.clone(),
        pr_branch_from: pull_request.branch_from.clone(),
        pr_branch_into: pull_request.branch_into.clone(),
    };

    github_client
        .dispatch_workflow(
            &github_token,
            &pull_request.repo_owner,
            &pull_request.repo_name,
            &preview_workflow_file_name(&environment.name),
            &pull_request.branch_from,
            inputs,
        )
        .await
        .map_err(|e| map_dispatch_error(e, &pull_request.branch_from))?;

    Ok(details)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateEnvironmentRequest {
    #[schema(example = "preview", required = true)]
    pub name: String,
    #[schema(example = "acme", required = true)]
    pub git_repo_owner: String,
    #[schema(example = "shop", required = true)]
    pub git_repo_name: String,
    #[serde(default)]
    pub base_branches: Vec<String>,
    #[serde(default)]
    pub deploy_branches: Vec<String>,
    #[schema(required = true)]
    pub github_token: SerializableSecretString,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateEnvironmentResponse {
    #[schema(example = 1)]
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadEnvironmentResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub project_id: i64,
    #[schema(example = 1)]
    pub cluster_id: i64,
    #[schema(example = "preview")]
    pub name: String,
    #[schema(example = "acme")]
    pub git_repo_owner: String,
    #[schema(example = "shop")]
    pub git_repo_name: String,
    pub base_branches: Vec<String>,
    pub deploy_branches: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadEnvironmentsResponse {
    pub environments: Vec<ReadEnvironmentResponse>,
}

impl From<db::environments::Environment> for ReadEnvironmentResponse {
    fn from(environment: db::environments::Environment) -> Self {
        Self {
            id: environment.id,
            project_id: environment.project_id,
            cluster_id: environment.cluster_id,
            name: environment.name,
            git_repo_owner: environment.git_repo_owner,
            git_repo_name: environment.git_repo_name,
            base_branches: environment.base_branches,
            deploy_branches: environment.deploy_branches,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PullRequestRequest {
    #[schema(example = 42, required = true)]
    pub number: i64,
    #[schema(example = "acme", required = true)]
    pub repo_owner: String,
    #[schema(example = "shop", required = true)]
    pub repo_name: String,
    #[schema(example = "feature/checkout", required = true)]
    pub branch_from: String,
    #[schema(example = "main", required = true)]
    pub branch_into: String,
}

#[utoipa::path(
    request_body = CreateEnvironmentRequest,
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("cluster_id" = i64, Header, description = "Id of the cluster"),
    ),
    responses(
        (status = 200, description = "Create new environment", body = CreateEnvironmentResponse),
        (status = 400, description = "Bad request", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Environments"
)]
#[post("/environments")]
pub async fn create_environment(
    req: HttpRequest,
    pool: Data<PgPool>,
    encryption_key: Data<EncryptionKey>,
    environment: Json<CreateEnvironmentRequest>,
    root_span: RootSpan,
) -> Result<impl Responder, EnvironmentError> {
    let project_id = extract_project_id(&req)?;
    let cluster_id = extract_cluster_id(&req)?;
    let environment = environment.into_inner();

    root_span.record("project", project_id);
    root_span.record("cluster", cluster_id);

    let encrypted_token = encrypt_secret(environment.github_token.expose_secret(), &encryption_key)?;
    let github_token = serde_json::to_value(&encrypted_token)?;

    let id = db::environments::create_environment(
        &**pool,
        project_id,
        cluster_id,
        &environment.name,
        &environment.git_repo_owner,
        &environment.git_repo_name,
        &environment.base_branches,
        &environment.deploy_branches,
        &github_token,
    )
    .await?;

    let response = CreateEnvironmentResponse { id };

    Ok(Json(response))
}

#[utoipa::path(
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("environment_id" = i64, Path, description = "Id of the environment"),
    ),
    responses(
        (status = 200, description = "Return environment with id = environment_id", body = ReadEnvironmentResponse),
        (status = 404, description = "Environment not found", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Environments"
)]
#[get("/environments/{environment_id}")]
pub async fn read_environment(
    req: HttpRequest,
    pool: Data<PgPool>,
    environment_id: Path<i64>,
    root_span: RootSpan,
) -> Result<impl Responder, EnvironmentError> {
    let project_id = extract_project_id(&req)?;
    let environment_id = environment_id.into_inner();

    root_span.record("project", project_id);

    let response = db::environments::read_environment(&**pool, project_id, environment_id)
        .await?
        .map(ReadEnvironmentResponse::from)
        .ok_or(EnvironmentError::EnvironmentNotFound)?;

    Ok(Json(response))
}

#[utoipa::path(
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("cluster_id" = i64, Header, description = "Id of the cluster"),
    ),
    responses(
        (status = 200, description = "Return all environments", body = ReadEnvironmentsResponse),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Environments"
)]
#[get("/environments")]
pub async fn read_all_environments(
    req: HttpRequest,
    pool: Data<PgPool>,
    root_span: RootSpan,
) -> Result<impl Responder, EnvironmentError> {
    let project_id = extract_project_id(&req)?;
    let cluster_id = extract_cluster_id(&req)?;

    root_span.record("project", project_id);
    root_span.record("cluster", cluster_id);

    let environments: Vec<ReadEnvironmentResponse> =
        db::environments::read_all_environments(&**pool, project_id, cluster_id)
            .await?
            .drain(..)
            .map(ReadEnvironmentResponse::from)
            .collect();

    let response = ReadEnvironmentsResponse { environments };

    Ok(Json(response))
}

#[utoipa::path(
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("environment_id" = i64, Path, description = "Id of the environment"),
    ),
    responses(
        (status = 200, description = "Delete environment with id = environment_id"),
        (status = 404, description = "Environment not found", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Environments"
)]
#[delete("/environments/{environment_id}")]
pub async fn delete_environment(
    req: HttpRequest,
    pool: Data<PgPool>,
    environment_id: Path<i64>,
    root_span: RootSpan,
) -> Result<impl Responder, EnvironmentError> {
    let project_id = extract_project_id(&req)?;
    let environment_id = environment_id.into_inner();

    root_span.record("project", project_id);

    db::environments::delete_environment(&**pool, project_id, environment_id)
        .await?
        .ok_or(EnvironmentError::EnvironmentNotFound)?;

    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    request_body = PullRequestRequest,
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("cluster_id" = i64, Header, description = "Id of the cluster"),
    ),
    responses(
        (status = 200, description = "Enable a preview deployment for the pull request", body = DeploymentResponse),
        (status = 400, description = "Bad request", body = ErrorMessage),
        (status = 404, description = "Environment not found", body = ErrorMessage),
        (status = 409, description = "Pull request can not be deployed", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Environments"
)]
#[post("/environments/pull-request")]
pub async fn enable_pull_request(
    req: HttpRequest,
    pool: Data<PgPool>,
    encryption_key: Data<EncryptionKey>,
    github_client: Data<dyn GithubClient>,
    pull_request: Json<PullRequestRequest>,
    root_span: RootSpan,
) -> Result<impl Responder, EnvironmentError> {
    let project_id = extract_project_id(&req)?;
    let cluster_id = extract_cluster_id(&req)?;
    let pull_request = pull_request.into_inner();

    root_span.record("project", project_id);
    root_span.record("cluster", cluster_id);

    let environment = db::environments::read_environment_by_repo(
        &**pool,
        project_id,
        cluster_id,
        &pull_request.repo_owner,
        &pull_request.repo_name,
    )
    .await?
    .ok_or(EnvironmentError::EnvironmentNotFound)?;

    let details = trigger_preview_workflow(
        github_client.get_ref(),
        &encryption_key,
        &environment,
        &pull_request,
    )
    .await?;

    let deployment = db::deployments::create_deployment(
        &**pool,
        environment.id,
        pull_request.number,
        &pull_request.repo_owner,
        &pull_request.repo_name,
        &details.title,
        &pull_request.branch_from,
        &pull_request.branch_into,
    )
    .await?;

    let response = DeploymentResponse::from(deployment);

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use secrecy::SecretString;
    use std::sync::Mutex;

    use crate::encryption::generate_random_key;

    use super::*;

    fn branches(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn test_encryption_key() -> EncryptionKey {
        EncryptionKey {
            id: 0,
            key: generate_random_key::<32>().unwrap(),
        }
    }

    fn environment_with_token(key: &EncryptionKey) -> db::environments::Environment {
        let encrypted = encrypt_secret("ghs_installation_token", key).unwrap();

        db::environments::Environment {
            id: 7,
            project_id: 1,
            cluster_id: 1,
            name: "preview".to_string(),
            git_repo_owner: "acme".to_string(),
            git_repo_name: "shop".to_string(),
            base_branches: vec![],
            deploy_branches: vec![],
            github_token: serde_json::to_value(&encrypted).unwrap(),
        }
    }

    fn pull_request() -> PullRequestRequest {
        PullRequestRequest {
            number: 42,
            repo_owner: "acme".to_string(),
            repo_name: "shop".to_string(),
            branch_from: "feature/checkout".to_string(),
            branch_into: "main".to_string(),
        }
    }

    struct RecordedDispatch {
        workflow_file_name: String,
        git_ref: String,
        inputs: WorkflowDispatchInputs,
    }

    /// GitHub client whose pull request state and dispatch outcome are fixed
    /// up front, recording every dispatch it receives.
    struct StubGithubClient {
        pull_request_state: PullRequestState,
        dispatch_failure: Option<GithubStatusCode>,
        dispatches: Mutex<Vec<RecordedDispatch>>,
    }

    impl StubGithubClient {
        fn new(pull_request_state: PullRequestState) -> Self {
            Self {
                pull_request_state,
                dispatch_failure: None,
                dispatches: Mutex::new(vec![]),
            }
        }

        fn with_dispatch_failure(mut self, status: GithubStatusCode) -> Self {
            self.dispatch_failure = Some(status);
            self
        }

        fn dispatch_count(&self) -> usize {
            self.dispatches.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GithubClient for StubGithubClient {
        async fn read_pull_request(
            &self,
            _token: &SecretString,
            _owner: &str,
            _repo: &str,
            _number: i64,
        ) -> Result<PullRequestDetails, GithubError> {
            Ok(PullRequestDetails {
                title: "Rework checkout flow".to_string(),
                state: self.pull_request_state,
            })
        }

        async fn dispatch_workflow(
            &self,
            _token: &SecretString,
            _owner: &str,
            _repo: &str,
            workflow_file_name: &str,
            git_ref: &str,
            inputs: WorkflowDispatchInputs,
        ) -> Result<(), GithubError> {
            self.dispatches.lock().unwrap().push(RecordedDispatch {
                workflow_file_name: workflow_file_name.to_owned(),
                git_ref: git_ref.to_owned(),
                inputs,
            });

            match self.dispatch_failure {
                Some(status) => Err(GithubError::Status(status)),
                None => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn closed_pull_request_is_always_rejected() {
        let key = test_encryption_key();
        let environment = environment_with_token(&key);
        let github = StubGithubClient::new(PullRequestState::Closed);

        let result =
            trigger_preview_workflow(&github, &key, &environment, &pull_request()).await;

        assert!(matches!(result, Err(EnvironmentError::PullRequestClosed)));
        // A closed pull request must never reach the workflow dispatch.
        assert_eq!(github.dispatch_count(), 0);
    }

    #[tokio::test]
    async fn missing_workflow_files_abort_before_any_deployment_is_recorded() {
        let key = test_encryption_key();
        let environment = environment_with_token(&key);
        let github = StubGithubClient::new(PullRequestState::Open)
            .with_dispatch_failure(GithubStatusCode::NOT_FOUND);

        let result =
            trigger_preview_workflow(&github, &key, &environment, &pull_request()).await;

        assert!(matches!(
            result,
            Err(EnvironmentError::WorkflowsMissing(branch)) if branch == "feature/checkout"
        ));
    }

    #[tokio::test]
    async fn stale_workflow_files_abort_before_any_deployment_is_recorded() {
        let key = test_encryption_key();
        let environment = environment_with_token(&key);
        let github = StubGithubClient::new(PullRequestState::Open)
            .with_dispatch_failure(GithubStatusCode::UNPROCESSABLE_ENTITY);

        let result =
            trigger_preview_workflow(&github, &key, &environment, &pull_request()).await;

        assert!(matches!(
            result,
            Err(EnvironmentError::WorkflowsOutOfDate(branch)) if branch == "feature/checkout"
        ));
    }

    #[tokio::test]
    async fn successful_dispatch_carries_the_pull_request_fields() {
        let key = test_encryption_key();
        let environment = environment_with_token(&key);
        let github = StubGithubClient::new(PullRequestState::Open);

        let details = trigger_preview_workflow(&github, &key, &environment, &pull_request())
            .await
            .unwrap();

        assert_eq!(details.title, "Rework checkout flow");

        let dispatches = github.dispatches.lock().unwrap();
        assert_eq!(dispatches.len(), 1);
        let dispatch = &dispatches[0];
        assert_eq!(dispatch.workflow_file_name, "valet_preview_env.yml");
        assert_eq!(dispatch.git_ref, "feature/checkout");
        assert_eq!(dispatch.inputs.pr_number, "42");
        assert_eq!(dispatch.inputs.pr_title, "Rework checkout flow");
        assert_eq!(dispatch.inputs.pr_branch_from, "feature/checkout");
        assert_eq!(dispatch.inputs.pr_branch_into, "main");
    }

    #[tokio::test]
    async fn branch_policy_is_enforced_before_any_github_call() {
        let key = test_encryption_key();
        let mut environment = environment_with_token(&key);
        environment.deploy_branches = branches(&["feature/checkout"]);
        let github = StubGithubClient::new(PullRequestState::Open);

        let result =
            trigger_preview_workflow(&github, &key, &environment, &pull_request()).await;

        assert!(matches!(
            result,
            Err(EnvironmentError::DeployBranchEnabled(branch)) if branch == "feature/checkout"
        ));
        assert_eq!(github.dispatch_count(), 0);
    }

    #[test]
    fn base_branch_list_rejects_unlisted_target() {
        let result = check_branch_policy(&branches(&["main"]), &[], "feature", "develop");
        assert!(matches!(
            result,
            Err(EnvironmentError::BaseBranchNotEnabled(branch)) if branch == "develop"
        ));
    }

    #[test]
    fn base_branch_list_accepts_listed_target() {
        let result = check_branch_policy(&branches(&["main", "develop"]), &[], "feature", "main");
        assert!(result.is_ok());
    }

    #[test]
    fn deploy_branch_list_rejects_listed_source() {
        let result = check_branch_policy(&[], &branches(&["staging"]), "staging", "main");
        assert!(matches!(
            result,
            Err(EnvironmentError::DeployBranchEnabled(branch)) if branch == "staging"
        ));
    }

    #[test]
    fn deploy_branch_list_is_ignored_when_base_branches_are_set() {
        let result =
            check_branch_policy(&branches(&["main"]), &branches(&["staging"]), "staging", "main");
        assert!(result.is_ok());
    }

    #[test]
    fn empty_policy_accepts_any_pull_request() {
        let result = check_branch_policy(&[], &[], "feature", "main");
        assert!(result.is_ok());
    }

    #[test]
    fn missing_workflow_maps_to_workflows_missing() {
        let err = map_dispatch_error(
            GithubError::Status(GithubStatusCode::NOT_FOUND),
            "feature",
        );
        assert!(matches!(
            err,
            EnvironmentError::WorkflowsMissing(branch) if branch == "feature"
        ));
    }

    #[test]
    fn undispatchable_workflow_maps_to_workflows_out_of_date() {
        let err = map_dispatch_error(
            GithubError::Status(GithubStatusCode::UNPROCESSABLE_ENTITY),
            "feature",
        );
        assert!(matches!(
            err,
            EnvironmentError::WorkflowsOutOfDate(branch) if branch == "feature"
        ));
    }

    #[test]
    fn other_dispatch_errors_stay_internal() {
        let err = map_dispatch_error(
            GithubError::Status(GithubStatusCode::FORBIDDEN),
            "feature",
        );
        assert!(matches!(err, EnvironmentError::Github(_)));
        assert_eq!(err.to_message(), "internal server error");
    }

    #[test]
    fn workflow_file_name_includes_environment_name() {
        assert_eq!(preview_workflow_file_name("preview"), "valet_preview_env.yml");
    }
}
