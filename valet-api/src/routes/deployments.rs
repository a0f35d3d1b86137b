use actix_web::{
    HttpRequest, HttpResponse, Responder, ResponseError, get,
    http::{StatusCode, header::ContentType},
    post,
    web::{Data, Json, Path, Query},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing_actix_web::RootSpan;
use utoipa::{IntoParams, ToSchema};

use crate::db;
use crate::db::deployments::{Deployment, DeploymentStatus, DeploymentsDbError};
use crate::routes::{ErrorMessage, ScopeError, extract_project_id};

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("The deployment with id {0} was not found")]
    DeploymentNotFound(i64),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    DeploymentsDb(#[from] DeploymentsDbError),
}

impl DeploymentError {
    pub fn to_message(&self) -> String {
        match self {
            // Do not expose internal database details in error messages
            DeploymentError::DeploymentsDb(_) => "internal server error".to_string(),
            // Every other message is ok, as they do not divulge sensitive information
            e => e.to_string(),
        }
    }
}

impl ResponseError for DeploymentError {
    fn status_code(&self) -> StatusCode {
        match self {
            DeploymentError::DeploymentsDb(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DeploymentError::DeploymentNotFound(_) => StatusCode::NOT_FOUND,
            DeploymentError::Scope(_) => StatusCode::BAD_REQUEST,
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

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeploymentResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub environment_id: i64,
    #[schema(example = "")]
    pub namespace: String,
    pub status: DeploymentStatus,
    #[schema(example = 42)]
    pub pull_request_number: i64,
    #[schema(example = "acme")]
    pub repo_owner: String,
    #[schema(example = "shop")]
    pub repo_name: String,
    #[schema(example = "Rework checkout flow")]
    pub pr_title: String,
    #[schema(example = "feature/checkout")]
    pub branch_from: String,
    #[schema(example = "main")]
    pub branch_into: String,
}

impl From<Deployment> for DeploymentResponse {
    fn from(deployment: Deployment) -> Self {
        Self {
            id: deployment.id,
            environment_id: deployment.environment_id,
            namespace: deployment.namespace,
            status: deployment.status,
            pull_request_number: deployment.pull_request_number,
            repo_owner: deployment.repo_owner,
            repo_name: deployment.repo_name,
            pr_title: deployment.pr_title,
            branch_from: deployment.branch_from,
            branch_into: deployment.branch_into,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadDeploymentsResponse {
    pub deployments: Vec<DeploymentResponse>,
}

/// Status a caller may move a deployment to.
///
/// `creating` is reserved for newly recorded deployments; only the two
/// terminal states can be set through the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TerminalDeploymentStatus {
    Created,
    Failed,
}

impl From<TerminalDeploymentStatus> for DeploymentStatus {
    fn from(status: TerminalDeploymentStatus) -> Self {
        match status {
            TerminalDeploymentStatus::Created => DeploymentStatus::Created,
            TerminalDeploymentStatus::Failed => DeploymentStatus::Failed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateDeploymentStatusRequest {
    pub status: TerminalDeploymentStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListDeploymentsQuery {
    /// Restricts the listing to a single environment.
    pub environment_id: Option<i64>,
}

#[utoipa::path(
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("deployment_id" = i64, Path, description = "Id of the deployment"),
    ),
    responses(
        (status = 200, description = "Return deployment with id = deployment_id", body = DeploymentResponse),
        (status = 404, description = "Deployment not found", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Deployments"
)]
#[get("/deployments/{deployment_id}")]
pub async fn read_deployment(
    req: HttpRequest,
    pool: Data<PgPool>,
    deployment_id: Path<i64>,
    root_span: RootSpan,
) -> Result<impl Responder, DeploymentError> {
    let project_id = extract_project_id(&req)?;
    let deployment_id = deployment_id.into_inner();

    root_span.record("project", project_id);

    let response = db::deployments::read_deployment(&**pool, project_id, deployment_id)
        .await?
        .map(DeploymentResponse::from)
        .ok_or(DeploymentError::DeploymentNotFound(deployment_id))?;

    Ok(Json(response))
}

#[utoipa::path(
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ListDeploymentsQuery,
    ),
    responses(
        (status = 200, description = "Return all deployments", body = ReadDeploymentsResponse),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Deployments"
)]
#[get("/deployments")]
pub async fn read_all_deployments(
    req: HttpRequest,
    pool: Data<PgPool>,
    query: Query<ListDeploymentsQuery>,
    root_span: RootSpan,
) -> Result<impl Responder, DeploymentError> {
    let project_id = extract_project_id(&req)?;

    root_span.record("project", project_id);

    let deployments: Vec<DeploymentResponse> =
        db::deployments::read_all_deployments(&**pool, project_id, query.environment_id)
            .await?
            .into_iter()
            .map(DeploymentResponse::from)
            .collect();

    let response = ReadDeploymentsResponse { deployments };

    Ok(Json(response))
}

#[utoipa::path(
    request_body = UpdateDeploymentStatusRequest,
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("deployment_id" = i64, Path, description = "Id of the deployment"),
    ),
    responses(
        (status = 200, description = "Update status of deployment with id = deployment_id"),
        (status = 404, description = "Deployment not found", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Deployments"
)]
#[post("/deployments/{deployment_id}/status")]
pub async fn update_deployment_status(
    req: HttpRequest,
    pool: Data<PgPool>,
    deployment_id: Path<i64>,
    request: Json<UpdateDeploymentStatusRequest>,
    root_span: RootSpan,
) -> Result<impl Responder, DeploymentError> {
    let project_id = extract_project_id(&req)?;
    let deployment_id = deployment_id.into_inner();
    let request = request.into_inner();

    root_span.record("project", project_id);

    db::deployments::update_deployment_status(
        &**pool,
        project_id,
        deployment_id,
        request.status.into(),
    )
    .await?
    .ok_or(DeploymentError::DeploymentNotFound(deployment_id))?;

    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_update_accepts_terminal_states() {
        let request: UpdateDeploymentStatusRequest =
            serde_json::from_str(r#"{"status":"created"}"#).unwrap();
        assert_eq!(request.status, TerminalDeploymentStatus::Created);

        let request: UpdateDeploymentStatusRequest =
            serde_json::from_str(r#"{"status":"failed"}"#).unwrap();
        assert_eq!(request.status, TerminalDeploymentStatus::Failed);
    }

    #[test]
    fn status_update_rejects_the_initial_state() {
        let result = serde_json::from_str::<UpdateDeploymentStatusRequest>(
            r#"{"status":"creating"}"#,
        );
        assert!(result.is_err());
    }
}
