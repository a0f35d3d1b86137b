use actix_web::{
    HttpRequest, HttpResponse, Responder, ResponseError, delete, get,
    http::{StatusCode, header::ContentType},
    post,
    web::{Data, Json, Path},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing_actix_web::RootSpan;
use utoipa::ToSchema;

use crate::db;
use crate::db::clusters::ClustersDbError;
use crate::routes::{ErrorMessage, ScopeError, extract_project_id};

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("The cluster with id {0} was not found")]
    ClusterNotFound(i64),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    ClustersDb(#[from] ClustersDbError),
}

impl ClusterError {
    pub fn to_message(&self) -> String {
        match self {
            // Do not expose internal database details in error messages
            ClusterError::ClustersDb(ClustersDbError::Database(_)) => {
                "internal server error".to_string()
            }
            // Every other message is ok, as they do not divulge sensitive information
            e => e.to_string(),
        }
    }
}

impl ResponseError for ClusterError {
    fn status_code(&self) -> StatusCode {
        match self {
            ClusterError::ClustersDb(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ClusterError::ClusterNotFound(_) => StatusCode::NOT_FOUND,
            ClusterError::Scope(_) => StatusCode::BAD_REQUEST,
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
pub struct CreateClusterRequest {
    #[schema(example = "staging", required = true)]
    pub name: String,
    #[schema(example = "https://kubernetes.example.com:6443", required = true)]
    pub server: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateClusterResponse {
    #[schema(example = 1)]
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadClusterResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub project_id: i64,
    #[schema(example = "staging")]
    pub name: String,
    #[schema(example = "https://kubernetes.example.com:6443")]
    pub server: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadClustersResponse {
    pub clusters: Vec<ReadClusterResponse>,
}

impl From<db::clusters::Cluster> for ReadClusterResponse {
    fn from(cluster: db::clusters::Cluster) -> Self {
        Self {
            id: cluster.id,
            project_id: cluster.project_id,
            name: cluster.name,
            server: cluster.server,
        }
    }
}

#[utoipa::path(
    request_body = CreateClusterRequest,
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
    ),
    responses(
        (status = 200, description = "Create new cluster", body = CreateClusterResponse),
        (status = 400, description = "Bad request", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Clusters"
)]
#[post("/clusters")]
pub async fn create_cluster(
    req: HttpRequest,
    pool: Data<PgPool>,
    cluster: Json<CreateClusterRequest>,
    root_span: RootSpan,
) -> Result<impl Responder, ClusterError> {
    let project_id = extract_project_id(&req)?;
    let cluster = cluster.into_inner();

    root_span.record("project", project_id);

    let id =
        db::clusters::create_cluster(&**pool, project_id, &cluster.name, &cluster.server).await?;

    let response = CreateClusterResponse { id };

    Ok(Json(response))
}

#[utoipa::path(
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("cluster_id" = i64, Path, description = "Id of the cluster"),
    ),
    responses(
        (status = 200, description = "Return cluster with id = cluster_id", body = ReadClusterResponse),
        (status = 404, description = "Cluster not found", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Clusters"
)]
#[get("/clusters/{cluster_id}")]
pub async fn read_cluster(
    req: HttpRequest,
    pool: Data<PgPool>,
    cluster_id: Path<i64>,
    root_span: RootSpan,
) -> Result<impl Responder, ClusterError> {
    let project_id = extract_project_id(&req)?;
    let cluster_id = cluster_id.into_inner();

    root_span.record("project", project_id);
    root_span.record("cluster", cluster_id);

    let response = db::clusters::read_cluster(&**pool, project_id, cluster_id)
        .await?
        .map(ReadClusterResponse::from)
        .ok_or(ClusterError::ClusterNotFound(cluster_id))?;

    Ok(Json(response))
}

#[utoipa::path(
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("cluster_id" = i64, Path, description = "Id of the cluster"),
    ),
    responses(
        (status = 200, description = "Delete cluster with id = cluster_id"),
        (status = 404, description = "Cluster not found", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Clusters"
)]
#[delete("/clusters/{cluster_id}")]
pub async fn delete_cluster(
    req: HttpRequest,
    pool: Data<PgPool>,
    cluster_id: Path<i64>,
    root_span: RootSpan,
) -> Result<impl Responder, ClusterError> {
    let project_id = extract_project_id(&req)?;
    let cluster_id = cluster_id.into_inner();

    root_span.record("project", project_id);
    root_span.record("cluster", cluster_id);

    db::clusters::delete_cluster(&**pool, project_id, cluster_id)
        .await?
        .ok_or(ClusterError::ClusterNotFound(cluster_id))?;

    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
    ),
    responses(
        (status = 200, description = "Return all clusters", body = ReadClustersResponse),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Clusters"
)]
#[get("/clusters")]
pub async fn read_all_clusters(
    req: HttpRequest,
    pool: Data<PgPool>,
    root_span: RootSpan,
) -> Result<impl Responder, ClusterError> {
    let project_id = extract_project_id(&req)?;

    root_span.record("project", project_id);

    let clusters: Vec<ReadClusterResponse> =
        db::clusters::read_all_clusters(&**pool, project_id)
            .await?
            .drain(..)
            .map(ReadClusterResponse::from)
            .collect();

    let response = ReadClustersResponse { clusters };

    Ok(Json(response))
}
