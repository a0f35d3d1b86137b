use actix_web::{
    HttpRequest, HttpResponse, Responder, ResponseError, get,
    http::{StatusCode, header::ContentType},
    post,
    web::{Data, Json, Path},
};
use k8s_openapi::api::core::v1::Namespace;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_actix_web::RootSpan;
use utoipa::ToSchema;

use crate::k8s::{ClusterAgent, K8sError};
use crate::routes::{ErrorMessage, ScopeError, extract_cluster_id, extract_project_id};

#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("The cluster agent is not available")]
    ClusterAgentUnavailable,

    #[error(transparent)]
    K8s(#[from] K8sError),
}

impl NamespaceError {
    pub fn to_message(&self) -> String {
        match self {
            // Do not expose cluster internals in error messages
            NamespaceError::ClusterAgentUnavailable | NamespaceError::K8s(_) => {
                "internal server error".to_string()
            }
            e => e.to_string(),
        }
    }
}

impl ResponseError for NamespaceError {
    fn status_code(&self) -> StatusCode {
        match self {
            NamespaceError::Scope(_) => StatusCode::BAD_REQUEST,
            NamespaceError::ClusterAgentUnavailable | NamespaceError::K8s(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
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
pub struct CreateNamespaceRequest {
    #[schema(example = "pr-42-shop", required = true)]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateNamespaceResponse {
    #[schema(value_type = Object)]
    pub namespace: Namespace,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadNamespacesResponse {
    #[schema(value_type = Vec<Object>)]
    pub namespaces: Vec<Namespace>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadPodLogsResponse {
    pub logs: String,
}

#[utoipa::path(
    request_body = CreateNamespaceRequest,
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("cluster_id" = i64, Header, description = "Id of the cluster"),
    ),
    responses(
        (status = 200, description = "Create new namespace", body = CreateNamespaceResponse),
        (status = 400, description = "Bad request", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Namespaces"
)]
#[post("/namespaces")]
pub async fn create_namespace(
    req: HttpRequest,
    cluster_agent: Option<Data<dyn ClusterAgent>>,
    namespace: Json<CreateNamespaceRequest>,
    root_span: RootSpan,
) -> Result<impl Responder, NamespaceError> {
    let project_id = extract_project_id(&req)?;
    let cluster_id = extract_cluster_id(&req)?;
    let namespace = namespace.into_inner();

    root_span.record("project", project_id);
    root_span.record("cluster", cluster_id);

    let cluster_agent = cluster_agent.ok_or(NamespaceError::ClusterAgentUnavailable)?;
    let created = cluster_agent.create_namespace(&namespace.name).await?;

    let response = CreateNamespaceResponse { namespace: created };

    Ok(Json(response))
}

#[utoipa::path(
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("cluster_id" = i64, Header, description = "Id of the cluster"),
    ),
    responses(
        (status = 200, description = "Return all namespaces", body = ReadNamespacesResponse),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Namespaces"
)]
#[get("/namespaces")]
pub async fn read_all_namespaces(
    req: HttpRequest,
    cluster_agent: Option<Data<dyn ClusterAgent>>,
    root_span: RootSpan,
) -> Result<impl Responder, NamespaceError> {
    let project_id = extract_project_id(&req)?;
    let cluster_id = extract_cluster_id(&req)?;

    root_span.record("project", project_id);
    root_span.record("cluster", cluster_id);

    let cluster_agent = cluster_agent.ok_or(NamespaceError::ClusterAgentUnavailable)?;
    let namespaces = cluster_agent.list_namespaces().await?;

    let response = ReadNamespacesResponse { namespaces };

    Ok(Json(response))
}

#[utoipa::path(
    params(
        ("project_id" = i64, Header, description = "Id of the project"),
        ("cluster_id" = i64, Header, description = "Id of the cluster"),
        ("namespace" = String, Path, description = "Name of the namespace"),
        ("pod_name" = String, Path, description = "Name of the pod"),
    ),
    responses(
        (status = 200, description = "Return buffered logs of a pod", body = ReadPodLogsResponse),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Namespaces"
)]
#[get("/namespaces/{namespace}/pods/{pod_name}/logs")]
pub async fn read_pod_logs(
    req: HttpRequest,
    cluster_agent: Option<Data<dyn ClusterAgent>>,
    path: Path<(String, String)>,
    root_span: RootSpan,
) -> Result<impl Responder, NamespaceError> {
    let project_id = extract_project_id(&req)?;
    let cluster_id = extract_cluster_id(&req)?;
    let (namespace, pod_name) = path.into_inner();

    root_span.record("project", project_id);
    root_span.record("cluster", cluster_id);

    let cluster_agent = cluster_agent.ok_or(NamespaceError::ClusterAgentUnavailable)?;
    let logs = cluster_agent.get_pod_logs(&namespace, &pod_name).await?;

    let response = ReadPodLogsResponse { logs };

    Ok(Json(response))
}
