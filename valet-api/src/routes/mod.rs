use actix_web::HttpRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub mod clusters;
pub mod deployments;
pub mod environments;
pub mod health_check;
pub mod namespaces;
pub mod projects;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorMessage {
    #[schema(example = "an error occurred in the api")]
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("The project id is missing in the request")]
    ProjectIdMissing,

    #[error("The project id in the request is invalid")]
    ProjectIdIllFormed,

    #[error("The cluster id is missing in the request")]
    ClusterIdMissing,

    #[error("The cluster id in the request is invalid")]
    ClusterIdIllFormed,
}

fn extract_project_id(req: &HttpRequest) -> Result<i64, ScopeError> {
    let headers = req.headers();
    let project_id = headers
        .get("project_id")
        .ok_or(ScopeError::ProjectIdMissing)?
        .to_str()
        .map_err(|_| ScopeError::ProjectIdIllFormed)?
        .parse()
        .map_err(|_| ScopeError::ProjectIdIllFormed)?;

    Ok(project_id)
}

fn extract_cluster_id(req: &HttpRequest) -> Result<i64, ScopeError> {
    let headers = req.headers();
    let cluster_id = headers
        .get("cluster_id")
        .ok_or(ScopeError::ClusterIdMissing)?
        .to_str()
        .map_err(|_| ScopeError::ClusterIdIllFormed)?
        .parse()
        .map_err(|_| ScopeError::ClusterIdIllFormed)?;

    Ok(cluster_id)
}
