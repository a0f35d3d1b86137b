use actix_web::{
    HttpResponse, Responder, ResponseError, delete, get,
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
use crate::db::projects::ProjectsDbError;
use crate::routes::ErrorMessage;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("The project with id {0} was not found")]
    ProjectNotFound(i64),

    #[error(transparent)]
    ProjectsDb(#[from] ProjectsDbError),
}

impl ProjectError {
    pub fn to_message(&self) -> String {
        match self {
            // Do not expose internal database details in error messages
            ProjectError::ProjectsDb(ProjectsDbError::Database(_)) => {
                "internal server error".to_string()
            }
            // Every other message is ok, as they do not divulge sensitive information
            e => e.to_string(),
        }
    }
}

impl ResponseError for ProjectError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProjectError::ProjectsDb(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProjectError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
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
pub struct CreateProjectRequest {
    #[schema(example = "My Project", required = true)]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateProjectResponse {
    #[schema(example = 1)]
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadProjectResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "My Project")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadProjectsResponse {
    pub projects: Vec<ReadProjectResponse>,
}

#[utoipa::path(
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Create new project", body = CreateProjectResponse),
        (status = 400, description = "Bad request", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Projects"
)]
#[post("/projects")]
pub async fn create_project(
    pool: Data<PgPool>,
    project: Json<CreateProjectRequest>,
) -> Result<impl Responder, ProjectError> {
    let project = project.into_inner();

    let id = db::projects::create_project(&**pool, &project.name).await?;

    let response = CreateProjectResponse { id };

    Ok(Json(response))
}

#[utoipa::path(
    params(
        ("project_id" = i64, Path, description = "Id of the project"),
    ),
    responses(
        (status = 200, description = "Return project with id = project_id", body = ReadProjectResponse),
        (status = 404, description = "Project not found", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Projects"
)]
#[get("/projects/{project_id}")]
pub async fn read_project(
    pool: Data<PgPool>,
    project_id: Path<i64>,
    root_span: RootSpan,
) -> Result<impl Responder, ProjectError> {
    let project_id = project_id.into_inner();

    root_span.record("project", project_id);

    let response = db::projects::read_project(&**pool, project_id)
        .await?
        .map(|p| ReadProjectResponse {
            id: p.id,
            name: p.name,
        })
        .ok_or(ProjectError::ProjectNotFound(project_id))?;

    Ok(Json(response))
}

#[utoipa::path(
    params(
        ("project_id" = i64, Path, description = "Id of the project"),
    ),
    responses(
        (status = 200, description = "Delete project with id = project_id"),
        (status = 404, description = "Project not found", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Projects"
)]
#[delete("/projects/{project_id}")]
pub async fn delete_project(
    pool: Data<PgPool>,
    project_id: Path<i64>,
    root_span: RootSpan,
) -> Result<impl Responder, ProjectError> {
    let project_id = project_id.into_inner();

    root_span.record("project", project_id);

    db::projects::delete_project(&**pool, project_id)
        .await?
        .ok_or(ProjectError::ProjectNotFound(project_id))?;

    Ok(HttpResponse::Ok().finish())
}

#[utoipa::path(
    responses(
        (status = 200, description = "Return all projects", body = ReadProjectsResponse),
        (status = 500, description = "Internal server error", body = ErrorMessage),
    ),
    tag = "Projects"
)]
#[get("/projects")]
pub async fn read_all_projects(pool: Data<PgPool>) -> Result<impl Responder, ProjectError> {
    let projects: Vec<ReadProjectResponse> = db::projects::read_all_projects(&**pool)
        .await?
        .drain(..)
        .map(|p| ReadProjectResponse {
            id: p.id,
            name: p.name,
        })
        .collect();

    let response = ReadProjectsResponse { projects };

    Ok(Json(response))
}
