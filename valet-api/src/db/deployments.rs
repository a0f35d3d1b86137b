use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum DeploymentsDbError {
    #[error("Error while interacting with Postgres for deployments: {0}")]
    Database(#[from] sqlx::Error),

    #[error("The deployment status '{0}' read from Postgres is not valid")]
    InvalidStatus(String),
}

/// Lifecycle status of a preview deployment.
///
/// A deployment is created in [`DeploymentStatus::Creating`] by the enable-PR
/// handler and advanced out of band once the CI workflow reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Creating,
    Created,
    Failed,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStatus::Creating => write!(f, "creating"),
            DeploymentStatus::Created => write!(f, "created"),
            DeploymentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl TryFrom<&str> for DeploymentStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "creating" => Ok(DeploymentStatus::Creating),
            "created" => Ok(DeploymentStatus::Created),
            "failed" => Ok(DeploymentStatus::Failed),
            _ => Err(()),
        }
    }
}

/// One record per triggered preview deployment.
#[derive(Debug)]
pub struct Deployment {
    pub id: i64,
    pub environment_id: i64,
    pub namespace: String,
    pub status: DeploymentStatus,
    pub pull_request_number: i64,
    pub repo_owner: String,
    pub repo_name: String,
    pub pr_title: String,
    pub branch_from: String,
    pub branch_into: String,
}

#[derive(Debug, sqlx::FromRow)]
struct DeploymentRow {
    id: i64,
    environment_id: i64,
    namespace: String,
    status: String,
    pull_request_number: i64,
    repo_owner: String,
    repo_name: String,
    pr_title: String,
    branch_from: String,
    branch_into: String,
}

impl TryFrom<DeploymentRow> for Deployment {
    type Error = DeploymentsDbError;

    fn try_from(row: DeploymentRow) -> Result<Self, Self::Error> {
        let status = DeploymentStatus::try_from(row.status.as_str())
            .map_err(|_| DeploymentsDbError::InvalidStatus(row.status.clone()))?;

        Ok(Deployment {
            id: row.id,
            environment_id: row.environment_id,
            namespace: row.namespace,
            status,
            pull_request_number: row.pull_request_number,
            repo_owner: row.repo_owner,
            repo_name: row.repo_name,
            pr_title: row.pr_title,
            branch_from: row.branch_from,
            branch_into: row.branch_into,
        })
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn create_deployment<'c, E>(
    executor: E,
    environment_id: i64,
    pull_request_number: i64,
    repo_owner: &str,
    repo_name: &str,
    pr_title: &str,
    branch_from: &str,
    branch_into: &str,
) -> Result<Deployment, DeploymentsDbError>
where
    E: PgExecutor<'c>,
{
    let row: DeploymentRow = sqlx::query_as(
        r#"
        insert into app.deployments
            (environment_id, namespace, status, pull_request_number,
             repo_owner, repo_name, pr_title, branch_from, branch_into)
        values ($1, '', $2, $3, $4, $5, $6, $7, $8)
        returning id, environment_id, namespace, status, pull_request_number,
                  repo_owner, repo_name, pr_title, branch_from, branch_into
        "#,
    )
    .bind(environment_id)
    .bind(DeploymentStatus::Creating.to_string())
    .bind(pull_request_number)
    .bind(repo_owner)
    .bind(repo_name)
    .bind(pr_title)
    .bind(branch_from)
    .bind(branch_into)
    .fetch_one(executor)
    .await?;

    row.try_into()
}

pub async fn read_deployment<'c, E>(
    executor: E,
    project_id: i64,
    deployment_id: i64,
) -> Result<Option<Deployment>, DeploymentsDbError>
where
    E: PgExecutor<'c>,
{
    let row: Option<DeploymentRow> = sqlx::query_as(
        r#"
        select d.id, d.environment_id, d.namespace, d.status, d.pull_request_number,
               d.repo_owner, d.repo_name, d.pr_title, d.branch_from, d.branch_into
        from app.deployments d
        join app.environments e on d.environment_id = e.id
        where e.project_id = $1 and d.id = $2
        "#,
    )
    .bind(project_id)
    .bind(deployment_id)
    .fetch_optional(executor)
    .await?;

    row.map(Deployment::try_from).transpose()
}

pub async fn read_all_deployments<'c, E>(
    executor: E,
    project_id: i64,
    environment_id: Option<i64>,
) -> Result<Vec<Deployment>, DeploymentsDbError>
where
    E: PgExecutor<'c>,
{
    let rows: Vec<DeploymentRow> = sqlx::query_as(
        r#"
        select d.id, d.environment_id, d.namespace, d.status, d.pull_request_number,
               d.repo_owner, d.repo_name, d.pr_title, d.branch_from, d.branch_into
        from app.deployments d
        join app.environments e on d.environment_id = e.id
        where e.project_id = $1
          and ($2::bigint is null or d.environment_id = $2)
        order by d.id
        "#,
    )
    .bind(project_id)
    .bind(environment_id)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(Deployment::try_from).collect()
}

pub async fn update_deployment_status<'c, E>(
    executor: E,
    project_id: i64,
    deployment_id: i64,
    status: DeploymentStatus,
) -> Result<Option<i64>, DeploymentsDbError>
where
    E: PgExecutor<'c>,
{
    let id = sqlx::query_scalar(
        r#"
        update app.deployments d
        set status = $1, updated_at = now()
        from app.environments e
        where d.environment_id = e.id and e.project_id = $2 and d.id = $3
        returning d.id
        "#,
    )
    .bind(status.to_string())
    .bind(project_id)
    .bind(deployment_id)
    .fetch_optional(executor)
    .await?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            DeploymentStatus::Creating,
            DeploymentStatus::Created,
            DeploymentStatus::Failed,
        ] {
            let text = status.to_string();
            assert_eq!(DeploymentStatus::try_from(text.as_str()), Ok(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(DeploymentStatus::try_from("deleting").is_err());
    }
}
