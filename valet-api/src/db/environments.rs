use sqlx::PgExecutor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvironmentsDbError {
    #[error("Error while interacting with Postgres for environments: {0}")]
    Database(#[from] sqlx::Error),
}

/// A preview-environment configuration scoped to (project, cluster, git repo).
///
/// `base_branches` is an allow-list of base branches that accept pull-request
/// previews. `deploy_branches` lists head branches wired for branch-triggered
/// deploys. When `base_branches` is non-empty the deploy-branch list is
/// ignored entirely; the two policy modes are not combined.
#[derive(Debug, sqlx::FromRow)]
pub struct Environment {
    pub id: i64,
    pub project_id: i64,
    pub cluster_id: i64,
    pub name: String,
    pub git_repo_owner: String,
    pub git_repo_name: String,
    pub base_branches: Vec<String>,
    pub deploy_branches: Vec<String>,
    /// Encrypted GitHub installation token, stored as JSON.
    pub github_token: serde_json::Value,
}

#[allow(clippy::too_many_arguments)]
pub async fn create_environment<'c, E>(
    executor: E,
    project_id: i64,
    cluster_id: i64,
    name: &str,
    git_repo_owner: &str,
    git_repo_name: &str,
    base_branches: &[String],
    deploy_branches: &[String],
    github_token: &serde_json::Value,
) -> Result<i64, EnvironmentsDbError>
where
    E: PgExecutor<'c>,
{
    let id = sqlx::query_scalar(
        r#"
        insert into app.environments
            (project_id, cluster_id, name, git_repo_owner, git_repo_name,
             base_branches, deploy_branches, github_token)
        values ($1, $2, $3, $4, $5, $6, $7, $8)
        returning id
        "#,
    )
    .bind(project_id)
    .bind(cluster_id)
    .bind(name)
    .bind(git_repo_owner)
    .bind(git_repo_name)
    .bind(base_branches)
    .bind(deploy_branches)
    .bind(github_token)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

pub async fn read_environment<'c, E>(
    executor: E,
    project_id: i64,
    environment_id: i64,
) -> Result<Option<Environment>, EnvironmentsDbError>
where
    E: PgExecutor<'c>,
{
    let environment = sqlx::query_as(
        r#"
        select id, project_id, cluster_id, name, git_repo_owner, git_repo_name,
               base_branches, deploy_branches, github_token
        from app.environments
        where project_id = $1 and id = $2
        "#,
    )
    .bind(project_id)
    .bind(environment_id)
    .fetch_optional(executor)
    .await?;

    Ok(environment)
}

/// Reads the environment configured for a git repository within a project and
/// cluster scope.
pub async fn read_environment_by_repo<'c, E>(
    executor: E,
    project_id: i64,
    cluster_id: i64,
    git_repo_owner: &str,
    git_repo_name: &str,
) -> Result<Option<Environment>, EnvironmentsDbError>
where
    E: PgExecutor<'c>,
{
    let environment = sqlx::query_as(
        r#"
        select id, project_id, cluster_id, name, git_repo_owner, git_repo_name,
               base_branches, deploy_branches, github_token
        from app.environments
        where project_id = $1
          and cluster_id = $2
          and git_repo_owner = $3
          and git_repo_name = $4
        "#,
    )
    .bind(project_id)
    .bind(cluster_id)
    .bind(git_repo_owner)
    .bind(git_repo_name)
    .fetch_optional(executor)
    .await?;

    Ok(environment)
}

pub async fn read_all_environments<'c, E>(
    executor: E,
    project_id: i64,
    cluster_id: i64,
) -> Result<Vec<Environment>, EnvironmentsDbError>
where
    E: PgExecutor<'c>,
{
    let environments = sqlx::query_as(
        r#"
        select id, project_id, cluster_id, name, git_repo_owner, git_repo_name,
               base_branches, deploy_branches, github_token
        from app.environments
        where project_id = $1 and cluster_id = $2
        order by id
        "#,
    )
    .bind(project_id)
    .bind(cluster_id)
    .fetch_all(executor)
    .await?;

    Ok(environments)
}

pub async fn delete_environment<'c, E>(
    executor: E,
    project_id: i64,
    environment_id: i64,
) -> Result<Option<i64>, EnvironmentsDbError>
where
    E: PgExecutor<'c>,
{
    let id = sqlx::query_scalar(
        r#"
        delete from app.environments
        where project_id = $1 and id = $2
        returning id
        "#,
    )
    .bind(project_id)
    .bind(environment_id)
    .fetch_optional(executor)
    .await?;

    Ok(id)
}
