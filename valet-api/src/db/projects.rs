use sqlx::PgExecutor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectsDbError {
    #[error("Error while interacting with Postgres for projects: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

pub async fn create_project<'c, E>(executor: E, name: &str) -> Result<i64, ProjectsDbError>
where
    E: PgExecutor<'c>,
{
    let id = sqlx::query_scalar(
        r#"
        insert into app.projects (name)
        values ($1)
        returning id
        "#,
    )
    .bind(name)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

pub async fn read_project<'c, E>(
    executor: E,
    project_id: i64,
) -> Result<Option<Project>, ProjectsDbError>
where
    E: PgExecutor<'c>,
{
    let project = sqlx::query_as(
        r#"
        select id, name
        from app.projects
        where id = $1
        "#,
    )
    .bind(project_id)
    .fetch_optional(executor)
    .await?;

    Ok(project)
}

pub async fn read_all_projects<'c, E>(executor: E) -> Result<Vec<Project>, ProjectsDbError>
where
    E: PgExecutor<'c>,
{
    let projects = sqlx::query_as(
        r#"
        select id, name
        from app.projects
        order by id
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(projects)
}

pub async fn delete_project<'c, E>(
    executor: E,
    project_id: i64,
) -> Result<Option<i64>, ProjectsDbError>
where
    E: PgExecutor<'c>,
{
    let id = sqlx::query_scalar(
        r#"
        delete from app.projects
        where id = $1
        returning id
        "#,
    )
    .bind(project_id)
    .fetch_optional(executor)
    .await?;

    Ok(id)
}
