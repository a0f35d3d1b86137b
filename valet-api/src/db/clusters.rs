use sqlx::PgExecutor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClustersDbError {
    #[error("Error while interacting with Postgres for clusters: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
pub struct Cluster {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub server: String,
}

pub async fn create_cluster<'c, E>(
    executor: E,
    project_id: i64,
    name: &str,
    server: &str,
) -> Result<i64, ClustersDbError>
where
    E: PgExecutor<'c>,
{
    let id = sqlx::query_scalar(
        r#"
        insert into app.clusters (project_id, name, server)
        values ($1, $2, $3)
        returning id
        "#,
    )
    .bind(project_id)
    .bind(name)
    .bind(server)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

pub async fn read_cluster<'c, E>(
    executor: E,
    project_id: i64,
    cluster_id: i64,
) -> Result<Option<Cluster>, ClustersDbError>
where
    E: PgExecutor<'c>,
{
    let cluster = sqlx::query_as(
        r#"
        select id, project_id, name, server
        from app.clusters
        where project_id = $1 and id = $2
        "#,
    )
    .bind(project_id)
    .bind(cluster_id)
    .fetch_optional(executor)
    .await?;

    Ok(cluster)
}

pub async fn read_all_clusters<'c, E>(
    executor: E,
    project_id: i64,
) -> Result<Vec<Cluster>, ClustersDbError>
where
    E: PgExecutor<'c>,
{
    let clusters = sqlx::query_as(
        r#"
        select id, project_id, name, server
        from app.clusters
        where project_id = $1
        order by id
        "#,
    )
    .bind(project_id)
    .fetch_all(executor)
    .await?;

    Ok(clusters)
}

pub async fn delete_cluster<'c, E>(
    executor: E,
    project_id: i64,
    cluster_id: i64,
) -> Result<Option<i64>, ClustersDbError>
where
    E: PgExecutor<'c>,
{
    let id = sqlx::query_scalar(
        r#"
        delete from app.clusters
        where project_id = $1 and id = $2
        returning id
        "#,
    )
    .bind(project_id)
    .bind(cluster_id)
    .fetch_optional(executor)
    .await?;

    Ok(id)
}
