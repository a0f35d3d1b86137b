use std::{net::TcpListener, sync::Arc};

use actix_web::{App, HttpServer, dev::Server, web};
use actix_web_httpauth::middleware::HttpAuthentication;
use aws_lc_rs::aead::{AES_256_GCM, RandomizedNonceKey};
use base64::{Engine, prelude::BASE64_STANDARD};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::warn;
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use valet_config::shared::{IntoConnectOptions, PgConnectionConfig};

use crate::{
    authentication::auth_validator,
    config::ApiConfig,
    encryption,
    github::{GithubClient, http::HttpGithubClient},
    k8s::{ClusterAgent, http::HttpClusterAgent},
    routes::{
        ErrorMessage,
        clusters::{
            CreateClusterRequest, CreateClusterResponse, ReadClusterResponse,
            ReadClustersResponse, create_cluster, delete_cluster, read_all_clusters, read_cluster,
        },
        deployments::{
            DeploymentResponse, ReadDeploymentsResponse, UpdateDeploymentStatusRequest,
            read_all_deployments, read_deployment, update_deployment_status,
        },
        environments::{
            CreateEnvironmentRequest, CreateEnvironmentResponse, PullRequestRequest,
            ReadEnvironmentResponse, ReadEnvironmentsResponse, create_environment,
            delete_environment, enable_pull_request, read_all_environments, read_environment,
        },
        health_check::health_check,
        namespaces::{
            CreateNamespaceRequest, CreateNamespaceResponse, ReadNamespacesResponse,
            ReadPodLogsResponse, create_namespace, read_all_namespaces, read_pod_logs,
        },
        projects::{
            CreateProjectRequest, CreateProjectResponse, ReadProjectResponse,
            ReadProjectsResponse, create_project, delete_project, read_all_projects, read_project,
        },
    },
    span_builder::ApiRootSpanBuilder,
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: ApiConfig) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&config.database);

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let key_bytes = BASE64_STANDARD.decode(&config.encryption_key.key)?;
        let key = RandomizedNonceKey::new(&AES_256_GCM, &key_bytes)?;
        let encryption_key = encryption::EncryptionKey {
            id: config.encryption_key.id,
            key,
        };

        let cluster_agent = match HttpClusterAgent::new().await {
            Ok(agent) => Some(Arc::new(agent) as Arc<dyn ClusterAgent>),
            Err(e) => {
                warn!(
                    "Failed to create the cluster agent: {}. Running without Kubernetes support.",
                    e
                );
                None
            }
        };

        let github_client = Arc::new(HttpGithubClient::new(&config.github)?) as Arc<dyn GithubClient>;

        let server = run(
            config,
            listener,
            connection_pool,
            encryption_key,
            cluster_agent,
            github_client,
        )
        .await?;

        Ok(Self { port, server })
    }

    pub async fn migrate_database(config: PgConnectionConfig) -> Result<(), anyhow::Error> {
        let connection_pool = get_connection_pool(&config);

        sqlx::migrate!("./migrations").run(&connection_pool).await?;

        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(config: &PgConnectionConfig) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(config.with_db())
}

// The cluster agent is wrapped in an option because creating it requires a
// reachable kubeconfig or in-cluster environment, neither of which exists in
// tests or in deployments that only use the GitHub surface.
pub async fn run(
    config: ApiConfig,
    listener: TcpListener,
    connection_pool: PgPool,
    encryption_key: encryption::EncryptionKey,
    cluster_agent: Option<Arc<dyn ClusterAgent>>,
    github_client: Arc<dyn GithubClient>,
) -> Result<Server, anyhow::Error> {
    let config = web::Data::new(config);
    let connection_pool = web::Data::new(connection_pool);
    let encryption_key = web::Data::new(encryption_key);
    let cluster_agent: Option<web::Data<dyn ClusterAgent>> = cluster_agent.map(Into::into);
    let github_client: web::Data<dyn GithubClient> = web::Data::from(github_client);

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::routes::health_check::health_check,
            crate::routes::projects::create_project,
            crate::routes::projects::read_project,
            crate::routes::projects::delete_project,
            crate::routes::projects::read_all_projects,
            crate::routes::clusters::create_cluster,
            crate::routes::clusters::read_cluster,
            crate::routes::clusters::delete_cluster,
            crate::routes::clusters::read_all_clusters,
            crate::routes::environments::create_environment,
            crate::routes::environments::read_environment,
            crate::routes::environments::read_all_environments,
            crate::routes::environments::delete_environment,
            crate::routes::environments::enable_pull_request,
            crate::routes::deployments::read_deployment,
            crate::routes::deployments::read_all_deployments,
            crate::routes::deployments::update_deployment_status,
            crate::routes::namespaces::create_namespace,
            crate::routes::namespaces::read_all_namespaces,
            crate::routes::namespaces::read_pod_logs,
        ),
        components(schemas(
            ErrorMessage,
            CreateProjectRequest,
            CreateProjectResponse,
            ReadProjectResponse,
            ReadProjectsResponse,
            CreateClusterRequest,
            CreateClusterResponse,
            ReadClusterResponse,
            ReadClustersResponse,
            CreateEnvironmentRequest,
            CreateEnvironmentResponse,
            ReadEnvironmentResponse,
            ReadEnvironmentsResponse,
            PullRequestRequest,
            DeploymentResponse,
            ReadDeploymentsResponse,
            UpdateDeploymentStatusRequest,
            CreateNamespaceRequest,
            CreateNamespaceResponse,
            ReadNamespacesResponse,
            ReadPodLogsResponse,
        ))
    )]
    struct ApiDoc;

    let openapi = ApiDoc::openapi();

    let server = HttpServer::new(move || {
        let tracing_logger = TracingLogger::<ApiRootSpanBuilder>::new();
        let authentication = HttpAuthentication::bearer(auth_validator);
        let app = App::new()
            .wrap(
                sentry_actix::Sentry::builder()
                    .capture_server_errors(true)
                    .start_transaction(true)
                    .finish(),
            )
            .wrap(tracing_logger)
            .service(health_check)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(
                web::scope("v1")
                    .wrap(authentication)
                    //projects
                    .service(create_project)
                    .service(read_project)
                    .service(delete_project)
                    .service(read_all_projects)
                    //clusters
                    .service(create_cluster)
                    .service(read_cluster)
                    .service(delete_cluster)
                    .service(read_all_clusters)
                    //environments
                    .service(create_environment)
                    .service(read_environment)
                    .service(read_all_environments)
                    .service(delete_environment)
                    .service(enable_pull_request)
                    //deployments
                    .service(read_deployment)
                    .service(read_all_deployments)
                    .service(update_deployment_status)
                    //namespaces
                    .service(create_namespace)
                    .service(read_all_namespaces)
                    .service(read_pod_logs),
            )
            .app_data(config.clone())
            .app_data(connection_pool.clone())
            .app_data(encryption_key.clone())
            .app_data(github_client.clone());

        if let Some(cluster_agent) = cluster_agent.clone() {
            app.app_data(cluster_agent.clone())
        } else {
            app
        }
    })
    .listen(listener)?
    .run();

    Ok(server)
}
