//! Control-plane API for the valet platform.
//!
//! Provides a REST API for managing projects, clusters, preview environments,
//! and deployments, including the pull-request preview trigger path that
//! validates branch policy, dispatches a CI workflow on GitHub, and records a
//! deployment. Includes authentication, secret encryption at rest, Kubernetes
//! integration, and OpenAPI documentation.

pub mod authentication;
pub mod config;
pub mod db;
pub mod encryption;
pub mod github;
pub mod k8s;
pub mod routes;
pub mod span_builder;
pub mod startup;
