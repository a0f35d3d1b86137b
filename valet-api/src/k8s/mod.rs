//! Kubernetes cluster access.
//!
//! The [`ClusterAgent`] trait covers the small set of cluster operations the
//! server exposes over its API. The HTTP implementation talks to whatever
//! cluster the ambient kubeconfig or in-cluster service account points at.

mod base;
pub mod http;

pub use base::*;
