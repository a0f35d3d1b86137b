pub mod clusters;
pub mod deployments;
pub mod environments;
pub mod projects;
