mod connection;
mod sentry;

pub use connection::*;
pub use sentry::*;
