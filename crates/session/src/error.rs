//! Error types for session setup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The route-switch timer needs a tokio runtime to run on.
    #[error("no tokio runtime available for the route switch timer - create the session inside a runtime or pass a handle")]
    NoRuntime(#[source] tokio::runtime::TryCurrentError),
}
