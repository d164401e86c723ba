use crate::api::error::ApiError;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DashboardError {
    /// One of the three dashboard fetches failed; nothing was committed
    #[error("Dashboard load failed: {0}")]
    Load(Arc<ApiError>),

    #[error("Dashboard load was interrupted: {0}")]
    Interrupted(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

#[derive(Error, Debug)]
pub enum ShareActionError {
    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Another share action is still in progress")]
    InFlight,

    /// The dialog was closed, or opened on a different share
    #[error("No share selected for this action")]
    NoTarget,
}
