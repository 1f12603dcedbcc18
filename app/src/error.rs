//! Application error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Edit error: {0}")]
    Edit(#[from] edit_engine::EditError),
}

pub type Result<T> = std::result::Result<T, AppError>;
