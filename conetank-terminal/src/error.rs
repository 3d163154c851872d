//! Error type for the terminal front end.

use conetank_core::TankError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid geometry, profile or input.
    #[error(transparent)]
    Tank(#[from] TankError),

    /// Terminal I/O failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
