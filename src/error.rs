use thiserror::Error;

#[derive(Error, Debug)]
pub enum CostbookError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Cost entry not found: {0}")]
    NotFound(i64),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Access denied: {0}")]
    Authorization(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CostbookError>;
