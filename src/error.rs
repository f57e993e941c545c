use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("failed to load CSV: {0}")]
    Load(String),

    #[error("the CSV is empty, please check the link or file contents")]
    EmptyDataset,

    #[error("this CSV has no primary-key column (id/caseId/url)")]
    MissingKeyColumn,

    #[error("ID not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

impl From<polars::error::PolarsError> for ViewerError {
    fn from(err: polars::error::PolarsError) -> Self {
        ViewerError::Polars(err.to_string())
    }
}

impl From<reqwest::Error> for ViewerError {
    fn from(err: reqwest::Error) -> Self {
        ViewerError::Http(err.to_string())
    }
}

impl ViewerError {
    /// Short message shown inline on the page.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// True for the errors a lookup or render is expected to surface to the user.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            ViewerError::Load(_)
                | ViewerError::EmptyDataset
                | ViewerError::MissingKeyColumn
                | ViewerError::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(ViewerError::NotFound("X9".to_string()).user_message(), "ID not found: X9");
        assert!(ViewerError::Load("connection refused".to_string())
            .user_message()
            .contains("connection refused"));
        assert!(ViewerError::EmptyDataset.is_lookup_failure());
        assert!(!ViewerError::BadRequest("x".to_string()).is_lookup_failure());
    }
}
