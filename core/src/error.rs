use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot read {path}: {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("Marketing note '{id}' not found")]
    NoteNotFound { id: String },

    #[error("Marketing note content is empty")]
    EmptyNote,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type InsightResult<T> = Result<T, InsightError>;
