/// Errors returned by document store operations.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached or failed mid-operation.
    #[error("store unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A document with the same id already exists in the collection.
    #[error("duplicate key in {collection}: {id}")]
    DuplicateKey { collection: String, id: String },

    /// Record (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request is malformed (bad id, non-object record, ...).
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    pub fn unavailable_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
