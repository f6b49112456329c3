use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    /// No feature rows available at all. Fatal for a batch: there is
    /// nothing to score, so the run aborts and reports.
    #[error("No feature rows available to score")]
    MissingFeatureInput,

    /// A single account's feature map carried a wrong-typed value.
    /// Recovered per account by the batch runner; never aborts the run.
    #[error("Invalid feature '{key}': expected a number, found {found}")]
    InvalidFeature { key: String, found: String },

    /// A stored feature row whose map is not a JSON object at all
    /// (corrupt text included). Recovered per account, like any other
    /// invalid row.
    #[error("Malformed feature row for {account_id}: {detail}")]
    MalformedFeatureRow { account_id: String, detail: String },

    /// Bulk upsert to the prediction or intervention store failed after
    /// the retry.
    #[error("Persistence failure during {context}: {source}")]
    Persistence {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RiskResult<T> = Result<T, RiskError>;
