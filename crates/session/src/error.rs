use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No files have been uploaded")]
    NoUploads,

    #[error("No master dataset yet; create one from the uploaded files first")]
    NoMaster,

    #[error("Column '{0}' is not present in the dataset")]
    MissingColumn(String),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] ingestion::IngestError),

    #[error("Normalization error: {0}")]
    Normalize(#[from] normalizer::NormalizeError),

    #[error("Query error: {0}")]
    Query(#[from] query::QueryError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Dataset error: {0}")]
    Core(#[from] core_types::CoreError),
}
