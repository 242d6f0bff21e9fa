use thiserror::Error;

/// A persisted record that cannot become a model value. The loader skips
/// the record and keeps the batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("invalid {field}: `{value}`")]
    Invalid { field: &'static str, value: String },
}

/// Errors reported by the simulation controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TowerError {
    #[error("simulation already finalized")]
    Stopped,
}
