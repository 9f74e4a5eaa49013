use thiserror::Error;

#[derive(Error, Debug)]
pub enum WheelError {
    /// Symbol did not decode as an option: non-fatal, recorded on the
    /// downgraded position rather than raised
    #[error("Symbol parse failure: {0}")]
    ParseFailure(String),

    /// Missing required numeric field: non-fatal, the field defaults to 0
    /// and the anomaly is logged
    #[error("Incomplete record: {0}")]
    IncompleteRecord(String),

    /// Caller contract violation (structurally invalid input); the only
    /// variant ever returned as `Err` across the API
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
