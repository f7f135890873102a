/// Errors that can occur within the notification subsystem.
///
/// # Examples
///
/// ```rust
/// use coopwatch_notify::error::NotifyError;
///
/// let err = NotifyError::InvalidConfig("missing sink url".to_string());
/// assert!(err.to_string().contains("sink url"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Sink configuration is missing a required field or contains an invalid value.
    #[error("Notify: invalid sink configuration: {0}")]
    InvalidConfig(String),

    /// An HTTP request to the remote sink failed.
    #[error("Notify: HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The remote sink returned a non-success response.
    #[error("Notify: API error from {service}: status={status}, body={body}")]
    ApiError {
        service: String,
        status: u16,
        body: String,
    },
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
