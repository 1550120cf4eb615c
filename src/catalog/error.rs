use thiserror::Error;

/// Failure to retrieve the catalog from the remote service.
///
/// Never retried; the view that asked for the data shows it instead.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("catalog service unreachable: {0}")]
  Network(#[source] reqwest::Error),

  #[error("catalog service responded with status {status}")]
  Status { status: u16 },

  #[error("failed to decode catalog response: {0}")]
  Decode(#[source] reqwest::Error),

  #[error("invalid catalog url: {0}")]
  Url(#[from] url::ParseError),
}

impl FetchError {
  /// HTTP status if the service answered with one
  pub fn status(&self) -> Option<u16> {
    match self {
      FetchError::Status { status } => Some(*status),
      _ => None,
    }
  }
}
