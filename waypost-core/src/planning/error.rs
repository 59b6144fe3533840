use thiserror::Error;

/// Errors from [`crate::planning::RoutePlanner::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// URL that timed out.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The routing engine answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// URL that failed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The connection failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// URL that failed.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Error detail.
        message: String,
    },
    /// The routing engine reported an error code in a success response.
    #[error("routing service returned {code}: {message}")]
    ServiceError {
        /// Engine status code, e.g. `"NoRoute"`.
        code: String,
        /// Engine message.
        message: String,
    },
    /// The engine returned no route between the coordinates.
    #[error("no route found between the requested coordinates")]
    NoRoute,
    /// Waypoints were requested but the route carried no geometry.
    #[error("route response carried no usable geometry")]
    MissingGeometry,
    /// Every attempt failed with a transient error.
    #[error("routing failed after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Error from the final attempt.
        last: Box<PlanningError>,
    },
}

impl PlanningError {
    /// Whether retrying the same request could succeed.
    ///
    /// Network failures, timeouts and 5xx responses are transient. Client
    /// errors (4xx) and malformed or empty answers are not.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::NetworkError { .. } => true,
            Self::HttpError { status, .. } => *status >= 500,
            Self::ParseError { .. }
            | Self::ServiceError { .. }
            | Self::NoRoute
            | Self::MissingGeometry
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// HTTP status attached to the error, looking through exhausted retries.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            Self::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}
