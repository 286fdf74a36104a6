//! Failure taxonomy for repository calls and table operations.

use shared::{
    domain::PostId,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("request to posts server failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("posts server responded with status {status}")]
    Status { status: u16, body: Option<ApiError> },
    #[error("post {0} not found")]
    NotFound(PostId),
    #[error("unexpected response from posts server: {0}")]
    InvalidResponse(String),
    #[error("invalid posts server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("posts repository unavailable: {0}")]
    Unavailable(String),
}

/// One failed attempt of a table operation. None of these are retried.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to load posts")]
    Fetch(#[source] RepositoryError),
    #[error("failed to create post")]
    Create(#[source] RepositoryError),
    #[error("failed to update post {id}")]
    Update {
        id: PostId,
        #[source]
        source: RepositoryError,
    },
    #[error("failed to delete post {id}")]
    Delete {
        id: PostId,
        #[source]
        source: RepositoryError,
    },
}

impl TableError {
    pub fn repository_error(&self) -> &RepositoryError {
        match self {
            TableError::Fetch(source) | TableError::Create(source) => source,
            TableError::Update { source, .. } | TableError::Delete { source, .. } => source,
        }
    }
}

impl RepositoryError {
    /// Server-side error code: the decoded body's when present, otherwise
    /// derived from the HTTP status.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            RepositoryError::Status {
                body: Some(body), ..
            } => Some(body.code),
            RepositoryError::Status { status, body: None } => {
                Some(ErrorCode::from_status(*status))
            }
            RepositoryError::NotFound(_) => Some(ErrorCode::NotFound),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Transport,
    Rejected,
    Missing,
    Unknown,
}

pub fn classify(err: &RepositoryError) -> FailureCategory {
    match err {
        RepositoryError::Transport(source) if source.is_status() => FailureCategory::Rejected,
        RepositoryError::Transport(_) | RepositoryError::Unavailable(_) => {
            FailureCategory::Transport
        }
        RepositoryError::Status { .. } | RepositoryError::NotFound(_) => match err.code() {
            Some(ErrorCode::NotFound) => FailureCategory::Missing,
            _ => FailureCategory::Rejected,
        },
        RepositoryError::InvalidResponse(_) | RepositoryError::InvalidUrl { .. } => {
            FailureCategory::Unknown
        }
    }
}

/// User-facing text for the error notification of a failed operation.
pub fn describe_failure(err: &TableError) -> String {
    let action = match err {
        TableError::Fetch(_) => "Could not load posts".to_string(),
        TableError::Create(_) => "Could not save the post".to_string(),
        TableError::Update { id, .. } => format!("Could not update post {id}"),
        TableError::Delete { id, .. } => format!("Could not delete post {id}"),
    };
    let source = err.repository_error();
    let reason = match classify(source) {
        FailureCategory::Transport => {
            "server unreachable; check the URL or network and retry".to_string()
        }
        FailureCategory::Missing => "it no longer exists on the server".to_string(),
        FailureCategory::Rejected => match source {
            RepositoryError::Status {
                body: Some(body), ..
            } => format!("server rejected the request: {}", body.message),
            RepositoryError::Status { status, body: None } => {
                match ErrorCode::from_status(*status) {
                    ErrorCode::RateLimited => {
                        format!("server is throttling requests (status {status}); retry later")
                    }
                    ErrorCode::Unauthorized | ErrorCode::Forbidden => {
                        format!("server refused access (status {status})")
                    }
                    _ => format!("server rejected the request (status {status})"),
                }
            }
            other => format!("server rejected the request: {other}"),
        },
        FailureCategory::Unknown => source.to_string(),
    };
    format!("{action}: {reason}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_repository_reads_as_unreachable() {
        let err = TableError::Create(RepositoryError::Unavailable("offline".into()));
        assert_eq!(
            describe_failure(&err),
            "Could not save the post: server unreachable; check the URL or network and retry"
        );
    }

    #[test]
    fn status_body_message_is_surfaced() {
        let err = TableError::Update {
            id: PostId(4),
            source: RepositoryError::Status {
                status: 422,
                body: Some(ApiError::new(ErrorCode::Validation, "title too long")),
            },
        };
        assert_eq!(
            describe_failure(&err),
            "Could not update post 4: server rejected the request: title too long"
        );
    }

    #[test]
    fn missing_record_is_classified() {
        let err = RepositoryError::Status {
            status: 404,
            body: None,
        };
        assert_eq!(classify(&err), FailureCategory::Missing);
        assert_eq!(
            classify(&RepositoryError::NotFound(PostId(1))),
            FailureCategory::Missing
        );
    }

    #[test]
    fn bare_status_is_reported_with_code() {
        let err = TableError::Delete {
            id: PostId(9),
            source: RepositoryError::Status {
                status: 500,
                body: None,
            },
        };
        assert_eq!(
            describe_failure(&err),
            "Could not delete post 9: server rejected the request (status 500)"
        );
    }

    #[test]
    fn bare_status_is_mapped_to_an_error_code() {
        let throttled = RepositoryError::Status {
            status: 429,
            body: None,
        };
        assert_eq!(throttled.code(), Some(ErrorCode::RateLimited));
        assert_eq!(
            describe_failure(&TableError::Fetch(throttled)),
            "Could not load posts: server is throttling requests (status 429); retry later"
        );

        let forbidden = TableError::Delete {
            id: PostId(3),
            source: RepositoryError::Status {
                status: 403,
                body: None,
            },
        };
        assert_eq!(
            describe_failure(&forbidden),
            "Could not delete post 3: server refused access (status 403)"
        );
    }

    #[test]
    fn body_code_takes_precedence_over_status() {
        let err = RepositoryError::Status {
            status: 400,
            body: Some(ApiError::new(ErrorCode::NotFound, "gone")),
        };
        assert_eq!(err.code(), Some(ErrorCode::NotFound));
        assert_eq!(classify(&err), FailureCategory::Missing);
    }
}
