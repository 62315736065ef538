use thiserror::Error;

/// Errors raised while retrieving raw text from a remote endpoint
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },

    #[error("No retrieval strategy configured")]
    NoStrategy,
}

/// Errors raised while decoding an upstream sentiment feed
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Malformed {feed} payload: {reason}")]
    Malformed { feed: &'static str, reason: String },

    #[error("{feed} payload contained no sentiment record")]
    MissingRecord { feed: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_formatting() {
        let error = FetchError::Status {
            url: "https://stooq.com/q/d/l/?s=%5Ehsi&i=d".to_string(),
            status: 503,
        };

        let msg = error.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("stooq.com"));
    }

    #[test]
    fn test_feed_error_formatting() {
        let error = FeedError::MissingRecord { feed: "Alternative.me" };
        assert_eq!(
            error.to_string(),
            "Alternative.me payload contained no sentiment record"
        );
    }
}
