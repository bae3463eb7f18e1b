//! Error taxonomy shared by every layer of the harness.
//!
//! Chain-boundary errors propagate to the caller unchanged; nothing here is
//! retried. A confirmation timeout has no variant here. It surfaces as the
//! terminal status [`TxStatus::Expired`](crate::transaction::TxStatus::Expired).

use std::fmt;

/// Malformed base64 / UTF-8 / numeric data received from a node response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// What was being decoded (e.g. "vm query return data", "event topic").
    pub context: String,
    pub message: String,
}

impl DecodeError {
    pub fn new(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode {}: {}", self.context, self.message)
    }
}

impl std::error::Error for DecodeError {}

/// Network/HTTP failure or unexpected response shape on a node query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeQueryError {
    /// The request never produced an HTTP response.
    Transport { route: String, message: String },
    /// The node answered with a non-success HTTP status.
    Status {
        route: String,
        status: u16,
        body: String,
    },
    /// The node answered 2xx but its envelope carried an error code.
    Api {
        route: String,
        code: String,
        message: String,
    },
    /// The body could not be mapped onto the expected response structure.
    Shape { route: String, message: String },
}

impl NodeQueryError {
    pub fn route(&self) -> &str {
        match self {
            NodeQueryError::Transport { route, .. }
            | NodeQueryError::Status { route, .. }
            | NodeQueryError::Api { route, .. }
            | NodeQueryError::Shape { route, .. } => route,
        }
    }

    pub fn shape(route: impl Into<String>, message: impl fmt::Display) -> Self {
        NodeQueryError::Shape {
            route: route.into(),
            message: message.to_string(),
        }
    }

    /// Raw text the node returned, when there was any.
    pub fn body_text(&self) -> Option<&str> {
        match self {
            NodeQueryError::Status { body, .. } => Some(body),
            NodeQueryError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for NodeQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeQueryError::Transport { route, message } => {
                write!(f, "request to {} failed: {}", route, message)
            }
            NodeQueryError::Status {
                route,
                status,
                body,
            } => write!(f, "{} returned HTTP {}: {}", route, status, body),
            NodeQueryError::Api {
                route,
                code,
                message,
            } => write!(f, "{} returned code '{}': {}", route, code, message),
            NodeQueryError::Shape { route, message } => {
                write!(f, "unexpected response from {}: {}", route, message)
            }
        }
    }
}

impl std::error::Error for NodeQueryError {}

/// The node rejected a signed transaction outright at submit time.
///
/// Distinct from an execution failure, which is a terminal `fail` status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionError {
    /// Node error code (e.g. `bad_request`), or `transport` when no answer came back.
    pub code: String,
    pub message: String,
}

impl SubmissionError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transaction rejected ({}): {}", self.code, self.message)
    }
}

impl std::error::Error for SubmissionError {}

/// Key material could not be loaded or a signature could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    InvalidPem { source: String, message: String },
    InvalidKey(String),
    Unavailable(String),
    /// The transaction could not be serialized into signing bytes.
    Payload(String),
}

impl fmt::Display for SigningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningError::InvalidPem { source, message } => {
                write!(f, "invalid PEM {}: {}", source, message)
            }
            SigningError::InvalidKey(msg) => write!(f, "invalid key: {}", msg),
            SigningError::Unavailable(msg) => write!(f, "signer unavailable: {}", msg),
            SigningError::Payload(msg) => write!(f, "cannot serialize signing payload: {}", msg),
        }
    }
}

impl std::error::Error for SigningError {}

/// Umbrella error for harness operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    Decode(DecodeError),
    NodeQuery(NodeQueryError),
    Submission(SubmissionError),
    Signing(SigningError),
    /// A transaction could not be assembled from the given parts.
    Build(String),
    /// The node stopped acknowledging block production. Fatal for the scenario.
    BlockProduction {
        requested: u64,
        produced: u64,
        source: NodeQueryError,
    },
    /// The bounded epoch-advance loop ran out of attempts.
    EpochNotReached {
        target: u32,
        current: u32,
        attempts: usize,
    },
    /// A transaction the caller required to succeed reached another terminal status.
    TxFailed {
        hash: Option<String>,
        status: String,
        message: String,
    },
    /// Reading key files from disk failed.
    Key(String),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Decode(e) => write!(f, "{}", e),
            HarnessError::NodeQuery(e) => write!(f, "node query failed: {}", e),
            HarnessError::Submission(e) => write!(f, "{}", e),
            HarnessError::Signing(e) => write!(f, "signing failed: {}", e),
            HarnessError::Build(msg) => write!(f, "cannot build transaction: {}", msg),
            HarnessError::BlockProduction {
                requested,
                produced,
                source,
            } => write!(
                f,
                "block production stopped after {}/{} blocks: {}",
                produced, requested, source
            ),
            HarnessError::EpochNotReached {
                target,
                current,
                attempts,
            } => write!(
                f,
                "epoch {} not reached after {} attempts (current epoch {})",
                target, attempts, current
            ),
            HarnessError::TxFailed {
                hash,
                status,
                message,
            } => write!(
                f,
                "transaction {} ended with status '{}': {}",
                hash.as_deref().unwrap_or("<not submitted>"),
                status,
                message
            ),
            HarnessError::Key(msg) => write!(f, "key error: {}", msg),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::Decode(e) => Some(e),
            HarnessError::NodeQuery(e) => Some(e),
            HarnessError::Submission(e) => Some(e),
            HarnessError::Signing(e) => Some(e),
            HarnessError::BlockProduction { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DecodeError> for HarnessError {
    fn from(e: DecodeError) -> Self {
        HarnessError::Decode(e)
    }
}

impl From<NodeQueryError> for HarnessError {
    fn from(e: NodeQueryError) -> Self {
        HarnessError::NodeQuery(e)
    }
}

impl From<SubmissionError> for HarnessError {
    fn from(e: SubmissionError) -> Self {
        HarnessError::Submission(e)
    }
}

impl From<SigningError> for HarnessError {
    fn from(e: SigningError) -> Self {
        HarnessError::Signing(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_query_error_route() {
        let err = NodeQueryError::Status {
            route: "/address/erd1x/nonce".to_string(),
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.route(), "/address/erd1x/nonce");
        assert_eq!(err.body_text(), Some("boom"));
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_harness_error_source_chain() {
        let err: HarnessError = DecodeError::new("event topic", "invalid base64").into();
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(
            err.to_string(),
            "failed to decode event topic: invalid base64"
        );
    }

    #[test]
    fn test_block_production_message() {
        let err = HarnessError::BlockProduction {
            requested: 10,
            produced: 4,
            source: NodeQueryError::shape("/simulator/generate-blocks/1", "no ack"),
        };
        assert!(err.to_string().contains("4/10"));
    }
}
