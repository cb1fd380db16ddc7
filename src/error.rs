use alloy::primitives::TxHash;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CyclerError>;

#[derive(Debug, Error)]
pub enum CyclerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{path}`: {reason}")]
    Read { path: String, reason: String },
    #[error("failed to parse `{path}`: {reason}")]
    Parse { path: String, reason: String },
    #[error("failed to write `{path}`: {reason}")]
    Write { path: String, reason: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read `{path}`: {reason}")]
    Read { path: String, reason: String },
    #[error("no private keys found in `{0}`")]
    NoAccounts(String),
    #[error("invalid private key on line {line} of `{path}`: {reason}")]
    InvalidKey {
        path: String,
        line: usize,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid proxy `{proxy}`: {reason}")]
    InvalidProxy { proxy: String, reason: String },
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Why a node refused a raw transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionErrorKind {
    /// The nonce was already used, skipped ahead, or is occupied in the pool.
    NonceConflict,
    Underpriced,
    InsufficientFunds,
    Rejected,
}

impl SubmissionErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NonceConflict => "nonce-conflict",
            Self::Underpriced => "underpriced",
            Self::InsufficientFunds => "insufficient-funds",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SubmissionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct SubmissionRejection {
    pub kind: SubmissionErrorKind,
    pub message: String,
}

impl SubmissionRejection {
    pub fn new(kind: SubmissionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Failure of a single action attempt. Never escapes the enclosing cycle.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("process stopped")]
    Cancelled,
    #[error(transparent)]
    Connection(#[from] RpcError),
    #[error("nonce query failed: {0}")]
    NonceQuery(String),
    #[error("transaction signing failed: {0}")]
    Signing(String),
    #[error("submission rejected ({kind}): {message}")]
    Submission {
        kind: SubmissionErrorKind,
        message: String,
    },
    #[error("confirmation of {hash} timed out after {waited_secs}s")]
    ConfirmationTimeout { hash: TxHash, waited_secs: u64 },
    #[error("transaction {hash} reverted")]
    Reverted { hash: TxHash },
    #[error("confirmation of {hash} failed: {reason}")]
    Confirmation { hash: TxHash, reason: String },
    #[error("invalid amount {amount}: {reason}")]
    InvalidAmount { amount: String, reason: String },
}

impl From<SubmissionRejection> for ActionError {
    fn from(rejection: SubmissionRejection) -> Self {
        Self::Submission {
            kind: rejection.kind,
            message: rejection.message,
        }
    }
}

impl ActionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Failure that aborts one account for the current pass.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Connection(#[from] RpcError),
    #[error("balance query failed: {0}")]
    BalanceQuery(String),
}
