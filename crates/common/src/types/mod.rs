use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_INVALID: &str = "invalid";
pub const STATUS_ERROR: &str = "error";

/// Body returned for every rejected request: `{status, message}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub status: String,
    pub message: String,
}

impl Message {
    /// A unique value (e.g. an email) is already taken.
    pub fn duplicate(key: &str) -> Self {
        Self::invalid(format!("Your {key} already exist."))
    }

    /// Generic body for unexpected faults; never carries the cause.
    pub fn error() -> Self {
        Self { status: STATUS_ERROR.into(), message: "Oops... something is wrong!".into() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self { status: STATUS_INVALID.into(), message: message.into() }
    }

    /// No entity matched the given key.
    pub fn notexist(key: &str) -> Self {
        Self::invalid(format!("Your {key} not exist."))
    }
}

/// Success envelope: `{status: "success", message, data?}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Reply<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Reply<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self { status: STATUS_SUCCESS.into(), message: message.into(), data: Some(data) }
    }
}

impl Reply<()> {
    /// Acknowledgement without payload.
    pub fn ack(message: impl Into<String>) -> Self {
        Self { status: STATUS_SUCCESS.into(), message: message.into(), data: None }
    }
}
