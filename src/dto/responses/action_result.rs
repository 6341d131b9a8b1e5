use serde_derive::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
}

/// Outcome of an admin mutation: a message a client can show as-is, plus
/// the affected record.
#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct ActionResult<T: serde::Serialize> {
    pub message: String,
    pub severity: Severity,
    pub result: T,
}

impl<T: serde::Serialize> ActionResult<T> {
    pub fn success(message: impl Into<String>, result: T) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
            result,
        }
    }

    /// Nothing changed, e.g. renaming a tag to its current name.
    pub fn info(message: impl Into<String>, result: T) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
            result,
        }
    }
}
