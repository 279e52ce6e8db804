use strum_macros::Display;

/// Dynamically typed argument or return value of a host entry point.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HostValue {
    #[default]
    Undefined,
    Number(f64),
    Text(String),
}

impl HostValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            HostValue::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self { HostValue::Text(value.to_string()) }
}

/// Failure raised by a host entry point.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum HostCallError {
    /// The entry point itself failed.
    Thrown(String),
    /// The slot exists but holds a plain value.
    NotCallable(String),
    /// No slot with this key exists on the owner.
    Missing(String),
}

impl std::error::Error for HostCallError {}

pub type HostCallResult = Result<HostValue, HostCallError>;

/// Failure writing host-owned state.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// The object holding the field has not been created by the host yet.
    StateAbsent,
    /// The host refused the write.
    Rejected,
    /// A panic while the host state was locked left it unusable.
    Poisoned,
}

impl std::error::Error for HostError {}

impl<T> From<std::sync::PoisonError<T>> for HostError {
    fn from(_: std::sync::PoisonError<T>) -> Self { HostError::Poisoned }
}
