use {
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
};

/// A value that either came from the external service that was asked for it
/// or was substituted by a fixed fallback after that service failed.
///
/// Serialized with a `source` tag:
///
/// ```json
/// { "source": "live", "value": "..." }
/// { "source": "fallback", "value": "...", "reason": "..." }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Sourced<T> {
    Live { value: T },
    Fallback { value: T, reason: String },
}

impl<T> Sourced<T> {
    pub fn live(value: T) -> Self {
        Sourced::Live { value }
    }

    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Sourced::Fallback {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Sourced::Live { value } | Sourced::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Sourced::Live { value } | Sourced::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Sourced::Fallback { .. })
    }

    /// Why the fallback was used, if it was.
    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Sourced::Fallback { reason, .. } => Some(reason),
            Sourced::Live { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        match self {
            Sourced::Live { value } => Sourced::Live { value: f(value) },
            Sourced::Fallback { value, reason } => Sourced::Fallback {
                value: f(value),
                reason,
            },
        }
    }
}
