//! Settlement status of a promise.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a promise is in its lifecycle.
///
/// The only legal transitions are `Pending -> Fulfilled` and
/// `Pending -> Rejected`. Both target states are final.
///
/// # Example
///
/// ```rust
/// use deferred::Status;
///
/// assert!(!Status::Pending.is_final());
/// assert!(Status::Fulfilled.is_final());
/// assert!(Status::Rejected.is_error());
/// assert_eq!(Status::Rejected.to_string(), "rejected");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Fulfilled,
    Rejected,
}

impl Status {
    /// Lowercase name used in logs and `Display`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled => "fulfilled",
            Self::Rejected => "rejected",
        }
    }

    /// Check if the promise has settled.
    ///
    /// Settled promises never change status again.
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Check if the promise settled with a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Rejected)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_final_identifies_settled_states() {
        assert!(!Status::Pending.is_final());
        assert!(Status::Fulfilled.is_final());
        assert!(Status::Rejected.is_final());
    }

    #[test]
    fn is_error_identifies_rejection_only() {
        assert!(!Status::Pending.is_error());
        assert!(!Status::Fulfilled.is_error());
        assert!(Status::Rejected.is_error());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&Status::Fulfilled).unwrap();
        assert_eq!(json, "\"fulfilled\"");

        let restored: Status = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(restored, Status::Rejected);
    }
}
