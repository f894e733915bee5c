//! Domain primitive types used across the topoform workspace.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 digest of a rendered artifact, used to detect changes in the
/// bootstrap script between compositions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Computes the digest of the given bytes.
    #[must_use]
    pub fn of(bytes: impl AsRef<[u8]>) -> Self {
        let hash = Sha256::digest(bytes.as_ref());
        Self(hash.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Returns the hex-encoded digest string.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.0)
    }
}

/// Lifecycle state of a provisioning unit during one composition pass.
///
/// Legal paths are `Declared -> Ordered -> Constructing -> Ready` and
/// `Declared -> Ordered -> [Constructing ->] Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    /// The unit name is registered but no order has been computed.
    Declared,
    /// The unit has a fixed position in the creation order.
    Ordered,
    /// The unit's factory is running.
    Constructing,
    /// The unit is constructed and its outputs are readable.
    Ready,
    /// The unit's factory failed; the composition pass is aborted.
    Failed,
}

impl UnitState {
    /// Returns whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Declared, Self::Ordered)
                | (Self::Ordered | Self::Constructing, Self::Failed)
                | (Self::Ordered, Self::Constructing)
                | (Self::Constructing, Self::Ready)
        )
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared => write!(f, "declared"),
            Self::Ordered => write!(f, "ordered"),
            Self::Constructing => write!(f, "constructing"),
            Self::Ready => write!(f, "ready"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_empty_input() {
        let digest = Sha256Digest::of(b"");
        assert_eq!(
            digest.as_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_display_has_prefix() {
        let digest = Sha256Digest::of("abc");
        assert!(digest.to_string().starts_with("sha256:"));
        assert_eq!(digest.as_hex().len(), 64);
    }

    #[test]
    fn digest_changes_with_content() {
        assert_ne!(Sha256Digest::of("bootstrap"), Sha256Digest::of("bootstrap\n"));
        assert_eq!(Sha256Digest::of("bootstrap"), Sha256Digest::of(b"bootstrap"));
    }

    #[test]
    fn ready_path_is_legal() {
        assert!(UnitState::Declared.can_transition_to(UnitState::Ordered));
        assert!(UnitState::Ordered.can_transition_to(UnitState::Constructing));
        assert!(UnitState::Constructing.can_transition_to(UnitState::Ready));
    }

    #[test]
    fn failure_is_reachable_after_ordering() {
        assert!(UnitState::Ordered.can_transition_to(UnitState::Failed));
        assert!(UnitState::Constructing.can_transition_to(UnitState::Failed));
        assert!(!UnitState::Declared.can_transition_to(UnitState::Failed));
    }

    #[test]
    fn terminal_states_do_not_move() {
        for next in [
            UnitState::Declared,
            UnitState::Ordered,
            UnitState::Constructing,
            UnitState::Ready,
            UnitState::Failed,
        ] {
            assert!(!UnitState::Ready.can_transition_to(next));
            assert!(!UnitState::Failed.can_transition_to(next));
        }
    }
}
