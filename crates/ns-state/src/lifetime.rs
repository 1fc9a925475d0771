// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Validity interval of a namespace snapshot.

use crate::error::NamespaceError;
use crate::ident::Height;

/// Half-open height interval `[start, end)`.
///
/// # Invariant
///
/// `start < end`; enforced by [`NamespaceLifetime::new`], which deserialization
/// also goes through.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLifetime"))]
pub struct NamespaceLifetime {
    start: Height,
    end: Height,
}

// Unchecked wire shape of a lifetime.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLifetime {
    start: Height,
    end: Height,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLifetime> for NamespaceLifetime {
    type Error = NamespaceError;

    fn try_from(raw: RawLifetime) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl NamespaceLifetime {
    /// Creates `[start, end)`.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::InvalidLifetime`] if `start >= end`.
    pub fn new(start: Height, end: Height) -> Result<Self, NamespaceError> {
        if start >= end {
            return Err(NamespaceError::InvalidLifetime { start, end });
        }
        Ok(Self { start, end })
    }

    /// First active height.
    #[must_use]
    pub const fn start(&self) -> Height {
        self.start
    }

    /// First height at which the snapshot is no longer active.
    #[must_use]
    pub const fn end(&self) -> Height {
        self.end
    }

    /// `start <= height < end`.
    #[must_use]
    pub fn is_active(&self, height: Height) -> bool {
        self.start <= height && height < self.end
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_half_open() {
        let lifetime = NamespaceLifetime::new(Height(10), Height(100)).expect("lifetime");
        assert!(!lifetime.is_active(Height(9)));
        assert!(lifetime.is_active(Height(10)));
        assert!(lifetime.is_active(Height(99)));
        assert!(!lifetime.is_active(Height(100)));
    }

    #[test]
    fn empty_or_inverted_interval_is_rejected() {
        assert_eq!(
            NamespaceLifetime::new(Height(5), Height(5)),
            Err(NamespaceError::InvalidLifetime {
                start: Height(5),
                end: Height(5)
            })
        );
        assert!(NamespaceLifetime::new(Height(6), Height(5)).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_rejects_inverted_interval() {
        let lifetime: NamespaceLifetime =
            serde_json::from_str(r#"{"start":10,"end":100}"#).expect("decode");
        assert_eq!(lifetime.end(), Height(100));
        assert_eq!(
            serde_json::to_string(&lifetime).expect("encode"),
            r#"{"start":10,"end":100}"#
        );

        assert!(serde_json::from_str::<NamespaceLifetime>(r#"{"start":5,"end":5}"#).is_err());
        assert!(serde_json::from_str::<NamespaceLifetime>(r#"{"start":9,"end":3}"#).is_err());
    }
}
