// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Namespace alias: what a namespace resolves to.

use core::fmt;

use crate::error::NamespaceError;
use crate::ident::{Address, MosaicId};

/// Wire tag of a [`NamespaceAlias`].
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AliasType {
    /// No alias.
    None = 0,
    /// Alias to a mosaic id.
    Mosaic = 1,
    /// Alias to an account address.
    Address = 2,
}

impl TryFrom<u8> for AliasType {
    /// The unrecognized tag.
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::None),
            1 => Ok(Self::Mosaic),
            2 => Ok(Self::Address),
            other => Err(other),
        }
    }
}

/// Resolution target attached to a root or child namespace.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NamespaceAlias {
    /// Unlinked; the state of every newly created namespace.
    #[default]
    None,
    /// Linked to a mosaic.
    Mosaic(MosaicId),
    /// Linked to an account.
    Address(Address),
}

impl NamespaceAlias {
    /// The active case.
    #[must_use]
    pub const fn kind(&self) -> AliasType {
        match self {
            Self::None => AliasType::None,
            Self::Mosaic(_) => AliasType::Mosaic,
            Self::Address(_) => AliasType::Address,
        }
    }

    /// Returns `true` when no alias is set.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The linked mosaic id.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::WrongAliasKind`] unless this is a mosaic alias.
    pub fn mosaic_id(&self) -> Result<MosaicId, NamespaceError> {
        match self {
            Self::Mosaic(id) => Ok(*id),
            other => Err(NamespaceError::WrongAliasKind {
                expected: AliasType::Mosaic,
                actual: other.kind(),
            }),
        }
    }

    /// The linked address.
    ///
    /// # Errors
    ///
    /// [`NamespaceError::WrongAliasKind`] unless this is an address alias.
    pub fn address(&self) -> Result<Address, NamespaceError> {
        match self {
            Self::Address(address) => Ok(*address),
            other => Err(NamespaceError::WrongAliasKind {
                expected: AliasType::Address,
                actual: other.kind(),
            }),
        }
    }
}

impl fmt::Display for NamespaceAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Mosaic(id) => write!(f, "mosaic:{id}"),
            Self::Address(address) => write!(f, "address:{address}"),
        }
    }
}

impl From<MosaicId> for NamespaceAlias {
    fn from(id: MosaicId) -> Self {
        Self::Mosaic(id)
    }
}

impl From<Address> for NamespaceAlias {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}
