// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mosaic entry: the flat (non-versioned) sibling of namespace state.
//!
//! Unlike a namespace, a mosaic keeps a single mutable record. Supply changes
//! and the optional levy are applied in place.

use thiserror::Error;

use crate::ident::{Address, Amount, Height, Key, MosaicId};
use crate::lifetime::NamespaceLifetime;

/// Errors raised by mosaic supply and levy mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MosaicError {
    /// The increase would overflow `u64`.
    #[error("mosaic supply {supply} cannot grow by {delta}")]
    SupplyOverflow {
        /// Supply before the change.
        supply: Amount,
        /// Requested increase.
        delta: Amount,
    },

    /// The decrease would go below zero.
    #[error("cannot decrease mosaic supply below zero (supply {supply}, delta {delta})")]
    SupplyUnderflow {
        /// Supply before the change.
        supply: Amount,
        /// Requested decrease.
        delta: Amount,
    },

    /// The mosaic has no levy.
    #[error("mosaic has no levy")]
    MissingLevy,

    /// A levy is already set and cannot be replaced.
    #[error("mosaic already has levy set")]
    LevyAlreadySet,
}

/// Immutable creation-time properties of a mosaic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MosaicDefinition {
    /// Height at which the mosaic was created.
    pub height: Height,
    /// Creator.
    pub owner: Key,
    /// Validity interval; `None` means the mosaic never expires.
    pub lifetime: Option<NamespaceLifetime>,
}

impl MosaicDefinition {
    /// Returns `true` if the mosaic exists at `height`.
    #[must_use]
    pub fn is_active(&self, height: Height) -> bool {
        match self.lifetime {
            Some(lifetime) => lifetime.is_active(height),
            None => height >= self.height,
        }
    }
}

/// Fee charged on transfers of a mosaic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MosaicLevy {
    /// Mosaic the fee is paid in.
    pub mosaic_id: MosaicId,
    /// Fee recipient.
    pub recipient: Address,
    /// Fee amount per transfer.
    pub fee: Amount,
}

/// Mutable state of a mosaic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MosaicEntry {
    id: MosaicId,
    definition: MosaicDefinition,
    supply: Amount,
    levy: Option<MosaicLevy>,
}

impl MosaicEntry {
    /// A mosaic with zero supply and no levy.
    #[must_use]
    pub fn new(id: MosaicId, definition: MosaicDefinition) -> Self {
        Self {
            id,
            definition,
            supply: Amount(0),
            levy: None,
        }
    }

    /// Mosaic id.
    #[must_use]
    pub fn mosaic_id(&self) -> MosaicId {
        self.id
    }

    /// Creation-time properties.
    #[must_use]
    pub fn definition(&self) -> &MosaicDefinition {
        &self.definition
    }

    /// Returns `true` if the mosaic exists at `height`.
    #[must_use]
    pub fn is_active(&self, height: Height) -> bool {
        self.definition.is_active(height)
    }

    /// Current supply.
    #[must_use]
    pub fn supply(&self) -> Amount {
        self.supply
    }

    /// Adds `delta` to the supply.
    ///
    /// # Errors
    ///
    /// [`MosaicError::SupplyOverflow`] if the sum does not fit in `u64`.
    pub fn increase_supply(&mut self, delta: Amount) -> Result<(), MosaicError> {
        let supply = self
            .supply
            .0
            .checked_add(delta.0)
            .ok_or(MosaicError::SupplyOverflow {
                supply: self.supply,
                delta,
            })?;
        self.supply = Amount(supply);
        Ok(())
    }

    /// Subtracts `delta` from the supply.
    ///
    /// # Errors
    ///
    /// [`MosaicError::SupplyUnderflow`] if `delta` exceeds the supply.
    pub fn decrease_supply(&mut self, delta: Amount) -> Result<(), MosaicError> {
        let supply = self
            .supply
            .0
            .checked_sub(delta.0)
            .ok_or(MosaicError::SupplyUnderflow {
                supply: self.supply,
                delta,
            })?;
        self.supply = Amount(supply);
        Ok(())
    }

    /// Returns `true` if a levy is set.
    #[must_use]
    pub fn has_levy(&self) -> bool {
        self.levy.is_some()
    }

    /// The levy.
    ///
    /// # Errors
    ///
    /// [`MosaicError::MissingLevy`] if none is set.
    pub fn levy(&self) -> Result<&MosaicLevy, MosaicError> {
        self.levy.as_ref().ok_or(MosaicError::MissingLevy)
    }

    /// Sets the levy once.
    ///
    /// # Errors
    ///
    /// [`MosaicError::LevyAlreadySet`] if a levy exists.
    pub fn set_levy(&mut self, levy: MosaicLevy) -> Result<(), MosaicError> {
        if self.levy.is_some() {
            return Err(MosaicError::LevyAlreadySet);
        }
        self.levy = Some(levy);
        Ok(())
    }
}
