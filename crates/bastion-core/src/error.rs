//! Error types shared across crates.
//!
//! Nothing here is fatal to the frame loop: every variant describes a
//! rejected request or a locally recovered failure.

use thiserror::Error;

use crate::enums::UpgradeTrack;

/// A progression purchase was refused. No resources were deducted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient resources: need {needed}, have {available}")]
    InsufficientResources { needed: u64, available: u64 },

    #[error("{track} track is already at max level")]
    MaxLevel { track: UpgradeTrack },

    #[error("no missiles in inventory")]
    NoMissiles,

    #[error("hyperspace requires every track at level {required} (lowest is {lowest})")]
    HyperspaceLocked { required: u32, lowest: u32 },

    #[error("campaign already complete")]
    CampaignComplete,
}

/// The visual provider could not release a handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisposeError {
    #[error("unknown visual handle {0}")]
    UnknownHandle(u64),
}
