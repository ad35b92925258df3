//! Campaign progression for BASTION.
//!
//! The resource ledger with its three upgrade tracks and missile inventory,
//! plus the sector table and wave composition that drive enemy pressure.

pub mod ledger;
pub mod sectors;
pub mod wave_composer;

pub use ledger::{ProgressionLedger, ResourceTally, SectorOutcome};
pub use sectors::{sector_info, SectorInfo};

#[cfg(test)]
mod tests;
