//! Player commands sent from the HUD to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.
//! Flight and trigger state come from the input provider instead.

use serde::{Deserialize, Serialize};

/// All discrete player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Progression ---
    /// Buy the next weapon tier.
    UpgradeWeapon,
    /// Buy the next station level.
    UpgradeStation,
    /// Buy the next defense level (turrets).
    UpgradeDefense,
    /// Buy one missile for the inventory.
    BuyMissile,
    /// Jump to the next sector once every track meets the threshold.
    Hyperspace,

    // --- Simulation control ---
    /// Start a new game from the menu or an end screen.
    StartGame,
    /// Return to the main menu.
    ReturnToMenu,
    Pause,
    Resume,
}
