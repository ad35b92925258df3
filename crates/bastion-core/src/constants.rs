//! Simulation constants and tuning parameters.

use std::f32::consts::PI;

// --- Timing ---

/// Nominal frame delta (seconds) used by headless runs and tests.
pub const NOMINAL_DT: f32 = 1.0 / 60.0;

/// Upper clamp on a frame delta. Longer hitches are simulated as this step.
pub const MAX_DT: f32 = 0.1;

// --- World bounds ---

/// Ballistic entities expire beyond this distance from the origin.
pub const WORLD_RADIUS: f32 = 400.0;

/// Resource fragments are lost beyond this distance from the origin.
pub const FRAGMENT_LOST_RADIUS: f32 = 450.0;

/// The player ship is kept inside this radius.
pub const PLAYER_BOUNDARY_RADIUS: f32 = 350.0;

// --- Player ---

pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Player cruise speed (units/s).
pub const PLAYER_SPEED: f32 = 30.0;

pub const PLAYER_COLLISION_RADIUS: f32 = 2.0;

/// Distance ahead of the ship's center where bullets spawn.
pub const PLAYER_MUZZLE_OFFSET: f32 = 2.5;

/// Spawn position of the player ship (units from the station).
pub const PLAYER_START_Z: f32 = 40.0;

// --- Station ---

pub const STATION_MAX_HEALTH: f32 = 500.0;

/// Extra max health per station level above 1.
pub const STATION_HEALTH_PER_LEVEL: f32 = 150.0;

pub const STATION_COLLISION_RADIUS: f32 = 10.0;

/// Hull points repaired per second at level 1.
pub const STATION_REPAIR_PER_SEC: f32 = 1.0;

/// Additional repair per second for each level above 1.
pub const STATION_REPAIR_PER_LEVEL: f32 = 0.5;

/// Passive resource generation per second, per station level.
pub const STATION_GENERATION_PER_SEC: f64 = 0.5;

// --- Turrets ---

/// Distance of turret mounts from the station center.
pub const TURRET_ORBIT_RADIUS: f32 = 14.0;

pub const MAX_TURRETS: usize = 6;

pub const TURRET_RANGE: f32 = 90.0;

pub const TURRET_BASE_DAMAGE: f32 = 8.0;

/// Extra turret damage per defense level above 1.
pub const TURRET_DAMAGE_PER_LEVEL: f32 = 2.0;

/// Seconds between turret shots.
pub const TURRET_FIRE_RATE: f32 = 0.5;

/// Turret slew rate (rad/s) at defense level 1.
pub const TURRET_ROTATION_SPEED: f32 = 1.5;

/// Extra slew rate per defense level above 1.
pub const TURRET_ROTATION_PER_LEVEL: f32 = 0.15;

/// A turret only fires when its yaw is within this error of the true bearing.
pub const TURRET_AIM_TOLERANCE: f32 = 10.0 * PI / 180.0;

pub const TURRET_PROJECTILE_SPEED: f32 = 90.0;
pub const TURRET_PROJECTILE_LIFETIME: f32 = 1.5;
pub const TURRET_PROJECTILE_SIZE: f32 = 0.35;
pub const TURRET_COLOR: u32 = 0x66ccff;

// --- Enemy projectiles ---

pub const ENEMY_PROJECTILE_SIZE: f32 = 0.4;
pub const ENEMY_PROJECTILE_LIFETIME: f32 = 3.0;
pub const ENEMY_PROJECTILE_COLOR: u32 = 0xff3344;

/// Vertical jitter applied to fanned bullets (radians, cosmetic).
pub const SPREAD_VERTICAL_JITTER: f32 = 0.02;

// --- Missiles ---

/// Constant missile speed (units/s).
pub const MISSILE_SPEED: f32 = 60.0;

/// Maximum missile turn rate (rad/s).
pub const MISSILE_TURN_RATE: f32 = 2.5;

pub const MISSILE_LIFETIME: f32 = 6.0;
pub const MISSILE_LOCK_RANGE: f32 = 150.0;

/// Half-angle of the initial lock cone.
pub const MISSILE_LOCK_CONE: f32 = 30.0 * PI / 180.0;

/// Half-angle of the cone used after the locked target dies.
pub const MISSILE_REACQUIRE_CONE: f32 = 75.0 * PI / 180.0;

pub const MISSILE_DAMAGE: f32 = 120.0;
pub const MISSILE_BLAST_RADIUS: f32 = 6.0;
pub const MISSILE_HIT_RADIUS: f32 = 1.0;
pub const MISSILE_COLOR: u32 = 0xffaa22;

/// Weight of heading alignment in target scoring.
pub const MISSILE_ALIGNMENT_WEIGHT: f32 = 0.6;

/// Weight of proximity in target scoring.
pub const MISSILE_PROXIMITY_WEIGHT: f32 = 0.4;

/// Fixed-point iterations for the intercept point.
pub const INTERCEPT_ITERATIONS: usize = 3;

/// Heading error at which the full turn rate is allowed.
pub const PN_FULL_TURN_ERROR: f32 = PI / 4.0;

/// Fraction of the turn rate allowed for tiny heading errors.
pub const PN_MIN_TURN_FRACTION: f32 = 0.35;

/// Missiles bought through the ledger.
pub const MISSILE_COST: u64 = 25;
pub const STARTING_MISSILES: u32 = 3;

// --- Enemy movement ---

/// Half-width of the strafe band around the optimal range.
pub const ENEMY_RANGE_DEADZONE: f32 = 5.0;

/// Range error at which approach/retreat reaches full speed.
pub const ENEMY_FULL_SPEED_ERROR: f32 = 20.0;

/// Seconds between strafe direction rerolls.
pub const ENEMY_STRAFE_INTERVAL: f32 = 2.0;

/// Strafe speed as a fraction of hull speed.
pub const ENEMY_STRAFE_SPEED_FACTOR: f32 = 0.3;

/// Enemy squads spawn at this distance from the origin.
pub const ENEMY_SPAWN_RADIUS: f32 = 260.0;

/// Seconds between squad spawns at difficulty 1.0.
pub const ENEMY_WAVE_INTERVAL_SECS: f32 = 14.0;

/// Grace period before the first wave of a sector.
pub const FIRST_WAVE_DELAY_SECS: f32 = 6.0;

pub const MAX_ACTIVE_ENEMIES: usize = 30;

// --- Squads ---

/// Formation center distance at which approaching squads start engaging.
pub const SQUAD_ENGAGE_RANGE: f32 = 60.0;
pub const SQUAD_ENGAGE_DURATION: f32 = 8.0;
pub const SQUAD_RETREAT_DURATION: f32 = 3.0;
pub const SQUAD_REGROUP_DURATION: f32 = 4.0;

/// Rally point distance from the target along the away vector.
pub const SQUAD_RALLY_DISTANCE: f32 = 100.0;

pub const SQUAD_APPROACH_SPEED: f32 = 12.0;
pub const SQUAD_RETREAT_SPEED: f32 = 18.0;

/// Per-tick chance that a non-engaging squad switches target.
pub const SQUAD_TARGET_FLIP_CHANCE: f64 = 0.002;

pub const SQUAD_MIN_SIZE: usize = 2;
pub const SQUAD_MAX_SIZE: usize = 8;

pub const FORMATION_SPACING: f32 = 6.0;
pub const FORMATION_CIRCLE_RADIUS: f32 = 14.0;

/// Slot-seeking gain while retreating (loose formation).
pub const FORMATION_LOOSE_GAIN: f32 = 0.5;

/// Slot-seeking gain while approaching or regrouping.
pub const FORMATION_TIGHT_GAIN: f32 = 1.0;

// --- Collision radius scale law ---

/// Flat multiplier in `radius = size * size^-exponent * multiplier`.
pub const COLLISION_RADIUS_MULTIPLIER: f32 = 2.0;
pub const COLLISION_SIZE_EXPONENT: f32 = 0.7;

// --- Asteroids ---

pub const ASTEROID_TARGET_COUNT: u32 = 24;
pub const ASTEROID_MIN_RADIUS: f32 = 1.5;
pub const ASTEROID_MAX_RADIUS: f32 = 5.0;
pub const ASTEROID_HEALTH_PER_RADIUS: f32 = 12.0;

/// Mass = density * radius^2.
pub const ASTEROID_DENSITY: f32 = 1.0;

pub const ASTEROID_SPAWN_MIN_RADIUS: f32 = 80.0;
pub const ASTEROID_SPAWN_MAX_RADIUS: f32 = 300.0;
pub const ASTEROID_MAX_DRIFT: f32 = 4.0;

/// Seconds between asteroid field top-ups.
pub const ASTEROID_RESPAWN_INTERVAL: f32 = 1.5;

/// Fragments released per unit of radius on a clean kill.
pub const ASTEROID_FRAGMENTS_PER_RADIUS: f32 = 3.0;

/// A crashing asteroid releases this many times fewer fragments.
pub const ASTEROID_CRASH_YIELD_DIVISOR: u32 = 5;

/// Collision damage = mass * relative speed * factor.
pub const COLLISION_DAMAGE_FACTOR: f32 = 0.05;

pub const ASTEROID_COLOR: u32 = 0x8a7f70;

// --- Fragments ---

/// Resource value of one fragment.
pub const FRAGMENT_VALUE: u32 = 2;

/// Inverse-square attraction constant: accel = k / r^2.
pub const FRAGMENT_ATTRACTION_CONSTANT: f32 = 4000.0;

/// Attraction only acts inside this range.
pub const FRAGMENT_ATTRACTION_RANGE: f32 = 60.0;

/// Distance floor to keep the inverse-square term finite.
pub const FRAGMENT_MIN_ATTRACTION_DISTANCE: f32 = 1.0;

pub const FRAGMENT_COLLECT_RADIUS_PLAYER: f32 = 3.0;
pub const FRAGMENT_COLLECT_RADIUS_STATION: f32 = 12.0;

/// Fraction of velocity shed per second.
pub const FRAGMENT_DRAG: f32 = 0.6;
pub const FRAGMENT_MAX_SPEED: f32 = 60.0;

/// Outward speed of fragments leaving a broken asteroid.
pub const FRAGMENT_BURST_SPEED: f32 = 8.0;

// --- Progression ---

pub const WEAPON_BASE_COST: f64 = 50.0;
pub const WEAPON_COST_MULT: f64 = 1.4;
pub const WEAPON_RESOURCE_STEP: f64 = 0.15;
pub const MAX_WEAPON_LEVEL: u32 = 10;
pub const MAX_TRACK_LEVEL: u32 = 10;

pub const STATION_UPGRADE_BASE_COST: u64 = 100;
pub const DEFENSE_UPGRADE_BASE_COST: u64 = 80;

/// Station and defense costs grow by this factor per purchase.
pub const TRACK_COST_ESCALATION: f64 = 1.5;

pub const STARTING_RESOURCES: u64 = 100;

/// Minimum level on all three tracks to leave each sector.
pub const SECTOR_THRESHOLDS: [u32; 4] = [3, 5, 7, 10];

pub const SECTOR_NAMES: [&str; 4] = [
    "Cinder Belt",
    "Kepler Drift",
    "Obsidian Reach",
    "The Maw",
];

/// Difficulty = 1 + sector_index * this.
pub const DIFFICULTY_PER_SECTOR: f32 = 0.5;

/// Guards floor() against representation error in products like 50 * 1.4^2.
pub const FLOOR_EPSILON: f64 = 1e-9;

// --- Effects ---

/// Delay between explosions in a capital ship's death sequence.
pub const CAPITAL_EXPLOSION_STAGGER: f64 = 0.25;

pub const HIT_SPARK_PRIMARY: u32 = 0xffffff;
pub const EXPLOSION_COLOR: u32 = 0xff7722;
