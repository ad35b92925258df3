//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs every manager in a fixed order, and produces `GameStateSnapshot`s.
//! Rendering, effects and input are reached only through the provider
//! traits, so the engine runs headless and deterministically in tests.

use std::collections::VecDeque;

use hecs::{Entity, World};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bastion_campaign::{sector_info, ProgressionLedger, SectorOutcome};
use bastion_core::commands::PlayerCommand;
use bastion_core::components::{Health, PlayerShip, Station};
use bastion_core::enums::{AlertLevel, GamePhase, UpgradeTrack};
use bastion_core::error::LedgerError;
use bastion_core::events::{Alert, GameEvent};
use bastion_core::state::GameStateSnapshot;
use bastion_core::types::SimTime;
use bastion_core::weapons;

use crate::ballistics;
use crate::config::SimConfig;
use crate::deferred::DeferredEffects;
use crate::frame::{Frame, TickOutput};
use crate::providers::{
    EffectsProvider, InputProvider, NullEffects, NullVisuals, SharedInput, VisualProvider,
};
use crate::squads::SquadRegistry;
use crate::systems;
use crate::systems::asteroids::AsteroidField;
use crate::systems::wave_spawner::WaveSchedule;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    config: SimConfig,
    rng: ChaCha8Rng,
    ledger: ProgressionLedger,
    squads: SquadRegistry,
    wave_schedule: WaveSchedule,
    asteroid_field: AsteroidField,
    deferred: DeferredEffects,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    /// Missile trigger state last tick, for edge detection.
    missile_trigger: bool,
    /// Events raised by commands, reported with the next snapshot.
    pending_events: Vec<GameEvent>,
    alerts: Vec<Alert>,

    visuals: Box<dyn VisualProvider>,
    effects: Box<dyn EffectsProvider>,
    input: Box<dyn InputProvider>,
}

impl SimulationEngine {
    /// Create an engine with headless providers and no input.
    pub fn new(config: SimConfig) -> Self {
        Self::with_providers(
            config,
            Box::new(NullVisuals::default()),
            Box::new(NullEffects),
            Box::new(SharedInput::default()),
        )
    }

    pub fn with_providers(
        config: SimConfig,
        visuals: Box<dyn VisualProvider>,
        effects: Box<dyn EffectsProvider>,
        input: Box<dyn InputProvider>,
    ) -> Self {
        let ledger = ProgressionLedger::new(config.starting_resources, config.starting_missiles);
        let wave_schedule = new_schedule(&config, &ledger);
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ledger,
            squads: SquadRegistry::default(),
            wave_schedule,
            asteroid_field: AsteroidField::default(),
            deferred: DeferredEffects::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            missile_trigger: false,
            pending_events: Vec::new(),
            alerts: Vec::new(),
            config,
            visuals,
            effects,
            input,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one frame of `dt` seconds and return the
    /// resulting snapshot. `dt` is clamped to `config.max_dt`.
    pub fn tick(&mut self, dt: f32) -> GameStateSnapshot {
        self.process_commands();

        let mut out = TickOutput::default();
        if self.phase == GamePhase::Active {
            let frame = Frame {
                dt: dt.clamp(0.0, self.config.max_dt),
                tick: self.time.tick,
                now: self.time.elapsed_secs,
            };
            self.run_systems(&frame, &mut out);
            self.time.advance(frame.dt);
            self.drain_deferred(&mut out);
            self.check_game_over();
        }

        systems::presentation::sync(&mut self.world, self.visuals.as_mut());
        systems::presentation::flush(&out.effects, self.effects.as_mut());

        let mut events = std::mem::take(&mut self.pending_events);
        events.append(&mut out.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.ledger,
            &self.squads,
            out.effects,
            events,
            std::mem::take(&mut self.alerts),
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn ledger(&self) -> &ProgressionLedger {
        &self.ledger
    }

    pub fn squads(&self) -> &SquadRegistry {
        &self.squads
    }

    /// Mutable world access for tests that stage encounters.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn ledger_mut(&mut self) -> &mut ProgressionLedger {
        &mut self.ledger
    }

    #[cfg(test)]
    pub fn wave_schedule_mut(&mut self) -> &mut WaveSchedule {
        &mut self.wave_schedule
    }

    /// Buy the next level on a track and apply its effect to the world.
    pub fn upgrade(&mut self, track: UpgradeTrack) -> Result<u32, LedgerError> {
        let level = self.ledger.upgrade(track)?;
        match track {
            UpgradeTrack::Weapon => {}
            UpgradeTrack::Station => self.apply_station_level(level),
            UpgradeTrack::Defense => world_setup::sync_turrets(&mut self.world, level),
        }
        self.pending_events.push(GameEvent::Upgraded { track, level });
        Ok(level)
    }

    pub fn buy_missile(&mut self) -> Result<u32, LedgerError> {
        self.ledger.buy_missile()
    }

    /// Leave the current sector. The final jump ends the campaign.
    pub fn hyperspace(&mut self) -> Result<SectorOutcome, LedgerError> {
        let outcome = self.ledger.hyperspace()?;
        match outcome {
            SectorOutcome::Advanced(sector) => {
                self.enter_sector();
                self.pending_events.push(GameEvent::SectorAdvanced { sector });
                info!(
                    "hyperspace to sector {} ({})",
                    sector,
                    sector_info(sector).name
                );
            }
            SectorOutcome::Victory => {
                self.phase = GamePhase::Victory;
                info!("campaign complete at t={:.1}s", self.time.elapsed_secs);
            }
        }
        Ok(outcome)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        let result = match command {
            PlayerCommand::StartGame => {
                if matches!(
                    self.phase,
                    GamePhase::MainMenu | GamePhase::GameOver | GamePhase::Victory
                ) {
                    self.start_game();
                }
                Ok(())
            }
            PlayerCommand::ReturnToMenu => {
                self.clear_world();
                self.phase = GamePhase::MainMenu;
                Ok(())
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
                Ok(())
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
                Ok(())
            }
            _ if self.phase != GamePhase::Active && self.phase != GamePhase::Paused => Ok(()),
            PlayerCommand::UpgradeWeapon => self.upgrade(UpgradeTrack::Weapon).map(drop),
            PlayerCommand::UpgradeStation => self.upgrade(UpgradeTrack::Station).map(drop),
            PlayerCommand::UpgradeDefense => self.upgrade(UpgradeTrack::Defense).map(drop),
            PlayerCommand::BuyMissile => self.buy_missile().map(drop),
            PlayerCommand::Hyperspace => self.hyperspace().map(drop),
        };

        if let Err(err) = result {
            self.alerts.push(Alert {
                level: AlertLevel::Warning,
                message: err.to_string(),
                tick: self.time.tick,
            });
        }
    }

    fn start_game(&mut self) {
        self.clear_world();
        self.ledger =
            ProgressionLedger::new(self.config.starting_resources, self.config.starting_missiles);
        self.time = SimTime::default();
        self.missile_trigger = false;
        world_setup::setup_game(
            &mut self.world,
            &mut self.rng,
            &self.config,
            self.ledger.station_level(),
            self.ledger.defense_level(),
        );
        self.wave_schedule = new_schedule(&self.config, &self.ledger);
        self.asteroid_field = AsteroidField::default();
        self.phase = GamePhase::Active;
        info!("game started (seed {})", self.config.seed);
    }

    /// Despawn every entity and release its visual.
    fn clear_world(&mut self) {
        let entities: Vec<Entity> = self.world.iter().map(|e| e.entity()).collect();
        systems::cleanup::purge(&mut self.world, self.visuals.as_mut(), &entities);
        self.squads.clear();
        self.deferred.clear();
    }

    /// Reset the battlefield for a new sector: hazards out, full health,
    /// fresh asteroid field and wave schedule.
    fn enter_sector(&mut self) {
        let hazards = world_setup::hazard_entities(&self.world);
        systems::cleanup::purge(&mut self.world, self.visuals.as_mut(), &hazards);
        self.squads.clear();
        self.deferred.clear();

        for (_entity, health) in self.world.query_mut::<&mut Health>() {
            health.current = health.max;
            health.alive = true;
        }
        for _ in 0..self.config.asteroid_count {
            world_setup::spawn_random_asteroid(&mut self.world, &mut self.rng);
        }
        self.wave_schedule = new_schedule(&self.config, &self.ledger);
        self.asteroid_field = AsteroidField::default();
    }

    fn apply_station_level(&mut self, level: u32) {
        let max = world_setup::station_max_health(level);
        for (_entity, (station, health)) in self.world.query_mut::<(&mut Station, &mut Health)>() {
            station.level = level;
            health.current += max - health.max;
            health.max = max;
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, frame: &Frame, out: &mut TickOutput) {
        let weapon = weapons::get_config(self.ledger.weapon_level());
        let scale = self.config.collision.scale();

        // 1. Input
        let input = self.input.poll();
        // 2. Player flight and primary fire
        systems::player::run(&mut self.world, &mut self.rng, &input, &weapon, frame);
        if input.launch_missile && !self.missile_trigger {
            systems::player::launch_missile(&mut self.world, &mut self.ledger, out);
        }
        self.missile_trigger = input.launch_missile;
        // 3. Station upkeep and turrets
        systems::station::run(&mut self.world, frame, out);
        // 4. Ballistic flight
        ballistics::advance_projectiles(&mut self.world, frame.dt, self.config.world_radius);
        // 5. Asteroid manager
        systems::asteroids::run(
            &mut self.world,
            &mut self.rng,
            &mut self.asteroid_field,
            &self.config,
            frame,
            out,
        );
        // 6. Fragments
        systems::fragments::run(
            &mut self.world,
            frame,
            self.config.fragment_world_radius,
            out,
        );
        // 7. Enemy manager
        systems::enemies::run(
            &mut self.world,
            &mut self.rng,
            &mut self.squads,
            &mut self.wave_schedule,
            scale,
            frame,
            out,
        );
        // 8. Missile manager
        systems::missiles::run(
            &mut self.world,
            &mut self.rng,
            self.config.world_radius,
            frame,
            out,
        );
        // 9. Progression ledger
        self.ledger.collect(out.tally);
        // 10. Cleanup (dead, expired, collected)
        systems::cleanup::run(
            &mut self.world,
            self.visuals.as_mut(),
            &mut self.despawn_buffer,
        );
    }

    /// Queue this tick's delayed effects and release the ones now due.
    fn drain_deferred(&mut self, out: &mut TickOutput) {
        let now = self.time.elapsed_secs;
        for (delay, effect) in out.delayed.drain(..) {
            self.deferred.schedule(now + delay, effect);
        }
        out.effects.extend(self.deferred.drain_due(now));
    }

    fn check_game_over(&mut self) {
        let lost = self
            .world
            .query::<(&Health, Option<&PlayerShip>, Option<&Station>)>()
            .iter()
            .any(|(_, (health, player, station))| {
                (player.is_some() || station.is_some()) && !health.alive
            });
        if lost {
            self.phase = GamePhase::GameOver;
            info!(
                "game over in sector {} at t={:.1}s",
                self.ledger.sector(),
                self.time.elapsed_secs
            );
        }
    }
}

fn new_schedule(config: &SimConfig, ledger: &ProgressionLedger) -> WaveSchedule {
    WaveSchedule::new(
        ledger.sector(),
        ledger.difficulty(),
        config.wave_interval_secs,
        config.first_wave_delay_secs,
    )
}

