use crossbeam_channel::Receiver;
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

use crate::assets::AssetCatalog;
use crate::config::EngineConfig;
use crate::net::{ConnectionManager, ConnectionState, Transport};
use crate::player::{input_queue, InputEvent, InputSender};
use crate::systems::{
    BlockSystem, ControlSystem, GameSystem, MapSystem, NpcSystem, PlayerSystem, SimulationContext,
    SystemKind, UiSystem,
};
use crate::utils::error::EngineError;

pub const START_ORDER: [SystemKind; 6] = [
    SystemKind::Map,
    SystemKind::Block,
    SystemKind::Npc,
    SystemKind::Player,
    SystemKind::Control,
    SystemKind::Ui,
];

/// Player and NPCs move before control recomputes the highlight for the same frame.
pub const LOOP_ORDER: [SystemKind; 6] = [
    SystemKind::Ui,
    SystemKind::Map,
    SystemKind::Block,
    SystemKind::Player,
    SystemKind::Npc,
    SystemKind::Control,
];

pub const EXIT_ORDER: [SystemKind; 6] = [
    SystemKind::Map,
    SystemKind::Block,
    SystemKind::Player,
    SystemKind::Npc,
    SystemKind::Control,
    SystemKind::Ui,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    Start,
    Loop,
    Exit,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineStats {
    pub frame_count: u64,
    pub last_delta: Duration,
    pub fps: f32,
    pub block_count: usize,
    pub npc_count: usize,
    pub connection_state: ConnectionState,
}

/// Drives every subsystem through init, session start, per-frame ticks and exit.
///
/// The host calls [`GameEngine::frame`] once per repaint. A frame only runs
/// while a request is pending, and the engine re-requests itself only while
/// the session is running, so the loop ends on its own after an exit.
pub struct GameEngine {
    ctx: SimulationContext,
    systems: Vec<Box<dyn GameSystem>>,
    connection: ConnectionManager,
    input_tx: InputSender,
    input_rx: Receiver<InputEvent>,
    frame_requested: bool,
    last_frame: Option<Instant>,
    stats: EngineStats,
}

impl GameEngine {
    pub fn new(config: EngineConfig, transport: Box<dyn Transport>) -> Self {
        let systems: Vec<Box<dyn GameSystem>> = vec![
            Box::new(UiSystem::new()),
            Box::new(MapSystem::new()),
            Box::new(BlockSystem::new()),
            Box::new(NpcSystem::new(config.npc.seed)),
            Box::new(PlayerSystem::new()),
            Box::new(ControlSystem::new()),
        ];
        Self::with_systems(config, transport, systems)
    }

    pub fn with_systems(
        config: EngineConfig,
        transport: Box<dyn Transport>,
        systems: Vec<Box<dyn GameSystem>>,
    ) -> Self {
        let connection = ConnectionManager::from_config(&config.network, transport);
        let (input_tx, input_rx) = input_queue();
        Self {
            ctx: SimulationContext::new(config),
            systems,
            connection,
            input_tx,
            input_rx,
            frame_requested: false,
            last_frame: None,
            stats: EngineStats::default(),
        }
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.ctx
    }

    pub fn assets_mut(&mut self) -> &mut AssetCatalog {
        &mut self.ctx.assets
    }

    /// Handle for device callbacks; events are applied at the start of the next frame.
    pub fn input_sender(&self) -> InputSender {
        self.input_tx.clone()
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut ConnectionManager {
        &mut self.connection
    }

    pub fn is_running(&self) -> bool {
        self.ctx.running
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    fn run_phase(&mut self, kind: SystemKind, phase: Phase) {
        let ctx = &mut self.ctx;
        for system in self.systems.iter_mut().filter(|s| s.kind() == kind) {
            match phase {
                Phase::Init => system.init(ctx),
                Phase::Start => system.on_game_start(ctx),
                Phase::Loop => system.on_main_loop(ctx),
                Phase::Exit => system.on_game_exit(ctx),
            }
        }
    }

    /// Runs every subsystem's init hook and dials the server.
    pub fn init(&mut self) {
        info!("Initializing {} systems", self.systems.len());
        for kind in START_ORDER {
            self.run_phase(kind, Phase::Init);
        }
        self.connection.connect();
    }

    pub fn start_session(&mut self, now: Instant) -> Result<(), EngineError> {
        if self.ctx.running {
            return Err(EngineError::AlreadyRunning);
        }
        if !self.ctx.assets.is_loaded() {
            error!("Cannot start game: assets not loaded");
            return Err(EngineError::AssetsNotLoaded);
        }

        info!("Starting game session");
        self.ctx.now = now;
        self.ctx.running = true;
        for kind in START_ORDER {
            self.run_phase(kind, Phase::Start);
            if kind == SystemKind::Player {
                self.ctx.follow_player_with_light();
            }
        }

        self.last_frame = Some(now);
        self.frame_requested = true;
        Ok(())
    }

    /// Applies queued input and network events. Safe to call between frames.
    pub fn pump_events(&mut self, now: Instant) {
        let running = self.ctx.running;
        for event in self.input_rx.try_iter() {
            self.ctx.input.handle_event(event, running);
        }
        self.connection.poll(now);
        self.stats.connection_state = self.connection.state();
    }

    /// One frame. Returns `false` without doing anything when no frame is pending.
    pub fn frame(&mut self, now: Instant) -> bool {
        if !self.frame_requested {
            return false;
        }
        self.frame_requested = false;
        if !self.ctx.running {
            return false;
        }

        self.pump_events(now);
        self.ctx.now = now;

        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_frame = Some(now);

        for kind in LOOP_ORDER {
            self.run_phase(kind, Phase::Loop);
        }

        self.stats.frame_count += 1;
        self.stats.last_delta = delta;
        if delta > Duration::ZERO {
            self.stats.fps = 1.0 / delta.as_secs_f32();
        }
        self.stats.block_count = self.ctx.world.len();
        self.stats.npc_count = self.ctx.npc_positions.len();

        self.frame_requested = self.ctx.running;
        true
    }

    pub fn exit_session(&mut self) {
        if !self.ctx.running {
            warn!("No game session to exit");
            return;
        }

        info!("Exiting game session after {} frames", self.stats.frame_count);
        self.frame_requested = false;
        self.ctx.running = false;
        for kind in EXIT_ORDER {
            self.run_phase(kind, Phase::Exit);
        }
    }

    /// Ends any session and closes the server link.
    pub fn shutdown(&mut self) {
        if self.ctx.running {
            self.exit_session();
        }
        self.connection.close();
        debug!("Engine shut down");
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("ctx", &self.ctx)
            .field("systems", &self.systems.len())
            .field("connection", &self.connection)
            .field("frame_requested", &self.frame_requested)
            .field("stats", &self.stats)
            .finish()
    }
}
