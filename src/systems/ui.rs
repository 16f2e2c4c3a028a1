use log::debug;

use super::{GameSystem, SimulationContext, SystemKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Start,
    InGame,
}

/// What the presentation layer should show around the world view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudState {
    pub screen: Screen,
    pub crosshair: bool,
    pub debug_text: String,
}

#[derive(Debug, Default)]
pub struct UiSystem;

impl UiSystem {
    pub fn new() -> Self {
        Self
    }

    fn show(ctx: &mut SimulationContext, screen: Screen) {
        ctx.hud.screen = screen;
        ctx.hud.crosshair = screen == Screen::InGame;
        if screen == Screen::Start {
            ctx.hud.debug_text.clear();
        }
    }
}

impl GameSystem for UiSystem {
    fn kind(&self) -> SystemKind {
        SystemKind::Ui
    }

    fn init(&mut self, ctx: &mut SimulationContext) {
        debug!("UiSystem::init()");
        Self::show(ctx, Screen::Start);
    }

    fn on_game_start(&mut self, ctx: &mut SimulationContext) {
        Self::show(ctx, Screen::InGame);
    }

    fn on_main_loop(&mut self, ctx: &mut SimulationContext) {
        let eye = ctx.player_view.eye;
        ctx.hud.debug_text = format!(
            "x = {:.2}, y = {:.2}, z = {:.2} | blocks = {} | npcs = {}",
            eye.x,
            eye.y,
            eye.z,
            ctx.world.len(),
            ctx.npc_positions.len()
        );
    }

    fn on_game_exit(&mut self, ctx: &mut SimulationContext) {
        Self::show(ctx, Screen::Start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_screen_follows_session() {
        let mut ctx = SimulationContext::new(EngineConfig::default());
        let mut ui = UiSystem::new();

        ui.init(&mut ctx);
        assert_eq!(ctx.hud.screen, Screen::Start);
        assert!(!ctx.hud.crosshair);

        ui.on_game_start(&mut ctx);
        ui.on_main_loop(&mut ctx);
        assert_eq!(ctx.hud.screen, Screen::InGame);
        assert!(ctx.hud.crosshair);
        assert!(ctx.hud.debug_text.contains("blocks = 0"));

        ui.on_game_exit(&mut ctx);
        assert_eq!(ctx.hud, HudState::default());
    }
}
