use log::{debug, trace};

use super::{GameSystem, PlayerView, SimulationContext, SystemKind};
use crate::player::Player;

#[derive(Debug, Default)]
pub struct PlayerSystem {
    player: Option<Player>,
}

impl PlayerSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    fn player_mut(&mut self, ctx: &mut SimulationContext) -> &mut Player {
        self.player.get_or_insert_with(|| {
            Player::new(ctx.entities.spawn(), ctx.config.player.clone())
        })
    }

    fn publish(player: &Player, ctx: &mut SimulationContext) {
        let camera = player.camera();
        ctx.player_view = PlayerView {
            eye: camera.eye,
            look: camera.rotation,
        };
    }
}

impl GameSystem for PlayerSystem {
    fn kind(&self) -> SystemKind {
        SystemKind::Player
    }

    fn init(&mut self, ctx: &mut SimulationContext) {
        debug!("PlayerSystem::init()");
        let player = self.player_mut(ctx);
        Self::publish(player, ctx);
    }

    fn on_game_start(&mut self, ctx: &mut SimulationContext) {
        debug!("PlayerSystem::on_game_start()");
        let player = self.player_mut(ctx);
        player.reset_for_session();
        Self::publish(player, ctx);
    }

    fn on_main_loop(&mut self, ctx: &mut SimulationContext) {
        let delta = ctx.input.take_pointer_delta();
        let intent = ctx.input.intent();

        let player = self.player_mut(ctx);
        if delta != glam::Vec2::ZERO {
            player.apply_pointer_delta(delta);
            let target = player.target_rotation();
            trace!("Camera target: pitch = {:.1}°, yaw = {:.1}°", target.pitch.to_degrees(), target.yaw.to_degrees());
        }
        player.update(&ctx.world, intent);
        Self::publish(player, ctx);
    }

    fn on_game_exit(&mut self, ctx: &mut SimulationContext) {
        debug!("PlayerSystem::on_game_exit()");
        let player = self.player_mut(ctx);
        player.reset_after_session();
        Self::publish(player, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::player::{InputEvent, Key};
    use glam::Vec3;

    fn started() -> (PlayerSystem, SimulationContext) {
        let mut ctx = SimulationContext::new(EngineConfig::default());
        ctx.running = true;
        let mut system = PlayerSystem::new();
        system.init(&mut ctx);
        system.on_game_start(&mut ctx);
        (system, ctx)
    }

    #[test]
    fn test_start_publishes_spawn() {
        let (_, ctx) = started();
        assert_eq!(ctx.player_view.eye, Vec3::new(8.0, 3.5, 8.0));
    }

    #[test]
    fn test_tick_consumes_input() {
        let (mut system, mut ctx) = started();
        ctx.input.handle_event(InputEvent::PointerCapture(true), true);
        ctx.input.handle_event(InputEvent::PointerMove { dx: 20.0, dy: 0.0 }, true);
        ctx.input.handle_event(InputEvent::KeyDown(Key::W), true);

        system.on_main_loop(&mut ctx);
        let player = system.player().unwrap();
        assert!((player.target_rotation().yaw + 0.1).abs() < 1e-6);
        assert_ne!(player.position().x, 8.0);
        assert_eq!(ctx.player_view.eye, player.position());
        assert_eq!(ctx.input.take_pointer_delta(), glam::Vec2::ZERO);
    }

    #[test]
    fn test_exit_returns_to_spawn_at_rest() {
        let (mut system, mut ctx) = started();
        for _ in 0..10 {
            system.on_main_loop(&mut ctx);
        }
        system.on_game_exit(&mut ctx);

        let player = system.player().unwrap();
        assert_eq!(player.position(), Vec3::new(8.0, 3.5, 8.0));
        assert_eq!(player.velocity(), Vec3::ZERO);
    }
}
