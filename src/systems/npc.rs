use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{GameSystem, SimulationContext, SystemKind};
use crate::npc::Npc;

/// Owns the wandering NPCs for the duration of a session.
#[derive(Debug)]
pub struct NpcSystem {
    npcs: Vec<Npc>,
    rng: ChaCha8Rng,
}

impl NpcSystem {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            npcs: Vec::new(),
            rng,
        }
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    fn despawn_all(&mut self, ctx: &mut SimulationContext) {
        for npc in self.npcs.drain(..) {
            npc.destroy();
        }
        ctx.npc_positions.clear();
    }
}

impl GameSystem for NpcSystem {
    fn kind(&self) -> SystemKind {
        SystemKind::Npc
    }

    fn init(&mut self, _ctx: &mut SimulationContext) {
        debug!("NpcSystem::init()");
    }

    fn on_game_start(&mut self, ctx: &mut SimulationContext) {
        debug!("NpcSystem::on_game_start()");
        self.despawn_all(ctx);

        let tuning = ctx.config.npc.clone();
        let max = (ctx.world.size() - 2).max(1);
        for _ in 0..tuning.count {
            let x = self.rng.gen_range(1..=max);
            let z = self.rng.gen_range(1..=max);
            let entity = ctx.entities.spawn();
            let npc = Npc::new(entity, x as f32, z as f32, &tuning, &mut self.rng);
            debug!("NPC {} created at: x={}, y=1, z={}", npc.id(), x, z);
            self.npcs.push(npc);
        }
        ctx.npc_positions = self.npcs.iter().map(Npc::position).collect();
    }

    fn on_main_loop(&mut self, ctx: &mut SimulationContext) {
        let tuning = &ctx.config.npc;
        for npc in &mut self.npcs {
            let step = npc.update(&ctx.world, tuning, &mut self.rng);
            if step.rerolled {
                trace!("NPC {} new velocity {:?}", npc.id(), npc.velocity());
            }
        }
        ctx.npc_positions.clear();
        ctx.npc_positions.extend(self.npcs.iter().map(Npc::position));
    }

    fn on_game_exit(&mut self, ctx: &mut SimulationContext) {
        debug!("NpcSystem::on_game_exit()");
        self.despawn_all(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn ctx() -> SimulationContext {
        let mut ctx = SimulationContext::new(EngineConfig::default());
        ctx.assets.load_builtin();
        ctx
    }

    #[test]
    fn test_spawns_configured_count_inside_world() {
        let mut ctx = ctx();
        let mut system = NpcSystem::new(Some(99));

        system.on_game_start(&mut ctx);
        assert_eq!(system.npcs().len(), 3);
        for npc in system.npcs() {
            let p = npc.position();
            assert!((1.0..=14.0).contains(&p.x));
            assert!((1.0..=14.0).contains(&p.z));
            assert_eq!(p.y, 1.0);
            assert_eq!(p.x.fract(), 0.0);
        }
        assert_eq!(ctx.npc_positions.len(), 3);
    }

    #[test]
    fn test_ticks_keep_npcs_in_bounds() {
        let mut ctx = ctx();
        let mut system = NpcSystem::new(Some(5));
        system.on_game_start(&mut ctx);

        for _ in 0..600 {
            system.on_main_loop(&mut ctx);
        }
        for p in &ctx.npc_positions {
            assert!(p.x >= 0.1 && p.x <= 15.9);
            assert!(p.z >= 0.1 && p.z <= 15.9);
        }
    }

    #[test]
    fn test_exit_removes_all() {
        let mut ctx = ctx();
        let mut system = NpcSystem::new(Some(1));
        system.on_game_start(&mut ctx);
        system.on_game_exit(&mut ctx);

        assert!(system.npcs().is_empty());
        assert!(ctx.npc_positions.is_empty());
    }

    #[test]
    fn test_same_seed_same_walk() {
        let run = |seed| {
            let mut ctx = ctx();
            let mut system = NpcSystem::new(Some(seed));
            system.on_game_start(&mut ctx);
            for _ in 0..120 {
                system.on_main_loop(&mut ctx);
            }
            ctx.npc_positions
        };
        assert_eq!(run(21), run(21));
    }
}
