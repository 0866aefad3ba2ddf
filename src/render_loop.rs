use std::cell::Cell;
use std::rc::Rc;

use ::rand::SeedableRng;
use macroquad::prelude::Vec2;
use rand_chacha::ChaCha8Rng;

use crate::fire::{FireRenderer, RenderSurface};
use crate::particles::ParticlePool;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopStatus {
    Rendered,
    Stopped,
}

/// Stop handle returned when a loop starts. Cancelling is idempotent.
#[derive(Clone, Debug, Default)]
pub struct LoopHandle {
    cancelled: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Pool, renderer and private generator for one burn episode.
pub struct FireEngine {
    pool: ParticlePool,
    renderer: FireRenderer,
    rng: ChaCha8Rng,
}

impl FireEngine {
    pub fn new(bounds: Vec2, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pool = ParticlePool::new(bounds, &mut rng);
        Self {
            pool,
            renderer: FireRenderer::default(),
            rng,
        }
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    fn step(&mut self, surface: &mut dyn RenderSurface) {
        self.renderer
            .draw_frame(&mut self.pool, surface, &mut self.rng);
    }
}

/// Frame-driven scheduler for the fire. The host calls `tick` once per
/// display refresh; after cancellation no further frame is drawn.
pub struct RenderLoop {
    engine: FireEngine,
    handle: LoopHandle,
    frames: u64,
}

impl RenderLoop {
    pub fn start(bounds: Vec2, seed: u64) -> (Self, LoopHandle) {
        let handle = LoopHandle::default();
        let render_loop = Self {
            engine: FireEngine::new(bounds, seed),
            handle: handle.clone(),
            frames: 0,
        };
        (render_loop, handle)
    }

    /// Run one frame. A missing surface stops the loop without touching particles.
    pub fn tick(&mut self, surface: Option<&mut dyn RenderSurface>) -> LoopStatus {
        if self.handle.is_cancelled() {
            return LoopStatus::Stopped;
        }
        let Some(surface) = surface else {
            self.handle.cancel();
            return LoopStatus::Stopped;
        };
        self.engine.step(surface);
        self.frames += 1;
        LoopStatus::Rendered
    }

    pub fn stop(&self) {
        self.handle.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_cancelled()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pool(&self) -> &ParticlePool {
        self.engine.pool()
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::fire::RecordingSurface;
    use macroquad::prelude::vec2;

    fn bounds() -> Vec2 {
        vec2(config::BURN_SURFACE_WIDTH, config::BURN_SURFACE_HEIGHT)
    }

    #[test]
    fn renders_until_cancelled() {
        let (mut fire, handle) = RenderLoop::start(bounds(), 21);
        let mut surface = RecordingSurface::new(bounds());

        for _ in 0..5 {
            assert_eq!(fire.tick(Some(&mut surface)), LoopStatus::Rendered);
        }
        handle.cancel();
        assert_eq!(fire.tick(Some(&mut surface)), LoopStatus::Stopped);
        assert_eq!(surface.frames(), 5);
        assert_eq!(fire.frames(), 5);
        assert!(!fire.is_running());
    }

    #[test]
    fn missing_surface_stops_without_touching_particles() {
        let (mut fire, handle) = RenderLoop::start(bounds(), 22);
        let before: Vec<_> = fire.pool().iter().map(|p| (p.pos, p.life)).collect();

        assert_eq!(fire.tick(None), LoopStatus::Stopped);
        assert!(handle.is_cancelled());

        let after: Vec<_> = fire.pool().iter().map(|p| (p.pos, p.life)).collect();
        assert_eq!(before, after);
        assert_eq!(fire.frames(), 0);
    }

    #[test]
    fn dropping_the_loop_cancels_its_handle() {
        let (fire, handle) = RenderLoop::start(bounds(), 23);
        assert!(!handle.is_cancelled());
        drop(fire);
        assert!(handle.is_cancelled());
    }

    #[test]
    fn pool_is_full_from_the_first_frame() {
        let (fire, _handle) = RenderLoop::start(bounds(), 24);
        assert_eq!(fire.pool().len(), config::POOL_SIZE);
        assert!(fire.pool().all_alive());
    }
}
