use ::rand::Rng;
use macroquad::prelude::*;

use crate::config;
use crate::particles::{self, ParticlePool};

/// How new draws combine with what is already on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Ordinary alpha compositing.
    SourceOver,
    /// Brightness adds up where draws overlap.
    Additive,
}

/// Surface used when the host does not supply a usable size.
pub const DEFAULT_SURFACE: Vec2 = Vec2::new(
    config::DEFAULT_SURFACE_WIDTH,
    config::DEFAULT_SURFACE_HEIGHT,
);

/// Check a host-supplied surface size. Both sides must be finite and positive.
pub fn surface_size(width: f32, height: f32) -> Result<Vec2, String> {
    if !(width.is_finite() && width > 0.0) {
        return Err(format!("surface width must be a positive number, got {width}"));
    }
    if !(height.is_finite() && height > 0.0) {
        return Err(format!("surface height must be a positive number, got {height}"));
    }
    Ok(vec2(width, height))
}

/// A fixed-size 2-D canvas supplied by the host. The fire never resizes it.
pub trait RenderSurface {
    fn size(&self) -> Vec2;
    fn set_blend(&mut self, mode: BlendMode);
    /// Fill an axis-aligned rectangle with `color` using the current blend mode.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn begin_frame(&mut self) {}
    fn end_frame(&mut self) {}
}

/// Per-frame draw routine for the burning effect.
pub struct FireRenderer {
    trail: Color,
}

impl Default for FireRenderer {
    fn default() -> Self {
        Self {
            trail: Color::new(0.0, 0.0, 0.0, config::TRAIL_ALPHA),
        }
    }
}

impl FireRenderer {
    /// Paint one frame: fade the previous frame for trails, then update and
    /// draw every particle additively in pool order.
    pub fn draw_frame(
        &self,
        pool: &mut ParticlePool,
        surface: &mut dyn RenderSurface,
        rng: &mut impl Rng,
    ) {
        surface.begin_frame();

        surface.set_blend(BlendMode::SourceOver);
        let full = surface.size();
        surface.fill_rect(Vec2::ZERO, full, self.trail);

        surface.set_blend(BlendMode::Additive);
        let bounds = pool.bounds();
        for p in pool.iter_mut() {
            p.update(bounds, rng);
            let color = particles::color_for(p.life_ratio(), rng);
            surface.fill_circle(p.pos, p.size, color);
        }

        surface.end_frame();
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp {
    Blend(BlendMode),
    Rect { origin: Vec2, size: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
}

/// Surface that records draw calls instead of rasterizing them.
/// Used by the headless QA run and by tests.
pub struct RecordingSurface {
    size: Vec2,
    ops: Vec<DrawOp>,
    frames: u64,
}

impl RecordingSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ops: Vec::new(),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        self.ops.iter().filter_map(|op| match *op {
            DrawOp::Circle {
                center,
                radius,
                color,
            } => Some((center, radius, color)),
            _ => None,
        })
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.ops.push(DrawOp::Blend(mode));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.ops.push(DrawOp::Rect {
            origin,
            size,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    /// Only the latest frame is kept.
    fn begin_frame(&mut self) {
        self.ops.clear();
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (ParticlePool, RecordingSurface, ChaCha8Rng) {
        let size = vec2(config::DEFAULT_SURFACE_WIDTH, config::DEFAULT_SURFACE_HEIGHT);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let pool = ParticlePool::new(size, &mut rng);
        (pool, RecordingSurface::new(size), rng)
    }

    #[test]
    fn frame_fades_then_switches_to_additive_before_particles() {
        let (mut pool, mut surface, mut rng) = setup();
        FireRenderer::default().draw_frame(&mut pool, &mut surface, &mut rng);

        let ops = surface.ops();
        assert_eq!(ops[0], DrawOp::Blend(BlendMode::SourceOver));
        match ops[1] {
            DrawOp::Rect {
                origin,
                size,
                color: c,
            } => {
                assert_eq!(origin, Vec2::ZERO);
                assert_eq!(size, surface.size());
                assert_eq!((c.r, c.g, c.b), (0.0, 0.0, 0.0));
                assert!((c.a - 0.1).abs() < 1e-6);
            }
            other => panic!("expected trail fill, got {other:?}"),
        }
        assert_eq!(ops[2], DrawOp::Blend(BlendMode::Additive));
        assert_eq!(ops.len(), 3 + config::POOL_SIZE);
        assert!(!ops
            .iter()
            .any(|op| matches!(op, DrawOp::Rect { color, .. } if color.a >= 1.0)));
    }

    #[test]
    fn trail_covers_the_host_surface() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut pool = ParticlePool::new(vec2(100.0, 100.0), &mut rng);
        let mut surface = RecordingSurface::new(vec2(320.0, 384.0));
        FireRenderer::default().draw_frame(&mut pool, &mut surface, &mut rng);

        assert!(matches!(
            surface.ops()[1],
            DrawOp::Rect { size, .. } if size == vec2(320.0, 384.0)
        ));
    }

    #[test]
    fn surface_size_rejects_unusable_dimensions() {
        assert_eq!(surface_size(320.0, 384.0), Ok(vec2(320.0, 384.0)));
        for (w, h) in [
            (-10.0, 384.0),
            (0.0, 384.0),
            (320.0, -1.0),
            (f32::NAN, 384.0),
            (320.0, f32::INFINITY),
        ] {
            assert!(surface_size(w, h).is_err(), "{w}x{h} accepted");
        }
    }

    #[test]
    fn circles_follow_pool_order_with_current_size() {
        let (mut pool, mut surface, mut rng) = setup();
        let renderer = FireRenderer::default();
        for _ in 0..30 {
            renderer.draw_frame(&mut pool, &mut surface, &mut rng);
        }

        let drawn: Vec<_> = surface.circles().collect();
        assert_eq!(drawn.len(), pool.len());
        for ((center, radius, _), p) in drawn.iter().zip(pool.iter()) {
            assert_eq!(*center, p.pos);
            assert_eq!(*radius, p.size);
            assert!(*radius > 0.0);
        }
        assert_eq!(surface.frames(), 30);
    }

    #[test]
    fn drawn_colors_come_from_the_three_tiers() {
        let (mut pool, mut surface, mut rng) = setup();
        let renderer = FireRenderer::default();
        for _ in 0..120 {
            renderer.draw_frame(&mut pool, &mut surface, &mut rng);
            for (_, _, color) in surface.circles() {
                assert!([0.8, 0.7, 0.4].contains(&color.a));
            }
        }
    }
}
