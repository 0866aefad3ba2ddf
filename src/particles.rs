use ::rand::Rng;
use macroquad::prelude::*;

use crate::config;

/// One combustion element. Never destroyed, only reset back to the bottom edge.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub decay: f32,
}

impl Particle {
    pub fn spawn(bounds: Vec2, rng: &mut impl Rng) -> Self {
        let mut p = Self {
            pos: Vec2::ZERO,
            velocity: Vec2::ZERO,
            life: 0.0,
            max_life: 0.0,
            size: 0.0,
            decay: 0.0,
        };
        p.reset(bounds, rng);
        p
    }

    /// Re-randomize at the bottom of the surface.
    pub fn reset(&mut self, bounds: Vec2, rng: &mut impl Rng) {
        self.pos = vec2(rng.gen_range(0.0..=bounds.x), bounds.y);
        self.velocity = vec2(
            rng.gen_range(-config::PARTICLE_DRIFT_MAX..config::PARTICLE_DRIFT_MAX),
            -rng.gen_range(config::PARTICLE_RISE_MIN..config::PARTICLE_RISE_MAX),
        );
        self.life = rng.gen_range(config::PARTICLE_LIFE_MIN..config::PARTICLE_LIFE_MAX);
        self.max_life = self.life;
        self.size = rng.gen_range(config::PARTICLE_SIZE_MIN..config::PARTICLE_SIZE_MAX);
        self.decay = rng.gen_range(config::PARTICLE_DECAY_MIN..config::PARTICLE_DECAY_MAX);
    }

    /// Advance one frame. A particle that burns out is reset in the same step.
    pub fn update(&mut self, bounds: Vec2, rng: &mut impl Rng) {
        self.pos += self.velocity;
        self.life -= self.decay;
        self.size -= config::PARTICLE_SHRINK;

        // turbulence
        self.velocity.x +=
            rng.gen_range(-config::PARTICLE_TURBULENCE..config::PARTICLE_TURBULENCE);

        if !self.is_alive() {
            self.reset(bounds, rng);
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0 && self.size > 0.0
    }

    pub fn life_ratio(&self) -> f32 {
        self.life / self.max_life
    }
}

/// Color tier for a particle at the given life ratio: hot core, flame body, then smoke.
pub fn color_for(life_ratio: f32, rng: &mut impl Rng) -> Color {
    if life_ratio > config::HOT_CORE_RATIO {
        Color::new(1.0, 1.0, 200.0 / 255.0, 0.8)
    } else if life_ratio > config::FLAME_BODY_RATIO {
        let green = 150.0 + rng.gen_range(0.0..50.0);
        Color::new(1.0, green / 255.0, 0.0, 0.7)
    } else {
        Color::new(150.0 / 255.0, 50.0 / 255.0, 50.0 / 255.0, 0.4)
    }
}

/// Fixed pool of particles for one burn. Length never changes after creation.
pub struct ParticlePool {
    particles: [Particle; config::POOL_SIZE],
    bounds: Vec2,
}

impl ParticlePool {
    pub fn new(bounds: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            particles: std::array::from_fn(|_| Particle::spawn(bounds, rng)),
            bounds,
        }
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    pub fn all_alive(&self) -> bool {
        self.particles.iter().all(Particle::is_alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const BOUNDS: Vec2 = Vec2::new(config::DEFAULT_SURFACE_WIDTH, config::DEFAULT_SURFACE_HEIGHT);

    #[test]
    fn reset_spawns_on_bottom_edge_within_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let p = Particle::spawn(BOUNDS, &mut rng);
            assert_eq!(p.pos.y, BOUNDS.y);
            assert!((0.0..=BOUNDS.x).contains(&p.pos.x));
            assert!((-1.0..1.0).contains(&p.velocity.x));
            assert!(p.velocity.y <= -2.0 && p.velocity.y > -5.0);
            assert!((40.0..100.0).contains(&p.life));
            assert_eq!(p.life, p.max_life);
            assert!((10.0..25.0).contains(&p.size));
            assert!((0.5..1.0).contains(&p.decay));
        }
    }

    #[test]
    fn update_moves_and_decays() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut p = Particle::spawn(BOUNDS, &mut rng);
        let before = p;
        p.update(BOUNDS, &mut rng);

        assert_eq!(p.pos, before.pos + before.velocity);
        assert!((p.life - (before.life - before.decay)).abs() < 1e-4);
        assert!((p.size - (before.size - 0.1)).abs() < 1e-4);
        assert!((p.velocity.x - before.velocity.x).abs() <= 0.1);
        assert_eq!(p.velocity.y, before.velocity.y);
    }

    #[test]
    fn burnt_out_particle_resets_in_same_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut p = Particle::spawn(BOUNDS, &mut rng);
        p.pos = vec2(10.0, 5.0);
        p.life = 0.2;
        p.decay = 0.5;
        p.update(BOUNDS, &mut rng);

        assert!(p.is_alive());
        assert_eq!(p.pos.y, BOUNDS.y);
        assert_eq!(p.life, p.max_life);
    }

    #[test]
    fn shrunk_particle_resets_even_with_life_left() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut p = Particle::spawn(BOUNDS, &mut rng);
        p.size = 0.05;
        p.life = 50.0;
        p.update(BOUNDS, &mut rng);

        assert!(p.is_alive());
        assert!(p.size >= config::PARTICLE_SIZE_MIN);
    }

    #[test]
    fn color_tiers_cool_with_age() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let hot = color_for(0.95, &mut rng);
        assert_eq!((hot.r, hot.g, hot.a), (1.0, 1.0, 0.8));

        let body = color_for(0.8, &mut rng);
        assert_eq!(body.r, 1.0);
        assert_eq!(body.b, 0.0);
        assert_eq!(body.a, 0.7);
        assert!(body.g >= 150.0 / 255.0 && body.g < 200.0 / 255.0);

        let smoke = color_for(0.5, &mut rng);
        assert_eq!(smoke.a, 0.4);
        assert!(smoke.r < 1.0);
    }

    #[test]
    fn pool_keeps_fixed_size_and_live_particles_over_many_frames() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut pool = ParticlePool::new(BOUNDS, &mut rng);
        assert_eq!(pool.len(), config::POOL_SIZE);

        for _ in 0..1000 {
            let bounds = pool.bounds();
            for p in pool.iter_mut() {
                p.update(bounds, &mut rng);
            }
            assert_eq!(pool.len(), config::POOL_SIZE);
            assert!(pool.all_alive());
        }
    }
}
