use super::math::{add, velocity};
use super::types::{ParticleSnapshot, Point};
use rand::Rng;
use std::f64::consts::PI;

pub const DEFAULT_PARTICLE_SPEED: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct BurstSpec {
    pub count: usize,
    pub lifetime: u32,
    pub speed: f64,
}

pub const FOOD_BURST: BurstSpec = BurstSpec {
    count: 20,
    lifetime: 30,
    speed: DEFAULT_PARTICLE_SPEED,
};
pub const AI_FOOD_BURST: BurstSpec = BurstSpec {
    count: 15,
    lifetime: 25,
    speed: DEFAULT_PARTICLE_SPEED,
};
pub const POWER_UP_BURST: BurstSpec = BurstSpec {
    count: 30,
    lifetime: 40,
    speed: DEFAULT_PARTICLE_SPEED,
};
pub const DEATH_BURST: BurstSpec = BurstSpec {
    count: 30,
    lifetime: 40,
    speed: DEFAULT_PARTICLE_SPEED,
};
pub const GAME_OVER_BURST: BurstSpec = BurstSpec {
    count: 50,
    lifetime: 60,
    speed: 3.0,
};

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Point,
    pub vel: Point,
    pub life: u32,
}

#[derive(Debug, Clone)]
pub struct ParticleBurst {
    pub color: String,
    pub lifetime: u32,
    pub particles: Vec<Particle>,
}

impl ParticleBurst {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, origin: Point, color: &str, spec: BurstSpec) -> Self {
        let particles = (0..spec.count)
            .map(|_| {
                let angle = rng.gen::<f64>() * PI * 2.0;
                let speed = spec.speed * (0.5 + rng.gen::<f64>());
                Particle {
                    pos: origin,
                    vel: velocity(angle, speed),
                    life: spec.lifetime,
                }
            })
            .collect();
        Self {
            color: color.to_string(),
            lifetime: spec.lifetime,
            particles,
        }
    }

    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.pos = add(particle.pos, particle.vel);
            particle.life = particle.life.saturating_sub(1);
        }
    }

    pub fn is_dead(&self) -> bool {
        self.particles.iter().all(|particle| particle.life == 0)
    }

    pub fn snapshot(&self, out: &mut Vec<ParticleSnapshot>) {
        let lifetime = self.lifetime.max(1) as f64;
        for particle in self.particles.iter().filter(|particle| particle.life > 0) {
            out.push(ParticleSnapshot {
                x: particle.pos.x,
                y: particle.pos.y,
                alpha: particle.life as f64 / lifetime,
                color: self.color.clone(),
            });
        }
    }
}
