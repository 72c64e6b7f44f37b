use macroquad::prelude::*;
use macroquad::rand::gen_range;

use crate::grid::Cell;
use crate::presentation::Effects;

const DAMPING: f32 = 0.98;
const FOOD_PARTICLES: usize = 12;
const FOOD_LIFE: u32 = 30;
const COLLISION_PARTICLES: usize = 20;
const COLLISION_LIFE: u32 = 40;

const FOOD_COLORS: [Color; 4] = [
    Color::new(1.0, 0.28, 0.34, 1.0),
    Color::new(1.0, 0.42, 0.48, 1.0),
    Color::new(1.0, 0.65, 0.01, 1.0),
    Color::new(1.0, 0.87, 0.35, 1.0),
];
const COLLISION_COLORS: [Color; 3] = [
    Color::new(1.0, 0.28, 0.34, 1.0),
    Color::new(1.0, 0.22, 0.22, 1.0),
    Color::new(0.77, 0.27, 0.41, 1.0),
];

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
    pub color: Color,
    pub size: f32,
}

impl Particle {
    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Even ring of sparks around an eaten food.
    pub fn food_burst(&mut self, center: Vec2) {
        for i in 0..FOOD_PARTICLES {
            let angle = std::f32::consts::TAU * i as f32 / FOOD_PARTICLES as f32;
            let speed = gen_range(2.0, 5.0);
            self.particles.push(Particle {
                pos: center,
                vel: Vec2::from_angle(angle) * speed,
                life: FOOD_LIFE,
                max_life: FOOD_LIFE,
                color: FOOD_COLORS[gen_range(0, FOOD_COLORS.len())],
                size: gen_range(3.0, 5.0),
            });
        }
    }

    pub fn collision_burst(&mut self, center: Vec2) {
        for _ in 0..COLLISION_PARTICLES {
            let angle = gen_range(0.0, std::f32::consts::TAU);
            let speed = gen_range(3.0, 8.0);
            self.particles.push(Particle {
                pos: center,
                vel: Vec2::from_angle(angle) * speed,
                life: COLLISION_LIFE,
                max_life: COLLISION_LIFE,
                color: COLLISION_COLORS[gen_range(0, COLLISION_COLORS.len())],
                size: gen_range(4.0, 7.0),
            });
        }
    }

    /// One frame of motion; dead particles are dropped.
    pub fn update(&mut self) {
        self.particles.retain_mut(|p| {
            p.pos += p.vel;
            p.vel *= DAMPING;
            p.life = p.life.saturating_sub(1);
            p.life > 0
        });
    }

    pub fn draw(&self, offset: Vec2) {
        for p in &self.particles {
            let alpha = p.alpha();
            let color = Color::new(p.color.r, p.color.g, p.color.b, alpha);
            draw_circle(p.pos.x + offset.x, p.pos.y + offset.y, p.size * alpha, color);
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScreenShake {
    intensity: f32,
    duration: u32,
    elapsed: u32,
}

impl ScreenShake {
    pub fn shake(&mut self, intensity: f32, duration_frames: u32) {
        self.intensity = intensity;
        self.duration = duration_frames;
        self.elapsed = 0;
    }

    pub fn is_active(&self) -> bool {
        self.elapsed < self.duration
    }

    pub fn update(&mut self) {
        if self.is_active() {
            self.elapsed += 1;
        }
    }

    /// Current amplitude, fading linearly to zero over the duration.
    pub fn amplitude(&self) -> f32 {
        if !self.is_active() {
            return 0.0;
        }
        let progress = self.elapsed as f32 / self.duration as f32;
        self.intensity * (1.0 - progress)
    }

    pub fn offset(&self) -> (f32, f32) {
        let amp = self.amplitude();
        if amp == 0.0 {
            return (0.0, 0.0);
        }
        (gen_range(-amp, amp), gen_range(-amp, amp))
    }

    pub fn stop(&mut self) {
        self.duration = 0;
        self.elapsed = 0;
    }
}

/// Particles and shake together, positioned on a grid of `cell_size` pixel cells.
#[derive(Clone, Debug)]
pub struct EffectLayer {
    cell_size: f32,
    pub particles: ParticleSystem,
    pub shake: ScreenShake,
}

impl EffectLayer {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size, particles: ParticleSystem::default(), shake: ScreenShake::default() }
    }

    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        vec2(
            (cell.x as f32 + 0.5) * self.cell_size,
            (cell.y as f32 + 0.5) * self.cell_size,
        )
    }

    pub fn update(&mut self) {
        self.particles.update();
        self.shake.update();
    }
}

impl Effects for EffectLayer {
    fn shake(&mut self, intensity: f32, duration_frames: u32) {
        self.shake.shake(intensity, duration_frames);
    }

    fn burst_food(&mut self, at: Cell) {
        let center = self.cell_center(at);
        self.particles.food_burst(center);
    }

    fn burst_collision(&mut self, at: Cell) {
        let center = self.cell_center(at);
        self.particles.collision_burst(center);
    }

    fn clear(&mut self) {
        self.particles.clear();
        self.shake.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particles_fade_and_expire() {
        let mut layer = EffectLayer::new(30.0);
        layer.burst_food(Cell::new(1, 1));
        assert_eq!(layer.particles.particles().len(), FOOD_PARTICLES);
        assert_eq!(layer.particles.particles()[0].pos, vec2(45.0, 45.0));
        layer.update();
        assert!(layer.particles.particles().iter().all(|p| p.alpha() < 1.0));
        for _ in 0..FOOD_LIFE {
            layer.update();
        }
        assert!(layer.particles.particles().is_empty());
    }

    #[test]
    fn collision_particles_outlive_food_particles() {
        let mut particles = ParticleSystem::default();
        particles.food_burst(Vec2::ZERO);
        particles.collision_burst(Vec2::ZERO);
        for _ in 0..FOOD_LIFE {
            particles.update();
        }
        assert_eq!(particles.particles().len(), COLLISION_PARTICLES);
    }

    #[test]
    fn shake_decays_to_rest() {
        let mut shake = ScreenShake::default();
        assert_eq!(shake.offset(), (0.0, 0.0));
        shake.shake(10.0, 20);
        assert_eq!(shake.amplitude(), 10.0);
        let (x, y) = shake.offset();
        assert!(x.abs() <= 10.0 && y.abs() <= 10.0);
        for _ in 0..10 {
            shake.update();
        }
        assert!((shake.amplitude() - 5.0).abs() < 1e-5);
        for _ in 0..10 {
            shake.update();
        }
        assert!(!shake.is_active());
        assert_eq!(shake.offset(), (0.0, 0.0));
    }

    #[test]
    fn clear_drops_everything() {
        let mut layer = EffectLayer::new(10.0);
        layer.burst_collision(Cell::new(0, 0));
        Effects::shake(&mut layer, 8.0, 15);
        Effects::clear(&mut layer);
        assert!(layer.particles.particles().is_empty());
        assert!(!layer.shake.is_active());
    }
}
