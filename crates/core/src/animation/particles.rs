//! Transient particles spawned by hold events.
//!
//! Particles are an overlay. Render sums the particles into a scratch row and
//! lightens the strip with it, so whatever the base layer painted shows
//! through and rendering again changes nothing.

use super::{Animation, Cadence};
use crate::color::hue;
use crate::hold::HoldEvent;
use crate::rng::SimpleRng;
use crate::types::{LedStrip, Pixel, StripError, StripId};

const MAX_PARTICLES: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Particle {
    pos: f32,
    /// Pixels per second.
    velocity: f32,
    color: Pixel,
    life: f32,
}

#[derive(Debug, Clone)]
pub struct Particles {
    strip: StripId,
    cadence: Cadence,
    pixel_count: usize,
    leds_per_button: usize,
    particles: Vec<Particle>,
    /// Glow level per button while charging; decays when not refreshed.
    charge: Vec<f32>,
}

impl Particles {
    const DECAY_PER_SEC: f32 = 1.5;
    const CHARGE_DECAY: f32 = 0.8;

    pub fn new(strip: StripId, pixel_count: usize, buttons: usize) -> Self {
        Self {
            strip,
            cadence: Cadence::new(20),
            pixel_count,
            leds_per_button: pixel_count / buttons.max(1),
            particles: Vec::with_capacity(MAX_PARTICLES),
            charge: vec![0.0; buttons],
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn charge(&self, button: usize) -> f32 {
        self.charge.get(button).copied().unwrap_or(0.0)
    }

    /// Spawn whatever `event` calls for.
    pub fn trigger(&mut self, event: &HoldEvent, rng: &mut SimpleRng) {
        let button = event.button();
        let origin = self.center_of(button);
        match *event {
            HoldEvent::Dot { .. } => {
                let color = hue(rng.next_range(360) as f32);
                let dir = if rng.chance(0.5) { 1.0 } else { -1.0 };
                self.spawn(origin, dir * 30.0, color);
            }
            HoldEvent::Stream { .. } => {
                let color = hue(button as f32 * 36.0 + rng.next_range(30) as f32);
                self.spawn(origin, 60.0, color);
                self.spawn(origin, -60.0, color);
            }
            HoldEvent::Charging { level, .. } => {
                if let Some(c) = self.charge.get_mut(button) {
                    *c = level.clamp(0.0, 1.0);
                }
            }
            HoldEvent::Explosion { level, .. } => {
                if let Some(c) = self.charge.get_mut(button) {
                    *c = 0.0;
                }
                let count = 4 + (level.clamp(0.0, 1.0) * 20.0) as usize;
                for _ in 0..count {
                    let speed = 40.0 + rng.next_f32() * 160.0 * (0.5 + level);
                    let dir = if rng.chance(0.5) { 1.0 } else { -1.0 };
                    let color = hue(rng.next_range(60) as f32);
                    self.spawn(origin, dir * speed, color);
                }
            }
            HoldEvent::Burst { .. } => {
                for k in 0..6 {
                    let dir = if k % 2 == 0 { 1.0 } else { -1.0 };
                    let speed = 50.0 + rng.next_f32() * 50.0;
                    self.spawn(origin, dir * speed, Pixel::WHITE);
                }
            }
        }
    }

    fn center_of(&self, button: usize) -> f32 {
        let center = button * self.leds_per_button + self.leds_per_button / 2;
        center.min(self.pixel_count.saturating_sub(1)) as f32
    }

    fn spawn(&mut self, pos: f32, velocity: f32, color: Pixel) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(Particle {
            pos,
            velocity,
            color,
            life: 1.0,
        });
    }
}

impl Animation for Particles {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn strip(&self) -> StripId {
        self.strip
    }

    fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    fn cadence_mut(&mut self) -> &mut Cadence {
        &mut self.cadence
    }

    fn advance(&mut self, dt_ms: u64, _rng: &mut SimpleRng) {
        let dt = dt_ms as f32 / 1000.0;
        let end = self.pixel_count as f32;
        for p in &mut self.particles {
            p.pos += p.velocity * dt;
            p.life -= Self::DECAY_PER_SEC * dt;
        }
        self.particles
            .retain(|p| p.life > 0.0 && p.pos >= 0.0 && p.pos < end);
        for c in &mut self.charge {
            *c *= Self::CHARGE_DECAY;
            if *c < 0.01 {
                *c = 0.0;
            }
        }
    }

    fn render(&self, strip: &mut dyn LedStrip) -> Result<(), StripError> {
        let len = strip.pixel_count();
        let mut glow = vec![Pixel::BLACK; len];
        for (button, &level) in self.charge.iter().enumerate() {
            let center = self.center_of(button) as usize;
            if level > 0.0 && center < len {
                glow[center] = glow[center].saturating_add(Pixel::WHITE.scale(level));
            }
        }
        for p in &self.particles {
            let i = p.pos as usize;
            if i < len {
                glow[i] = glow[i].saturating_add(p.color.scale(p.life));
            }
        }
        for (i, color) in glow.into_iter().enumerate() {
            if !color.is_black() {
                strip.set(i, strip.get(i)?.lighten(color))?;
            }
        }
        Ok(())
    }
}
