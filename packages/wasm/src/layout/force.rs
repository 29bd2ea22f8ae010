//! Force-directed relaxation.
//!
//! Three forces act on every tick, in this order:
//!
//! 1. **Link:** each edge pulls or pushes its endpoints toward
//!    `link_distance`, weighted by endpoint degree so hubs move less.
//! 2. **Many-body:** every pair of bodies repels with strength
//!    `charge_strength / d²` (exact O(n²); trees here are small).
//! 3. **Centre:** the whole system is translated so its mean sits on the
//!    canvas centre.
//!
//! Velocities are then damped by `velocity_decay` and integrated. All
//! forces are scaled by `alpha`, which decays geometrically from 1 to
//! `alpha_min` over the configured number of ticks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::LayoutConfig;

/// Radius of the first ring of the initial spiral.
const INITIAL_RADIUS: f64 = 10.0;

/// Squared distance below which repulsion stops growing.
const DISTANCE_MIN_SQ: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default)]
struct Body {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

#[derive(Debug, Clone, Copy)]
struct Link {
    source: usize,
    target: usize,
    strength: f64,
    bias: f64,
}

/// A bounded, synchronous force simulation over body indices.
pub struct ForceSimulation {
    bodies: Vec<Body>,
    links: Vec<Link>,
    center: (f64, f64),
    alpha: f64,
    alpha_decay: f64,
    config: LayoutConfig,
    rng: StdRng,
}

impl ForceSimulation {
    /// Place `body_count` bodies on a spiral around the canvas centre.
    ///
    /// `links` are (source, target) index pairs; out-of-range pairs and
    /// self-loops are skipped.
    pub fn new(
        body_count: usize,
        links: &[(usize, usize)],
        width: f64,
        height: f64,
        config: &LayoutConfig,
    ) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        let center = (width / 2.0, height / 2.0);

        let golden = std::f64::consts::PI * (3.0 - 5.0f64.sqrt());
        let bodies = (0..body_count)
            .map(|i| {
                let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                let angle = i as f64 * golden;
                Body {
                    x: center.0 + radius * angle.cos() + jiggle(&mut rng),
                    y: center.1 + radius * angle.sin() + jiggle(&mut rng),
                    vx: 0.0,
                    vy: 0.0,
                }
            })
            .collect();

        let mut degree = vec![0u32; body_count];
        let valid: Vec<(usize, usize)> = links
            .iter()
            .copied()
            .filter(|&(s, t)| s < body_count && t < body_count && s != t)
            .collect();
        for &(s, t) in &valid {
            degree[s] += 1;
            degree[t] += 1;
        }
        let links = valid
            .into_iter()
            .map(|(source, target)| {
                let (ds, dt) = (degree[source] as f64, degree[target] as f64);
                Link {
                    source,
                    target,
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect();

        Self {
            bodies,
            links,
            center,
            alpha: 1.0,
            alpha_decay: config.alpha_decay(),
            config: config.clone(),
            rng,
        }
    }

    /// Current cooling factor.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) {
        self.alpha += (0.0 - self.alpha) * self.alpha_decay;

        self.apply_links();
        self.apply_many_body();
        self.apply_center();

        let keep = 1.0 - self.config.velocity_decay;
        for body in &mut self.bodies {
            body.vx *= keep;
            body.vy *= keep;
            body.x += body.vx;
            body.y += body.vy;
        }
    }

    /// Run every configured tick and return the final positions.
    pub fn run(mut self) -> Vec<(f64, f64)> {
        for _ in 0..self.config.iterations {
            self.tick();
        }
        self.positions()
    }

    /// Current positions, one per body.
    pub fn positions(&self) -> Vec<(f64, f64)> {
        self.bodies.iter().map(|b| (b.x, b.y)).collect()
    }

    fn apply_links(&mut self) {
        for i in 0..self.links.len() {
            let link = self.links[i];
            let s = self.bodies[link.source];
            let t = self.bodies[link.target];

            let mut x = t.x + t.vx - s.x - s.vx;
            let mut y = t.y + t.vy - s.y - s.vy;
            if x == 0.0 {
                x = jiggle(&mut self.rng);
            }
            if y == 0.0 {
                y = jiggle(&mut self.rng);
            }

            let len = (x * x + y * y).sqrt();
            let l = (len - self.config.link_distance) / len * self.alpha * link.strength;
            x *= l;
            y *= l;

            let target = &mut self.bodies[link.target];
            target.vx -= x * link.bias;
            target.vy -= y * link.bias;
            let source = &mut self.bodies[link.source];
            source.vx += x * (1.0 - link.bias);
            source.vy += y * (1.0 - link.bias);
        }
    }

    fn apply_many_body(&mut self) {
        let n = self.bodies.len();
        let strength = self.config.charge_strength * self.alpha;
        for i in 0..n {
            let (mut dvx, mut dvy) = (0.0, 0.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut x = self.bodies[j].x - self.bodies[i].x;
                let mut y = self.bodies[j].y - self.bodies[i].y;
                let mut l = x * x + y * y;
                if x == 0.0 {
                    x = jiggle(&mut self.rng);
                    l += x * x;
                }
                if y == 0.0 {
                    y = jiggle(&mut self.rng);
                    l += y * y;
                }
                if l < DISTANCE_MIN_SQ {
                    l = (DISTANCE_MIN_SQ * l).sqrt();
                }
                let w = strength / l;
                dvx += x * w;
                dvy += y * w;
            }
            self.bodies[i].vx += dvx;
            self.bodies[i].vy += dvy;
        }
    }

    fn apply_center(&mut self) {
        if self.bodies.is_empty() {
            return;
        }
        let n = self.bodies.len() as f64;
        let (sx, sy) = self
            .bodies
            .iter()
            .fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
        let dx = sx / n - self.center.0;
        let dy = sy / n - self.center.1;
        for body in &mut self.bodies {
            body.x -= dx;
            body.y -= dy;
        }
    }
}

fn jiggle(rng: &mut StdRng) -> f64 {
    (rng.random::<f64>() - 0.5) * 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> LayoutConfig {
        LayoutConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_empty() {
        let sim = ForceSimulation::new(0, &[], 400.0, 800.0, &seeded(1));
        assert!(sim.run().is_empty());
    }

    #[test]
    fn test_deterministic_with_seed() {
        let links = [(0, 1), (0, 2), (1, 3)];
        let a = ForceSimulation::new(4, &links, 400.0, 800.0, &seeded(5)).run();
        let b = ForceSimulation::new(4, &links, 400.0, 800.0, &seeded(5)).run();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mean_at_center() {
        let links = [(0, 1), (0, 2), (1, 3), (1, 4)];
        let positions = ForceSimulation::new(5, &links, 400.0, 800.0, &seeded(2)).run();
        let n = positions.len() as f64;
        let mx = positions.iter().map(|p| p.0).sum::<f64>() / n;
        let my = positions.iter().map(|p| p.1).sum::<f64>() / n;
        // Centring runs before integration, so the mean drifts by at most
        // one tick of (tiny, late-stage) velocity
        assert!((mx - 200.0).abs() < 1.0, "mean x = {mx}");
        assert!((my - 400.0).abs() < 1.0, "mean y = {my}");
    }

    #[test]
    fn test_bodies_separate() {
        let links: Vec<(usize, usize)> = (1..7).map(|i| ((i - 1) / 2, i)).collect();
        let positions = ForceSimulation::new(7, &links, 400.0, 800.0, &seeded(3)).run();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let d = distance(positions[i], positions[j]);
                assert!(d > 10.0, "bodies {i} and {j} overlap: {d}");
            }
        }
    }

    #[test]
    fn test_link_length_near_rest() {
        let positions = ForceSimulation::new(2, &[(0, 1)], 400.0, 400.0, &seeded(4)).run();
        let d = distance(positions[0], positions[1]);
        // Repulsion stretches the link a little past its rest length
        assert!(d > 60.0 && d < 140.0, "link length {d}");
    }

    #[test]
    fn test_invalid_links_skipped() {
        let sim = ForceSimulation::new(2, &[(0, 0), (0, 9)], 100.0, 100.0, &seeded(1));
        assert!(sim.links.is_empty());
    }

    #[test]
    fn test_alpha_cools() {
        let mut sim = ForceSimulation::new(3, &[(0, 1)], 100.0, 100.0, &seeded(1));
        sim.tick();
        let first = sim.alpha();
        sim.tick();
        assert!(sim.alpha() < first);
        assert!(first < 1.0);
    }
}
