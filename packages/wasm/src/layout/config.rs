//! Layout configuration.

use serde::Deserialize;

/// Parameters for the force simulation and the normalisation step.
///
/// Deserialises from a partial camelCase object; missing fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Number of simulation ticks (default: 300).
    pub iterations: u32,
    /// Many-body strength; negative repels (default: -120).
    pub charge_strength: f64,
    /// Rest length of every edge (default: 80).
    pub link_distance: f64,
    /// Fraction of velocity lost per tick (default: 0.4).
    pub velocity_decay: f64,
    /// Alpha reached after `iterations` ticks (default: 0.001).
    pub alpha_min: f64,
    /// Half-extent of the render volume after normalisation (default: 100).
    pub radius: f32,
    /// Seed for initial placement jitter. `None` draws a fresh seed, so
    /// unseeded layouts differ from run to run.
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            charge_strength: -120.0,
            link_distance: 80.0,
            velocity_decay: 0.4,
            alpha_min: 0.001,
            radius: 100.0,
            seed: None,
        }
    }
}

impl LayoutConfig {
    /// Per-tick alpha decay so that alpha falls from 1 to `alpha_min`
    /// over `iterations` ticks.
    pub fn alpha_decay(&self) -> f64 {
        if self.iterations == 0 {
            return 1.0;
        }
        1.0 - self.alpha_min.powf(1.0 / self.iterations as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_decay_reaches_min() {
        let config = LayoutConfig::default();
        let decay = config.alpha_decay();
        let mut alpha = 1.0f64;
        for _ in 0..config.iterations {
            alpha += (0.0 - alpha) * decay;
        }
        assert!((alpha - config.alpha_min).abs() < 1e-9, "alpha = {alpha}");
    }

    #[test]
    fn test_zero_iterations() {
        let config = LayoutConfig {
            iterations: 0,
            ..Default::default()
        };
        assert_eq!(config.alpha_decay(), 1.0);
    }
}
