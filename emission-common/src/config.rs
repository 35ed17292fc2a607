use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::SimParams;
use std::path::Path;

// Configuration for the wave medium and world dimensionality
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UniverseConfig {
    pub dimensions: usize,
    pub wave_speed: f64,
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub dt: f64,
    pub total_time: f64,
    pub record_interval: f64,
}

// Emitter trajectory and emission cadence, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SourceConfig {
    pub start_position: Vec<f64>,
    pub velocity: Vec<f64>,
    /// Seconds between wavefront emissions; 0 disables wavefronts.
    pub wave_emission_interval: f64,
    /// Seconds between photon bursts; 0 disables photons.
    pub photon_emission_interval: f64,
    #[serde(default = "default_photons_per_emission")]
    pub photons_per_emission: u32,
    /// Optional emission frequency carried onto every disturbance.
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default = "default_emission_seed")]
    pub emission_seed: u64,
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
    pub save_stats: bool,
    pub save_positions: bool,
    pub save_entities_in_snapshot: bool,
    /// Disturbances farther out than this are retired by the driver.
    #[serde(default = "default_retire_radius")]
    pub retire_radius: f64,
}

fn default_photons_per_emission() -> u32 {
    16
}

fn default_emission_seed() -> u64 {
    42
}

fn default_retire_radius() -> f64 {
    100.0
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub universe: UniverseConfig,
    pub timing: TimingConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config: SimulationConfig = toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the cross-field constraints a TOML parse cannot express.
    pub fn validate(&self) -> Result<()> {
        let dim = self.universe.dimensions;
        if !(2..=3).contains(&dim) {
            anyhow::bail!("dimensions must be 2 or 3, got {}.", dim);
        }
        if self.universe.wave_speed <= 0.0 {
            anyhow::bail!("wave_speed must be positive.");
        }
        if self.timing.dt <= 0.0 {
            anyhow::bail!("dt must be positive.");
        }
        if self.timing.total_time <= 0.0 {
            anyhow::bail!("total_time must be positive.");
        }
        if self.source.start_position.len() != dim {
            anyhow::bail!(
                "start_position has {} components, expected {}.",
                self.source.start_position.len(),
                dim
            );
        }
        if self.source.velocity.len() != dim {
            anyhow::bail!(
                "velocity has {} components, expected {}.",
                self.source.velocity.len(),
                dim
            );
        }
        if self.source.wave_emission_interval < 0.0 {
            anyhow::bail!("wave_emission_interval must not be negative.");
        }
        if self.source.photon_emission_interval < 0.0 {
            anyhow::bail!("photon_emission_interval must not be negative.");
        }
        if let Some(freq) = self.source.frequency {
            if freq == 0.0 {
                anyhow::bail!("frequency must be non-zero when given.");
            }
        }
        if self.output.retire_radius <= 0.0 {
            anyhow::bail!("retire_radius must be positive.");
        }
        Ok(())
    }

    /// Converts the configuration into the runtime parameters used every
    /// tick.
    pub fn get_sim_params(&self) -> SimParams {
        let dt = self.timing.dt;
        let wave_speed = self.universe.wave_speed;

        let source_step: Vec<f64> = self.source.velocity.iter().map(|v| v * dt).collect();
        let source_speed = self
            .source
            .velocity
            .iter()
            .map(|v| v * v)
            .sum::<f64>()
            .sqrt();

        SimParams {
            dim: self.universe.dimensions,
            wave_speed,
            dt,
            time_step: 0, // Initial time step is 0
            wave_growth_per_step: wave_speed * dt,
            source_step,
            source_speed,
            speed_ratio: source_speed / wave_speed,
            wave_interval_steps: interval_steps(self.source.wave_emission_interval, dt),
            photon_interval_steps: interval_steps(self.source.photon_emission_interval, dt),
            photons_per_emission: self.source.photons_per_emission,
            retire_radius: self.output.retire_radius,
        }
    }
}

// An interval shorter than one step still fires every step; zero disables.
fn interval_steps(interval: f64, dt: f64) -> u32 {
    if interval <= 0.0 {
        0
    } else {
        (interval / dt).max(1.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [universe]
        dimensions = 2
        wave_speed = 1.0

        [timing]
        dt = 0.1
        total_time = 10.0
        record_interval = 0.5

        [source]
        start_position = [-5.0, 0.0]
        velocity = [2.0, 0.0]
        wave_emission_interval = 0.2
        photon_emission_interval = 0.0

        [output]
        base_filename = "run"
        save_stats = true
        save_positions = false
        save_entities_in_snapshot = true
    "#;

    fn sample_config() -> SimulationConfig {
        toml::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn sample_parses_and_validates() {
        let config = sample_config();
        config.validate().unwrap();
        assert_eq!(config.source.photons_per_emission, 16);
        assert_eq!(config.output.retire_radius, 100.0);
        assert!(config.output.format.is_none());
    }

    #[test]
    fn params_derive_per_tick_values() {
        let params = sample_config().get_sim_params();
        assert_eq!(params.dim, 2);
        assert!((params.wave_growth_per_step - 0.1).abs() < 1e-12);
        assert!((params.source_step[0] - 0.2).abs() < 1e-12);
        assert!((params.speed_ratio - 2.0).abs() < 1e-12);
        assert_eq!(params.wave_interval_steps, 2);
        // zero interval disables photon emission entirely
        assert_eq!(params.photon_interval_steps, 0);
    }

    #[test]
    fn sub_step_intervals_clamp_to_every_step() {
        let mut config = sample_config();
        config.source.wave_emission_interval = 0.01;
        assert_eq!(config.get_sim_params().wave_interval_steps, 1);
    }

    #[test]
    fn validation_rejects_bad_fields() {
        let mut config = sample_config();
        config.universe.dimensions = 4;
        assert!(config.validate().is_err());

        let mut config = sample_config();
        config.universe.wave_speed = 0.0;
        assert!(config.validate().is_err());

        let mut config = sample_config();
        config.source.velocity = vec![1.0, 0.0, 0.0];
        assert!(config.validate().is_err());

        let mut config = sample_config();
        config.source.frequency = Some(0.0);
        assert!(config.validate().is_err());

        let mut config = sample_config();
        config.output.retire_radius = -1.0;
        assert!(config.validate().is_err());
    }
}
