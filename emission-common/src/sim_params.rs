use serde::{Deserialize, Serialize};

/// Runtime parameters derived from the configuration, consumed every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    // World
    pub dim: usize,
    pub wave_speed: f64,

    // Time
    pub dt: f64,
    pub time_step: u32, // Current simulation step number

    // Per-tick increments
    pub wave_growth_per_step: f64, // wave_speed * dt
    pub source_step: Vec<f64>,     // velocity * dt, `dim` components

    // Source regime
    pub source_speed: f64,
    /// Source speed over wave speed; above 1.0 the source outruns its own
    /// fronts.
    pub speed_ratio: f64,

    // Emission cadence in whole steps (0 = disabled)
    pub wave_interval_steps: u32,
    pub photon_interval_steps: u32,
    pub photons_per_emission: u32,

    // Distance at which the driver retires disturbances
    pub retire_radius: f64,
}
