use serde::{Serialize, Deserialize};

/// Geometry of one wavefront at snapshot time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WavefrontRecord {
    /// Center of the front, adjusted for source motion since emission.
    pub center: Vec<f64>,
    pub radius: f64,
    /// Distance the center has moved from the emission point.
    pub origin_offset: f64,
}

/// A snapshot of the simulation state and metrics at a specific time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The simulation time at which the snapshot was taken.
    pub time: f64,
    /// The source position at that time.
    pub source_position: Vec<f64>,
    /// The number of live wavefronts.
    pub wave_count: u32,
    /// The number of live photons.
    pub photon_count: u32,
    /// Fronts whose center has moved farther than their radius — the source
    /// has overtaken them. Stays zero while the source is slower than the
    /// medium.
    pub overtaken_wave_count: u32,
    /// Optional: per-front geometry, included only if
    /// `output.save_entities_in_snapshot` is set.
    #[serde(skip_serializing_if = "Option::is_none")] // Don't write "wavefronts": null
    pub wavefronts: Option<Vec<WavefrontRecord>>,
    /// Optional: raw photon positions at the snapshot time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photon_positions: Option<Vec<Vec<f64>>>,
}
