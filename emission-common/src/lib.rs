pub mod config;
pub mod error;
pub mod photon;
pub mod sim_params;
pub mod snapshot;
pub mod source;
pub mod spectral;
pub mod vecmath;
pub mod wave;

// Re-export key types for easier use by dependent crates
pub use config::{OutputConfig, SimulationConfig, SourceConfig, TimingConfig, UniverseConfig};
pub use error::{KinematicsError, Result};
pub use photon::Photon;
pub use sim_params::SimParams;
pub use snapshot::{Snapshot, WavefrontRecord};
pub use source::Source;
pub use spectral::SpectralProfile;
pub use vecmath::{Point, Vec2, Vec3, EPS};
pub use wave::Wave;
