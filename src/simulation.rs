use anyhow::Result;
use log::debug;
use rand::prelude::*;
use rand_distr::{UnitCircle, UnitSphere};
use rayon::prelude::*;

use emission_common::{
    Photon, Point, SimParams, SimulationConfig, Snapshot, Source, Wave, WavefrontRecord,
};

/// Owns the emitter, every live disturbance, and the simulation clock, and
/// advances them in lock step once per tick.
///
/// Entities never reference each other, so the photon update runs as a
/// parallel-for over disjoint state. Collection management (spawning and
/// retirement) stays serial.
pub struct EmissionSimulation {
    /// The simulation configuration.
    config: SimulationConfig,
    /// Derived per-tick parameters.
    params: SimParams,
    /// The moving emitter.
    source: Source,
    photons: Vec<Photon>,
    waves: Vec<Wave>,
    /// RNG for emission directions, seeded from the config.
    rng: StdRng,
    /// The current simulation step number.
    current_time_step: u32,
    /// Stores collected simulation data snapshots at record intervals.
    recorded_snapshots: Vec<Snapshot>,
}

impl EmissionSimulation {
    /// Creates a new `EmissionSimulation`, placing the source and shedding
    /// the first disturbances at t = 0.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let params = config.get_sim_params();
        let start = Point::from_components(&config.source.start_position)?;
        let rng = StdRng::seed_from_u64(config.source.emission_seed);

        let mut sim = Self {
            config,
            params,
            source: Source::new(start),
            photons: Vec::new(),
            waves: Vec::new(),
            rng,
            current_time_step: 0,
            recorded_snapshots: Vec::new(),
        };

        if sim.params.wave_interval_steps > 0 {
            sim.emit_wave()?;
        }
        if sim.params.photon_interval_steps > 0 {
            sim.emit_photons()?;
        }
        Ok(sim)
    }

    /// Simulation time at the current step.
    pub fn current_time(&self) -> f64 {
        self.current_time_step as f64 * self.params.dt
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) -> Result<()> {
        self.params.time_step = self.current_time_step;

        // --- 1. Move the Source ---
        let displacement = Point::from_components(&self.params.source_step)?;
        let new_position = self.source.position().add(displacement)?;
        self.source.set_position(new_position);

        // --- 2. Advance Photons (Parallel) ---
        let step_length = self.params.wave_growth_per_step;
        self.photons
            .par_iter_mut()
            .try_for_each(|photon| photon.update_position(Some(step_length)).map(|_| ()))?;

        // --- 3. Shift and Expand Wavefronts ---
        // Every live front's center drags along with the source while the
        // front itself keeps growing at the medium speed. Above the medium
        // speed the centers outrun the older fronts.
        for wave in &mut self.waves {
            wave.shift_and_expand(displacement, Some(step_length))?;
        }

        self.current_time_step += 1;

        // --- 4. Emit New Disturbances ---
        if due(self.params.wave_interval_steps, self.current_time_step) {
            self.emit_wave()?;
        }
        if due(self.params.photon_interval_steps, self.current_time_step) {
            self.emit_photons()?;
        }

        // --- 5. Retire Out-of-Range Entities ---
        self.retire()?;

        Ok(())
    }

    /// Sheds a fresh zero-radius front at the source's current position.
    fn emit_wave(&mut self) -> Result<()> {
        let wave = Wave::new(
            self.source.position(),
            self.current_time(),
            self.config.source.frequency,
            Some(self.params.wave_speed),
        )?;
        self.waves.push(wave);
        debug!(
            "Emitted wavefront at t={:.3} ({} live)",
            self.current_time(),
            self.waves.len()
        );
        Ok(())
    }

    /// Sheds an isotropic burst of photons at the source's current position.
    fn emit_photons(&mut self) -> Result<()> {
        let position = self.source.position();
        let time = self.current_time();
        for _ in 0..self.params.photons_per_emission {
            let direction = self.random_direction();
            let photon = Photon::new(
                position,
                direction,
                time,
                Some(self.params.wave_speed),
                self.config.source.frequency,
                None,
            )?;
            self.photons.push(photon);
        }
        debug!(
            "Emitted {} photons at t={:.3} ({} live)",
            self.params.photons_per_emission,
            time,
            self.photons.len()
        );
        Ok(())
    }

    fn random_direction(&mut self) -> Point {
        if self.params.dim == 2 {
            let [x, y]: [f64; 2] = self.rng.sample(UnitCircle);
            Point::new_2d(x, y)
        } else {
            let [x, y, z]: [f64; 3] = self.rng.sample(UnitSphere);
            Point::new_3d(x, y, z)
        }
    }

    /// Drops disturbances that have left the region of interest. The core
    /// never destroys entities; that bookkeeping lives here.
    fn retire(&mut self) -> Result<()> {
        let bound = self.params.retire_radius;
        let waves_before = self.waves.len();
        self.waves.retain(|wave| wave.radius() <= bound);

        let bound_sq = bound * bound;
        let photons_before = self.photons.len();
        let photons = std::mem::take(&mut self.photons);
        for photon in photons {
            if photon.position().distance_squared(photon.origin())? <= bound_sq {
                self.photons.push(photon);
            }
        }

        let retired =
            (waves_before - self.waves.len()) + (photons_before - self.photons.len());
        if retired > 0 {
            debug!("Retired {} out-of-range disturbances", retired);
        }
        Ok(())
    }

    /// Collects the current state and metrics as a Snapshot. Should be
    /// called at record intervals.
    pub fn record_snapshot(&mut self) -> Result<()> {
        let time = self.current_time();
        debug!("Recording snapshot at t={:.3}...", time);

        let mut overtaken = 0u32;
        let mut fronts = Vec::with_capacity(self.waves.len());
        for wave in &self.waves {
            let offset = wave.origin_offset().length();
            if offset > wave.radius() {
                overtaken += 1;
            }
            fronts.push(WavefrontRecord {
                center: wave.shifted_origin().components(),
                radius: wave.radius(),
                origin_offset: offset,
            });
        }

        let (wavefronts, photon_positions) = if self.config.output.save_entities_in_snapshot {
            let positions = self
                .photons
                .iter()
                .map(|photon| photon.position().components())
                .collect();
            (Some(fronts), Some(positions))
        } else {
            (None, None)
        };

        self.recorded_snapshots.push(Snapshot {
            time,
            source_position: self.source.position().components(),
            wave_count: self.waves.len() as u32,
            photon_count: self.photons.len() as u32,
            overtaken_wave_count: overtaken,
            wavefronts,
            photon_positions,
        });

        Ok(())
    }

    /// Retrieves the current positions of all live photons.
    pub fn get_results(&self) -> Vec<Vec<f64>> {
        self.photons
            .iter()
            .map(|photon| photon.position().components())
            .collect()
    }

    /// Provides access to the recorded snapshots.
    pub fn get_recorded_snapshots(&self) -> &Vec<Snapshot> {
        &self.recorded_snapshots
    }

    pub fn current_wave_count(&self) -> usize {
        self.waves.len()
    }

    pub fn current_photon_count(&self) -> usize {
        self.photons.len()
    }

    /// Provides access to the simulation parameters.
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Provides access to the original simulation configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

// A disabled cadence (0) never fires.
fn due(interval_steps: u32, step: u32) -> bool {
    interval_steps > 0 && step % interval_steps == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use emission_common::{OutputConfig, SourceConfig, TimingConfig, UniverseConfig};

    fn test_config(velocity: Vec<f64>) -> SimulationConfig {
        SimulationConfig {
            universe: UniverseConfig {
                dimensions: 2,
                wave_speed: 1.0,
            },
            timing: TimingConfig {
                dt: 0.1,
                total_time: 2.0,
                record_interval: 0.5,
            },
            source: SourceConfig {
                start_position: vec![0.0, 0.0],
                velocity,
                wave_emission_interval: 0.2,
                photon_emission_interval: 0.5,
                photons_per_emission: 8,
                frequency: None,
                emission_seed: 7,
            },
            output: OutputConfig {
                base_filename: "test".to_string(),
                format: None,
                save_stats: false,
                save_positions: false,
                save_entities_in_snapshot: true,
                retire_radius: 50.0,
            },
        }
    }

    #[test]
    fn emits_on_the_configured_cadence() {
        let mut sim = EmissionSimulation::new(test_config(vec![3.0, 0.0])).unwrap();
        // one front and one burst at t = 0
        assert_eq!(sim.current_wave_count(), 1);
        assert_eq!(sim.current_photon_count(), 8);
        for _ in 0..20 {
            sim.step().unwrap();
        }
        // fronts at steps 0, 2, 4, ..., 20; bursts at 0, 5, 10, 15, 20
        assert_eq!(sim.current_wave_count(), 11);
        assert_eq!(sim.current_photon_count(), 40);
    }

    #[test]
    fn fronts_grow_at_the_medium_speed() {
        let mut sim = EmissionSimulation::new(test_config(vec![3.0, 0.0])).unwrap();
        for _ in 0..20 {
            sim.step().unwrap();
        }
        sim.record_snapshot().unwrap();
        let snapshot = sim.get_recorded_snapshots().last().unwrap();
        let fronts = snapshot.wavefronts.as_ref().unwrap();
        // the first front has been growing since t = 0
        assert!((fronts[0].radius - 2.0).abs() < 1e-9);
        // later fronts are strictly smaller
        for pair in fronts.windows(2) {
            assert!(pair[1].radius < pair[0].radius);
        }
    }

    #[test]
    fn superluminal_source_overtakes_its_fronts() {
        let mut sim = EmissionSimulation::new(test_config(vec![3.0, 0.0])).unwrap();
        for _ in 0..20 {
            sim.step().unwrap();
        }
        sim.record_snapshot().unwrap();
        let snapshot = sim.get_recorded_snapshots().last().unwrap();
        assert!(snapshot.overtaken_wave_count > 0);
        // the source sits ahead of the oldest front's leading edge
        assert!((snapshot.source_position[0] - 6.0).abs() < 1e-9);
    }

    #[test]
    fn subluminal_source_never_overtakes() {
        let mut sim = EmissionSimulation::new(test_config(vec![0.5, 0.0])).unwrap();
        for _ in 0..20 {
            sim.step().unwrap();
        }
        sim.record_snapshot().unwrap();
        let snapshot = sim.get_recorded_snapshots().last().unwrap();
        assert_eq!(snapshot.overtaken_wave_count, 0);
    }

    #[test]
    fn out_of_range_disturbances_retire() {
        let mut config = test_config(vec![3.0, 0.0]);
        config.output.retire_radius = 1.0;
        let mut sim = EmissionSimulation::new(config).unwrap();
        for _ in 0..40 {
            sim.step().unwrap();
        }
        // the bound is crossed 10 steps after emission, so only the fronts
        // and bursts from the last 10 steps survive (the one exactly at the
        // bound may land on either side of it)
        assert!((5..=6).contains(&sim.current_wave_count()));
        assert!((16..=24).contains(&sim.current_photon_count()));
    }

    #[test]
    fn photons_spread_isotropically_from_their_burst_point() {
        let mut sim = EmissionSimulation::new(test_config(vec![0.0, 0.0])).unwrap();
        // stop before the second burst at step 5
        for _ in 0..4 {
            sim.step().unwrap();
        }
        // all photons from the t = 0 burst sit on a circle of radius 0.4
        for position in sim.get_results() {
            let r = (position[0] * position[0] + position[1] * position[1]).sqrt();
            assert!((r - 0.4).abs() < 1e-9);
        }
    }
}
