use serde::{Serialize, Deserialize};

use crate::error::{KinematicsError, Result};
use crate::spectral::SpectralProfile;
use crate::vecmath::Point;

/// A discrete disturbance travelling along a fixed ray from a fixed emission
/// point and time.
///
/// The direction is unit length at all times and the position only ever
/// moves along `origin + t * direction`. A new emission is always a new
/// `Photon`; origin and origin time never change after construction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Photon {
    origin: Point,
    direction: Point,
    origin_time: f64,
    position: Point,
    speed: Option<f64>,
    energy: Option<f64>,
    profile: SpectralProfile,
}

impl Photon {
    /// Creates a photon at `origin` heading along `direction` (normalized
    /// here), emitted at `origin_time`.
    ///
    /// `speed` must be positive when given. A `frequency` alone derives the
    /// period; together with `speed` it also derives wavelength and
    /// wavenumber.
    pub fn new(
        origin: Point,
        direction: Point,
        origin_time: f64,
        speed: Option<f64>,
        frequency: Option<f64>,
        energy: Option<f64>,
    ) -> Result<Self> {
        if origin.dim() != direction.dim() {
            return Err(KinematicsError::dimension(format!(
                "origin is {}D but direction is {}D",
                origin.dim(),
                direction.dim()
            )));
        }
        if let Some(speed) = speed {
            if speed <= 0.0 {
                return Err(KinematicsError::value(format!(
                    "speed must be positive, got {speed}"
                )));
            }
        }
        let profile = SpectralProfile::new(frequency, speed)?;
        Ok(Self {
            origin,
            direction: direction.normalize()?,
            origin_time,
            position: origin,
            speed,
            energy,
            profile,
        })
    }

    /// Replaces the direction with the normalized form of `direction`.
    ///
    /// Escape hatch for refraction-style corrections; the steady-state tick
    /// loop never changes direction.
    pub fn set_direction(&mut self, direction: Point) -> Result<()> {
        if direction.dim() != self.direction.dim() {
            return Err(KinematicsError::dimension(format!(
                "direction is {}D, photon is {}D",
                direction.dim(),
                self.direction.dim()
            )));
        }
        self.direction = direction.normalize()?;
        Ok(())
    }

    /// Teleports the photon, bypassing the ray constraint. For
    /// initialization and correction only, never part of the per-tick
    /// update.
    pub fn set_position(&mut self, position: Point) -> Result<()> {
        if position.dim() != self.position.dim() {
            return Err(KinematicsError::dimension(format!(
                "position is {}D, photon is {}D",
                position.dim(),
                self.position.dim()
            )));
        }
        self.position = position;
        Ok(())
    }

    /// Advances the position one step along the ray and returns
    /// `(old_position, new_position)`.
    ///
    /// `speed` overrides the stored speed for this step; with neither
    /// available the call fails and the position is untouched. N calls with
    /// the same speed land exactly where one call with the summed
    /// displacement would; there is no hidden state beyond the position.
    pub fn update_position(&mut self, speed: Option<f64>) -> Result<(Point, Point)> {
        let step = self.resolve_speed(speed)?;
        let old_position = self.position;
        self.position = self.position.add(self.direction.scale(step))?;
        Ok((old_position, self.position))
    }

    fn resolve_speed(&self, speed: Option<f64>) -> Result<f64> {
        match speed {
            Some(s) if s <= 0.0 => Err(KinematicsError::value(format!(
                "speed must be positive, got {s}"
            ))),
            Some(s) => Ok(s),
            None => self
                .speed
                .ok_or_else(|| KinematicsError::value("no speed given and none stored")),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn origin_time(&self) -> f64 {
        self.origin_time
    }

    pub fn direction(&self) -> Point {
        self.direction
    }

    pub fn speed(&self) -> Result<f64> {
        self.speed
            .ok_or_else(|| KinematicsError::state("speed was never set"))
    }

    pub fn energy(&self) -> Result<f64> {
        self.energy
            .ok_or_else(|| KinematicsError::state("energy was never set"))
    }

    pub fn frequency(&self) -> Result<f64> {
        self.profile
            .frequency()
            .ok_or_else(|| KinematicsError::state("frequency was never set"))
    }

    pub fn period(&self) -> Result<f64> {
        self.profile
            .period()
            .ok_or_else(|| KinematicsError::state("period requires a frequency"))
    }

    pub fn wavelength(&self) -> Result<f64> {
        self.profile
            .wavelength()
            .ok_or_else(|| KinematicsError::state("wavelength requires frequency and speed"))
    }

    pub fn wavenumber(&self) -> Result<f64> {
        self.profile
            .wavenumber()
            .ok_or_else(|| KinematicsError::state("wavenumber requires frequency and speed"))
    }
}
