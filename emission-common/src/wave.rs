use serde::{Serialize, Deserialize};

use crate::error::{KinematicsError, Result};
use crate::spectral::SpectralProfile;
use crate::vecmath::Point;

/// An expanding wavefront anchored at an emission point and time.
///
/// The radius starts at zero and only ever grows. The front's center — the
/// shifted origin — starts at the emission point and is displaced each tick
/// by however far the emitting source moved, so a source faster than the
/// medium drags the centers of later fronts past the fronts it emitted
/// earlier. The emission point itself never moves.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    origin: Point,
    origin_time: f64,
    shifted_origin: Point,
    radius: f64,
    speed: Option<f64>,
    profile: SpectralProfile,
}

impl Wave {
    /// Creates a zero-radius front at `origin`, emitted at `origin_time`.
    ///
    /// `speed` must be positive when given. Frequency derivation follows the
    /// same rule as [`Photon`](crate::photon::Photon).
    pub fn new(
        origin: Point,
        origin_time: f64,
        frequency: Option<f64>,
        speed: Option<f64>,
    ) -> Result<Self> {
        if let Some(speed) = speed {
            if speed <= 0.0 {
                return Err(KinematicsError::value(format!(
                    "wave speed must be positive, got {speed}"
                )));
            }
        }
        let profile = SpectralProfile::new(frequency, speed)?;
        Ok(Self {
            origin,
            origin_time,
            shifted_origin: origin,
            radius: 0.0,
            speed,
            profile,
        })
    }

    /// Direct override of the front's center.
    pub fn set_shifted_origin(&mut self, shifted_origin: Point) -> Result<()> {
        if shifted_origin.dim() != self.origin.dim() {
            return Err(KinematicsError::dimension(format!(
                "shifted origin is {}D, wave is {}D",
                shifted_origin.dim(),
                self.origin.dim()
            )));
        }
        self.shifted_origin = shifted_origin;
        Ok(())
    }

    /// Direct override of the radius. Negative radii are rejected.
    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        if radius < 0.0 {
            return Err(KinematicsError::value(format!(
                "radius must not be negative, got {radius}"
            )));
        }
        self.radius = radius;
        Ok(())
    }

    /// Grows the front by one step and returns
    /// `(shifted_origin, old_radius, new_radius)`.
    ///
    /// `speed` overrides the stored speed for this step; zero is allowed
    /// (an idle tick), negative is not. A front, once emitted, only grows.
    pub fn expand(&mut self, speed: Option<f64>) -> Result<(Point, f64, f64)> {
        let growth = self.resolve_speed(speed)?;
        let old_radius = self.radius;
        self.radius += growth;
        Ok((self.shifted_origin, old_radius, self.radius))
    }

    /// Displaces the front's center by `shift_vector` — how far the source
    /// moved this tick — and grows the radius, in one atomic step. Returns
    /// `(old_shifted_origin, new_shifted_origin, old_radius, new_radius)`.
    ///
    /// Per-tick displacements larger than the radial growth make the center
    /// outrun fronts emitted earlier; consumers reconstruct the overlap
    /// envelope from the `(shifted_origin, radius)` snapshots across fronts.
    pub fn shift_and_expand(
        &mut self,
        shift_vector: Point,
        speed: Option<f64>,
    ) -> Result<(Point, Point, f64, f64)> {
        // Resolve everything fallible before mutating anything.
        let growth = self.resolve_speed(speed)?;
        let old_position = self.shifted_origin;
        let new_position = self.shifted_origin.add(shift_vector)?;
        self.shifted_origin = new_position;
        let old_radius = self.radius;
        self.radius += growth;
        Ok((old_position, new_position, old_radius, self.radius))
    }

    fn resolve_speed(&self, speed: Option<f64>) -> Result<f64> {
        match speed {
            Some(s) if s < 0.0 => Err(KinematicsError::value(format!(
                "wave speed must not be negative, got {s}"
            ))),
            Some(s) => Ok(s),
            None => self
                .speed
                .ok_or_else(|| KinematicsError::value("no speed given and none stored")),
        }
    }

    /// Displacement of the front's center from the emission point — how far
    /// the source has moved since this front left it. Independent of radius
    /// growth; a center farther out than the radius means the source has
    /// overtaken this front.
    pub fn origin_offset(&self) -> Point {
        match (self.shifted_origin, self.origin) {
            (Point::D2(s), Point::D2(o)) => Point::D2(s.sub(o)),
            (Point::D3(s), Point::D3(o)) => Point::D3(s.sub(o)),
            // construction and every mutator keep both tags equal
            _ => unreachable!("shifted origin and origin dimensions diverged"),
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn origin_time(&self) -> f64 {
        self.origin_time
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn shifted_origin(&self) -> Point {
        self.shifted_origin
    }

    pub fn speed(&self) -> Result<f64> {
        self.speed
            .ok_or_else(|| KinematicsError::state("speed was never set"))
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

#[cfg(test)]
mod tests {
    use super::*;

    fn wave_2d() -> Wave {
        Wave::new(Point::new_2d(0.0, 0.0), 0.0, None, Some(2.0)).unwrap()
    }

    #[test]
    fn starts_at_zero_radius_with_center_at_origin() {
        let w = wave_2d();
        assert_eq!(w.radius(), 0.0);
        assert!(w.shifted_origin().is_close(&w.origin()));
        assert!(w.origin_offset().is_close(&Point::new_2d(0.0, 0.0)));
    }

    #[test]
    fn expand_grows_by_the_stored_speed() {
        let mut w = wave_2d();
        let (center, old, new) = w.expand(None).unwrap();
        assert!(center.is_close(&Point::new_2d(0.0, 0.0)));
        assert_eq!(old, 0.0);
        assert_eq!(new, 2.0);
    }

    #[test]
    fn source_outruns_its_second_wavefront() {
        let mut w = wave_2d();
        w.expand(None).unwrap();
        let (old_pos, new_pos, old_radius, new_radius) =
            w.shift_and_expand(Point::new_2d(5.0, 0.0), None).unwrap();
        assert!(old_pos.is_close(&Point::new_2d(0.0, 0.0)));
        assert!(new_pos.is_close(&Point::new_2d(5.0, 0.0)));
        assert_eq!(old_radius, 2.0);
        assert_eq!(new_radius, 4.0);
        let offset = w.origin_offset();
        assert!(offset.is_close(&Point::new_2d(5.0, 0.0)));
        // offset magnitude 5 > radius 4: the source has overtaken this front
        assert!(offset.length() > w.radius());
    }

    #[test]
    fn radius_is_the_exact_sum_of_increments() {
        let mut w = wave_2d();
        let increments = [2.0, 0.0, 0.5, 1.25, 3.0];
        let mut previous = 0.0;
        for inc in increments {
            let (_, old, new) = w.expand(Some(inc)).unwrap();
            assert_eq!(old, previous);
            assert!(new >= old);
            previous = new;
        }
        assert_eq!(w.radius(), increments.iter().sum::<f64>());
    }

    #[test]
    fn expand_leaves_the_offset_alone() {
        let mut w = wave_2d();
        w.shift_and_expand(Point::new_2d(1.0, -2.0), None).unwrap();
        let offset = w.origin_offset();
        w.expand(None).unwrap();
        w.expand(Some(0.0)).unwrap();
        assert!(w.origin_offset().is_close(&offset));
    }

    #[test]
    fn offset_is_exactly_shifted_minus_origin() {
        let mut w = Wave::new(Point::new_3d(1.0, 2.0, 3.0), 0.0, None, Some(1.0)).unwrap();
        w.shift_and_expand(Point::new_3d(0.5, -1.0, 2.0), None)
            .unwrap();
        let expected = w.shifted_origin().sub(w.origin()).unwrap();
        assert_eq!(w.origin_offset(), expected);
    }

    #[test]
    fn failed_shift_leaves_state_unchanged() {
        let mut w = wave_2d();
        w.expand(None).unwrap();
        let center = w.shifted_origin();
        let radius = w.radius();
        // mismatched shift dimension
        assert!(matches!(
            w.shift_and_expand(Point::new_3d(1.0, 0.0, 0.0), None),
            Err(KinematicsError::Dimension(_))
        ));
        assert_eq!(w.shifted_origin(), center);
        assert_eq!(w.radius(), radius);
        // negative speed
        assert!(matches!(
            w.shift_and_expand(Point::new_2d(1.0, 0.0), Some(-1.0)),
            Err(KinematicsError::Value(_))
        ));
        assert_eq!(w.shifted_origin(), center);
        assert_eq!(w.radius(), radius);
    }

    #[test]
    fn expand_without_any_speed_fails() {
        let mut w = Wave::new(Point::new_2d(0.0, 0.0), 0.0, None, None).unwrap();
        assert!(matches!(w.expand(None), Err(KinematicsError::Value(_))));
        assert_eq!(w.radius(), 0.0);
    }

    #[test]
    fn negative_expand_is_rejected() {
        let mut w = wave_2d();
        assert!(matches!(
            w.expand(Some(-0.5)),
            Err(KinematicsError::Value(_))
        ));
        assert_eq!(w.radius(), 0.0);
    }

    #[test]
    fn setters_validate() {
        let mut w = wave_2d();
        w.set_radius(7.5).unwrap();
        assert_eq!(w.radius(), 7.5);
        assert!(matches!(
            w.set_radius(-1.0),
            Err(KinematicsError::Value(_))
        ));
        w.set_shifted_origin(Point::new_2d(1.0, 1.0)).unwrap();
        assert!(matches!(
            w.set_shifted_origin(Point::new_3d(0.0, 0.0, 0.0)),
            Err(KinematicsError::Dimension(_))
        ));
    }

    #[test]
    fn non_positive_construction_speed_fails() {
        for bad in [0.0, -2.0] {
            assert!(matches!(
                Wave::new(Point::new_2d(0.0, 0.0), 0.0, None, Some(bad)),
                Err(KinematicsError::Value(_))
            ));
        }
    }

    #[test]
    fn zero_frequency_fails() {
        assert!(matches!(
            Wave::new(Point::new_2d(0.0, 0.0), 0.0, Some(0.0), None),
            Err(KinematicsError::Value(_))
        ));
    }

    #[test]
    fn spectral_accessors_follow_construction_inputs() {
        let w = Wave::new(Point::new_2d(0.0, 0.0), 1.5, Some(4.0), Some(2.0)).unwrap();
        assert_eq!(w.origin_time(), 1.5);
        assert_eq!(w.frequency().unwrap(), 4.0);
        assert_eq!(w.period().unwrap(), 0.25);
        assert_eq!(w.wavelength().unwrap(), 0.5);
        assert_eq!(w.wavenumber().unwrap(), 2.0);

        let bare = Wave::new(Point::new_2d(0.0, 0.0), 0.0, None, None).unwrap();
        assert!(matches!(bare.speed(), Err(KinematicsError::State(_))));
        assert!(matches!(bare.frequency(), Err(KinematicsError::State(_))));
    }
}
