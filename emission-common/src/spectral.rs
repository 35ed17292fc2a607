use serde::{Serialize, Deserialize};

use crate::error::{KinematicsError, Result};

/// Frequency-derived quantities of a disturbance, resolved once at
/// construction and immutable afterwards.
///
/// A frequency given alone fixes the period; a frequency paired with the
/// propagation speed additionally fixes wavelength and wavenumber. Accessors
/// on [`Photon`](crate::photon::Photon) and [`Wave`](crate::wave::Wave) map
/// an absent field to a state error.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpectralProfile {
    /// No frequency information.
    Bare,
    /// Frequency without a propagation speed.
    Periodic { frequency: f64, period: f64 },
    /// Frequency and propagation speed.
    Dispersive {
        frequency: f64,
        period: f64,
        wavelength: f64,
        wavenumber: f64,
    },
}

impl SpectralProfile {
    /// Derives the profile from the optional construction inputs.
    /// The caller validates `speed` itself; only the frequency is checked
    /// here.
    pub fn new(frequency: Option<f64>, speed: Option<f64>) -> Result<Self> {
        let Some(frequency) = frequency else {
            return Ok(Self::Bare);
        };
        if frequency == 0.0 {
            return Err(KinematicsError::value("frequency must be non-zero"));
        }
        let period = 1.0 / frequency;
        match speed {
            Some(speed) => {
                let wavelength = speed / frequency;
                Ok(Self::Dispersive {
                    frequency,
                    period,
                    wavelength,
                    wavenumber: 1.0 / wavelength,
                })
            }
            None => Ok(Self::Periodic { frequency, period }),
        }
    }

    pub fn frequency(&self) -> Option<f64> {
        match *self {
            Self::Bare => None,
            Self::Periodic { frequency, .. } | Self::Dispersive { frequency, .. } => {
                Some(frequency)
            }
        }
    }

    pub fn period(&self) -> Option<f64> {
        match *self {
            Self::Bare => None,
            Self::Periodic { period, .. } | Self::Dispersive { period, .. } => Some(period),
        }
    }

    pub fn wavelength(&self) -> Option<f64> {
        match *self {
            Self::Dispersive { wavelength, .. } => Some(wavelength),
            _ => None,
        }
    }

    pub fn wavenumber(&self) -> Option<f64> {
        match *self {
            Self::Dispersive { wavenumber, .. } => Some(wavenumber),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_frequency_is_bare() {
        let p = SpectralProfile::new(None, Some(2.0)).unwrap();
        assert_eq!(p, SpectralProfile::Bare);
        assert!(p.frequency().is_none());
        assert!(p.period().is_none());
        assert!(p.wavelength().is_none());
    }

    #[test]
    fn frequency_alone_sets_period() {
        let p = SpectralProfile::new(Some(4.0), None).unwrap();
        assert_eq!(p.frequency(), Some(4.0));
        assert_eq!(p.period(), Some(0.25));
        assert!(p.wavelength().is_none());
        assert!(p.wavenumber().is_none());
    }

    #[test]
    fn frequency_and_speed_set_wavelength_and_wavenumber() {
        let p = SpectralProfile::new(Some(4.0), Some(2.0)).unwrap();
        assert_eq!(p.period(), Some(0.25));
        assert_eq!(p.wavelength(), Some(0.5));
        assert_eq!(p.wavenumber(), Some(2.0));
    }

    #[test]
    fn zero_frequency_is_rejected() {
        assert!(matches!(
            SpectralProfile::new(Some(0.0), None),
            Err(KinematicsError::Value(_))
        ));
    }
}
