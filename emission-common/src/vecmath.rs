use serde::{Serialize, Deserialize};

use crate::error::{KinematicsError, Result};

/// Tolerance for degenerate-length checks and float comparisons.
pub const EPS: f64 = 1e-9;

// Basic 2D vector type
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline(always)]
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }
    #[inline(always)]
    pub fn length_squared(self) -> f64 { self.x * self.x + self.y * self.y }
    #[inline(always)]
    pub fn length(self) -> f64 { self.length_squared().sqrt() }
    #[inline(always)]
    pub fn add(self, other: Self) -> Self { Self::new(self.x + other.x, self.y + other.y) }
    #[inline(always)]
    pub fn sub(self, other: Self) -> Self { Self::new(self.x - other.x, self.y - other.y) }
    #[inline(always)]
    pub fn scale(self, scalar: f64) -> Self { Self::new(self.x * scalar, self.y * scalar) }
    #[inline(always)]
    pub fn dot(self, other: Self) -> f64 { self.x * other.x + self.y * other.y }
}

// Basic 3D vector type
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[inline(always)]
    pub fn new(x: f64, y: f64, z: f64) -> Self { Self { x, y, z } }
    #[inline(always)]
    pub fn length_squared(self) -> f64 { self.x * self.x + self.y * self.y + self.z * self.z }
    #[inline(always)]
    pub fn length(self) -> f64 { self.length_squared().sqrt() }
    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
    #[inline(always)]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
    #[inline(always)]
    pub fn scale(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
    #[inline(always)]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

/// A 2D or 3D point (or displacement) whose dimensionality is fixed when it
/// is built. Serves as both position and direction; operations between two
/// points require matching variants and fail rather than broadcast or
/// truncate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Point {
    D2(Vec2),
    D3(Vec3),
}

impl Point {
    #[inline(always)]
    pub fn new_2d(x: f64, y: f64) -> Self {
        Self::D2(Vec2::new(x, y))
    }

    #[inline(always)]
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self::D3(Vec3::new(x, y, z))
    }

    /// Single entry point for variable-length numeric input. Anything other
    /// than 2 or 3 components is rejected here, once, so downstream code
    /// never re-checks lengths.
    pub fn from_components(components: &[f64]) -> Result<Self> {
        match components {
            [x, y] => Ok(Self::new_2d(*x, *y)),
            [x, y, z] => Ok(Self::new_3d(*x, *y, *z)),
            _ => Err(KinematicsError::dimension(format!(
                "point must have 2 or 3 components, got {}",
                components.len()
            ))),
        }
    }

    /// Number of spatial components (2 or 3).
    #[inline(always)]
    pub fn dim(&self) -> usize {
        match self {
            Self::D2(_) => 2,
            Self::D3(_) => 3,
        }
    }

    /// Components in order, for serialization and external consumers.
    pub fn components(&self) -> Vec<f64> {
        match self {
            Self::D2(v) => vec![v.x, v.y],
            Self::D3(v) => vec![v.x, v.y, v.z],
        }
    }

    #[inline(always)]
    pub fn length_squared(self) -> f64 {
        match self {
            Self::D2(v) => v.length_squared(),
            Self::D3(v) => v.length_squared(),
        }
    }

    #[inline(always)]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    #[inline(always)]
    pub fn scale(self, scalar: f64) -> Self {
        match self {
            Self::D2(v) => Self::D2(v.scale(scalar)),
            Self::D3(v) => Self::D3(v.scale(scalar)),
        }
    }

    pub fn add(self, other: Self) -> Result<Self> {
        match (self, other) {
            (Self::D2(a), Self::D2(b)) => Ok(Self::D2(a.add(b))),
            (Self::D3(a), Self::D3(b)) => Ok(Self::D3(a.add(b))),
            (a, b) => Err(mismatch(a.dim(), b.dim())),
        }
    }

    pub fn sub(self, other: Self) -> Result<Self> {
        match (self, other) {
            (Self::D2(a), Self::D2(b)) => Ok(Self::D2(a.sub(b))),
            (Self::D3(a), Self::D3(b)) => Ok(Self::D3(a.sub(b))),
            (a, b) => Err(mismatch(a.dim(), b.dim())),
        }
    }

    pub fn dot(self, other: Self) -> Result<f64> {
        match (self, other) {
            (Self::D2(a), Self::D2(b)) => Ok(a.dot(b)),
            (Self::D3(a), Self::D3(b)) => Ok(a.dot(b)),
            (a, b) => Err(mismatch(a.dim(), b.dim())),
        }
    }

    pub fn distance_squared(self, other: Self) -> Result<f64> {
        Ok(self.sub(other)?.length_squared())
    }

    pub fn distance(self, other: Self) -> Result<f64> {
        Ok(self.distance_squared(other)?.sqrt())
    }

    /// Unit vector in the same direction. A norm below [`EPS`] has no
    /// direction to speak of and is rejected.
    pub fn normalize(self) -> Result<Self> {
        let len = self.length();
        if len < EPS {
            return Err(KinematicsError::dimension(
                "cannot normalize a zero-length vector",
            ));
        }
        Ok(self.scale(1.0 / len))
    }

    /// Returns true if both points have the same dimensionality and every
    /// component agrees within [`EPS`].
    pub fn is_close(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::D2(a), Self::D2(b)) => {
                (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
            }
            (Self::D3(a), Self::D3(b)) => {
                (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS && (a.z - b.z).abs() < EPS
            }
            _ => false,
        }
    }
}

fn mismatch(expected: usize, actual: usize) -> KinematicsError {
    KinematicsError::dimension(format!(
        "dimensions do not match: {expected}D vs {actual}D"
    ))
}
