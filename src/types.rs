use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Landmarks produced by a face-mesh detector, indexed by the detector's own
/// numbering scheme.
///
/// The set is stored densely: index `i` is `points[i]`. Lookups through
/// [`LandmarkSet::get`] validate both presence and finiteness, so metric code
/// never sees a gap or a NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    pub points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn num_landmarks(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fetch a landmark, failing on a missing index or non-finite coordinates.
    pub fn get(&self, index: usize) -> Result<Point> {
        let point = self.points.get(index).copied().ok_or(Error::MissingLandmark {
            index,
            available: self.points.len(),
        })?;
        if !point.is_finite() {
            return Err(Error::NonFiniteLandmark { index });
        }
        Ok(point)
    }

    /// Fetch several landmarks in the given order.
    pub fn get_all(&self, indices: &[usize]) -> Result<Vec<Point>> {
        indices.iter().map(|&i| self.get(i)).collect()
    }

    /// Create a set from a flat vector of [x0, y0, x1, y1, ...] coordinates.
    pub fn from_flat_vec(v: &[f64]) -> Result<Self> {
        if v.len() % 2 != 0 {
            return Err(Error::InvalidInput(format!(
                "flat coordinate list has odd length {}",
                v.len()
            )));
        }
        let points = v
            .chunks_exact(2)
            .map(|chunk| Point::new(chunk[0], chunk[1]))
            .collect();
        Ok(Self { points })
    }
}

impl FromIterator<Point> for LandmarkSet {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

impl std::ops::IndexMut<usize> for LandmarkSet {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.points[idx]
    }
}
