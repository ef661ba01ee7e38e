//! Facial harmony metrics.
//!
//! Each evaluator reduces a handful of registry features to one raw ratio and
//! then to a score in `[0, 100]` via [`score_from_error`]. All evaluators are
//! pure: the same landmarks and registry always give bit-identical results.
//!
//! Ratios whose denominator collapses (a face width or eye width near zero)
//! go through [`safe_denominator`], so a degenerate landmark set scores low
//! instead of producing NaN.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::geometry::{
    centroid, distance, horizontal_extent, mirror_across_vertical_axis, safe_denominator,
    score_from_error,
};
use crate::registry::{Feature, LandmarkRegistry};
use crate::types::LandmarkSet;

/// Target face length / width ratio.
pub const GOLDEN_RATIO: f64 = 1.618;

/// Scales bridge-to-chin distance up to an estimated hairline-to-chin length.
pub const FACE_LENGTH_CORRECTION: f64 = 1.4;

/// Target face width / eye width ratio.
pub const FIFTHS_TARGET: f64 = 5.0;

/// Target inner-corner gap / eye width ratio.
pub const EYE_GAP_TARGET: f64 = 1.0;

/// Left/right feature pairs compared by the symmetry metric.
const SYMMETRY_PAIRS: [(Feature, Feature); 4] = [
    (Feature::LeftEyeOuter, Feature::RightEyeOuter),
    (Feature::LeftEyeInner, Feature::RightEyeInner),
    (Feature::LeftBrowMid, Feature::RightBrowMid),
    (Feature::LeftNostrilWing, Feature::RightNostrilWing),
];

/// The four harmony metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Symmetry,
    Proportion,
    Fifths,
    EyeGap,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Symmetry,
        Metric::Proportion,
        Metric::Fifths,
        Metric::EyeGap,
    ];

    /// Key used in weight configurations and serialized output.
    pub const fn name(self) -> &'static str {
        match self {
            Metric::Symmetry => "symmetry",
            Metric::Proportion => "proportion",
            Metric::Fifths => "fifths",
            Metric::EyeGap => "eyeGap",
        }
    }

    /// Inverse of [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Metric::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// Gaussian falloff width, calibrated per metric.
    pub const fn tolerance(self) -> f64 {
        match self {
            Metric::Symmetry => 0.04,
            Metric::Proportion => 0.15,
            Metric::Fifths => 0.18,
            Metric::EyeGap => 0.25,
        }
    }

    /// Run this metric's evaluator.
    pub fn evaluate(
        self,
        landmarks: &LandmarkSet,
        registry: &LandmarkRegistry,
    ) -> Result<MetricResult> {
        match self {
            Metric::Symmetry => symmetry(landmarks, registry),
            Metric::Proportion => proportion(landmarks, registry),
            Metric::Fifths => fifths(landmarks, registry),
            Metric::EyeGap => eye_gap(landmarks, registry),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Score for one metric plus the raw measurement behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub metric: Metric,
    /// Score in `[0, 100]`.
    pub score: f64,
    /// Unnormalized ratio the score was derived from.
    pub raw: f64,
}

impl MetricResult {
    fn from_error(metric: Metric, raw: f64, error: f64) -> Result<Self> {
        let score = score_from_error(error, metric.tolerance())?;
        debug!(metric = metric.name(), raw, error, score, "metric evaluated");
        Ok(Self { metric, score, raw })
    }
}

/// Pixel-space distances the metrics are built from.
///
/// Useful for display and debugging; scores never depend on these directly,
/// only on ratios between them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceMeasurements {
    /// Distance between the two face-width boundary points.
    pub face_width: f64,
    /// Bridge-to-chin distance times [`FACE_LENGTH_CORRECTION`].
    pub face_length: f64,
    pub left_eye_width: f64,
    pub right_eye_width: f64,
    /// Distance between the two inner eye corners.
    pub inner_eye_gap: f64,
    /// x coordinate of the vertical mirror axis.
    pub midline_x: f64,
}

impl FaceMeasurements {
    pub fn from_landmarks(landmarks: &LandmarkSet, registry: &LandmarkRegistry) -> Result<Self> {
        let (left_eye_width, right_eye_width) = eye_widths(landmarks, registry)?;
        Ok(Self {
            face_width: face_width(landmarks, registry)?,
            face_length: face_length(landmarks, registry)?,
            left_eye_width,
            right_eye_width,
            inner_eye_gap: inner_eye_gap(landmarks, registry)?,
            midline_x: midline_x(landmarks, registry)?,
        })
    }

    pub fn average_eye_width(&self) -> f64 {
        (self.left_eye_width + self.right_eye_width) / 2.0
    }
}

/// Bilateral symmetry: mean mirror error of paired features over face width.
///
/// A degenerate set with every paired feature on one point has no mirror
/// error, so it scores a perfect 100 here even though the width-based metrics
/// collapse toward 0.
pub fn symmetry(landmarks: &LandmarkSet, registry: &LandmarkRegistry) -> Result<MetricResult> {
    let axis_x = midline_x(landmarks, registry)?;

    let mut total = 0.0;
    for (left, right) in SYMMETRY_PAIRS {
        let l = registry.point(landmarks, left)?;
        let r = registry.point(landmarks, right)?;
        total += distance(l, mirror_across_vertical_axis(r, axis_x));
    }
    let mean_error = total / SYMMETRY_PAIRS.len() as f64;

    let raw = mean_error / safe_denominator(face_width(landmarks, registry)?);
    MetricResult::from_error(Metric::Symmetry, raw, raw)
}

/// Face length over face width, compared against the golden ratio.
pub fn proportion(landmarks: &LandmarkSet, registry: &LandmarkRegistry) -> Result<MetricResult> {
    let length = face_length(landmarks, registry)?;
    let width = face_width(landmarks, registry)?;

    let raw = length / safe_denominator(width);
    let error = (raw - GOLDEN_RATIO).abs() / GOLDEN_RATIO;
    MetricResult::from_error(Metric::Proportion, raw, error)
}

/// Face width in eye widths, compared against the rule of fifths.
pub fn fifths(landmarks: &LandmarkSet, registry: &LandmarkRegistry) -> Result<MetricResult> {
    let width = face_width(landmarks, registry)?;
    let (left, right) = eye_widths(landmarks, registry)?;
    let average_eye = (left + right) / 2.0;

    let raw = width / safe_denominator(average_eye);
    let error = (raw - FIFTHS_TARGET).abs() / FIFTHS_TARGET;
    MetricResult::from_error(Metric::Fifths, raw, error)
}

/// Gap between the inner eye corners in eye widths, ideally one.
pub fn eye_gap(landmarks: &LandmarkSet, registry: &LandmarkRegistry) -> Result<MetricResult> {
    let gap = inner_eye_gap(landmarks, registry)?;
    let (left, right) = eye_widths(landmarks, registry)?;
    let average_eye = (left + right) / 2.0;

    let raw = gap / safe_denominator(average_eye);
    let error = (raw - EYE_GAP_TARGET).abs();
    MetricResult::from_error(Metric::EyeGap, raw, error)
}

fn face_width(landmarks: &LandmarkSet, registry: &LandmarkRegistry) -> Result<f64> {
    Ok(distance(
        registry.point(landmarks, Feature::LeftFaceBoundary)?,
        registry.point(landmarks, Feature::RightFaceBoundary)?,
    ))
}

fn face_length(landmarks: &LandmarkSet, registry: &LandmarkRegistry) -> Result<f64> {
    let bridge = registry.point(landmarks, Feature::NoseBridgeTop)?;
    let chin = registry.point(landmarks, Feature::Chin)?;
    Ok(distance(bridge, chin) * FACE_LENGTH_CORRECTION)
}

fn eye_widths(landmarks: &LandmarkSet, registry: &LandmarkRegistry) -> Result<(f64, f64)> {
    let left = registry.points(landmarks, Feature::LeftEyeContour)?;
    let right = registry.points(landmarks, Feature::RightEyeContour)?;
    Ok((horizontal_extent(&left)?, horizontal_extent(&right)?))
}

fn inner_eye_gap(landmarks: &LandmarkSet, registry: &LandmarkRegistry) -> Result<f64> {
    Ok(distance(
        registry.point(landmarks, Feature::LeftEyeInner)?,
        registry.point(landmarks, Feature::RightEyeInner)?,
    ))
}

/// Midpoint between the two eye-contour centroids.
fn midline_x(landmarks: &LandmarkSet, registry: &LandmarkRegistry) -> Result<f64> {
    let left = centroid(&registry.points(landmarks, Feature::LeftEyeContour)?)?;
    let right = centroid(&registry.points(landmarks, Feature::RightEyeContour)?)?;
    Ok((left.x + right.x) / 2.0)
}
