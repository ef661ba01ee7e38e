//! Glue between an external landmark detector and the analyzer.
//!
//! The detector is owned by the session and passed in at construction; the
//! geometric engine itself never holds one.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::aggregate::OverallResult;
use crate::analyzer::HarmonyAnalyzer;
use crate::error::{Error, Result};
use crate::types::{LandmarkSet, Point};

/// Source of landmark sets, typically a face-mesh model.
///
/// Implement this for your own detector and hand it to [`AnalysisSession`].
pub trait LandmarkDetector {
    /// What the detector consumes (an image, a file path, a frame).
    type Input: ?Sized;

    /// Landmarks for the most prominent face, or `None` if there is no face.
    fn detect(&self, input: &Self::Input) -> Result<Option<LandmarkSet>>;
}

/// One detector plus one analyzer.
pub struct AnalysisSession<D> {
    detector: D,
    analyzer: HarmonyAnalyzer,
}

impl<D: LandmarkDetector> AnalysisSession<D> {
    pub fn new(detector: D, analyzer: HarmonyAnalyzer) -> Self {
        Self { detector, analyzer }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn analyzer(&self) -> &HarmonyAnalyzer {
        &self.analyzer
    }

    /// Detect landmarks in `input` and score them.
    pub fn analyze(&self, input: &D::Input) -> Result<OverallResult> {
        self.analyze_with_landmarks(input).map(|(_, result)| result)
    }

    /// Like [`analyze`](Self::analyze) but also hands back the detected landmarks.
    pub fn analyze_with_landmarks(
        &self,
        input: &D::Input,
    ) -> Result<(LandmarkSet, OverallResult)> {
        let landmarks = self.detector.detect(input)?.ok_or(Error::NoFaceDetected)?;
        info!(landmarks = landmarks.num_landmarks(), "face detected");
        let result = self.analyzer.analyze(&landmarks)?;
        Ok((landmarks, result))
    }

    /// Analyze several inputs. Each gets its own result so one bad input does
    /// not abort the rest.
    pub fn analyze_batch<'a, I>(&self, inputs: I) -> Vec<Result<OverallResult>>
    where
        I: IntoIterator<Item = &'a D::Input>,
        D::Input: 'a,
    {
        inputs
            .into_iter()
            .enumerate()
            .map(|(i, input)| {
                let result = self.analyze(input);
                if let Err(e) = &result {
                    warn!(item = i, error = %e, "analysis failed");
                }
                result
            })
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Pair([f64; 2]),
    /// Face-mesh output often carries a depth coordinate; it is dropped.
    Triple([f64; 3]),
    Object(Point),
}

impl From<PointRepr> for Point {
    fn from(p: PointRepr) -> Self {
        match p {
            PointRepr::Pair([x, y]) | PointRepr::Triple([x, y, _]) => Point::new(x, y),
            PointRepr::Object(p) => p,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinates {
    Points(Vec<PointRepr>),
    /// `[x0, y0, x1, y1, ...]`
    Flat(Vec<f64>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LandmarkDocument {
    Bare(Coordinates),
    Wrapped { landmarks: Coordinates },
}

/// Parse landmarks from JSON.
///
/// Accepts `[[x, y], ...]`, `[[x, y, z], ...]`, `[{"x": .., "y": ..}, ...]`,
/// a flat `[x0, y0, x1, y1, ...]` list, or an object whose `landmarks` field
/// holds one of those. An empty list means no face was found.
pub fn parse_landmarks(json: &str) -> Result<Option<LandmarkSet>> {
    let coordinates = match serde_json::from_str(json)? {
        LandmarkDocument::Bare(c) | LandmarkDocument::Wrapped { landmarks: c } => c,
    };
    let set = match coordinates {
        Coordinates::Points(points) => points.into_iter().map(Point::from).collect(),
        Coordinates::Flat(values) => LandmarkSet::from_flat_vec(&values)?,
    };
    if set.is_empty() {
        return Ok(None);
    }
    Ok(Some(set))
}

/// Reads landmark sets exported by an external detector as JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLandmarkFile;

impl LandmarkDetector for JsonLandmarkFile {
    type Input = Path;

    fn detect(&self, input: &Path) -> Result<Option<LandmarkSet>> {
        parse_landmarks(&fs::read_to_string(input)?)
    }
}
