//! # facial-harmony
//!
//! Facial harmony scoring from 2D face-mesh landmarks.
//!
//! This crate provides:
//! - **Landmark Registry**: named facial features mapped to detector indices
//!   (MediaPipe 468-point and dlib 68-point tables built in)
//! - **Metrics**: bilateral symmetry, golden-ratio proportion, rule of fifths
//!   and eye gap, each scored in `[0, 100]`
//! - **Aggregation**: a weighted overall score with a documented default weighting
//!
//! Landmark detection itself is out of scope: landmarks come from an external
//! detector, either passed in directly as a [`LandmarkSet`] or through a
//! [`LandmarkDetector`] owned by an [`AnalysisSession`].
//!
//! ## Scoring
//!
//! Each metric measures a ratio of two pixel distances, compares it with an
//! ideal value and maps the deviation through a Gaussian falloff:
//!
//! | Metric     | Ratio                                 | Ideal | Tolerance |
//! |------------|---------------------------------------|-------|-----------|
//! | symmetry   | mean mirror error / face width        | 0     | 0.04      |
//! | proportion | 1.4 x bridge-to-chin / face width     | 1.618 | 0.15      |
//! | fifths     | face width / eye width                | 5     | 0.18      |
//! | eyeGap     | inner-corner gap / eye width          | 1     | 0.25      |
//!
//! The overall score is the weighted mean of the four, by default with weights
//! 40 / 25 / 20 / 15 (see [`Weights::DEFAULT`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use facial_harmony::{analyze, LandmarkSet, Point, Weights, MEDIAPIPE_468};
//!
//! // Landmarks from your face-mesh detector, in pixel coordinates
//! let landmarks: LandmarkSet = (0..468)
//!     .map(|i| Point::new(200.0 + (i % 20) as f64 * 5.0, 150.0 + (i / 20) as f64 * 8.0))
//!     .collect();
//!
//! let result = analyze(&landmarks, &MEDIAPIPE_468, None).unwrap();
//! assert!((0.0..=100.0).contains(&result.overall));
//!
//! // Custom weighting: symmetry only
//! let weights = Weights::new(1.0, 0.0, 0.0, 0.0);
//! let result = analyze(&landmarks, &MEDIAPIPE_468, Some(&weights)).unwrap();
//! assert_eq!(result.overall, result.symmetry.score);
//! ```
//!
//! ## Custom Detectors
//!
//! Implement the [`LandmarkDetector`] trait for your own detector:
//!
//! ```rust
//! use facial_harmony::{LandmarkDetector, LandmarkSet, Result};
//!
//! struct MyMesh { /* model handle */ }
//!
//! impl LandmarkDetector for MyMesh {
//!     type Input = [u8];
//!
//!     fn detect(&self, image: &[u8]) -> Result<Option<LandmarkSet>> {
//!         // Run the model; return None if no face was found
//!         Ok(None)
//!     }
//! }
//! ```

mod aggregate;
mod analyzer;
mod error;
pub mod geometry;
mod metrics;
mod registry;
mod session;
mod types;

pub use aggregate::{aggregate, OverallResult, Weights};
pub use analyzer::{analyze, HarmonyAnalyzer, HarmonyAnalyzerBuilder};
pub use error::{Error, ErrorKind, Result};
pub use metrics::{
    eye_gap, fifths, proportion, symmetry, FaceMeasurements, Metric, MetricResult,
    EYE_GAP_TARGET, FACE_LENGTH_CORRECTION, FIFTHS_TARGET, GOLDEN_RATIO,
};
pub use registry::{Feature, LandmarkRegistry, Scheme, DLIB_68, MEDIAPIPE_468};
pub use session::{parse_landmarks, AnalysisSession, JsonLandmarkFile, LandmarkDetector};
pub use types::{LandmarkSet, Point};
