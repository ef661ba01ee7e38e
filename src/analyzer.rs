use tracing::{debug, trace};

use crate::aggregate::{OverallResult, Weights};
use crate::error::{Error, Result};
use crate::metrics::{eye_gap, fifths, proportion, symmetry};
use crate::registry::{LandmarkRegistry, Scheme};
use crate::types::LandmarkSet;

/// Scores a landmark set against all four harmony metrics.
///
/// Holds only immutable configuration (a `'static` registry table and the
/// weights), so one analyzer can be shared across threads.
///
/// # Usage
///
/// ```ignore
/// let analyzer = HarmonyAnalyzer::builder()
///     .scheme(Scheme::Dlib68)
///     .weights(Weights::uniform(1.0))
///     .build()?;
/// let result = analyzer.analyze(&landmarks)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HarmonyAnalyzer {
    registry: &'static LandmarkRegistry,
    weights: Option<Weights>,
}

impl HarmonyAnalyzer {
    /// Analyzer with the given registry and default weights.
    pub fn new(registry: &'static LandmarkRegistry) -> Self {
        Self {
            registry,
            weights: None,
        }
    }

    pub fn builder() -> HarmonyAnalyzerBuilder {
        HarmonyAnalyzerBuilder::new()
    }

    pub fn registry(&self) -> &'static LandmarkRegistry {
        self.registry
    }

    /// Weights in effect, [`Weights::DEFAULT`] if none were configured.
    pub fn weights(&self) -> Weights {
        self.weights.unwrap_or_default()
    }

    /// Run every metric and aggregate the scores.
    pub fn analyze(&self, landmarks: &LandmarkSet) -> Result<OverallResult> {
        analyze(landmarks, self.registry, self.weights.as_ref())
    }
}

impl Default for HarmonyAnalyzer {
    fn default() -> Self {
        Self::new(Scheme::default().registry())
    }
}

/// Builder for [`HarmonyAnalyzer`].
pub struct HarmonyAnalyzerBuilder {
    registry: Option<&'static LandmarkRegistry>,
    weights: Option<Weights>,
}

impl HarmonyAnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            weights: None,
        }
    }

    /// Use one of the built-in registry tables.
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.registry = Some(scheme.registry());
        self
    }

    /// Use a custom registry table.
    pub fn registry(mut self, registry: &'static LandmarkRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn weights(mut self, weights: Weights) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Validates the weights up front so a bad configuration fails here
    /// rather than on the first analysis.
    pub fn build(self) -> Result<HarmonyAnalyzer> {
        if let Some(weights) = &self.weights {
            weights.validate()?;
            if weights.sum() <= 0.0 {
                return Err(Error::ZeroWeightSum);
            }
        }
        Ok(HarmonyAnalyzer {
            registry: self.registry.unwrap_or(Scheme::default().registry()),
            weights: self.weights,
        })
    }
}

impl Default for HarmonyAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Score `landmarks` with the given registry; `None` weights use the default.
pub fn analyze(
    landmarks: &LandmarkSet,
    registry: &LandmarkRegistry,
    weights: Option<&Weights>,
) -> Result<OverallResult> {
    trace!(
        scheme = registry.scheme(),
        landmarks = landmarks.num_landmarks(),
        "analyzing landmark set"
    );
    registry.validate(landmarks)?;

    let result = OverallResult::from_metrics(
        symmetry(landmarks, registry)?,
        proportion(landmarks, registry)?,
        fifths(landmarks, registry)?,
        eye_gap(landmarks, registry)?,
        weights,
    )?;

    debug!(overall = result.overall, "analysis complete");
    Ok(result)
}
