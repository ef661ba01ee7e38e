//! Weighted combination of metric scores.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::metrics::{Metric, MetricResult};

/// Per-metric weights for the overall score.
///
/// Weights need not sum to anything in particular; the aggregate divides by
/// their sum. When deserialized, missing keys take their value from
/// [`Weights::DEFAULT`] and unknown keys are ignored:
///
/// ```
/// use facial_harmony::Weights;
///
/// let w: Weights = serde_json::from_str(r#"{"symmetry": 10, "blur": 3}"#).unwrap();
/// assert_eq!(w.symmetry, 10.0);
/// assert_eq!(w.eye_gap, Weights::DEFAULT.eye_gap);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Weights {
    pub symmetry: f64,
    pub proportion: f64,
    pub fifths: f64,
    pub eye_gap: f64,
}

impl Weights {
    /// Weighting used when the caller supplies none:
    /// symmetry 40, proportion 25, fifths 20, eye gap 15.
    pub const DEFAULT: Weights = Weights::new(40.0, 25.0, 20.0, 15.0);

    pub const fn new(symmetry: f64, proportion: f64, fifths: f64, eye_gap: f64) -> Self {
        Self {
            symmetry,
            proportion,
            fifths,
            eye_gap,
        }
    }

    /// Same weight for every metric.
    pub const fn uniform(weight: f64) -> Self {
        Self::new(weight, weight, weight, weight)
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Symmetry => self.symmetry,
            Metric::Proportion => self.proportion,
            Metric::Fifths => self.fifths,
            Metric::EyeGap => self.eye_gap,
        }
    }

    pub fn set(&mut self, metric: Metric, weight: f64) {
        match metric {
            Metric::Symmetry => self.symmetry = weight,
            Metric::Proportion => self.proportion = weight,
            Metric::Fifths => self.fifths = weight,
            Metric::EyeGap => self.eye_gap = weight,
        }
    }

    /// Build from `(metric name, weight)` pairs, starting from the defaults.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut weights = Self::DEFAULT;
        for (key, value) in pairs {
            match Metric::from_name(key.as_ref()) {
                Some(metric) => weights.set(metric, value),
                None => trace!(key = key.as_ref(), "ignoring unknown weight key"),
            }
        }
        weights
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON weight file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn sum(&self) -> f64 {
        Metric::ALL.iter().map(|&m| self.get(m)).sum()
    }

    /// Reject negative or non-finite weights.
    pub fn validate(&self) -> Result<()> {
        for metric in Metric::ALL {
            let weight = self.get(metric);
            if !(weight >= 0.0 && weight.is_finite()) {
                return Err(Error::InvalidWeight {
                    metric: metric.name(),
                    weight,
                });
            }
        }
        Ok(())
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Weighted mean of metric scores: `sum(score * weight) / sum(weight)`.
///
/// Falls back to [`Weights::DEFAULT`] when `weights` is `None`. Fails with
/// [`Error::ZeroWeightSum`] if the weights of the given metrics add up to zero.
///
/// Weights are scaled by the largest one before summing, so any finite weight
/// set is usable. The result never leaves the range of the scores it averages.
pub fn aggregate(results: &[MetricResult], weights: Option<&Weights>) -> Result<f64> {
    let weights = weights.unwrap_or(&Weights::DEFAULT);
    weights.validate()?;
    if let Some(bad) = results.iter().find(|r| !r.score.is_finite()) {
        return Err(Error::InvalidInput(format!(
            "{} score is not finite",
            bad.metric
        )));
    }

    let largest = results
        .iter()
        .map(|r| weights.get(r.metric))
        .fold(0.0, f64::max);
    if largest <= 0.0 {
        return Err(Error::ZeroWeightSum);
    }

    let mut weighted = 0.0;
    let mut total = 0.0;
    let mut lowest = f64::INFINITY;
    let mut highest = f64::NEG_INFINITY;
    for result in results {
        let weight = weights.get(result.metric) / largest;
        if weight > 0.0 {
            weighted += result.score * weight;
            total += weight;
            lowest = lowest.min(result.score);
            highest = highest.max(result.score);
        }
    }

    Ok((weighted / total).clamp(lowest, highest))
}

/// Terminal output of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallResult {
    /// Weighted mean of the four metric scores, in `[0, 100]`.
    pub overall: f64,
    pub symmetry: MetricResult,
    pub proportion: MetricResult,
    pub fifths: MetricResult,
    pub eye_gap: MetricResult,
}

impl OverallResult {
    /// Combine the four metric results under `weights`.
    pub fn from_metrics(
        symmetry: MetricResult,
        proportion: MetricResult,
        fifths: MetricResult,
        eye_gap: MetricResult,
        weights: Option<&Weights>,
    ) -> Result<Self> {
        let overall = aggregate(&[symmetry, proportion, fifths, eye_gap], weights)?;
        Ok(Self {
            overall,
            symmetry,
            proportion,
            fifths,
            eye_gap,
        })
    }

    /// The four metric results in [`Metric::ALL`] order.
    pub fn metrics(&self) -> [MetricResult; 4] {
        [self.symmetry, self.proportion, self.fifths, self.eye_gap]
    }

    pub fn get(&self, metric: Metric) -> &MetricResult {
        match metric {
            Metric::Symmetry => &self.symmetry,
            Metric::Proportion => &self.proportion,
            Metric::Fifths => &self.fifths,
            Metric::EyeGap => &self.eye_gap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(metric: Metric, score: f64) -> MetricResult {
        MetricResult {
            metric,
            score,
            raw: 0.0,
        }
    }

    fn sample() -> [MetricResult; 4] {
        [
            result(Metric::Symmetry, 90.0),
            result(Metric::Proportion, 60.0),
            result(Metric::Fifths, 30.0),
            result(Metric::EyeGap, 80.0),
        ]
    }

    #[test]
    fn default_weighting() {
        let overall = aggregate(&sample(), None).unwrap();
        let expected = (90.0 * 40.0 + 60.0 * 25.0 + 30.0 * 20.0 + 80.0 * 15.0) / 100.0;
        assert!((overall - expected).abs() < 1e-9);
        assert_eq!(Weights::default(), Weights::DEFAULT);
    }

    #[test]
    fn equal_weights_give_arithmetic_mean() {
        let mean = (90.0 + 60.0 + 30.0 + 80.0) / 4.0;
        for w in [1.0, 3.5, 250.0] {
            let overall = aggregate(&sample(), Some(&Weights::uniform(w))).unwrap();
            assert!((overall - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_weight_sum_fails() {
        let err = aggregate(&sample(), Some(&Weights::uniform(0.0))).unwrap_err();
        assert!(matches!(err, Error::ZeroWeightSum));
        assert!(matches!(aggregate(&[], None), Err(Error::ZeroWeightSum)));
    }

    #[test]
    fn negative_weight_fails() {
        let weights = Weights::new(10.0, -1.0, 10.0, 10.0);
        assert!(matches!(
            aggregate(&sample(), Some(&weights)),
            Err(Error::InvalidWeight {
                metric: "proportion",
                ..
            })
        ));
        assert!(aggregate(&sample(), Some(&Weights::uniform(f64::NAN))).is_err());
    }

    #[test]
    fn nan_score_fails() {
        let mut scores = sample();
        scores[2].score = f64::NAN;
        assert!(matches!(aggregate(&scores, None), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn single_nonzero_weight_selects_metric() {
        let weights = Weights::new(0.0, 0.0, 1.0, 0.0);
        let overall = aggregate(&sample(), Some(&weights)).unwrap();
        assert_eq!(overall, 30.0);
    }

    #[test]
    fn overall_stays_in_range() {
        let all_max = [
            result(Metric::Symmetry, 100.0),
            result(Metric::Proportion, 100.0),
            result(Metric::Fifths, 100.0),
            result(Metric::EyeGap, 100.0),
        ];
        assert_eq!(aggregate(&all_max, None).unwrap(), 100.0);
        let overall = aggregate(&sample(), Some(&Weights::new(1.0, 7.0, 0.5, 3.0))).unwrap();
        assert!((30.0..=90.0).contains(&overall));
    }

    #[test]
    fn rounding_never_lifts_overall_past_best_score() {
        let all_max = [
            result(Metric::Symmetry, 100.0),
            result(Metric::Proportion, 100.0),
            result(Metric::Fifths, 100.0),
            result(Metric::EyeGap, 100.0),
        ];
        let overall = aggregate(&all_max, Some(&Weights::new(0.3, 0.3, 0.3, 0.1))).unwrap();
        assert!(overall <= 100.0);
        assert_eq!(overall, 100.0);
    }

    #[test]
    fn huge_weights_do_not_overflow() {
        let halves = [
            result(Metric::Symmetry, 50.0),
            result(Metric::Proportion, 50.0),
            result(Metric::Fifths, 50.0),
            result(Metric::EyeGap, 50.0),
        ];
        let overall = aggregate(&halves, Some(&Weights::uniform(f64::MAX))).unwrap();
        assert_eq!(overall, 50.0);

        let mean = (90.0 + 60.0 + 30.0 + 80.0) / 4.0;
        let overall = aggregate(&sample(), Some(&Weights::uniform(f64::MAX))).unwrap();
        assert!((overall - mean).abs() < 1e-9);

        let weights = Weights::new(f64::MAX, 0.0, f64::MAX, 0.0);
        let overall = aggregate(&sample(), Some(&weights)).unwrap();
        assert!((overall - 60.0).abs() < 1e-9);
    }

    #[test]
    fn weights_from_json_defaults_missing_keys() {
        let w = Weights::from_json(r#"{"proportion": 5, "eyeGap": 1, "unknown": 99}"#).unwrap();
        assert_eq!(w.proportion, 5.0);
        assert_eq!(w.eye_gap, 1.0);
        assert_eq!(w.symmetry, 40.0);
        assert_eq!(w.fifths, 20.0);

        assert_eq!(Weights::from_json("{}").unwrap(), Weights::DEFAULT);
        assert!(Weights::from_json("[1, 2]").is_err());
    }

    #[test]
    fn weights_from_pairs() {
        let w = Weights::from_pairs([("fifths", 2.0), ("eyeGap", 3.0), ("chin", 8.0)]);
        assert_eq!(w, Weights::new(40.0, 25.0, 2.0, 3.0));
    }

    #[test]
    fn overall_result_accessors() {
        let [s, p, f, e] = sample();
        let result = OverallResult::from_metrics(s, p, f, e, Some(&Weights::uniform(1.0))).unwrap();
        assert!((result.overall - 65.0).abs() < 1e-9);
        assert_eq!(result.get(Metric::Fifths).score, 30.0);
        assert_eq!(result.metrics().map(|m| m.metric), Metric::ALL);
    }

    #[test]
    fn overall_result_serializes_camel_case() {
        let [s, p, f, e] = sample();
        let result = OverallResult::from_metrics(s, p, f, e, None).unwrap();
        let json = serde_json::to_value(result).unwrap();
        assert!(json.get("eyeGap").is_some());
        assert_eq!(json["eyeGap"]["metric"], "eyeGap");
        assert!(json["overall"].is_number());
    }
}
