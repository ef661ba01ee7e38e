//! Named facial features and their landmark indices.
//!
//! Every landmark index the metrics touch lives in one of the tables below, so
//! a detector with a different numbering only needs a new table. "Left" and
//! "right" are image-left and image-right, not the subject's.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{LandmarkSet, Point};

/// Facial features the metric evaluators need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    /// Six-point contour of the image-left eye.
    LeftEyeContour,
    /// Six-point contour of the image-right eye.
    RightEyeContour,
    LeftEyeOuter,
    LeftEyeInner,
    RightEyeOuter,
    RightEyeInner,
    NoseBridgeTop,
    NoseTip,
    LeftNostrilWing,
    RightNostrilWing,
    Chin,
    /// Widest point of the face on the image-left side.
    LeftFaceBoundary,
    /// Widest point of the face on the image-right side.
    RightFaceBoundary,
    LeftBrowMid,
    RightBrowMid,
}

impl Feature {
    pub const ALL: [Feature; 15] = [
        Feature::LeftEyeContour,
        Feature::RightEyeContour,
        Feature::LeftEyeOuter,
        Feature::LeftEyeInner,
        Feature::RightEyeOuter,
        Feature::RightEyeInner,
        Feature::NoseBridgeTop,
        Feature::NoseTip,
        Feature::LeftNostrilWing,
        Feature::RightNostrilWing,
        Feature::Chin,
        Feature::LeftFaceBoundary,
        Feature::RightFaceBoundary,
        Feature::LeftBrowMid,
        Feature::RightBrowMid,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Feature::LeftEyeContour => "leftEyeContour",
            Feature::RightEyeContour => "rightEyeContour",
            Feature::LeftEyeOuter => "leftEyeOuter",
            Feature::LeftEyeInner => "leftEyeInner",
            Feature::RightEyeOuter => "rightEyeOuter",
            Feature::RightEyeInner => "rightEyeInner",
            Feature::NoseBridgeTop => "noseBridgeTop",
            Feature::NoseTip => "noseTip",
            Feature::LeftNostrilWing => "leftNostrilWing",
            Feature::RightNostrilWing => "rightNostrilWing",
            Feature::Chin => "chin",
            Feature::LeftFaceBoundary => "leftFaceBoundary",
            Feature::RightFaceBoundary => "rightFaceBoundary",
            Feature::LeftBrowMid => "leftBrowMid",
            Feature::RightBrowMid => "rightBrowMid",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Feature::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| Error::UnknownFeature(s.to_string()))
    }
}

/// Immutable mapping from [`Feature`] to landmark indices for one detector scheme.
#[derive(Debug)]
pub struct LandmarkRegistry {
    scheme: &'static str,
    num_landmarks: usize,
    entries: &'static [(Feature, &'static [usize])],
}

impl LandmarkRegistry {
    /// Build a table for a custom detector scheme.
    pub const fn new(
        scheme: &'static str,
        num_landmarks: usize,
        entries: &'static [(Feature, &'static [usize])],
    ) -> Self {
        Self {
            scheme,
            num_landmarks,
            entries,
        }
    }

    pub fn scheme(&self) -> &'static str {
        self.scheme
    }

    /// Number of points the detector emits for this scheme.
    pub fn num_landmarks(&self) -> usize {
        self.num_landmarks
    }

    /// Indices for a feature, in table order.
    pub fn lookup(&self, feature: Feature) -> Result<&'static [usize]> {
        self.entries
            .iter()
            .find(|(f, _)| *f == feature)
            .map(|(_, indices)| *indices)
            .filter(|indices| !indices.is_empty())
            .ok_or(Error::UnmappedFeature {
                scheme: self.scheme,
                feature: feature.name(),
            })
    }

    /// Same as [`lookup`](Self::lookup) but by camelCase feature name.
    pub fn lookup_name(&self, name: &str) -> Result<&'static [usize]> {
        self.lookup(name.parse()?)
    }

    /// Highest landmark index referenced by any entry.
    pub fn max_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .flat_map(|(_, indices)| indices.iter().copied())
            .max()
    }

    /// The single point for a one-landmark feature (the first index otherwise).
    pub fn point(&self, landmarks: &LandmarkSet, feature: Feature) -> Result<Point> {
        landmarks.get(self.lookup(feature)?[0])
    }

    /// All points for a feature, in table order.
    pub fn points(&self, landmarks: &LandmarkSet, feature: Feature) -> Result<Vec<Point>> {
        landmarks.get_all(self.lookup(feature)?)
    }

    /// Check that every referenced landmark is present and finite.
    pub fn validate(&self, landmarks: &LandmarkSet) -> Result<()> {
        for (_, indices) in self.entries {
            landmarks.get_all(indices)?;
        }
        Ok(())
    }
}

const MEDIAPIPE_468_ENTRIES: &[(Feature, &[usize])] = &[
    (Feature::LeftEyeContour, &[33, 160, 158, 133, 153, 144]),
    (Feature::RightEyeContour, &[362, 385, 387, 263, 373, 380]),
    (Feature::LeftEyeOuter, &[33]),
    (Feature::LeftEyeInner, &[133]),
    (Feature::RightEyeOuter, &[263]),
    (Feature::RightEyeInner, &[362]),
    (Feature::NoseBridgeTop, &[168]),
    (Feature::NoseTip, &[1]),
    (Feature::LeftNostrilWing, &[129]),
    (Feature::RightNostrilWing, &[358]),
    (Feature::Chin, &[152]),
    (Feature::LeftFaceBoundary, &[234]),
    (Feature::RightFaceBoundary, &[454]),
    (Feature::LeftBrowMid, &[105]),
    (Feature::RightBrowMid, &[334]),
];

/// MediaPipe Face Mesh, 468 points.
pub static MEDIAPIPE_468: LandmarkRegistry =
    LandmarkRegistry::new("mediapipe", 468, MEDIAPIPE_468_ENTRIES);

const DLIB_68_ENTRIES: &[(Feature, &[usize])] = &[
    (Feature::LeftEyeContour, &[36, 37, 38, 39, 40, 41]),
    (Feature::RightEyeContour, &[42, 43, 44, 45, 46, 47]),
    (Feature::LeftEyeOuter, &[36]),
    (Feature::LeftEyeInner, &[39]),
    (Feature::RightEyeOuter, &[45]),
    (Feature::RightEyeInner, &[42]),
    (Feature::NoseBridgeTop, &[27]),
    (Feature::NoseTip, &[30]),
    (Feature::LeftNostrilWing, &[31]),
    (Feature::RightNostrilWing, &[35]),
    (Feature::Chin, &[8]),
    (Feature::LeftFaceBoundary, &[0]),
    (Feature::RightFaceBoundary, &[16]),
    (Feature::LeftBrowMid, &[19]),
    (Feature::RightBrowMid, &[24]),
];

/// iBUG / dlib 68-point annotation.
pub static DLIB_68: LandmarkRegistry = LandmarkRegistry::new("dlib68", 68, DLIB_68_ENTRIES);

/// Built-in detector schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    MediaPipe,
    Dlib68,
}

impl Scheme {
    pub fn registry(self) -> &'static LandmarkRegistry {
        match self {
            Scheme::MediaPipe => &MEDIAPIPE_468,
            Scheme::Dlib68 => &DLIB_68,
        }
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mediapipe" | "mediapipe468" => Ok(Scheme::MediaPipe),
            "dlib68" | "dlib" => Ok(Scheme::Dlib68),
            _ => Err(Error::UnknownScheme(s.to_string())),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.registry().scheme())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn builtin_tables_are_complete() {
        for registry in [&MEDIAPIPE_468, &DLIB_68] {
            for feature in Feature::ALL {
                assert!(
                    registry.lookup(feature).is_ok(),
                    "{} missing {}",
                    registry.scheme(),
                    feature
                );
            }
            assert_eq!(registry.lookup(Feature::LeftEyeContour).unwrap().len(), 6);
            assert_eq!(registry.lookup(Feature::RightEyeContour).unwrap().len(), 6);
            assert!(registry.max_index().unwrap() < registry.num_landmarks());
        }
    }

    #[test]
    fn eye_corners_belong_to_their_contours() {
        for registry in [&MEDIAPIPE_468, &DLIB_68] {
            let left = registry.lookup(Feature::LeftEyeContour).unwrap();
            let right = registry.lookup(Feature::RightEyeContour).unwrap();
            for f in [Feature::LeftEyeOuter, Feature::LeftEyeInner] {
                assert!(left.contains(&registry.lookup(f).unwrap()[0]));
            }
            for f in [Feature::RightEyeOuter, Feature::RightEyeInner] {
                assert!(right.contains(&registry.lookup(f).unwrap()[0]));
            }
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(MEDIAPIPE_468.lookup_name("chin").unwrap(), &[152]);
        assert_eq!(DLIB_68.lookup_name("noseBridgeTop").unwrap(), &[27]);

        let err = MEDIAPIPE_468.lookup_name("foreheadTop").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn unmapped_feature_is_configuration_error() {
        const ENTRIES: &[(Feature, &[usize])] = &[(Feature::Chin, &[3])];
        static PARTIAL: LandmarkRegistry = LandmarkRegistry::new("partial", 10, ENTRIES);
        let err = PARTIAL.lookup(Feature::NoseTip).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(PARTIAL.lookup(Feature::Chin).unwrap(), &[3]);
    }

    #[test]
    fn feature_names_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(feature.name().parse::<Feature>().unwrap(), feature);
        }
    }

    #[test]
    fn scheme_parsing() {
        assert_eq!("mediapipe".parse::<Scheme>().unwrap(), Scheme::MediaPipe);
        assert_eq!("DLIB68".parse::<Scheme>().unwrap(), Scheme::Dlib68);
        assert!("openface".parse::<Scheme>().is_err());
        assert_eq!(Scheme::default().registry().scheme(), "mediapipe");
    }

    #[test]
    fn validate_reports_gaps() {
        let short = LandmarkSet::new(vec![Point::zero(); 20]);
        assert!(matches!(
            DLIB_68.validate(&short),
            Err(Error::MissingLandmark { .. })
        ));

        let full = LandmarkSet::new(vec![Point::zero(); 68]);
        assert!(DLIB_68.validate(&full).is_ok());
    }
}
