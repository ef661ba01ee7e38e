use thiserror::Error;

/// Coarse classification of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad data or parameters handed to the engine by the caller.
    InvalidInput,
    /// A registry table or feature name that does not exist (programmer error).
    Configuration,
    /// Failure reading or decoding input outside the engine.
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Point set is empty")]
    EmptyPointSet,

    #[error("Tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("Weight for {metric} must be non-negative and finite, got {weight}")]
    InvalidWeight { metric: &'static str, weight: f64 },

    #[error("Weights sum to zero")]
    ZeroWeightSum,

    #[error("Landmark {index} missing from a set of {available} points")]
    MissingLandmark { index: usize, available: usize },

    #[error("Landmark {index} has non-finite coordinates")]
    NonFiniteLandmark { index: usize },

    #[error("No face detected")]
    NoFaceDetected,

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Unknown landmark scheme: {0}")]
    UnknownScheme(String),

    #[error("Registry {scheme} has no entry for {feature}")]
    UnmappedFeature {
        scheme: &'static str,
        feature: &'static str,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::Json(_) => ErrorKind::Io,
            Error::UnknownFeature(_) | Error::UnknownScheme(_) | Error::UnmappedFeature { .. } => {
                ErrorKind::Configuration
            }
            Error::InvalidInput(_)
            | Error::EmptyPointSet
            | Error::InvalidTolerance(_)
            | Error::InvalidWeight { .. }
            | Error::ZeroWeightSum
            | Error::MissingLandmark { .. }
            | Error::NonFiniteLandmark { .. }
            | Error::NoFaceDetected => ErrorKind::InvalidInput,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Error::ZeroWeightSum.kind(), ErrorKind::InvalidInput);
        assert_eq!(Error::EmptyPointSet.kind(), ErrorKind::InvalidInput);
        assert_eq!(Error::InvalidTolerance(0.0).kind(), ErrorKind::InvalidInput);
        assert_eq!(
            Error::UnknownFeature("forehead".into()).kind(),
            ErrorKind::Configuration
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(Error::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn messages() {
        let err = Error::MissingLandmark {
            index: 454,
            available: 68,
        };
        assert_eq!(err.to_string(), "Landmark 454 missing from a set of 68 points");
    }
}
