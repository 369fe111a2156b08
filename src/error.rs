/// Error returned from kinematic likelihood components
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum KinematicsError {
    #[error("required parameter '{key}' is missing from {context}")]
    MissingParameter { key: String, context: &'static str },

    #[error("{context}: expected shape {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("bin label {label} is out of range for {num_bins} declared bins")]
    BinLabelOutOfRange { label: i64, num_bins: usize },

    #[error("bin_data has {data} values while bin_SNR has {snr}")]
    BinCountMismatch { data: usize, snr: usize },

    #[error("profile index {index} is out of range for a model of {len} profiles")]
    ProfileIndexOutOfRange { index: usize, len: usize },

    #[error("non-physical result: {0}")]
    NonPhysicalResult(&'static str),
}

impl KinematicsError {
    pub(crate) fn missing(key: &str, context: &'static str) -> Self {
        Self::MissingParameter {
            key: key.to_owned(),
            context,
        }
    }

    /// Whether the error comes from a parameter region a sampler may legitimately visit
    pub fn is_non_physical(&self) -> bool {
        matches!(self, Self::NonPhysicalResult(_))
    }
}
