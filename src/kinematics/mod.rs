//! Building blocks of the kinematic likelihood

pub mod alignment;
pub use alignment::{ImageInput, KinNnImageAlign};

mod binning;
pub use binning::{EMPTY_BIN_VALUE, auto_binning};

mod distance;
pub use distance::{DistanceFiducial, rescale_distance};

mod generator;
pub use generator::{
    AnalyticVrmsMap, FixedVrmsMap, KinematicMapGenerator, KinematicMapGeneratorTrait,
    NnGridConfig,
};

mod nn_params;
pub use nn_params::{
    NN_INPUT_SIZE, NnInput, REFERENCE_NN_INPUT, SPECIAL_PARAMS, convert_to_nn_params,
};
