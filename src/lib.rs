#![doc = include_str!("../README.md")]

#[cfg(test)]
mod tests;

pub mod data;
pub use data::{BinMask, ImageData, KinBin, KinData, PixelGrid, Psf};

mod error;
pub use error::KinematicsError;

pub mod kernel;
pub use kernel::{convolve_same, kernel_gaussian};

pub mod kinematics;
pub use kinematics::{
    AnalyticVrmsMap, DistanceFiducial, FixedVrmsMap, ImageInput, KinNnImageAlign,
    KinematicMapGenerator, KinematicMapGeneratorTrait, NnGridConfig, NnInput,
};

pub mod lens_model;
pub use lens_model::{LensModel, LensProfile, LensProfileTrait};

pub mod light_model;
pub use light_model::{LightModel, LightProfile, LightProfileTrait};

mod likelihood;
pub use likelihood::{BAD_LN_LIKELIHOOD, KinLikelihood, KinLikelihoodConfig};

pub mod param_util;

mod params;
pub use params::ParamMap;

mod types;
pub use types::{CoordGrid, Matrix2};

pub use ndarray;
