//! Lens mass profiles
//!
//! Only the pieces the kinematic likelihood relies on are provided: deflection and convergence
//! of a small set of profiles and validation of their parameters.

use crate::error::KinematicsError;
use crate::params::{ParamMap, profile_params};
use crate::types::{CoordGrid, check_coordinates};

use enum_dispatch::enum_dispatch;
use ndarray::{Array2, ArrayView2, Zip};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod shear;
pub use shear::Shear;

mod sie;
pub use sie::Sie;

#[enum_dispatch]
pub trait LensProfileTrait {
    /// Profile name as used in error messages
    fn name(&self) -> &'static str;

    /// Parameters which must be present in the profile's [ParamMap]
    fn required_params(&self) -> &'static [&'static str];

    /// Deflection angles at `(x, y)`
    fn deflection(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        kwargs: &ParamMap,
    ) -> Result<CoordGrid, KinematicsError>;

    /// Dimensionless surface mass density at `(x, y)`
    fn convergence(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        kwargs: &ParamMap,
    ) -> Result<Array2<f64>, KinematicsError>;
}

#[enum_dispatch(LensProfileTrait)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[non_exhaustive]
pub enum LensProfile {
    #[serde(rename = "SIE")]
    Sie(Sie),
    #[serde(rename = "SHEAR")]
    Shear(Shear),
}

/// Superposition of lens mass profiles
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LensModel {
    profiles: Vec<LensProfile>,
}

impl LensModel {
    pub fn new(profiles: Vec<LensProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[LensProfile] {
        &self.profiles
    }

    /// Checks there is a parameter map with all required keys for every profile
    pub fn check_kwargs(&self, kwargs: &[ParamMap]) -> Result<(), KinematicsError> {
        for (index, profile) in self.profiles.iter().enumerate() {
            profile_params(kwargs, index)?.require_all(profile.required_params(), profile.name())?;
        }
        Ok(())
    }

    pub fn deflection(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        kwargs: &[ParamMap],
    ) -> Result<CoordGrid, KinematicsError> {
        check_coordinates(&x, &y)?;
        let mut alpha_x = Array2::zeros(x.dim());
        let mut alpha_y = Array2::zeros(x.dim());
        for (index, profile) in self.profiles.iter().enumerate() {
            let (ax, ay) = profile.deflection(x, y, profile_params(kwargs, index)?)?;
            alpha_x += &ax;
            alpha_y += &ay;
        }
        Ok((alpha_x, alpha_y))
    }

    pub fn convergence(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        kwargs: &[ParamMap],
    ) -> Result<Array2<f64>, KinematicsError> {
        check_coordinates(&x, &y)?;
        let mut kappa = Array2::zeros(x.dim());
        for (index, profile) in self.profiles.iter().enumerate() {
            kappa += &profile.convergence(x, y, profile_params(kwargs, index)?)?;
        }
        Ok(kappa)
    }
}

/// Evaluates a point-wise deflection over coordinate arrays
pub(crate) fn map_deflection<F>(
    x: ArrayView2<f64>,
    y: ArrayView2<f64>,
    f: F,
) -> Result<CoordGrid, KinematicsError>
where
    F: Fn(f64, f64) -> (f64, f64),
{
    check_coordinates(&x, &y)?;
    let mut alpha_x = Array2::zeros(x.dim());
    let mut alpha_y = Array2::zeros(x.dim());
    Zip::from(&mut alpha_x)
        .and(&mut alpha_y)
        .and(x)
        .and(y)
        .for_each(|ax, ay, &x, &y| (*ax, *ay) = f(x, y));
    Ok((alpha_x, alpha_y))
}
