//! Surface brightness profiles of the lens galaxy

use crate::error::KinematicsError;
use crate::params::{ParamMap, profile_params};
use crate::types::check_coordinates;

use enum_dispatch::enum_dispatch;
use ndarray::{Array2, ArrayView2};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod sersic;
pub use sersic::SersicEllipse;

#[enum_dispatch]
pub trait LightProfileTrait {
    fn name(&self) -> &'static str;

    fn required_params(&self) -> &'static [&'static str];

    fn surface_brightness(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        kwargs: &ParamMap,
    ) -> Result<Array2<f64>, KinematicsError>;
}

#[enum_dispatch(LightProfileTrait)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[non_exhaustive]
pub enum LightProfile {
    #[serde(rename = "SERSIC_ELLIPSE")]
    SersicEllipse(SersicEllipse),
}

/// Superposition of light profiles
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LightModel {
    profiles: Vec<LightProfile>,
}

impl LightModel {
    pub fn new(profiles: Vec<LightProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[LightProfile] {
        &self.profiles
    }

    pub fn check_kwargs(&self, kwargs: &[ParamMap]) -> Result<(), KinematicsError> {
        for (index, profile) in self.profiles.iter().enumerate() {
            profile_params(kwargs, index)?.require_all(profile.required_params(), profile.name())?;
        }
        Ok(())
    }

    /// Total surface brightness of the profiles selected by `k`, all profiles if `k` is `None`
    ///
    /// Profiles beyond the end of `k` are not selected.
    pub fn surface_brightness(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        kwargs: &[ParamMap],
        k: Option<&[bool]>,
    ) -> Result<Array2<f64>, KinematicsError> {
        check_coordinates(&x, &y)?;
        let mut flux = Array2::zeros(x.dim());
        for (index, profile) in self.profiles.iter().enumerate() {
            let selected = k.is_none_or(|k| k.get(index).copied().unwrap_or(false));
            if selected {
                flux += &profile.surface_brightness(x, y, profile_params(kwargs, index)?)?;
            }
        }
        Ok(flux)
    }
}
