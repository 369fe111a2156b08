use crate::error::KinematicsError;
use crate::lens_model::{LensProfileTrait, map_deflection};
use crate::params::ParamMap;
use crate::types::CoordGrid;

use ndarray::{Array2, ArrayView2};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// External shear in Cartesian components `gamma1`, `gamma2`
///
/// Optional `ra_0`, `dec_0` set the origin the shear field is expanded around.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Shear {}

impl LensProfileTrait for Shear {
    fn name(&self) -> &'static str {
        "SHEAR"
    }

    fn required_params(&self) -> &'static [&'static str] {
        &["gamma1", "gamma2"]
    }

    fn deflection(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        kwargs: &ParamMap,
    ) -> Result<CoordGrid, KinematicsError> {
        let gamma1 = kwargs.require("gamma1", self.name())?;
        let gamma2 = kwargs.require("gamma2", self.name())?;
        let ra_0 = kwargs.get_or("ra_0", 0.0);
        let dec_0 = kwargs.get_or("dec_0", 0.0);
        map_deflection(x, y, |x, y| {
            let (dx, dy) = (x - ra_0, y - dec_0);
            (gamma1 * dx + gamma2 * dy, gamma2 * dx - gamma1 * dy)
        })
    }

    fn convergence(
        &self,
        x: ArrayView2<f64>,
        _y: ArrayView2<f64>,
        _kwargs: &ParamMap,
    ) -> Result<Array2<f64>, KinematicsError> {
        Ok(Array2::zeros(x.dim()))
    }
}
