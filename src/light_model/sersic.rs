use crate::error::KinematicsError;
use crate::light_model::LightProfileTrait;
use crate::param_util::transform_e1e2;
use crate::params::ParamMap;
use crate::types::check_coordinates;

use ndarray::{Array2, ArrayView2, Zip};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const MIN_RADIUS: f64 = 1e-5;

/// Approximation of the Sersic $b_n$ constant, Ciotti & Bertin (1999) leading terms
pub fn sersic_b_n(n_sersic: f64) -> f64 {
    (1.9992 * n_sersic - 0.3271).max(1e-5)
}

/// Elliptical Sersic profile
///
/// $$
/// I(R) = A \exp\left(-b_n\left[\left(\frac{R}{R_\mathrm{sersic}}\right)^{1/n} - 1\right]\right),
/// $$
/// with elliptical radius $R = \sqrt{q x^2 + y^2 / q}$ in the frame of the major axis. `amp` is the
/// surface brightness at `R_sersic`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SersicEllipse {}

impl LightProfileTrait for SersicEllipse {
    fn name(&self) -> &'static str {
        "SERSIC_ELLIPSE"
    }

    fn required_params(&self) -> &'static [&'static str] {
        &["amp", "R_sersic", "n_sersic", "e1", "e2", "center_x", "center_y"]
    }

    fn surface_brightness(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        kwargs: &ParamMap,
    ) -> Result<Array2<f64>, KinematicsError> {
        check_coordinates(&x, &y)?;
        let amp = kwargs.require("amp", self.name())?;
        let r_sersic = kwargs.require("R_sersic", self.name())?;
        let n_sersic = kwargs.require("n_sersic", self.name())?;
        let e1 = kwargs.require("e1", self.name())?;
        let e2 = kwargs.require("e2", self.name())?;
        let center_x = kwargs.require("center_x", self.name())?;
        let center_y = kwargs.require("center_y", self.name())?;
        let b_n = sersic_b_n(n_sersic);
        Ok(Zip::from(x).and(y).map_collect(|&x, &y| {
            let (x, y) = transform_e1e2(x, y, e1, e2, center_x, center_y);
            let r = f64::hypot(x, y).max(MIN_RADIUS);
            amp * f64::exp(-b_n * ((r / r_sersic).powf(n_sersic.recip()) - 1.0))
        }))
    }
}
