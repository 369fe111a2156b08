use crate::error::KinematicsError;
use crate::lens_model::{LensProfileTrait, map_deflection};
use crate::param_util::{ellipticity2phi_q, rotate};
use crate::params::ParamMap;
use crate::types::{CoordGrid, check_coordinates};

use ndarray::{Array2, ArrayView2, Zip};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Axis ratios closer to unity than this are evaluated as a singular isothermal sphere
const ROUND_LIMIT: f64 = 1e-8;
/// Regularises the central singularity
const MIN_RADIUS: f64 = 1e-10;

/// Singular isothermal ellipsoid
///
/// Convergence $\kappa = \theta_E / (2\sqrt{q x^2 + y^2 / q})$ in the frame aligned with the major
/// axis, so that `theta_E` is the Einstein radius along the intermediate axis. Deflection follows
/// Keeton & Kochanek (1998) with zero core.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Sie {}

struct SieParams {
    b: f64,
    q: f64,
    phi: f64,
    center_x: f64,
    center_y: f64,
}

impl Sie {
    fn params(&self, kwargs: &ParamMap) -> Result<SieParams, KinematicsError> {
        let theta_e = kwargs.require("theta_E", self.name())?;
        let e1 = kwargs.require("e1", self.name())?;
        let e2 = kwargs.require("e2", self.name())?;
        let (phi, q) = ellipticity2phi_q(e1, e2);
        Ok(SieParams {
            b: theta_e * q.sqrt(),
            q,
            phi,
            center_x: kwargs.require("center_x", self.name())?,
            center_y: kwargs.require("center_y", self.name())?,
        })
    }
}

impl SieParams {
    /// $\psi = \sqrt{q^2 x^2 + y^2}$ in the profile frame
    #[inline]
    fn psi(&self, x: f64, y: f64) -> f64 {
        f64::hypot(self.q * x, y).max(MIN_RADIUS)
    }

    fn deflection(&self, x: f64, y: f64) -> (f64, f64) {
        let (x, y) = rotate(x - self.center_x, y - self.center_y, self.phi);
        let psi = self.psi(x, y);
        let (ax, ay) = if 1.0 - self.q < ROUND_LIMIT {
            (self.b * x / psi, self.b * y / psi)
        } else {
            let s = f64::sqrt(1.0 - self.q * self.q);
            let norm = self.b * self.q / s;
            (
                norm * f64::atan(s * x / psi),
                norm * f64::atanh(s * y / psi),
            )
        };
        rotate(ax, ay, -self.phi)
    }

    fn convergence(&self, x: f64, y: f64) -> f64 {
        let (x, y) = rotate(x - self.center_x, y - self.center_y, self.phi);
        0.5 * self.b / self.psi(x, y)
    }
}

impl LensProfileTrait for Sie {
    fn name(&self) -> &'static str {
        "SIE"
    }

    fn required_params(&self) -> &'static [&'static str] {
        &["theta_E", "e1", "e2", "center_x", "center_y"]
    }

    fn deflection(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        kwargs: &ParamMap,
    ) -> Result<CoordGrid, KinematicsError> {
        let params = self.params(kwargs)?;
        map_deflection(x, y, |x, y| params.deflection(x, y))
    }

    fn convergence(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView2<f64>,
        kwargs: &ParamMap,
    ) -> Result<Array2<f64>, KinematicsError> {
        check_coordinates(&x, &y)?;
        let params = self.params(kwargs)?;
        Ok(Zip::from(x)
            .and(y)
            .map_collect(|&x, &y| params.convergence(x, y)))
    }
}
