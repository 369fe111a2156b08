use crate::error::KinematicsError;
use crate::params::ParamMap;

use ndarray::{Array2, ArrayView2};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Cosmology the raw kinematic maps are computed for
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DistanceFiducial {
    /// Time-delay distance, Mpc
    #[serde(rename = "D_dt")]
    pub d_dt: f64,
    /// Angular diameter distance to the deflector, Mpc
    #[serde(rename = "D_d")]
    pub d_d: f64,
    /// Deflector redshift
    pub z_d: f64,
}

impl Default for DistanceFiducial {
    fn default() -> Self {
        Self {
            d_dt: 2886.544,
            d_d: 1215.739,
            z_d: 0.5,
        }
    }
}

impl DistanceFiducial {
    /// Factor converting a fiducial velocity dispersion to the given distances
    ///
    /// The dispersion of a lens of fixed angular size scales as
    /// $\sigma^2 \propto D_s / D_{ds} = D_{\Delta t} / \left[(1 + z_d) D_d\right]$, so
    /// $$
    /// \frac{\sigma}{\sigma_\mathrm{fid}} = \sqrt{
    ///     \frac{D_{\Delta t}}{D_{\Delta t}^\mathrm{fid}}
    ///     \frac{D_d^\mathrm{fid}}{D_d}
    ///     \frac{1 + z_d^\mathrm{fid}}{1 + z_d}}.
    /// $$
    pub fn scale_factor(&self, d_dt: f64, d_d: f64, z_d: f64) -> Result<f64, KinematicsError> {
        if !(d_dt > 0.0 && d_d > 0.0 && z_d > -1.0) {
            return Err(KinematicsError::NonPhysicalResult(
                "distances must be positive and redshift above -1",
            ));
        }
        let ratio = (d_dt / self.d_dt) * (self.d_d / d_d) * ((1.0 + self.z_d) / (1.0 + z_d));
        if !ratio.is_finite() {
            return Err(KinematicsError::NonPhysicalResult(
                "distance ratio is not finite",
            ));
        }
        Ok(ratio.sqrt())
    }
}

/// Rescales a fiducial velocity dispersion map to the distances of `kwargs_special`
///
/// `kwargs_special` must hold `D_dt` and `D_d`, `z_d` is the deflector redshift.
pub fn rescale_distance(
    map: ArrayView2<f64>,
    kwargs_special: &ParamMap,
    z_d: f64,
    fiducial: &DistanceFiducial,
) -> Result<Array2<f64>, KinematicsError> {
    let d_dt = kwargs_special.require("D_dt", "special parameters")?;
    let d_d = kwargs_special.require("D_d", "special parameters")?;
    let factor = fiducial.scale_factor(d_dt, d_d, z_d)?;
    Ok(map.mapv(|v| v * factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use std::f64::consts::SQRT_2;

    fn special(d_dt: f64, d_d: f64) -> ParamMap {
        ParamMap::from([("D_dt", d_dt), ("b_ani", 0.1), ("incli", 0.0), ("D_d", d_d)])
    }

    fn image() -> Array2<f64> {
        let mut image = Array2::zeros((15, 15));
        image.column_mut(6).fill(1.0);
        image
    }

    #[test]
    fn fiducial_is_identity() {
        let image = image();
        let rescaled =
            rescale_distance(image.view(), &special(2886.544, 1215.739), 0.5, &Default::default())
                .unwrap();
        assert_abs_diff_eq!(rescaled, image, epsilon = 1e-4);
    }

    #[test]
    fn time_delay_distance() {
        let image = image();
        let rescaled = rescale_distance(
            image.view(),
            &special(2.0 * 2886.544, 1215.739),
            0.5,
            &Default::default(),
        )
        .unwrap();
        assert_abs_diff_eq!(rescaled, SQRT_2 * &image, epsilon = 1e-4);
    }

    #[test]
    fn deflector_distance() {
        let image = image();
        let rescaled = rescale_distance(
            image.view(),
            &special(2886.544, 2.0 * 1215.739),
            0.5,
            &Default::default(),
        )
        .unwrap();
        assert_abs_diff_eq!(rescaled, &image / SQRT_2, epsilon = 1e-4);
    }

    #[test]
    fn deflector_redshift() {
        let image = image();
        let rescaled =
            rescale_distance(image.view(), &special(2886.544, 1215.739), 2.0, &Default::default())
                .unwrap();
        assert_abs_diff_eq!(rescaled, &image / SQRT_2, epsilon = 1e-4);
    }

    #[test]
    fn negative_distance_is_non_physical() {
        let err = rescale_distance(
            image().view(),
            &special(-1.0, 1215.739),
            0.5,
            &Default::default(),
        )
        .unwrap_err();
        assert!(err.is_non_physical());
    }

    #[test]
    fn missing_distance() {
        let kwargs = ParamMap::from([("D_dt", 2000.0)]);
        assert_eq!(
            rescale_distance(image().view(), &kwargs, 0.5, &Default::default()),
            Err(KinematicsError::MissingParameter {
                key: "D_d".into(),
                context: "special parameters"
            })
        );
    }

    #[test]
    fn fiducial_from_json() {
        let fiducial: DistanceFiducial =
            serde_json::from_str(r#"{"D_dt": 3000.0, "D_d": 1200.0, "z_d": 0.3}"#).unwrap();
        assert_eq!(fiducial.scale_factor(3000.0, 1200.0, 0.3).unwrap(), 1.0);
    }
}
