use crate::error::KinematicsError;
use crate::kinematics::nn_params::NnInput;

use enum_dispatch::enum_dispatch;
use ndarray::Array2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Square output grid of a kinematic map generator, centred on the lens
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NnGridConfig {
    /// Pixels per side
    pub num_pix: usize,
    /// Pixel size, arcsec
    pub delta_pix: f64,
}

impl Default for NnGridConfig {
    fn default() -> Self {
        Self {
            num_pix: 551,
            delta_pix: 0.02,
        }
    }
}

impl NnGridConfig {
    /// Offset of pixel `index` from the grid centre, arcsec
    #[inline]
    pub fn offset(&self, index: usize) -> f64 {
        (index as f64 - 0.5 * (self.num_pix as f64 - 1.0)) * self.delta_pix
    }
}

/// Source of raw velocity dispersion maps
///
/// Maps are given in the galaxy frame: centred on the lens, major axis along the column axis,
/// sampled with [KinematicMapGeneratorTrait::delta_pix].
#[enum_dispatch]
pub trait KinematicMapGeneratorTrait {
    /// Pixel size of generated maps, arcsec
    fn delta_pix(&self) -> f64;

    fn generate_map(&self, input: &NnInput) -> Result<Array2<f64>, KinematicsError>;
}

#[enum_dispatch(KinematicMapGeneratorTrait)]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum KinematicMapGenerator {
    Analytic(AnalyticVrmsMap),
    Fixed(FixedVrmsMap),
}

/// Isothermal dispersion of a lens with 1 arcsec Einstein radius and $D_{ds}/D_s = 1/2$, km/s
const SIGMA_SIS: f64 = 263.0;
/// Relative loss of line-of-sight dispersion far outside the anisotropy radius, where orbits
/// are radial
const ANISOTROPY_DEPTH: f64 = 0.2;

/// Closed-form approximation of a velocity dispersion map
///
/// $$
/// \sigma(r) = \sigma_\mathrm{SIS}\sqrt{\theta_E}
///     \left(1 + \frac{r^2}{R_\mathrm{sersic}^2}\right)^{-s/2}
///     \sqrt{1 - g \frac{r^2}{r^2 + r_\mathrm{ani}^2}}
///     \left(\sin^2 i + q^2 \cos^2 i\right)^{1/4},
/// $$
/// where $r^2 = q_\mathrm{light} x^2 + y^2 / q_\mathrm{light} + r_\mathrm{core}^2$,
/// $s = |\gamma - 1| + n_\mathrm{sersic} / 40$, $r_\mathrm{ani} = b_\mathrm{ani} R_\mathrm{sersic}$
/// $g = 0.2$ and $q$ is the mass axis ratio. This is a smooth stand-in with the qualitative
/// trends of a Jeans solution, not a Jeans solution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyticVrmsMap {
    grid: NnGridConfig,
}

impl AnalyticVrmsMap {
    pub fn new(grid: NnGridConfig) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &NnGridConfig {
        &self.grid
    }
}

impl KinematicMapGeneratorTrait for AnalyticVrmsMap {
    fn delta_pix(&self) -> f64 {
        self.grid.delta_pix
    }

    fn generate_map(&self, input: &NnInput) -> Result<Array2<f64>, KinematicsError> {
        if !(input.theta_e() >= 0.0 && input.q_light() > 0.0 && input.r_sersic() > 0.0) {
            return Err(KinematicsError::NonPhysicalResult(
                "generator input needs theta_E >= 0, light q > 0 and R_sersic > 0",
            ));
        }
        let sigma0 = SIGMA_SIS * input.theta_e().sqrt();
        let slope = (input.gamma() - 1.0).abs() + input.n_sersic() / 40.0;
        let r_sersic2 = input.r_sersic().powi(2);
        let r_ani2 = (input.b_ani() * input.r_sersic()).powi(2);
        let (sin_i, cos_i) = input.inclination_deg().to_radians().sin_cos();
        let projection = (sin_i.powi(2) + (input.q_mass() * cos_i).powi(2)).powf(0.25);
        let q = input.q_light();

        let n = self.grid.num_pix;
        let map = Array2::from_shape_fn((n, n), |(row, col)| {
            let x = self.grid.offset(col);
            let y = self.grid.offset(row);
            let r2 = q * x * x + y * y / q + input.r_core().powi(2);
            let radial = (1.0 + r2 / r_sersic2).powf(-0.5 * slope);
            let anisotropy = if r2 + r_ani2 > 0.0 {
                f64::sqrt(1.0 - ANISOTROPY_DEPTH * r2 / (r2 + r_ani2))
            } else {
                1.0
            };
            sigma0 * radial * anisotropy * projection
        });
        Ok(map)
    }
}

/// Pre-computed map returned for any input
///
/// Serves as a lookup table for a single configuration, e.g. a surrogate evaluated elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedVrmsMap {
    map: Array2<f64>,
    delta_pix: f64,
}

impl FixedVrmsMap {
    pub fn new(map: Array2<f64>, delta_pix: f64) -> Self {
        Self { map, delta_pix }
    }
}

impl KinematicMapGeneratorTrait for FixedVrmsMap {
    fn delta_pix(&self) -> f64 {
        self.delta_pix
    }

    fn generate_map(&self, _input: &NnInput) -> Result<Array2<f64>, KinematicsError> {
        Ok(self.map.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::kinematics::nn_params::REFERENCE_NN_INPUT;

    fn small_grid() -> NnGridConfig {
        NnGridConfig {
            num_pix: 51,
            delta_pix: 0.1,
        }
    }

    #[test]
    fn grid_offsets_are_centred() {
        let grid = small_grid();
        assert_eq!(grid.offset(25), 0.0);
        assert!((grid.offset(0) + 2.5).abs() < 1e-12);
        assert!((grid.offset(50) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn analytic_map_is_positive_and_peaks_at_centre() {
        let generator = AnalyticVrmsMap::new(small_grid());
        let map = generator.generate_map(&NnInput::new(REFERENCE_NN_INPUT)).unwrap();
        assert_eq!(map.dim(), (51, 51));
        let centre = map[[25, 25]];
        assert!(map.iter().all(|&v| v > 0.0 && v.is_finite() && v <= centre));
        // light axis ratio < 1: the major axis runs along columns
        assert!(map[[25, 40]] > map[[40, 25]]);
    }

    #[test]
    fn analytic_map_scales_with_einstein_radius() {
        let generator = AnalyticVrmsMap::new(small_grid());
        let mut values = REFERENCE_NN_INPUT;
        let base = generator.generate_map(&NnInput::new(values)).unwrap();
        values[0] *= 4.0;
        let scaled = generator.generate_map(&NnInput::new(values)).unwrap();
        let ratio = scaled[[10, 30]] / base[[10, 30]];
        assert!((ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn analytic_map_rejects_non_physical_input() {
        let mut values = REFERENCE_NN_INPUT;
        values[6] = -0.5;
        let err = AnalyticVrmsMap::new(small_grid())
            .generate_map(&NnInput::new(values))
            .unwrap_err();
        assert!(err.is_non_physical());
    }

    #[test]
    fn fixed_map_ignores_input() {
        let map = Array2::from_elem((3, 3), 250.0);
        let generator: KinematicMapGenerator = FixedVrmsMap::new(map.clone(), 0.05).into();
        assert_eq!(generator.delta_pix(), 0.05);
        assert_eq!(generator.generate_map(&NnInput::new([0.0; 9])).unwrap(), map);
    }
}
