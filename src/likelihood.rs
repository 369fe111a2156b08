use crate::data::{BinMask, ImageData, KinData, PixelGrid};
use crate::error::KinematicsError;
use crate::kinematics::alignment::resolve_kin_grid;
use crate::kinematics::{
    AnalyticVrmsMap, DistanceFiducial, ImageInput, KinNnImageAlign, KinematicMapGenerator,
    KinematicMapGeneratorTrait, NnGridConfig, NnInput, auto_binning, convert_to_nn_params,
    rescale_distance,
};
use crate::lens_model::LensModel;
use crate::light_model::LightModel;
use crate::params::{ParamMap, profile_params};

use itertools::izip;
use macro_const::macro_const;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Log-likelihood reported for non-physical parameters
pub const BAD_LN_LIKELIHOOD: f64 = -1e15;

/// Settings of [KinLikelihood]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct KinLikelihoodConfig {
    /// Lens mass profile the kinematics are computed for
    pub idx_lens: usize,
    /// Lens light profile used as the kinematic tracer
    pub idx_lens_light: usize,
    /// Request a CUDA device for the map generator
    pub cuda: bool,
    /// Output grid of the default map generator
    pub nn_grid: NnGridConfig,
    /// Cosmology of the raw kinematic maps
    pub fiducial: DistanceFiducial,
}

macro_const! {
    const DOC: &str = r"
Likelihood of binned stellar kinematics given a lens model

The model velocity dispersion map is produced in five steps:

1. lens mass, lens light and special parameters are converted to the map generator input,
2. the generator produces a galaxy-frame map for the fiducial cosmology,
3. the map is rescaled to the distances $D_{\Delta t}$, $D_d$ and redshift $z_d$ asked for,
4. the map is rotated and shifted onto the kinematic pixels following the lens mass profile,
5. map and lens light are convolved with the PSF and light-weighted averages are taken over bins.

Binned model values $v_b$ are compared to the observed values $d_b$ with uncertainties
$\delta_b = d_b / \mathrm{SNR}_b$:
$$
\ln\mathcal{L} = -\frac12 \sum_b \left(\frac{v_b - d_b}{\delta_b}\right)^2.
$$

Non-physical parameters (negative distances, non-positive uncertainties, non-finite model
values) give `BAD_LN_LIKELIHOOD` instead of an error.
";
}

#[doc = DOC!()]
#[derive(Clone, Debug)]
pub struct KinLikelihood<G = KinematicMapGenerator> {
    lens_model: LensModel,
    lens_light_model: LightModel,
    lens_light_bool_list: Vec<bool>,
    bin_mask: BinMask,
    data: Array1<f64>,
    noise: Array1<f64>,
    kernel: Option<Array2<f64>>,
    image_input: ImageInput,
    aligner: KinNnImageAlign,
    generator: G,
    config: KinLikelihoodConfig,
}

impl KinLikelihood<KinematicMapGenerator> {
    /// Likelihood with the analytic map generator and default settings
    pub fn new(
        kin_data: &KinData,
        lens_model: LensModel,
        lens_light_model: LightModel,
        image_data: &ImageData,
        idx_lens: usize,
        idx_lens_light: usize,
        cuda: bool,
    ) -> Result<Self, KinematicsError> {
        let config = KinLikelihoodConfig {
            idx_lens,
            idx_lens_light,
            cuda,
            ..Default::default()
        };
        Self::from_config(kin_data, lens_model, lens_light_model, image_data, config)
    }

    /// Likelihood with the analytic map generator on the configured grid
    pub fn from_config(
        kin_data: &KinData,
        lens_model: LensModel,
        lens_light_model: LightModel,
        image_data: &ImageData,
        config: KinLikelihoodConfig,
    ) -> Result<Self, KinematicsError> {
        let generator: KinematicMapGenerator = AnalyticVrmsMap::new(config.nn_grid).into();
        KinLikelihood::with_generator(
            kin_data,
            lens_model,
            lens_light_model,
            image_data,
            config,
            generator,
        )
    }
}

impl<G> KinLikelihood<G>
where
    G: KinematicMapGeneratorTrait,
{
    pub fn with_generator(
        kin_data: &KinData,
        lens_model: LensModel,
        lens_light_model: LightModel,
        image_data: &ImageData,
        config: KinLikelihoodConfig,
        generator: G,
    ) -> Result<Self, KinematicsError> {
        check_index(config.idx_lens, lens_model.profiles().len())?;
        check_index(config.idx_lens_light, lens_light_model.profiles().len())?;
        if config.cuda {
            log::warn!("CUDA was requested but map generation runs on the CPU");
        }

        let kin_bin = kin_data.kin_bin();
        let bin_mask = kin_bin.bin_mask().clone();
        let kin_grid = resolve_kin_grid(kin_bin.pixel_grid(), image_data, bin_mask.shape());
        let kernel = kin_data.psf().kernel_point_source(kin_grid.pixel_width())?;
        log::debug!(
            "kinematic likelihood: {} bins on a {:?} grid, PSF kernel {:?}",
            kin_bin.num_bins(),
            kin_grid.shape(),
            kernel.as_ref().map(|k| k.dim()),
        );

        let mut lens_light_bool_list = vec![false; lens_light_model.profiles().len()];
        lens_light_bool_list[config.idx_lens_light] = true;

        Ok(Self {
            lens_model,
            lens_light_model,
            lens_light_bool_list,
            bin_mask,
            data: kin_bin.bin_data().clone(),
            noise: kin_bin.noise(),
            kernel,
            image_input: ImageInput::new(image_data),
            aligner: KinNnImageAlign::new(kin_grid),
            generator,
            config,
        })
    }

    pub fn doc() -> &'static str {
        DOC
    }

    /// Log-likelihood of the binned kinematics for the given model
    ///
    /// Missing parameters are reported as errors, non-physical parameters give
    /// [BAD_LN_LIKELIHOOD].
    pub fn ln_likelihood(
        &self,
        kwargs_lens: &[ParamMap],
        kwargs_lens_light: &[ParamMap],
        kwargs_special: &ParamMap,
        z_d: f64,
    ) -> Result<f64, KinematicsError> {
        match self.try_ln_likelihood(kwargs_lens, kwargs_lens_light, kwargs_special, z_d) {
            Err(err) if err.is_non_physical() => {
                log::debug!("kinematic likelihood: {err}");
                Ok(BAD_LN_LIKELIHOOD)
            }
            result => result,
        }
    }

    fn try_ln_likelihood(
        &self,
        kwargs_lens: &[ParamMap],
        kwargs_lens_light: &[ParamMap],
        kwargs_special: &ParamMap,
        z_d: f64,
    ) -> Result<f64, KinematicsError> {
        let input = self.convert_to_nn_params(kwargs_lens, kwargs_lens_light, kwargs_special)?;
        let raw_map = self.generator.generate_map(&input)?;
        let map = self.rescale_distance(raw_map.view(), kwargs_special, z_d)?;
        let image_input = self.image_input_for(kwargs_lens)?;
        let kin_map = self
            .aligner
            .interp_image(map.view(), self.generator.delta_pix(), &image_input)?;
        let light_map = self.light_map(kwargs_lens_light)?;
        let vrms = self.auto_binning(kin_map.view(), light_map.view())?;
        let ln_l = self.ln_likelihood_binned(vrms.view())?;
        log::debug!("kinematic likelihood: binned model {vrms}, ln L = {ln_l}");
        Ok(ln_l)
    }

    /// Gaussian log-likelihood of binned model values
    pub fn ln_likelihood_binned(&self, vrms: ArrayView1<f64>) -> Result<f64, KinematicsError> {
        if vrms.len() != self.data.len() {
            return Err(KinematicsError::ShapeMismatch {
                context: "binned model must have one value per bin",
                expected: (self.data.len(), 1),
                actual: (vrms.len(), 1),
            });
        }
        let mut chi2 = 0.0;
        for (&model, &data, &noise) in izip!(&vrms, &self.data, &self.noise) {
            if !(noise > 0.0 && noise.is_finite()) {
                return Err(KinematicsError::NonPhysicalResult(
                    "bin uncertainty must be positive and finite",
                ));
            }
            if !model.is_finite() {
                return Err(KinematicsError::NonPhysicalResult(
                    "binned model value is not finite",
                ));
            }
            chi2 += ((model - data) / noise).powi(2);
        }
        Ok(-0.5 * chi2)
    }

    /// Map generator input for the profiles at the configured indices
    pub fn convert_to_nn_params(
        &self,
        kwargs_lens: &[ParamMap],
        kwargs_lens_light: &[ParamMap],
        kwargs_special: &ParamMap,
    ) -> Result<NnInput, KinematicsError> {
        self.lens_model.check_kwargs(kwargs_lens)?;
        self.lens_light_model.check_kwargs(kwargs_lens_light)?;
        convert_to_nn_params(
            profile_params(kwargs_lens, self.config.idx_lens)?,
            profile_params(kwargs_lens_light, self.config.idx_lens_light)?,
            kwargs_special,
        )
    }

    /// Rescales a map computed for the fiducial cosmology, see [DistanceFiducial::scale_factor]
    pub fn rescale_distance(
        &self,
        map: ArrayView2<f64>,
        kwargs_special: &ParamMap,
        z_d: f64,
    ) -> Result<Array2<f64>, KinematicsError> {
        rescale_distance(map, kwargs_special, z_d, &self.config.fiducial)
    }

    /// Image input aligned to the configured lens mass profile, `self` is left untouched
    pub fn image_input_for(&self, kwargs_lens: &[ParamMap]) -> Result<ImageInput, KinematicsError> {
        self.image_input
            .aligned(profile_params(kwargs_lens, self.config.idx_lens)?)
    }

    /// Aligns the stored image input to the configured lens mass profile
    pub fn update_image_input(&mut self, kwargs_lens: &[ParamMap]) -> Result<(), KinematicsError> {
        self.image_input = self.image_input_for(kwargs_lens)?;
        Ok(())
    }

    pub fn image_input(&self) -> &ImageInput {
        &self.image_input
    }

    /// Lens light of the tracer profile on the kinematic pixels
    pub fn light_map(
        &self,
        kwargs_lens_light: &[ParamMap],
    ) -> Result<Array2<f64>, KinematicsError> {
        let (x, y) = self.kin_grid();
        self.lens_light_model.surface_brightness(
            x.view(),
            y.view(),
            kwargs_lens_light,
            Some(self.lens_light_bool_list.as_slice()),
        )
    }

    /// PSF-convolved, light-weighted bin averages of a map on the kinematic pixels
    pub fn auto_binning(
        &self,
        map: ArrayView2<f64>,
        light_map: ArrayView2<f64>,
    ) -> Result<Array1<f64>, KinematicsError> {
        auto_binning(
            map,
            light_map,
            &self.bin_mask,
            self.kernel.as_ref().map(|k| k.view()),
        )
    }

    /// Angular coordinates of the kinematic pixels
    pub fn kin_grid(&self) -> (&Array2<f64>, &Array2<f64>) {
        self.aligner.kin_coordinates()
    }

    pub fn kin_pixel_grid(&self) -> &PixelGrid {
        self.aligner.kin_grid()
    }

    pub fn lens_light_bool_list(&self) -> &[bool] {
        &self.lens_light_bool_list
    }

    pub fn lens_model(&self) -> &LensModel {
        &self.lens_model
    }

    pub fn lens_light_model(&self) -> &LightModel {
        &self.lens_light_model
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn config(&self) -> &KinLikelihoodConfig {
        &self.config
    }
}

fn check_index(index: usize, len: usize) -> Result<(), KinematicsError> {
    if index >= len {
        return Err(KinematicsError::ProfileIndexOutOfRange { index, len });
    }
    Ok(())
}
