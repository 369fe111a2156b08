//! Fixtures shared by unit tests

use crate::data::{ImageData, KinBin, KinData, Psf};
use crate::kernel::kernel_gaussian;
use crate::kinematics::NnGridConfig;
use crate::lens_model::{LensModel, Shear, Sie};
use crate::light_model::{LightModel, SersicEllipse};
use crate::likelihood::{KinLikelihood, KinLikelihoodConfig};
use crate::params::ParamMap;

use lens_kinematics_test_util as test_util;

pub fn param_list(list: &[&[(&str, f64)]]) -> Vec<ParamMap> {
    list.iter().map(|params| params.iter().copied().collect()).collect()
}

pub fn kwargs_lens() -> Vec<ParamMap> {
    param_list(&test_util::KWARGS_LENS)
}

pub fn kwargs_lens_light() -> Vec<ParamMap> {
    param_list(&test_util::KWARGS_LENS_LIGHT)
}

pub fn kwargs_special() -> ParamMap {
    test_util::KWARGS_SPECIAL.iter().copied().collect()
}

pub fn kin_data() -> KinData {
    let kin_bin = KinBin::new(
        test_util::bin_data(),
        test_util::bin_snr(),
        test_util::BIN_MASK.view(),
    )
    .unwrap();
    let kernel = kernel_gaussian(
        test_util::PSF_NUM_PIX,
        test_util::PSF_DELTA_PIX,
        test_util::PSF_FWHM,
    );
    KinData::new(kin_bin, Psf::pixel(kernel))
}

pub fn image_data() -> ImageData {
    ImageData::new(
        test_util::IMAGE_DATA.clone(),
        test_util::noise_map(),
        test_util::TRANSFORM_PIX2ANGLE,
        test_util::RA_AT_XY_0,
        test_util::DEC_AT_XY_0,
    )
    .unwrap()
}

pub fn lens_model() -> LensModel {
    LensModel::new(vec![Sie {}.into(), Shear {}.into()])
}

pub fn lens_light_model() -> LightModel {
    LightModel::new(vec![SersicEllipse {}.into()])
}

/// Likelihood of the reference setup with default settings
pub fn kin_likelihood() -> KinLikelihood {
    KinLikelihood::new(
        &kin_data(),
        lens_model(),
        lens_light_model(),
        &image_data(),
        0,
        0,
        false,
    )
    .unwrap()
}

/// Likelihood of the reference setup with a coarse generator grid
pub fn coarse_kin_likelihood() -> KinLikelihood {
    let config = KinLikelihoodConfig {
        nn_grid: NnGridConfig {
            num_pix: 101,
            delta_pix: 0.1,
        },
        ..Default::default()
    };
    KinLikelihood::from_config(
        &kin_data(),
        lens_model(),
        lens_light_model(),
        &image_data(),
        config,
    )
    .unwrap()
}
