use criterion::Criterion;
use lens_kinematics::ndarray::Array2;
use lens_kinematics::{
    ImageData, KinBin, KinData, KinLikelihood, KinLikelihoodConfig, LensModel, LightModel,
    NnGridConfig, ParamMap, Psf, kernel_gaussian, lens_model, light_model,
};
use lens_kinematics_test_util as test_util;
use std::hint::black_box;

fn param_list(list: &[&[(&str, f64)]]) -> Vec<ParamMap> {
    list.iter().map(|params| params.iter().copied().collect()).collect()
}

fn kin_likelihood(nn_grid: NnGridConfig) -> KinLikelihood {
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
    let image_data = ImageData::new(
        test_util::IMAGE_DATA.clone(),
        test_util::noise_map(),
        test_util::TRANSFORM_PIX2ANGLE,
        test_util::RA_AT_XY_0,
        test_util::DEC_AT_XY_0,
    )
    .unwrap();
    KinLikelihood::from_config(
        &KinData::new(kin_bin, Psf::pixel(kernel)),
        LensModel::new(vec![lens_model::Sie {}.into(), lens_model::Shear {}.into()]),
        LightModel::new(vec![light_model::SersicEllipse {}.into()]),
        &image_data,
        KinLikelihoodConfig {
            nn_grid,
            ..Default::default()
        },
    )
    .unwrap()
}

pub fn bench_ln_likelihood(c: &mut Criterion) {
    let kwargs_lens = param_list(&test_util::KWARGS_LENS);
    let kwargs_lens_light = param_list(&test_util::KWARGS_LENS_LIGHT);
    let kwargs_special: ParamMap = test_util::KWARGS_SPECIAL.iter().copied().collect();

    for num_pix in [101, 551] {
        let likelihood = kin_likelihood(NnGridConfig {
            num_pix,
            delta_pix: 11.0 / num_pix as f64,
        });
        c.bench_function(
            &format!("ln_likelihood, {num_pix}x{num_pix} generator grid"),
            |b| {
                b.iter(|| {
                    likelihood.ln_likelihood(
                        black_box(&kwargs_lens),
                        black_box(&kwargs_lens_light),
                        black_box(&kwargs_special),
                        black_box(test_util::Z_D),
                    )
                })
            },
        );
    }
}

pub fn bench_auto_binning(c: &mut Criterion) {
    let likelihood = kin_likelihood(NnGridConfig::default());
    let kwargs_lens_light = param_list(&test_util::KWARGS_LENS_LIGHT);
    let light_map = likelihood.light_map(&kwargs_lens_light).unwrap();
    let map = Array2::from_elem(light_map.dim(), 250.0);

    c.bench_function("auto_binning with PSF", |b| {
        b.iter(|| likelihood.auto_binning(black_box(map.view()), black_box(light_map.view())))
    });
}
