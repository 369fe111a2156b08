//! Reference configuration of a lensed galaxy with binned stellar kinematics
//!
//! Everything is exposed as plain `ndarray` and `std` values so it can be shared by unit tests,
//! integration tests and benchmarks.

use lazy_static::lazy_static;
use ndarray::{Array1, Array2};

pub const KIN_NUM_PIX: usize = 10;
pub const KIN_NUM_BIN: usize = 4;
pub const IMAGE_NUM_PIX: usize = 15;

pub const TRANSFORM_PIX2ANGLE: [[f64; 2]; 2] = [[-0.9, 0.1], [0.1, 0.9]];
pub const RA_AT_XY_0: f64 = 2.0;
pub const DEC_AT_XY_0: f64 = -2.0;

/// Pixelated Gaussian PSF of the kinematic data: size, pixel scale and FWHM
pub const PSF_NUM_PIX: usize = 9;
pub const PSF_DELTA_PIX: f64 = 1.0;
pub const PSF_FWHM: f64 = 2.0;

/// SIE + external shear
pub const KWARGS_LENS: [&[(&str, f64)]; 2] = [
    &[
        ("theta_E", 1.0),
        ("e1", 0.1),
        ("e2", 0.1),
        ("center_x", 0.0),
        ("center_y", 0.0),
    ],
    &[("gamma1", 0.06), ("gamma2", -0.03)],
];

/// Elliptical Sersic
pub const KWARGS_LENS_LIGHT: [&[(&str, f64)]; 1] = [&[
    ("amp", 10.0),
    ("R_sersic", 1.0),
    ("e1", 0.1),
    ("e2", 0.1),
    ("n_sersic", 3.0),
    ("center_x", 0.0),
    ("center_y", 0.0),
]];

pub const KWARGS_SPECIAL: &[(&str, f64)] = &[
    ("D_dt", 1988.0),
    ("b_ani", 0.1),
    ("incli", 0.0),
    ("D_d", 2000.0),
];

pub const Z_D: f64 = 0.5;

/// Distances the raw kinematic maps are computed for
pub const FIDUCIAL_D_DT: f64 = 2886.544;
pub const FIDUCIAL_D_D: f64 = 1215.739;

lazy_static! {
    /// Column 6 is bin 1, pixels (0, 0) and (0, 1) are bins 2 and 3, everything else is bin 0
    pub static ref BIN_MASK: Array2<i64> = {
        let mut mask = Array2::zeros((KIN_NUM_PIX, KIN_NUM_PIX));
        mask.column_mut(6).fill(1);
        mask[[0, 0]] = 2;
        mask[[0, 1]] = 3;
        mask
    };

    /// Imaging data with a single bright column
    pub static ref IMAGE_DATA: Array2<f64> = {
        let mut image = Array2::zeros((IMAGE_NUM_PIX, IMAGE_NUM_PIX));
        image.column_mut(6).fill(1.0);
        image
    };
}

pub fn bin_data() -> Array1<f64> {
    Array1::from_elem(KIN_NUM_BIN, 200.0)
}

pub fn bin_snr() -> Array1<f64> {
    Array1::from_elem(KIN_NUM_BIN, 2.0)
}

pub fn noise_map() -> Array2<f64> {
    Array2::ones((IMAGE_NUM_PIX, IMAGE_NUM_PIX))
}
