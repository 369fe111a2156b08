use crate::error::KinematicsError;
use crate::kernel::{gaussian_kernel_size, kernel_gaussian, normalize_kernel};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Point spread function of the kinematic observation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "psf_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum Psf {
    /// No instrumental blurring
    None,
    /// Circular Gaussian with full width at half maximum in angular units
    Gaussian { fwhm: f64 },
    /// Pixelated kernel sampled at the kinematic pixel scale
    Pixel { kernel_point_source: Array2<f64> },
}

impl Psf {
    pub fn gaussian(fwhm: f64) -> Self {
        Self::Gaussian { fwhm }
    }

    pub fn pixel(kernel_point_source: Array2<f64>) -> Self {
        Self::Pixel {
            kernel_point_source,
        }
    }

    /// Normalized convolution kernel for pixels of angular size `delta_pix`,
    /// `None` when no convolution is needed
    pub fn kernel_point_source(
        &self,
        delta_pix: f64,
    ) -> Result<Option<Array2<f64>>, KinematicsError> {
        match self {
            Self::None => Ok(None),
            Self::Gaussian { fwhm } => {
                if !(*fwhm > 0.0 && delta_pix > 0.0) {
                    return Err(KinematicsError::NonPhysicalResult(
                        "Gaussian PSF needs positive FWHM and pixel size",
                    ));
                }
                let num_pix = gaussian_kernel_size(delta_pix, *fwhm);
                Ok(Some(kernel_gaussian(num_pix, delta_pix, *fwhm)))
            }
            Self::Pixel {
                kernel_point_source,
            } => normalize_kernel(kernel_point_source.view()).map(Some),
        }
    }
}
