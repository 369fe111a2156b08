//! Convolution kernels and 2D convolution

use crate::error::KinematicsError;

use ndarray::{Array2, ArrayView2};

/// Gaussian kernels are truncated at this many standard deviations
pub const GAUSSIAN_TRUNCATION: f64 = 5.0;

/// $\mathrm{FWHM} = 2\sqrt{2\ln2}\,\sigma$
pub fn fwhm2sigma(fwhm: f64) -> f64 {
    fwhm / (2.0 * f64::sqrt(2.0 * std::f64::consts::LN_2))
}

/// Normalized Gaussian kernel of `num_pix` x `num_pix` pixels of size `delta_pix`
///
/// `num_pix` is rounded up to the next odd number so the kernel has a central pixel.
pub fn kernel_gaussian(num_pix: usize, delta_pix: f64, fwhm: f64) -> Array2<f64> {
    let num_pix = num_pix | 1;
    let sigma = fwhm2sigma(fwhm);
    let center = (num_pix / 2) as f64;
    let mut kernel = Array2::from_shape_fn((num_pix, num_pix), |(row, col)| {
        let x = (col as f64 - center) * delta_pix;
        let y = (row as f64 - center) * delta_pix;
        f64::exp(-(x * x + y * y) / (2.0 * sigma * sigma))
    });
    let sum = kernel.sum();
    kernel.mapv_inplace(|v| v / sum);
    kernel
}

/// Odd kernel size covering the Gaussian to [GAUSSIAN_TRUNCATION] sigma
pub fn gaussian_kernel_size(delta_pix: f64, fwhm: f64) -> usize {
    let half_width = (GAUSSIAN_TRUNCATION * fwhm2sigma(fwhm) / delta_pix).ceil() as usize;
    2 * half_width + 1
}

/// Returns a copy of `kernel` normalized to unit sum
///
/// The kernel must be square with odd size and have positive total weight.
pub fn normalize_kernel(kernel: ArrayView2<f64>) -> Result<Array2<f64>, KinematicsError> {
    let (rows, cols) = kernel.dim();
    if rows != cols || rows % 2 == 0 {
        return Err(KinematicsError::ShapeMismatch {
            context: "PSF kernel must be square with an odd size",
            expected: (rows | 1, rows | 1),
            actual: (rows, cols),
        });
    }
    let sum = kernel.sum();
    if !(sum > 0.0 && sum.is_finite()) {
        return Err(KinematicsError::NonPhysicalResult(
            "PSF kernel has no positive weight",
        ));
    }
    Ok(kernel.mapv(|v| v / sum))
}

/// 2D convolution with zero padding, the output has the shape of `image`
pub fn convolve_same(image: ArrayView2<f64>, kernel: ArrayView2<f64>) -> Array2<f64> {
    let (img_rows, img_cols) = image.dim();
    let (ker_rows, ker_cols) = kernel.dim();
    let pad_rows = (ker_rows / 2) as isize;
    let pad_cols = (ker_cols / 2) as isize;

    Array2::from_shape_fn((img_rows, img_cols), |(i, j)| {
        let mut sum = 0.0;
        for ki in 0..ker_rows {
            // flipped kernel: true convolution rather than correlation
            let row = i as isize + pad_rows - ki as isize;
            if row < 0 || row >= img_rows as isize {
                continue;
            }
            for kj in 0..ker_cols {
                let col = j as isize + pad_cols - kj as isize;
                if col < 0 || col >= img_cols as isize {
                    continue;
                }
                sum += image[[row as usize, col as usize]] * kernel[[ki, kj]];
            }
        }
        sum
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn gaussian_kernel_is_normalized_and_peaked() {
        let kernel = kernel_gaussian(9, 1.0, 2.0);
        assert_eq!(kernel.dim(), (9, 9));
        assert_relative_eq!(kernel.sum(), 1.0, max_relative = 1e-12);
        let peak = kernel[[4, 4]];
        assert!(kernel.iter().all(|&v| v <= peak));
        assert_relative_eq!(kernel[[4, 0]], kernel[[0, 4]], max_relative = 1e-12);
    }

    #[test]
    fn even_size_is_rounded_up() {
        assert_eq!(kernel_gaussian(4, 0.5, 1.0).dim(), (5, 5));
    }

    #[test]
    fn kernel_size_covers_truncation_radius() {
        // sigma = 2 / 2.3548 = 0.849, 5 sigma = 4.25 pixels
        assert_eq!(gaussian_kernel_size(1.0, 2.0), 11);
    }

    #[test]
    fn normalize_rejects_even_kernel() {
        let kernel = Array2::<f64>::ones((4, 4));
        assert!(matches!(
            normalize_kernel(kernel.view()),
            Err(KinematicsError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn normalize_rejects_empty_weight() {
        let kernel = Array2::<f64>::zeros((3, 3));
        assert!(normalize_kernel(kernel.view()).unwrap_err().is_non_physical());
    }

    #[test]
    fn delta_kernel_is_identity() {
        let image = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let kernel = array![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        assert_eq!(convolve_same(image.view(), kernel.view()), image);
    }

    #[test]
    fn shift_kernel_is_not_flipped_into_correlation() {
        let image = array![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        let kernel = array![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]];
        let expected = array![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]];
        assert_eq!(convolve_same(image.view(), kernel.view()), expected);
    }

    #[test]
    fn zero_padding_loses_edge_flux() {
        let image = Array2::<f64>::ones((3, 3));
        let kernel = Array2::<f64>::from_elem((3, 3), 1.0 / 9.0);
        let result = convolve_same(image.view(), kernel.view());
        assert_relative_eq!(result[[1, 1]], 1.0, max_relative = 1e-12);
        assert_relative_eq!(result[[0, 0]], 4.0 / 9.0, max_relative = 1e-12);
    }
}
