use crate::data::BinMask;
use crate::error::KinematicsError;
use crate::kernel::convolve_same;

use ndarray::{Array1, ArrayView2, Zip};

/// Value reported for bins without positive total weight
pub const EMPTY_BIN_VALUE: f64 = 0.0;

/// Light-weighted, PSF-convolved average of `map` over every bin of `bin_mask`
///
/// $$
/// v_b = \frac{\sum_{p \in b} [P * (v L)]_p}{\sum_{p \in b} [P * L]_p},
/// $$
/// where $L$ is `light_map`, $P$ the optional PSF `kernel` and the sums run over pixels assigned
/// to bin $b$. Unused pixels contribute to no bin, bins with non-positive total weight get
/// [EMPTY_BIN_VALUE]. Both maps must have the shape of the mask. A non-finite bin sum, e.g. from
/// a light profile evaluated outside its domain, is a [KinematicsError::NonPhysicalResult].
pub fn auto_binning(
    map: ArrayView2<f64>,
    light_map: ArrayView2<f64>,
    bin_mask: &BinMask,
    kernel: Option<ArrayView2<f64>>,
) -> Result<Array1<f64>, KinematicsError> {
    bin_mask.check_shape(map.dim(), "kinematic map must match the bin mask")?;
    bin_mask.check_shape(light_map.dim(), "light map must match the bin mask")?;

    let weighted = &map * &light_map;
    let (weighted, weight) = match kernel {
        Some(kernel) => (
            convolve_same(weighted.view(), kernel),
            convolve_same(light_map, kernel),
        ),
        None => (weighted, light_map.to_owned()),
    };

    let mut sums = vec![(0.0, 0.0); bin_mask.num_bins()];
    Zip::from(bin_mask.labels())
        .and(&weighted)
        .and(&weight)
        .for_each(|&label, &v, &w| {
            if let Some(bin) = label {
                sums[bin].0 += v;
                sums[bin].1 += w;
            }
        });
    sums
        .into_iter()
        .map(|(v, w)| {
            if !(v.is_finite() && w.is_finite()) {
                return Err(KinematicsError::NonPhysicalResult(
                    "light-weighted bin sum is not finite",
                ));
            }
            Ok(if w > 0.0 { v / w } else { EMPTY_BIN_VALUE })
        })
        .collect()
}
