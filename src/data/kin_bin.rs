use crate::data::PixelGrid;
use crate::error::KinematicsError;

use conv::ValueFrom;
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Pixel-to-bin assignment of a binned kinematic map
///
/// Every pixel either belongs to one of `num_bins` bins or is unused.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "BinMaskParameters", try_from = "BinMaskParameters")]
pub struct BinMask {
    labels: Array2<Option<usize>>,
    num_bins: usize,
}

impl BinMask {
    /// Builds the mask from integer labels, negative labels mark unused pixels
    pub fn from_labels(labels: ArrayView2<i64>, num_bins: usize) -> Result<Self, KinematicsError> {
        let mut out_of_range = None;
        let labels = labels.mapv(|label| {
            let bin = usize::value_from(label).ok()?;
            if bin >= num_bins {
                out_of_range.get_or_insert(label);
                return None;
            }
            Some(bin)
        });
        if let Some(label) = out_of_range {
            return Err(KinematicsError::BinLabelOutOfRange { label, num_bins });
        }
        Ok(Self { labels, num_bins })
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn shape(&self) -> (usize, usize) {
        self.labels.dim()
    }

    pub fn labels(&self) -> &Array2<Option<usize>> {
        &self.labels
    }

    /// Number of pixels assigned to each bin
    pub fn pixel_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_bins];
        for bin in self.labels.iter().flatten() {
            counts[*bin] += 1;
        }
        counts
    }

    /// Fails unless `dim` equals the mask shape
    pub fn check_shape(
        &self,
        dim: (usize, usize),
        context: &'static str,
    ) -> Result<(), KinematicsError> {
        if dim != self.shape() {
            return Err(KinematicsError::ShapeMismatch {
                context,
                expected: self.shape(),
                actual: dim,
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "BinMask")]
struct BinMaskParameters {
    labels: Array2<Option<usize>>,
    num_bins: usize,
}

impl From<BinMask> for BinMaskParameters {
    fn from(mask: BinMask) -> Self {
        Self {
            labels: mask.labels,
            num_bins: mask.num_bins,
        }
    }
}

impl TryFrom<BinMaskParameters> for BinMask {
    type Error = KinematicsError;

    fn try_from(p: BinMaskParameters) -> Result<Self, Self::Error> {
        if let Some(&bin) = p.labels.iter().flatten().find(|&&bin| bin >= p.num_bins) {
            return Err(KinematicsError::BinLabelOutOfRange {
                label: i64::value_from(bin).unwrap_or(i64::MAX),
                num_bins: p.num_bins,
            });
        }
        Ok(Self {
            labels: p.labels,
            num_bins: p.num_bins,
        })
    }
}

/// Binned kinematic measurements
///
/// Holds one velocity dispersion value and one signal-to-noise ratio per bin together with the
/// [BinMask] telling which pixels of the kinematic map were combined into which bin.
/// Optionally carries the astrometry of the kinematic pixels.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "KinBinParameters", try_from = "KinBinParameters")]
pub struct KinBin {
    bin_data: Array1<f64>,
    bin_snr: Array1<f64>,
    bin_mask: BinMask,
    grid: Option<PixelGrid>,
}

impl KinBin {
    pub fn new(
        bin_data: Array1<f64>,
        bin_snr: Array1<f64>,
        bin_mask: ArrayView2<i64>,
    ) -> Result<Self, KinematicsError> {
        if bin_data.len() != bin_snr.len() {
            return Err(KinematicsError::BinCountMismatch {
                data: bin_data.len(),
                snr: bin_snr.len(),
            });
        }
        let bin_mask = BinMask::from_labels(bin_mask, bin_data.len())?;
        Ok(Self {
            bin_data,
            bin_snr,
            bin_mask,
            grid: None,
        })
    }

    /// Attaches astrometry to the kinematic pixels, the grid takes the mask shape
    pub fn with_pixel_grid(
        mut self,
        transform_pix2angle: crate::types::Matrix2,
        ra_at_xy_0: f64,
        dec_at_xy_0: f64,
    ) -> Self {
        let (ny, nx) = self.bin_mask.shape();
        self.grid = Some(PixelGrid::new(
            nx,
            ny,
            transform_pix2angle,
            ra_at_xy_0,
            dec_at_xy_0,
        ));
        self
    }

    pub fn bin_data(&self) -> &Array1<f64> {
        &self.bin_data
    }

    pub fn bin_snr(&self) -> &Array1<f64> {
        &self.bin_snr
    }

    pub fn bin_mask(&self) -> &BinMask {
        &self.bin_mask
    }

    pub fn num_bins(&self) -> usize {
        self.bin_data.len()
    }

    pub fn pixel_grid(&self) -> Option<&PixelGrid> {
        self.grid.as_ref()
    }

    /// One-sigma uncertainty of each bin, `bin_data / bin_SNR`
    pub fn noise(&self) -> Array1<f64> {
        &self.bin_data / &self.bin_snr
    }

    /// Bin values painted back onto the pixels, unused pixels are zero
    pub fn binned_image(&self) -> Array2<f64> {
        self.bin_mask
            .labels()
            .mapv(|label| label.map_or(0.0, |bin| self.bin_data[bin]))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "KinBin")]
struct KinBinParameters {
    bin_data: Array1<f64>,
    bin_snr: Array1<f64>,
    bin_mask: BinMask,
    grid: Option<PixelGrid>,
}

impl From<KinBin> for KinBinParameters {
    fn from(kin_bin: KinBin) -> Self {
        Self {
            bin_data: kin_bin.bin_data,
            bin_snr: kin_bin.bin_snr,
            bin_mask: kin_bin.bin_mask,
            grid: kin_bin.grid,
        }
    }
}

impl TryFrom<KinBinParameters> for KinBin {
    type Error = KinematicsError;

    fn try_from(p: KinBinParameters) -> Result<Self, Self::Error> {
        if p.bin_data.len() != p.bin_snr.len() {
            return Err(KinematicsError::BinCountMismatch {
                data: p.bin_data.len(),
                snr: p.bin_snr.len(),
            });
        }
        if p.bin_mask.num_bins() != p.bin_data.len() {
            return Err(KinematicsError::ShapeMismatch {
                context: "bin mask must declare one bin per bin_data value",
                expected: (p.bin_data.len(), 1),
                actual: (p.bin_mask.num_bins(), 1),
            });
        }
        if let Some(grid) = &p.grid {
            p.bin_mask
                .check_shape(grid.shape(), "pixel grid must match the bin mask")?;
        }
        Ok(Self {
            bin_data: p.bin_data,
            bin_snr: p.bin_snr,
            bin_mask: p.bin_mask,
            grid: p.grid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::{Array, array};

    fn labels() -> Array2<i64> {
        array![[2, 3, -1], [0, 1, 1], [0, 0, -1]]
    }

    #[test]
    fn negative_labels_are_unused() {
        let mask = BinMask::from_labels(labels().view(), 4).unwrap();
        assert_eq!(mask.labels()[[0, 2]], None);
        assert_eq!(mask.labels()[[0, 0]], Some(2));
        assert_eq!(mask.pixel_counts(), vec![3, 2, 1, 1]);
    }

    #[test]
    fn label_out_of_range() {
        let err = BinMask::from_labels(labels().view(), 3).unwrap_err();
        assert_eq!(
            err,
            KinematicsError::BinLabelOutOfRange {
                label: 3,
                num_bins: 3
            }
        );
    }

    #[test]
    fn bin_count_mismatch() {
        let err = KinBin::new(
            Array::from_elem(4, 200.0),
            Array::from_elem(3, 2.0),
            labels().view(),
        )
        .unwrap_err();
        assert_eq!(err, KinematicsError::BinCountMismatch { data: 4, snr: 3 });
    }

    #[test]
    fn binned_image_and_noise() {
        let kin_bin = KinBin::new(
            array![10.0, 20.0, 30.0, 40.0],
            array![2.0, 4.0, 5.0, 8.0],
            labels().view(),
        )
        .unwrap();
        assert_eq!(
            kin_bin.binned_image(),
            array![[30.0, 40.0, 0.0], [10.0, 20.0, 20.0], [10.0, 10.0, 0.0]]
        );
        assert_eq!(kin_bin.noise(), array![5.0, 5.0, 6.0, 5.0]);
        assert!(kin_bin.pixel_grid().is_none());
    }

    #[test]
    fn attached_grid_takes_mask_shape() {
        let kin_bin = KinBin::new(
            Array::from_elem(4, 1.0),
            Array::from_elem(4, 1.0),
            labels().view(),
        )
        .unwrap()
        .with_pixel_grid(crate::types::IDENTITY, -1.0, -1.0);
        let grid = kin_bin.pixel_grid().unwrap();
        assert_eq!(grid.shape(), (3, 3));
        assert_eq!(grid.origin(), (-1.0, -1.0));
    }

    #[test]
    fn deserialized_mask_is_validated() {
        let mask: BinMask = serde_json::from_str(
            r#"{"labels":{"v":1,"dim":[1,3],"data":[1,null,0]},"num_bins":2}"#,
        )
        .unwrap();
        assert_eq!(mask.pixel_counts(), vec![1, 1]);

        let err = serde_json::from_str::<BinMask>(
            r#"{"labels":{"v":1,"dim":[1,2],"data":[5,null]},"num_bins":2}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bin label 5 is out of range"));
    }

    #[test]
    fn serde_keeps_kin_bin() {
        let kin_bin = KinBin::new(
            array![10.0, 20.0, 30.0, 40.0],
            array![2.0, 4.0, 5.0, 8.0],
            labels().view(),
        )
        .unwrap()
        .with_pixel_grid(crate::types::IDENTITY, -1.0, -1.0);
        let json = serde_json::to_string(&kin_bin).unwrap();
        let restored: KinBin = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.bin_data(), kin_bin.bin_data());
        assert_eq!(restored.bin_mask(), kin_bin.bin_mask());
        assert_eq!(restored.pixel_grid(), kin_bin.pixel_grid());
    }

    #[test]
    fn deserialized_kin_bin_is_validated() {
        let mask = r#"{"labels":{"v":1,"dim":[1,2],"data":[0,1]},"num_bins":2}"#;

        let snr_mismatch = format!(
            r#"{{
                "bin_data": {{"v": 1, "dim": [2], "data": [1.0, 2.0]}},
                "bin_snr": {{"v": 1, "dim": [1], "data": [1.0]}},
                "bin_mask": {mask},
                "grid": null
            }}"#
        );
        let err = serde_json::from_str::<KinBin>(&snr_mismatch).unwrap_err();
        assert!(err.to_string().contains("bin_data has 2 values while bin_SNR has 1"));

        let bin_mismatch = format!(
            r#"{{
                "bin_data": {{"v": 1, "dim": [3], "data": [1.0, 2.0, 3.0]}},
                "bin_snr": {{"v": 1, "dim": [3], "data": [1.0, 1.0, 1.0]}},
                "bin_mask": {mask},
                "grid": null
            }}"#
        );
        let err = serde_json::from_str::<KinBin>(&bin_mismatch).unwrap_err();
        assert!(err.to_string().contains("one bin per bin_data value"));
    }
}
