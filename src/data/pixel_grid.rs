use crate::types::{CoordGrid, IDENTITY, Matrix2};

use ndarray::Array2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Regular pixel grid with a linear pixel-to-angle mapping
///
/// Pixel `(row, col)` has angular coordinates
/// $$
/// \begin{pmatrix} \mathrm{ra} \\ \mathrm{dec} \end{pmatrix} =
/// \begin{pmatrix} \mathrm{ra}_0 \\ \mathrm{dec}_0 \end{pmatrix} +
/// T \begin{pmatrix} \mathrm{col} \\ \mathrm{row} \end{pmatrix},
/// $$
/// where $T$ is `transform_pix2angle` and $(\mathrm{ra}_0, \mathrm{dec}_0)$ are the coordinates of
/// pixel `(0, 0)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PixelGrid {
    nx: usize,
    ny: usize,
    transform_pix2angle: Matrix2,
    ra_at_xy_0: f64,
    dec_at_xy_0: f64,
}

impl PixelGrid {
    pub fn new(
        nx: usize,
        ny: usize,
        transform_pix2angle: Matrix2,
        ra_at_xy_0: f64,
        dec_at_xy_0: f64,
    ) -> Self {
        Self {
            nx,
            ny,
            transform_pix2angle,
            ra_at_xy_0,
            dec_at_xy_0,
        }
    }

    /// Unit pixels, axes aligned with ra and dec, pixel `(0, 0)` at the origin
    pub fn unit(nx: usize, ny: usize) -> Self {
        Self::new(nx, ny, IDENTITY, 0.0, 0.0)
    }

    /// Same frame with a different number of pixels
    pub fn with_shape(&self, nx: usize, ny: usize) -> Self {
        Self { nx, ny, ..*self }
    }

    /// `(rows, columns)` of arrays living on this grid
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    pub fn transform_pix2angle(&self) -> &Matrix2 {
        &self.transform_pix2angle
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.ra_at_xy_0, self.dec_at_xy_0)
    }

    /// Angular size of a pixel side, $\sqrt{|\det T|}$
    pub fn pixel_width(&self) -> f64 {
        let [[a, b], [c, d]] = self.transform_pix2angle;
        f64::sqrt((a * d - b * c).abs())
    }

    /// Angular coordinates of pixel `(row, col)`
    #[inline]
    pub fn pix2angle(&self, row: f64, col: f64) -> (f64, f64) {
        let [[a, b], [c, d]] = self.transform_pix2angle;
        (
            self.ra_at_xy_0 + a * col + b * row,
            self.dec_at_xy_0 + c * col + d * row,
        )
    }

    /// Angular coordinates of every pixel, arrays have [PixelGrid::shape]
    pub fn pixel_coordinates(&self) -> CoordGrid {
        let ra = Array2::from_shape_fn(self.shape(), |(row, col)| {
            self.pix2angle(row as f64, col as f64).0
        });
        let dec = Array2::from_shape_fn(self.shape(), |(row, col)| {
            self.pix2angle(row as f64, col as f64).1
        });
        (ra, dec)
    }
}
