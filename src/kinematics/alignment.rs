//! Placing generator maps onto the kinematic pixel grid

use crate::data::{ImageData, PixelGrid};
use crate::error::KinematicsError;
use crate::param_util::{ellipticity2phi_q, rotate};
use crate::params::ParamMap;

use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

/// Position angle of the lens major axis, radians counter-clockwise from +ra
pub const ELLIPSE_PA: &str = "ellipse_PA";
/// Axis ratio of the lens mass
pub const AXIS_RATIO: &str = "q";
pub const OFFSET_X: &str = "offset_x";
pub const OFFSET_Y: &str = "offset_y";
/// Pixel size of the imaging data
pub const DELTA_PIX: &str = "deltaPix";

/// Geometry of the imaging frame, optionally aligned to a lens model
///
/// `params` holds the image pixel size, and once aligned, the raw lens mass parameters together
/// with the derived [ELLIPSE_PA], [AXIS_RATIO], [OFFSET_X] and [OFFSET_Y].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageInput {
    image_grid: PixelGrid,
    base: ParamMap,
    params: ParamMap,
}

impl ImageInput {
    pub fn new(image_data: &ImageData) -> Self {
        let image_grid = image_data.pixel_grid().clone();
        let base = ParamMap::from([(DELTA_PIX, image_grid.pixel_width())]);
        Self {
            image_grid,
            params: base.clone(),
            base,
        }
    }

    /// New input aligned to the lens mass profile `kwargs_lens`
    ///
    /// Depends on `kwargs_lens` only, so aligning twice gives the same input.
    pub fn aligned(&self, kwargs_lens: &ParamMap) -> Result<Self, KinematicsError> {
        let e1 = kwargs_lens.require("e1", "lens model")?;
        let e2 = kwargs_lens.require("e2", "lens model")?;
        let center_x = kwargs_lens.require("center_x", "lens model")?;
        let center_y = kwargs_lens.require("center_y", "lens model")?;
        let (phi, q) = ellipticity2phi_q(e1, e2);

        let mut params = self.base.clone();
        params.extend_from(kwargs_lens);
        params.insert(ELLIPSE_PA, phi);
        params.insert(AXIS_RATIO, q);
        params.insert(OFFSET_X, center_x);
        params.insert(OFFSET_Y, center_y);
        Ok(Self {
            image_grid: self.image_grid.clone(),
            base: self.base.clone(),
            params,
        })
    }

    pub fn image_grid(&self) -> &PixelGrid {
        &self.image_grid
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains(key)
    }

    pub fn is_aligned(&self) -> bool {
        self.contains(ELLIPSE_PA)
    }
}

/// Interpolates galaxy-frame maps at the kinematic pixel positions
///
/// The kinematic pixel coordinates are computed once on construction.
#[derive(Clone, Debug)]
pub struct KinNnImageAlign {
    kin_grid: PixelGrid,
    kin_x: Array2<f64>,
    kin_y: Array2<f64>,
}

impl KinNnImageAlign {
    pub fn new(kin_grid: PixelGrid) -> Self {
        let (kin_x, kin_y) = kin_grid.pixel_coordinates();
        Self {
            kin_grid,
            kin_x,
            kin_y,
        }
    }

    pub fn kin_grid(&self) -> &PixelGrid {
        &self.kin_grid
    }

    /// Angular coordinates of the kinematic pixels
    pub fn kin_coordinates(&self) -> (&Array2<f64>, &Array2<f64>) {
        (&self.kin_x, &self.kin_y)
    }

    /// Samples `map` at every kinematic pixel
    ///
    /// `map` is centred on the lens with the major axis along its columns and pixel size
    /// `delta_pix`. Each kinematic pixel is shifted by the lens centre, rotated by
    /// [ELLIPSE_PA] and bilinearly interpolated; positions outside the map take the value of the
    /// nearest border pixel.
    pub fn interp_image(
        &self,
        map: ArrayView2<f64>,
        delta_pix: f64,
        image_input: &ImageInput,
    ) -> Result<Array2<f64>, KinematicsError> {
        let (rows, cols) = map.dim();
        if rows == 0 || cols == 0 {
            return Err(KinematicsError::ShapeMismatch {
                context: "kinematic map must not be empty",
                expected: (1, 1),
                actual: (rows, cols),
            });
        }
        if !(delta_pix > 0.0) {
            return Err(KinematicsError::NonPhysicalResult(
                "kinematic map pixel size must be positive",
            ));
        }
        let params = image_input.params();
        let phi = params.require(ELLIPSE_PA, "image input")?;
        let offset_x = params.require(OFFSET_X, "image input")?;
        let offset_y = params.require(OFFSET_Y, "image input")?;

        let row_centre = 0.5 * (rows as f64 - 1.0);
        let col_centre = 0.5 * (cols as f64 - 1.0);
        Ok(Zip::from(&self.kin_x)
            .and(&self.kin_y)
            .map_collect(|&x, &y| {
                let (x, y) = rotate(x - offset_x, y - offset_y, phi);
                bilinear(
                    map,
                    y / delta_pix + row_centre,
                    x / delta_pix + col_centre,
                )
            }))
    }
}

/// Bilinear interpolation at fractional pixel `(row, col)`, clamped to the array
fn bilinear(map: ArrayView2<f64>, row: f64, col: f64) -> f64 {
    let (rows, cols) = map.dim();
    let row = row.clamp(0.0, (rows - 1) as f64);
    let col = col.clamp(0.0, (cols - 1) as f64);
    let (r0, c0) = (row.floor() as usize, col.floor() as usize);
    let (r1, c1) = ((r0 + 1).min(rows - 1), (c0 + 1).min(cols - 1));
    let (dr, dc) = (row - r0 as f64, col - c0 as f64);
    (1.0 - dr) * ((1.0 - dc) * map[[r0, c0]] + dc * map[[r0, c1]])
        + dr * ((1.0 - dc) * map[[r1, c0]] + dc * map[[r1, c1]])
}

/// Kinematic pixel grid: the grid attached to the bins, otherwise the imaging frame
/// restricted to the bin mask shape
pub(crate) fn resolve_kin_grid(
    kin_grid: Option<&PixelGrid>,
    image_data: &ImageData,
    mask_shape: (usize, usize),
) -> PixelGrid {
    let (ny, nx) = mask_shape;
    kin_grid
        .cloned()
        .unwrap_or_else(|| image_data.pixel_grid().with_shape(nx, ny))
}
