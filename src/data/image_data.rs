use crate::data::PixelGrid;
use crate::error::KinematicsError;
use crate::types::Matrix2;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Imaging data of the lens system and the astrometry of its pixels
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "ImageDataParameters", try_from = "ImageDataParameters")]
pub struct ImageData {
    image_data: Array2<f64>,
    noise_map: Array2<f64>,
    grid: PixelGrid,
}

impl ImageData {
    pub fn new(
        image_data: Array2<f64>,
        noise_map: Array2<f64>,
        transform_pix2angle: Matrix2,
        ra_at_xy_0: f64,
        dec_at_xy_0: f64,
    ) -> Result<Self, KinematicsError> {
        if noise_map.dim() != image_data.dim() {
            return Err(KinematicsError::ShapeMismatch {
                context: "noise map must match image data",
                expected: image_data.dim(),
                actual: noise_map.dim(),
            });
        }
        let (ny, nx) = image_data.dim();
        let grid = PixelGrid::new(nx, ny, transform_pix2angle, ra_at_xy_0, dec_at_xy_0);
        Ok(Self {
            image_data,
            noise_map,
            grid,
        })
    }

    pub fn image(&self) -> &Array2<f64> {
        &self.image_data
    }

    pub fn noise_map(&self) -> &Array2<f64> {
        &self.noise_map
    }

    pub fn pixel_grid(&self) -> &PixelGrid {
        &self.grid
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename = "ImageData")]
struct ImageDataParameters {
    image_data: Array2<f64>,
    noise_map: Array2<f64>,
    transform_pix2angle: Matrix2,
    ra_at_xy_0: f64,
    dec_at_xy_0: f64,
}

impl From<ImageData> for ImageDataParameters {
    fn from(data: ImageData) -> Self {
        let (ra_at_xy_0, dec_at_xy_0) = data.grid.origin();
        Self {
            transform_pix2angle: *data.grid.transform_pix2angle(),
            ra_at_xy_0,
            dec_at_xy_0,
            image_data: data.image_data,
            noise_map: data.noise_map,
        }
    }
}

impl TryFrom<ImageDataParameters> for ImageData {
    type Error = KinematicsError;

    fn try_from(p: ImageDataParameters) -> Result<Self, Self::Error> {
        Self::new(
            p.image_data,
            p.noise_map,
            p.transform_pix2angle,
            p.ra_at_xy_0,
            p.dec_at_xy_0,
        )
    }
}
