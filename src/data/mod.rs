mod image_data;
pub use image_data::ImageData;

mod kin_bin;
pub use kin_bin::{BinMask, KinBin};

mod kin_data;
pub use kin_data::KinData;

mod pixel_grid;
pub use pixel_grid::PixelGrid;

mod psf;
pub use psf::Psf;
