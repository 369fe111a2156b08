use crate::error::KinematicsError;

use ndarray::{Array2, ArrayView2};

/// Row-major 2x2 matrix, used for pixel-to-angle transforms
pub type Matrix2 = [[f64; 2]; 2];

/// Pair of `(x, y)` coordinate arrays sharing one shape
pub type CoordGrid = (Array2<f64>, Array2<f64>);

pub const IDENTITY: Matrix2 = [[1.0, 0.0], [0.0, 1.0]];

/// Fails unless the `x` and `y` coordinate arrays have one shape
pub(crate) fn check_coordinates(
    x: &ArrayView2<f64>,
    y: &ArrayView2<f64>,
) -> Result<(), KinematicsError> {
    if x.dim() != y.dim() {
        return Err(KinematicsError::ShapeMismatch {
            context: "y coordinates must match x coordinates",
            expected: x.dim(),
            actual: y.dim(),
        });
    }
    Ok(())
}
