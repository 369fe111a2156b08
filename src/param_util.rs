//! Conversions between ellipticity parametrisations

/// Largest ellipticity modulus accepted before clipping, keeps the axis ratio positive
const MAX_ELLIPTICITY: f64 = 0.9999;

/// Position angle (radians) and axis ratio from the ellipticity components
///
/// $\phi = \frac12 \arctan2(e_2, e_1)$, $q = \frac{1 - |e|}{1 + |e|}$.
pub fn ellipticity2phi_q(e1: f64, e2: f64) -> (f64, f64) {
    let phi = f64::atan2(e2, e1) / 2.0;
    let c = f64::hypot(e1, e2).min(MAX_ELLIPTICITY);
    let q = (1.0 - c) / (1.0 + c);
    (phi, q)
}

/// Ellipticity components from position angle (radians) and axis ratio
pub fn phi_q2ellipticity(phi: f64, q: f64) -> (f64, f64) {
    let c = (1.0 - q) / (1.0 + q);
    (c * f64::cos(2.0 * phi), c * f64::sin(2.0 * phi))
}

/// Shifts and rotates `(x, y)` into the frame of an ellipse centred at
/// `(center_x, center_y)` with major axis along the new x axis, then
/// stretches it so that elliptical radius is `hypot(x', y')`
pub fn transform_e1e2(
    x: f64,
    y: f64,
    e1: f64,
    e2: f64,
    center_x: f64,
    center_y: f64,
) -> (f64, f64) {
    let (phi, q) = ellipticity2phi_q(e1, e2);
    let (x_rot, y_rot) = rotate(x - center_x, y - center_y, phi);
    (x_rot * q.sqrt(), y_rot / q.sqrt())
}

/// Coordinates of `(x, y)` in a frame rotated by `phi` counter-clockwise
#[inline]
pub fn rotate(x: f64, y: f64, phi: f64) -> (f64, f64) {
    let (sin, cos) = phi.sin_cos();
    (cos * x + sin * y, -sin * x + cos * y)
}
