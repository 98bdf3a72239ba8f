use crate::resources::SharedRng;
use rand::Rng;

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 3D vector type for positions, velocities, and accelerations
pub type Vector = bevy::math::DVec3;

pub const TAU: Scalar = core::f64::consts::TAU;

/// Seconds in a 365-day year, the unit the default time step is expressed in
pub const SECONDS_PER_YEAR: Scalar = 3600.0 * 24.0 * 365.0;

/// Uniformly distributed direction on the unit sphere
pub fn random_unit_vector(rng: &mut SharedRng) -> Vector {
    let theta = rng.random_range(0.0..=TAU);
    let phi = libm::acos(rng.random_range(-1.0..=1.0));

    Vector::new(
        libm::sin(phi) * libm::cos(theta),
        libm::sin(phi) * libm::sin(theta),
        libm::cos(phi),
    )
}

/// Point on a circle of `radius` in the z = 0 plane
#[inline]
pub fn point_on_circle(angle: Scalar, radius: Scalar) -> Vector {
    Vector::new(libm::cos(angle) * radius, libm::sin(angle) * radius, 0.0)
}

/// Unit tangent of a counter-clockwise circle in the z = 0 plane
#[inline]
pub fn circle_tangent(angle: Scalar) -> Vector {
    Vector::new(-libm::sin(angle), libm::cos(angle), 0.0)
}

/// Speed of a circular orbit of `radius` around a point mass `central_mass`
#[inline]
pub fn circular_orbit_speed(g: Scalar, central_mass: Scalar, radius: Scalar) -> Scalar {
    libm::sqrt(g * central_mass / radius)
}
