//! Direct-sum Newtonian gravity
//!
//! Every body feels every other body; there is no spatial approximation.
//!
//! With zero softening the force law is singular: two coincident bodies give
//! `0 / 0` and the resulting NaN flows into velocity and position. That is
//! left visible on purpose so the condition is detectable downstream. A
//! positive softening length replaces `r²` with `r² + ε²`.

use crate::physics::math::{Scalar, Vector};

/// Gravitational constant and softening used by the force law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityField {
    pub g: Scalar,
    pub softening: Scalar,
}

impl GravityField {
    pub fn new(g: Scalar) -> Self {
        Self { g, softening: 0.0 }
    }

    pub fn with_softening(mut self, softening: Scalar) -> Self {
        self.softening = softening;
        self
    }

    /// Acceleration on a body at `target` caused by `source_mass` at `source`
    ///
    /// `a = G·m / r³ · d` with `d = source − target`.
    #[inline]
    pub fn pairwise_acceleration(
        &self,
        target: Vector,
        source: Vector,
        source_mass: Scalar,
    ) -> Vector {
        let displacement = source - target;
        let distance_squared =
            displacement.length_squared() + self.softening * self.softening;
        let distance = libm::sqrt(distance_squared);
        let magnitude = self.g * source_mass / (distance_squared * distance);
        displacement * magnitude
    }

    /// Net acceleration on body `index` from all other bodies
    ///
    /// Sums in ascending index order, so the result only depends on the
    /// snapshot, never on which worker evaluates it or when.
    pub fn acceleration_on(&self, index: usize, positions: &[Vector], masses: &[Scalar]) -> Vector {
        let target = positions[index];
        positions
            .iter()
            .zip(masses)
            .enumerate()
            .filter(|&(j, _)| j != index)
            .fold(Vector::ZERO, |acceleration, (_, (&source, &mass))| {
                acceleration + self.pairwise_acceleration(target, source, mass)
            })
    }

    /// Net acceleration on every body from one position snapshot
    pub fn accelerations(&self, positions: &[Vector], masses: &[Scalar]) -> Vec<Vector> {
        (0..positions.len())
            .map(|index| self.acceleration_on(index, positions, masses))
            .collect()
    }

    /// Pair potential energy `−G·m₁·m₂ / r`
    #[inline]
    pub fn pair_potential(
        &self,
        a: Vector,
        mass_a: Scalar,
        b: Vector,
        mass_b: Scalar,
    ) -> Scalar {
        let distance = libm::sqrt((b - a).length_squared() + self.softening * self.softening);
        -self.g * mass_a * mass_b / distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_square_magnitude() {
        let field = GravityField::new(2.0);
        let acceleration = field.pairwise_acceleration(Vector::ZERO, Vector::new(2.0, 0.0, 0.0), 8.0);

        // G·m / r² = 2·8 / 4 = 4, pointing at the source
        assert!((acceleration - Vector::new(4.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_pairwise_forces_are_equal_and_opposite() {
        let field = GravityField::new(6.67430e-11);
        let (a, mass_a) = (Vector::new(1.0e3, -2.0e3, 5.0e2), 3.0e20);
        let (b, mass_b) = (Vector::new(-7.0e2, 4.0e3, 1.0e3), 8.0e24);

        let force_on_a = field.pairwise_acceleration(a, b, mass_b) * mass_a;
        let force_on_b = field.pairwise_acceleration(b, a, mass_a) * mass_b;

        let scale = force_on_a.length();
        assert!((force_on_a + force_on_b).length() <= scale * 1e-12);

        // Both lie on the line through the two bodies
        let axis = (b - a).normalize();
        assert!(force_on_a.normalize().dot(axis) > 1.0 - 1e-12);
        assert!(force_on_b.normalize().dot(axis) < -1.0 + 1e-12);
    }

    #[test]
    fn test_no_self_interaction() {
        let field = GravityField::new(1.0);
        let acceleration = field.acceleration_on(0, &[Vector::new(1.0, 2.0, 3.0)], &[5.0]);
        assert_eq!(acceleration, Vector::ZERO);
    }

    #[test]
    fn test_coincident_bodies_are_singular_without_softening() {
        let field = GravityField::new(1.0);
        let acceleration = field.pairwise_acceleration(Vector::X, Vector::X, 1.0);
        assert!(!acceleration.is_finite());
    }

    #[test]
    fn test_softening_removes_singularity() {
        let field = GravityField::new(1.0).with_softening(0.1);
        let acceleration = field.pairwise_acceleration(Vector::X, Vector::X, 1.0);
        assert_eq!(acceleration, Vector::ZERO);

        let far = field.pairwise_acceleration(Vector::ZERO, Vector::new(1.0e6, 0.0, 0.0), 1.0);
        let unsoftened = GravityField::new(1.0).pairwise_acceleration(
            Vector::ZERO,
            Vector::new(1.0e6, 0.0, 0.0),
            1.0,
        );
        assert!((far - unsoftened).length() / unsoftened.length() < 1e-12);
    }

    #[test]
    fn test_evaluation_order_does_not_change_accelerations() {
        let field = GravityField::new(1.0);
        let positions = [
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(1.0, 0.5, 0.0),
            Vector::new(-2.0, 1.0, 0.3),
            Vector::new(0.1, -3.0, 2.0),
        ];
        let masses = [5.0, 1.0, 2.0, 0.5];

        let forward = field.accelerations(&positions, &masses);
        let mut reversed = vec![Vector::ZERO; positions.len()];
        for index in (0..positions.len()).rev() {
            reversed[index] = field.acceleration_on(index, &positions, &masses);
        }

        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_pair_potential() {
        let field = GravityField::new(2.0);
        let potential = field.pair_potential(Vector::ZERO, 3.0, Vector::new(0.0, 4.0, 0.0), 5.0);
        assert!((potential - (-2.0 * 3.0 * 5.0 / 4.0)).abs() < 1e-12);
    }
}
