use glam::DVec3;

use crate::error::{check_size, RigidError};

/// An element of the Lie algebra se(3), in body-fixed coordinates.
///
/// The flat layout used by [`Deriv::to_array`] and the adjoint matrix of
/// [`Rigid3`](crate::Rigid3) puts the linear part first: `[lx, ly, lz, ax, ay, az]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deriv {
    /// Translational velocity.
    pub linear: DVec3,
    /// Rotational velocity.
    pub angular: DVec3,
}

impl Deriv {
    /// Dimension of the tangent space.
    pub const DIM: usize = 6;

    /// The zero twist.
    pub const ZERO: Self = Self {
        linear: DVec3::ZERO,
        angular: DVec3::ZERO,
    };

    /// Create a twist from its linear and angular parts.
    #[inline]
    pub const fn new(linear: DVec3, angular: DVec3) -> Self {
        Self { linear, angular }
    }

    /// Create a twist from `[lx, ly, lz, ax, ay, az]`.
    #[inline]
    pub const fn from_array(arr: [f64; 6]) -> Self {
        Self {
            linear: DVec3::new(arr[0], arr[1], arr[2]),
            angular: DVec3::new(arr[3], arr[4], arr[5]),
        }
    }

    /// The components as `[lx, ly, lz, ax, ay, az]`.
    #[inline]
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.linear.x,
            self.linear.y,
            self.linear.z,
            self.angular.x,
            self.angular.y,
            self.angular.z,
        ]
    }
}

impl TryFrom<&[f64]> for Deriv {
    type Error = RigidError;

    /// Reads `[lx, ly, lz, ax, ay, az]`.
    fn try_from(data: &[f64]) -> Result<Self, Self::Error> {
        check_size(data, Self::DIM)?;
        Ok(Self::new(
            DVec3::from_slice(&data[..3]),
            DVec3::from_slice(&data[3..]),
        ))
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for Deriv {
    type Epsilon = f64;

    #[inline]
    fn default_epsilon() -> Self::Epsilon {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| approx::AbsDiffEq::abs_diff_eq(a, b, epsilon))
    }
}

#[cfg(feature = "approx")]
impl approx::RelativeEq for Deriv {
    #[inline]
    fn default_max_relative() -> Self::Epsilon {
        <f64 as approx::RelativeEq>::default_max_relative()
    }

    #[inline]
    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| approx::RelativeEq::relative_eq(a, b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(Deriv::default(), Deriv::ZERO);
        assert_eq!(Deriv::ZERO.to_array(), [0.0; 6]);
    }

    #[test]
    fn test_layout() {
        let d = Deriv::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(d.linear, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(d.angular, DVec3::new(4.0, 5.0, 6.0));
        assert_eq!(d.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_accessors() {
        let mut d = Deriv::ZERO;
        d.angular = DVec3::new(0.0, 0.0, 1.0);
        d.linear.x = -2.0;
        assert_eq!(d.to_array(), [-2.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_try_from_slice() {
        let data = vec![0.5, -1.0, 2.0, 0.1, 0.2, 0.3];
        let d = Deriv::try_from(data.as_slice()).unwrap();
        assert_eq!(d.to_array().as_slice(), data.as_slice());

        let err = Deriv::try_from(&data[..5]).unwrap_err();
        assert_eq!(
            err,
            RigidError::WrongSize {
                expected: 6,
                got: 5
            }
        );
        assert_eq!(
            err.to_string(),
            "slice has wrong size: expected 6, got 5"
        );
    }
}
