//! # Rigid transforms and SE(3)
//!
//! [`Rigid3`] pairs a translation `center` with a rotation `orient` and acts on points by
//! `x ↦ center + orient(x)`.
//!
//! Tangent vectors are [`Deriv`] twists in body-fixed coordinates, ordered linear first:
//!
//! ```text
//! exp(v, ω) = (R dexp(ω) v, R)        R = Quaternion::exp(ω)
//! log(t, R) = (dlog(R) Rᵀ t, log(R))
//! ```
//!
//! The same ordering is used by the adjoint matrix:
//!
//! ```text
//! Ad(t, R) = [ R   [t]×R ]
//!            [ 0     R   ]
//! ```

use glam::{DMat3, DMat4, DVec3};
use rand::Rng;

use crate::deriv::Deriv;
use crate::error::{check_size, RigidError};
use crate::quaternion::Quaternion;

/// Row-major 6x6 matrix acting on twists laid out as `[linear, angular]`.
pub type Mat6 = [[f64; 6]; 6];

/// A rigid body transform: rotation followed by translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rigid3 {
    /// Translation.
    pub center: DVec3,
    /// Rotation, unit norm.
    pub orient: Quaternion,
}

impl Rigid3 {
    /// Dimension of the tangent space.
    pub const DIM: usize = 6;

    /// The identity transform.
    pub const IDENTITY: Self = Self {
        center: DVec3::ZERO,
        orient: Quaternion::IDENTITY,
    };

    /// Create a transform from a translation and a rotation.
    #[inline]
    pub const fn new(center: DVec3, orient: Quaternion) -> Self {
        Self { center, orient }
    }

    /// A pure translation.
    #[inline]
    pub const fn from_translation(center: DVec3) -> Self {
        Self::new(center, Quaternion::IDENTITY)
    }

    /// A pure rotation.
    #[inline]
    pub const fn from_rotation(orient: Quaternion) -> Self {
        Self::new(DVec3::ZERO, orient)
    }

    /// Create a transform from `[cx, cy, cz, qx, qy, qz, qw]`.
    #[inline]
    pub const fn from_array(arr: [f64; 7]) -> Self {
        Self {
            center: DVec3::new(arr[0], arr[1], arr[2]),
            orient: Quaternion::from_xyzw(arr[3], arr[4], arr[5], arr[6]),
        }
    }

    /// The components as `[cx, cy, cz, qx, qy, qz, qw]`.
    pub fn to_array(&self) -> [f64; 7] {
        let [qx, qy, qz, qw] = self.orient.to_array();
        [
            self.center.x,
            self.center.y,
            self.center.z,
            qx,
            qy,
            qz,
            qw,
        ]
    }

    /// Sample a transform with a uniform rotation and a translation in `[-1, 1)³`.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let center = DVec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        Self::new(center, Quaternion::from_rng(rng))
    }

    /// Same as [`from_rng`](Self::from_rng) with the thread-local generator.
    pub fn from_random() -> Self {
        Self::from_rng(&mut rand::rng())
    }

    /// Inverse transform, `(-R⁻¹ t, R⁻¹)`.
    pub fn inv(&self) -> Self {
        let orient = self.orient.inv();
        Self {
            center: -orient.transform(self.center),
            orient,
        }
    }

    /// Composition `self * other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            center: self.center + self.orient.transform(other.center),
            orient: self.orient.compose(&other.orient),
        }
    }

    /// Apply the transform to the point `x`.
    #[inline]
    pub fn transform(&self, x: DVec3) -> DVec3 {
        self.center + self.orient.transform(x)
    }

    /// The 4x4 homogeneous matrix.
    pub fn matrix(&self) -> DMat4 {
        let r = self.orient.matrix();
        DMat4::from_cols(
            r.x_axis.extend(0.0),
            r.y_axis.extend(0.0),
            r.z_axis.extend(0.0),
            self.center.extend(1.0),
        )
    }

    /// The 6x6 adjoint matrix, for twists ordered `[linear, angular]`.
    pub fn adjoint(&self) -> Mat6 {
        let r = self.orient.matrix();
        let t_cross_r = Quaternion::hat(self.center) * r;

        let mut res = [[0.0; 6]; 6];
        set_block(&mut res, 0, 0, &r);
        set_block(&mut res, 3, 3, &r);
        set_block(&mut res, 0, 3, &t_cross_r);
        res
    }

    /// Apply the adjoint to a twist without forming the matrix.
    pub fn adjoint_map(&self, twist: &Deriv) -> Deriv {
        let angular = self.orient.transform(twist.angular);
        Deriv {
            linear: self.orient.transform(twist.linear) + self.center.cross(angular),
            angular,
        }
    }

    /// Lie algebra -> Lie group
    pub fn exp(twist: &Deriv) -> Self {
        let orient = Quaternion::exp(twist.angular);
        let center = orient.transform(Quaternion::dexp(twist.angular) * twist.linear);
        Self { center, orient }
    }

    /// Lie group -> Lie algebra
    pub fn log(&self) -> Deriv {
        let angular = self.orient.log();
        let linear = self.orient.dlog() * self.orient.conj().transform(self.center);
        Deriv { linear, angular }
    }
}

/// Copy `block` into `m` with its top-left corner at (`row`, `col`).
fn set_block(m: &mut Mat6, row: usize, col: usize, block: &DMat3) {
    for j in 0..3 {
        let c = block.col(j);
        for i in 0..3 {
            m[row + i][col + j] = c[i];
        }
    }
}

impl Default for Rigid3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<Rigid3> for Rigid3 {
    type Output = Rigid3;

    #[inline]
    fn mul(self, rhs: Rigid3) -> Self::Output {
        self.compose(&rhs)
    }
}

impl std::ops::MulAssign<Rigid3> for Rigid3 {
    #[inline]
    fn mul_assign(&mut self, rhs: Rigid3) {
        *self = self.compose(&rhs);
    }
}

impl std::ops::Mul<DVec3> for Rigid3 {
    type Output = DVec3;

    #[inline]
    fn mul(self, rhs: DVec3) -> Self::Output {
        self.transform(rhs)
    }
}

impl TryFrom<&[f64]> for Rigid3 {
    type Error = RigidError;

    /// Reads `[cx, cy, cz, qx, qy, qz, qw]`.
    fn try_from(data: &[f64]) -> Result<Self, Self::Error> {
        check_size(data, 7)?;
        Ok(Self::new(
            DVec3::from_slice(&data[..3]),
            Quaternion::try_from(&data[3..])?,
        ))
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for Rigid3 {
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
impl approx::RelativeEq for Rigid3 {
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
