//! # Unit quaternions and SO(3)
//!
//! [`Quaternion`] stores a rotation as a unit quaternion with an imaginary part
//! `(x, y, z)` and a real part `w`. Unit quaternions double cover SO(3): `q` and `-q`
//! describe the same rotation, and [`Quaternion::flip`] picks the representative with a
//! non-negative real part before any angle is extracted.
//!
//! ## Tangent space
//!
//! The Lie algebra so(3) is identified with R³. A vector `x` encodes a rotation of angle
//! `‖x‖` about `x / ‖x‖`:
//!
//! - [`Quaternion::exp`] maps `x` to `(sin(‖x‖/2) · x/‖x‖, cos(‖x‖/2))`.
//! - [`Quaternion::log`] goes back, returning the short arc (angle in `[0, π]`).
//!
//! ## Jacobians
//!
//! [`Quaternion::dexp`] and [`Quaternion::dlog`] are the right Jacobians of the
//! exponential and the logarithm, expressed in body-fixed coordinates:
//!
//! ```text
//! exp(x)⁻¹ · exp(x + δ) ≈ exp(dexp(x) · δ)
//! dlog(q) = dexp(log(q))⁻¹
//! ```
//!
//! Every map has an explicit branch below [`Quaternion::EPSILON`] so no operation
//! divides by a quantity that can become arbitrarily small.

use glam::{DMat3, DQuat, DVec3};
use rand::Rng;

use crate::error::{check_size, RigidError};

/// A rotation in 3D, stored as a unit quaternion.
///
/// The norm is one for every value produced by a constructor or a group operation. Raw
/// construction through [`Quaternion::new`] or [`Quaternion::from_xyzw`] may break that,
/// in which case [`Quaternion::normalize`] restores it. The rotation related methods
/// ([`transform`](Quaternion::transform), [`matrix`](Quaternion::matrix),
/// [`log`](Quaternion::log)) assume a unit quaternion and give wrong results otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    /// Imaginary part `(x, y, z)`.
    pub imag: DVec3,
    /// Real part `w`.
    pub real: f64,
}

impl Quaternion {
    /// Dimension of the tangent space.
    pub const DIM: usize = 3;

    /// Threshold below which angles and norms are treated as zero.
    pub const EPSILON: f64 = f64::EPSILON;

    /// The identity rotation `(0, 0, 0, 1)`.
    pub const IDENTITY: Self = Self {
        imag: DVec3::ZERO,
        real: 1.0,
    };

    /// Create a quaternion from its imaginary and real parts.
    /// NOTE: the result is not normalized.
    #[inline]
    pub const fn new(imag: DVec3, real: f64) -> Self {
        Self { imag, real }
    }

    /// Create a quaternion from its `x, y, z, w` components.
    /// NOTE: the result is not normalized.
    #[inline]
    pub const fn from_xyzw(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self {
            imag: DVec3::new(x, y, z),
            real: w,
        }
    }

    /// Create a quaternion from `[x, y, z, w]`.
    #[inline]
    pub const fn from_array(arr: [f64; 4]) -> Self {
        Self::from_xyzw(arr[0], arr[1], arr[2], arr[3])
    }

    /// The components as `[x, y, z, w]`.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.imag.x, self.imag.y, self.imag.z, self.real]
    }

    /// Sample a uniformly distributed rotation from `rng`.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let r1: f64 = rng.random();
        let r2: f64 = rng.random();
        let r3: f64 = rng.random();

        // Shoemake's method
        let one_minus_r1_sqrt = (1.0 - r1).sqrt();
        let r1_sqrt = r1.sqrt();
        let two_pi = 2.0 * std::f64::consts::PI;

        Self::from_xyzw(
            one_minus_r1_sqrt * (two_pi * r2).sin(),
            r1_sqrt * (two_pi * r3).cos(),
            r1_sqrt * (two_pi * r3).sin(),
            one_minus_r1_sqrt * (two_pi * r2).cos(),
        )
        .normalized()
    }

    /// Sample a uniformly distributed rotation from the thread-local generator.
    pub fn from_random() -> Self {
        Self::from_rng(&mut rand::rng())
    }

    /// Squared Euclidean norm of the four components.
    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.imag.length_squared() + self.real * self.real
    }

    /// Euclidean norm of the four components.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Dot product of the four components.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.imag.dot(other.imag) + self.real * other.real
    }

    /// Conjugate: the imaginary part is negated.
    #[inline]
    pub fn conj(&self) -> Self {
        Self::new(-self.imag, self.real)
    }

    /// Multiplicative inverse, `conj(q) / ‖q‖²`.
    ///
    /// Equal to [`conj`](Self::conj) for unit quaternions, but stays exact when the norm
    /// drifted away from one.
    #[inline]
    pub fn inv(&self) -> Self {
        let n2 = self.norm_squared();
        Self::new(-self.imag / n2, self.real / n2)
    }

    /// Scale the quaternion to unit norm, in place.
    ///
    /// A zero quaternion has no direction: all components become NaN.
    pub fn normalize(&mut self) {
        let n = self.norm();
        if n == 0.0 {
            log::warn!("normalizing a zero quaternion");
        }
        self.imag /= n;
        self.real /= n;
    }

    /// By-value variant of [`normalize`](Self::normalize).
    #[inline]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// The representative of `{q, -q}` with a non-negative real part.
    #[inline]
    pub fn flip(&self) -> Self {
        if self.real < 0.0 {
            -*self
        } else {
            *self
        }
    }

    /// Hamilton product `self * other`: apply `other` first, then `self`.
    #[inline]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            real: self.real * other.real - self.imag.dot(other.imag),
            imag: self.real * other.imag
                + other.real * self.imag
                + self.imag.cross(other.imag),
        }
    }

    /// Rotate the vector `x`.
    ///
    /// Closed form of the sandwich product `q (0, x) q⁻¹`:
    /// `x + 2w (i × x) + 2 i × (i × x)`.
    #[inline]
    pub fn transform(&self, x: DVec3) -> DVec3 {
        let cross = self.imag.cross(x);
        x + (2.0 * self.real) * cross + 2.0 * self.imag.cross(cross)
    }

    /// The 3x3 rotation matrix `I + 2w K + 2K²` with `K = hat(i)`.
    pub fn matrix(&self) -> DMat3 {
        let k = Self::hat(self.imag);
        DMat3::IDENTITY + k * (2.0 * self.real) + (k * k) * 2.0
    }

    /// Adjoint representation. For rotations it is the rotation matrix itself.
    #[inline]
    pub fn adjoint(&self) -> DMat3 {
        self.matrix()
    }

    /// Lie algebra -> Lie group
    ///
    /// The rotation angle is `‖x‖`, so the quaternion carries the half angle.
    pub fn exp(x: DVec3) -> Self {
        let theta = x.length();

        if theta < Self::EPSILON {
            return Self::new(x / 2.0, 1.0).normalized();
        }

        let (s, c) = (theta / 2.0).sin_cos();
        Self::new(x * (s / theta), c)
    }

    /// Lie group -> Lie algebra
    ///
    /// Returns `angle · axis`, the zero vector for the identity. Inherits the precision
    /// floor of [`axis_angle`](Self::axis_angle): `exp(x).log()` is zero for `‖x‖`
    /// below about `1e-8`.
    pub fn log(&self) -> DVec3 {
        match self.axis_angle() {
            (Some(axis), angle) => axis * angle,
            (None, _) => DVec3::ZERO,
        }
    }

    /// Rotation axis and angle, with the angle in `[0, π]`.
    ///
    /// The axis is `None` when the rotation is the identity and no direction can be
    /// recovered from the imaginary part.
    ///
    /// The half angle comes from `acos(w)`, which cannot resolve rotations much below
    /// `1e-8` rad: `w` rounds to one and the angle returned is zero.
    pub fn axis_angle(&self) -> (Option<DVec3>, f64) {
        let q = self.flip();

        // real may exceed one by rounding
        let half_angle = q.real.min(1.0).acos();

        if half_angle > Self::EPSILON {
            return (Some(q.imag / half_angle.sin()), 2.0 * half_angle);
        }

        let n = q.imag.length();
        if n > Self::EPSILON {
            let sign = if half_angle > 0.0 { 1.0 } else { -1.0 };
            return (Some(q.imag * (sign / n)), 2.0 * half_angle);
        }

        (None, 2.0 * half_angle)
    }

    /// Rotation angle in `[0, π]`.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.axis_angle().1
    }

    /// Rotation axis, `None` for the identity.
    #[inline]
    pub fn axis(&self) -> Option<DVec3> {
        self.axis_angle().0
    }

    /// Right Jacobian of the exponential at `x`, in body-fixed coordinates.
    ///
    /// With `θ = ‖x‖`, `n = x / θ`, `P = n nᵀ`, `s = sin(θ/2)` and `c = cos(θ/2)`:
    ///
    /// ```text
    /// dexp(x) = P + (s / (θ/2)) (c I - s hat(n)) (I - P)
    /// ```
    pub fn dexp(x: DVec3) -> DMat3 {
        let theta = x.length();

        if theta < Self::EPSILON {
            return DMat3::IDENTITY;
        }

        let n = x / theta;
        let p = outer(n, n);
        let h = Self::hat(n);

        let half_theta = theta / 2.0;
        let (s, c) = half_theta.sin_cos();
        let ident = DMat3::IDENTITY;

        p + (ident * c - h * s) * (ident - p) * (s / half_theta)
    }

    /// Right Jacobian of the logarithm, in body-fixed coordinates.
    ///
    /// With `(n, θ)` from [`axis_angle`](Self::axis_angle) and `P = n nᵀ`:
    ///
    /// ```text
    /// dlog(q) = P + (θ/2) cot(θ/2) (I - P) + hat(n θ/2)
    /// ```
    pub fn dlog(&self) -> DMat3 {
        let (axis, angle) = self.axis_angle();
        let Some(n) = axis else {
            return DMat3::IDENTITY;
        };

        let half_theta = angle / 2.0;
        let p = outer(n, n);

        // x cot(x) -> 1 as x -> 0
        let cot = if half_theta > Self::EPSILON {
            half_theta / half_theta.tan()
        } else {
            1.0
        };

        p + (DMat3::IDENTITY - p) * cot + Self::hat(n * half_theta)
    }

    /// Shortest arc rotation sending the unit vector `x` onto the unit vector `y`.
    ///
    /// Antiparallel inputs have no unique shortest arc. They fall back to a rotation of
    /// π about the axis `x × e_y`, or `x × e_x` when `x` lies along `±e_y`. Use
    /// [`from_vectors_with_fallback`](Self::from_vectors_with_fallback) to derive the
    /// axis from another helper vector.
    pub fn from_vectors(x: DVec3, y: DVec3) -> Self {
        Self::from_vectors_with_fallback(x, y, DVec3::Y)
    }

    /// Same as [`from_vectors`](Self::from_vectors), rotating antiparallel inputs by π
    /// about `x × helper`.
    ///
    /// When `x` is parallel to `helper` the canonical axes `e_x`, then `e_y`, take its
    /// place, so the rotation axis is always perpendicular to `x`.
    pub fn from_vectors_with_fallback(x: DVec3, y: DVec3, helper: DVec3) -> Self {
        let dot = x.dot(y);
        let mut res = Self::new(x.cross(y), dot);

        // half angle construction: (1 + cos θ, sin θ n) ∝ (cos θ/2, sin θ/2 n)
        res.real += res.norm();

        let theta = res.norm();
        if theta < Self::EPSILON {
            if dot >= 0.0 {
                return Self::IDENTITY;
            }

            let axis = [helper, DVec3::X, DVec3::Y]
                .into_iter()
                .map(|h| x.cross(h))
                .find(|a| a.length() > Self::EPSILON)
                .unwrap_or(DVec3::Z)
                .normalize();

            log::debug!("antiparallel vectors, rotating by pi about {axis}");
            return Self::exp(std::f64::consts::PI * axis);
        }

        Self::new(res.imag / theta, res.real / theta)
    }

    /// Spherical linear interpolation from `self` (`t = 0`) to `other` (`t = 1`).
    ///
    /// Follows the shortest arc, so at `t = 1` the result may be `-other`, which is the
    /// same rotation.
    pub fn slerp(&self, other: &Self, t: f64) -> Self {
        let delta = self.inv().compose(other).log();
        self.compose(&Self::exp(delta * t))
    }

    /// Cross product matrix: `hat(v) * w == v × w`.
    pub fn hat(v: DVec3) -> DMat3 {
        DMat3::from_cols(
            DVec3::new(0.0, v.z, -v.y),
            DVec3::new(-v.z, 0.0, v.x),
            DVec3::new(v.y, -v.x, 0.0),
        )
    }
}

/// Outer product `a bᵀ`.
#[inline]
fn outer(a: DVec3, b: DVec3) -> DMat3 {
    DMat3::from_cols(a * b.x, a * b.y, a * b.z)
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Neg for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.imag, -self.real)
    }
}

impl std::ops::Mul<Quaternion> for Quaternion {
    type Output = Quaternion;

    #[inline]
    fn mul(self, rhs: Quaternion) -> Self::Output {
        self.compose(&rhs)
    }
}

impl std::ops::MulAssign<Quaternion> for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: Quaternion) {
        *self = self.compose(&rhs);
    }
}

impl std::ops::Mul<DVec3> for Quaternion {
    type Output = DVec3;

    #[inline]
    fn mul(self, rhs: DVec3) -> Self::Output {
        self.transform(rhs)
    }
}

impl From<DQuat> for Quaternion {
    #[inline]
    fn from(q: DQuat) -> Self {
        Self::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

impl From<Quaternion> for DQuat {
    #[inline]
    fn from(q: Quaternion) -> Self {
        DQuat::from_xyzw(q.imag.x, q.imag.y, q.imag.z, q.real)
    }
}

impl TryFrom<&[f64]> for Quaternion {
    type Error = RigidError;

    /// Reads `[x, y, z, w]`.
    fn try_from(data: &[f64]) -> Result<Self, Self::Error> {
        check_size(data, 4)?;
        Ok(Self::from_xyzw(data[0], data[1], data[2], data[3]))
    }
}

// NOTE: compares components, so `q` and `-q` are not equal.
#[cfg(feature = "approx")]
impl approx::AbsDiffEq for Quaternion {
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
impl approx::RelativeEq for Quaternion {
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
