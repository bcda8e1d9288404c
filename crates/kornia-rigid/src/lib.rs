#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia Rigid
//!
//! This crate provides closed-form Lie group kinematics for rigid bodies: unit quaternions
//! for 3D rotations (SO(3)) and translation + rotation pairs for rigid motions (SE(3)),
//! together with their exponential and logarithm maps, right Jacobians and adjoints.
//!
//! ## Types
//!
//! - [`Quaternion`]: unit quaternion, the SO(3) operations.
//! - [`Rigid3`]: rigid transform `x ↦ center + orient(x)`, the SE(3) operations.
//! - [`Deriv`]: twist in se(3), ordered `(linear, angular)`.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use kornia_rigid::{Deriv, Quaternion, Rigid3};
//!
//! // a quarter turn about z
//! let rotation = Quaternion::exp(DVec3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2));
//! let rotated = rotation.transform(DVec3::X);
//! assert!((rotated - DVec3::Y).length() < 1e-12);
//!
//! // move along x while turning about z
//! let twist = Deriv::new(DVec3::X, DVec3::new(0.0, 0.0, 0.5));
//! let pose = Rigid3::exp(&twist);
//! let back = pose.log();
//! assert!((back.linear - twist.linear).length() < 1e-12);
//! ```

/// Twists, the tangent vectors of SE(3).
pub mod deriv;

/// Error types for the crate.
pub mod error;

/// Unit quaternions and the SO(3) operations.
pub mod quaternion;

/// Rigid transforms and the SE(3) operations.
pub mod rigid;

pub use deriv::Deriv;
pub use error::RigidError;
pub use quaternion::Quaternion;
pub use rigid::{Mat6, Rigid3};
