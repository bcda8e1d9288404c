use thiserror::Error;

/// Error type for the fallible conversions of the rigid body types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RigidError {
    /// The input slice does not hold the number of scalars the type is made of.
    #[error("slice has wrong size: expected {expected}, got {got}")]
    WrongSize {
        /// Number of scalars the target type stores.
        expected: usize,
        /// Length of the slice that was given.
        got: usize,
    },
}

/// Checks that `data` holds exactly `expected` scalars.
pub(crate) fn check_size(data: &[f64], expected: usize) -> Result<(), RigidError> {
    if data.len() != expected {
        return Err(RigidError::WrongSize {
            expected,
            got: data.len(),
        });
    }
    Ok(())
}
