//! Utility macros shared by the message crate.

/// Returns early with an error if a condition is not met.
///
/// Like `assert!`, but yields `Err($error)` from the enclosing function instead
/// of panicking. Used by the validators so that every check runs before any
/// copy of a message is produced.
///
/// # Example
///
/// ```ignore
/// ensure!(!name.is_empty(), MessageError::invalid_header_name(name));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
