use thiserror::Error;

/// Convenient result alias for the navigation library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Raised when the declared system type cannot be navigated.
    ///
    /// The message lists every declared system type, including ones the
    /// navigator does not compute for yet.
    #[error("invalid system type: requires 'drone', 'ship' or 'ultradrone'")]
    UnknownSystemType,

    /// The computed location does not fit in a finite `f64`.
    #[error("location out of range: coordinates and velocity overflow")]
    LocationOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_system_type_message_is_stable() {
        assert_eq!(
            Error::UnknownSystemType.to_string(),
            "invalid system type: requires 'drone', 'ship' or 'ultradrone'"
        );
        assert_eq!(
            Error::LocationOutOfRange.to_string(),
            "location out of range: coordinates and velocity overflow"
        );
    }
}
