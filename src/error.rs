pub type SnoopResult<T> = Result<T, SnoopError>;

#[derive(thiserror::Error, Debug)]
pub enum SnoopError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("bitmap lock failed: {0}")]
    LockFailure(String),

    #[error("pixel ({x}, {y}) is outside the {width}x{height} bitmap")]
    OutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl SnoopError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn lock_failure(msg: impl Into<String>) -> Self {
        Self::LockFailure(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            SnoopError::invalid_argument("x")
                .to_string()
                .contains("invalid argument:")
        );
        assert!(
            SnoopError::lock_failure("x")
                .to_string()
                .contains("bitmap lock failed:")
        );
    }

    #[test]
    fn out_of_range_names_the_coordinate_and_bounds() {
        let err = SnoopError::OutOfRange {
            x: 7,
            y: 9,
            width: 4,
            height: 3,
        };
        assert_eq!(err.to_string(), "pixel (7, 9) is outside the 4x3 bitmap");
    }
}
