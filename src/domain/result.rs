//! Result type alias for posload
//!
//! This module provides a convenient Result type alias that uses PosloadError
//! as the error type.

use super::errors::PosloadError;

/// Result type alias for posload operations
///
/// # Examples
///
/// ```
/// use posload::domain::result::Result;
/// use posload::domain::errors::PosloadError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PosloadError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PosloadError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::PosloadError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
        if let Ok(value) = result {
            assert_eq!(value, 42);
        }
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(PosloadError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
