//! Result type alias for Arx

use super::errors::ArxError;

/// Result type alias for Arx operations
///
/// # Examples
///
/// ```
/// use arx::domain::result::Result;
/// use arx::domain::errors::ArxError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ArxError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ArxError>;
