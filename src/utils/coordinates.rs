use crate::error::{ProcessingError, Result};

/// Parse a reference-table coordinate in decimal degrees
pub fn parse_coordinate(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProcessingError::InvalidCoordinate(
            "Empty coordinate value".to_string(),
        ));
    }

    match trimmed.parse::<f64>() {
        Ok(degrees) if degrees.is_finite() => Ok(degrees),
        _ => Err(ProcessingError::InvalidCoordinate(format!(
            "'{}' is not a decimal degree value",
            value
        ))),
    }
}
