use std::str::FromStr;

use vidcat_core::DomainError;

use crate::app::errors::ApiError;

/// Parse a path segment into a typed id; anything but a positive integer is a 422.
pub fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(ApiError::from)
}
