mod cpam;
mod health;
mod taxi;

pub use cpam::*;
pub use health::*;
pub use taxi::*;

use tarifa::shared::time::Timestamp;

use crate::error::ApiError;

fn parse_timestamp(field: &str, value: Option<&str>) -> Result<Option<Timestamp>, ApiError> {
    match value {
        None => Ok(None),
        Some(value) => Timestamp::parse(value).map(Some).ok_or_else(|| {
            ApiError::Unprocessable(format!("{field}: invalid datetime '{value}'"))
        }),
    }
}
