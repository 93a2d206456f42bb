use url::{Origin, Url};

use crate::error::ValidationError;

/// Parses `scheme://host[:port]` (or any URL) into its tuple origin.
///
/// # Errors
///
/// Returns an error when the value is not a URL or has an opaque origin.
pub fn parse_origin(value: &str) -> Result<Origin, ValidationError> {
    let url = Url::parse(value.trim()).map_err(|err| ValidationError::InvalidUrl {
        url: value.to_owned(),
        source: err,
    })?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(ValidationError::OpaqueOrigin {
            value: value.to_owned(),
        });
    }
    Ok(origin)
}

/// Whether `url` belongs to `origin`. Unparseable URLs never match.
#[must_use]
pub fn same_origin(origin: &Origin, url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| parsed.origin() == *origin)
}
