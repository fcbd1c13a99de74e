//! Extractor that enforces the `x-version` API version header.
//!
//! Requests must carry a version the router currently exposes; anything else
//! is rejected before the handler runs. Health and docs routes skip this by
//! simply not declaring the extractor.

use super::RejectionType;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use log::*;
use semver::Version;
use service::config::ApiVersion;

pub(crate) struct CompareApiVersion(pub ApiVersion);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CompareApiVersion
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ApiVersion::field_name())
            .ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Missing {} header", ApiVersion::field_name()),
                )
            })?
            .to_str()
            .map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Invalid {} header value", ApiVersion::field_name()),
                )
            })?;

        let version = Version::parse(header).map_err(|err| {
            debug!("Failed to parse API version header '{header}': {err:?}");
            (
                StatusCode::BAD_REQUEST,
                format!("Invalid {} header value: {header}", ApiVersion::field_name()),
            )
        })?;

        if !ApiVersion::versions().iter().any(|v| *v == header) {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Unsupported API version: {header}"),
            ));
        }

        Ok(CompareApiVersion(ApiVersion { version }))
    }
}
