//! Caller identity and viewer attributes from request headers.
//!
//! Identity is issued upstream and passed in explicitly. Handlers take these
//! extractors as parameters; nothing reads the caller from shared state.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{NaiveDate, Utc};
use streamcat_common::{Error, Result, Role, ViewerId};

use super::error::AppError;
use crate::policy::ViewerAttributes;

pub const VIEWER_ID_HEADER: &str = "x-viewer-id";
pub const VIEWER_ROLE_HEADER: &str = "x-viewer-role";
pub const VIEWER_VIP_HEADER: &str = "x-viewer-vip";
pub const VIEWER_AGE_HEADER: &str = "x-viewer-age";
pub const VIEWER_BIRTHDATE_HEADER: &str = "x-viewer-birthdate";

/// The normalized key of the calling viewer (`X-Viewer-Id`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerKey(pub ViewerId);

/// Calling viewer plus the role the identity provider issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub viewer_id: ViewerId,
    pub role: Role,
}

/// Non-blank header value, or `None` when absent.
fn header_str<'a>(parts: &'a Parts, name: &str) -> Result<Option<&'a str>> {
    match parts.headers.get(name) {
        None => Ok(None),
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|_| Error::validation(format!("{name} header is not valid text")))?
                .trim();
            Ok((!value.is_empty()).then_some(value))
        }
    }
}

fn viewer_id(parts: &Parts) -> Result<ViewerId> {
    header_str(parts, VIEWER_ID_HEADER)?
        .ok_or_else(|| Error::Unauthorized(format!("missing {VIEWER_ID_HEADER} header")))?
        .parse()
}

#[async_trait]
impl<S> FromRequestParts<S> for ViewerKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(Self(viewer_id(parts)?))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let viewer_id = viewer_id(parts)?;
        let role = header_str(parts, VIEWER_ROLE_HEADER)?
            .ok_or_else(|| Error::Unauthorized(format!("missing {VIEWER_ROLE_HEADER} header")))?
            .parse::<Role>()?;
        Ok(Self { viewer_id, role })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ViewerAttributes
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(viewer_attributes(parts, Utc::now().date_naive())?)
    }
}

/// Read VIP status and age. An explicit age wins over a birthdate.
fn viewer_attributes(parts: &Parts, today: NaiveDate) -> Result<ViewerAttributes> {
    let is_vip = header_str(parts, VIEWER_VIP_HEADER)?
        .map(|v| match v.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::validation(format!(
                "{VIEWER_VIP_HEADER} must be true or false, got {v:?}"
            ))),
        })
        .transpose()?;

    let age = match header_str(parts, VIEWER_AGE_HEADER)? {
        Some(v) => Some(v.parse::<u32>().map_err(|_| {
            Error::validation(format!("{VIEWER_AGE_HEADER} must be a whole number, got {v:?}"))
        })?),
        None => header_str(parts, VIEWER_BIRTHDATE_HEADER)?
            .map(|v| age_from_birthdate(v, today))
            .transpose()?,
    };

    Ok(ViewerAttributes { is_vip, age })
}

/// Whole years between a `YYYY-MM-DD` birthdate and `today`.
fn age_from_birthdate(value: &str, today: NaiveDate) -> Result<u32> {
    let birthdate = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        Error::validation(format!(
            "{VIEWER_BIRTHDATE_HEADER} must be YYYY-MM-DD, got {value:?}"
        ))
    })?;
    today
        .years_since(birthdate)
        .ok_or_else(|| Error::validation(format!("birthdate {value} is in the future")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn no_headers_means_unknown() {
        let attrs = viewer_attributes(&parts(&[]), today()).unwrap();
        assert_eq!(attrs, ViewerAttributes::default());
    }

    #[test]
    fn vip_and_age() {
        let attrs = viewer_attributes(
            &parts(&[(VIEWER_VIP_HEADER, "TRUE"), (VIEWER_AGE_HEADER, " 21 ")]),
            today(),
        )
        .unwrap();
        assert_eq!(attrs.is_vip, Some(true));
        assert_eq!(attrs.age, Some(21));
    }

    #[test]
    fn birthdate_resolves_to_whole_years() {
        let before = viewer_attributes(&parts(&[(VIEWER_BIRTHDATE_HEADER, "2006-06-16")]), today())
            .unwrap();
        assert_eq!(before.age, Some(17));

        let on = viewer_attributes(&parts(&[(VIEWER_BIRTHDATE_HEADER, "2006-06-15")]), today())
            .unwrap();
        assert_eq!(on.age, Some(18));
    }

    #[test]
    fn explicit_age_wins() {
        let attrs = viewer_attributes(
            &parts(&[(VIEWER_AGE_HEADER, "30"), (VIEWER_BIRTHDATE_HEADER, "2020-01-01")]),
            today(),
        )
        .unwrap();
        assert_eq!(attrs.age, Some(30));
    }

    #[test]
    fn malformed_attributes_are_rejected() {
        for headers in [
            [(VIEWER_VIP_HEADER, "yes")],
            [(VIEWER_AGE_HEADER, "-3")],
            [(VIEWER_BIRTHDATE_HEADER, "15/06/2000")],
            [(VIEWER_BIRTHDATE_HEADER, "2030-01-01")],
        ] {
            assert_matches!(
                viewer_attributes(&parts(&headers), today()),
                Err(Error::Validation(_))
            );
        }
    }

    #[test]
    fn viewer_id_is_normalized() {
        let id = viewer_id(&parts(&[(VIEWER_ID_HEADER, "  Alice ")])).unwrap();
        assert_eq!(id.as_str(), "alice");
    }

    #[test]
    fn missing_viewer_id_is_unauthorized() {
        assert_matches!(viewer_id(&parts(&[])), Err(Error::Unauthorized(_)));
        assert_matches!(
            viewer_id(&parts(&[(VIEWER_ID_HEADER, "   ")])),
            Err(Error::Unauthorized(_))
        );
    }
}
