//! Request identity extraction.
//!
//! Authentication happens upstream; the gateway forwards the caller's user id
//! in the `X-User-Id` header. A missing header is an anonymous viewer.

use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// Caller identity, `None` for anonymous requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub Option<Uuid>);

impl Viewer {
    pub fn id(&self) -> Option<Uuid> {
        self.0
    }
}

fn viewer_from_request(req: &HttpRequest) -> Result<Viewer, AppError> {
    let Some(raw) = req.headers().get(USER_ID_HEADER) else {
        return Ok(Viewer(None));
    };
    let raw = raw
        .to_str()
        .map_err(|_| AppError::BadRequest(format!("{} is not valid ASCII", USER_ID_HEADER)))?;
    if raw.trim().is_empty() {
        return Ok(Viewer(None));
    }
    Uuid::parse_str(raw.trim())
        .map(|id| Viewer(Some(id)))
        .map_err(|_| AppError::BadRequest(format!("{} must be a UUID", USER_ID_HEADER)))
}

impl FromRequest for Viewer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(viewer_from_request(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_missing_header_is_anonymous() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(viewer_from_request(&req).unwrap(), Viewer(None));
    }

    #[test]
    fn test_valid_header() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, id.to_string()))
            .to_http_request();
        assert_eq!(viewer_from_request(&req).unwrap().id(), Some(id));
    }

    #[test]
    fn test_malformed_header_is_bad_request() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .to_http_request();
        assert!(matches!(
            viewer_from_request(&req),
            Err(AppError::BadRequest(_))
        ));
    }
}
