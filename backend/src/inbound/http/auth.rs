//! Bearer credential extraction for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! header parsing here. The extractor only peels the token off the
//! `Authorization` header; verification happens in the entitlement gate.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::Error;

/// Raw bearer token peeled off the `Authorization` header.
///
/// Missing or malformed headers fail extraction with a 401 before the
/// request body is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// The token as sent by the client.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn extract(req: &HttpRequest) -> Result<BearerToken, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Unauthorized"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Unauthorized"))?;
    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("Unauthorized"))?;
    Ok(BearerToken(token.to_owned()))
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[test]
    fn extracts_the_token_after_the_scheme() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer id-token-123"))
            .to_http_request();
        let token = extract(&req).expect("valid header");
        assert_eq!(token.as_str(), "id-token-123");
    }

    #[rstest]
    #[case::wrong_scheme("Basic dXNlcjpwYXNz")]
    #[case::no_scheme("id-token-123")]
    #[case::blank_token("Bearer    ")]
    #[case::empty("")]
    fn malformed_headers_are_unauthorized(#[case] value: &str) {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, value))
            .to_http_request();
        let err = extract(&req).expect_err("rejected");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        assert!(extract(&req).is_err());
    }
}
