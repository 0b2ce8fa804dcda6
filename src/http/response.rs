//! Response construction.
//!
//! # Responsibilities
//! - Build the three response shapes the server produces:
//!   200 with a PNG body, 204 empty, 400 empty
//!
//! # Design Decisions
//! - Responses are terminal: built once, written once, then the
//!   exchange is over
//! - Construction is infallible; no builder `Result`s to thread through

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};

/// 200 with the encoded PNG as the body.
pub fn png(body: Vec<u8>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    response
}

/// 204: the crop rectangle missed the image. A defined empty result,
/// not an error.
pub fn no_content() -> Response<Full<Bytes>> {
    empty(StatusCode::NO_CONTENT)
}

/// 400: malformed path, oversized/missing/undecodable body, oversized
/// dimensions, or wrong pixel format.
pub fn bad_request() -> Response<Full<Bytes>> {
    empty(StatusCode::BAD_REQUEST)
}

/// 500: a fault inside the pipeline that validation cannot explain.
pub fn internal_error() -> Response<Full<Bytes>> {
    empty(StatusCode::INTERNAL_SERVER_ERROR)
}

fn empty(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_response_carries_content_type() {
        let response = png(vec![1, 2, 3]);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
    }

    #[test]
    fn status_responses_have_no_body_headers() {
        assert_eq!(no_content().status(), StatusCode::NO_CONTENT);
        assert_eq!(bad_request().status(), StatusCode::BAD_REQUEST);
        assert!(bad_request().headers().get(header::CONTENT_TYPE).is_none());
    }
}
