//! Per-connection dispatch.
//!
//! # Responsibilities
//! - Drive the HTTP exchange for one accepted connection
//! - Run route → validate → transform → respond, in order
//! - Contain every per-request failure; nothing reaches the accept loop
//!
//! # Design Decisions
//! - One connection, one self-contained task; no shared mutable state
//!   between units of work beyond the read-only configuration
//! - Pixel work runs on the blocking pool, never on the accept task
//! - Transport failures are logged at debug and dropped with the
//!   connection; one request is not worth retrying at this layer

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Method, Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use uuid::Uuid;

use super::response;
use crate::config::ServerConfig;
use crate::observability::metrics;
use crate::routing::path;
use crate::transform::{pipeline, validate, Outcome, TransformError};

/// Serve one accepted connection to completion.
///
/// This is the whole unit of work for the connection; the accept loop
/// never waits on it and never hears back from it.
pub async fn serve_connection(stream: TcpStream, config: Arc<ServerConfig>) {
    let io = TokioIo::new(stream);
    let service = service_fn(move |req: Request<Incoming>| {
        let config = Arc::clone(&config);
        handle_request(req, config)
    });

    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
        tracing::debug!(error = %e, "Connection ended with transport error");
    }
}

/// Run one request through the pipeline and record the outcome.
///
/// `Err` means the body transport failed mid-read; hyper ends the
/// exchange without a response and the connection is dropped.
async fn handle_request(
    req: Request<Incoming>,
    config: Arc<ServerConfig>,
) -> Result<Response<Full<Bytes>>, BodyTransportError> {
    let start = Instant::now();
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let request_path = req.uri().path().to_string();

    let response = match process(req, &config).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %request_path,
                error = %e,
                "Body transport failed; dropping the connection"
            );
            return Err(e);
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %request_path,
        status = %response.status(),
        "Request handled"
    );
    Ok(response)
}

async fn process(
    req: Request<Incoming>,
    config: &ServerConfig,
) -> Result<Response<Full<Bytes>>, BodyTransportError> {
    if req.method() != Method::GET && req.method() != Method::POST {
        return Ok(response::bad_request());
    }

    let Some(route) = path::match_path(req.uri().path()) else {
        return Ok(response::bad_request());
    };

    // The output canvas is allocated at the requested extents; bound
    // its area before any buffering, like the declared length below.
    if let Err(rejection) = validate::check_crop_extents(route.rect, &config.limits) {
        tracing::debug!(rejection = %rejection, "Request rejected");
        return Ok(response::bad_request());
    }

    // Oversized payloads are rejected from the declared length alone,
    // before any of the body is buffered.
    if let Err(rejection) = validate::check_declared_length(declared_length(&req), &config.limits)
    {
        tracing::debug!(rejection = %rejection, "Request rejected");
        return Ok(response::bad_request());
    }

    // The read itself is capped at the same limit, which also covers
    // requests that never declared a length. Exceeding the cap is the
    // client's fault and answers 400; any other mid-body failure is a
    // transport error and aborts the exchange.
    let cap = config.limits.max_body_bytes as usize;
    let body = match Limited::new(req.into_body(), cap).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            tracing::debug!("Body exceeded the payload cap mid-read");
            return Ok(response::bad_request());
        }
        Err(e) => return Err(BodyTransportError { cause: e }),
    };

    // Decode, validate, and transform on the blocking pool.
    let limits = config.limits.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<Outcome, RequestFailure> {
        let raster = validate::validate_body(&body, &limits).map_err(RequestFailure::Rejected)?;
        pipeline::run(raster, route).map_err(RequestFailure::Fault)
    })
    .await;

    Ok(match result {
        Ok(Ok(Outcome::Png(bytes))) => response::png(bytes),
        Ok(Ok(Outcome::Empty)) => response::no_content(),
        Ok(Err(RequestFailure::Rejected(rejection))) => {
            tracing::debug!(rejection = %rejection, "Request rejected");
            response::bad_request()
        }
        Ok(Err(RequestFailure::Fault(e))) => {
            tracing::error!(error = %e, "Pipeline fault past validation");
            response::internal_error()
        }
        Err(e) => {
            tracing::error!(error = %e, "Pipeline task failed to join");
            response::internal_error()
        }
    })
}

/// The request body failed mid-read for a reason other than the
/// payload cap. There is no response to send; the connection ends.
#[derive(Debug, thiserror::Error)]
#[error("request body transport failed: {cause}")]
struct BodyTransportError {
    cause: Box<dyn std::error::Error + Send + Sync>,
}

/// Ways the blocking stage of a request can fail.
enum RequestFailure {
    /// Validation said no; maps to 400.
    Rejected(validate::Rejection),
    /// A fault past validation; maps to 500.
    Fault(TransformError),
}

/// Declared `Content-Length`, if the request carries a parseable one.
fn declared_length(req: &Request<Incoming>) -> Option<u64> {
    req.headers()
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
