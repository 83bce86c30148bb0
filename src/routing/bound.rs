//! Conversion helpers called by the code `#[routes]` generates: each one
//! takes the positional argument produced by extraction and turns it into
//! the handler parameter's concrete type, or a ready-made error response.

use crate::common::{ApiResponse, StatusCode};
use crate::routing::binding::BoundValue;
use crate::routing::context::{RequestInfo, ResponseHead};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::str::FromStr;

fn bad_request(message: String) -> Response {
    ApiResponse::<()>::error(StatusCode::BadRequest, message).into_response()
}

fn unbound(index: usize, expected: &str) -> Response {
    // A handler asked for a value its binding list never produced; this is
    // a registration bug, not a client error.
    ApiResponse::<()>::error(
        StatusCode::InternalServerError,
        format!("no {expected} value bound at parameter {index}"),
    )
    .into_response()
}

pub fn take(args: &mut Vec<Option<BoundValue>>, index: usize) -> Option<BoundValue> {
    args.get_mut(index).and_then(Option::take)
}

pub fn body<T: DeserializeOwned>(
    args: &mut Vec<Option<BoundValue>>,
    index: usize,
) -> Result<T, Response> {
    match take(args, index) {
        Some(BoundValue::Body(value)) => serde_json::from_value(value)
            .map_err(|e| bad_request(format!("invalid request body: {e}"))),
        _ => Err(unbound(index, "body")),
    }
}

pub fn path_param<T>(
    args: &mut Vec<Option<BoundValue>>,
    index: usize,
    name: &str,
) -> Result<T, Response>
where
    T: FromStr,
    T::Err: Display,
{
    match take(args, index) {
        Some(BoundValue::PathParams(params)) => {
            let raw = params
                .get(name)
                .ok_or_else(|| bad_request(format!("missing path parameter '{name}'")))?;
            raw.parse::<T>()
                .map_err(|e| bad_request(format!("invalid path parameter '{name}': {e}")))
        }
        _ => Err(unbound(index, "path parameter")),
    }
}

pub fn query<T: DeserializeOwned>(
    args: &mut Vec<Option<BoundValue>>,
    index: usize,
) -> Result<T, Response> {
    match take(args, index) {
        Some(BoundValue::Query(map)) => {
            let value = serde_json::to_value(map)
                .map_err(|e| bad_request(format!("invalid query string: {e}")))?;
            serde_json::from_value(value)
                .map_err(|e| bad_request(format!("invalid query string: {e}")))
        }
        _ => Err(unbound(index, "query")),
    }
}

pub fn headers(args: &mut Vec<Option<BoundValue>>, index: usize) -> Result<HeaderMap, Response> {
    match take(args, index) {
        Some(BoundValue::Headers(headers)) => Ok(headers),
        _ => Err(unbound(index, "headers")),
    }
}

pub fn request(args: &mut Vec<Option<BoundValue>>, index: usize) -> Result<RequestInfo, Response> {
    match take(args, index) {
        Some(BoundValue::Request(info)) => Ok(info),
        _ => Err(unbound(index, "request")),
    }
}

pub fn response(
    args: &mut Vec<Option<BoundValue>>,
    index: usize,
) -> Result<ResponseHead, Response> {
    match take(args, index) {
        Some(BoundValue::Response(head)) => Ok(head),
        _ => Err(unbound(index, "response")),
    }
}
