//! HTTP handlers: query parameters in, JSON bodies out.
//!
//! Each handler pulls its parameters from the query string, calls one
//! [`RoomService`] operation, and encodes the result. Errors become
//! `{"error": ...}` bodies through [`ChewcrewError`]'s `IntoResponse`.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chewcrew_places::PlaceProvider;
use chewcrew_protocol::{
    Codec, EndQuery, JsonCodec, NewRoomQuery, ProtocolError, RoomQuery,
    VoteQuery,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{ChewcrewError, RoomService};

/// Shared handler state.
pub(crate) type SharedService<P> = State<Arc<RoomService<P>>>;

/// Query-string parameters decoded into `T`.
///
/// A repeated key keeps its first value. Anything that still fails to
/// decode is rejected as [`ChewcrewError::BadQuery`].
pub(crate) struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ChewcrewError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Query(pairs) =
            Query::<Vec<(String, String)>>::from_request_parts(parts, state)
                .await
                .map_err(|e| ChewcrewError::BadQuery(e.body_text()))?;

        let mut fields = Map::new();
        for (key, value) in pairs {
            fields.entry(key).or_insert(Value::String(value));
        }
        serde_json::from_value(Value::Object(fields))
            .map(Params)
            .map_err(|e| ChewcrewError::BadQuery(e.to_string()))
    }
}

/// Encodes `body` with [`JsonCodec`] into a response with `status`.
pub(crate) fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response, ProtocolError> {
    let codec = JsonCodec;
    let bytes = codec.encode(body)?;
    Ok((status, [(header::CONTENT_TYPE, codec.content_type())], bytes)
        .into_response())
}

/// `200` with an empty body, still typed as JSON.
fn empty_response() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, JsonCodec.content_type())],
    )
        .into_response()
}

/// `GET /room?id=`
pub(crate) async fn get_room<P: PlaceProvider>(
    State(service): SharedService<P>,
    Params(query): Params<RoomQuery>,
) -> Result<Response, ChewcrewError> {
    let view = service.get(&query.id).await?;
    Ok(json_response(StatusCode::OK, &view)?)
}

/// `/room/new?address=`
pub(crate) async fn new_room<P: PlaceProvider>(
    State(service): SharedService<P>,
    Params(query): Params<NewRoomQuery>,
) -> Result<Response, ChewcrewError> {
    let view = service.create(&query.address).await?;
    Ok(json_response(StatusCode::OK, &view)?)
}

/// `/room/vote?id=&name=&vote=`
pub(crate) async fn vote<P: PlaceProvider>(
    State(service): SharedService<P>,
    Params(query): Params<VoteQuery>,
) -> Result<Response, ChewcrewError> {
    service.vote(&query.id, &query.name, &query.vote).await?;
    Ok(empty_response())
}

/// `/room/end?id=&hostid=`
pub(crate) async fn end_room<P: PlaceProvider>(
    State(service): SharedService<P>,
    Params(query): Params<EndQuery>,
) -> Result<Response, ChewcrewError> {
    let view = service.end(&query.id, &query.hostid).await?;
    Ok(json_response(StatusCode::OK, &view)?)
}
