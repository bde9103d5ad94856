//! The JSON envelope every response is wrapped in.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{ser::SerializeMap, Serialize, Serializer};

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Envelope<T> {
    pub status_code: u16,
    pub success: bool,
    pub error: Option<ErrorBody>,
    pub data: Option<T>,
}

/// A payload serialized under a single named key, e.g. `{"budget": {...}}`.
pub struct Named<T> {
    key: &'static str,
    value: T,
}

impl<T: Serialize> Serialize for Named<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, &self.value)?;
        map.end()
    }
}

/// A successful response carrying one named payload.
pub struct ApiSuccess<T> {
    status: StatusCode,
    data: Named<T>,
}

impl<T> ApiSuccess<T> {
    pub fn ok(key: &'static str, value: T) -> Self {
        Self {
            status: StatusCode::OK,
            data: Named { key, value },
        }
    }

    pub fn created(key: &'static str, value: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data: Named { key, value },
        }
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            status_code: self.status.as_u16(),
            success: true,
            error: None,
            data: Some(self.data),
        };
        (self.status, Json(body)).into_response()
    }
}
