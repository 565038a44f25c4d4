//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// Standard response envelope: `{status, message, data}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// 200 with data.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// 201 with data.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<Value> {
    /// 200 with no data payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: message.into(),
            data: None,
        }
    }

    /// 201 with no data payload.
    pub fn created_message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let env = Envelope::ok("Success", serde_json::json!({"id": 1}));
        let json = serde_json::to_value(&env).unwrap();

        assert_eq!(json["status"], 200);
        assert_eq!(json["message"], "Success");
        assert_eq!(json["data"]["id"], 1);
    }

    #[test]
    fn test_message_only_envelope() {
        let env = Envelope::message("Check your email");
        let json = serde_json::to_value(&env).unwrap();

        assert_eq!(json["data"], serde_json::Value::Null);
    }

    #[test]
    fn test_created_message_envelope_is_201() {
        let env = Envelope::created_message("Blog liked");
        let json = serde_json::to_value(&env).unwrap();

        assert_eq!(json["status"], 201);
        assert_eq!(json["data"], serde_json::Value::Null);
    }
}
