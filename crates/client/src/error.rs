//! API-client error model.
//!
//! HTTP status codes are mapped to a closed set of categories here, before
//! anything reaches the invoicing core. The core only ever sees the message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a failed API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    RequestTimeout,
    Conflict,
    PayloadTooLarge,
    UnsupportedMediaType,
    RateLimited,
    ServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    /// Any other status, or a failure before a response was received.
    Unexpected,
}

impl ApiErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            408 => Self::RequestTimeout,
            409 => Self::Conflict,
            413 => Self::PayloadTooLarge,
            415 => Self::UnsupportedMediaType,
            429 => Self::RateLimited,
            500 => Self::ServerError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            _ => Self::Unexpected,
        }
    }

    /// Short label suitable for a toast title.
    pub fn summary(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::RequestTimeout => "Request Timeout",
            Self::Conflict => "Conflict",
            Self::PayloadTooLarge => "Payload Too Large",
            Self::UnsupportedMediaType => "Unsupported Media Type",
            Self::RateLimited => "Rate Limit Exceeded",
            Self::ServerError => "Server Error",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
            Self::GatewayTimeout => "Gateway Timeout",
            Self::Unexpected => "Unexpected Error",
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => {
                "Bad Request: The request could not be understood or was missing required parameters."
            }
            Self::Unauthorized => "Unauthorized: Access is denied due to invalid credentials.",
            Self::Forbidden => "Forbidden: You do not have permission to access this resource.",
            Self::NotFound => "Not Found: The requested resource could not be found.",
            Self::MethodNotAllowed => {
                "Method Not Allowed: The HTTP method used is not allowed for this endpoint."
            }
            Self::RequestTimeout => "Request Timeout: The server took too long to respond.",
            Self::Conflict => {
                "Conflict: The request could not be processed due to a conflict with the current state of the resource."
            }
            Self::PayloadTooLarge => {
                "Payload Too Large: The request payload is too large for the server to process."
            }
            Self::UnsupportedMediaType => {
                "Unsupported Media Type: The server does not support the media type transmitted in the request."
            }
            Self::RateLimited => {
                "Too Many Requests: You have sent too many requests in a short period."
            }
            Self::ServerError => "Internal Server Error: Something went wrong on the server.",
            Self::BadGateway => {
                "Bad Gateway: The server received an invalid response from the upstream server."
            }
            Self::ServiceUnavailable => {
                "Service Unavailable: The server is currently unable to handle the request due to maintenance or overloading."
            }
            Self::GatewayTimeout => {
                "Gateway Timeout: The server did not receive a timely response from the upstream server."
            }
            Self::Unexpected => "An unknown error occurred",
        }
    }
}

/// A failed call to the persistence API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    /// Build from an HTTP status with the standard human-readable message.
    pub fn from_status(status: u16, status_text: &str) -> Self {
        let kind = ApiErrorKind::from_status(status);
        let message = match kind {
            ApiErrorKind::Unexpected => {
                format!("Unexpected Error (Status {status}): {status_text}")
            }
            known => known.default_message().to_string(),
        };
        Self {
            kind,
            status: Some(status),
            message,
        }
    }

    pub fn not_found(what: impl core::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::NotFound,
            status: Some(404),
            message: format!("Not Found: {what}"),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Conflict,
            status: Some(409),
            message: message.into(),
        }
    }

    /// Failure before any response (connection refused, lock poisoned, ...).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unexpected, message)
    }
}
