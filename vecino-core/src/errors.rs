//! # Errors
//!
//! vecino uses a small set of structured errors with stable names and HTTP
//! status codes. Core goals:
//! - consistent status codes + class names across transports
//! - can be carried through `anyhow::Error` (for the hook pipeline)
//! - transport-agnostic (the server crate decides how to serialize)

use std::fmt;

use anyhow::Error as AnyError;
use serde_json::Value;

/// A convenience result type for vecino core APIs.
pub type VecinoResult<T> = std::result::Result<T, AnyError>;

/// Error class names + status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,       // 400
    NotAuthenticated, // 401
    Forbidden,        // 403
    NotFound,         // 404
    MethodNotAllowed, // 405
    Unprocessable,    // 422
    GeneralError,     // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotAuthenticated => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::Unprocessable => 422,
            ErrorKind::GeneralError => 500,
        }
    }

    /// Error `name` (e.g. "NotFound")
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotAuthenticated => "NotAuthenticated",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::MethodNotAllowed => "MethodNotAllowed",
            ErrorKind::Unprocessable => "Unprocessable",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    /// Error `className` (kebab-cased)
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotAuthenticated => "not-authenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not-found",
            ErrorKind::MethodNotAllowed => "method-not-allowed",
            ErrorKind::Unprocessable => "unprocessable",
            ErrorKind::GeneralError => "general-error",
        }
    }
}

/// A structured vecino error that can live inside `anyhow::Error`.
///
/// Fields:
/// - name
/// - message
/// - code (HTTP status)
/// - class_name
/// - data (optional)
/// - errors (optional, per-field validation detail)
#[derive(Debug)]
pub struct VecinoError {
    pub kind: ErrorKind,
    pub message: String,
    pub data: Option<Value>,
    pub errors: Option<Value>,
    pub source: Option<AnyError>,
}

impl VecinoError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
            errors: None,
            source: None,
        }
    }

    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Convert into `anyhow::Error` so it flows through the hook pipeline.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Turn any error into a VecinoError:
    /// - if it is already a VecinoError, keep it (lossless)
    /// - otherwise wrap as GeneralError
    pub fn normalize(err: AnyError) -> VecinoError {
        match err.downcast::<VecinoError>() {
            Ok(e) => e,
            Err(other) => {
                VecinoError::new(ErrorKind::GeneralError, other.to_string()).with_source(other)
            }
        }
    }

    /// A version suitable for returning to clients:
    /// - keep kind/message/code/class_name/data/errors
    /// - drop the inner `source` (stack/secret details)
    pub fn sanitize_for_client(&self) -> VecinoError {
        VecinoError {
            kind: self.kind,
            message: self.message.clone(),
            data: self.data.clone(),
            errors: self.errors.clone(),
            source: None,
        }
    }

    /// JSON payload for transports.
    pub fn to_json(&self) -> Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(d) = &self.data {
            base["data"] = d.clone();
        }
        if let Some(e) = &self.errors {
            base["errors"] = e.clone();
        }
        base
    }

    // ---- Constructors ----

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_authenticated(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthenticated, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn method_not_allowed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MethodNotAllowed, msg)
    }
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unprocessable, msg)
    }
}

impl fmt::Display for VecinoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for VecinoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Convenience helper for "bail with VecinoError".
#[macro_export]
macro_rules! bail_vecino {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::VecinoError::$ctor($msg).into_anyhow());
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::VecinoError::$ctor(format!($fmt, $($arg)*)).into_anyhow());
    };
}
