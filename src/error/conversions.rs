//! Conversions from foreign error types into FluxError

use super::{ErrorKind, FluxError};

impl From<std::io::Error> for FluxError {
    fn from(err: std::io::Error) -> Self {
        FluxError::new(ErrorKind::IoError, err.to_string())
    }
}

impl From<serde_json::Error> for FluxError {
    fn from(err: serde_json::Error) -> Self {
        FluxError::new(ErrorKind::SerializationError, err.to_string())
    }
}

/// Helper trait for converting plain messages to FluxError
pub trait IntoFluxError {
    fn into_flux_error(self, kind: ErrorKind) -> FluxError;

    fn into_internal_error(self) -> FluxError
    where
        Self: Sized,
    {
        self.into_flux_error(ErrorKind::InternalError)
    }
}

impl IntoFluxError for String {
    fn into_flux_error(self, kind: ErrorKind) -> FluxError {
        FluxError::new(kind, self)
    }
}

impl IntoFluxError for &str {
    fn into_flux_error(self, kind: ErrorKind) -> FluxError {
        FluxError::new(kind, self)
    }
}
