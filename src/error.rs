// ============================================================================
// ERRORES DEL SCANNER
// ============================================================================
// Configuration: síncrono, en la construcción
// CameraAccess / Capture: asíncronos, vía el callback de la sesión
// ============================================================================

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Falta un elemento del DOM o el contexto 2D
    #[error("{0}")]
    Configuration(String),

    /// Permiso denegado, sin dispositivo o fallo de getUserMedia
    #[error("{0}")]
    CameraAccess(String),

    /// Fallo al dibujar o leer el frame del canvas
    #[error("{0}")]
    Capture(String),
}

impl ScanError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn camera_access(message: impl Into<String>) -> Self {
        Self::CameraAccess(message.into())
    }

    pub fn capture(message: impl Into<String>) -> Self {
        Self::Capture(message.into())
    }

    /// Nombre del error expuesto a JavaScript (`error.name`)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "ConfigurationError",
            Self::CameraAccess(_) => "CameraAccessError",
            Self::Capture(_) => "CaptureError",
        }
    }
}

impl From<ScanError> for JsValue {
    fn from(error: ScanError) -> Self {
        let js_error = js_sys::Error::new(&error.to_string());
        js_error.set_name(error.kind());
        js_error.into()
    }
}
