// Utils compartidos

pub mod timer;

pub use timer::*;

use wasm_bindgen::{JsCast, JsValue};

/// Texto legible de una excepción JS (DOMException, Error o string)
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(exception) = value.dyn_ref::<web_sys::DomException>() {
        return format!("{}: {}", exception.name(), exception.message());
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
