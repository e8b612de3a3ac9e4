// ============================================================================
// QR WEBCAM SCANNER - Widget de escaneo QR (RUST PURO + WASM)
// ============================================================================
// Arquitectura:
// - ViewModels: Scanner (ciclo open → cámara → muestreo → finish)
// - Services: cámara (getUserMedia) y decodificador QR (rqrr)
// - DOM: elementos del widget resueltos una vez, helpers y eventos
// - State: sesión con Rc<RefCell> y token de cancelación
// - Models: restricciones de captura, frames y resultado QR
// ============================================================================

pub mod bindings;
pub mod config;
pub mod dom;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

#[cfg(test)]
mod testing;

pub use bindings::QrCodeScanner;
pub use config::ScannerConfig;
pub use error::ScanError;
pub use viewmodels::{Scanner, RETRY_DELAY};

use wasm_bindgen::prelude::*;
use wasm_logger::Config;

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Inicializar panic hook para mejor debugging
    console_error_panic_hook::set_once();

    // Inicializar logging: el logger acepta debug y el filtro global sigue a CONFIG.
    // Cada QRCodeScanner con debug: true lo sube al construirse.
    wasm_logger::init(Config::new(config::LOGGER_LEVEL));
    log::set_max_level(config::CONFIG.log_level().to_level_filter());
    log::info!("📷 QR Webcam Scanner - Rust Puro + WASM");

    Ok(())
}
