// ============================================================================
// BINDINGS JS - Clase QRCodeScanner expuesta con wasm_bindgen
// ============================================================================
// const scanner = new QRCodeScanner({
//     rootSelector: "#qrcode-scanner",
//     debug: true,
//     constraints: { facingMode: "environment" },
// });
// scanner.open((err, data) => { ... });
// button.onclick = () => scanner.startWebcam();
// ============================================================================

use wasm_bindgen::prelude::*;

use crate::config::{ScannerConfig, CONFIG};
use crate::dom::{BrowserDocument, WebSurface};
use crate::error::ScanError;
use crate::services::{BrowserCamera, RqrrDecoder};
use crate::utils::Runtime;
use crate::viewmodels::Scanner;

type WebScanner = Scanner<WebSurface, BrowserCamera, RqrrDecoder>;

#[wasm_bindgen(js_name = QRCodeScanner)]
pub struct QrCodeScanner {
    scanner: WebScanner,
}

#[wasm_bindgen(js_class = QRCodeScanner)]
impl QrCodeScanner {
    /// Lanza un Error con name = "ConfigurationError" si las opciones no son
    /// válidas o falta algún elemento
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<QrCodeScanner, JsValue> {
        let config = config_from_options(options)?;

        // Un scanner con debug sube el filtro global de log
        log::set_max_level(config.max_level_over(log::max_level()));

        let document = BrowserDocument::current()?;
        let decoder = RqrrDecoder::new(config.debug);
        let scanner = Scanner::new(config, &document, BrowserCamera, decoder, Runtime::browser())?;
        Ok(Self { scanner })
    }

    /// Guardar el callback `(err, data)` y mostrar el widget
    pub fn open(&self, callback: Option<js_sys::Function>) {
        self.scanner.open(move |outcome| {
            let Some(callback) = callback else {
                return;
            };
            let (error, data) = match outcome {
                Ok(code) => match serde_wasm_bindgen::to_value(&code) {
                    Ok(data) => (JsValue::UNDEFINED, data),
                    Err(e) => {
                        log::error!("❌ [SCANNER] Error serializando el resultado: {}", e);
                        (JsValue::from(e), JsValue::UNDEFINED)
                    }
                },
                Err(error) => (JsValue::from(error), JsValue::UNDEFINED),
            };
            if let Err(e) = callback.call2(&JsValue::NULL, &error, &data) {
                log::error!("❌ [SCANNER] El callback lanzó una excepción: {:?}", e);
            }
        });
    }

    #[wasm_bindgen(js_name = startWebcam)]
    pub fn start_webcam(&self) {
        self.scanner.start_capture();
    }

    /// Detener la cámara sin notificar al callback
    pub fn stop(&self) {
        self.scanner.stop();
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.scanner.phase().as_str().to_string()
    }

    #[wasm_bindgen(getter, js_name = rootSelector)]
    pub fn root_selector(&self) -> String {
        self.scanner.config().container_locator.clone()
    }
}

/// Sin opciones se usa CONFIG; los campos ausentes también salen de ahí
fn config_from_options(options: JsValue) -> Result<ScannerConfig, ScanError> {
    if options.is_undefined() || options.is_null() {
        return Ok(CONFIG.clone());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| ScanError::configuration(format!("Opciones no válidas: {}", e)))
}
