// ============================================================================
// EVENT HANDLING - Eventos del DOM como futures
// ============================================================================
// El listener se registra con { once: true } y la función `resolve` de la
// Promise hace de callback: no hace falta Closure ni closure.forget().
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AddEventListenerOptions, EventTarget};

/// Future que se resuelve con el primer `event_type` disparado en `target`.
/// El listener queda registrado en el momento de la llamada.
pub fn once(target: &EventTarget, event_type: &str) -> JsFuture {
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
            event_type, &resolve, &options,
        ) {
            let _ = reject.call1(&JsValue::NULL, &e);
        }
    });
    JsFuture::from(promise)
}
