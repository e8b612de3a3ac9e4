// ============================================================================
// ELEMENT HELPERS - Funciones básicas para manipular DOM
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

/// Obtener window global
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Obtener document
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Query selector sobre el document
pub fn query_selector(document: &Document, selector: &str) -> Result<Option<Element>, JsValue> {
    document.query_selector(selector)
}

/// Buscar un descendiente `[name="..."]` y convertirlo al tipo esperado
pub fn find_named<T: JsCast>(root: &Element, name: &str) -> Option<T> {
    root.query_selector(&format!("[name=\"{}\"]", name))
        .ok()
        .flatten()?
        .dyn_into::<T>()
        .ok()
}

/// Mostrar elemento (como jQuery `.show()`)
pub fn show(element: &HtmlElement) {
    let style = element.style();
    let _ = style.remove_property("display");

    // Si una hoja de estilos lo oculta, forzar display visible
    let hidden_by_css = window()
        .and_then(|win| win.get_computed_style(element).ok().flatten())
        .and_then(|computed| computed.get_property_value("display").ok())
        .map(|display| display == "none")
        .unwrap_or(false);
    if hidden_by_css {
        let _ = style.set_property("display", "block");
    }
}

/// Ocultar elemento (display: none)
pub fn hide(element: &HtmlElement) {
    let _ = element.style().set_property("display", "none");
}
