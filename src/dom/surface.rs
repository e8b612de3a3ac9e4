// ============================================================================
// SCANNER SURFACE - Elementos del widget (raíz, panel, canvas, vídeo)
// ============================================================================
// Markup esperado dentro del elemento raíz:
//   [name=pane-webcam]  panel de la webcam (opcional)
//   [name=btn-webcam]   botón "usar webcam" (opcional)
//   [name=canvas]       <canvas> donde se dibuja cada frame
//   [name=video]        <video> que recibe el stream
// ============================================================================

use futures::future::LocalBoxFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlMediaElement,
    HtmlVideoElement,
};

use crate::dom::{events, find_named, hide, query_selector, show};
use crate::error::ScanError;
use crate::models::Frame;
use crate::services::MediaStream;
use crate::utils::js_error_message;

/// Capacidades del DOM que usa el scanner
pub trait ScannerSurface {
    type Stream: MediaStream + 'static;

    fn show_container(&self);
    fn hide_container(&self);
    /// Mostrar el panel de la webcam y ocultar el botón que lo abre
    fn show_capture_pane(&self);

    fn bind_stream(&self, stream: &Self::Stream);
    /// Se resuelve cuando el vídeo conoce sus dimensiones (loadedmetadata)
    fn metadata_ready(&self) -> LocalBoxFuture<'static, Result<(), ScanError>>;
    /// Un rechazo síncrono de play() se devuelve como error de cámara
    fn play(&self) -> Result<(), ScanError>;
    fn pause(&self);
    fn clear_source(&self);

    /// Dibujar el frame actual en el canvas y leer sus píxeles
    fn capture_frame(&self) -> Result<Frame, ScanError>;
}

/// Resuelve los elementos del widget a partir del selector raíz
pub trait SurfaceResolver {
    type Surface: ScannerSurface;

    fn resolve(&self, locator: &str) -> Result<Self::Surface, ScanError>;
}

/// Document real del navegador
pub struct BrowserDocument {
    document: Document,
}

impl BrowserDocument {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn current() -> Result<Self, ScanError> {
        crate::dom::document()
            .map(Self::new)
            .ok_or_else(|| ScanError::configuration("No document"))
    }
}

impl SurfaceResolver for BrowserDocument {
    type Surface = WebSurface;

    fn resolve(&self, locator: &str) -> Result<WebSurface, ScanError> {
        let root = query_selector(&self.document, locator)
            .map_err(|e| {
                ScanError::configuration(format!("{}: invalid selector ({})", locator, js_error_message(&e)))
            })?
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| {
                ScanError::configuration(format!("{}: QRCodeScanner's root element not found", locator))
            })?;

        let canvas = find_named::<HtmlCanvasElement>(&root, "canvas").ok_or_else(|| {
            ScanError::configuration(format!("canvas[name=canvas] in {} element not found", locator))
        })?;
        let video = find_named::<HtmlVideoElement>(&root, "video").ok_or_else(|| {
            ScanError::configuration(format!("video[name=video] in {} element not found", locator))
        })?;
        let context = context_2d(&canvas)
            .ok_or_else(|| ScanError::configuration("Canvas 2d context not found"))?;

        Ok(WebSurface {
            pane_webcam: find_named(&root, "pane-webcam"),
            btn_webcam: find_named(&root, "btn-webcam"),
            root,
            canvas,
            video,
            context,
        })
    }
}

/// Contexto 2D con willReadFrequently (getImageData en cada frame)
fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &JsValue::from_str("willReadFrequently"), &JsValue::TRUE).ok()?;
    canvas
        .get_context_with_context_options("2d", &options)
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// Referencias tipadas, resueltas una sola vez en la construcción
pub struct WebSurface {
    root: HtmlElement,
    pane_webcam: Option<HtmlElement>,
    btn_webcam: Option<HtmlElement>,
    canvas: HtmlCanvasElement,
    video: HtmlVideoElement,
    context: CanvasRenderingContext2d,
}

impl ScannerSurface for WebSurface {
    type Stream = web_sys::MediaStream;

    fn show_container(&self) {
        show(&self.root);
    }

    fn hide_container(&self) {
        hide(&self.root);
    }

    fn show_capture_pane(&self) {
        if let Some(pane) = &self.pane_webcam {
            show(pane);
        }
        if let Some(button) = &self.btn_webcam {
            hide(button);
        }
    }

    fn bind_stream(&self, stream: &web_sys::MediaStream) {
        self.video.set_src_object(Some(stream));
    }

    fn metadata_ready(&self) -> LocalBoxFuture<'static, Result<(), ScanError>> {
        if self.video.ready_state() >= HtmlMediaElement::HAVE_METADATA {
            return Box::pin(async { Ok(()) });
        }
        let loaded = events::once(self.video.as_ref(), "loadedmetadata");
        Box::pin(async move {
            loaded
                .await
                .map(|_| ())
                .map_err(|e| ScanError::camera_access(js_error_message(&e)))
        })
    }

    fn play(&self) -> Result<(), ScanError> {
        self.video
            .play()
            .map(|_| ())
            .map_err(|e| ScanError::camera_access(js_error_message(&e)))
    }

    fn pause(&self) {
        let _ = self.video.pause();
    }

    fn clear_source(&self) {
        self.video.set_src_object(None);
        let _ = self.video.remove_attribute("src");
    }

    fn capture_frame(&self) -> Result<Frame, ScanError> {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;

        self.context
            .draw_image_with_html_video_element_and_dw_and_dh(&self.video, 0.0, 0.0, width, height)
            .map_err(|e| ScanError::capture(js_error_message(&e)))?;
        let image = self
            .context
            .get_image_data(0.0, 0.0, width, height)
            .map_err(|e| ScanError::capture(js_error_message(&e)))?;

        Ok(Frame::new(image.data().0, image.width(), image.height()))
    }
}
