// ============================================================================
// CAMERA SERVICE - Acceso a la cámara (getUserMedia)
// ============================================================================

use futures::future::LocalBoxFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaStreamConstraints, MediaStreamTrack};

use crate::error::ScanError;
use crate::models::CaptureConstraints;
use crate::utils::js_error_message;

/// Stream de vídeo adquirido
pub trait MediaStream {
    /// Detener todas las pistas del stream
    fn stop_tracks(&self);
}

/// Subsistema de cámara del host
pub trait Camera {
    type Stream: MediaStream + 'static;

    fn request_stream(
        &self,
        constraints: &CaptureConstraints,
    ) -> LocalBoxFuture<'static, Result<Self::Stream, ScanError>>;
}

impl MediaStream for web_sys::MediaStream {
    fn stop_tracks(&self) {
        for track in self.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

/// navigator.mediaDevices del navegador
pub struct BrowserCamera;

impl Camera for BrowserCamera {
    type Stream = web_sys::MediaStream;

    fn request_stream(
        &self,
        constraints: &CaptureConstraints,
    ) -> LocalBoxFuture<'static, Result<web_sys::MediaStream, ScanError>> {
        // La petición se lanza ya; el future solo espera la respuesta
        let request = build_constraints(constraints).and_then(|constraints| {
            web_sys::window()
                .ok_or_else(|| JsValue::from_str("No window"))?
                .navigator()
                .media_devices()?
                .get_user_media_with_constraints(&constraints)
        });

        Box::pin(async move {
            let promise = request.map_err(|e| ScanError::camera_access(js_error_message(&e)))?;
            let stream = JsFuture::from(promise)
                .await
                .map_err(|e| ScanError::camera_access(js_error_message(&e)))?;
            stream
                .dyn_into::<web_sys::MediaStream>()
                .map_err(|_| ScanError::camera_access("getUserMedia did not return a MediaStream"))
        })
    }
}

/// { audio: false, video: { facingMode: { ideal: "environment" } } }
fn build_constraints(constraints: &CaptureConstraints) -> Result<MediaStreamConstraints, JsValue> {
    let facing_mode = js_sys::Object::new();
    js_sys::Reflect::set(
        &facing_mode,
        &JsValue::from_str(constraints.facing_mode_key()),
        &JsValue::from_str(constraints.facing_mode.as_str()),
    )?;

    let video = js_sys::Object::new();
    js_sys::Reflect::set(&video, &JsValue::from_str("facingMode"), &facing_mode)?;

    let media_constraints = MediaStreamConstraints::new();
    media_constraints.set_audio(&JsValue::from_bool(constraints.audio));
    media_constraints.set_video(&video);
    Ok(media_constraints)
}
