// ============================================================================
// SCANNER VIEWMODEL - Ciclo de vida del scanner QR
// ============================================================================
// Idle → open → Opened → start_capture → Acquiring → {Sampling ⇄ RetryWait}
//   → finish → Finished
// stop() cancela el token de la sesión: el bucle sale en su siguiente tick
// SIN invocar el callback.
// ============================================================================

use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::ScannerConfig;
use crate::dom::{ScannerSurface, SurfaceResolver};
use crate::error::ScanError;
use crate::services::{Camera, Decoder, MediaStream};
use crate::state::{CancelToken, ScannerPhase, SessionState};
use crate::utils::Runtime;

/// Espera entre dos intentos de decodificación
pub const RETRY_DELAY: Duration = Duration::from_millis(1000);

pub struct Scanner<S, C, D>
where
    S: ScannerSurface + 'static,
    C: Camera<Stream = S::Stream> + 'static,
    D: Decoder + 'static,
{
    inner: Rc<ScannerInner<S, C, D>>,
}

struct ScannerInner<S, C, D>
where
    S: ScannerSurface,
    D: Decoder,
{
    config: ScannerConfig,
    surface: S,
    camera: C,
    decoder: D,
    runtime: Runtime,
    session: RefCell<SessionState<S::Stream, D::Output>>,
}

impl<S, C, D> Clone for Scanner<S, C, D>
where
    S: ScannerSurface + 'static,
    C: Camera<Stream = S::Stream> + 'static,
    D: Decoder + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S, C, D> Scanner<S, C, D>
where
    S: ScannerSurface + 'static,
    C: Camera<Stream = S::Stream> + 'static,
    D: Decoder + 'static,
{
    /// Resolver los elementos del widget. Todo o nada: si falta alguno
    /// no se crea el scanner ni se toca el DOM.
    pub fn new<R>(
        config: ScannerConfig,
        resolver: &R,
        camera: C,
        decoder: D,
        runtime: Runtime,
    ) -> Result<Self, ScanError>
    where
        R: SurfaceResolver<Surface = S>,
    {
        let surface = resolver.resolve(&config.container_locator)?;
        if config.debug {
            log::debug!("📷 [SCANNER] Widget resuelto en {}", config.container_locator);
        }

        Ok(Self {
            inner: Rc::new(ScannerInner {
                config,
                surface,
                camera,
                decoder,
                runtime,
                session: RefCell::new(SessionState::new()),
            }),
        })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.inner.config
    }

    pub fn phase(&self) -> ScannerPhase {
        self.inner.session.borrow().phase
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.session.borrow().token.is_cancelled()
    }

    /// Guardar el callback y mostrar el widget. No arranca la cámara.
    pub fn open<F>(&self, callback: F)
    where
        F: FnOnce(Result<D::Output, ScanError>) + 'static,
    {
        {
            let mut session = self.inner.session.borrow_mut();
            session.callback = Some(Box::new(callback));
            if !session.phase.is_active() {
                session.phase = ScannerPhase::Opened;
            }
        }
        self.inner.surface.show_container();
    }

    /// Pedir la cámara y empezar a muestrear
    pub fn start_capture(&self) {
        if self.phase().is_active() {
            if self.inner.config.debug {
                log::warn!("⚠️ [SCANNER] start_capture() con una sesión activa, ignorado");
            }
            return;
        }

        self.inner.surface.show_capture_pane();

        let token = CancelToken::new();
        {
            let mut session = self.inner.session.borrow_mut();
            session.token = token.clone();
            session.phase = ScannerPhase::Acquiring;
        }
        if self.inner.config.debug {
            log::debug!(
                "📷 [SCANNER] Pidiendo cámara ({})",
                self.inner.config.constraints.facing_mode.as_str()
            );
        }

        let request = self.inner.camera.request_stream(&self.inner.config.constraints);
        let scanner = self.clone();
        self.inner
            .runtime
            .spawner
            .spawn(Box::pin(async move { scanner.run_session(token, request).await }));
    }

    /// Parada externa: libera la cámara y marca la sesión como detenida.
    /// Nunca invoca el callback. Idempotente.
    pub fn stop(&self) {
        let (stream, token) = {
            let mut session = self.inner.session.borrow_mut();
            if session.phase.is_active() {
                session.phase = ScannerPhase::Cancelled;
            }
            (session.stream.take(), session.token.clone())
        };

        self.stop_webcam(stream);
        if token.cancel() && self.inner.config.debug {
            log::debug!("⏹️ [SCANNER] Sesión cancelada");
        }
    }

    async fn run_session(
        self,
        token: CancelToken,
        request: LocalBoxFuture<'static, Result<S::Stream, ScanError>>,
    ) {
        let stream = match request.await {
            Ok(stream) => stream,
            Err(error) => {
                if self.inner.config.debug {
                    log::error!("❌ [SCANNER] Excepción en start_capture(): {}", error);
                }
                self.finish(&token, Err(error));
                return;
            }
        };

        // Cancelado mientras se concedía el permiso: soltar la cámara y salir
        if token.is_cancelled() {
            stream.stop_tracks();
            return;
        }

        self.inner.surface.bind_stream(&stream);
        let metadata = self.inner.surface.metadata_ready();
        self.inner.session.borrow_mut().stream = Some(stream);

        if let Err(error) = metadata.await {
            self.finish(&token, Err(error));
            return;
        }
        if token.is_cancelled() {
            return;
        }

        // Un play() rechazado no es fatal: el frame se sigue leyendo del video
        if let Err(error) = self.inner.surface.play() {
            if self.inner.config.debug {
                log::warn!("⚠️ [SCANNER] video.play() falló: {}", error);
            }
        }
        self.sample(&token).await;
    }

    /// Bucle de muestreo: frame → decode → reintento o fin
    async fn sample(&self, token: &CancelToken) {
        let mut attempts: u32 = 0;
        loop {
            if token.is_cancelled() {
                // NOTA: una sesión detenida desde fuera no llama al callback
                if self.inner.config.debug {
                    log::debug!("⏹️ [SCANNER] Muestreo detenido tras {} intentos", attempts);
                }
                return;
            }

            self.set_phase(ScannerPhase::Sampling);
            attempts += 1;

            let decoded = self
                .inner
                .surface
                .capture_frame()
                .and_then(|frame| {
                    if frame.is_complete() {
                        Ok(frame)
                    } else {
                        Err(ScanError::capture(format!(
                            "Frame incompleto: {} bytes para {}x{}",
                            frame.data.len(),
                            frame.width,
                            frame.height
                        )))
                    }
                })
                .map(|frame| self.inner.decoder.decode(&frame.data, frame.width, frame.height));

            match decoded {
                Ok(Some(result)) => {
                    if self.inner.config.debug {
                        log::info!("✅ [SCANNER] Código encontrado en el intento {}", attempts);
                    }
                    self.finish(token, Ok(result));
                    return;
                }
                Ok(None) => {
                    self.set_phase(ScannerPhase::RetryWait);
                    self.inner.runtime.clock.sleep(RETRY_DELAY).await;
                }
                Err(error) => {
                    if self.inner.config.debug {
                        log::error!("❌ [SCANNER] Error capturando frame: {}", error);
                    }
                    self.finish(token, Err(error));
                    return;
                }
            }
        }
    }

    /// Transición terminal de la sesión. Una sesión ya detenida no notifica.
    fn finish(&self, token: &CancelToken, outcome: Result<D::Output, ScanError>) {
        if token.is_cancelled() {
            return;
        }

        let (stream, callback) = {
            let mut session = self.inner.session.borrow_mut();
            session.phase = ScannerPhase::Finished;
            (session.stream.take(), session.callback.take())
        };

        self.stop_webcam(stream);
        token.cancel();
        self.inner.surface.hide_container();

        if let Some(callback) = callback {
            callback(outcome);
        }
    }

    fn stop_webcam(&self, stream: Option<S::Stream>) {
        self.inner.surface.pause();
        self.inner.surface.clear_source();
        if let Some(stream) = stream {
            stream.stop_tracks();
        }
    }

    fn set_phase(&self, phase: ScannerPhase) {
        self.inner.session.borrow_mut().phase = phase;
    }
}
