// ============================================================================
// SESSION STATE - Estado de una sesión de escaneo
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::error::ScanError;

/// Callback de fin de sesión: se invoca como mucho una vez
pub type ScanCallback<T> = Box<dyn FnOnce(Result<T, ScanError>)>;

/// Flag `stopped` de una sesión. Cada start_capture crea uno nuevo;
/// una vez cancelado no vuelve a estar activo.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token ya cancelado (estado inicial, sin sesión)
    pub fn cancelled() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    /// Cancelar; devuelve true si estaba activo
    pub fn cancel(&self) -> bool {
        !self.0.replace(true)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerPhase {
    Idle,
    Opened,
    Acquiring,
    Sampling,
    RetryWait,
    Finished,
    Cancelled,
}

impl ScannerPhase {
    /// Hay una sesión en marcha (cámara pedida o muestreando)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ScannerPhase::Acquiring | ScannerPhase::Sampling | ScannerPhase::RetryWait
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScannerPhase::Idle => "idle",
            ScannerPhase::Opened => "opened",
            ScannerPhase::Acquiring => "acquiring",
            ScannerPhase::Sampling => "sampling",
            ScannerPhase::RetryWait => "retry-wait",
            ScannerPhase::Finished => "finished",
            ScannerPhase::Cancelled => "cancelled",
        }
    }
}

/// Estado mutable del scanner
pub struct SessionState<S, T> {
    pub phase: ScannerPhase,
    pub stream: Option<S>,
    pub token: CancelToken,
    pub callback: Option<ScanCallback<T>>,
}

impl<S, T> SessionState<S, T> {
    pub fn new() -> Self {
        Self {
            phase: ScannerPhase::Idle,
            stream: None,
            token: CancelToken::cancelled(),
            callback: None,
        }
    }
}

impl<S, T> Default for SessionState<S, T> {
    fn default() -> Self {
        Self::new()
    }
}
