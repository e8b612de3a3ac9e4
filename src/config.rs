use serde::{Deserialize, Serialize};

use crate::models::{CaptureConstraints, FacingMode};

pub const DEFAULT_CONTAINER_LOCATOR: &str = "#qrcode-scanner";

/// Nivel de wasm_logger: deja pasar todo, el filtro efectivo es log::max_level()
pub const LOGGER_LEVEL: log::Level = log::Level::Debug;

/// Configuración del scanner, inmutable tras la construcción.
/// Los campos ausentes al deserializar toman los valores de `from_env()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default = "ScannerConfig::from_env", rename_all = "camelCase")]
pub struct ScannerConfig {
    /// Selector CSS del elemento raíz del widget
    #[serde(alias = "rootSelector")]
    pub container_locator: String,
    /// Logs de diagnóstico en consola
    pub debug: bool,
    pub constraints: CaptureConstraints,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            container_locator: DEFAULT_CONTAINER_LOCATOR.to_string(),
            debug: false,
            constraints: CaptureConstraints::default(),
        }
    }
}

impl ScannerConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("QR_SCANNER_ROOT"),
            option_env!("QR_SCANNER_DEBUG"),
            option_env!("QR_SCANNER_FACING_MODE"),
            option_env!("QR_SCANNER_FACING_MODE_REQUIRED"),
        )
    }

    fn from_values(
        root: Option<&str>,
        debug: Option<&str>,
        facing_mode: Option<&str>,
        facing_mode_required: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            container_locator: root
                .filter(|value| !value.trim().is_empty())
                .map(|value| value.trim().to_string())
                .unwrap_or(defaults.container_locator),
            debug: debug.and_then(|value| value.parse().ok()).unwrap_or(defaults.debug),
            constraints: CaptureConstraints {
                audio: false,
                facing_mode: facing_mode
                    .and_then(FacingMode::parse)
                    .unwrap_or(defaults.constraints.facing_mode),
                facing_mode_required: facing_mode_required
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(defaults.constraints.facing_mode_required),
            },
        }
    }

    /// Nivel de log para wasm_logger
    pub fn log_level(&self) -> log::Level {
        if self.debug {
            log::Level::Debug
        } else {
            log::Level::Info
        }
    }

    /// Filtro global necesario para esta config: nunca baja el actual,
    /// así un scanner sin debug no silencia a otro con debug
    pub fn max_level_over(&self, current: log::LevelFilter) -> log::LevelFilter {
        current.max(self.log_level().to_level_filter())
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: ScannerConfig = ScannerConfig::from_env();
}
