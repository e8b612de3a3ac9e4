use serde::{Deserialize, Serialize};

/// Cámara preferida (`facingMode` de getUserMedia)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Cámara trasera
    #[default]
    Environment,
    /// Cámara frontal
    User,
}

impl FacingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "environment" => Some(FacingMode::Environment),
            "user" => Some(FacingMode::User),
            _ => None,
        }
    }
}

/// Restricciones de la petición de cámara
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureConstraints {
    pub audio: bool,
    pub facing_mode: FacingMode,
    /// `exact` en vez de `ideal`: sin fallback a otra cámara
    pub facing_mode_required: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            audio: false,
            facing_mode: FacingMode::Environment,
            facing_mode_required: false,
        }
    }
}

impl CaptureConstraints {
    /// Clave de la restricción facingMode: "ideal" o "exact"
    pub fn facing_mode_key(&self) -> &'static str {
        if self.facing_mode_required {
            "exact"
        } else {
            "ideal"
        }
    }
}

/// Frame RGBA leído del canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self { data, width, height }
    }

    /// Frame negro de las dimensiones dadas
    #[cfg(test)]
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(vec![0; width as usize * height as usize * 4], width, height)
    }

    /// Verificar que el buffer tiene exactamente width × height píxeles RGBA
    pub fn is_complete(&self) -> bool {
        self.data.len() == self.width as usize * self.height as usize * 4
    }
}
