use serde::{Deserialize, Serialize};

/// Esquina del código en coordenadas del canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Resultado de un escaneo exitoso
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    /// Contenido decodificado
    pub data: String,
    pub version: usize,
    pub ecc_level: u16,
    /// Esquinas: superior izquierda, superior derecha, inferior derecha, inferior izquierda
    pub location: [Point; 4],
}
