// ============================================================================
// DECODER SERVICE - Decodificación QR de un frame RGBA
// ============================================================================

use crate::models::{Point, QrCode};

/// Decodificador externo: `None` significa "todavía no hay código"
pub trait Decoder {
    type Output: 'static;

    /// `pixels` es RGBA, width × height píxeles; no se modifica
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<Self::Output>;
}

impl<F, T> Decoder for F
where
    F: Fn(&[u8], u32, u32) -> Option<T>,
    T: 'static,
{
    type Output = T;

    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<T> {
        self(pixels, width, height)
    }
}

/// Decodificador QR basado en rqrr
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder {
    debug: bool,
}

impl RqrrDecoder {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl Decoder for RqrrDecoder {
    type Output = QrCode;

    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<QrCode> {
        let (w, h) = (width as usize, height as usize);
        if w == 0 || h == 0 || pixels.len() < w * h * 4 {
            return None;
        }

        let mut image = rqrr::PreparedImage::prepare_from_greyscale(w, h, |x, y| {
            let offset = (y * w + x) * 4;
            luma(pixels[offset], pixels[offset + 1], pixels[offset + 2])
        });

        image.detect_grids().into_iter().find_map(|grid| match grid.decode() {
            Ok((meta, content)) => Some(QrCode {
                data: content,
                version: meta.version.0,
                ecc_level: meta.ecc_level,
                location: grid.bounds.map(|corner| Point {
                    x: corner.x,
                    y: corner.y,
                }),
            }),
            Err(e) => {
                if self.debug {
                    log::debug!("🔍 [DECODER] Grid detectado pero no decodificable: {}", e);
                }
                None
            }
        })
    }
}

/// Luminancia BT.601
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}
