//! Scannable code images for asset tags.
//!
//! The image is a pure function of the tag, so regenerating it after a tag
//! change is just calling the generator again.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use qrcode::render::svg;
use qrcode::QrCode;

use crate::error::CoreError;

/// Default rendered edge length, in pixels.
pub const DEFAULT_QR_SIZE: u32 = 200;

/// Renders a payload into an embeddable image string.
pub trait CodeImageGenerator: Send + Sync {
    fn generate(&self, payload: &str) -> Result<String, CoreError>;
}

/// QR code rendered as SVG and wrapped in a `data:` URL.
#[derive(Debug, Clone, Copy)]
pub struct QrCodeGenerator {
    pub min_size: u32,
}

impl Default for QrCodeGenerator {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_QR_SIZE,
        }
    }
}

impl CodeImageGenerator for QrCodeGenerator {
    fn generate(&self, payload: &str) -> Result<String, CoreError> {
        let code = QrCode::new(payload.as_bytes()).map_err(|e| {
            CoreError::Validation(format!("cannot encode '{payload}' as a QR code: {e}"))
        })?;
        let image = code
            .render::<svg::Color<'_>>()
            .min_dimensions(self.min_size, self.min_size)
            .build();
        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_svg_data_url() {
        let url = QrCodeGenerator::default().generate("LAP-001").unwrap();
        assert!(url.starts_with("data:image/svg+xml;base64,"));

        let encoded = url.trim_start_matches("data:image/svg+xml;base64,");
        let svg = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn same_tag_same_image() {
        let gen = QrCodeGenerator::default();
        assert_eq!(gen.generate("LAP-001").unwrap(), gen.generate("LAP-001").unwrap());
        assert_ne!(gen.generate("LAP-001").unwrap(), gen.generate("LAP-002").unwrap());
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = "X".repeat(8000);
        assert!(QrCodeGenerator::default().generate(&payload).is_err());
    }
}
