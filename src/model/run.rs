//! Positioned text runs as delivered by a PDF source.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A positioned, font-tagged fragment of extracted text.
///
/// Coordinates are PDF user-space points: `y` grows upwards, so larger `y`
/// values are higher on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,
    /// X position of the run origin
    pub x: f32,
    /// Y position of the run baseline
    pub y: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Glyph height in points (0 when unknown)
    pub height: f32,
}

impl TextRun {
    /// Create a new text run.
    pub fn new(
        text: impl Into<String>,
        x: f32,
        y: f32,
        font_name: impl Into<String>,
        height: f32,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_name: font_name.into(),
            height,
        }
    }

    /// Check that the run can be placed on a page.
    pub fn validate(&self) -> Result<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(Error::InvalidTextRun(format!(
                "non-finite position ({}, {}) for {:?}",
                self.x, self.y, self.text
            )));
        }
        Ok(())
    }

    /// Validate a run coming from an external source.
    ///
    /// Runs without a finite position cannot be placed on a line and are
    /// rejected. A non-finite or negative height is treated as unknown.
    pub fn normalized(mut self) -> Option<Self> {
        if let Err(e) = self.validate() {
            log::debug!("Dropping text run: {}", e);
            return None;
        }
        if !self.height.is_finite() || self.height < 0.0 {
            self.height = 0.0;
        }
        Some(self)
    }

    /// Whether the font name marks a bold face.
    pub fn is_bold(&self) -> bool {
        self.font_name.contains("Bold")
    }

    /// Whether the font name marks an italic or oblique face.
    pub fn is_italic(&self) -> bool {
        self.font_name.contains("Italic") || self.font_name.contains("Oblique")
    }

    /// Whether the font name marks a monospaced face.
    pub fn is_monospace(&self) -> bool {
        let lower = self.font_name.to_lowercase();
        lower.contains("mono") || lower.contains("courier")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_style_detection() {
        let run = TextRun::new("Test", 0.0, 0.0, "Helvetica-Bold", 12.0);
        assert!(run.is_bold());
        assert!(!run.is_italic());

        let run = TextRun::new("Test", 0.0, 0.0, "Helvetica-Oblique", 12.0);
        assert!(!run.is_bold());
        assert!(run.is_italic());

        let run = TextRun::new("Test", 0.0, 0.0, "Times-BoldItalic", 12.0);
        assert!(run.is_bold());
        assert!(run.is_italic());
    }

    #[test]
    fn test_monospace_detection() {
        assert!(TextRun::new("x", 0.0, 0.0, "CourierNew", 10.0).is_monospace());
        assert!(TextRun::new("x", 0.0, 0.0, "DejaVuSansMono", 10.0).is_monospace());
        assert!(!TextRun::new("x", 0.0, 0.0, "Helvetica", 10.0).is_monospace());
    }

    #[test]
    fn test_normalized() {
        let run = TextRun::new("a", 1.0, 2.0, "F1", f32::NAN).normalized().unwrap();
        assert_eq!(run.height, 0.0);

        let run = TextRun::new("a", 1.0, 2.0, "F1", -3.0).normalized().unwrap();
        assert_eq!(run.height, 0.0);

        assert!(TextRun::new("a", f32::INFINITY, 2.0, "F1", 10.0)
            .normalized()
            .is_none());
        assert!(TextRun::new("a", 1.0, f32::NAN, "F1", 10.0)
            .normalized()
            .is_none());
        assert!(matches!(
            TextRun::new("a", f32::NAN, 0.0, "F1", 10.0).validate(),
            Err(Error::InvalidTextRun(_))
        ));
    }
}
