use crate::foundation::error::{HifzError, HifzResult};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Page geometry constants, all in percent of the page image.
///
/// Converts `(line, word index)` coordinates into overlay rectangles.
pub struct Calibration {
    /// Distance from the image top to the top of line 1.
    pub margin_top: f64,
    /// Distance from the bottom of the last line to the image bottom.
    pub margin_bottom: f64,
    /// Left edge of the text block.
    pub margin_left: f64,
    /// Right edge of the text block (where RTL lines start).
    pub margin_right: f64,
    /// Printed lines per page.
    pub lines_per_page: u32,
    /// Height of one line.
    pub line_height: f64,
}

impl Calibration {
    /// Scanned odd pages (right-hand side of a spread).
    pub const ODD_PAGE: Self = Self {
        margin_top: 12.2,
        margin_bottom: 9.2,
        margin_left: 9.12,
        margin_right: 19.12,
        lines_per_page: 15,
        line_height: 5.10,
    };

    /// Scanned even pages: the odd-page block shifted 0.5 up and 7.5 left.
    pub const EVEN_PAGE: Self = Self {
        margin_top: Self::ODD_PAGE.margin_top - 0.5,
        margin_bottom: Self::ODD_PAGE.margin_bottom + 0.5,
        margin_left: Self::ODD_PAGE.margin_left + 7.5,
        margin_right: Self::ODD_PAGE.margin_right - 7.5,
        lines_per_page: 15,
        line_height: 5.10,
    };

    /// Layout used for the precomputed verse-map artifact.
    pub const VERSE_MAP: Self = Self {
        margin_top: 11.5,
        margin_bottom: 6.0,
        margin_left: 7.0,
        margin_right: 7.0,
        lines_per_page: 15,
        line_height: 5.5,
    };

    /// Calibration matching the side of the spread `page` is printed on.
    pub fn for_page(page: u32) -> Self {
        if page % 2 == 1 {
            Self::ODD_PAGE
        } else {
            Self::EVEN_PAGE
        }
    }

    /// Top edge of `line` (1-based).
    pub fn line_top(&self, line: u32) -> f64 {
        self.margin_top + f64::from(line.saturating_sub(1)) * self.line_height
    }

    /// Usable horizontal extent of a text line.
    pub fn text_width(&self) -> f64 {
        100.0 - self.margin_left - self.margin_right
    }

    /// Width of one word slot on a line holding `total_words` words.
    ///
    /// Words are assumed to share the line evenly.
    pub fn word_width(&self, total_words: usize) -> f64 {
        if total_words == 0 {
            return 0.0;
        }
        self.text_width() / total_words as f64
    }

    /// Reject values that cannot describe a page.
    pub fn validate(&self) -> HifzResult<()> {
        let margins = [
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("marginLeft", self.margin_left),
            ("marginRight", self.margin_right),
        ];
        for (name, v) in margins {
            if !v.is_finite() || !(0.0..100.0).contains(&v) {
                return Err(HifzError::validation(format!(
                    "calibration {name} must be within [0, 100), got {v}"
                )));
            }
        }
        if self.lines_per_page == 0 {
            return Err(HifzError::validation(
                "calibration linesPerPage must be > 0",
            ));
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(HifzError::validation(
                "calibration lineHeight must be > 0",
            ));
        }
        if self.text_width() <= 0.0 {
            return Err(HifzError::validation(
                "calibration left+right margins leave no text width",
            ));
        }
        if self.margin_top + self.margin_bottom >= 100.0 {
            return Err(HifzError::validation(
                "calibration top+bottom margins leave no text height",
            ));
        }
        Ok(())
    }

    /// Load a calibration from a JSON file (same shape as the artifact's `metadata.layout`).
    pub fn from_path(path: impl AsRef<std::path::Path>) -> HifzResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            HifzError::validation(format!("read calibration '{}': {e}", path.display()))
        })?;
        let cal: Self = serde_json::from_slice(&bytes)
            .map_err(|e| HifzError::serde(format!("parse calibration JSON: {e}")))?;
        cal.validate()?;
        Ok(cal)
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::VERSE_MAP
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/calibration.rs"]
mod tests;
