use pango::{FontDescription, Style, Weight};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub const DEFAULT_FONT_SIZE_PX: f64 = 11.0;
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Font selection used to lay out and measure labels through Pango.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Comma separated family list, handed to fontconfig as is.
    pub family: String,
    pub size_px: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::with_size(DEFAULT_FONT_SIZE_PX)
    }
}

impl FontSpec {
    #[must_use]
    pub fn with_size(size_px: f64) -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_owned(),
            size_px,
            bold: false,
            italic: false,
        }
    }

    /// Reads a CSS-like font string such as `"bold 12px Helvetica, sans-serif"`.
    ///
    /// Style keywords precede the `<n>px` size token and the family list
    /// follows it. Returns `None` when no usable size token is present.
    #[must_use]
    pub fn from_css_font(font: &str) -> Option<Self> {
        let tokens: SmallVec<[&str; 6]> = font.split_whitespace().collect();
        let size_index = tokens.iter().position(|token| {
            token
                .strip_suffix("px")
                .and_then(|size| size.parse::<f64>().ok())
                .is_some_and(|size| size.is_finite() && size > 0.0)
        })?;
        let size_px = tokens[size_index]
            .strip_suffix("px")
            .and_then(|size| size.parse::<f64>().ok())?;

        let mut spec = Self::with_size(size_px);
        for keyword in &tokens[..size_index] {
            match keyword.to_ascii_lowercase().as_str() {
                "bold" | "bolder" | "600" | "700" | "800" | "900" => spec.bold = true,
                "italic" | "oblique" => spec.italic = true,
                _ => {}
            }
        }
        let family = tokens[size_index + 1..]
            .join(" ")
            .replace(['"', '\''], "");
        if !family.trim().is_empty() {
            spec.family = family.trim().to_owned();
        }
        Some(spec)
    }

    #[must_use]
    pub fn to_pango(&self) -> FontDescription {
        let mut description = FontDescription::new();
        description.set_family(&self.family);
        description.set_absolute_size(self.size_px * f64::from(pango::SCALE));
        description.set_weight(if self.bold { Weight::Bold } else { Weight::Normal });
        description.set_style(if self.italic { Style::Italic } else { Style::Normal });
        description
    }
}
