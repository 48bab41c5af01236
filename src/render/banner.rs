use figlet_rs::FIGfont;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// One-time cache of validated, safe-to-use FIGlet fonts found on the system.
/// Maps lowercased font name (without .flf) to full file path.
static VALID_FONT_PATHS: OnceCell<HashMap<String, String>> = OnceCell::new();

const FONT_DIRS: &[&str] =
    &["/opt/homebrew/share/figlet/fonts", "/usr/local/share/figlet", "/usr/share/figlet", "/usr/share/figlet/fonts"];

fn validate_font_file(path: &str) -> bool {
    // figlet-rs panics on some fonts rather than erroring
    let loaded = catch_unwind(AssertUnwindSafe(|| FIGfont::from_file(path)));
    let Ok(Ok(font)) = loaded else {
        return false;
    };
    let res = catch_unwind(AssertUnwindSafe(|| font.convert("TEST")));
    matches!(res, Ok(Some(_)))
}

fn build_valid_font_map() -> HashMap<String, String> {
    let mut map = HashMap::new();
    for dir in FONT_DIRS.iter().filter(|d| Path::new(d).is_dir()) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for path in entries.flatten().map(|entry| entry.path()) {
            if path.extension().and_then(|ext| ext.to_str()) != Some("flf") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let path_str = path.to_string_lossy().to_string();
            if validate_font_file(&path_str) {
                map.entry(stem.to_lowercase()).or_insert(path_str);
            } else {
                tracing::debug!("skipping unusable FIGlet font {path_str}");
            }
        }
    }
    map
}

fn valid_fonts() -> &'static HashMap<String, String> {
    VALID_FONT_PATHS.get_or_init(|| {
        let map = build_valid_font_map();
        tracing::info!("detected {} valid FIGlet font(s)", map.len());
        map
    })
}

/// Names of every font that can be used, embedded one included, sorted.
pub(crate) fn available_fonts() -> Vec<String> {
    let mut fonts: Vec<String> = valid_fonts().keys().cloned().collect();
    if !fonts.iter().any(|f| f == "standard") {
        fonts.push("standard".into());
    }
    fonts.sort();
    fonts
}

/// A block of ASCII art text.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Banner {
    pub lines: Vec<String>,
}

impl Banner {
    /// A single line of text rendered as is.
    pub(crate) fn plain(text: &str) -> Self {
        Self { lines: vec![text.to_string()] }
    }

    pub(crate) fn width(&self) -> u16 {
        self.lines.iter().map(|line| line.width()).max().unwrap_or(0).try_into().unwrap_or(u16::MAX)
    }

    pub(crate) fn height(&self) -> u16 {
        self.lines.len().try_into().unwrap_or(u16::MAX)
    }
}

/// Generator for ASCII art banners using FIGlet fonts
pub(crate) struct BannerGenerator {
    font: FIGfont,
}

impl BannerGenerator {
    /// Create a new banner generator with the specified font
    pub(crate) fn new(font_name: &str) -> Result<Self, BannerError> {
        let font = Self::load_font(font_name)?;
        Ok(Self { font })
    }

    /// Generate ASCII art from the given text
    pub(crate) fn generate(&self, text: &str) -> Result<Banner, BannerError> {
        let res = catch_unwind(AssertUnwindSafe(|| self.font.convert(text)));
        let Ok(Some(figure)) = res else {
            return Err(BannerError::ConversionFailed(text.to_string()));
        };
        let mut lines: Vec<String> = figure.to_string().lines().map(|line| line.trim_end().to_string()).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        Ok(Banner { lines })
    }

    /// Generate ASCII art if it fits in `max_width` columns, plain text otherwise.
    pub(crate) fn generate_fitting(&self, text: &str, max_width: u16) -> Banner {
        match self.generate(text) {
            Ok(banner) if banner.width() <= max_width => banner,
            Ok(_) => Banner::plain(text),
            Err(e) => {
                tracing::warn!("{e}, falling back to plain text");
                Banner::plain(text)
            }
        }
    }

    fn load_font(font_name: &str) -> Result<FIGfont, BannerError> {
        let lower = font_name.to_lowercase();
        let result = if lower == "standard" {
            catch_unwind(FIGfont::standard)
        } else {
            // only previously validated fonts, there's no fallback
            let path = valid_fonts().get(&lower).ok_or_else(|| BannerError::FontUnavailable(font_name.to_string()))?;
            catch_unwind(AssertUnwindSafe(|| FIGfont::from_file(path)))
        };
        match result {
            Ok(Ok(font)) => Ok(font),
            Ok(Err(e)) => Err(BannerError::FontLoadFailed(font_name.to_string(), e)),
            Err(_) => Err(BannerError::FontLoadFailed(font_name.to_string(), "panic during font loading".to_string())),
        }
    }
}

/// Errors that can occur when generating banners
#[derive(thiserror::Error, Debug)]
pub enum BannerError {
    #[error("failed to load font '{0}': {1}")]
    FontLoadFailed(String, String),

    #[error("failed to convert text '{0}' to ASCII art")]
    ConversionFailed(String),

    #[error("requested figlet font '{0}' is not available or not validated")]
    FontUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_font() {
        let generator = BannerGenerator::new("standard").expect("failed to create generator");
        let banner = generator.generate("Hello").expect("failed to generate");
        assert!(banner.height() > 1);
        assert!(banner.width() > "Hello".len() as u16);
        assert!(banner.lines.last().is_some_and(|line| !line.is_empty()));
    }

    #[test]
    fn unknown_font_rejected() {
        let result = BannerGenerator::new("nonexistent_font_12345");
        assert!(matches!(result, Err(BannerError::FontUnavailable(_))));
    }

    #[test]
    fn too_wide_falls_back_to_plain() {
        let generator = BannerGenerator::new("standard").expect("failed to create generator");
        let banner = generator.generate_fitting("Hello There", 10);
        assert_eq!(banner, Banner::plain("Hello There"));
    }

    #[test]
    fn standard_always_listed() {
        assert!(available_fonts().contains(&"standard".to_string()));
    }
}
