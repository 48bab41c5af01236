//! Drawing the page in the terminal.

mod banner;
mod canvas;
mod color;
mod painter;

pub(crate) use banner::{available_fonts, BannerError};
pub(crate) use painter::Painter;
