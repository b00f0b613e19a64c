//! Value types for color conversion and light control parameters.

mod brightness;
mod color;
mod hsl;
mod hue;
mod power;

pub use brightness::Brightness;
pub use color::{HexColor, Rgb};
pub use hsl::Hsl;
pub use hue::Hue;
pub use power::PowerMode;
