use crossterm::style::Color;

pub const GREEN: Color = Color::Rgb { r: 166, g: 227, b: 161 };
pub const RED: Color = Color::Rgb { r: 243, g: 139, b: 168 };
pub const YELLOW: Color = Color::Rgb { r: 249, g: 226, b: 175 };
pub const BLUE: Color = Color::Rgb { r: 137, g: 180, b: 250 };
pub const GRAY: Color = Color::Rgb { r: 147, g: 153, b: 178 };
pub const MAGENTA: Color = Color::Rgb { r: 245, g: 194, b: 231 };
pub const CYAN: Color = Color::Rgb { r: 148, g: 226, b: 213 };
