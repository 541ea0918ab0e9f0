use ratatui::style::Color;

// Foreground-only palette: the terminal's own background always shows through.
pub const MUTED: Color = Color::Rgb(156, 163, 175);
pub const DIM: Color = Color::Rgb(107, 114, 128);
pub const BORDER: Color = Color::Rgb(55, 65, 81);

pub const ACCENT: Color = Color::Rgb(255, 159, 26);

pub const ERROR: Color = Color::Rgb(248, 113, 113); // soft red
