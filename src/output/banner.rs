//! Section banners framing each result channel.

use terminal_size::{terminal_size, Width};

use super::colors::*;

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const MIN_BANNER_WIDTH: usize = 20;
const MAX_BANNER_WIDTH: usize = 80;

/// Color options for section banners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerColor {
    Cyan,
    Green,
    Red,
    Yellow,
}

impl BannerColor {
    /// Get the ANSI color code for this banner color.
    pub fn ansi_code(&self) -> &'static str {
        match self {
            BannerColor::Cyan => CYAN,
            BannerColor::Green => GREEN,
            BannerColor::Red => RED,
            BannerColor::Yellow => YELLOW,
        }
    }
}

/// Current terminal width, or 80 columns when stdout is not a terminal.
pub fn terminal_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

fn banner_width() -> usize {
    terminal_width().clamp(MIN_BANNER_WIDTH, MAX_BANNER_WIDTH)
}

/// Render `━━━ NAME ━━━` padded to `width` columns.
fn banner_line(name: &str, width: usize) -> String {
    let name_with_spaces = format!(" {} ", name);
    let remaining = width.saturating_sub(name_with_spaces.chars().count());
    let left_padding = remaining / 2;
    let right_padding = remaining - left_padding;
    format!(
        "{}{}{}",
        "━".repeat(left_padding),
        name_with_spaces,
        "━".repeat(right_padding)
    )
}

/// Print a color-coded section banner.
pub fn print_section_banner(name: &str, color: BannerColor) {
    println!(
        "{}{BOLD}{}{RESET}",
        color.ansi_code(),
        banner_line(name, banner_width())
    );
}

/// Print the bottom border closing a section.
pub fn print_section_footer(color: BannerColor) {
    println!(
        "{}{BOLD}{}{RESET}",
        color.ansi_code(),
        "━".repeat(banner_width())
    );
    println!();
}
