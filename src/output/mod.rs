//! Terminal output formatting for the headless commands.
//!
//! - [`banner`] - Section banners framing each result channel
//! - [`messages`] - Error, warning, info and success lines
//! - [`table`] - Plain-text symbol table

pub mod banner;
pub mod messages;
pub mod table;

/// ANSI color codes for terminal output.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
}

pub use colors::*;

pub use banner::{print_section_banner, print_section_footer, terminal_width, BannerColor};
pub use messages::{print_error, print_info, print_status, print_success, print_warning};
pub use table::format_symbol_table;
