//! Basic message output functions.

use super::colors::*;
use crate::presenter::{StatusKind, StatusMessage};

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{RED}{BOLD}Error:{RESET} {}", msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    println!("{YELLOW}Warning:{RESET} {}", msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{CYAN}Info:{RESET} {}", msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{GREEN}\u{2714}{RESET} {}", msg);
}

/// Print a status line with the color matching its kind.
pub fn print_status(status: &StatusMessage) {
    match status.kind {
        StatusKind::Info => print_info(&status.text),
        StatusKind::Success => print_success(&status.text),
        StatusKind::Warning => print_warning(&status.text),
        StatusKind::Error => print_error(&status.text),
    }
}
