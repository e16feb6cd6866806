//! Styled console messages.

use console::style;

/// Kind of status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
}

impl Tone {
    fn tag(self) -> &'static str {
        match self {
            Self::Success => "[OK]",
            Self::Warning => "[WARN]",
            Self::Error => "[ERROR]",
        }
    }
}

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var_os("NO_COLOR").is_some()
}

/// A tagged status line, colored unless `plain`.
#[must_use]
pub fn status_line(tone: Tone, text: &str, plain: bool) -> String {
    let tag = tone.tag();
    if plain {
        return format!("{tag} {text}");
    }
    let tag = match tone {
        Tone::Success => style(tag).green().bold(),
        Tone::Warning => style(tag).yellow().bold(),
        Tone::Error => style(tag).red().bold(),
    };
    format!("{tag} {text}")
}

/// A section header, colored unless `plain`.
#[must_use]
pub fn header_line(text: &str, plain: bool) -> String {
    let line = format!("=== {text} ===");
    if plain {
        line
    } else {
        style(line).bold().cyan().to_string()
    }
}

/// Print a section header on stdout.
pub fn print_header(text: &str) {
    println!("\n{}", header_line(text, is_color_disabled()));
}

/// Print a success message on stdout.
pub fn print_success(text: &str) {
    println!("{}", status_line(Tone::Success, text, is_color_disabled()));
}

/// Print a warning on stderr.
pub fn print_warning(text: &str) {
    eprintln!("{}", status_line(Tone::Warning, text, is_color_disabled()));
}

/// Print an error on stderr.
pub fn print_error(text: &str) {
    eprintln!("{}", status_line(Tone::Error, text, is_color_disabled()));
}
