use std::fmt;

use colored::Colorize;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "[i]",
        MessageKind::Success => "[ok]",
        MessageKind::Warning => "[!]",
        MessageKind::Error => "[x]",
        MessageKind::Section => "",
    }
}

pub fn render(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Info => format!("{} {text}", label(kind)),
        MessageKind::Success => format!("{} {text}", label(kind)).bright_green().to_string(),
        MessageKind::Warning => format!("{} {text}", label(kind)).bright_yellow().to_string(),
        MessageKind::Error => format!("{} {text}", label(kind)).bright_red().to_string(),
    }
}

pub fn info(message: impl fmt::Display) {
    println!("{}", render(MessageKind::Info, message));
}

pub fn success(message: impl fmt::Display) {
    println!("{}", render(MessageKind::Success, message));
}

pub fn warning(message: impl fmt::Display) {
    println!("{}", render(MessageKind::Warning, message));
}

pub fn error(message: impl fmt::Display) {
    eprintln!("{}", render(MessageKind::Error, message));
}

pub fn section(title: impl fmt::Display) {
    println!("\n{}", render(MessageKind::Section, title));
}

/// Prints an aligned `label  value` row.
pub fn row(label: impl fmt::Display, value: impl fmt::Display) {
    println!("  {:<24} {}", label.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_render_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(render(MessageKind::Success, "saved"), "[ok] saved");
        assert_eq!(render(MessageKind::Section, " Budgets "), "=== Budgets ===");
        colored::control::unset_override();
    }
}
