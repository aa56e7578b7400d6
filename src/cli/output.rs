//! Styled terminal messages.

use crossterm::style::Stylize;

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn info(message: &str) {
    println!("{}", message.blue());
}

/// Hint or notice; goes to stderr so it never mixes with piped output.
pub fn warn(message: &str) {
    eprintln!("{}", message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{}", message.red());
}

/// Check mark or cross for presence flags in listings.
pub fn mark(present: bool) -> String {
    if present {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// One-time notice printed when the secure backend could not be used.
pub fn warn_fallback(reason: &str, document: &std::path::Path) {
    warn(&format!(
        "⚠️  Secure credential storage not available ({}), using insecure local file storage",
        reason
    ));
    warn(&format!(
        "   Credentials will be stored in plaintext at {}",
        document.display()
    ));
}
