/// CLI utilities for consistent output formatting
use std::io::IsTerminal;

/// Get a colored prefix
///
/// Returns bright cyan if stdout is a TTY, plain text otherwise.
pub fn reload_prefix() -> &'static str {
    if std::io::stdout().is_terminal() {
        "\x1b[96m[direnv-reload]\x1b[0m"
    } else {
        "[direnv-reload]"
    }
}
