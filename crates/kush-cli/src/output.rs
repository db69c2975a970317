//! Colored terminal output for CLI commands.
//!
//! Uses `termcolor` for cross-platform colored terminal output.
//! Respects `NO_COLOR` environment variable and `--color` flag.

use clap::ValueEnum;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Value of the `--color` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorWhen {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(when: ColorWhen) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match when {
        ColorWhen::Auto => ColorChoice::Auto,
        ColorWhen::Always => ColorChoice::Always,
        ColorWhen::Never => ColorChoice::Never,
    }
}

/// Styled writer over any color-capable sink.
pub struct StyledOutput<W> {
    out: W,
}

impl StyledOutput<StandardStream> {
    pub fn stdout(choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> StyledOutput<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Underlying writer, for diagnostics rendered by codespan.
    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write text with a specific color and style.
    fn write_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.out.set_color(&spec);
        let _ = write!(self.out, "{}", text);
        let _ = self.out.reset();
    }

    // ── Convenience helpers ──────────────────────────────────────────

    /// Green bold text.
    pub fn success(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Green), true);
    }

    /// Red bold text.
    pub fn error(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Red), true);
    }

    /// Yellow bold text.
    pub fn warning(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Yellow), true);
    }

    /// Cyan text.
    pub fn info(&mut self, text: &str) {
        self.write_styled(text, Some(Color::Cyan), false);
    }

    /// Dim text.
    pub fn dim(&mut self, text: &str) {
        self.write_styled(text, Some(Color::White), false);
    }

    /// Bold text.
    pub fn bold(&mut self, text: &str) {
        self.write_styled(text, None, true);
    }

    /// Plain text (no color).
    pub fn plain(&mut self, text: &str) {
        let _ = write!(self.out, "{}", text);
    }

    /// Two spaces per level.
    pub fn indent(&mut self, depth: usize) {
        let _ = write!(self.out, "{:width$}", "", width = depth * 2);
    }

    pub fn newline(&mut self) {
        let _ = writeln!(self.out);
    }

    pub fn flush(&mut self) {
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::Buffer;

    #[test]
    fn test_flag_choice() {
        if std::env::var_os("NO_COLOR").is_some() {
            return;
        }
        assert_eq!(resolve_color_choice(ColorWhen::Always), ColorChoice::Always);
        assert_eq!(resolve_color_choice(ColorWhen::Never), ColorChoice::Never);
        assert_eq!(resolve_color_choice(ColorWhen::default()), ColorChoice::Auto);
    }

    #[test]
    fn test_color_flag_values() {
        assert_eq!(ColorWhen::from_str("always", false), Ok(ColorWhen::Always));
        assert_eq!(ColorWhen::from_str("never", false), Ok(ColorWhen::Never));
        assert!(ColorWhen::from_str("sometimes", false).is_err());
    }

    #[test]
    fn test_no_color_buffer_is_plain_text() {
        let mut out = StyledOutput::new(Buffer::no_color());
        out.indent(2);
        out.success("ok");
        out.plain(" done");
        out.newline();
        let text = String::from_utf8(out.into_inner().into_inner()).unwrap();
        assert_eq!(text, "    ok done\n");
    }
}
