use super::Theme;
use crossterm::style::Stylize;
use keeper_core::ports::Notifier;

/// One-line styled messages; the terminal side of [`Notifier`].
#[derive(Debug, Clone, Default)]
pub struct Messages {
    theme: Theme,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hint(&self, message: &str) {
        println!();
        println!(
            "  {} {}",
            "Hint:".with(self.theme.text_muted).bold(),
            message.with(self.theme.text_muted).italic()
        );
    }
}

impl Notifier for Messages {
    fn success(&self, message: &str) {
        println!(
            "{} {}",
            "✓".with(self.theme.success),
            message.with(self.theme.success)
        );
    }

    fn error(&self, message: &str) {
        eprintln!(
            "{} {}",
            "✗".with(self.theme.error),
            message.with(self.theme.error)
        );
    }

    fn warning(&self, message: &str) {
        println!(
            "{} {}",
            "⚠".with(self.theme.warning),
            message.with(self.theme.warning)
        );
    }

    fn info(&self, message: &str) {
        println!(
            "{} {}",
            "ℹ".with(self.theme.info),
            message.with(self.theme.info)
        );
    }
}
