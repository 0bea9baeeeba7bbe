use super::Theme;
use crossterm::style::Stylize;

/// Boxed report layout: a dashboard header followed by labelled sections.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    theme: Theme,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_dashboard(&self, title: &str) {
        println!();
        println!("  {}", title.to_uppercase().with(self.theme.info).bold());
        let bar = "━".repeat(title.len() + 4);
        println!("  {}", bar.with(self.theme.info));
        println!("{}", "│".with(self.theme.text_bright));
    }

    pub fn section_timeline(&self, code: &str, title: &str) {
        println!(
            "{}╭┄ {} [{}]",
            "│".with(self.theme.text_bright),
            code.with(self.theme.accent).bold(),
            title.with(self.theme.text_bright).bold()
        );
    }

    pub fn section_end(&self) {
        println!("{}", "├╯".with(self.theme.text_bright));
        println!("{}", "│".with(self.theme.text_bright));
    }

    pub fn row_labeled(&self, icon: &str, label: &str, value: &str) {
        println!(
            "{} {} {} {}",
            "│".with(self.theme.text_bright),
            icon.with(self.theme.text),
            format!("{:<22}", label).with(self.theme.text_muted),
            value.with(self.theme.text_bright).bold()
        );
    }

    pub fn row_status(&self, ok: bool, label: &str, detail: &str) {
        let mark = if ok {
            "●".with(self.theme.success)
        } else {
            "○".with(self.theme.text_muted)
        };
        println!(
            "{} {} {} {}",
            "│".with(self.theme.text_bright),
            mark,
            format!("{:<22}", label).with(self.theme.text_bright),
            detail.with(self.theme.text_muted)
        );
    }

    pub fn item_simple(&self, content: &str) {
        println!(
            "{} {}",
            "│".with(self.theme.text_bright),
            content.with(self.theme.text)
        );
    }

    pub fn badge_info(&self, label: &str, value: &str) {
        println!(
            "{}  {} {}",
            "┄".with(self.theme.info),
            format!("[{}]", label).with(self.theme.info).bold(),
            value.with(self.theme.text)
        );
    }

    pub fn empty(&self) {
        println!();
    }
}
