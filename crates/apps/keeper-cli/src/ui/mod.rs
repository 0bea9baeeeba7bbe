// Terminal output: section layout for reports and a Notifier for one-line results.

pub mod layout;
pub mod messages;
pub mod theme;

pub use layout::Layout;
pub use messages::Messages;
pub use theme::Theme;
