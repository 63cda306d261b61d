//! Presentation side of the controller: whatever shows the torch state to a
//! user and holds their edits until they hit send.

use crate::state::{Controls, StateDocument};

mod command;
mod console;

pub use self::command::{Command, CommandError, Field};
pub use self::console::ConsolePanel;

/// A presentation layer the sync channel reads from and writes to.
pub trait Panel {
    /// Current values of the editable controls.
    fn controls(&self) -> Controls;
    /// Show every field the document knows. Unknown fields keep their current value.
    fn render(&mut self, doc: &StateDocument);
    /// Move the effect selector.
    fn select_effect(&mut self, index: i64);
    /// Show a `#rrggbb` color preview.
    fn show_color(&mut self, preview: &str);
}
