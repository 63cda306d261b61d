//! Terminal stand-in for the torch web page.

use std::io::{self, Write};

use super::{Command, Field, Panel};
use crate::state::{Controls, StateDocument};

/// Holds what a form would hold: control values, the two headings and the
/// color swatch. `show` prints it to `out`.
pub struct ConsolePanel<W: Write> {
    controls: Controls,
    heading1: String,
    heading2: String,
    preview: String,
    effects: Vec<String>,
    out: W,
}

impl ConsolePanel<io::Stdout> {
    pub fn stdout(initial: Controls, effects: Vec<String>) -> ConsolePanel<io::Stdout> {
        ConsolePanel::new(initial, effects, io::stdout())
    }
}

impl<W: Write> ConsolePanel<W> {
    pub fn new(initial: Controls, effects: Vec<String>, out: W) -> ConsolePanel<W> {
        ConsolePanel {
            controls: initial,
            heading1: String::new(),
            heading2: String::new(),
            preview: String::new(),
            effects,
            out,
        }
    }

    pub fn headings(&self) -> (&str, &str) {
        (&self.heading1, &self.heading2)
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Apply a local edit. Returns false for commands that are not edits.
    pub fn edit(&mut self, command: &Command) -> bool {
        match *command {
            Command::Set(field, value) => {
                let slot = match field {
                    Field::Brightness => &mut self.controls.brightness,
                    Field::Rate => &mut self.controls.rate,
                    Field::Red => &mut self.controls.red,
                    Field::Green => &mut self.controls.green,
                    Field::Blue => &mut self.controls.blue,
                    Field::Effect => &mut self.controls.effect_index,
                };
                *slot = value;
                true
            }
            Command::Power(on) => {
                self.controls.on_off = on;
                true
            }
            _ => false,
        }
    }

    fn effect_name(&self, index: i64) -> &str {
        if index < 0 {
            return "?";
        }
        self.effects
            .get(index as usize)
            .map(String::as_str)
            .unwrap_or("?")
    }

    /// Print the panel state on one line.
    pub fn show(&mut self) {
        let c = self.controls;
        let line = format!(
            "{} | {} | {} | brightness {} rate {} rgb {} {} {} {} | effect {} ({})",
            if self.heading1.is_empty() { "-" } else { self.heading1.as_str() },
            if self.heading2.is_empty() { "-" } else { self.heading2.as_str() },
            if c.on_off { "on" } else { "off" },
            c.brightness,
            c.rate,
            c.red,
            c.green,
            c.blue,
            if self.preview.is_empty() { "-" } else { self.preview.as_str() },
            c.effect_index,
            self.effect_name(c.effect_index),
        );
        // A closed terminal is not worth failing the event loop over.
        writeln!(self.out, "{}", line).ok();
    }

    pub fn list_effects(&mut self) {
        for (index, name) in self.effects.iter().enumerate() {
            writeln!(self.out, "{:>3} {}", index, name).ok();
        }
    }

    pub fn report(&mut self, message: &str) {
        writeln!(self.out, "{}", message).ok();
    }
}

impl<W: Write> Panel for ConsolePanel<W> {
    fn controls(&self) -> Controls {
        self.controls
    }

    fn render(&mut self, doc: &StateDocument) {
        let c = &mut self.controls;
        if let Some(v) = doc.brightness {
            c.brightness = v;
        }
        if let Some(v) = doc.rate {
            c.rate = v;
        }
        if let Some(v) = doc.red {
            c.red = v;
        }
        if let Some(v) = doc.green {
            c.green = v;
        }
        if let Some(v) = doc.blue {
            c.blue = v;
        }
        if let Some(v) = doc.effect_type {
            c.effect_index = v;
        }
        if let Some(v) = doc.on_off {
            c.on_off = v;
        }
        if let Some(text) = &doc.heading1 {
            self.heading1 = text.clone();
        }
        if let Some(text) = &doc.heading2 {
            self.heading2 = text.clone();
        }
    }

    fn select_effect(&mut self, index: i64) {
        self.controls.effect_index = index;
    }

    fn show_color(&mut self, preview: &str) {
        self.preview = preview.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> ConsolePanel<Vec<u8>> {
        let initial = crate::config::Initial::default().controls();
        ConsolePanel::new(initial, vec!["Solid".into(), "Flicker".into()], Vec::new())
    }

    fn printed(panel: &ConsolePanel<Vec<u8>>) -> String {
        String::from_utf8(panel.output().clone()).unwrap()
    }

    #[test]
    fn render_keeps_values_the_document_lacks() {
        let mut panel = panel();
        let doc = StateDocument {
            red: Some(12),
            heading1: Some("Torch".into()),
            ..StateDocument::default()
        };
        panel.render(&doc);

        let c = panel.controls();
        assert_eq!(c.red, 12);
        assert_eq!(c.green, 255);
        assert_eq!(c.brightness, 128);
        assert_eq!(panel.headings(), ("Torch", ""));
    }

    #[test]
    fn show_prints_a_status_line() {
        let mut panel = panel();
        panel.show_color("#0c0d0e");
        panel.render(&StateDocument {
            effect_type: Some(1),
            on_off: Some(false),
            heading2: Some("Den".into()),
            ..StateDocument::default()
        });
        panel.show();
        let out = printed(&panel);
        assert!(out.contains("Den"));
        assert!(out.contains("off"));
        assert!(out.contains("#0c0d0e"));
        assert!(out.contains("effect 1 (Flicker)"));
    }

    #[test]
    fn edits_only_touch_controls() {
        let mut panel = panel();
        assert!(panel.edit(&Command::Set(Field::Effect, 7)));
        assert!(panel.edit(&Command::Power(false)));
        assert!(!panel.edit(&Command::Send));

        let c = panel.controls();
        assert_eq!(c.effect_index, 7);
        assert!(!c.on_off);
        panel.show();
        assert!(printed(&panel).contains("effect 7 (?)"));
    }
}
