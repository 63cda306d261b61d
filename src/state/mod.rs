//! The torch state document shared with the device.

use crate::wire::WireMessage;

/// Last known torch state.
///
/// A field is `None` until either the device reports it or the user sends
/// it. Incoming snapshots never reset a field to `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDocument {
    /// Illumination level.
    pub brightness: Option<i64>,
    /// Effect transition speed.
    pub rate: Option<i64>,
    pub red: Option<i64>,
    pub green: Option<i64>,
    pub blue: Option<i64>,
    /// Index into the configured effect list.
    pub effect_type: Option<i64>,
    /// Power switch.
    pub on_off: Option<bool>,
    /// Device-assigned labels. The controller only displays these.
    pub heading1: Option<String>,
    pub heading2: Option<String>,
}

/// Editable values read back from the panel before a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub brightness: i64,
    pub rate: i64,
    pub red: i64,
    pub green: i64,
    pub blue: i64,
    pub effect_index: i64,
    pub on_off: bool,
}

fn take<T>(field: &mut Option<T>, incoming: Option<T>) {
    if let Some(value) = incoming {
        *field = Some(value);
    }
}

impl StateDocument {
    pub fn new() -> StateDocument {
        StateDocument::default()
    }

    /// Overwrite every field the snapshot carries, keep the rest.
    pub fn merge(&mut self, msg: WireMessage) {
        take(&mut self.brightness, msg.brightness);
        take(&mut self.rate, msg.rate);
        take(&mut self.red, msg.red);
        take(&mut self.green, msg.green);
        take(&mut self.blue, msg.blue);
        take(&mut self.effect_type, msg.effect_type);
        take(&mut self.on_off, msg.on_off);
        take(&mut self.heading1, msg.heading1);
        take(&mut self.heading2, msg.heading2);
    }

    /// Copy the user's edits in. Headings belong to the device and are left alone.
    pub fn apply_controls(&mut self, controls: &Controls) {
        self.brightness = Some(controls.brightness);
        self.rate = Some(controls.rate);
        self.red = Some(controls.red);
        self.green = Some(controls.green);
        self.blue = Some(controls.blue);
        self.effect_type = Some(controls.effect_index);
        self.on_off = Some(controls.on_off);
    }

    /// Full snapshot for the wire.
    pub fn to_wire(&self) -> WireMessage {
        WireMessage {
            brightness: self.brightness,
            rate: self.rate,
            red: self.red,
            green: self.green,
            blue: self.blue,
            effect_type: self.effect_type,
            on_off: self.on_off,
            heading1: self.heading1.clone(),
            heading2: self.heading2.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_doc() -> StateDocument {
        StateDocument {
            brightness: Some(10),
            rate: Some(20),
            red: Some(30),
            green: Some(40),
            blue: Some(50),
            effect_type: Some(1),
            on_off: Some(true),
            heading1: Some("old one".to_string()),
            heading2: Some("old two".to_string()),
        }
    }

    #[test]
    fn empty_snapshot_changes_nothing() {
        let mut doc = full_doc();
        doc.merge(WireMessage::default());
        assert_eq!(doc, full_doc());
    }

    #[test]
    fn each_present_field_is_overwritten_alone() {
        let cases: [(WireMessage, fn(&mut StateDocument)); 9] = [
            (WireMessage { brightness: Some(99), ..Default::default() }, |d| d.brightness = Some(99)),
            (WireMessage { rate: Some(99), ..Default::default() }, |d| d.rate = Some(99)),
            (WireMessage { red: Some(99), ..Default::default() }, |d| d.red = Some(99)),
            (WireMessage { green: Some(99), ..Default::default() }, |d| d.green = Some(99)),
            (WireMessage { blue: Some(99), ..Default::default() }, |d| d.blue = Some(99)),
            (WireMessage { effect_type: Some(9), ..Default::default() }, |d| d.effect_type = Some(9)),
            (WireMessage { on_off: Some(false), ..Default::default() }, |d| d.on_off = Some(false)),
            (
                WireMessage { heading1: Some("new".into()), ..Default::default() },
                |d| d.heading1 = Some("new".into()),
            ),
            (
                WireMessage { heading2: Some("new".into()), ..Default::default() },
                |d| d.heading2 = Some("new".into()),
            ),
        ];

        for (msg, expect) in cases.iter().cloned() {
            let mut doc = full_doc();
            doc.merge(msg);
            let mut expected = full_doc();
            expect(&mut expected);
            assert_eq!(doc, expected);
        }
    }

    #[test]
    fn merge_is_idempotent() {
        let msg = WireMessage {
            red: Some(1),
            on_off: Some(false),
            heading2: Some("x".into()),
            ..Default::default()
        };
        let mut once = full_doc();
        once.merge(msg.clone());
        let mut twice = once.clone();
        twice.merge(msg);
        assert_eq!(once, twice);
    }

    #[test]
    fn controls_leave_headings_alone() {
        let mut doc = full_doc();
        doc.apply_controls(&Controls {
            brightness: 1,
            rate: 2,
            red: 3,
            green: 4,
            blue: 5,
            effect_index: 6,
            on_off: false,
        });
        assert_eq!(doc.brightness, Some(1));
        assert_eq!(doc.effect_type, Some(6));
        assert_eq!(doc.on_off, Some(false));
        assert_eq!(doc.heading1.as_deref(), Some("old one"));
        assert_eq!(doc.heading2.as_deref(), Some("old two"));
    }
}
