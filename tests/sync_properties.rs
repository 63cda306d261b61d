use rstest::rstest;

use torchctl_rs::channel::SyncChannel;
use torchctl_rs::config::Initial;
use torchctl_rs::link::{DeviceLink, LinkResult};
use torchctl_rs::panel::{Command, ConsolePanel, Field, Panel};
use torchctl_rs::state::StateDocument;
use torchctl_rs::wire::WireMessage;

#[derive(Default)]
struct Recorder {
    sent: Vec<String>,
}

impl DeviceLink for Recorder {
    fn send_text(&mut self, payload: String) -> LinkResult<()> {
        self.sent.push(payload);
        Ok(())
    }
}

fn panel() -> ConsolePanel<Vec<u8>> {
    ConsolePanel::new(Initial::default().controls(), vec!["Solid".into()], Vec::new())
}

#[test]
fn sent_document_round_trips_through_receive() {
    let mut channel = SyncChannel::new(Recorder::default());
    let mut doc = StateDocument::new();
    let mut panel = panel();
    panel.edit(&Command::Set(Field::Brightness, 300));
    panel.edit(&Command::Set(Field::Blue, -2));
    panel.edit(&Command::Power(false));

    channel.push(&mut doc, &mut panel);

    let mut echoed = StateDocument::new();
    let mut other_panel = self::panel();
    assert!(channel.pull(&mut echoed, &mut other_panel, &channel.link().sent[0]));

    assert_eq!(echoed, doc);
    assert_eq!(echoed.heading1, None);
    assert_eq!(other_panel.controls(), panel.controls());
}

#[rstest]
#[case(true, "1")]
#[case(false, "0")]
fn power_switch_is_a_digit_string(#[case] on: bool, #[case] wire: &str) {
    let mut channel = SyncChannel::new(Recorder::default());
    let mut doc = StateDocument::new();
    let mut panel = panel();
    panel.edit(&Command::Power(on));

    channel.push(&mut doc, &mut panel);

    let value: serde_json::Value = serde_json::from_str(&channel.link().sent[0]).unwrap();
    assert_eq!(value["UserReqOnOFF"], wire);

    let mut fresh = self::panel();
    fresh.edit(&Command::Power(!on));
    let mut received = StateDocument::new();
    channel.pull(&mut received, &mut fresh, &format!(r#"{{"UserReqOnOFF":"{}"}}"#, wire));
    assert_eq!(fresh.controls().on_off, on);
}

#[test]
fn repeated_snapshot_is_idempotent() {
    let channel = SyncChannel::new(Recorder::default());
    let mut panel = panel();
    let snapshot = r#"{"GreenLevel":7,"EffectType":null,"Heading1":"A"}"#;

    let mut once = StateDocument::new();
    channel.pull(&mut once, &mut panel, snapshot);
    let mut twice = once.clone();
    channel.pull(&mut twice, &mut panel, snapshot);

    assert_eq!(once, twice);
    assert_eq!(once.to_wire(), WireMessage::decode(r#"{"GreenLevel":7,"Heading1":"A"}"#).unwrap());
}

#[test]
fn malformed_snapshot_leaves_panel_alone() {
    let channel = SyncChannel::new(Recorder::default());
    let mut panel = panel();
    panel.show_color("#abcdef");
    let before = panel.controls();
    let mut doc = StateDocument::new();

    assert!(!channel.pull(&mut doc, &mut panel, r#"{"RedLevel":"lots"}"#));
    assert_eq!(panel.controls(), before);
    assert_eq!(panel.preview(), "#abcdef");
    assert_eq!(doc, StateDocument::new());
}
