//! The sync channel keeps the state document and the torch in step.
//!
//! Every message in either direction is a full snapshot. Inbound snapshots
//! are merged field by field; outbound ones are rebuilt from the panel.
//! Nothing is acknowledged or retried.

use log::{debug, info, warn};

use crate::color;
use crate::link::DeviceLink;
use crate::panel::Panel;
use crate::state::StateDocument;
use crate::wire::WireMessage;

/// Sync channel over one device link.
pub struct SyncChannel<L: DeviceLink> {
    link: L,
}

/// Refresh the color preview from the panel's current RGB controls.
pub fn update_colors(panel: &mut dyn Panel) {
    let c = panel.controls();
    let preview = color::derive(c.red, c.green, c.blue);
    panel.show_color(&preview);
}

impl<L: DeviceLink> SyncChannel<L> {
    pub fn new(link: L) -> SyncChannel<L> {
        SyncChannel { link }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn on_open(&self) {
        info!("[sync] WebSocket open");
    }

    /// The link is gone for good. The document stays as it was.
    pub fn on_close(&self) {
        info!("[sync] WebSocket closed");
    }

    pub fn on_error(&self, err: &str) {
        warn!("[sync] WebSocket error: {}", err);
    }

    /// Apply an inbound snapshot and redraw the panel.
    ///
    /// Returns false if the payload could not be parsed, in which case
    /// neither the document nor the panel was touched.
    pub fn pull(&self, doc: &mut StateDocument, panel: &mut dyn Panel, payload: &str) -> bool {
        debug!("[sync] recv {}", payload);
        let msg = match WireMessage::decode(payload) {
            Ok(msg) => msg,
            Err(err) => {
                debug!("[sync] dropping message: {}", err);
                return false;
            }
        };

        doc.merge(msg);
        panel.render(doc);
        update_colors(panel);
        true
    }

    /// Read the panel into the document and send the whole thing.
    pub fn push(&mut self, doc: &mut StateDocument, panel: &mut dyn Panel) {
        update_colors(panel);
        doc.apply_controls(&panel.controls());

        let payload = match doc.to_wire().encode() {
            Ok(payload) => payload,
            Err(err) => {
                warn!("[sync] unable to encode state: {}", err);
                return;
            }
        };

        debug!("[sync] send {}", payload);
        if let Err(err) = self.link.send_text(payload) {
            warn!("[sync] send failed: {}", err);
        }
    }

    /// Select an effect and send immediately.
    pub fn request_effect(&mut self, doc: &mut StateDocument, panel: &mut dyn Panel, index: i64) {
        panel.select_effect(index);
        self.push(doc, panel);
    }
}
