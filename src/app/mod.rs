//! Wires the torch link, the terminal panel and the sync channel together.

use std::io::{self, BufRead, Write};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, info};

use crate::channel::SyncChannel;
use crate::config::Root;
use crate::link::{self, DeviceLink, Endpoint, LinkEvent};
use crate::panel::{Command, ConsolePanel};
use crate::state::StateDocument;

/// Everything the event loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Link(LinkEvent),
    /// A line typed by the user.
    Input(String),
    /// End of user input.
    InputClosed,
}

impl From<LinkEvent> for AppEvent {
    fn from(event: LinkEvent) -> AppEvent {
        AppEvent::Link(event)
    }
}

/// Start a thread that reads command lines and messages them to the event loop.
pub fn start_input_thread<R>(input: R, sender: Sender<AppEvent>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    debug!("[input] read failed: {}", err);
                    break;
                }
            };
            if sender.send(AppEvent::Input(line)).is_err() {
                // Event loop is gone.
                return;
            }
        }
        sender.send(AppEvent::InputClosed).ok();
    })
}

/// Connect to the torch and run until the user quits.
pub fn serve(config: Root, endpoint: Endpoint) -> io::Result<()> {
    // Message channel used as the controller's event bus.
    let (sender, receiver) = channel::unbounded::<AppEvent>();

    let (device, link_handle) = link::start_link_thread(endpoint, sender.clone());
    // The input thread blocks on stdin, so it is left detached.
    let _input_handle = start_input_thread(io::BufReader::new(io::stdin()), sender);

    let mut panel = ConsolePanel::stdout(config.initial.controls(), config.effects);
    let mut channel = SyncChannel::new(device);
    let mut doc = StateDocument::new();

    event_loop(&receiver, &mut channel, &mut panel, &mut doc);

    // Dropping the link lets its thread close the socket.
    drop(channel);
    drop(receiver);
    link_handle
        .join()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "link thread panicked"))?;

    Ok(())
}

/// Dispatch events until quit, end of input or every sender is gone.
pub fn event_loop<L, W>(
    receiver: &Receiver<AppEvent>,
    channel: &mut SyncChannel<L>,
    panel: &mut ConsolePanel<W>,
    doc: &mut StateDocument,
) where
    L: DeviceLink,
    W: Write,
{
    'message_loop: loop {
        let event = match receiver.recv() {
            Ok(event) => event,
            Err(_) => break 'message_loop,
        };

        match event {
            AppEvent::Link(LinkEvent::Opened) => channel.on_open(),
            AppEvent::Link(LinkEvent::Closed) => channel.on_close(),
            AppEvent::Link(LinkEvent::Error(err)) => channel.on_error(&err),
            AppEvent::Link(LinkEvent::Message(text)) => {
                if channel.pull(doc, panel, &text) {
                    panel.show();
                }
            }
            AppEvent::Input(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(err) => {
                        panel.report(&err.to_string());
                        continue;
                    }
                };
                match command {
                    Command::Set(..) | Command::Power(_) => {
                        panel.edit(&command);
                    }
                    Command::Send => {
                        channel.push(doc, panel);
                        panel.show();
                    }
                    Command::Effect(index) => {
                        channel.request_effect(doc, panel, index);
                        panel.show();
                    }
                    Command::Show => panel.show(),
                    Command::ListEffects => panel.list_effects(),
                    Command::Quit => break 'message_loop,
                }
            }
            AppEvent::InputClosed => break 'message_loop,
        }
    }
    info!("[app] Event loop finished.");
}
