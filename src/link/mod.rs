//! WebSocket connection to the torch.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use log::{debug, info};
use thiserror::Error;
use tungstenite::{Message, WebSocket};

/// How long a read may block before queued sends get a turn.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Bound on each TCP connect attempt, so an unreachable torch cannot stall
/// shutdown for the kernel's connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Anything the sync channel can hand a text frame to.
pub trait DeviceLink {
    /// Queue a text frame. Delivery is not confirmed.
    fn send_text(&mut self, payload: String) -> LinkResult<()>;
}

pub type LinkResult<T> = Result<T, LinkError>;

#[derive(Debug, Error)]
pub enum LinkError {
    /// The connection thread has finished.
    #[error("link is closed")]
    Closed,
}

/// Lifecycle and data events posted by the connection thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Opened,
    /// A text frame from the torch.
    Message(String),
    Error(String),
    /// Always the last event. The thread does not reconnect.
    Closed,
}

/// Torch address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new<S: Into<String>>(host: S, port: u16) -> Endpoint {
        Endpoint {
            host: host.into(),
            port,
        }
    }

    /// `ws://host:port/`, no path and no sub-protocol.
    pub fn url(&self) -> String {
        if self.host.contains(':') {
            format!("ws://[{}]:{}/", self.host, self.port)
        } else {
            format!("ws://{}:{}/", self.host, self.port)
        }
    }
}

/// Sending half of a running connection thread.
pub struct WsLink {
    outbound: Sender<String>,
}

impl DeviceLink for WsLink {
    fn send_text(&mut self, payload: String) -> LinkResult<()> {
        self.outbound.send(payload).map_err(|_| LinkError::Closed)
    }
}

/// Start a thread that connects to the torch and messages the event loop.
///
/// Frames queued through the returned `WsLink` are written by the same
/// thread. Dropping the `WsLink` closes the connection.
pub fn start_link_thread<E>(endpoint: Endpoint, events: Sender<E>) -> (WsLink, JoinHandle<()>)
where
    E: From<LinkEvent> + Send + 'static,
{
    let (outbound, queue) = channel::unbounded::<String>();

    let handle = thread::spawn(move || {
        info!("[link] Connecting to {}", endpoint.url());
        if let Err(err) = run(&endpoint, &events, &queue) {
            events.send(E::from(LinkEvent::Error(err))).ok();
        }
        events.send(E::from(LinkEvent::Closed)).ok();
        info!("[link] Connection thread terminating.");
    });

    (WsLink { outbound }, handle)
}

fn connect(endpoint: &Endpoint) -> Result<WebSocket<TcpStream>, String> {
    let stream =
        connect_tcp(endpoint).map_err(|err| format!("connect to {}: {}", endpoint.url(), err))?;
    let (ws, _response) =
        tungstenite::client(endpoint.url(), stream).map_err(|err| format!("handshake: {}", err))?;
    ws.get_ref()
        .set_read_timeout(Some(POLL_INTERVAL))
        .map_err(|err| err.to_string())?;
    Ok(ws)
}

/// Try each resolved address in turn, each with a bounded connect.
fn connect_tcp(endpoint: &Endpoint) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in (endpoint.host.as_str(), endpoint.port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
    }))
}

/// Is this how a finished connection reports itself?
fn is_closed(err: &tungstenite::Error) -> bool {
    matches!(
        err,
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed
    )
}

fn is_timeout(err: &tungstenite::Error) -> bool {
    match err {
        tungstenite::Error::Io(io_err) => matches!(
            io_err.kind(),
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
        ),
        _ => false,
    }
}

fn run<E: From<LinkEvent>>(
    endpoint: &Endpoint,
    events: &Sender<E>,
    queue: &Receiver<String>,
) -> Result<(), String> {
    let mut ws = connect(endpoint)?;
    info!("[link] WebSocket open.");
    if events.send(E::from(LinkEvent::Opened)).is_err() {
        // Nobody is listening any more.
        return Ok(());
    }

    loop {
        // Write everything queued since the last read.
        loop {
            match queue.try_recv() {
                Ok(text) => match ws.send(Message::text(text)) {
                    Ok(()) => {}
                    Err(err) if is_closed(&err) => return Ok(()),
                    Err(err) => return Err(err.to_string()),
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    ws.close(None).ok();
                    ws.flush().ok();
                    return Ok(());
                }
            }
        }

        let msg = match ws.read() {
            Ok(msg) => msg,
            Err(err) if is_timeout(&err) => continue,
            Err(err) if is_closed(&err) => return Ok(()),
            Err(err) => return Err(err.to_string()),
        };

        if msg.is_text() {
            let text = msg.to_text().map_err(|err| err.to_string())?.to_owned();
            if events.send(E::from(LinkEvent::Message(text))).is_err() {
                return Ok(());
            }
        } else if msg.is_binary() {
            debug!("[link] Non-text message?");
        } else if msg.is_close() {
            debug!("[link] Close frame received.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_device_url() {
        assert_eq!(Endpoint::new("192.168.4.1", 81).url(), "ws://192.168.4.1:81/");
        assert_eq!(Endpoint::new("torch.local", 81).url(), "ws://torch.local:81/");
        assert_eq!(Endpoint::new("fe80::1", 81).url(), "ws://[fe80::1]:81/");
    }

    #[test]
    fn bounded_connect_reaches_a_listener() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let stream = connect_tcp(&Endpoint::new("127.0.0.1", port)).unwrap();
        assert_eq!(stream.peer_addr().unwrap().port(), port);
    }

    #[test]
    fn refused_connection_reports_error_then_closed() {
        // Grab a free port and release it so nothing is listening there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let (sender, receiver) = channel::unbounded::<LinkEvent>();
        let (mut link, handle) = start_link_thread(Endpoint::new("127.0.0.1", port), sender);
        handle.join().unwrap();

        let events: Vec<LinkEvent> = receiver.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], LinkEvent::Error(_)));
        assert_eq!(events[1], LinkEvent::Closed);
        assert!(link.send_text("{}".to_string()).is_err());
    }
}
