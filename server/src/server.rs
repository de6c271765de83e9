//! The blocking UDP transport loop.

use std::{
    io,
    net::{Ipv4Addr, UdpSocket},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use net2::UdpBuilder;

use bsdp_protocol::{constants::PORT_SERVER, Message};

use crate::{catalog::ImageCatalog, engine::ResponseEngine, settings::ServerConfig, Error};

/// Big enough for any option-bearing datagram.
const SIZE_READ_BUFFER: usize = 8192;
/// The read timeout doubling as the stop-flag poll interval.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The BSDP server: one socket, one worker thread.
pub struct Server {
    socket: UdpSocket,
    engine: ResponseEngine,
    stop: Arc<AtomicBool>,
}

impl Server {
    /// Binds the server socket and builds the response engine.
    pub fn new(settings: ServerConfig, catalog: ImageCatalog) -> Result<Self, Error> {
        let engine = ResponseEngine::new(settings, catalog)?;
        let socket = UdpBuilder::new_v4()?
            .reuse_address(true)?
            .bind((Ipv4Addr::UNSPECIFIED, PORT_SERVER))?;
        socket.set_read_timeout(Some(POLL_INTERVAL))?;
        Ok(Server {
            socket,
            engine,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Moves the server onto its worker thread.
    pub fn spawn(self) -> Result<ServerHandle, Error> {
        let stop = self.stop.clone();
        let thread = thread::Builder::new()
            .name("bsdp-server".to_owned())
            .spawn(move || self.run())?;
        Ok(ServerHandle { stop, thread })
    }

    /// The receive loop. Per-datagram failures are logged and never
    /// terminate the loop.
    fn run(self) {
        info!("Listening on port {}", PORT_SERVER);
        let mut buffer = [0u8; SIZE_READ_BUFFER];
        while !self.stop.load(Ordering::SeqCst) {
            let (amount, source) = match self.socket.recv_from(&mut buffer) {
                Ok(received) => received,
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock
                        || error.kind() == io::ErrorKind::TimedOut =>
                {
                    continue
                }
                Err(error) => {
                    warn!("Socket receive error: {}", error);
                    continue;
                }
            };
            let request = match Message::from_bytes(&buffer[..amount]) {
                Ok(request) => request,
                Err(error) => {
                    warn!("Dropping a malformed packet from {}: {}", source, error);
                    continue;
                }
            };
            debug!("--> {}", request);
            let replies = match self.engine.handle(&request) {
                Ok(replies) => replies,
                Err(error) => {
                    warn!("Dropping a packet from {}: {}", source, error);
                    continue;
                }
            };
            for (destination, reply) in replies {
                let bytes = match reply.to_bytes() {
                    Ok(bytes) => bytes,
                    Err(error) => {
                        error!("Dropping a reply to {}: {}", destination, error);
                        continue;
                    }
                };
                match self.socket.send_to(&bytes, destination) {
                    Ok(_) => debug!("<-- {}", reply),
                    Err(error) => warn!("Failed to send to {}: {}", destination, error),
                }
            }
        }
        info!("Server stopped");
    }
}

/// Stops the worker cooperatively: the flag is checked on every read
/// timeout, so `stop` returns within one poll interval plus the time
/// spent on the datagram in flight.
pub struct ServerHandle {
    stop: Arc<AtomicBool>,
    thread: thread::JoinHandle<()>,
}

impl ServerHandle {
    pub fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        if self.thread.join().is_err() {
            error!("The server thread panicked");
        }
    }
}
