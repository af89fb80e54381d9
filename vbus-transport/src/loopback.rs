//!
//! An In-Process Loopback Bus.
//!
//! Every endpoint attached to a loopback bus sees every frame sent by
//! every other endpoint, which is exactly the broadcast behavior of the
//! physical bus.  Nodes of a whole simulated vehicle can therefore run in
//! one process, and the transport tests exercise the real driver code
//! path end to end.
//!

use std::sync::{Arc, Mutex};

use crossbeam::channel::{self, Receiver, Sender};

use vbus_core::{BusFrame, FrameBus};

/// An error from polling a loopback endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopbackError {
    /// The bus hub and all peer endpoints are gone
    Disconnected,
}

struct Hub {
    next_id: u64,
    peers: Vec<(u64, Sender<BusFrame>)>,
}

/// A simulated shared bus living inside one process.
///
/// Cloning the bus clones a handle to the same wire: endpoints created
/// from any clone all hear each other.
#[derive(Clone)]
pub struct LoopbackBus {
    hub: Arc<Mutex<Hub>>,
}

impl LoopbackBus {
    /// Create a bus with no endpoints attached yet.
    pub fn new() -> Self {
        Self {
            hub: Arc::new(Mutex::new(Hub {
                next_id: 0,
                peers: Vec::new(),
            })),
        }
    }

    /// Attach a new endpoint to the bus.
    pub fn endpoint(&self) -> LoopbackEndpoint {
        let mut hub = self.hub.lock().unwrap();
        let (tx, rx) = channel::unbounded();
        let id = hub.next_id;
        hub.next_id += 1;
        hub.peers.push((id, tx));

        LoopbackEndpoint {
            id,
            hub: self.hub.clone(),
            rx,
        }
    }
}

impl Default for LoopbackBus {
    fn default() -> Self {
        Self::new()
    }
}

/// One node's attachment point on a [`LoopbackBus`].
pub struct LoopbackEndpoint {
    id: u64,
    hub: Arc<Mutex<Hub>>,
    rx: Receiver<BusFrame>,
}

impl FrameBus for LoopbackEndpoint {
    type Error = LoopbackError;

    /// Broadcast a frame to every other endpoint on the bus.
    ///
    /// A transmit onto the wire succeeds whether or not anyone is
    /// listening; endpoints that have been dropped are detached here.
    fn send(&mut self, frame: &BusFrame) -> Result<(), Self::Error> {
        let mut hub = self.hub.lock().unwrap();
        let own_id = self.id;
        hub.peers
            .retain(|(id, tx)| *id == own_id || tx.send(*frame).is_ok());
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<BusFrame>, Self::Error> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(channel::TryRecvError::Empty) => Ok(None),
            Err(channel::TryRecvError::Disconnected) => Err(LoopbackError::Disconnected),
        }
    }
}

impl Drop for LoopbackEndpoint {
    fn drop(&mut self) {
        if let Ok(mut hub) = self.hub.lock() {
            let own_id = self.id;
            hub.peers.retain(|(id, _)| *id != own_id);
        }
    }
}
