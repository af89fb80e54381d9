//!
//! A UDP Datagram Frame Bus.
//!
//! Host-side nodes (the base station, bench rigs, software-in-the-loop
//! runs) join the vehicle network over UDP: each frame travels as one
//! datagram in the fixed wire layout.  The socket is non-blocking in both
//! directions so the periodic loop never stalls on the network.
//!

use std::io::{Error, ErrorKind};
use std::net::{SocketAddr, UdpSocket};

use log::warn;

use vbus_core::{BusFrame, FrameBus};

/// A frame bus speaking the fixed wire layout over UDP datagrams.
pub struct UdpFrameBus {
    socket: UdpSocket,
    /// The peer nodes every frame is sent to.
    ///
    /// Note: public so a deployment can grow the peer list while running
    /// (a base station joining mid-session).
    pub peers: Vec<SocketAddr>,
}

impl UdpFrameBus {
    /// Bind the bus to a local address and a set of peer nodes.
    ///
    /// Failure here is the transport failing bring-up: callers must treat
    /// it as fatal for the node.
    pub fn new(bind_address: SocketAddr, peers: Vec<SocketAddr>) -> Result<Self, Error> {
        let socket = UdpSocket::bind(bind_address)?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket, peers })
    }
}

impl FrameBus for UdpFrameBus {
    type Error = Error;

    fn send(&mut self, frame: &BusFrame) -> Result<(), Self::Error> {
        let wire = frame.to_wire();
        for peer in self.peers.iter() {
            self.socket.send_to(&wire, peer)?;
        }
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<BusFrame>, Self::Error> {
        let mut wire = [0u8; BusFrame::WIRE_LEN];
        loop {
            match self.socket.recv_from(&mut wire) {
                Ok((received, from)) => match BusFrame::from_wire(&wire[..received]) {
                    Ok(frame) => return Ok(Some(frame)),
                    Err(err) => {
                        // somebody not speaking our framing; skip to the
                        // next datagram
                        warn!("discarding malformed datagram from {}: {:?}", from, err);
                    }
                },
                Err(err) if err.kind() == ErrorKind::WouldBlock => return Ok(None),
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::{Ipv4Addr, SocketAddrV4};
    use std::thread::sleep;
    use std::time::Duration;

    use rand::random;

    fn local(port: u16) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port))
    }

    #[test]
    fn test_frame_crosses_the_wire() {
        let mut tx = UdpFrameBus::new(local(9300), vec![local(9301)]).unwrap();
        let mut rx = UdpFrameBus::new(local(9301), vec![]).unwrap();

        let value: u32 = random();
        let frame = BusFrame::new(0x01, &value.to_le_bytes()).unwrap();
        tx.send(&frame).unwrap();

        sleep(Duration::from_millis(50));
        assert_eq!(rx.poll().unwrap(), Some(frame));
    }

    #[test]
    fn test_send_reaches_every_peer() {
        let mut tx = UdpFrameBus::new(local(9302), vec![local(9303), local(9304)]).unwrap();
        let mut rx_a = UdpFrameBus::new(local(9303), vec![]).unwrap();
        let mut rx_b = UdpFrameBus::new(local(9304), vec![]).unwrap();

        let frame = BusFrame::new(0x3A, &87u32.to_le_bytes()).unwrap();
        tx.send(&frame).unwrap();

        sleep(Duration::from_millis(50));
        assert_eq!(rx_a.poll().unwrap(), Some(frame));
        assert_eq!(rx_b.poll().unwrap(), Some(frame));
    }

    #[test]
    fn test_poll_without_traffic_returns_immediately() {
        let mut rx = UdpFrameBus::new(local(9305), vec![]).unwrap();
        assert_eq!(rx.poll().unwrap(), None);
    }

    #[test]
    fn test_runt_datagram_is_skipped() {
        let mut rx = UdpFrameBus::new(local(9306), vec![]).unwrap();
        let raw = UdpSocket::bind(local(9307)).unwrap();
        raw.send_to(&[0xFF, 0x01], local(9306)).unwrap();

        let frame = BusFrame::new(0x02, &1500u32.to_le_bytes()).unwrap();
        let mut tx = UdpFrameBus::new(local(9308), vec![local(9306)]).unwrap();
        tx.send(&frame).unwrap();

        sleep(Duration::from_millis(50));
        // the runt is discarded and the real frame behind it is returned
        assert_eq!(rx.poll().unwrap(), Some(frame));
    }
}
