use anyhow::{Context, Result};
use log::{debug, warn};
use rtk_relay::{CorrectionLink, RelayQueue};
use std::{
    io,
    net::{SocketAddr, UdpSocket},
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

/// Largest datagram read off the socket; anything above the configured frame size is
/// refused by the queue anyway.
const RECV_BUF_LEN: usize = 1500;

/// Pause after a failed receive before trying again
const RECV_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Consecutive receive failures between two warnings
const RECV_FAILURE_REPORT_INTERVAL: u32 = 50;

/// Warn on the first failure of a streak, then every [RECV_FAILURE_REPORT_INTERVAL].
fn is_failure_reported(failures: u32) -> bool {
    failures == 1 || failures % RECV_FAILURE_REPORT_INTERVAL == 0
}

/// Fire-and-forget UDP correction link.
pub struct UdpLink {
    socket: UdpSocket,
    peer: SocketAddr,
    max_frame_len: usize,
}

impl UdpLink {
    pub fn bind(bind: SocketAddr, peer: SocketAddr, max_frame_len: usize) -> Result<Self> {
        let socket =
            UdpSocket::bind(bind).with_context(|| format!("Failed to bind UDP socket {}", bind))?;
        socket
            .set_broadcast(true)
            .context("Failed to enable UDP broadcast")?;
        Ok(Self {
            socket,
            peer,
            max_frame_len,
        })
    }

    /// Receive side: every datagram becomes one queued frame. Runs for the process
    /// lifetime.
    pub fn spawn_receiver(&self, queue: Arc<RelayQueue>) -> Result<JoinHandle<()>> {
        let socket = self
            .socket
            .try_clone()
            .context("Failed to clone UDP socket")?;
        let handle = thread::Builder::new()
            .name("udp-rx".into())
            .spawn(move || {
                let mut buf = [0u8; RECV_BUF_LEN];
                let mut failures = 0u32;
                loop {
                    match socket.recv_from(&mut buf) {
                        Ok((len, from)) => {
                            failures = 0;
                            debug!("received {} bytes from {}", len, from);
                            queue.offer(&buf[..len]);
                        },
                        Err(e) => {
                            failures = failures.wrapping_add(1);
                            if is_failure_reported(failures) {
                                warn!("UDP receive failed ({} in a row): {}", failures, e);
                            }
                            thread::sleep(RECV_RETRY_DELAY);
                        },
                    }
                }
            })
            .context("Failed to spawn UDP receive thread")?;
        Ok(handle)
    }
}

impl CorrectionLink for UdpLink {
    type Error = io::Error;

    fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }

    fn send(&mut self, payload: &[u8]) -> io::Result<()> {
        self.socket.send_to(payload, self.peer).map(|_| ())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn receive_failures_reported_sparingly() {
        let reported: Vec<u32> = (1..=120).filter(|&n| is_failure_reported(n)).collect();
        assert_eq!(reported, vec![1, 50, 100]);
    }

    #[test]
    fn receiver_queues_each_datagram() {
        let rx = UdpLink::bind(
            SocketAddr::from(([127, 0, 0, 1], 0)),
            SocketAddr::from(([127, 0, 0, 1], 0)),
            250,
        )
        .unwrap();
        let rx_addr = rx.socket.local_addr().unwrap();
        let queue = Arc::new(RelayQueue::new(rtk_relay::QueueConfig::default()));
        let _handle = rx.spawn_receiver(Arc::clone(&queue)).unwrap();

        let mut tx = UdpLink::bind(SocketAddr::from(([127, 0, 0, 1], 0)), rx_addr, 250).unwrap();
        tx.send(&[0xd3, 0x00, 0x01]).unwrap();

        let mut waited = 0;
        while queue.is_empty() && waited < 100 {
            thread::sleep(Duration::from_millis(10));
            waited += 1;
        }
        let frames = queue.dequeue_batch();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].as_bytes(), &[0xd3, 0x00, 0x01]);
    }
}
