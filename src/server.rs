//! Single-task event loop: one UDP socket and one re-armed timer.

use crate::error::NodeError;
use crate::node::{Node, NodeStats};
use crate::subsystems::{LedDriver, RadioDriver};
use std::future::Future;
use std::io::ErrorKind;
use tokio::net::UdpSocket;
use tokio::time::{self, Instant};
use tracing::{error, info, warn};

/// Receive buffer; larger than the payload cap so oversize datagrams are
/// seen at their real length and reported as truncated.
pub const RECV_BUFFER_LEN: usize = 2048;

pub async fn bind<L, R>(node: &Node<L, R>) -> Result<UdpSocket, NodeError>
where
    L: LedDriver,
    R: RadioDriver,
{
    let addr = node.config().listen_addr();
    let socket = UdpSocket::bind(addr)
        .await
        .map_err(|source| NodeError::Bind { addr, source })?;
    info!("🌐 listening on udp {}", socket.local_addr().unwrap_or(addr));
    Ok(socket)
}

/// Drive `node` from `socket` and its tick timer until `shutdown` resolves.
///
/// Events are taken in a fixed priority (shutdown, datagram, timer) and each
/// handler runs to completion before the next wait.
pub async fn serve<L, R, F>(node: &mut Node<L, R>, socket: &UdpSocket, shutdown: F) -> Result<(), NodeError>
where
    L: LedDriver,
    R: RadioDriver,
    F: Future<Output = ()>,
{
    let period = node.config().tick_period();
    let mut buf = vec![0u8; RECV_BUFFER_LEN];

    let timer = time::sleep(period);
    tokio::pin!(timer);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                info!("🛑 shutdown requested");
                return Ok(());
            }

            received = socket.recv_from(&mut buf) => {
                let (len, peer) = match received {
                    Ok(r) => r,
                    // ICMP fallout from an earlier reply; not fatal for a datagram endpoint
                    Err(e) if matches!(e.kind(), ErrorKind::ConnectionReset | ErrorKind::ConnectionRefused) => {
                        warn!("ignoring receive error: {}", e);
                        continue;
                    }
                    Err(e) => {
                        error!("❌ receive failed: {}", e);
                        return Err(NodeError::Receive(e));
                    }
                };

                let handled = node.handle_datagram(&buf[..len], peer);
                match socket.send_to(handled.reply.as_bytes(), handled.peer).await {
                    Ok(_) => node.finish_request(true),
                    Err(e) => {
                        warn!("failed to send reply to {}: {}", handled.peer, e);
                        node.finish_request(false);
                    }
                }
            }

            () = &mut timer => {
                node.on_tick();
                timer.as_mut().reset(Instant::now() + period);
            }
        }
    }
}

/// Bind per the node's config and serve until `shutdown`. Returns the final
/// statistics.
pub async fn run<L, R, F>(mut node: Node<L, R>, shutdown: F) -> Result<NodeStats, NodeError>
where
    L: LedDriver,
    R: RadioDriver,
    F: Future<Output = ()>,
{
    let socket = bind(&node).await?;
    serve(&mut node, &socket, shutdown).await?;
    Ok(*node.stats())
}
