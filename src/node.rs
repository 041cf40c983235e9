use crate::config::NodeConfig;
use crate::dispatcher::dispatch;
use crate::protocol::{parse_tokens, Command, Ingest, Payload, Reply};
use crate::state::DeviceState;
use crate::subsystems::{LedDriver, RadioDriver};
use serde::Serialize;
use std::net::SocketAddr;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeStats {
    pub datagrams_received: u32,
    pub replies_sent: u32,
    pub send_failures: u32,
    pub truncated_payloads: u32,
    pub truncated_tokens: u32,
    pub unknown_commands: u32,
    pub ticks: u32,
    pub simulation_steps: u32,
}

/// Outcome of handling one datagram: where the reply goes and what it says.
#[derive(Debug, Clone)]
pub struct Handled {
    pub peer: SocketAddr,
    pub ingest: Ingest,
    pub command: Command,
    pub reply: Reply,
}

/// The sensor node: device state plus the two event handlers that drive it.
///
/// Both handlers run to completion and take `&mut self`, so a datagram and a
/// tick can never interleave.
#[derive(Debug)]
pub struct Node<L, R> {
    config: NodeConfig,
    state: DeviceState<L, R>,
    stats: NodeStats,
}

impl<L: LedDriver, R: RadioDriver> Node<L, R> {
    pub fn new(config: NodeConfig, leds: L, radio: R) -> Self {
        let state = DeviceState::new(&config, leds, radio);
        Self {
            config,
            state,
            stats: NodeStats::default(),
        }
    }

    /// Datagram-arrived handler.
    ///
    /// The sender is only remembered in the returned [`Handled`]; nothing
    /// about the peer outlives the request. The activity LED stays lit until
    /// [`Node::finish_request`] reports the reply send.
    pub fn handle_datagram(&mut self, data: &[u8], peer: SocketAddr) -> Handled {
        self.state.leds.indicate_activity(true);
        self.stats.datagrams_received = self.stats.datagrams_received.wrapping_add(1);

        let (payload, ingest) = Payload::copy_from(data);
        if let Ingest::Truncated { received, kept } = ingest {
            self.stats.truncated_payloads = self.stats.truncated_payloads.wrapping_add(1);
            warn!(%peer, received, kept, "oversized datagram truncated");
        }
        debug!(%peer, len = payload.len(), "datagram received");

        self.state.radio.refresh();

        let tokens = parse_tokens(payload.as_bytes());
        if tokens.truncated {
            self.stats.truncated_tokens = self.stats.truncated_tokens.wrapping_add(1);
            warn!(%peer, command = %tokens.command, "token exceeded buffer and was truncated");
        }

        let dispatched = dispatch(&tokens, self.config.match_mode, &mut self.state);
        if dispatched.command == Command::Unknown {
            self.stats.unknown_commands = self.stats.unknown_commands.wrapping_add(1);
        }
        if dispatched.reply.is_truncated() {
            warn!(command = %dispatched.command, "reply truncated to buffer capacity");
        }
        info!(%peer, command = %dispatched.command, reply = %dispatched.reply, "handled");

        Handled {
            peer,
            ingest,
            command: dispatched.command,
            reply: dispatched.reply,
        }
    }

    /// Timer-expired handler. The caller re-arms the timer.
    pub fn on_tick(&mut self) -> bool {
        self.stats.ticks = self.stats.ticks.wrapping_add(1);
        let advanced = self.state.thermal.tick();
        if advanced {
            self.stats.simulation_steps = self.stats.simulation_steps.wrapping_add(1);
            info!(
                "[Node {}] Temp: {}°C ({:?})",
                self.state.node_id,
                self.state.thermal.temperature_c(),
                self.state.thermal.direction()
            );
        }
        advanced
    }

    /// Close out a request once its reply has been sent (or failed to send).
    pub fn finish_request(&mut self, sent: bool) {
        self.state.leds.indicate_activity(false);
        if sent {
            self.stats.replies_sent = self.stats.replies_sent.wrapping_add(1);
        } else {
            self.stats.send_failures = self.stats.send_failures.wrapping_add(1);
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn state(&self) -> &DeviceState<L, R> {
        &self.state
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }
}
