//! # SLS Sensor Node
//!
//! Firmware-style service for a low-power wireless sensor node. The node
//! accepts short text commands over UDP, drives an LED bank, runs a simulated
//! temperature sensor and answers with a one-line status string.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::net::SocketAddr;
//! use slsnode::{Node, NodeConfig};
//! use slsnode::subsystems::{SimulatedLeds, SimulatedRadio};
//!
//! let mut node = Node::new(NodeConfig::default(), SimulatedLeds::new(), SimulatedRadio::default());
//! let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
//!
//! let handled = node.handle_datagram(b"SET_TEMP 28", peer);
//! assert_eq!(handled.reply.as_str(), "Temperature set to 28°C");
//!
//! // Simulation is off until TEMP_SIM_ON
//! assert!(!node.on_tick());
//! ```
//!
//! ## Architecture
//!
//! - [`protocol`] - payload ingest, tokenizer, command recognition, reply buffer
//! - [`dispatcher`] - executes a recognised command against the device state
//! - [`subsystems`] - LED bank, temperature simulator and radio telemetry
//! - [`state`] - the device state store owned by the node
//! - [`node`] - datagram and tick handlers
//! - [`server`] - tokio event loop binding the node to a UDP socket

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod node;
pub mod protocol;
pub mod server;
pub mod state;
pub mod subsystems;

// Re-export main public types for convenience
pub use config::NodeConfig;
pub use error::NodeError;
pub use node::{Handled, Node, NodeStats};
pub use protocol::{Command, MatchMode, Reply};
pub use state::DeviceState;
