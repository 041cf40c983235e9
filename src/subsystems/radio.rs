use core::cell::Cell;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAN_ID: u16 = 0xABCD;
const DEFAULT_CHANNEL: u8 = 26;
const DEFAULT_TX_POWER_DBM: i8 = 0;
const NOMINAL_RSSI_DBM: i8 = -45;
const NOMINAL_LQI: u8 = 107;

/// Radio parameters readable through [`RadioDriver::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioParam {
    Channel,
    TxPower,
}

/// Attributes of the most recently received frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketAttr {
    Rssi,
    LinkQuality,
}

/// Radio/network query collaborator.
pub trait RadioDriver {
    fn get(&self, param: RadioParam) -> i32;
    fn packet_attr(&self, attr: PacketAttr) -> i32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RadioTelemetrySnapshot {
    pub channel: u8,
    pub rssi_dbm: i8,
    pub link_quality: u8,
    pub tx_power_dbm: i8,
    pub pan_id: u16,
}

fn saturate_u8(v: i32) -> u8 {
    v.clamp(0, i32::from(u8::MAX)) as u8
}

fn saturate_i8(v: i32) -> i8 {
    v.clamp(i32::from(i8::MIN), i32::from(i8::MAX)) as i8
}

/// Keeps the telemetry snapshot the dispatcher reports from.
#[derive(Debug)]
pub struct RadioSystem<R> {
    driver: R,
    snapshot: RadioTelemetrySnapshot,
}

impl<R: RadioDriver> RadioSystem<R> {
    pub fn new(driver: R, pan_id: u16) -> Self {
        Self {
            driver,
            snapshot: RadioTelemetrySnapshot {
                pan_id,
                ..RadioTelemetrySnapshot::default()
            },
        }
    }

    /// Re-sample channel, TX power and the last frame's link metrics.
    pub fn refresh(&mut self) -> &RadioTelemetrySnapshot {
        self.snapshot.channel = saturate_u8(self.driver.get(RadioParam::Channel));
        self.snapshot.rssi_dbm = saturate_i8(self.driver.packet_attr(PacketAttr::Rssi));
        self.snapshot.link_quality = saturate_u8(self.driver.packet_attr(PacketAttr::LinkQuality));
        self.snapshot.tx_power_dbm = saturate_i8(self.driver.get(RadioParam::TxPower));
        &self.snapshot
    }

    pub fn snapshot(&self) -> &RadioTelemetrySnapshot {
        &self.snapshot
    }

    pub fn driver(&self) -> &R {
        &self.driver
    }
}

/// Host-side radio with a fixed channel and a slowly wandering link.
#[derive(Debug)]
pub struct SimulatedRadio {
    channel: u8,
    tx_power_dbm: i8,
    frames: Cell<u32>,
}

impl SimulatedRadio {
    pub fn new(channel: u8, tx_power_dbm: i8) -> Self {
        Self {
            channel,
            tx_power_dbm,
            frames: Cell::new(0),
        }
    }
}

impl Default for SimulatedRadio {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL, DEFAULT_TX_POWER_DBM)
    }
}

impl RadioDriver for SimulatedRadio {
    fn get(&self, param: RadioParam) -> i32 {
        match param {
            RadioParam::Channel => i32::from(self.channel),
            RadioParam::TxPower => i32::from(self.tx_power_dbm),
        }
    }

    fn packet_attr(&self, attr: PacketAttr) -> i32 {
        let n = self.frames.get();
        match attr {
            // Each RSSI read stands for a new received frame
            PacketAttr::Rssi => {
                self.frames.set(n.wrapping_add(1));
                i32::from(NOMINAL_RSSI_DBM) - (n % 7) as i32
            }
            PacketAttr::LinkQuality => i32::from(NOMINAL_LQI) - ((n % 5) * 2) as i32,
        }
    }
}
