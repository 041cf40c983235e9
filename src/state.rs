use crate::config::NodeConfig;
use crate::subsystems::{LedDriver, LedSystem, RadioDriver, RadioSystem, ThermalSystem};

/// Everything the dispatcher reads and writes. Owned by a single node; no
/// other component mutates it.
#[derive(Debug)]
pub struct DeviceState<L, R> {
    pub node_id: u8,
    pub leds: LedSystem<L>,
    pub thermal: ThermalSystem,
    pub radio: RadioSystem<R>,
}

impl<L: LedDriver, R: RadioDriver> DeviceState<L, R> {
    pub fn new(config: &NodeConfig, leds: L, radio: R) -> Self {
        Self {
            node_id: config.node_id,
            leds: LedSystem::new(leds),
            thermal: ThermalSystem::new(config.temperature, config.initial_temp_c),
            radio: RadioSystem::new(radio, config.pan_id),
        }
    }
}
