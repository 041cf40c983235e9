pub mod led;
pub mod thermal;
pub mod radio;

pub use led::{ActuatorState, LedAction, LedBank, LedCommand, LedDriver, LedStatus, LedSystem, SimulatedLeds};
pub use thermal::{Direction, TemperatureLimits, TemperatureOutOfRange, ThermalCommand, ThermalSystem, SimulatedTemperature};
pub use radio::{PacketAttr, RadioDriver, RadioParam, RadioSystem, RadioTelemetrySnapshot, SimulatedRadio};

use serde::Serialize;

/// Common surface of the node's device subsystems.
///
/// Commands are applied synchronously; a rejected command must leave the
/// subsystem state exactly as it was.
pub trait Subsystem {
    type State: Clone + Serialize;
    type Command: Clone;
    type Error;

    fn execute_command(&mut self, command: Self::Command) -> Result<(), Self::Error>;
    fn get_state(&self) -> Self::State;
}
