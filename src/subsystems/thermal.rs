use super::Subsystem;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TEMP_MIN_C: i16 = 20;
pub const TEMP_MAX_C: i16 = 35;
pub const TEMP_STEP_C: i16 = 1;
pub const INITIAL_TEMP_C: i16 = 25;
/// Widest limits a configuration may ask for. Three characters of decimal
/// text keep `GET_LED_STATUS` within the reply bound.
pub const TEMP_FLOOR_C: i16 = -99;
pub const TEMP_CEIL_C: i16 = 999;

/// Bounds and step of the temperature simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureLimits {
    pub min_c: i16,
    pub max_c: i16,
    pub step_c: i16,
}

impl Default for TemperatureLimits {
    fn default() -> Self {
        Self {
            min_c: TEMP_MIN_C,
            max_c: TEMP_MAX_C,
            step_c: TEMP_STEP_C,
        }
    }
}

impl TemperatureLimits {
    pub fn contains(&self, value: i32) -> bool {
        value >= i32::from(self.min_c) && value <= i32::from(self.max_c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Rising,
    Falling,
}

impl Direction {
    fn sign(self) -> i32 {
        match self {
            Direction::Rising => 1,
            Direction::Falling => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedTemperature {
    pub value_c: i16,
    pub direction: Direction,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("temperature {requested}°C outside {min_c}..={max_c}°C")]
pub struct TemperatureOutOfRange {
    pub requested: i32,
    pub min_c: i16,
    pub max_c: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalCommand {
    SetSimulation(bool),
    SetTemperature(i32),
}

/// Triangle-wave temperature simulator bounded by [`TemperatureLimits`].
#[derive(Debug)]
pub struct ThermalSystem {
    state: SimulatedTemperature,
    limits: TemperatureLimits,
}

impl ThermalSystem {
    /// Starts rising with the simulation disabled. An initial value outside
    /// the limits is clamped into them.
    pub fn new(limits: TemperatureLimits, initial_c: i16) -> Self {
        Self {
            state: SimulatedTemperature {
                value_c: initial_c.clamp(limits.min_c, limits.max_c),
                direction: Direction::Rising,
                enabled: false,
            },
            limits,
        }
    }

    /// Advance the simulation by one step. Returns `false` when disabled.
    pub fn tick(&mut self) -> bool {
        if !self.state.enabled {
            return false;
        }

        let min = self.limits.min_c;
        let max = self.limits.max_c;

        // Already sitting on the bound it is heading for (SET_TEMP can leave it
        // there): turn around first so the step never pushes past the bound.
        match self.state.direction {
            Direction::Rising if self.state.value_c >= max => self.state.direction = Direction::Falling,
            Direction::Falling if self.state.value_c <= min => self.state.direction = Direction::Rising,
            _ => {}
        }

        let next = i32::from(self.state.value_c)
            + i32::from(self.limits.step_c) * self.state.direction.sign();

        if next >= i32::from(max) {
            self.state.value_c = max;
            self.state.direction = Direction::Falling;
        } else if next <= i32::from(min) {
            self.state.value_c = min;
            self.state.direction = Direction::Rising;
        } else {
            self.state.value_c = next as i16;
        }

        debug_assert!(
            self.limits.contains(i32::from(self.state.value_c)),
            "Simulated temperature {} escaped {}..={}",
            self.state.value_c, min, max
        );

        true
    }

    /// Bounds-checked direct write. Direction and the enable flag are kept.
    pub fn set_temperature(&mut self, requested: i32) -> Result<i16, TemperatureOutOfRange> {
        if !self.limits.contains(requested) {
            return Err(TemperatureOutOfRange {
                requested,
                min_c: self.limits.min_c,
                max_c: self.limits.max_c,
            });
        }
        self.state.value_c = requested as i16;
        Ok(self.state.value_c)
    }

    pub fn set_simulation(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    pub fn temperature_c(&self) -> i16 {
        self.state.value_c
    }

    pub fn is_simulating(&self) -> bool {
        self.state.enabled
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn limits(&self) -> TemperatureLimits {
        self.limits
    }
}

impl Default for ThermalSystem {
    fn default() -> Self {
        Self::new(TemperatureLimits::default(), INITIAL_TEMP_C)
    }
}

impl Subsystem for ThermalSystem {
    type State = SimulatedTemperature;
    type Command = ThermalCommand;
    type Error = TemperatureOutOfRange;

    fn execute_command(&mut self, command: Self::Command) -> Result<(), Self::Error> {
        match command {
            ThermalCommand::SetSimulation(enabled) => {
                self.set_simulation(enabled);
                Ok(())
            }
            ThermalCommand::SetTemperature(value) => self.set_temperature(value).map(|_| ()),
        }
    }

    fn get_state(&self) -> Self::State {
        self.state.clone()
    }
}
