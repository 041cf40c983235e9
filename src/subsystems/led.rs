use super::Subsystem;
use core::convert::Infallible;
use serde::{Deserialize, Serialize};

const LED_RECORD_ID: u8 = 0x20;
const LED_RECORD_POWER: u8 = 120;
const DEFAULT_DIM_LEVEL: u8 = 80;

/// Physical LED bank on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedBank {
    Red,
    Green,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedAction {
    On,
    Off,
    Toggle,
}

/// Actuator driver collaborator.
pub trait LedDriver {
    fn set(&mut self, bank: LedBank, action: LedAction);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedStatus {
    Off,
    On,
    Dimmed,
}

impl LedStatus {
    /// Status byte as reported in `GET_LED_STATUS`.
    pub fn code(self) -> u8 {
        match self {
            LedStatus::Off => 0x00,
            LedStatus::On => 0x01,
            LedStatus::Dimmed => 0x02,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorState {
    pub id: u8,
    pub power: u8,
    pub status: LedStatus,
    pub dim_level: u8,
    pub red_on: bool,            // tracked separately from `status`, led_dim leaves it alone
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self {
            id: LED_RECORD_ID,
            power: LED_RECORD_POWER,
            status: LedStatus::On,
            dim_level: DEFAULT_DIM_LEVEL,
            red_on: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCommand {
    RedOn,
    RedOff,
    AllOn,
    Dim(u8),
}

/// LED bank: the reported actuator record plus the driver that moves the
/// physical outputs.
#[derive(Debug)]
pub struct LedSystem<D> {
    state: ActuatorState,
    driver: D,
}

impl<D: LedDriver> LedSystem<D> {
    pub fn new(driver: D) -> Self {
        Self {
            state: ActuatorState::default(),
            driver,
        }
    }

    /// Network activity indicator on the blue bank. Does not touch the
    /// reported actuator record.
    pub fn indicate_activity(&mut self, active: bool) {
        let action = if active { LedAction::On } else { LedAction::Off };
        self.driver.set(LedBank::Blue, action);
    }

    pub fn state(&self) -> &ActuatorState {
        &self.state
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: LedDriver> Subsystem for LedSystem<D> {
    type State = ActuatorState;
    type Command = LedCommand;
    type Error = Infallible;

    fn execute_command(&mut self, command: Self::Command) -> Result<(), Self::Error> {
        match command {
            LedCommand::RedOn => {
                self.driver.set(LedBank::Red, LedAction::On);
                self.state.red_on = true;
                self.state.status = LedStatus::On;
            }
            LedCommand::RedOff => {
                self.driver.set(LedBank::Red, LedAction::Off);
                self.state.red_on = false;
                self.state.status = LedStatus::Off;
            }
            LedCommand::AllOn => {
                self.driver.set(LedBank::Green, LedAction::On);
                self.driver.set(LedBank::Red, LedAction::On);
                self.driver.set(LedBank::Blue, LedAction::On);
                self.state.red_on = true;
                self.state.status = LedStatus::On;
            }
            LedCommand::Dim(level) => {
                self.driver.set(LedBank::Blue, LedAction::Toggle);
                self.state.status = LedStatus::Dimmed;
                self.state.dim_level = level;
            }
        }
        Ok(())
    }

    fn get_state(&self) -> Self::State {
        self.state.clone()
    }
}

/// Host-side LED driver: keeps the on/off level of each bank and logs changes.
#[derive(Debug, Default, Clone)]
pub struct SimulatedLeds {
    levels: [bool; 3],
    writes: u32,
}

impl SimulatedLeds {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(bank: LedBank) -> usize {
        match bank {
            LedBank::Red => 0,
            LedBank::Green => 1,
            LedBank::Blue => 2,
        }
    }

    pub fn is_on(&self, bank: LedBank) -> bool {
        self.levels[Self::index(bank)]
    }

    /// Number of driver calls seen so far.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl LedDriver for SimulatedLeds {
    fn set(&mut self, bank: LedBank, action: LedAction) {
        let level = &mut self.levels[Self::index(bank)];
        *level = match action {
            LedAction::On => true,
            LedAction::Off => false,
            LedAction::Toggle => !*level,
        };
        self.writes = self.writes.wrapping_add(1);
        tracing::trace!(?bank, ?action, on = *level, "led");
    }
}
