use crate::protocol::{parse_int, Command, MatchMode, Reply, Tokens, MAX_REPLY_LEN, REPLY_CAPACITY};
use crate::state::DeviceState;
use crate::subsystems::{LedCommand, LedDriver, RadioDriver, Subsystem, ThermalCommand};
use core::fmt::Write;
use static_assertions::const_assert;
use tracing::debug;

pub const REPLY_LED_ON: &str = "Red LED turned ON";
pub const REPLY_LED_OFF: &str = "Red LED turned OFF";
pub const REPLY_LED_ALL_ON: &str = "All LEDs turned ON";
pub const REPLY_SIM_STARTED: &str = "Temperature simulation started";
pub const REPLY_SIM_STOPPED: &str = "Temperature simulation stopped";
pub const REPLY_UNKNOWN: &str = "Unknown cmd. Use: led_on, led_off, GET_TEMP, TEMP_SIM_ON/OFF";

const_assert!(REPLY_LED_ON.len() <= MAX_REPLY_LEN);
const_assert!(REPLY_LED_OFF.len() <= MAX_REPLY_LEN);
const_assert!(REPLY_LED_ALL_ON.len() <= MAX_REPLY_LEN);
const_assert!(REPLY_SIM_STARTED.len() <= MAX_REPLY_LEN);
const_assert!(REPLY_SIM_STOPPED.len() <= MAX_REPLY_LEN);
const_assert!(REPLY_UNKNOWN.len() <= REPLY_CAPACITY);

/// Result of dispatching one request.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub command: Command,
    pub reply: Reply,
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

/// Execute one tokenized request against the device state.
///
/// Total over its input: every token pair yields exactly one reply and at
/// most one state change. Unrecognised tokens change nothing.
pub fn dispatch<L: LedDriver, R: RadioDriver>(
    tokens: &Tokens,
    mode: MatchMode,
    state: &mut DeviceState<L, R>,
) -> Dispatched {
    let command = Command::recognize(&tokens.command, mode);
    let argument = tokens.argument.as_str();
    let mut reply = Reply::new();

    debug!(%command, token = %tokens.command, argument, "dispatch");

    // Writes into `Reply` never fail; overflow is recorded on the reply itself.
    let _ = match command {
        Command::LedOn => {
            state.leds.execute_command(LedCommand::RedOn).ok();
            reply.write_str(REPLY_LED_ON)
        }
        Command::LedOff => {
            state.leds.execute_command(LedCommand::RedOff).ok();
            reply.write_str(REPLY_LED_OFF)
        }
        Command::LedAllOn => {
            state.leds.execute_command(LedCommand::AllOn).ok();
            reply.write_str(REPLY_LED_ALL_ON)
        }
        Command::LedDim => {
            let level = parse_int(argument).clamp(0, i32::from(u8::MAX)) as u8;
            state.leds.execute_command(LedCommand::Dim(level)).ok();
            write!(reply, "Blue LED toggled, dim = {argument}")
        }
        Command::TempSimOn => {
            state.thermal.execute_command(ThermalCommand::SetSimulation(true)).ok();
            reply.write_str(REPLY_SIM_STARTED)
        }
        Command::TempSimOff => {
            state.thermal.execute_command(ThermalCommand::SetSimulation(false)).ok();
            reply.write_str(REPLY_SIM_STOPPED)
        }
        Command::SetTemp => {
            match state.thermal.execute_command(ThermalCommand::SetTemperature(parse_int(argument))) {
                Ok(()) => write!(reply, "Temperature set to {}°C", state.thermal.temperature_c()),
                Err(e) => {
                    debug!(requested = e.requested, "temperature rejected");
                    write!(reply, "Invalid temperature. Range: {}-{}°C", e.min_c, e.max_c)
                }
            }
        }
        Command::GetTemp => write!(reply, "Current temperature: {}°C", state.thermal.temperature_c()),
        Command::GetLedStatus => {
            let led = state.leds.state();
            write!(
                reply,
                "LED: id={};power={};temp={};dim={};status=0x{:02X}",
                led.id,
                led.power,
                state.thermal.temperature_c(),
                led.dim_level,
                led.status.code()
            )
        }
        Command::GetNwStatus => {
            let net = state.radio.snapshot();
            write!(
                reply,
                "Net: ch={};rssi={};lqi={};tx={};pan=0x{:04X}",
                net.channel, net.rssi_dbm, net.link_quality, net.tx_power_dbm, net.pan_id
            )
        }
        Command::GetTempStatus => write!(
            reply,
            "[Node {}] Temp:{}°C;sim={};red_led={}",
            state.node_id,
            state.thermal.temperature_c(),
            on_off(state.thermal.is_simulating()),
            on_off(state.leds.state().red_on)
        ),
        Command::Unknown => reply.write_str(REPLY_UNKNOWN),
    };

    Dispatched { command, reply }
}
