//! Wire format: bounded payload ingest, tokenizer and command recognition.
//!
//! A request is an ASCII line `<command>[ <argument>]`. Tokens are separated
//! by whitespace or commas; anything after the argument is ignored.

use arrayvec::ArrayString;
use core::fmt;
use core::str::FromStr;
use heapless::Vec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_PAYLOAD_LEN: usize = 120;
pub const MAX_COMMAND_TOKEN_LEN: usize = 16;
pub const MAX_ARGUMENT_LEN: usize = 9;
/// Upper bound for the reply to any recognised command.
pub const MAX_REPLY_LEN: usize = 49;
/// Reply buffer size; large enough for the unknown-command help text.
pub const REPLY_CAPACITY: usize = 64;

pub type PayloadBuffer = Vec<u8, MAX_PAYLOAD_LEN>;
pub type CommandToken = ArrayString<MAX_COMMAND_TOKEN_LEN>;
pub type ArgumentToken = ArrayString<MAX_ARGUMENT_LEN>;

/// Outcome of copying a datagram into the payload buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    Complete,
    Truncated { received: usize, kept: usize },
}

#[derive(Debug, Clone, Default)]
pub struct Payload {
    bytes: PayloadBuffer,
}

impl Payload {
    /// Bounds-checked copy; bytes past [`MAX_PAYLOAD_LEN`] are dropped and
    /// reported.
    pub fn copy_from(data: &[u8]) -> (Self, Ingest) {
        let kept = data.len().min(MAX_PAYLOAD_LEN);
        let mut bytes = PayloadBuffer::new();
        // `kept` never exceeds the capacity
        let _ = bytes.extend_from_slice(&data[..kept]);

        let ingest = if kept < data.len() {
            Ingest::Truncated { received: data.len(), kept }
        } else {
            Ingest::Complete
        };
        (Self { bytes }, ingest)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    pub command: CommandToken,
    pub argument: ArgumentToken,
    /// A token was longer than its buffer and was cut short.
    pub truncated: bool,
}

fn is_separator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b','
}

fn push_token<const N: usize>(dst: &mut ArrayString<N>, token: &[u8]) -> bool {
    for &b in token {
        let c = if b.is_ascii_graphic() { b as char } else { '?' };
        if dst.try_push(c).is_err() {
            return true;
        }
    }
    false
}

/// Split a raw payload into command and argument tokens.
///
/// The payload ends at `raw.len()` or the first NUL, whichever comes first.
/// Never fails: empty or blank input gives two empty tokens.
pub fn parse_tokens(raw: &[u8]) -> Tokens {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let mut words = raw[..end].split(|&b| is_separator(b)).filter(|w| !w.is_empty());

    let mut tokens = Tokens::default();
    if let Some(word) = words.next() {
        tokens.truncated |= push_token(&mut tokens.command, word);
    }
    if let Some(word) = words.next() {
        tokens.truncated |= push_token(&mut tokens.argument, word);
    }
    tokens
}

/// C `atoi` semantics: optional leading whitespace and sign, then digits up
/// to the first non-digit. No digits gives 0; overflow saturates.
pub fn parse_int(text: &str) -> i32 {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// How a command token is compared with the command names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Token must equal the command name.
    #[default]
    Exact,
    /// Token matches if it contains the command name; first match in
    /// [`Command::DISPATCH_ORDER`] wins.
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown match mode `{0}` (expected `exact` or `substring`)")]
pub struct ParseMatchModeError(pub String);

impl FromStr for MatchMode {
    type Err = ParseMatchModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(MatchMode::Exact),
            "substring" => Ok(MatchMode::Substring),
            other => Err(ParseMatchModeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    LedOn,
    LedOff,
    LedAllOn,
    LedDim,
    TempSimOn,
    TempSimOff,
    SetTemp,
    GetTemp,
    GetLedStatus,
    GetNwStatus,
    GetTempStatus,
    Unknown,
}

impl Command {
    /// Recognised commands in first-match order.
    pub const DISPATCH_ORDER: [Command; 11] = [
        Command::LedOn,
        Command::LedOff,
        Command::LedAllOn,
        Command::LedDim,
        Command::TempSimOn,
        Command::TempSimOff,
        Command::SetTemp,
        Command::GetTemp,
        Command::GetLedStatus,
        Command::GetNwStatus,
        Command::GetTempStatus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::LedOn => "led_on",
            Command::LedOff => "led_off",
            Command::LedAllOn => "led_all_on",
            Command::LedDim => "led_dim",
            Command::TempSimOn => "TEMP_SIM_ON",
            Command::TempSimOff => "TEMP_SIM_OFF",
            Command::SetTemp => "SET_TEMP",
            Command::GetTemp => "GET_TEMP",
            Command::GetLedStatus => "GET_LED_STATUS",
            Command::GetNwStatus => "GET_NW_STATUS",
            Command::GetTempStatus => "GET_TEMP_STATUS",
            Command::Unknown => "",
        }
    }

    /// Case-sensitive recognition of a command token.
    pub fn recognize(token: &str, mode: MatchMode) -> Command {
        if token.is_empty() {
            return Command::Unknown;
        }
        let matches = |cmd: &&Command| match mode {
            MatchMode::Exact => token == cmd.name(),
            MatchMode::Substring => token.contains(cmd.name()),
        };
        Self::DISPATCH_ORDER
            .iter()
            .find(matches)
            .copied()
            .unwrap_or(Command::Unknown)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Unknown => write!(f, "<unknown>"),
            other => f.write_str(other.name()),
        }
    }
}

/// Fixed-capacity reply text. Writes past the capacity are dropped at a
/// character boundary and flagged instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    text: ArrayString<REPLY_CAPACITY>,
    truncated: bool,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Write for Reply {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        for c in s.chars() {
            if self.text.try_push(c).is_err() {
                self.truncated = true;
                break;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
