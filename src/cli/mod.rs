use crate::config::TransportConfig;
use crate::error::{Result, TransportError};
use crate::midi::TransportCommand;
use crate::state::TransportState;
use clap::Parser;
use std::path::PathBuf;

/// Drives a simulated audio callback through the transport and shows the
/// resulting clock on the console.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Transport configuration file (toml, json, yaml, ini)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the configured tempo in BPM
    #[arg(long)]
    pub tempo: Option<f64>,

    /// Override the configured time signature, e.g. 7/8
    #[arg(long, value_parser = parse_time_signature)]
    pub time_signature: Option<(u16, u16)>,

    /// Start from this beat position instead of the configured one
    #[arg(long)]
    pub seek: Option<f64>,

    /// Simulated host sample rate in Hz
    #[arg(long, default_value_t = 48_000)]
    pub sample_rate: u32,

    /// Samples per processing block
    #[arg(long, default_value_t = 512)]
    pub block_size: u32,

    /// Number of blocks to run before exiting, 0 runs until interrupted
    #[arg(long, default_value_t = 0)]
    pub blocks: u64,
}

impl Args {
    /// Folds command-line overrides into a loaded configuration.
    pub fn apply_overrides(&self, config: &mut TransportConfig) {
        if let Some(tempo) = self.tempo {
            config.tempo = tempo;
        }
        if let Some((num, den)) = self.time_signature {
            config.time_sig_num = num;
            config.time_sig_denom = den;
        }
    }
}

pub fn parse_time_signature(value: &str) -> std::result::Result<(u16, u16), String> {
    let (num, den) = value
        .split_once('/')
        .ok_or_else(|| format!("Expected NUM/DEN, got '{}'", value))?;
    let num = num
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("Invalid numerator '{}': {}", num, e))?;
    let den = den
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("Invalid denominator '{}': {}", den, e))?;
    if num == 0 || den == 0 {
        return Err(format!("Time signature {}/{} has a zero component", num, den));
    }
    Ok((num, den))
}

pub fn validate_block_settings(
    sample_rate: u32,
    block_size: u32,
) -> std::result::Result<(), String> {
    if sample_rate == 0 {
        return Err("Error: sample rate must be greater than zero".to_string());
    }
    if block_size == 0 {
        return Err("Error: block size must be greater than zero".to_string());
    }
    Ok(())
}

/// A control-side instruction typed at the console while the host runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    Start,
    Stop,
    Tempo(f64),
    TimeSignature(u16, u16),
    Seek(f64),
    /// Raw MIDI status byte, as sent by an external sequencer.
    Midi(u8),
    Quit,
}

impl ControlCommand {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or_else(|| "Empty command".to_string())?;
        let argument = words.next();

        let number = |what: &str| -> std::result::Result<f64, String> {
            argument
                .ok_or_else(|| format!("'{}' needs a value", what))?
                .parse::<f64>()
                .map_err(|e| format!("Invalid {} value: {}", what, e))
        };

        match command {
            "start" | "play" => Ok(ControlCommand::Start),
            "stop" => Ok(ControlCommand::Stop),
            "tempo" => Ok(ControlCommand::Tempo(number("tempo")?)),
            "seek" => Ok(ControlCommand::Seek(number("seek")?)),
            "sig" => {
                let value = argument.ok_or_else(|| "'sig' needs a value".to_string())?;
                let (num, den) = parse_time_signature(value)?;
                Ok(ControlCommand::TimeSignature(num, den))
            }
            "midi" => {
                let value = argument.ok_or_else(|| "'midi' needs a status byte".to_string())?;
                Ok(ControlCommand::Midi(parse_status_byte(value)?))
            }
            "quit" | "exit" => Ok(ControlCommand::Quit),
            other => Err(format!("Unknown command '{}'", other)),
        }
    }

    /// Applies the command to the shared transport. `Quit` is left to the
    /// caller.
    pub fn apply(self, state: &TransportState) -> Result<()> {
        match self {
            ControlCommand::Start => state.set_running(true),
            ControlCommand::Stop => state.set_running(false),
            ControlCommand::Tempo(bpm) => state.set_tempo(bpm)?,
            ControlCommand::TimeSignature(num, den) => state.set_time_signature(num, den)?,
            ControlCommand::Seek(beat) => state.seek_to(beat),
            ControlCommand::Midi(status) => TransportCommand::from_status(status)
                .ok_or_else(|| {
                    TransportError::InvalidArgument(format!(
                        "status byte 0x{:02X} has no transport meaning",
                        status
                    ))
                })?
                .apply(state),
            ControlCommand::Quit => {}
        }
        Ok(())
    }
}

/// Accepts `0xFA`-style hex or plain decimal.
fn parse_status_byte(value: &str) -> std::result::Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse::<u8>(),
    };
    parsed.map_err(|e| format!("Invalid status byte '{}': {}", value, e))
}
