//! MIDI status bytes and the realtime messages that drive the transport.

use crate::state::TransportState;
use log::info;

pub const NOTE_OFF: u8 = 0x80;
pub const NOTE_ON: u8 = 0x90;
pub const KEY_PRESSURE: u8 = 0xA0;
pub const CONTROL_CHANGE: u8 = 0xB0;
pub const PROGRAM_CHANGE: u8 = 0xC0;
pub const CHANNEL_PRESSURE: u8 = 0xD0;
pub const PITCH_BEND_CHANGE: u8 = 0xE0;
pub const SYSEX_START: u8 = 0xF0;
pub const QUARTER_FRAME: u8 = 0xF1;
pub const SONG_POSITION_POINTER: u8 = 0xF2;
pub const SONG_SELECT: u8 = 0xF3;
pub const TUNE_REQUEST: u8 = 0xF6;
pub const SYSEX_END: u8 = 0xF7;
pub const TIMING_CLOCK: u8 = 0xF8;
pub const START: u8 = 0xFA;
pub const CONTINUE: u8 = 0xFB;
pub const STOP: u8 = 0xFC;
pub const ACTIVE_SENSE: u8 = 0xFE;
pub const RESET: u8 = 0xFF;

/// Realtime messages with a transport meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    Start,
    Continue,
    Stop,
}

impl TransportCommand {
    pub fn from_status(status: u8) -> Option<Self> {
        match status {
            START => Some(TransportCommand::Start),
            CONTINUE => Some(TransportCommand::Continue),
            STOP => Some(TransportCommand::Stop),
            _ => None,
        }
    }

    /// Applies the command from the control side. Start rewinds to the
    /// top before running; Continue resumes from the current position.
    pub fn apply(self, state: &TransportState) {
        let action = match self {
            TransportCommand::Start => {
                state.seek_to(0.0);
                state.set_running(true);
                "started"
            }
            TransportCommand::Continue => {
                state.set_running(true);
                "resumed"
            }
            TransportCommand::Stop => {
                state.set_running(false);
                "stopped"
            }
        };
        info!("MIDI {:?} received, transport {}", self, action);
    }
}
