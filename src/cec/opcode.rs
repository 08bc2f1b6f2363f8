// Command names follow http://www.cec-o-matic.com/
use crate::cec::Error;
use lazy_static::lazy_static;
use log::{debug, warn};
use num_enum::TryFromPrimitive;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum Opcode {
    // One Touch Play
    ActiveSource = 0x82,
    ImageViewOn = 0x04,
    TextViewOn = 0x0D,
    // One Touch Record
    RecordOff = 0x0B,
    RecordOn = 0x09,
    RecordStatus = 0x0A,
    RecordTVScreen = 0x0F,
    // Deck Control
    DeckStatus = 0x1B,
    GiveDeckStatus = 0x1A,
    DeckControl = 0x42,
    Play = 0x41,
    // Tuner Control
    GiveTunerDeviceStatus = 0x08,
    SelectAnalogueService = 0x92,
    SelectDigitalService = 0x93,
    TunerStepDecrement = 0x06,
    TunerStepIncrement = 0x05,
    TunerDeviceStatus = 0x07,
    // System Audio Control
    GiveAudioStatus = 0x71,
    GiveSystemAudioModeStatus = 0x7D,
    ReportAudioStatus = 0x7A,
    SetSystemAudioMode = 0x72,
    SystemAudioModeRequest = 0x70,
    SystemAudioModeStatus = 0x7E,
    // Device Menu Control & Remote Control Passthrough
    UserControlPressed = 0x44,
    UserControlReleased = 0x45,
    MenuRequest = 0x8D,
    MenuStatus = 0x8E,
    // Timer Programming
    ClearAnalogueTimer = 0x33,
    ClearDigitalTimer = 0x99,
    ClearExternalTimer = 0xA1,
    SetAnalogueTimer = 0x34,
    SetDigitalTimer = 0x97,
    SetExternalTimer = 0xA2,
    SetTimerProgramTitle = 0x67,
    TimerClearedStatus = 0x43,
    TimerStatus = 0x35,
    // System Standby
    Standby = 0x36,
}

impl Opcode {
    pub const ALL: [Opcode; 37] = [
        Opcode::ActiveSource,
        Opcode::ImageViewOn,
        Opcode::TextViewOn,
        Opcode::RecordOff,
        Opcode::RecordOn,
        Opcode::RecordStatus,
        Opcode::RecordTVScreen,
        Opcode::DeckStatus,
        Opcode::GiveDeckStatus,
        Opcode::DeckControl,
        Opcode::Play,
        Opcode::GiveTunerDeviceStatus,
        Opcode::SelectAnalogueService,
        Opcode::SelectDigitalService,
        Opcode::TunerStepDecrement,
        Opcode::TunerStepIncrement,
        Opcode::TunerDeviceStatus,
        Opcode::GiveAudioStatus,
        Opcode::GiveSystemAudioModeStatus,
        Opcode::ReportAudioStatus,
        Opcode::SetSystemAudioMode,
        Opcode::SystemAudioModeRequest,
        Opcode::SystemAudioModeStatus,
        Opcode::UserControlPressed,
        Opcode::UserControlReleased,
        Opcode::MenuRequest,
        Opcode::MenuStatus,
        Opcode::ClearAnalogueTimer,
        Opcode::ClearDigitalTimer,
        Opcode::ClearExternalTimer,
        Opcode::SetAnalogueTimer,
        Opcode::SetDigitalTimer,
        Opcode::SetExternalTimer,
        Opcode::SetTimerProgramTitle,
        Opcode::TimerClearedStatus,
        Opcode::TimerStatus,
        Opcode::Standby,
    ];

    /// The canonical command name, as accepted by [`lookup`].
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::ActiveSource => "ActiveSource",
            Opcode::ImageViewOn => "ImageViewOn",
            Opcode::TextViewOn => "TextViewOn",
            Opcode::RecordOff => "RecordOff",
            Opcode::RecordOn => "RecordOn",
            Opcode::RecordStatus => "RecordStatus",
            Opcode::RecordTVScreen => "RecordTVScreen",
            Opcode::DeckStatus => "DeckStatus",
            Opcode::GiveDeckStatus => "GiveDeckStatus",
            Opcode::DeckControl => "DeckControl",
            Opcode::Play => "Play",
            Opcode::GiveTunerDeviceStatus => "GiveTunerDeviceStatus",
            Opcode::SelectAnalogueService => "SelectAnalogueService",
            Opcode::SelectDigitalService => "SelectDigitalService",
            Opcode::TunerStepDecrement => "TunerStepDecrement",
            Opcode::TunerStepIncrement => "TunerStepIncrement",
            Opcode::TunerDeviceStatus => "TunerDeviceStatus",
            Opcode::GiveAudioStatus => "GiveAudioStatus",
            Opcode::GiveSystemAudioModeStatus => "GiveSystemAudioModeStatus",
            Opcode::ReportAudioStatus => "ReportAudioStatus",
            Opcode::SetSystemAudioMode => "SetSystemAudioMode",
            Opcode::SystemAudioModeRequest => "SystemAudioModeRequest",
            Opcode::SystemAudioModeStatus => "SystemAudioModeStatus",
            Opcode::UserControlPressed => "UserControlPressed",
            Opcode::UserControlReleased => "UserControlReleased",
            Opcode::MenuRequest => "MenuRequest",
            Opcode::MenuStatus => "MenuStatus",
            Opcode::ClearAnalogueTimer => "ClearAnalogueTimer",
            Opcode::ClearDigitalTimer => "ClearDigitalTimer",
            Opcode::ClearExternalTimer => "ClearExternalTimer",
            Opcode::SetAnalogueTimer => "SetAnalogueTimer",
            Opcode::SetDigitalTimer => "SetDigitalTimer",
            Opcode::SetExternalTimer => "SetExternalTimer",
            Opcode::SetTimerProgramTitle => "SetTimerProgramTitle",
            Opcode::TimerClearedStatus => "TimerClearedStatus",
            Opcode::TimerStatus => "TimerStatus",
            Opcode::Standby => "Standby",
        }
    }

    /// Reverse lookup. Bytes outside the table are reported as unknown.
    pub fn from_code(code: u8) -> Result<Opcode, Error> {
        Ok(Opcode::try_from(code)?)
    }
}

lazy_static! {
    static ref BY_NAME: HashMap<&'static str, Opcode> =
        Opcode::ALL.iter().map(|op| (op.name(), *op)).collect();
}

/// Exact, case-sensitive match against the command table.
pub fn lookup(name: &str) -> Result<Opcode, Error> {
    match BY_NAME.get(name) {
        Some(op) => {
            debug!("command {} = {:#04x}", name, *op as u8);
            Ok(*op)
        }
        None => {
            warn!("could not find CEC code for command: {}", name);
            Err(Error::UnknownCommand(name.to_string()))
        }
    }
}

impl FromStr for Opcode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
