pub mod address;
pub mod device;
pub mod directory;
pub mod frame;
pub mod noop;
pub mod opcode;

pub use address::{label_for_logical_address, LogicalAddress, PhysicalAddress};
pub use device::{Device, PowerStatus};
pub use directory::{Bus, DeviceDirectory};
pub use frame::{encode_active_source_frame, encode_active_source_frame_str, Frame};
pub use opcode::Opcode;

use log::{debug, info};
use num_enum::TryFromPrimitiveError;
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Could not find CEC code for command: {0}")]
    UnknownCommand(String),
    #[error("Opcode {0:#04x} is not in the command table")]
    UnknownOpcode(u8),
    #[error("Invalid physical address {input:?}: {reason}")]
    BadPhysicalAddress { input: String, reason: String },
    #[error("Invalid logical address {0:?}")]
    BadLogicalAddress(String),
    #[error("Invalid frame {input:?}: {reason}")]
    BadFrame { input: String, reason: String },
    #[error("Invalid name pattern {pattern:?}: {reason}")]
    BadPattern { pattern: String, reason: String },
    #[error("No device on the bus matches {0:?}")]
    DeviceNotFound(String),
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Sync + Send>),
}

impl From<TryFromPrimitiveError<Opcode>> for Error {
    fn from(err: TryFromPrimitiveError<Opcode>) -> Self {
        Self::UnknownOpcode(err.number)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// The adapter link. Implementations own framing, polling and any retry
/// policy; errors they return are passed through untouched.
pub trait CECConnection: Sync + Send {
    /// Scans the bus.
    fn list(&self) -> Result<Vec<Device>, Error>;
    fn power_on(&self, addr: LogicalAddress) -> Result<(), Error>;
    /// Sends a colon separated hex frame such as `4F:82:10:00`.
    fn transmit(&self, frame: &str) -> Result<(), Error>;
}

pub struct CEC {
    bus: Bus,
    osd_name: String,
}

impl CEC {
    pub fn new(conn: Arc<dyn CECConnection>, osd_name: &str) -> Self {
        CEC {
            bus: Bus::new(conn),
            osd_name: osd_name.to_string(),
        }
    }

    pub fn osd_name(&self) -> &str {
        &self.osd_name
    }

    pub fn scan(&self) -> Result<Arc<DeviceDirectory>, Error> {
        self.bus.rescan()
    }

    pub fn directory(&self) -> Arc<DeviceDirectory> {
        self.bus.directory()
    }

    fn transmit(&self, frame: &Frame) -> Result<(), Error> {
        let wire = frame.to_string();
        debug!("sending {:?} as {}", frame, wire);
        self.bus.connection().transmit(&wire)
    }

    /// Powers on the first device whose OSD name matches `pattern`.
    pub fn power_on(&self, pattern: &str) -> Result<Device, Error> {
        let dir = self.scan()?;
        let dev = dir.require_by_name_pattern(pattern)?;
        info!("powering on {} at {}", dev.display_name(), dev.logical_address);
        self.bus.connection().power_on(dev.logical_address)?;
        Ok(dev.clone())
    }

    /// Finds this client on the bus by its own OSD name and broadcasts
    /// `<Active Source>` for its physical address.
    pub fn announce_active_source(&self) -> Result<Frame, Error> {
        let dir = self.scan()?;
        let me = dir.require_by_name_pattern(&self.osd_name)?;
        let frame = Frame::active_source(me.logical_address, me.physical_address);
        info!(
            "announcing {} ({}) at {} as active source",
            me.display_name(),
            me.label(),
            me.physical_address
        );
        self.transmit(&frame)?;
        Ok(frame)
    }

    pub fn send(
        &self,
        command: &str,
        initiator: LogicalAddress,
        destination: LogicalAddress,
        params: &[u8],
    ) -> Result<Frame, Error> {
        let frame = Frame::command(command, initiator, destination, params)?;
        self.transmit(&frame)?;
        Ok(frame)
    }

    pub fn transmit_raw(&self, input: &str) -> Result<Frame, Error> {
        let frame: Frame = input.parse()?;
        self.transmit(&frame)?;
        Ok(frame)
    }
}
