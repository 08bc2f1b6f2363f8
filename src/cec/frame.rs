use crate::cec::address::{frame_address_byte, LogicalAddress, PhysicalAddress};
use crate::cec::opcode::{self, Opcode};
use crate::cec::Error;
use log::debug;
use std::fmt;
use std::str::FromStr;

// Header, opcode and up to 14 operand bytes.
const MAX_FRAME_LEN: usize = 16;
const MAX_PARAMS: usize = MAX_FRAME_LEN - 2;

/// A message ready to hand to the transport, rendered as `4F:82:10:00`.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub initiator: LogicalAddress,
    pub destination: LogicalAddress,
    pub opcode: Opcode,
    pub params: Vec<u8>,
}

impl Frame {
    pub fn new(
        initiator: LogicalAddress,
        destination: LogicalAddress,
        opcode: Opcode,
        params: Vec<u8>,
    ) -> Result<Frame, Error> {
        if params.len() > MAX_PARAMS {
            return Err(Error::BadFrame {
                input: format!("{:02x?}", params),
                reason: format!("{} operand bytes, at most {} fit", params.len(), MAX_PARAMS),
            });
        }
        Ok(Frame {
            initiator,
            destination,
            opcode,
            params,
        })
    }

    /// Builds a frame for a command named in the opcode table.
    pub fn command(
        name: &str,
        initiator: LogicalAddress,
        destination: LogicalAddress,
        params: &[u8],
    ) -> Result<Frame, Error> {
        let opcode = opcode::lookup(name)?;
        Frame::new(initiator, destination, opcode, params.to_vec())
    }

    /// `<Active Source>` is always broadcast and carries the initiator's
    /// physical address.
    pub fn active_source(initiator: LogicalAddress, physical_address: PhysicalAddress) -> Frame {
        Frame {
            initiator,
            destination: LogicalAddress::Broadcast,
            opcode: Opcode::ActiveSource,
            params: physical_address.to_bytes().to_vec(),
        }
    }

    pub fn header(&self) -> u8 {
        frame_address_byte(self.initiator, self.destination)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.header(), self.opcode as u8];
        bytes.extend(&self.params);
        bytes
    }

    pub fn is_broadcast(&self) -> bool {
        self.destination == LogicalAddress::Broadcast
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let code: Vec<String> = self.to_bytes().iter().map(|b| format!("{:02X}", b)).collect();
        write!(f, "{}", code.join(":"))
    }
}

impl FromStr for Frame {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |reason: String| Error::BadFrame {
            input: s.to_string(),
            reason,
        };
        let mut bytes = Vec::new();
        for octet in s.split(':') {
            if octet.len() != 2 || !octet.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(bad(format!("{:?} is not a hex octet", octet)));
            }
            bytes.push(u8::from_str_radix(octet, 16).map_err(|e| bad(e.to_string()))?);
        }
        if bytes.len() < 2 {
            return Err(bad("missing opcode".to_string()));
        }
        if bytes.len() > MAX_FRAME_LEN {
            return Err(bad(format!("{} octets, at most {}", bytes.len(), MAX_FRAME_LEN)));
        }
        Ok(Frame {
            initiator: LogicalAddress::from_nibble(bytes[0] >> 4),
            destination: LogicalAddress::from_nibble(bytes[0]),
            opcode: Opcode::from_code(bytes[1])?,
            params: bytes[2..].to_vec(),
        })
    }
}

/// Wire string announcing `source_logical` at `source_physical` as the
/// active source.
pub fn encode_active_source_frame(
    source_logical: LogicalAddress,
    source_physical: PhysicalAddress,
) -> String {
    let frame = Frame::active_source(source_logical, source_physical);
    debug!("active source frame for {}: {}", source_physical, frame);
    frame.to_string()
}

/// As [`encode_active_source_frame`], for a physical address still in its
/// dotted form. Malformed addresses fail instead of producing a short frame.
pub fn encode_active_source_frame_str(
    source_logical: LogicalAddress,
    source_physical: &str,
) -> Result<String, Error> {
    Ok(encode_active_source_frame(
        source_logical,
        source_physical.parse()?,
    ))
}

#[cfg(test)]
mod tests {
    use crate::cec::frame::*;

    macro_rules! test_frame {
        ($name:ident, $f:expr, $o:expr) => {
            #[test]
            fn $name() {
                let frame: Frame = $f;
                assert_eq!(frame.to_string(), $o);
            }
        };
    }

    test_frame! {active_source_playback1, Frame::active_source(
        LogicalAddress::PlaybackDevice1,
        "1.0.0.0".parse().unwrap(),
    ), "4F:82:10:00"}
    test_frame! {active_source_recording2, Frame::active_source(
        LogicalAddress::RecordingDevice2,
        "4.0.0.0".parse().unwrap(),
    ), "2F:82:40:00"}
    test_frame! {standby_to_tv, Frame::command(
        "Standby",
        LogicalAddress::RecordingDevice1,
        LogicalAddress::TV,
        &[],
    ).unwrap(), "10:36"}
    test_frame! {user_control_pressed, Frame::command(
        "UserControlPressed",
        LogicalAddress::PlaybackDevice1,
        LogicalAddress::TV,
        &[0x41],
    ).unwrap(), "40:44:41"}

    #[test]
    fn encodes_active_source() {
        let physical: PhysicalAddress = "1.0.0.0".parse().unwrap();
        assert_eq!(
            encode_active_source_frame(LogicalAddress::PlaybackDevice1, physical),
            "4F:82:10:00"
        );
        assert_eq!(
            encode_active_source_frame_str(LogicalAddress::PlaybackDevice1, "2.1.0.0").unwrap(),
            "4F:82:21:00"
        );
    }

    #[test]
    fn refuses_short_physical_address() {
        assert!(matches!(
            encode_active_source_frame_str(LogicalAddress::PlaybackDevice1, "1.0.0"),
            Err(Error::BadPhysicalAddress { .. })
        ));
    }

    #[test]
    fn unknown_command_name() {
        assert!(matches!(
            Frame::command("Teleport", LogicalAddress::TV, LogicalAddress::Broadcast, &[]),
            Err(Error::UnknownCommand(_))
        ));
    }

    #[test]
    fn too_many_operands() {
        let params = [0u8; 15];
        assert!(Frame::command("MenuRequest", LogicalAddress::TV, LogicalAddress::Tuner1, &params)
            .is_err());
    }

    #[test]
    fn parses_wire_string() {
        let frame: Frame = "4f:82:10:00".parse().unwrap();
        assert_eq!(frame.initiator, LogicalAddress::PlaybackDevice1);
        assert!(frame.is_broadcast());
        assert_eq!(frame.opcode, Opcode::ActiveSource);
        assert_eq!(frame.params, vec![0x10, 0x00]);
        assert_eq!(frame.to_string(), "4F:82:10:00");
    }

    #[test]
    fn rejects_bad_wire_strings() {
        assert!("4F".parse::<Frame>().is_err());
        assert!("4F:8".parse::<Frame>().is_err());
        assert!("4F:82:100:00".parse::<Frame>().is_err());
        assert!("4F:zz".parse::<Frame>().is_err());
        assert!(matches!("4F:83".parse::<Frame>(), Err(Error::UnknownOpcode(0x83))));
        assert!("".parse::<Frame>().is_err());
    }
}
