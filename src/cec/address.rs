use crate::cec::Error;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// A 4-bit bus slot. The same value is used as the source nibble and the
/// destination nibble of a frame's header byte.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum LogicalAddress {
    TV = 0,
    RecordingDevice1 = 1,
    RecordingDevice2 = 2,
    Tuner1 = 3,
    PlaybackDevice1 = 4,
    AudioSystem = 5,
    Tuner2 = 6,
    Tuner3 = 7,
    PlaybackDevice2 = 8,
    RecordingDevice3 = 9,
    Tuner4 = 10,
    PlaybackDevice3 = 11,
    Reserved1 = 12,
    Reserved2 = 13,
    FreeUse = 14,
    // Unregistered as an initiator, broadcast as a destination.
    Broadcast = 15,
}

impl LogicalAddress {
    /// Device-type label for display. Labels are cosmetic and never identify
    /// a device.
    pub fn label(&self) -> &'static str {
        match self {
            LogicalAddress::TV => "TV",
            LogicalAddress::RecordingDevice1 => "Recording1",
            LogicalAddress::RecordingDevice2 => "Recording2",
            LogicalAddress::Tuner1 => "Tuner1",
            LogicalAddress::PlaybackDevice1 => "Playback1",
            LogicalAddress::AudioSystem => "Audio",
            LogicalAddress::Tuner2 => "Tuner2",
            LogicalAddress::Tuner3 => "Tuner3",
            LogicalAddress::PlaybackDevice2 => "Playback2",
            LogicalAddress::RecordingDevice3 => "Recording3",
            LogicalAddress::Tuner4 => "Tuner4",
            LogicalAddress::PlaybackDevice3 => "Playback3",
            LogicalAddress::Reserved1 => "Reserved1",
            LogicalAddress::Reserved2 => "Reserved2",
            LogicalAddress::FreeUse => "Free",
            LogicalAddress::Broadcast => "Unregistered",
        }
    }

    pub fn from_nibble(nibble: u8) -> LogicalAddress {
        // Every 4-bit value is a variant, so this cannot fail.
        LogicalAddress::try_from(nibble & 0x0f).unwrap_or(LogicalAddress::Broadcast)
    }
}

/// Label for any 4-bit value; the high nibble is ignored.
pub fn label_for_logical_address(nibble: u8) -> &'static str {
    LogicalAddress::from_nibble(nibble).label()
}

impl From<LogicalAddress> for u8 {
    fn from(addr: LogicalAddress) -> u8 {
        addr as u8
    }
}

impl FromStr for LogicalAddress {
    type Err = Error;
    // Accepts a single hex nibble ("4", "f") or a decimal slot ("11").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::BadLogicalAddress(s.to_string());
        let (digits, hex) = match s.strip_prefix("0x") {
            Some(rest) => (rest, true),
            None => (s, s.len() == 1),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let value = if hex {
            u8::from_str_radix(digits, 16)
        } else {
            digits.parse::<u8>()
        }
        .map_err(|_| bad())?;
        LogicalAddress::try_from(value).map_err(|_| bad())
    }
}

impl fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:X}", *self as u8)
    }
}

/// Packs initiator and destination into a frame header byte.
pub fn frame_address_byte(source: LogicalAddress, dest: LogicalAddress) -> u8 {
    (source as u8) << 4 | (dest as u8)
}

/// HDMI topology position, one nibble per level of port nesting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhysicalAddress([u8; 4]);

impl PhysicalAddress {
    /// Reported by devices that have no address yet.
    pub const INVALID: PhysicalAddress = PhysicalAddress([0xf; 4]);

    pub fn new(nibbles: [u8; 4]) -> Result<PhysicalAddress, Error> {
        if let Some(n) = nibbles.iter().find(|n| **n > 0xf) {
            return Err(Error::BadPhysicalAddress {
                input: format!("{:?}", nibbles),
                reason: format!("component {} is not a nibble", n),
            });
        }
        Ok(PhysicalAddress(nibbles))
    }

    pub fn nibbles(&self) -> [u8; 4] {
        self.0
    }

    /// The two bytes carried in a frame payload, e.g. 1.0.0.0 -> [0x10, 0x00].
    pub fn to_bytes(&self) -> [u8; 2] {
        let [w, x, y, z] = self.0;
        [w << 4 | x, y << 4 | z]
    }
}

impl From<u16> for PhysicalAddress {
    fn from(raw: u16) -> Self {
        PhysicalAddress([
            (raw >> 12) as u8 & 0xf,
            (raw >> 8) as u8 & 0xf,
            (raw >> 4) as u8 & 0xf,
            raw as u8 & 0xf,
        ])
    }
}

impl From<PhysicalAddress> for u16 {
    fn from(addr: PhysicalAddress) -> u16 {
        u16::from_be_bytes(addr.to_bytes())
    }
}

impl FromStr for PhysicalAddress {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |reason: String| Error::BadPhysicalAddress {
            input: s.to_string(),
            reason,
        };
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 4 {
            return Err(bad(format!("expected 4 components, found {}", parts.len())));
        }
        let mut nibbles = [0u8; 4];
        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(bad(format!("component {:?} is not hex", part)));
            }
            nibbles[i] = match u8::from_str_radix(part, 16) {
                Ok(n) if n <= 0xf => n,
                _ => return Err(bad(format!("component {:?} is not a nibble", part))),
            };
        }
        Ok(PhysicalAddress(nibbles))
    }
}

impl TryFrom<String> for PhysicalAddress {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PhysicalAddress> for String {
    fn from(addr: PhysicalAddress) -> String {
        addr.to_string()
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [w, x, y, z] = self.0;
        write!(f, "{:x}.{:x}.{:x}.{:x}", w, x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use crate::cec::address::*;

    macro_rules! test_round_trip {
        ($name:ident, $s:expr, $o:expr) => {
            #[test]
            fn $name() {
                let addr: PhysicalAddress = $s.parse().unwrap();
                assert_eq!(addr.to_string(), $o);
                assert_eq!(addr.to_string().parse::<PhysicalAddress>().unwrap(), addr);
            }
        };
    }

    test_round_trip! {plain, "1.0.0.0", "1.0.0.0"}
    test_round_trip! {nested, "2.1.3.0", "2.1.3.0"}
    test_round_trip! {uppercase, "F.F.F.F", "f.f.f.f"}
    test_round_trip! {leading_zero, "01.0.0a.0", "1.0.a.0"}

    macro_rules! test_bad_physical {
        ($name:ident, $s:expr) => {
            #[test]
            fn $name() {
                assert!(matches!(
                    $s.parse::<PhysicalAddress>(),
                    Err(Error::BadPhysicalAddress { .. })
                ));
            }
        };
    }

    test_bad_physical! {too_few, "1.0.0"}
    test_bad_physical! {too_many, "1.0.0.0.0"}
    test_bad_physical! {not_hex, "1.0.g.0"}
    test_bad_physical! {empty_component, "1..0.0"}
    test_bad_physical! {too_wide, "10.0.0.0"}
    test_bad_physical! {signed, "+1.0.0.0"}
    test_bad_physical! {empty, ""}

    #[test]
    fn physical_bytes() {
        let addr: PhysicalAddress = "1.0.0.0".parse().unwrap();
        assert_eq!(addr.to_bytes(), [0x10, 0x00]);
        assert_eq!(u16::from(addr), 0x1000);
        assert_eq!(
            PhysicalAddress::from(0x2130),
            "2.1.3.0".parse::<PhysicalAddress>().unwrap()
        );
        assert_eq!(PhysicalAddress::from(0xffff), PhysicalAddress::INVALID);
    }

    #[test]
    fn physical_new_rejects_wide_nibbles() {
        assert!(PhysicalAddress::new([1, 0, 0, 0]).is_ok());
        assert!(PhysicalAddress::new([0x10, 0, 0, 0]).is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(label_for_logical_address(0), "TV");
        assert_eq!(label_for_logical_address(0x4), "Playback1");
        assert_eq!(label_for_logical_address(0xE), "Free");
        assert_eq!(label_for_logical_address(0xF), "Unregistered");
        for nibble in 0..16u8 {
            assert!(!label_for_logical_address(nibble).is_empty());
            assert_eq!(LogicalAddress::from_nibble(nibble) as u8, nibble);
        }
    }

    #[test]
    fn address_byte() {
        assert_eq!(
            frame_address_byte(LogicalAddress::PlaybackDevice1, LogicalAddress::Broadcast),
            0x4F
        );
        assert_eq!(
            frame_address_byte(LogicalAddress::RecordingDevice2, LogicalAddress::TV),
            0x20
        );
    }

    #[test]
    fn parse_logical() {
        assert_eq!("4".parse::<LogicalAddress>().unwrap(), LogicalAddress::PlaybackDevice1);
        assert_eq!("f".parse::<LogicalAddress>().unwrap(), LogicalAddress::Broadcast);
        assert_eq!("0xB".parse::<LogicalAddress>().unwrap(), LogicalAddress::PlaybackDevice3);
        assert_eq!("11".parse::<LogicalAddress>().unwrap(), LogicalAddress::PlaybackDevice3);
        assert!("16".parse::<LogicalAddress>().is_err());
        assert!("g".parse::<LogicalAddress>().is_err());
        assert!("".parse::<LogicalAddress>().is_err());
        assert!("0x".parse::<LogicalAddress>().is_err());
        assert!("0x0x4".parse::<LogicalAddress>().is_err());
    }
}
