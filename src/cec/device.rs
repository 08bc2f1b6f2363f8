use crate::cec::address::{LogicalAddress, PhysicalAddress};
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PowerStatus {
    On = 0,
    Standby = 1,
    InTransitionStandbyToOn = 2,
    InTransitionOnToStandby = 3,
    Unknown = 153,
}

impl PowerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerStatus::On => "on",
            PowerStatus::Standby => "standby",
            PowerStatus::InTransitionStandbyToOn => "in transition from standby to on",
            PowerStatus::InTransitionOnToStandby => "in transition from on to standby",
            PowerStatus::Unknown => "unknown",
        }
    }
}

// Adapters report power status as free text; anything unrecognised is unknown.
impl From<&str> for PowerStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => PowerStatus::On,
            "standby" => PowerStatus::Standby,
            "in transition from standby to on" | "in transition standby to on" => {
                PowerStatus::InTransitionStandbyToOn
            }
            "in transition from on to standby" | "in transition on to standby" => {
                PowerStatus::InTransitionOnToStandby
            }
            _ => PowerStatus::Unknown,
        }
    }
}

impl From<String> for PowerStatus {
    fn from(s: String) -> Self {
        PowerStatus::from(s.as_str())
    }
}

impl From<PowerStatus> for String {
    fn from(status: PowerStatus) -> String {
        status.as_str().to_string()
    }
}

impl fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a bus scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub logical_address: LogicalAddress,
    pub physical_address: PhysicalAddress,
    // May carry trailing NUL padding, e.g. "BD\0\0\0\0".
    pub osd_name: String,
    pub vendor: String,
    #[serde(default)]
    pub active_source: bool,
    pub power_status: PowerStatus,
}

impl Device {
    pub fn label(&self) -> &'static str {
        self.logical_address.label()
    }

    /// OSD name without the padding some adapters append.
    pub fn display_name(&self) -> &str {
        self.osd_name.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

// Same layout as a device block of `echo scan | cec-client -s`.
impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let device = format!("device {}:", self.logical_address);
        writeln!(f, "{:<15} {}", device, self.label())?;
        writeln!(f, "{:<15} {}", "address:", self.physical_address)?;
        writeln!(f, "{:<15} {}", "active source:", yes_no(self.active_source))?;
        writeln!(f, "{:<15} {}", "vendor:", self.vendor)?;
        writeln!(f, "{:<15} {}", "osd string:", self.display_name())?;
        writeln!(f, "{:<15} {}", "power status:", self.power_status)
    }
}
