use crate::cec::address::LogicalAddress;
use crate::cec::device::Device;
use crate::cec::{CECConnection, Error};
use log::{debug, info, warn};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Snapshot of the bus as reported by one scan. Ordered by logical address,
/// so "first match" is the lowest matching slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceDirectory {
    devices: BTreeMap<LogicalAddress, Device>,
}

impl DeviceDirectory {
    pub fn from_devices<I: IntoIterator<Item = Device>>(devices: I) -> Self {
        let mut map = BTreeMap::new();
        for dev in devices {
            if let Some(old) = map.insert(dev.logical_address, dev) {
                warn!(
                    "two devices reported at logical address {}, keeping the later one over {:?}",
                    old.logical_address,
                    old.display_name()
                );
            }
        }
        DeviceDirectory { devices: map }
    }

    /// Asks the transport for the current roster and builds a fresh snapshot.
    pub fn scan(conn: &dyn CECConnection) -> Result<DeviceDirectory, Error> {
        let dir = DeviceDirectory::from_devices(conn.list()?);
        info!("found {} devices", dir.len());
        Ok(dir)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn get(&self, addr: LogicalAddress) -> Option<&Device> {
        self.devices.get(&addr)
    }

    pub fn by_label(&self, label: &str) -> Option<&Device> {
        self.iter().find(|d| d.label() == label)
    }

    /// First device, in logical address order, whose OSD name matches the
    /// unanchored regex `pattern`.
    pub fn find_by_name_pattern(&self, pattern: &str) -> Result<Option<&Device>, Error> {
        let re = compile_pattern(pattern)?;
        let found = self.iter().find(|d| re.is_match(&d.osd_name));
        match found {
            Some(d) => debug!("{:?} matched {} ({})", pattern, d.display_name(), d.label()),
            None => debug!("{:?} matched nothing", pattern),
        }
        Ok(found)
    }

    pub fn find_all_by_name_pattern(&self, pattern: &str) -> Result<Vec<&Device>, Error> {
        let re = compile_pattern(pattern)?;
        Ok(self.iter().filter(|d| re.is_match(&d.osd_name)).collect())
    }

    pub fn require_by_name_pattern(&self, pattern: &str) -> Result<&Device, Error> {
        self.find_by_name_pattern(pattern)?
            .ok_or_else(|| Error::DeviceNotFound(pattern.to_string()))
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|err| Error::BadPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

/// Holds the latest snapshot for concurrent readers. A rescan swaps the whole
/// directory at once; readers keep whatever snapshot they already hold.
pub struct Bus {
    conn: Arc<dyn CECConnection>,
    directory: Mutex<Arc<DeviceDirectory>>,
}

impl Bus {
    pub fn new(conn: Arc<dyn CECConnection>) -> Self {
        Bus {
            conn,
            directory: Mutex::new(Arc::new(DeviceDirectory::default())),
        }
    }

    pub fn connection(&self) -> &dyn CECConnection {
        self.conn.as_ref()
    }

    pub fn rescan(&self) -> Result<Arc<DeviceDirectory>, Error> {
        let fresh = Arc::new(DeviceDirectory::scan(self.conn.as_ref())?);
        *self.directory.lock().unwrap() = fresh.clone();
        Ok(fresh)
    }

    pub fn directory(&self) -> Arc<DeviceDirectory> {
        self.directory.lock().unwrap().clone()
    }
}
