use crate::cec::{CECConnection, Device, Error, LogicalAddress};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;

/// Serves a fixed roster and only logs what it is asked to send.
#[derive(Default)]
pub struct LogOnlyConn {
    roster: Vec<Device>,
    transmitted: Mutex<Vec<String>>,
    powered_on: Mutex<Vec<LogicalAddress>>,
}

impl LogOnlyConn {
    pub fn with_roster(roster: Vec<Device>) -> Self {
        LogOnlyConn {
            roster,
            ..Default::default()
        }
    }

    /// Loads a roster saved with `scan --json`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path.as_ref())?;
        let roster: Vec<Device> = serde_json::from_reader(BufReader::new(file))?;
        info!(
            "loaded {} devices from {}",
            roster.len(),
            path.as_ref().display()
        );
        Ok(LogOnlyConn::with_roster(roster))
    }

    pub fn transmitted(&self) -> Vec<String> {
        self.transmitted.lock().unwrap().clone()
    }

    pub fn powered_on(&self) -> Vec<LogicalAddress> {
        self.powered_on.lock().unwrap().clone()
    }
}

impl CECConnection for LogOnlyConn {
    fn list(&self) -> Result<Vec<Device>, Error> {
        info!("returning fake roster of {} devices", self.roster.len());
        Ok(self.roster.clone())
    }
    fn power_on(&self, addr: LogicalAddress) -> Result<(), Error> {
        info!("faking power on for {}", addr);
        self.powered_on.lock().unwrap().push(addr);
        Ok(())
    }
    fn transmit(&self, frame: &str) -> Result<(), Error> {
        info!("faking command {}", frame);
        self.transmitted.lock().unwrap().push(frame.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::cec::noop::*;
    use std::io::Write;

    #[test]
    fn loads_roster_file() {
        let path = std::env::temp_dir().join(format!("cecctl-roster-{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"[{{"logicalAddress": 1, "physicalAddress": "1.0.0.0", "osdName": "Kodi",
                 "vendor": "Pulse Eight", "activeSource": true, "powerStatus": "on"}}]"#
        )
        .unwrap();
        drop(file);
        let conn = LogOnlyConn::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let roster = conn.list().unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].osd_name, "Kodi");
        assert!(roster[0].active_source);
    }

    #[test]
    fn missing_roster_is_transport_error() {
        assert!(matches!(
            LogOnlyConn::from_json_file("/nonexistent/roster.json"),
            Err(Error::Transport(_))
        ));
    }
}
