//! The 1200 bps touch that asks a board to reboot into its DFU bootloader

use std::fmt;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::discovery::{self, PortInfo, DEFAULT_MARKERS};
use crate::Error;

/// The baud rate that USB CDC stacks recognize as a bootloader request
pub const TOUCH_BAUD_RATE: u32 = 1200;

/// How long DTR is held high before it is released again
pub const DTR_HOLD: Duration = Duration::from_millis(100);

/// How long to wait for the bootloader to come up after the touch
pub const BOOTLOADER_WAIT: Duration = Duration::from_secs(4);

/// A port whose modem control lines can be driven.
pub trait ControlLines {
    /// Sets the Data Terminal Ready line to `level`.
    fn set_dtr(&mut self, level: bool) -> Result<(), Error>;
}

/// The host facilities needed to perform a touch.
pub trait Backend {
    /// The type of an open port. Dropping it must close the device.
    type Port: ControlLines;

    /// Lists the serial ports currently present on the host.
    fn available_ports(&self) -> Result<Vec<PortInfo>, Error>;

    /// Opens `port` at the given `baud_rate`.
    fn open(&self, port: &str, baud_rate: u32) -> Result<Self::Port, Error>;

    /// Blocks the caller for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Settings for a single touch.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TouchConfig {
    /// Explicit upload port. When `None` (or empty) the port is discovered.
    pub port: Option<String>,
    pub baud_rate: u32,
    pub dtr_hold: Duration,
    pub bootloader_wait: Duration,
    /// Substrings a port description must contain to be picked by discovery
    pub markers: Vec<String>,
}

impl Default for TouchConfig {
    fn default() -> TouchConfig {
        TouchConfig {
            port: None,
            baud_rate: TOUCH_BAUD_RATE,
            dtr_hold: DTR_HOLD,
            bootloader_wait: BOOTLOADER_WAIT,
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// What happened when a touch was attempted.
#[derive(Debug)]
pub enum Outcome {
    /// The touch was sent and the bootloader wait has elapsed
    Triggered { port: String },
    /// No port was configured or discovered, so nothing was done
    NoPortFound,
    /// The port could not be opened or its control lines could not be driven
    Failed { port: String, error: Error },
}

impl Outcome {
    /// The port the touch was attempted on, if any.
    pub fn port(&self) -> Option<&str> {
        match self {
            Outcome::Triggered { port } | Outcome::Failed { port, .. } => Some(port),
            Outcome::NoPortFound => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Triggered { port } => write!(f, "DFU bootloader requested on {}", port),
            Outcome::NoPortFound => write!(f, "No COM port found, assuming already in DFU mode"),
            Outcome::Failed { error, .. } => write!(
                f,
                "Could not trigger DFU: {}\nPlease enter DFU mode manually (BOOT + RESET)",
                error
            ),
        }
    }
}

/// Returns the port to touch: the configured one, or else the first discovered port whose
/// description matches one of the configured markers.
///
/// Enumeration failures are logged and treated as if no port was found.
pub fn resolve_port<B: Backend>(backend: &B, config: &TouchConfig) -> Option<String> {
    if let Some(port) = config.port.as_deref().filter(|port| !port.is_empty()) {
        return Some(port.to_string());
    }

    let ports = match backend.available_ports() {
        Ok(ports) => ports,
        Err(err) => {
            warn!("{}", err);
            return None;
        }
    };

    for port in &ports {
        trace!("Found serial port {} ({})", port.name, port.description);
    }

    discovery::find_upload_port(&ports, &config.markers).map(|port| port.name.clone())
}

/// Opens `port`, pulses DTR and closes it again.
fn pulse_dtr<B: Backend>(backend: &B, port: &str, config: &TouchConfig) -> Result<(), Error> {
    let mut serial = backend.open(port, config.baud_rate)?;

    serial.set_dtr(true)?;
    backend.sleep(config.dtr_hold);
    serial.set_dtr(false)?;

    drop(serial);

    Ok(())
}

/// A step of the touch that is reported to the user as it happens.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Progress {
    /// The port is about to be opened and DTR pulsed
    Touching { port: String, baud_rate: u32 },
    /// The touch was sent; waiting for the bootloader to come up
    Waiting,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Touching { port, baud_rate } => write!(
                f,
                "Triggering DFU mode via {} bps touch on {}...",
                baud_rate, port
            ),
            Progress::Waiting => write!(f, "Waiting for DFU bootloader..."),
        }
    }
}

/// Requests a reboot into the DFU bootloader and waits for it to come up.
///
/// Each step is passed to `report` before it starts. This never fails: every error is reported
/// through the returned `Outcome` so that the upload that follows can go ahead regardless.
///
/// # Examples
///
/// ```no_run
/// use dfu_touch::{touch, SystemBackend, TouchConfig};
///
/// let config = TouchConfig {
///     port: Some("/dev/ttyACM0".to_string()),
///     ..TouchConfig::default()
/// };
///
/// let outcome = touch(&SystemBackend, &config, |step| println!("{}", step));
///
/// println!("{}", outcome);
/// ```
pub fn touch<B, F>(backend: &B, config: &TouchConfig, mut report: F) -> Outcome
where
    B: Backend,
    F: FnMut(&Progress),
{
    let port = match resolve_port(backend, config) {
        Some(port) => port,
        None => {
            debug!("No upload port configured or discovered");
            return Outcome::NoPortFound;
        }
    };

    report(&Progress::Touching {
        port: port.clone(),
        baud_rate: config.baud_rate,
    });

    if let Err(error) = pulse_dtr(backend, &port, config) {
        debug!("Touch on {} failed: {:?}", port, error);

        return Outcome::Failed { port, error };
    }

    report(&Progress::Waiting);
    backend.sleep(config.bootloader_wait);

    Outcome::Triggered { port }
}
