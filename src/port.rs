use std::thread;
use std::time::Duration;

use log::{debug, trace};
use serialport::prelude::*;

use crate::discovery::{self, PortInfo};
use crate::touch::{Backend, ControlLines};
use crate::Error;

/// Serial connection with an open serial port.
///
/// The underlying device is closed when this value is dropped.
pub struct SerialPort {
    inner_port: Box<dyn serialport::SerialPort>,
}

impl SerialPort {
    /// Opens the given `port` as a `SerialPort` with the given `baud_rate`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dfu_touch::SerialPort;
    ///
    /// let port = SerialPort::open("/dev/ttyACM0", 1200)?;
    ///
    /// # Ok::<(), dfu_touch::Error>(())
    /// ```
    pub fn open(port: &str, baud_rate: u32) -> Result<SerialPort, Error> {
        let settings = SerialPortSettings {
            baud_rate,
            data_bits: DataBits::Eight,
            flow_control: FlowControl::None,
            parity: Parity::None,
            stop_bits: StopBits::One,
            timeout: Duration::from_millis(2000),
        };

        debug!("Opening serial port {:?} at {} baud", port, baud_rate);

        let serial_port =
            serialport::open_with_settings(port, &settings).map_err(|source| {
                Error::SerialOpen {
                    port: port.to_string(),
                    source,
                }
            })?;

        Ok(SerialPort {
            inner_port: serial_port,
        })
    }
}

impl ControlLines for SerialPort {
    fn set_dtr(&mut self, level: bool) -> Result<(), Error> {
        trace!("Setting DTR {}", if level { "high" } else { "low" });

        self.inner_port.write_data_terminal_ready(level)?;

        Ok(())
    }
}

impl Drop for SerialPort {
    fn drop(&mut self) {
        trace!("Closing serial port {:?}", self.inner_port.name());
    }
}

/// `Backend` that talks to the serial ports of the host.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemBackend;

impl Backend for SystemBackend {
    type Port = SerialPort;

    fn available_ports(&self) -> Result<Vec<PortInfo>, Error> {
        let ports = serialport::available_ports().map_err(Error::Enumerate)?;

        trace!("Enumerated {} serial ports", ports.len());

        Ok(ports.iter().map(discovery::describe).collect())
    }

    fn open(&self, port: &str, baud_rate: u32) -> Result<SerialPort, Error> {
        SerialPort::open(port, baud_rate)
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
