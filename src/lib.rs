//! Reboots USB microcontroller boards into their DFU bootloader before an upload.
//!
//! Many USB CDC stacks treat opening their serial port at 1200 baud as a request to reset into
//! the bootloader. This crate performs that "1200 bps touch" on a configured or discovered port,
//! pulses DTR, and then waits for the bootloader to come up.

pub mod discovery;
mod error;
pub mod port;
pub mod touch;

pub use error::Error;

pub use discovery::{find_upload_port, PortInfo};
pub use port::{SerialPort, SystemBackend};
pub use touch::{resolve_port, touch, Backend, ControlLines, Outcome, Progress, TouchConfig};
