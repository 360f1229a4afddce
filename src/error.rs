use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error when opening serial port {}: {}", port, source)]
    SerialOpen {
        port: String,
        source: serialport::Error,
    },
    #[error("Serial error: {}", _0)]
    Serial(#[from] serialport::Error),
    #[error("Could not enumerate serial ports: {}", _0)]
    Enumerate(serialport::Error),
}
