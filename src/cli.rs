use std::time::Duration;

use structopt::StructOpt;

use dfu_touch::TouchConfig;

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Request a reboot into the DFU bootloader (the default)
    Touch,
    /// List the serial ports on this host
    List,
}

#[derive(StructOpt, Debug)]
#[structopt(about = "Reboots a board into its DFU bootloader with a 1200 bps touch")]
pub struct Opts {
    #[structopt(subcommand)]
    pub command: Option<Command>,

    /// The serial device to touch. Discovered from the port descriptions when omitted
    #[structopt(env = "UPLOAD_PORT", short = "p", long = "port")]
    pub serial_port: Option<String>,
    /// The baud rate the port is opened with
    #[structopt(
        env = "TOUCH_BAUD_RATE",
        short = "b",
        long = "baud-rate",
        default_value = "1200"
    )]
    pub baud_rate: u32,
    /// How long DTR is held high, in milliseconds
    #[structopt(env = "DTR_HOLD_MS", long = "hold-ms", default_value = "100")]
    pub hold_ms: u64,
    /// How long to wait for the bootloader after the touch, in milliseconds
    #[structopt(env = "BOOTLOADER_WAIT_MS", long = "wait-ms", default_value = "4000")]
    pub wait_ms: u64,
    /// Description substring that selects a port during discovery [default: USB, Serial]
    #[structopt(short = "m", long = "marker", number_of_values = 1)]
    pub markers: Vec<String>,
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    pub verbose: u8,
}

impl Opts {
    /// Builds the touch settings from the parsed options.
    pub fn touch_config(&self) -> TouchConfig {
        let defaults = TouchConfig::default();

        TouchConfig {
            port: self.serial_port.clone(),
            baud_rate: self.baud_rate,
            dtr_hold: Duration::from_millis(self.hold_ms),
            bootloader_wait: Duration::from_millis(self.wait_ms),
            markers: if self.markers.is_empty() {
                defaults.markers
            } else {
                self.markers.clone()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    fn parse(args: &[&str]) -> Opts {
        let argv = std::iter::once("dfu-touch").chain(args.iter().cloned());

        Opts::from_iter_safe(argv).unwrap()
    }

    #[test]
    fn it_should_default_to_the_library_settings() {
        let opts = parse(&[]);

        assert!(opts.command.is_none());

        let config = opts.touch_config();
        let defaults = TouchConfig::default();

        assert_eq!(config.markers, defaults.markers);

        // Only compare what the environment running the tests has not overridden
        if env::var_os("UPLOAD_PORT").is_none() {
            assert_eq!(config.port, None);
        }
        if env::var_os("TOUCH_BAUD_RATE").is_none() {
            assert_eq!(config.baud_rate, defaults.baud_rate);
        }
        if env::var_os("DTR_HOLD_MS").is_none() {
            assert_eq!(config.dtr_hold, defaults.dtr_hold);
        }
        if env::var_os("BOOTLOADER_WAIT_MS").is_none() {
            assert_eq!(config.bootloader_wait, defaults.bootloader_wait);
        }
    }

    #[test]
    fn it_should_parse_explicit_settings() {
        let opts = parse(&[
            "-p", "COM4", "--hold-ms", "50", "--wait-ms", "2500", "-m", "CDC", "list",
        ]);
        let config = opts.touch_config();

        assert!(matches!(opts.command, Some(Command::List)));
        assert_eq!(config.port.as_deref(), Some("COM4"));
        assert_eq!(config.dtr_hold, Duration::from_millis(50));
        assert_eq!(config.bootloader_wait, Duration::from_millis(2500));
        assert_eq!(config.markers, vec!["CDC".to_string()]);
    }
}
