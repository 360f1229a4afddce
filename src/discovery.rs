//! Serial port discovery

use serialport::{SerialPortInfo, SerialPortType};

/// The description markers used when no explicit upload port is configured
pub const DEFAULT_MARKERS: &[&str] = &["USB", "Serial"];

/// An enumerated serial port together with a human-readable description.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PortInfo {
    /// The OS device path or name, e.g. `/dev/ttyACM0` or `COM3`
    pub name: String,
    /// What the port looks like to a user
    pub description: String,
}

impl PortInfo {
    pub fn new<N: Into<String>, D: Into<String>>(name: N, description: D) -> PortInfo {
        PortInfo {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Returns true if the description contains any of the given `markers`.
    pub fn matches<S: AsRef<str>>(&self, markers: &[S]) -> bool {
        markers
            .iter()
            .any(|marker| self.description.contains(marker.as_ref()))
    }
}

/// Builds a `PortInfo` from the metadata the OS reports for a port.
pub fn describe(info: &SerialPortInfo) -> PortInfo {
    let description = match &info.port_type {
        SerialPortType::UsbPort(usb) => usb
            .product
            .clone()
            .or_else(|| usb.manufacturer.clone())
            .unwrap_or_else(|| "USB Serial Device".to_string()),
        SerialPortType::PciPort => "PCI Serial Port".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth Serial Port".to_string(),
        SerialPortType::Unknown => info.port_name.clone(),
    };

    PortInfo::new(info.port_name.clone(), description)
}

/// Returns the first port in `ports` whose description contains any of the `markers`.
pub fn find_upload_port<'a, S: AsRef<str>>(
    ports: &'a [PortInfo],
    markers: &[S],
) -> Option<&'a PortInfo> {
    ports.iter().find(|port| port.matches(markers))
}

#[cfg(test)]
mod tests {
    use serialport::UsbPortInfo;

    use super::*;

    fn usb(product: Option<&str>, manufacturer: Option<&str>) -> SerialPortInfo {
        SerialPortInfo {
            port_name: "/dev/ttyACM0".to_string(),
            port_type: SerialPortType::UsbPort(UsbPortInfo {
                vid: 0x0483,
                pid: 0x5740,
                serial_number: None,
                manufacturer: manufacturer.map(str::to_string),
                product: product.map(str::to_string),
            }),
        }
    }

    #[test]
    fn it_should_describe_usb_ports_by_product() {
        let info = usb(Some("STM32 Virtual ComPort"), Some("STMicroelectronics"));
        let port = describe(&info);

        assert_eq!(port.name, "/dev/ttyACM0");
        assert_eq!(port.description, "STM32 Virtual ComPort");
    }

    #[test]
    fn it_should_fall_back_to_manufacturer_then_generic_usb_label() {
        assert_eq!(
            describe(&usb(None, Some("Arduino LLC"))).description,
            "Arduino LLC"
        );
        assert_eq!(describe(&usb(None, None)).description, "USB Serial Device");
    }

    #[test]
    fn it_should_describe_unknown_ports_by_name() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyUSB1".to_string(),
            port_type: SerialPortType::Unknown,
        };

        assert_eq!(describe(&info).description, "/dev/ttyUSB1");
    }

    #[test]
    fn it_should_pick_the_first_matching_port() {
        let ports = vec![
            PortInfo::new("/dev/ttyS0", "PCI Serial Port"),
            PortInfo::new("/dev/ttyACM0", "USB Serial Device"),
        ];

        let port = find_upload_port(&ports, DEFAULT_MARKERS).unwrap();

        assert_eq!(port.name, "/dev/ttyS0");
    }

    #[test]
    fn it_should_honour_custom_markers() {
        let ports = vec![
            PortInfo::new("/dev/ttyS0", "PCI Serial Port"),
            PortInfo::new("/dev/ttyACM0", "Pico CDC"),
        ];

        let port = find_upload_port(&ports, &["CDC"]).unwrap();

        assert_eq!(port.name, "/dev/ttyACM0");
    }

    #[test]
    fn it_should_match_markers_case_sensitively() {
        let ports = vec![PortInfo::new("/dev/ttyACM0", "usb modem")];

        assert!(find_upload_port(&ports, DEFAULT_MARKERS).is_none());
    }

    #[test]
    fn it_should_match_nothing_without_markers() {
        let ports = vec![PortInfo::new("/dev/ttyACM0", "USB Serial Device")];
        let markers: [&str; 0] = [];

        assert!(find_upload_port(&ports, &markers).is_none());
    }
}
