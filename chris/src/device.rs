//! Connected device lookup
//!
//! Discovery goes through usbmuxd and lockdown from the `idevice` crate. When
//! usbmuxd itself can't be reached a synthetic demo device is returned so the
//! front end stays usable.

use serde::Serialize;

use crate::{IosVersion, RestoreMethod};

/// The currently connected device
///
/// Replaced as a whole on every scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub name: String,
    pub udid: String,
    pub ios_version: String,
    pub model: String,
    pub hardware: String,
    pub color: String,
    pub capacity: String,
    pub paired: bool,
}

impl DeviceDescriptor {
    /// The fake device used when no discovery backend is available
    pub fn demo() -> Self {
        Self {
            name: "Demo iPhone".to_string(),
            udid: "00000000-DEMO-DEMO-DEMO-000000000000".to_string(),
            ios_version: "18.1.1".to_string(),
            model: "iPhone16,2".to_string(),
            hardware: "D84AP".to_string(),
            color: "#1C1C1E".to_string(),
            capacity: "128GB".to_string(),
            paired: false,
        }
    }

    pub fn version(&self) -> IosVersion {
        IosVersion::parse(&self.ios_version)
    }

    pub fn restore_method(&self) -> RestoreMethod {
        RestoreMethod::resolve(&self.version())
    }

    pub fn is_demo(&self) -> bool {
        !self.paired
    }
}

#[cfg(feature = "device")]
pub use discovery::*;

#[cfg(feature = "device")]
mod discovery {
    use std::{net::IpAddr, path::PathBuf};

    use idevice::{
        IdeviceService,
        diagnostics_relay::DiagnosticsRelayClient,
        lockdown::LockdownClient,
        pairing_file::PairingFile,
        provider::{IdeviceProvider, TcpProvider},
        usbmuxd::{Connection, UsbmuxdAddr, UsbmuxdDevice},
    };
    use tracing::{debug, info, warn};

    use super::DeviceDescriptor;
    use crate::ChrisError;

    /// Which device to look for
    #[derive(Debug, Clone, Default)]
    pub enum DeviceSelector {
        /// The first USB device, or the first network device if none
        #[default]
        Any,
        Udid(String),
        /// A device reached over the network with an existing pairing file
        Network { host: IpAddr, pairing_file: PathBuf },
    }

    /// A discovered device and the provider used to reach it
    ///
    /// `provider` is `None` for the demo device.
    #[derive(Debug)]
    pub struct ConnectedDevice {
        pub descriptor: DeviceDescriptor,
        pub provider: Option<Box<dyn IdeviceProvider>>,
    }

    impl ConnectedDevice {
        pub fn demo() -> Self {
            Self {
                descriptor: DeviceDescriptor::demo(),
                provider: None,
            }
        }
    }

    /// Looks up a device and reads its descriptor from lockdown
    ///
    /// # Arguments
    /// * `selector` - Which device to use
    /// * `label` - Label sent with every lockdown request
    ///
    /// # Errors
    /// `ChrisError::DeviceNotFound` if usbmuxd is up but has no matching
    /// device, `ChrisError::Discovery` if the device doesn't answer lockdown
    pub async fn find_device(
        selector: &DeviceSelector,
        label: &str,
    ) -> Result<ConnectedDevice, ChrisError> {
        let provider: Box<dyn IdeviceProvider> = match selector {
            DeviceSelector::Network { host, pairing_file } => {
                let pairing_file = PairingFile::read_from_file(pairing_file)
                    .map_err(|e| ChrisError::Discovery(format!("unable to read pairing file: {e}")))?;
                Box::new(TcpProvider {
                    addr: *host,
                    pairing_file,
                    scope_id: None,
                    label: label.to_string(),
                })
            }
            DeviceSelector::Any | DeviceSelector::Udid(_) => {
                let addr = UsbmuxdAddr::from_env_var()
                    .map_err(|e| ChrisError::Discovery(format!("bad USBMUXD_SOCKET_ADDRESS: {e}")))?;
                let mut usbmuxd = match addr.connect(0).await {
                    Ok(u) => u,
                    Err(e) => {
                        warn!("usbmuxd is unavailable ({e}), running in demo mode");
                        return Ok(ConnectedDevice::demo());
                    }
                };

                let devices = usbmuxd
                    .get_devices()
                    .await
                    .map_err(|e| ChrisError::Discovery(format!("unable to list devices: {e}")))?;
                let device = pick_device(&devices, selector)?;
                debug!("Using device {} ({:?})", device.udid, device.connection_type);
                Box::new(device.to_provider(addr, label))
            }
        };

        let descriptor = read_descriptor(&*provider)
            .await
            .map_err(|e| ChrisError::Discovery(e.to_string()))?;
        info!(
            "Found {} running iOS {}",
            descriptor.name, descriptor.ios_version
        );

        Ok(ConnectedDevice {
            descriptor,
            provider: Some(provider),
        })
    }

    /// Prefers USB over network unless a UDID is asked for
    fn pick_device<'a>(
        devices: &'a [UsbmuxdDevice],
        selector: &DeviceSelector,
    ) -> Result<&'a UsbmuxdDevice, ChrisError> {
        let device = match selector {
            DeviceSelector::Udid(udid) => devices.iter().find(|d| &d.udid == udid),
            _ => devices
                .iter()
                .find(|d| d.connection_type == Connection::Usb)
                .or_else(|| devices.first()),
        };
        device.ok_or(ChrisError::DeviceNotFound)
    }

    async fn read_descriptor(
        provider: &dyn IdeviceProvider,
    ) -> Result<DeviceDescriptor, idevice::IdeviceError> {
        let mut lockdown = LockdownClient::connect(provider).await?;
        lockdown
            .start_session(&provider.get_pairing_file().await?)
            .await?;

        let values = lockdown.get_value(None, None).await?;
        let values = values.as_dictionary().cloned().unwrap_or_default();
        let text = |key: &str, fallback: &str| {
            values
                .get(key)
                .and_then(|v| v.as_string())
                .unwrap_or(fallback)
                .to_string()
        };

        // Disk usage lives in its own domain and isn't always readable
        let capacity = match lockdown
            .get_value(Some("TotalDiskCapacity"), Some("com.apple.disk_usage"))
            .await
        {
            Ok(v) => v
                .as_unsigned_integer()
                .map(|b| format!("{}GB", b / 1_000_000_000))
                .unwrap_or_else(|| "?".to_string()),
            Err(e) => {
                debug!("Unable to read disk capacity: {e}");
                "?".to_string()
            }
        };

        Ok(DeviceDescriptor {
            name: text("DeviceName", "Unknown Device"),
            udid: text("UniqueDeviceID", "?"),
            ios_version: text("ProductVersion", "?"),
            model: text("ProductType", "Unknown"),
            hardware: text("HardwareModel", "Unknown"),
            color: text("DeviceColor", "Unknown"),
            capacity,
            paired: true,
        })
    }

    /// Restarts SpringBoard's host device through the diagnostics relay
    pub async fn respring(provider: &dyn IdeviceProvider) -> Result<(), ChrisError> {
        let mut diagnostics = DiagnosticsRelayClient::connect(provider).await?;
        diagnostics.restart().await?;
        info!("Restart requested");
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn dev(udid: &str, connection_type: Connection) -> UsbmuxdDevice {
            UsbmuxdDevice {
                connection_type,
                udid: udid.to_string(),
                device_id: 1,
            }
        }

        #[test]
        fn prefers_usb() {
            let devices = vec![
                dev("net", Connection::Network("10.0.0.2".parse().unwrap())),
                dev("usb", Connection::Usb),
            ];
            assert_eq!(
                pick_device(&devices, &DeviceSelector::Any)
                    .unwrap()
                    .udid,
                "usb"
            );
        }

        #[test]
        fn falls_back_to_network() {
            let devices = vec![dev("net", Connection::Network("10.0.0.2".parse().unwrap()))];
            assert!(pick_device(&devices, &DeviceSelector::Any).is_ok());
        }

        #[test]
        fn empty_device_list_is_not_found() {
            assert!(matches!(
                pick_device(&[], &DeviceSelector::Any),
                Err(ChrisError::DeviceNotFound)
            ));
        }

        #[test]
        fn matches_udid() {
            let devices = vec![dev("a", Connection::Usb), dev("b", Connection::Usb)];
            let selector = DeviceSelector::Udid("b".to_string());
            assert_eq!(pick_device(&devices, &selector).unwrap().udid, "b");
            let missing = DeviceSelector::Udid("c".to_string());
            assert!(matches!(
                pick_device(&devices, &missing),
                Err(ChrisError::DeviceNotFound)
            ));
        }

        #[tokio::test]
        async fn unreachable_usbmuxd_gives_demo_device() {
            // Grab a free port, then close it so nothing is listening
            let port = std::net::TcpListener::bind("127.0.0.1:0")
                .unwrap()
                .local_addr()
                .unwrap()
                .port();
            // Only this test touches the variable
            unsafe { std::env::set_var("USBMUXD_SOCKET_ADDRESS", format!("127.0.0.1:{port}")) };

            let device = find_device(&DeviceSelector::Any, "chris-tests")
                .await
                .unwrap();
            assert_eq!(device.descriptor.name, "Demo iPhone");
            assert_eq!(device.descriptor, DeviceDescriptor::demo());
            assert!(device.provider.is_none());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_device_uses_sparse_restore() {
        let demo = DeviceDescriptor::demo();
        assert_eq!(demo.name, "Demo iPhone");
        assert!(demo.is_demo());
        assert_eq!(demo.restore_method(), RestoreMethod::SparseRestore);
    }

    #[test]
    fn unknown_version_is_unsupported() {
        let mut d = DeviceDescriptor::demo();
        d.ios_version = "?".to_string();
        assert_eq!(d.restore_method(), RestoreMethod::Unsupported);
    }
}
