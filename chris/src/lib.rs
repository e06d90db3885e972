#![doc = include_str!("../README.md")]

pub mod apply;
pub mod catalog;
pub mod device;
pub mod payload;
pub mod progress;
pub mod selection;
pub mod transport;
mod value;
mod version;

pub use apply::{ApplyCoordinator, ApplyHandle, ApplyRequest, ApplyState};
pub use catalog::{Catalog, Subsystem, TweakDefinition};
pub use device::DeviceDescriptor;
pub use payload::{Assembler, GestaltSeed, RestorePayload, assemble};
pub use progress::{Progress, ProgressReporter};
pub use selection::SelectionSet;
pub use transport::{RestoreTransport, StagingTransport, TransportSet};
pub use value::{TweakValue, ValueKind};
pub use version::{IosVersion, RestoreMethod};

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between picking tweaks and delivering them
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ChrisError {
    #[error("no tweak with id {0}")]
    NotFound(String),
    #[error("tweak {id} expects a {expected} value, got {found}")]
    TypeMismatch {
        id: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("iOS {0} is not supported")]
    UnsupportedDevice(String),
    #[error("{0}")]
    Transport(String),
    #[error("no device connected")]
    DeviceNotFound,
    #[error("device discovery failed: {0}")]
    Discovery(String),
    #[error("an apply is already in progress")]
    Busy,
    #[error("invalid catalog: {0}")]
    CatalogInvalid(String),
    #[error("unable to read MobileGestalt file {0}: {1}")]
    MobileGestaltFile(PathBuf, String),
    #[error("io failed")]
    Io(#[from] std::io::Error),
    #[error("plist failed")]
    Plist(#[from] plist::Error),
    #[cfg(feature = "device")]
    #[error("device request failed")]
    Device(#[from] idevice::IdeviceError),
}
