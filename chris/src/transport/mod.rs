//! Restore transports
//!
//! A transport takes an assembled payload to the device using one restore
//! method. The orchestrator picks the transport registered for the method the
//! device's iOS version resolves to.

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use crate::{ChrisError, RestoreMethod, RestorePayload, progress::ProgressReporter};

pub mod staging;

pub use staging::StagingTransport;

/// Future returned by [`RestoreTransport::deliver`]
pub type DeliverFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ChrisError>> + Send + 'a>>;

/// Something that can push a payload onto a device
///
/// Boxed futures keep the trait object safe so transports can be registered
/// per method at runtime.
pub trait RestoreTransport: Send + Sync + std::fmt::Debug {
    /// The restore method this transport implements
    fn method(&self) -> RestoreMethod;

    /// Delivers the payload
    ///
    /// # Arguments
    /// * `payload` - The assembled payload
    /// * `progress` - Reporter for the transport phase (92–100)
    ///
    /// # Returns
    /// A confirmation message for the user
    ///
    /// # Errors
    /// `ChrisError::Transport` with a readable reason. Failures are not
    /// retried.
    fn deliver<'a>(
        &'a self,
        payload: &'a RestorePayload,
        progress: &'a ProgressReporter,
    ) -> DeliverFuture<'a>;
}

/// Transports keyed by the method they implement
#[derive(Debug, Clone, Default)]
pub struct TransportSet {
    transports: HashMap<RestoreMethod, Arc<dyn RestoreTransport>>,
}

impl TransportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a transport, replacing any earlier one for the same method
    pub fn register(&mut self, transport: impl RestoreTransport + 'static) {
        self.transports
            .insert(transport.method(), Arc::new(transport));
    }

    pub fn with(mut self, transport: impl RestoreTransport + 'static) -> Self {
        self.register(transport);
        self
    }

    /// Both supported methods staged under one directory
    pub fn staging(root: impl Into<std::path::PathBuf>) -> Self {
        let root = root.into();
        Self::new()
            .with(StagingTransport::new(&root, RestoreMethod::SparseRestore))
            .with(StagingTransport::new(&root, RestoreMethod::BookRestore))
    }

    pub fn get(&self, method: RestoreMethod) -> Option<Arc<dyn RestoreTransport>> {
        self.transports.get(&method).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_set_covers_supported_methods() {
        let set = TransportSet::staging("/tmp/chris-staging");
        assert!(set.get(RestoreMethod::SparseRestore).is_some());
        assert_eq!(
            set.get(RestoreMethod::BookRestore).map(|t| t.method()),
            Some(RestoreMethod::BookRestore)
        );
        assert!(set.get(RestoreMethod::Unsupported).is_none());
    }
}
