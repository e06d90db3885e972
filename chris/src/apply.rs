//! Background apply orchestration
//!
//! A [`ApplyCoordinator`] runs at most one apply at a time on a tokio task.
//! The caller gets a handle with the progress stream and the terminal result.

use std::{path::PathBuf, sync::Arc};

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{info, warn};

use crate::{
    Catalog, ChrisError, IosVersion, RestoreMethod, RestorePayload, SelectionSet,
    payload::{Assembler, GestaltSeed},
    progress::{self, Progress, ProgressReporter},
    transport::TransportSet,
};

/// Where the coordinator is in an apply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ApplyState {
    #[default]
    Idle,
    Building,
    Transporting,
    /// Finished, with the transport's confirmation
    Succeeded(String),
    /// Finished, with a readable reason
    Failed(String),
}

impl ApplyState {
    /// Whether an apply is currently running
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Building | Self::Transporting)
    }
}

/// One apply attempt
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    pub selection: SelectionSet,
    pub version: IosVersion,
    /// A MobileGestalt plist whose scalar keys seed the payload
    pub mobilegestalt: Option<PathBuf>,
    /// Skip assembly and deliver an empty payload
    pub reset: bool,
}

impl ApplyRequest {
    pub fn new(selection: SelectionSet, version: IosVersion) -> Self {
        Self {
            selection,
            version,
            mobilegestalt: None,
            reset: false,
        }
    }

    /// Restores defaults by delivering a payload with no overrides
    pub fn reset(version: IosVersion) -> Self {
        Self {
            reset: true,
            ..Self::new(SelectionSet::new(), version)
        }
    }

    pub fn with_mobilegestalt(mut self, path: Option<PathBuf>) -> Self {
        self.mobilegestalt = path;
        self
    }

    pub fn method(&self) -> RestoreMethod {
        RestoreMethod::resolve(&self.version)
    }
}

/// Receiving end of a running apply
#[derive(Debug)]
pub struct ApplyHandle {
    progress: mpsc::UnboundedReceiver<Progress>,
    result: oneshot::Receiver<Result<String, ChrisError>>,
}

impl ApplyHandle {
    /// Next progress update, or `None` once the worker is done reporting
    pub async fn next_progress(&mut self) -> Option<Progress> {
        self.progress.recv().await
    }

    /// Waits for the terminal result
    ///
    /// Progress not yet read is discarded.
    pub async fn finish(self) -> Result<String, ChrisError> {
        match self.result.await {
            Ok(res) => res,
            Err(_) => Err(ChrisError::Transport(
                "apply worker exited without a result".to_string(),
            )),
        }
    }
}

/// Runs applies against a catalog and a set of transports
#[derive(Debug, Clone)]
pub struct ApplyCoordinator {
    catalog: Arc<Catalog>,
    transports: Arc<TransportSet>,
    state: Arc<watch::Sender<ApplyState>>,
}

impl ApplyCoordinator {
    pub fn new(catalog: Arc<Catalog>, transports: TransportSet) -> Self {
        Self {
            catalog,
            transports: Arc::new(transports),
            state: Arc::new(watch::Sender::new(ApplyState::Idle)),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> ApplyState {
        self.state.borrow().clone()
    }

    /// Watches state transitions
    pub fn subscribe(&self) -> watch::Receiver<ApplyState> {
        self.state.subscribe()
    }

    /// Starts an apply on a background task
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// * `ChrisError::Busy` if an apply is already building or transporting
    /// * `ChrisError::UnsupportedDevice` if the version has no restore method;
    ///   nothing is built and the state becomes `Failed`
    pub fn start(&self, request: ApplyRequest) -> Result<ApplyHandle, ChrisError> {
        let method = request.method();

        // Check and claim in one step so two callers can't both get in
        let mut busy = false;
        self.state.send_if_modified(|state| {
            if state.is_busy() {
                busy = true;
                return false;
            }
            *state = if method.is_supported() {
                ApplyState::Building
            } else {
                ApplyState::Failed(format!(
                    "iOS {} is not supported by any restore method",
                    request.version
                ))
            };
            true
        });
        if busy {
            return Err(ChrisError::Busy);
        }
        if !method.is_supported() {
            warn!("Refusing to apply to iOS {}", request.version);
            return Err(ChrisError::UnsupportedDevice(request.version.to_string()));
        }

        info!("Applying {} tweaks via {method}", request.selection.len());
        let (reporter, progress) = ProgressReporter::channel();
        let (result_tx, result) = oneshot::channel();
        let catalog = self.catalog.clone();
        let transports = self.transports.clone();
        let state = self.state.clone();

        tokio::spawn(async move {
            // The apply runs on its own task so a panic still ends in `Failed`
            let worker = {
                let state = state.clone();
                tokio::spawn(async move {
                    run(&catalog, &transports, &state, &request, method, &reporter).await
                })
            };
            let res = match worker.await {
                Ok(res) => res,
                Err(e) => Err(ChrisError::Transport(format!("apply worker stopped: {e}"))),
            };
            match &res {
                Ok(message) => {
                    info!("Apply finished: {message}");
                    state.send_replace(ApplyState::Succeeded(message.clone()));
                }
                Err(e) => {
                    warn!("Apply failed: {e}");
                    state.send_replace(ApplyState::Failed(e.to_string()));
                }
            }
            // Caller may have dropped the handle
            let _ = result_tx.send(res);
        });

        Ok(ApplyHandle { progress, result })
    }
}

async fn run(
    catalog: &Catalog,
    transports: &TransportSet,
    state: &watch::Sender<ApplyState>,
    request: &ApplyRequest,
    method: RestoreMethod,
    progress: &ProgressReporter,
) -> Result<String, ChrisError> {
    let payload = if request.reset {
        progress.report(progress::FINALIZE, "Restoring defaults...");
        RestorePayload::default()
    } else {
        let seed = match &request.mobilegestalt {
            Some(path) => Some(GestaltSeed::load(path).await?),
            None => None,
        };
        Assembler::new(catalog, &request.version)
            .with_seed(seed.as_ref())
            .with_progress(progress.clone())
            .assemble(&request.selection)?
    };

    state.send_replace(ApplyState::Transporting);
    progress.report(
        progress::TRANSPORT_START,
        format!("Connecting via {method}..."),
    );
    let transport = transports
        .get(method)
        .ok_or_else(|| ChrisError::Transport(format!("no transport registered for {method}")))?;
    let message = transport.deliver(&payload, progress).await?;

    progress.report(progress::DONE, "Done! Respring your device.");
    Ok(message)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::transport::{DeliverFuture, RestoreTransport};

    /// Records payloads and answers with a fixed result
    #[derive(Debug)]
    struct MockTransport {
        method: RestoreMethod,
        fail: bool,
        panics: bool,
        gate: Option<Arc<tokio::sync::Notify>>,
        seen: Arc<Mutex<Vec<RestorePayload>>>,
    }

    impl MockTransport {
        fn new(method: RestoreMethod) -> Self {
            Self {
                method,
                fail: false,
                panics: false,
                gate: None,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl RestoreTransport for MockTransport {
        fn method(&self) -> RestoreMethod {
            self.method
        }

        fn deliver<'a>(
            &'a self,
            payload: &'a RestorePayload,
            progress: &'a ProgressReporter,
        ) -> DeliverFuture<'a> {
            Box::pin(async move {
                if let Some(gate) = &self.gate {
                    gate.notified().await;
                }
                if self.panics {
                    panic!("transport bug");
                }
                self.seen.lock().unwrap().push(payload.clone());
                progress.report(96, "Uploading");
                if self.fail {
                    Err(ChrisError::Transport("device said no".to_string()))
                } else {
                    Ok(format!("delivered via {}", self.method))
                }
            })
        }
    }

    fn coordinator(transport: MockTransport) -> ApplyCoordinator {
        ApplyCoordinator::new(
            Arc::new(Catalog::builtin().unwrap()),
            TransportSet::new().with(transport),
        )
    }

    fn selection() -> SelectionSet {
        SelectionSet::new()
            .with("boot_chime", true)
            .with("kill_gamecenter", true)
            .with("carrier_name", "Chris")
    }

    #[tokio::test]
    async fn successful_apply() {
        let transport = MockTransport::new(RestoreMethod::SparseRestore);
        let seen = transport.seen.clone();
        let coordinator = coordinator(transport);

        let handle = coordinator
            .start(ApplyRequest::new(selection(), IosVersion::parse("18.1")))
            .unwrap();
        let message = handle.finish().await.unwrap();
        assert_eq!(message, "delivered via SparseRestore");
        assert_eq!(coordinator.state(), ApplyState::Succeeded(message));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].daemons.contains("com.apple.gamed"));
        assert_eq!(seen[0].statusbar.len(), 1);
    }

    #[tokio::test]
    async fn progress_is_ordered() {
        let coordinator = coordinator(MockTransport::new(RestoreMethod::BookRestore));
        let mut handle = coordinator
            .start(ApplyRequest::new(selection(), IosVersion::parse("18.4")))
            .unwrap();

        let mut updates = Vec::new();
        while let Some(p) = handle.next_progress().await {
            updates.push(p);
        }
        assert!(handle.finish().await.is_ok());

        let percents: Vec<u8> = updates.iter().map(|p| p.percent).collect();
        assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{percents:?}");
        assert_eq!(percents.last(), Some(&progress::DONE));

        let connecting = updates
            .iter()
            .position(|p| p.message == "Connecting via BookRestore...")
            .unwrap();
        assert!(
            updates[..connecting]
                .iter()
                .all(|p| p.percent < progress::TRANSPORT_START)
        );
        assert_eq!(updates[connecting].percent, progress::TRANSPORT_START);
    }

    #[tokio::test]
    async fn second_apply_is_refused_while_running() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let mut transport = MockTransport::new(RestoreMethod::SparseRestore);
        transport.gate = Some(gate.clone());
        let coordinator = coordinator(transport);
        let mut states = coordinator.subscribe();

        let first = coordinator
            .start(ApplyRequest::new(selection(), IosVersion::parse("17.5")))
            .unwrap();
        states
            .wait_for(|s| *s == ApplyState::Transporting)
            .await
            .unwrap();

        let second = coordinator.start(ApplyRequest::new(selection(), IosVersion::parse("17.5")));
        assert!(matches!(second, Err(ChrisError::Busy)));

        gate.notify_one();
        assert!(first.finish().await.is_ok());

        // Released once finished
        let third = coordinator
            .start(ApplyRequest::new(selection(), IosVersion::parse("17.5")))
            .unwrap();
        gate.notify_one();
        assert!(third.finish().await.is_ok());
    }

    #[tokio::test]
    async fn unsupported_version_fails_without_building() {
        let transport = MockTransport::new(RestoreMethod::SparseRestore);
        let seen = transport.seen.clone();
        let coordinator = coordinator(transport);

        let res = coordinator.start(ApplyRequest::new(selection(), IosVersion::parse("16.7")));
        assert!(matches!(res, Err(ChrisError::UnsupportedDevice(v)) if v == "16.7"));
        assert!(matches!(coordinator.state(), ApplyState::Failed(_)));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_reported_verbatim() {
        let mut transport = MockTransport::new(RestoreMethod::SparseRestore);
        transport.fail = true;
        let coordinator = coordinator(transport);

        let handle = coordinator
            .start(ApplyRequest::new(selection(), IosVersion::parse("18.0")))
            .unwrap();
        let err = handle.finish().await.unwrap_err();
        assert!(matches!(&err, ChrisError::Transport(m) if m == "device said no"));
        assert_eq!(coordinator.state(), ApplyState::Failed(err.to_string()));
        assert!(!coordinator.state().is_busy());
    }

    #[tokio::test]
    async fn type_mismatch_fails_the_apply() {
        let transport = MockTransport::new(RestoreMethod::SparseRestore);
        let seen = transport.seen.clone();
        let coordinator = coordinator(transport);

        let bad = SelectionSet::new().with("boot_chime", "yes please");
        let handle = coordinator
            .start(ApplyRequest::new(bad, IosVersion::parse("18.0")))
            .unwrap();
        assert!(matches!(
            handle.finish().await,
            Err(ChrisError::TypeMismatch { .. })
        ));
        assert!(seen.lock().unwrap().is_empty());

        // A failed build releases the coordinator
        assert!(matches!(coordinator.state(), ApplyState::Failed(_)));
        let next = coordinator
            .start(ApplyRequest::new(selection(), IosVersion::parse("18.0")))
            .unwrap();
        assert!(next.finish().await.is_ok());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn panicking_transport_fails_and_releases() {
        let mut transport = MockTransport::new(RestoreMethod::SparseRestore);
        transport.panics = true;
        let coordinator = coordinator(transport);

        let handle = coordinator
            .start(ApplyRequest::new(selection(), IosVersion::parse("18.0")))
            .unwrap();
        let err = handle.finish().await.unwrap_err();
        assert!(matches!(&err, ChrisError::Transport(m) if m.starts_with("apply worker stopped")));
        assert_eq!(coordinator.state(), ApplyState::Failed(err.to_string()));

        // Not wedged: the next start is accepted rather than refused as busy
        let again = coordinator.start(ApplyRequest::new(selection(), IosVersion::parse("18.0")));
        assert!(again.is_ok());
        assert!(again.unwrap().finish().await.is_err());
    }

    #[tokio::test]
    async fn missing_transport_fails() {
        let coordinator = coordinator(MockTransport::new(RestoreMethod::SparseRestore));
        let handle = coordinator
            .start(ApplyRequest::new(selection(), IosVersion::parse("18.3")))
            .unwrap();
        assert!(matches!(
            handle.finish().await,
            Err(ChrisError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn reset_delivers_empty_payload() {
        let transport = MockTransport::new(RestoreMethod::SparseRestore);
        let seen = transport.seen.clone();
        let coordinator = coordinator(transport);

        let handle = coordinator
            .start(ApplyRequest::reset(IosVersion::parse("17.0")))
            .unwrap();
        assert!(handle.finish().await.is_ok());
        assert_eq!(seen.lock().unwrap().as_slice(), &[RestorePayload::default()]);
    }

    #[tokio::test]
    async fn bad_mobilegestalt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.plist");
        let coordinator = coordinator(MockTransport::new(RestoreMethod::SparseRestore));

        let request = ApplyRequest::new(selection(), IosVersion::parse("18.0"))
            .with_mobilegestalt(Some(path));
        let handle = coordinator.start(request).unwrap();
        assert!(matches!(
            handle.finish().await,
            Err(ChrisError::MobileGestaltFile(..))
        ));
    }
}
