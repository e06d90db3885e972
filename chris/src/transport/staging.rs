//! Staging transport
//!
//! Renders a payload into the preference files each subsystem targets and
//! writes them under a local directory, mirroring the on-device paths. The
//! staged tree is what a restore would place on the device.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{DeliverFuture, RestoreTransport};
use crate::{
    ChrisError, RestoreMethod, RestorePayload, payload::section_dictionary as section,
    progress::ProgressReporter,
};

const GESTALT_PATH: &str = "var/containers/Shared/SystemGroup/systemgroup.com.apple.mobilegestaltcache/Library/Caches/com.apple.MobileGestalt.plist";
const STATUS_BAR_PATH: &str =
    "var/mobile/Library/Preferences/com.apple.springboard.statusbar.plist";
const SPRINGBOARD_PATH: &str = "var/Managed Preferences/mobile/com.apple.springboard.plist";
const FEATURE_FLAGS_PATH: &str = "var/preferences/FeatureFlags/Global.plist";
const DISABLED_DAEMONS_PATH: &str = "var/db/com.apple.xpc.launchd/disabled.plist";

/// A preference file rendered from a payload
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    /// Path on the device, relative to `/`
    pub path: &'static str,
    pub contents: plist::Dictionary,
}

/// Renders every target file for a payload
///
/// All five files are always produced so an empty payload resets them.
pub fn render(payload: &RestorePayload) -> Vec<StagedFile> {
    let mut gestalt = plist::Dictionary::new();
    gestalt.insert(
        "CacheExtra".into(),
        plist::Value::Dictionary(section(&payload.mobilegestalt)),
    );

    let mut status_bar = plist::Dictionary::new();
    status_bar.insert(
        "Overrides".into(),
        plist::Value::Dictionary(section(&payload.statusbar)),
    );

    let daemons: plist::Dictionary = payload
        .daemons
        .iter()
        .map(|d| (d.clone(), plist::Value::Boolean(true)))
        .collect();

    vec![
        StagedFile {
            path: GESTALT_PATH,
            contents: gestalt,
        },
        StagedFile {
            path: STATUS_BAR_PATH,
            contents: status_bar,
        },
        StagedFile {
            path: SPRINGBOARD_PATH,
            contents: section(&payload.springboard),
        },
        StagedFile {
            path: FEATURE_FLAGS_PATH,
            contents: section(&payload.flags),
        },
        StagedFile {
            path: DISABLED_DAEMONS_PATH,
            contents: daemons,
        },
    ]
}

/// Writes staged payloads to `<root>/<method>/`
#[derive(Debug, Clone)]
pub struct StagingTransport {
    root: PathBuf,
    method: RestoreMethod,
}

impl StagingTransport {
    pub fn new(root: impl AsRef<Path>, method: RestoreMethod) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            method,
        }
    }

    /// The directory this transport writes into
    pub fn target_dir(&self) -> PathBuf {
        self.root.join(self.method.as_str())
    }

    async fn write_all(
        &self,
        payload: &RestorePayload,
        progress: &ProgressReporter,
    ) -> Result<String, ChrisError> {
        let dir = self.target_dir();
        let files = render(payload);
        let count = files.len();

        for (i, file) in files.into_iter().enumerate() {
            let dest = dir.join(file.path);
            progress.report(
                crate::progress::TRANSPORT_START + (i * 7 / count) as u8,
                format!("Writing {}", file.path),
            );
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            let mut buf = Vec::new();
            plist::to_writer_xml(&mut buf, &file.contents)?;
            tokio::fs::write(&dest, buf).await?;
            debug!("Staged {}", dest.display());
        }

        info!("Staged {count} files for {} in {}", self.method, dir.display());
        Ok(format!(
            "Tweaks staged for {} in {}. Respring to see changes.",
            self.method,
            dir.display()
        ))
    }
}

impl RestoreTransport for StagingTransport {
    fn method(&self) -> RestoreMethod {
        self.method
    }

    fn deliver<'a>(
        &'a self,
        payload: &'a RestorePayload,
        progress: &'a ProgressReporter,
    ) -> DeliverFuture<'a> {
        Box::pin(async move {
            self.write_all(payload, progress)
                .await
                .map_err(|e| ChrisError::Transport(format!("staging failed: {e}")))
        })
    }
}
