//! Restore payload assembly
//!
//! Folds a validated selection into one map per subsystem. Assembly is a pure
//! function of its inputs; the only side channel is progress reporting.

use std::{io::Cursor, path::Path};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    Catalog, ChrisError, IosVersion, SelectionSet, Subsystem, TweakValue,
    progress::{self, ProgressReporter},
    selection::check_entry,
};

/// Everything a restore transport writes to the device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestorePayload {
    pub mobilegestalt: IndexMap<String, TweakValue>,
    pub statusbar: IndexMap<String, TweakValue>,
    pub springboard: IndexMap<String, TweakValue>,
    pub flags: IndexMap<String, TweakValue>,
    /// Bundle identifiers of daemons to disable
    pub daemons: IndexSet<String>,
}

impl RestorePayload {
    /// Total number of keys and daemons across all sections
    pub fn len(&self) -> usize {
        self.mobilegestalt.len()
            + self.statusbar.len()
            + self.springboard.len()
            + self.flags.len()
            + self.daemons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The key/value section a subsystem writes into, if it has one
    pub fn section(&self, subsystem: Subsystem) -> Option<&IndexMap<String, TweakValue>> {
        match subsystem {
            Subsystem::MobileGestalt => Some(&self.mobilegestalt),
            Subsystem::StatusBar => Some(&self.statusbar),
            Subsystem::SpringBoard => Some(&self.springboard),
            Subsystem::FeatureFlag => Some(&self.flags),
            Subsystem::DaemonDisable | Subsystem::Plist => None,
        }
    }

    /// Renders the payload as one plist dictionary keyed by section name
    pub fn to_plist(&self) -> plist::Dictionary {
        let section =
            |map: &IndexMap<String, TweakValue>| plist::Value::Dictionary(section_dictionary(map));

        let mut res = plist::Dictionary::new();
        res.insert("mobilegestalt".into(), section(&self.mobilegestalt));
        res.insert("statusbar".into(), section(&self.statusbar));
        res.insert("springboard".into(), section(&self.springboard));
        res.insert("flags".into(), section(&self.flags));
        res.insert(
            "daemons".into(),
            plist::Value::Array(
                self.daemons
                    .iter()
                    .map(|d| plist::Value::String(d.clone()))
                    .collect(),
            ),
        );
        res
    }
}

/// Converts one payload section into a plist dictionary
pub(crate) fn section_dictionary(map: &IndexMap<String, TweakValue>) -> plist::Dictionary {
    map.iter()
        .map(|(k, v)| (k.clone(), plist::Value::from(v.clone())))
        .collect()
}

/// MobileGestalt values read from a user supplied plist
///
/// These seed the mobilegestalt section before any tweak is applied, so a
/// selected tweak overrides a seeded key of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestaltSeed {
    values: IndexMap<String, TweakValue>,
}

impl GestaltSeed {
    /// Takes the `CacheExtra` dictionary if there is one, otherwise the root
    ///
    /// Only boolean, integer and string entries are kept.
    pub fn from_dictionary(dict: &plist::Dictionary) -> Self {
        let source = dict
            .get("CacheExtra")
            .and_then(|x| x.as_dictionary())
            .unwrap_or(dict);

        let mut values = IndexMap::with_capacity(source.len());
        for (k, v) in source {
            match TweakValue::from_plist(v) {
                Some(v) => {
                    values.insert(k.clone(), v);
                }
                None => trace!("Skipping non-scalar MobileGestalt key {k}"),
            }
        }
        Self { values }
    }

    /// Reads a MobileGestalt plist from disk
    ///
    /// # Errors
    /// `ChrisError::MobileGestaltFile` if the file can't be read or is not a
    /// dictionary
    pub async fn load(path: &Path) -> Result<Self, ChrisError> {
        let bad_file = |e: &dyn std::fmt::Display| {
            ChrisError::MobileGestaltFile(path.to_path_buf(), e.to_string())
        };
        let bytes = tokio::fs::read(path).await.map_err(|e| bad_file(&e))?;
        let value = plist::Value::from_reader(Cursor::new(bytes)).map_err(|e| bad_file(&e))?;
        match value.as_dictionary() {
            Some(dict) => Ok(Self::from_dictionary(dict)),
            None => Err(ChrisError::MobileGestaltFile(
                path.to_path_buf(),
                "root is not a dictionary".to_string(),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builds restore payloads for one device
pub struct Assembler<'a> {
    catalog: &'a Catalog,
    version: &'a IosVersion,
    seed: Option<&'a GestaltSeed>,
    progress: ProgressReporter,
}

impl<'a> Assembler<'a> {
    pub fn new(catalog: &'a Catalog, version: &'a IosVersion) -> Self {
        Self {
            catalog,
            version,
            seed: None,
            progress: ProgressReporter::silent(),
        }
    }

    pub fn with_seed(mut self, seed: Option<&'a GestaltSeed>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Validates the selection and groups it by subsystem
    ///
    /// # Errors
    /// `ChrisError::TypeMismatch` if any value has the wrong kind. Unknown and
    /// ineligible tweaks are skipped instead.
    pub fn assemble(&self, selection: &SelectionSet) -> Result<RestorePayload, ChrisError> {
        let mut payload = RestorePayload::default();
        if let Some(seed) = self.seed {
            payload.mobilegestalt.extend(
                seed.values
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }

        let total = selection.len();
        for (done, (id, value)) in selection.iter().enumerate() {
            let definition = check_entry(self.catalog, self.version, id, value)?;
            let percent = progress::build_percent(done + 1, total);
            let Some(definition) = definition else {
                self.progress.report(percent, format!("Skipping: {id}"));
                continue;
            };
            self.progress
                .report(percent, format!("Building: {}", definition.name));

            let key = definition.key.clone();
            match definition.subsystem {
                Subsystem::MobileGestalt => {
                    payload.mobilegestalt.insert(key, value.clone());
                }
                Subsystem::StatusBar => {
                    payload.statusbar.insert(key, value.clone());
                }
                Subsystem::SpringBoard => {
                    payload.springboard.insert(key, value.clone());
                }
                Subsystem::FeatureFlag => {
                    payload.flags.insert(key, value.clone());
                }
                Subsystem::DaemonDisable => {
                    if value.is_truthy() {
                        payload.daemons.insert(key);
                    }
                }
                Subsystem::Plist => {
                    debug!("No payload section for plist tweak {id}, ignoring");
                }
            }
        }

        self.progress.report(progress::FINALIZE, "Finalizing payload...");
        Ok(payload)
    }
}

/// Assembles a payload with no seed and no progress reporting
pub fn assemble(
    selection: &SelectionSet,
    catalog: &Catalog,
    version: &IosVersion,
) -> Result<RestorePayload, ChrisError> {
    Assembler::new(catalog, version).assemble(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TweakDefinition;

    fn v(s: &str) -> IosVersion {
        IosVersion::parse(s)
    }

    #[test]
    fn falsy_daemons_are_excluded() {
        let catalog = Catalog::builtin().unwrap();
        let selection = SelectionSet::new()
            .with("kill_gamecenter", true)
            .with("kill_siri", false);
        let payload = assemble(&selection, &catalog, &v("18.1.1")).unwrap();
        assert_eq!(
            payload.daemons.iter().collect::<Vec<_>>(),
            vec!["com.apple.gamed"]
        );
    }

    #[test]
    fn ineligible_gestalt_tweak_is_dropped() {
        let catalog = Catalog::builtin().unwrap();
        let selection = SelectionSet::new().with("dynamic_island", true);
        let payload = assemble(&selection, &catalog, &v("19.0")).unwrap();
        assert!(payload.mobilegestalt.is_empty());
        assert!(payload.is_empty());
    }

    #[test]
    fn routes_by_subsystem() {
        let catalog = Catalog::builtin().unwrap();
        let selection = SelectionSet::new()
            .with("dynamic_island", true)
            .with("carrier_name", "Chris")
            .with("auto_lock_time", 30i64)
            .with("metal_hud", true)
            .with("kill_otad", true);
        let payload = assemble(&selection, &catalog, &v("18.0")).unwrap();

        assert_eq!(
            payload.mobilegestalt.get("CwvKxM2iEFL9qfyGAEkL7A"),
            Some(&TweakValue::Bool(true))
        );
        assert_eq!(
            payload.statusbar.get("CarrierName"),
            Some(&TweakValue::Text("Chris".into()))
        );
        assert_eq!(
            payload.springboard.get("SBLockScreenIdleTime"),
            Some(&TweakValue::Integer(30))
        );
        assert_eq!(
            payload.flags.get("MetalForceHUDEnabled"),
            Some(&TweakValue::Bool(true))
        );
        assert!(payload.daemons.contains("com.apple.mobile.softwareupdated"));
        assert_eq!(payload.len(), 5);
    }

    #[test]
    fn type_mismatch_aborts() {
        let catalog = Catalog::builtin().unwrap();
        let selection = SelectionSet::new()
            .with("kill_otad", true)
            .with("wifi_bars", "three");
        assert!(matches!(
            assemble(&selection, &catalog, &v("18.0")),
            Err(ChrisError::TypeMismatch { id, .. }) if id == "wifi_bars"
        ));
    }

    #[test]
    fn plist_tweaks_are_ignored() {
        let catalog = Catalog::new(vec![
            TweakDefinition::new("edit", "Edit", "", Subsystem::Plist, "Some.plist"),
            TweakDefinition::new("flag", "Flag", "", Subsystem::FeatureFlag, "Flag"),
        ])
        .unwrap();
        let selection = SelectionSet::new().with("edit", true).with("flag", true);
        let payload = assemble(&selection, &catalog, &v("18.0")).unwrap();
        assert_eq!(payload.len(), 1);
        assert!(payload.flags.contains_key("Flag"));
    }

    #[test]
    fn assembly_is_idempotent() {
        let catalog = Catalog::builtin().unwrap();
        let selection = SelectionSet::new()
            .with("kill_gamecenter", true)
            .with("kill_gamecenter_again", true)
            .with("boot_chime", true)
            .with("time_text", "9:41");
        let a = assemble(&selection, &catalog, &v("17.5")).unwrap();
        let b = assemble(&selection, &catalog, &v("17.5")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn selected_tweaks_override_seed() {
        let catalog = Catalog::builtin().unwrap();
        let mut extra = plist::Dictionary::new();
        extra.insert("CwvKxM2iEFL9qfyGAEkL7A".into(), false.into());
        extra.insert("ArtworkTraits".into(), plist::Value::Dictionary(Default::default()));
        extra.insert("SomeOtherKey".into(), 7.into());
        let mut root = plist::Dictionary::new();
        root.insert("CacheExtra".into(), plist::Value::Dictionary(extra));
        let seed = GestaltSeed::from_dictionary(&root);
        assert_eq!(seed.len(), 2);

        let version = v("18.1");
        let payload = Assembler::new(&catalog, &version)
            .with_seed(Some(&seed))
            .assemble(&SelectionSet::new().with("dynamic_island", true))
            .unwrap();
        assert_eq!(
            payload.mobilegestalt.get("CwvKxM2iEFL9qfyGAEkL7A"),
            Some(&TweakValue::Bool(true))
        );
        assert_eq!(
            payload.mobilegestalt.get("SomeOtherKey"),
            Some(&TweakValue::Integer(7))
        );
    }

    #[test]
    fn seed_without_cache_extra_uses_root() {
        let mut root = plist::Dictionary::new();
        root.insert("Key".into(), "value".into());
        let seed = GestaltSeed::from_dictionary(&root);
        assert_eq!(seed.len(), 1);
    }

    #[tokio::test]
    async fn seed_load_rejects_non_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gestalt.plist");
        plist::Value::Array(Vec::new()).to_file_xml(&path).unwrap();
        assert!(matches!(
            GestaltSeed::load(&path).await,
            Err(ChrisError::MobileGestaltFile(..))
        ));
        assert!(
            GestaltSeed::load(&dir.path().join("missing.plist"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn seed_load_reads_binary_plist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gestalt.plist");
        let mut extra = plist::Dictionary::new();
        extra.insert("ArtworkDeviceSubType".into(), 2556.into());
        let mut root = plist::Dictionary::new();
        root.insert("CacheExtra".into(), plist::Value::Dictionary(extra));
        plist::Value::Dictionary(root).to_file_binary(&path).unwrap();

        let seed = GestaltSeed::load(&path).await.unwrap();
        assert_eq!(seed.len(), 1);
    }

    #[test]
    fn build_progress_is_monotonic_and_below_transport() {
        let catalog = Catalog::builtin().unwrap();
        let selection = SelectionSet::new()
            .with("kill_gamecenter", true)
            .with("unknown", true)
            .with("dynamic_island", true)
            .with("carrier_name", "x");
        let (reporter, mut rx) = ProgressReporter::channel();
        let version = v("18.0");
        Assembler::new(&catalog, &version)
            .with_progress(reporter)
            .assemble(&selection)
            .unwrap();

        let mut seen = Vec::new();
        while let Ok(p) = rx.try_recv() {
            seen.push(p.percent);
        }
        assert_eq!(seen.len(), selection.len() + 1);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen.iter().all(|p| *p < progress::TRANSPORT_START));
    }

    #[test]
    fn to_plist_has_every_section() {
        let catalog = Catalog::builtin().unwrap();
        let selection = SelectionSet::new().with("kill_tipsd", true);
        let dict = assemble(&selection, &catalog, &v("18.0"))
            .unwrap()
            .to_plist();
        for name in ["mobilegestalt", "statusbar", "springboard", "flags", "daemons"] {
            assert!(dict.contains_key(name), "missing {name}");
        }
        assert_eq!(
            dict.get("daemons").and_then(|d| d.as_array()).map(|a| a.len()),
            Some(1)
        );
    }
}
