//! Tweak catalog
//!
//! The catalog is an immutable registry of every tweak the tool knows about.
//! It is built once, validated on construction and shared read-only.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{ChrisError, IosVersion, TweakValue, ValueKind};

mod builtin;

/// The part of the system a tweak writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    /// Hashed MobileGestalt capability keys
    #[serde(rename = "mobilegestalt")]
    MobileGestalt,
    #[serde(rename = "statusbar")]
    StatusBar,
    #[serde(rename = "springboard")]
    SpringBoard,
    FeatureFlag,
    /// Launch daemons to disable, keyed by bundle identifier
    #[serde(rename = "daemon")]
    DaemonDisable,
    Plist,
}

impl Subsystem {
    pub const ALL: [Subsystem; 6] = [
        Subsystem::MobileGestalt,
        Subsystem::StatusBar,
        Subsystem::SpringBoard,
        Subsystem::FeatureFlag,
        Subsystem::DaemonDisable,
        Subsystem::Plist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::MobileGestalt => "mobilegestalt",
            Subsystem::StatusBar => "statusbar",
            Subsystem::SpringBoard => "springboard",
            Subsystem::FeatureFlag => "feature_flag",
            Subsystem::DaemonDisable => "daemon",
            Subsystem::Plist => "plist",
        }
    }

    /// Heading used when listing tweaks
    pub fn title(&self) -> &'static str {
        match self {
            Subsystem::MobileGestalt => "Hidden iOS Features",
            Subsystem::StatusBar => "Status Bar",
            Subsystem::SpringBoard => "SpringBoard Options",
            Subsystem::FeatureFlag => "Internal Options & Feature Flags",
            Subsystem::DaemonDisable => "Daemons",
            Subsystem::Plist => "Plist Edits",
        }
    }
}

impl std::str::FromStr for Subsystem {
    type Err = ChrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subsystem::ALL
            .into_iter()
            .find(|x| x.as_str() == s)
            .ok_or_else(|| ChrisError::CatalogInvalid(format!("unknown subsystem `{s}`")))
    }
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tweak the user can toggle
#[derive(Debug, Clone, Serialize)]
pub struct TweakDefinition {
    /// Stable lookup key
    pub id: String,
    pub name: String,
    pub description: String,
    pub subsystem: Subsystem,
    /// The literal key written into the subsystem's data
    pub key: String,
    pub ios_min: IosVersion,
    /// Inclusive upper bound, `None` is unbounded
    pub ios_max: Option<IosVersion>,
    /// Decides which value kind a selection must carry
    pub default: TweakValue,
    pub risky: bool,
    pub category: String,
    /// Not part of the baseline feature set other tools ship
    pub exclusive: bool,
}

impl TweakDefinition {
    /// Creates a boolean tweak available from iOS 17.0 with no upper bound
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        subsystem: Subsystem,
        key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            subsystem,
            key: key.into(),
            ios_min: IosVersion::new(&[17, 0]),
            ios_max: None,
            default: TweakValue::Bool(false),
            risky: false,
            category: "General".to_string(),
            exclusive: false,
        }
    }

    pub fn with_ios_min(mut self, min: &str) -> Self {
        self.ios_min = IosVersion::parse(min);
        self
    }

    pub fn with_ios_range(mut self, min: &str, max: &str) -> Self {
        self.ios_min = IosVersion::parse(min);
        self.ios_max = Some(IosVersion::parse(max));
        self
    }

    pub fn with_default(mut self, default: impl Into<TweakValue>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn risky(mut self) -> Self {
        self.risky = true;
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    /// The kind of value this tweak accepts
    pub fn kind(&self) -> ValueKind {
        self.default.kind()
    }

    /// Whether the tweak applies to a device running `version`
    pub fn is_eligible(&self, version: &IosVersion) -> bool {
        self.ios_min <= *version && self.ios_max.as_ref().is_none_or(|max| version <= max)
    }

    /// Human readable version range, e.g. `iOS 17.0 – 18.1.1` or `iOS 26.0+`
    pub fn ios_range(&self) -> String {
        match &self.ios_max {
            Some(max) => format!("iOS {} – {}", self.ios_min, max),
            None => format!("iOS {}+", self.ios_min),
        }
    }
}

/// The immutable registry of tweak definitions
#[derive(Debug, Clone)]
pub struct Catalog {
    definitions: Vec<TweakDefinition>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, checking its invariants
    ///
    /// # Errors
    /// `ChrisError::CatalogInvalid` if an id repeats, two tweaks share a key
    /// within one subsystem, or a version range is inverted
    pub fn new(definitions: Vec<TweakDefinition>) -> Result<Self, ChrisError> {
        let mut index = HashMap::with_capacity(definitions.len());
        let mut keys = HashSet::with_capacity(definitions.len());

        for (i, def) in definitions.iter().enumerate() {
            if index.insert(def.id.clone(), i).is_some() {
                return Err(ChrisError::CatalogInvalid(format!(
                    "duplicate tweak id `{}`",
                    def.id
                )));
            }
            if !keys.insert((def.subsystem, def.key.as_str())) {
                return Err(ChrisError::CatalogInvalid(format!(
                    "tweak `{}` reuses {} key `{}`",
                    def.id, def.subsystem, def.key
                )));
            }
            if let Some(max) = &def.ios_max
                && def.ios_min > *max
            {
                return Err(ChrisError::CatalogInvalid(format!(
                    "tweak `{}` has iOS range {} > {}",
                    def.id, def.ios_min, max
                )));
            }
        }

        Ok(Self { definitions, index })
    }

    /// The catalog shipped with the tool
    pub fn builtin() -> Result<Self, ChrisError> {
        Self::new(builtin::definitions())
    }

    /// Every definition in declaration order
    pub fn all(&self) -> &[TweakDefinition] {
        &self.definitions
    }

    pub fn by_id(&self, id: &str) -> Result<&TweakDefinition, ChrisError> {
        self.get(id)
            .ok_or_else(|| ChrisError::NotFound(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<&TweakDefinition> {
        self.index.get(id).map(|i| &self.definitions[*i])
    }

    pub fn by_subsystem(&self, subsystem: Subsystem) -> impl Iterator<Item = &TweakDefinition> {
        self.definitions
            .iter()
            .filter(move |d| d.subsystem == subsystem)
    }

    /// Definitions usable on a device running `version`
    pub fn eligible<'a>(
        &'a self,
        version: &'a IosVersion,
    ) -> impl Iterator<Item = &'a TweakDefinition> + 'a {
        self.definitions.iter().filter(|d| d.is_eligible(version))
    }

    pub fn exclusive(&self) -> impl Iterator<Item = &TweakDefinition> {
        self.definitions.iter().filter(|d| d.exclusive)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(id: &str, key: &str) -> TweakDefinition {
        TweakDefinition::new(id, id, "", Subsystem::FeatureFlag, key)
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.len() > 90);

        let mut pairs = HashSet::new();
        for def in catalog.all() {
            assert!(
                pairs.insert((def.subsystem, def.key.clone())),
                "duplicate {} key {}",
                def.subsystem,
                def.key
            );
        }
    }

    #[test]
    fn builtin_declaration_order() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.all()[0].id, "dynamic_island");
        assert_eq!(
            catalog.all().last().map(|d| d.id.as_str()),
            Some("old_photos_ui")
        );
    }

    #[test]
    fn lookup() {
        let catalog = Catalog::builtin().unwrap();
        let def = catalog.by_id("kill_gamecenter").unwrap();
        assert_eq!(def.subsystem, Subsystem::DaemonDisable);
        assert_eq!(def.key, "com.apple.gamed");
        assert!(matches!(
            catalog.by_id("does_not_exist"),
            Err(ChrisError::NotFound(id)) if id == "does_not_exist"
        ));
    }

    #[test]
    fn rejects_duplicate_id() {
        let res = Catalog::new(vec![flag("a", "KeyA"), flag("a", "KeyB")]);
        assert!(matches!(res, Err(ChrisError::CatalogInvalid(_))));
    }

    #[test]
    fn rejects_shared_key_in_subsystem() {
        let res = Catalog::new(vec![flag("a", "Key"), flag("b", "Key")]);
        assert!(matches!(res, Err(ChrisError::CatalogInvalid(_))));

        // Same key in different subsystems is fine
        let other = TweakDefinition::new("c", "c", "", Subsystem::SpringBoard, "Key");
        assert!(Catalog::new(vec![flag("a", "Key"), other]).is_ok());
    }

    #[test]
    fn rejects_inverted_range() {
        let res = Catalog::new(vec![flag("a", "Key").with_ios_range("18.1", "17.0")]);
        assert!(matches!(res, Err(ChrisError::CatalogInvalid(_))));
    }

    #[test]
    fn eligibility_bounds_are_inclusive() {
        let def = flag("a", "Key").with_ios_range("17.0", "18.1.1");
        assert!(def.is_eligible(&IosVersion::parse("17.0")));
        assert!(def.is_eligible(&IosVersion::parse("18.1.1")));
        assert!(!def.is_eligible(&IosVersion::parse("18.2")));
        assert!(!def.is_eligible(&IosVersion::parse("16.7")));

        let open = flag("b", "Other").with_ios_min("26.0");
        assert!(open.is_eligible(&IosVersion::parse("99.0")));
        assert!(!open.is_eligible(&IosVersion::parse("garbage")));
    }

    #[test]
    fn ios_range_display() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.by_id("dynamic_island").unwrap().ios_range(),
            "iOS 17.0 – 18.1.1"
        );
        assert_eq!(
            catalog.by_id("solarium_fallback").unwrap().ios_range(),
            "iOS 26.0+"
        );
    }

    #[test]
    fn subsystem_round_trips_through_str() {
        for s in Subsystem::ALL {
            assert_eq!(s.as_str().parse::<Subsystem>().unwrap(), s);
        }
        assert!("bogus".parse::<Subsystem>().is_err());
    }
}
