//! Selection sets collected from a front end

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Catalog, ChrisError, IosVersion, TweakDefinition, TweakValue};

/// Tweak id to the value the user picked, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    values: IndexMap<String, TweakValue>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for a tweak, replacing any earlier value
    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<TweakValue>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<TweakValue>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn get(&self, id: &str) -> Option<&TweakValue> {
        self.values.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TweakValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reads a selection from a plist dictionary of `id => value`
    ///
    /// Entries that are not booleans, integers or strings are skipped.
    pub fn from_plist(dict: &plist::Dictionary) -> Self {
        let mut set = Self::new();
        for (id, value) in dict {
            match TweakValue::from_plist(value) {
                Some(v) => set.insert(id.clone(), v),
                None => debug!("Skipping non-scalar selection value for {id}"),
            }
        }
        set
    }
}

impl<K: Into<String>, V: Into<TweakValue>> FromIterator<(K, V)> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Validates one selection entry against the catalog and a device version
///
/// Unknown ids and tweaks the version can't use are dropped.
///
/// # Returns
/// The definition if the entry should be applied, `None` if it is dropped
///
/// # Errors
/// `ChrisError::TypeMismatch` if the value kind disagrees with the definition
pub(crate) fn check_entry<'a>(
    catalog: &'a Catalog,
    version: &IosVersion,
    id: &str,
    value: &TweakValue,
) -> Result<Option<&'a TweakDefinition>, ChrisError> {
    let Some(definition) = catalog.get(id) else {
        debug!("Dropping unknown tweak id {id}");
        return Ok(None);
    };

    if definition.kind() != value.kind() {
        return Err(ChrisError::TypeMismatch {
            id: id.to_string(),
            expected: definition.kind(),
            found: value.kind(),
        });
    }

    if !definition.is_eligible(version) {
        debug!(
            "Dropping {id}: {} does not cover iOS {version}",
            definition.ios_range()
        );
        return Ok(None);
    }

    Ok(Some(definition))
}
