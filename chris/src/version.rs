//! iOS version parsing and restore method resolution

use std::cmp::Ordering;

use serde::{Serialize, Serializer};

/// A dotted iOS version such as `18.1.1`
///
/// Comparison pads the shorter version with zeros, so `18.1` and `18.1.0` are
/// equal. A version that failed to parse is `0`, which sorts below every real
/// release.
#[derive(Debug, Clone)]
pub struct IosVersion(Vec<u32>);

impl IosVersion {
    /// Parses a version string, falling back to `0` on any malformed input
    ///
    /// # Arguments
    /// * `s` - The version string as reported by lockdown (`ProductVersion`)
    pub fn parse(s: &str) -> Self {
        let parts: Result<Vec<u32>, _> = s.trim().split('.').map(str::parse).collect();
        match parts {
            Ok(parts) if !parts.is_empty() => Self(parts),
            _ => {
                tracing::debug!("Unable to parse iOS version {s:?}, treating as 0");
                Self(vec![0])
            }
        }
    }

    /// Builds a version from its components
    pub fn new(components: &[u32]) -> Self {
        if components.is_empty() {
            return Self(vec![0]);
        }
        Self(components.to_vec())
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// Whether this is the `0` placeholder for an unknown version
    pub fn is_unknown(&self) -> bool {
        self.0.iter().all(|c| *c == 0)
    }
}

impl PartialEq for IosVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IosVersion {}

impl PartialOrd for IosVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IosVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                o => return o,
            }
        }
        Ordering::Equal
    }
}

impl std::hash::Hash for IosVersion {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Trailing zeros must not affect the hash since they don't affect equality
        let end = self
            .0
            .iter()
            .rposition(|c| *c != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.0[..end].hash(state);
    }
}

impl std::str::FromStr for IosVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for IosVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join("."))
    }
}

impl Serialize for IosVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How payloads reach a device of a given iOS version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RestoreMethod {
    /// iOS 17.0 through 18.1.1
    SparseRestore,
    /// iOS 18.2 and later
    BookRestore,
    Unsupported,
}

impl RestoreMethod {
    /// Classifies a device version. Refusing an unsupported device is left to
    /// the caller.
    pub fn resolve(version: &IosVersion) -> Self {
        if *version >= IosVersion::new(&[18, 2]) {
            RestoreMethod::BookRestore
        } else if *version >= IosVersion::new(&[17, 0]) && *version <= IosVersion::new(&[18, 1, 1])
        {
            RestoreMethod::SparseRestore
        } else {
            RestoreMethod::Unsupported
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreMethod::SparseRestore => "SparseRestore",
            RestoreMethod::BookRestore => "BookRestore",
            RestoreMethod::Unsupported => "Unsupported",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, RestoreMethod::Unsupported)
    }
}

impl std::fmt::Display for RestoreMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
