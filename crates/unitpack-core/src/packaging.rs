//! Packaging kinds of dependencies and of the unit being packaged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;

/// How a dependency is packaged, as reported by the project model.
///
/// Accepts both the plain names (`shared-library`) and the `jbi-` prefixed
/// packaging names found in project metadata (`jbi-shared-library`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackagingKind {
    Jar,
    Bundle,
    SharedLibrary,
    Component,
    ServiceAssembly,
    ServiceUnit,
    Other(String),
}

impl PackagingKind {
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix("jbi-").unwrap_or(s) {
            "jar" => PackagingKind::Jar,
            "bundle" => PackagingKind::Bundle,
            "shared-library" => PackagingKind::SharedLibrary,
            "component" => PackagingKind::Component,
            "service-assembly" => PackagingKind::ServiceAssembly,
            "service-unit" => PackagingKind::ServiceUnit,
            _ => PackagingKind::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PackagingKind::Jar => "jar",
            PackagingKind::Bundle => "bundle",
            PackagingKind::SharedLibrary => "shared-library",
            PackagingKind::Component => "component",
            PackagingKind::ServiceAssembly => "service-assembly",
            PackagingKind::ServiceUnit => "service-unit",
            PackagingKind::Other(s) => s,
        }
    }

    /// Plain class libraries that are copied into a consumer's `lib/` directory.
    pub fn is_library(&self) -> bool {
        matches!(self, PackagingKind::Jar | PackagingKind::Bundle)
    }
}

impl From<String> for PackagingKind {
    fn from(s: String) -> Self {
        PackagingKind::parse(&s)
    }
}

impl From<PackagingKind> for String {
    fn from(kind: PackagingKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for PackagingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of installable unit being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    #[default]
    Component,
    ServiceUnit,
    SharedLibrary,
    ServiceAssembly,
}

impl UnitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::Component => "component",
            UnitKind::ServiceUnit => "service-unit",
            UnitKind::SharedLibrary => "shared-library",
            UnitKind::ServiceAssembly => "service-assembly",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "component" => Ok(UnitKind::Component),
            "service-unit" => Ok(UnitKind::ServiceUnit),
            "shared-library" => Ok(UnitKind::SharedLibrary),
            "service-assembly" => Ok(UnitKind::ServiceAssembly),
            other => Err(format!(
                "unknown unit kind '{other}' (expected component, service-unit, shared-library or service-assembly)"
            )),
        }
    }
}

/// An artifact from the unit's flat dependency list, considered for bundling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingCandidate {
    pub artifact: Artifact,
    pub kind: PackagingKind,
}

impl PackagingCandidate {
    pub fn new(artifact: Artifact, kind: PackagingKind) -> Self {
        Self { artifact, kind }
    }
}
