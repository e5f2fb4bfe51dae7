use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maven-compatible dependency scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Test,
    Provided,
    System,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::Provided => "provided",
            Scope::System => "system",
        }
    }

    /// Whether artifacts in this scope end up on the runtime classpath,
    /// and are therefore eligible for bundling.
    pub fn is_runtime_classpath(self) -> bool {
        matches!(self, Scope::Compile | Scope::Runtime)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compile" => Ok(Scope::Compile),
            "runtime" => Ok(Scope::Runtime),
            "test" => Ok(Scope::Test),
            "provided" => Ok(Scope::Provided),
            "system" => Ok(Scope::System),
            other => Err(format!("unknown scope '{other}'")),
        }
    }
}

fn default_type() -> String {
    "jar".to_string()
}

/// A dependency artifact as reported by the resolver.
///
/// `version` and `scope` are the only fields the resolver rewrites during a
/// run (mediation, dependency management); everything that makes up the
/// [`ConflictId`] stays fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(rename = "type", default = "default_type")]
    pub artifact_type: String,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub optional: bool,
}

impl Artifact {
    /// A compile-scoped, non-optional `jar` artifact.
    pub fn new(group: &str, name: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            classifier: None,
            artifact_type: default_type(),
            scope: Scope::Compile,
            optional: false,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_type(mut self, artifact_type: &str) -> Self {
        self.artifact_type = artifact_type.to_string();
        self
    }

    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.classifier = Some(classifier.to_string());
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Version-independent identity used to merge declarations of the same dependency.
    pub fn conflict_id(&self) -> ConflictId {
        ConflictId {
            group: self.group.clone(),
            name: self.name.clone(),
            artifact_type: self.artifact_type.clone(),
            classifier: self.classifier.clone(),
        }
    }

    /// Full coordinate used for exact-match set membership.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            group: self.group.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            artifact_type: self.artifact_type.clone(),
            classifier: self.classifier.clone(),
        }
    }

    /// `true` when both artifacts name the same `group:name:type`, ignoring
    /// version and classifier.
    pub fn same_package(&self, other: &Artifact) -> bool {
        self.group == other.group
            && self.name == other.name
            && self.artifact_type == other.artifact_type
    }

    /// File name the artifact is stored under: `name-version[-classifier].type`.
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(c) => format!("{}-{}-{}.{}", self.name, self.version, c, self.artifact_type),
            None => format!("{}-{}.{}", self.name, self.version, self.artifact_type),
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.artifact_type)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        write!(f, ":{}:{}", self.version, self.scope)
    }
}

/// `group:name:type[:classifier]`, the identity of a dependency edge ignoring version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConflictId {
    pub group: String,
    pub name: String,
    pub artifact_type: String,
    pub classifier: Option<String>,
}

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.artifact_type)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

/// `group:name:type[:classifier]:version`, an exact artifact coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub group: String,
    pub name: String,
    pub version: String,
    pub artifact_type: String,
    pub classifier: Option<String>,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.artifact_type)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        write!(f, ":{}", self.version)
    }
}

