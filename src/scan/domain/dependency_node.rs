use serde::Serialize;
use std::fmt;

/// Stable node key: `"<registry>:<name>@<version>"`
pub type NodeId = String;

/// Package registry a dependency was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Registry {
    Npm,
    PyPI,
}

impl Registry {
    /// Prefix used in node ids
    pub fn as_str(&self) -> &'static str {
        match self {
            Registry::Npm => "npm",
            Registry::PyPI => "pypi",
        }
    }

    /// Ecosystem string understood by the OSV batch API
    pub fn osv_ecosystem(&self) -> &'static str {
        match self {
            Registry::Npm => "npm",
            Registry::PyPI => "PyPI",
        }
    }

    /// `SecurityAdvisoryEcosystem` enum value of the GitHub GraphQL API
    pub fn github_ecosystem(&self) -> &'static str {
        match self {
            Registry::Npm => "NPM",
            Registry::PyPI => "PIP",
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the scanned project declares a dependency itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Direct,
    Transitive,
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyType::Direct => write!(f, "direct"),
            DependencyType::Transitive => write!(f, "transitive"),
        }
    }
}

/// A single package/version in the dependency graph.
///
/// `version` is opaque: lockfiles give an exact version, plain manifests may
/// give a range expression such as `>=2.0` or `^4.17.0`. Child ids in
/// `dependencies` may point at nodes that are not part of the graph (an
/// optional dependency that was never installed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    id: NodeId,
    name: String,
    version: String,
    registry: Registry,
    dependency_type: DependencyType,
    dependencies: Vec<NodeId>,
}

impl DependencyNode {
    pub fn new(
        registry: Registry,
        name: impl Into<String>,
        version: impl Into<String>,
        dependency_type: DependencyType,
    ) -> Self {
        let name = name.into();
        let version = version.into();
        Self {
            id: Self::make_id(registry, &name, &version),
            name,
            version,
            registry,
            dependency_type,
            dependencies: Vec::new(),
        }
    }

    /// Builds the node id for a `(registry, name, version)` triple
    pub fn make_id(registry: Registry, name: &str, version: &str) -> NodeId {
        format!("{}:{}@{}", registry.as_str(), name, version)
    }

    /// Replaces the child list, dropping repeated ids while keeping first-seen order
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = NodeId>) -> Self {
        self.dependencies.clear();
        for dep in dependencies {
            if !self.dependencies.contains(&dep) {
                self.dependencies.push(dep);
            }
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn registry(&self) -> Registry {
        self.registry
    }

    pub fn dependency_type(&self) -> DependencyType {
        self.dependency_type
    }

    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    pub fn is_direct(&self) -> bool {
        self.dependency_type == DependencyType::Direct
    }
}
