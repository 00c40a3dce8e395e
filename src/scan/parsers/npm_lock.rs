use crate::ports::outbound::ProgressReporter;
use crate::scan::domain::{DependencyGraph, DependencyNode, DependencyType, NodeId, Registry};
use crate::shared::error::ScanError;
use crate::shared::Result;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

type Packages = Map<String, Value>;

const NODE_MODULES: &str = "node_modules/";

/// Every field of a lockfile entry that names required packages
const REQUIREMENT_FIELDS: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Fields of the root entry that make a package direct
const DIRECT_FIELDS: [&str; 2] = ["dependencies", "devDependencies"];

/// Parser for `package-lock.json` / `npm-shrinkwrap.json` (lockfileVersion 2 and 3)
///
/// The lockfile's `packages` object maps installation paths such as
/// `node_modules/a/node_modules/b` to entries. Edges are resolved the way
/// node resolves `require()`: the nearest `node_modules` directory walking
/// up from the requirer wins.
pub struct NpmLockParser;

impl NpmLockParser {
    pub fn parse(
        path: &Path,
        content: &str,
        reporter: &dyn ProgressReporter,
    ) -> Result<DependencyGraph> {
        let document: Value =
            serde_json::from_str(content).map_err(|e| ScanError::parse(path, e.to_string()))?;

        let packages = document
            .get("packages")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                ScanError::parse(
                    path,
                    "missing \"packages\" object (lockfileVersion 1 is not supported, run `npm install` with npm 7+ to upgrade)",
                )
            })?;

        let direct_names = packages
            .get("")
            .map(|root| declared_names(root, &DIRECT_FIELDS))
            .unwrap_or_default();
        let direct_set: HashSet<&str> = direct_names.iter().copied().collect();

        let mut builder = DependencyGraph::builder();

        for (install_path, entry) in packages {
            if install_path.is_empty() || is_link(entry) {
                continue;
            }

            let Some(name) = package_name(install_path, entry) else {
                continue;
            };

            let Some(version) = entry.get("version").and_then(Value::as_str) else {
                reporter.report_error(&format!(
                    "⚠️  Skipping {} in {}: entry has no version",
                    install_path,
                    path.display()
                ));
                continue;
            };

            let id = DependencyNode::make_id(Registry::Npm, name, version);
            if builder.contains(&id) {
                // Hoisting places one logical package at several paths
                continue;
            }

            let children: Vec<NodeId> = declared_names(entry, &REQUIREMENT_FIELDS)
                .into_iter()
                .filter_map(|dep| resolve(packages, install_path, dep))
                .collect();

            let dependency_type = if direct_set.contains(name) {
                DependencyType::Direct
            } else {
                DependencyType::Transitive
            };

            builder.add_node(
                DependencyNode::new(Registry::Npm, name, version, dependency_type)
                    .with_dependencies(children),
            );
        }

        for name in direct_names {
            if let Some(id) = resolve(packages, "", name) {
                if builder.contains(&id) {
                    builder.add_root(id);
                }
            }
        }

        Ok(builder.build())
    }
}

/// Package name from the last `node_modules/` segment of an install path
///
/// Scoped names (`@scope/name`) stay whole. Workspace folders outside
/// `node_modules` fall back to the entry's own `name` field.
fn package_name<'a>(install_path: &'a str, entry: &'a Value) -> Option<&'a str> {
    match install_path.rfind(NODE_MODULES) {
        Some(idx) => Some(&install_path[idx + NODE_MODULES.len()..]),
        None => entry.get("name").and_then(Value::as_str),
    }
}

fn is_link(entry: &Value) -> bool {
    entry.get("link").and_then(Value::as_bool).unwrap_or(false)
}

/// Names listed in the given requirement maps, in declaration order, without repeats
fn declared_names<'a>(entry: &'a Value, fields: &[&str]) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for field in fields {
        if let Some(map) = entry.get(*field).and_then(Value::as_object) {
            for name in map.keys() {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
    }
    names
}

fn child_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        format!("{}{}", NODE_MODULES, name)
    } else {
        format!("{}/{}{}", base, NODE_MODULES, name)
    }
}

/// Finds the installed copy of `dep` visible from `requirer_path`
///
/// Checks `<requirer>/node_modules/<dep>`, then the same under each ancestor
/// install path, then the top-level `node_modules/<dep>`. Returns `None`
/// when no copy is installed (e.g. a skipped optional dependency).
fn locate<'a>(packages: &'a Packages, requirer_path: &str, dep: &str) -> Option<&'a Value> {
    let mut base = requirer_path;
    loop {
        if let Some(entry) = packages.get(&child_path(base, dep)) {
            return Some(entry);
        }
        match base.rfind("/node_modules/") {
            Some(idx) => base = &base[..idx],
            None => break,
        }
    }
    packages.get(&child_path("", dep))
}

fn resolve(packages: &Packages, requirer_path: &str, dep: &str) -> Option<NodeId> {
    let version = locate(packages, requirer_path, dep)?
        .get("version")
        .and_then(Value::as_str)?;
    Some(DependencyNode::make_id(Registry::Npm, dep, version))
}
