use crate::ports::outbound::ProgressReporter;
use crate::scan::domain::{DependencyGraph, DependencyNode, DependencyType, Registry};
use crate::shared::error::ScanError;
use crate::shared::Result;
use serde_json::{Map, Value};
use std::path::Path;

/// Parser for `Pipfile.lock`
///
/// `default` holds the project's runtime packages (direct) and `develop`
/// its development packages (transitive unless already listed in
/// `default`). Pipenv locks a flat set, so there are no edges.
pub struct PipfileLockParser;

impl PipfileLockParser {
    pub fn parse(
        path: &Path,
        content: &str,
        reporter: &dyn ProgressReporter,
    ) -> Result<DependencyGraph> {
        let document: Value =
            serde_json::from_str(content).map_err(|e| ScanError::parse(path, e.to_string()))?;

        let default = document.get("default").and_then(Value::as_object);
        let develop = document.get("develop").and_then(Value::as_object);
        if default.is_none() && develop.is_none() {
            return Err(
                ScanError::parse(path, "neither \"default\" nor \"develop\" section found").into(),
            );
        }

        let mut builder = DependencyGraph::builder();
        let mut dev_roots = Vec::new();

        for (name, version) in pinned_entries(default, "default", reporter) {
            let node = DependencyNode::new(Registry::PyPI, name, version, DependencyType::Direct);
            let id = node.id().to_string();
            builder.add_node(node);
            builder.add_root(id);
        }

        for (name, version) in pinned_entries(develop, "develop", reporter) {
            let node =
                DependencyNode::new(Registry::PyPI, name, version, DependencyType::Transitive);
            let id = node.id().to_string();
            if builder.add_node(node) {
                dev_roots.push(id);
            }
        }

        for id in dev_roots {
            builder.add_root(id);
        }

        Ok(builder.build())
    }
}

/// `(name, version)` pairs of one section, with the `==` prefix removed
fn pinned_entries<'a>(
    section: Option<&'a Map<String, Value>>,
    section_name: &str,
    reporter: &dyn ProgressReporter,
) -> Vec<(&'a str, &'a str)> {
    let Some(section) = section else {
        return Vec::new();
    };

    section
        .iter()
        .filter_map(|(name, entry)| {
            match entry.get("version").and_then(Value::as_str) {
                Some(version) => Some((name.as_str(), version.trim_start_matches("=="))),
                None => {
                    reporter.report_error(&format!(
                        "⚠️  Skipping {} in {}: no pinned version (VCS or path dependency?)",
                        name, section_name
                    ));
                    None
                }
            }
        })
        .collect()
}
