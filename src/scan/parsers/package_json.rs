use crate::ports::outbound::ProgressReporter;
use crate::scan::domain::{DependencyGraph, DependencyNode, DependencyType, Registry};
use crate::shared::error::ScanError;
use crate::shared::Result;
use serde_json::Value;
use std::path::Path;

/// Parser for a plain `package.json` manifest
///
/// A manifest has no resolution data: every declared dependency becomes a
/// direct root whose version is the declared range, with no edges.
pub struct PackageJsonParser;

impl PackageJsonParser {
    pub fn parse(
        path: &Path,
        content: &str,
        reporter: &dyn ProgressReporter,
    ) -> Result<DependencyGraph> {
        let manifest: Value =
            serde_json::from_str(content).map_err(|e| ScanError::parse(path, e.to_string()))?;
        if !manifest.is_object() {
            return Err(ScanError::parse(path, "manifest is not a JSON object").into());
        }

        let mut builder = DependencyGraph::builder();

        for section in ["dependencies", "devDependencies"] {
            let Some(declared) = manifest.get(section).and_then(Value::as_object) else {
                continue;
            };
            for (name, range) in declared {
                let Some(range) = range.as_str() else {
                    reporter.report_error(&format!(
                        "⚠️  Skipping {} in {}: version range is not a string",
                        name, section
                    ));
                    continue;
                };
                let node =
                    DependencyNode::new(Registry::Npm, name.as_str(), range, DependencyType::Direct);
                let id = node.id().to_string();
                builder.add_node(node);
                builder.add_root(id);
            }
        }

        Ok(builder.build())
    }
}
