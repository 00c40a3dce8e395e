use crate::ports::outbound::ProgressReporter;
use crate::scan::domain::{DependencyGraph, DependencyNode, DependencyType, NodeId, Registry};
use crate::shared::Result;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Descriptor protocols that point at local sources rather than registry packages
const LOCAL_PROTOCOLS: [&str; 3] = ["workspace:", "link:", "portal:"];

/// One physical entry of a yarn lockfile
#[derive(Debug, Default)]
struct YarnEntry {
    descriptors: Vec<String>,
    name: String,
    version: Option<String>,
    requirements: Vec<(String, String)>,
}

/// Parser for `yarn.lock`, both classic (v1) and berry (v2+)
///
/// Classic entries look like
///
/// ```text
/// "@babel/code-frame@^7.0.0", "@babel/code-frame@^7.22.13":
///   version "7.22.13"
///   dependencies:
///     "@babel/highlight" "^7.22.13"
/// ```
///
/// while berry uses YAML-ish `key: value` pairs and a `__metadata:` block.
/// The lockfile does not record which packages the project itself declares,
/// so an entry is treated as direct when no other entry depends on it.
pub struct YarnLockParser;

impl YarnLockParser {
    pub fn parse(
        path: &Path,
        content: &str,
        reporter: &dyn ProgressReporter,
    ) -> Result<DependencyGraph> {
        let (entries, berry) = read_entries(content);

        let mut resolved: Vec<(&YarnEntry, NodeId, &str)> = Vec::new();
        for entry in &entries {
            match entry.version.as_deref() {
                Some(version) => resolved.push((
                    entry,
                    DependencyNode::make_id(Registry::Npm, &entry.name, version),
                    version,
                )),
                None => reporter.report_error(&format!(
                    "⚠️  Skipping {} in {}: entry has no version",
                    entry.descriptors.join(", "),
                    path.display()
                )),
            }
        }

        let mut by_descriptor: HashMap<&str, &str> = HashMap::new();
        let mut by_name: HashMap<&str, Vec<&str>> = HashMap::new();
        for (entry, id, _) in &resolved {
            for descriptor in &entry.descriptors {
                by_descriptor.entry(descriptor.as_str()).or_insert(id.as_str());
            }
            let ids = by_name.entry(entry.name.as_str()).or_default();
            if !ids.contains(&id.as_str()) {
                ids.push(id.as_str());
            }
        }

        let resolve = |name: &str, range: &str| -> Option<NodeId> {
            let mut candidates = Vec::with_capacity(2);
            if berry {
                candidates.push(format!("{}@npm:{}", name, range));
            }
            candidates.push(format!("{}@{}", name, range));

            candidates
                .iter()
                .find_map(|descriptor| by_descriptor.get(descriptor.as_str()))
                .or_else(|| match by_name.get(name) {
                    Some(ids) if ids.len() == 1 => ids.first(),
                    _ => None,
                })
                .map(|id| id.to_string())
        };

        let mut incoming: HashSet<NodeId> = HashSet::new();
        let mut children_of: Vec<Vec<NodeId>> = Vec::with_capacity(resolved.len());
        for (entry, id, _) in &resolved {
            let children: Vec<NodeId> = entry
                .requirements
                .iter()
                .filter_map(|(name, range)| resolve(name, range))
                .collect();
            incoming.extend(children.iter().filter(|child| *child != id).cloned());
            children_of.push(children);
        }

        let mut builder = DependencyGraph::builder();
        for ((entry, id, version), children) in resolved.iter().zip(children_of) {
            let dependency_type = if incoming.contains(id) {
                DependencyType::Transitive
            } else {
                DependencyType::Direct
            };
            builder.add_node(
                DependencyNode::new(Registry::Npm, entry.name.as_str(), *version, dependency_type)
                    .with_dependencies(children),
            );
            if dependency_type == DependencyType::Direct {
                builder.add_root(id.clone());
            }
        }

        Ok(builder.build())
    }
}

/// Splits the file into entries; the flag is true for berry lockfiles
fn read_entries(content: &str) -> (Vec<YarnEntry>, bool) {
    let mut entries = Vec::new();
    let mut berry = false;
    let mut current: Option<YarnEntry> = None;
    // (indent of the block key, whether its children are requirements)
    let mut block: Option<(usize, bool)> = None;

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let indent = raw.len() - raw.trim_start().len();

        if indent == 0 {
            entries.extend(current.take());
            block = None;

            let Some(header) = line.strip_suffix(':') else {
                continue;
            };
            if header.trim_matches('"') == "__metadata" {
                berry = true;
                continue;
            }
            current = entry_from_header(header);
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };

        if let Some((block_indent, collects)) = block {
            if indent > block_indent {
                if collects {
                    entry.requirements.extend(parse_requirement(line));
                }
                continue;
            }
            block = None;
        }

        let (key, value) = split_key_value(line);
        if value.is_empty() {
            block = Some((
                indent,
                matches!(key, "dependencies" | "optionalDependencies"),
            ));
        } else if key == "version" {
            entry.version = Some(value.to_string());
        }
    }
    entries.extend(current);

    (entries, berry)
}

fn entry_from_header(header: &str) -> Option<YarnEntry> {
    let descriptors: Vec<String> = header
        .split(',')
        .map(|d| d.trim().trim_matches('"').to_string())
        .filter(|d| !d.is_empty())
        .collect();

    let (name, range) = split_descriptor(descriptors.first()?)?;
    if LOCAL_PROTOCOLS.iter().any(|p| range.starts_with(p)) {
        return None;
    }

    Some(YarnEntry {
        name: name.to_string(),
        descriptors,
        ..Default::default()
    })
}

/// Splits `name@range`, keeping the leading `@` of scoped names
fn split_descriptor(descriptor: &str) -> Option<(&str, &str)> {
    let at = descriptor.get(1..)?.find('@')? + 1;
    Some((&descriptor[..at], &descriptor[at + 1..]))
}

/// Splits `version "1.0.0"` (classic) or `version: 1.0.0` (berry)
fn split_key_value(line: &str) -> (&str, &str) {
    let end = line
        .find(|c: char| c == ':' || c.is_whitespace())
        .unwrap_or(line.len());
    let value = line[end..].trim_start_matches(':').trim().trim_matches('"');
    (&line[..end], value)
}

/// Parses one line of a dependencies block into `(name, range)`
fn parse_requirement(line: &str) -> Option<(String, String)> {
    let (name, rest) = match line.strip_prefix('"') {
        Some(quoted) => {
            let close = quoted.find('"')?;
            (&quoted[..close], &quoted[close + 1..])
        }
        None => {
            let end = line.find(|c: char| c == ':' || c.is_whitespace())?;
            (&line[..end], &line[end..])
        }
    };
    let range = rest.trim_start_matches(':').trim().trim_matches('"');
    if name.is_empty() || range.is_empty() {
        return None;
    }
    Some((name.to_string(), range.to_string()))
}
