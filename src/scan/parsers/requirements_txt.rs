use crate::ports::outbound::ProgressReporter;
use crate::scan::domain::{DependencyGraph, DependencyNode, DependencyType, Registry};
use crate::shared::Result;
use std::path::Path;

/// Parser for pip `requirements.txt` files
///
/// Only pinned requirements produce nodes: `name==1.0` stores the exact
/// version, `name>=1.0` and `name~=1.0` store the operator with the version
/// (left unresolved). Option lines (`-r`, `--hash`), URL requirements and
/// comments are ignored.
pub struct RequirementsTxtParser;

/// What a single requirement line resolved to
#[derive(Debug, PartialEq, Eq)]
enum Requirement<'a> {
    Pinned { name: &'a str, version: String },
    Unpinned { name: &'a str },
    Unsupported { name: &'a str, specifier: &'a str },
}

impl RequirementsTxtParser {
    pub fn parse(
        path: &Path,
        content: &str,
        reporter: &dyn ProgressReporter,
    ) -> Result<DependencyGraph> {
        let mut builder = DependencyGraph::builder();

        for (line_number, line) in logical_lines(content) {
            let Some(requirement) = parse_line(&line) else {
                continue;
            };

            match requirement {
                Requirement::Pinned { name, version } => {
                    let node =
                        DependencyNode::new(Registry::PyPI, name, version, DependencyType::Direct);
                    let id = node.id().to_string();
                    builder.add_node(node);
                    builder.add_root(id);
                }
                Requirement::Unpinned { name } => reporter.report_error(&format!(
                    "⚠️  Skipping {} ({}:{}): no version pinned",
                    name,
                    path.display(),
                    line_number
                )),
                Requirement::Unsupported { name, specifier } => {
                    reporter.report_error(&format!(
                        "⚠️  Skipping {} ({}:{}): unsupported version specifier '{}'",
                        name,
                        path.display(),
                        line_number,
                        specifier
                    ))
                }
            }
        }

        Ok(builder.build())
    }
}

/// Joins `\`-continued physical lines (pip-compile `--hash` blocks)
///
/// Each logical line comes with the 1-based number of its first physical line.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in content.lines().enumerate() {
        let (start, mut joined) = pending.take().unwrap_or((index + 1, String::new()));
        let trimmed = raw.trim_end();
        match trimmed.strip_suffix('\\') {
            Some(head) => {
                joined.push_str(head);
                joined.push(' ');
                pending = Some((start, joined));
            }
            None => {
                joined.push_str(trimmed);
                lines.push((start, joined));
            }
        }
    }
    // A continuation on the last line has nothing to join
    lines.extend(pending);
    lines
}

/// Returns `None` for lines that carry no requirement at all
fn parse_line(raw: &str) -> Option<Requirement<'_>> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }

    // pip only treats `#` after whitespace as a comment, so `#egg=` fragments stay.
    // Options such as `--hash=sha256:...` may follow the requirement.
    let line = cut_before_word(cut_before_word(line, "#"), "--");

    let line = line.split(';').next().unwrap_or_default().trim();
    if is_url_requirement(line) {
        return None;
    }

    let name_end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(line.len());
    let name = &line[..name_end];
    if name.is_empty() {
        return None;
    }

    let mut specifier = line[name_end..].trim_start();
    if specifier.starts_with('[') {
        specifier = match specifier.find(']') {
            Some(idx) => specifier[idx + 1..].trim_start(),
            None => return None,
        };
    }

    if specifier.is_empty() {
        return Some(Requirement::Unpinned { name });
    }

    let clauses: Vec<&str> = specifier.split(',').map(str::trim).collect();

    if let Some(version) = clauses
        .iter()
        .find(|c| c.starts_with("==") && !c.starts_with("==="))
        .map(|c| c[2..].trim())
    {
        return Some(Requirement::Pinned {
            name,
            version: version.to_string(),
        });
    }

    if let Some(clause) = clauses
        .iter()
        .find(|c| c.starts_with(">=") || c.starts_with("~="))
    {
        let (operator, version) = clause.split_at(2);
        return Some(Requirement::Pinned {
            name,
            version: format!("{}{}", operator, version.trim()),
        });
    }

    Some(Requirement::Unsupported { name, specifier })
}

/// Cuts `line` where `marker` starts a whitespace-separated word
fn cut_before_word<'a>(line: &'a str, marker: &str) -> &'a str {
    line.match_indices(marker)
        .map(|(idx, _)| idx)
        .find(|&idx| line[..idx].ends_with(char::is_whitespace))
        .map_or(line, |idx| line[..idx].trim_end())
}

/// VCS, archive and `name @ url` direct references
fn is_url_requirement(requirement: &str) -> bool {
    requirement.contains("://") || requirement.starts_with("git+") || requirement.contains('@')
}
