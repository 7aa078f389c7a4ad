//! Cross-document command index.
//!
//! Every rendered command registers itself here so index pages and
//! cross-references can be produced after all documents are processed. The
//! built-in [`InMemoryIndex`] is suitable for single-process builds; hosts
//! with their own persistence implement [`CommandIndex`] instead.

use std::collections::BTreeMap;

use crate::anchor::target_to_anchor_id;
use crate::error::Result;

/// One indexed command occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Full spaced command path, e.g. `tool sub`.
    pub command: String,
    pub description: String,
    /// Document the command was rendered into.
    pub document: String,
    /// Anchor id of the command's section within that document.
    pub anchor: String,
}

/// Sink for rendered commands. `groups` carries the directive's index-groups
/// so group-partitioned indexes can be built.
pub trait CommandIndex {
    fn add_entry(&mut self, command: &str, description: &str, anchor: &str, groups: &[String]);

    /// Resolve an anchor id to `(document, command)` if any entry claims it.
    fn resolve(&self, anchor: &str) -> Option<(String, String)>;
}

/// In-memory index covering a single build.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    document: String,
    commands: Vec<IndexEntry>,
    /// Entries repeated per group; a command in two groups appears in both
    /// lists.
    by_group: BTreeMap<String, Vec<IndexEntry>>,
}

impl InMemoryIndex {
    pub fn new(document: impl Into<String>) -> Self {
        InMemoryIndex {
            document: document.into(),
            commands: Vec::new(),
            by_group: BTreeMap::new(),
        }
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.commands
    }

    /// All commands grouped by first letter, each bucket sorted by command.
    pub fn commands_index(&self) -> BTreeMap<char, Vec<IndexEntry>> {
        let mut buckets: BTreeMap<char, Vec<IndexEntry>> = BTreeMap::new();
        for entry in &self.commands {
            let letter = entry
                .command
                .chars()
                .next()
                .map(|ch| ch.to_ascii_lowercase())
                .unwrap_or('?');
            buckets.entry(letter).or_default().push(entry.clone());
        }
        for bucket in buckets.values_mut() {
            bucket.sort_by(|a, b| a.command.cmp(&b.command));
        }
        buckets
    }

    /// Commands partitioned by index group, sorted within each group.
    pub fn by_group_index(&self) -> BTreeMap<String, Vec<IndexEntry>> {
        let mut out = self.by_group.clone();
        for bucket in out.values_mut() {
            bucket.sort_by(|a, b| a.command.cmp(&b.command));
        }
        out
    }

    /// Resolve a free-form cross-reference target. `Ok(None)` means the
    /// target is well-formed but unknown; an empty target is an error.
    pub fn resolve_target(&self, target: &str) -> Result<Option<(String, String)>> {
        let anchor = target_to_anchor_id(target)?;
        Ok(self.resolve(&anchor))
    }
}

impl CommandIndex for InMemoryIndex {
    fn add_entry(&mut self, command: &str, description: &str, anchor: &str, groups: &[String]) {
        let entry = IndexEntry {
            command: command.to_string(),
            description: description.to_string(),
            document: self.document.clone(),
            anchor: anchor.to_string(),
        };
        for group in groups {
            self.by_group
                .entry(group.clone())
                .or_default()
                .push(entry.clone());
        }
        self.commands.push(entry);
    }

    fn resolve(&self, anchor: &str) -> Option<(String, String)> {
        self.commands
            .iter()
            .find(|entry| entry.anchor == anchor)
            .map(|entry| (entry.document.clone(), entry.command.clone()))
    }
}
