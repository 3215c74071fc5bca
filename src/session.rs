use crate::ast::DeclId;
use crate::error::PassDiagnostic;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Where a declaration stands in the association pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocState {
    #[default]
    Unvisited,
    /// Ineligible; nothing was queried or written for it.
    Skipped,
    Resolved,
    ResolvedEmpty,
}

/// Documentation text keyed by unique per-overload identifier.
///
/// Append-only: the first text written for a key stays.
#[derive(Debug, Default, Clone)]
pub struct CommentCache {
    entries: HashMap<String, String>,
}

impl CommentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, unique_id: &str) -> Option<&str> {
        self.entries.get(unique_id).map(String::as_str)
    }

    pub fn contains(&self, unique_id: &str) -> bool {
        self.entries.contains_key(unique_id)
    }

    /// Returns `false` if `unique_id` already had an entry.
    pub fn insert(&mut self, unique_id: String, text: String) -> bool {
        if let Some(existing) = self.entries.get(&unique_id) {
            if *existing != text {
                debug!("Keeping cached documentation for {unique_id}");
            }
            return false;
        }
        self.entries.insert(unique_id, text);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub index_queries: usize,
    pub cache_hits: usize,
    pub resolved: usize,
    pub resolved_empty: usize,
    pub skipped: usize,
}

/// Everything one documentation run shares across declarations.
///
/// A session belongs to a single [`Ast`](crate::ast::Ast): states are keyed
/// by `DeclId`. Call [`DocSession::reset`] (or make a new session) before
/// running against an unrelated tree. Running the pass again with the same
/// session and tree re-queries nothing.
#[derive(Debug, Default, Clone)]
pub struct DocSession {
    cache: CommentCache,
    states: HashMap<DeclId, DocState>,
    resolving: Vec<DeclId>,
    stats: PassStats,
    diagnostics: Vec<PassDiagnostic>,
}

impl DocSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn cache(&self) -> &CommentCache {
        &self.cache
    }

    pub fn state(&self, id: DeclId) -> DocState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    pub fn stats(&self) -> PassStats {
        self.stats
    }

    pub fn diagnostics(&self) -> &[PassDiagnostic] {
        &self.diagnostics
    }

    pub(crate) fn cache_mut(&mut self) -> &mut CommentCache {
        &mut self.cache
    }

    pub(crate) fn stats_mut(&mut self) -> &mut PassStats {
        &mut self.stats
    }

    pub(crate) fn mark(&mut self, id: DeclId, state: DocState) {
        match state {
            DocState::Skipped => self.stats.skipped += 1,
            DocState::Resolved => self.stats.resolved += 1,
            DocState::ResolvedEmpty => self.stats.resolved_empty += 1,
            DocState::Unvisited => return,
        }
        self.states.insert(id, state);
    }

    pub(crate) fn is_resolving(&self, id: DeclId) -> bool {
        self.resolving.contains(&id)
    }

    pub(crate) fn resolving_chain(&self) -> &[DeclId] {
        &self.resolving
    }

    pub(crate) fn push_resolving(&mut self, id: DeclId) {
        self.resolving.push(id);
    }

    pub(crate) fn pop_resolving(&mut self) {
        self.resolving.pop();
    }

    pub(crate) fn report(&mut self, diagnostic: PassDiagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
