use crate::ast::Ast;
use crate::clear::clear_comments;
use crate::config::DocsConfig;
use crate::documentation::Documentation;
use crate::error::DocError;
use crate::index::DocIndex;
use crate::pass::{DocumentationPass, PassOutcome};
use crate::session::{DocSession, PassStats};
use serde::{Serialize, Serializer};

/// The result of a documentation run.
///
/// Holds the session so the comment cache stays available to passes that
/// run afterwards.
pub struct AssociationReport {
    pub outcome: PassOutcome,
    pub session: DocSession,
    pub loaded_modules: Vec<String>,
    pub cleared_comments: usize,
}

#[derive(Serialize)]
struct ReportSummary<'a> {
    outcome: PassOutcome,
    loaded_modules: &'a [String],
    cleared_comments: usize,
    stats: PassStats,
    cache_entries: usize,
    diagnostics: Vec<String>,
}

impl Serialize for AssociationReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ReportSummary {
            outcome: self.outcome,
            loaded_modules: &self.loaded_modules,
            cleared_comments: self.cleared_comments,
            stats: self.session.stats(),
            cache_entries: self.session.cache().len(),
            diagnostics: self.session.diagnostics().iter().map(ToString::to_string).collect(),
        }
        .serialize(serializer)
    }
}

impl AssociationReport {
    #[must_use]
    pub fn stats(&self) -> PassStats {
        self.session.stats()
    }

    /// Serializes the run summary into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the run summary into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }
}

/// Documents `ast` from the corpus described by `config`.
///
/// This is the primary entry point: it loads the module indexes, clears
/// header comments when configured to, and runs the association pass with a
/// fresh session. A missing documentation root is not an error; the report
/// then says the pass was inapplicable.
///
/// # Errors
///
/// Returns a `DocError` if an index file under the docs root cannot be read
/// or parsed.
pub fn document(ast: &mut Ast, config: &DocsConfig) -> Result<AssociationReport, DocError> {
    let documentation = Documentation::open(&config.docs_path, &config.modules)?;
    let cleared_comments = if config.clear_existing_comments {
        clear_comments(ast)
    } else {
        0
    };

    let mut session = DocSession::new();
    let outcome = document_with(ast, &documentation, &mut session);

    Ok(AssociationReport {
        outcome,
        session,
        loaded_modules: documentation.loaded_modules().to_vec(),
        cleared_comments,
    })
}

/// Runs the association pass against any index, reusing `session`.
pub fn document_with<I: DocIndex + ?Sized>(
    ast: &mut Ast,
    index: &I,
    session: &mut DocSession,
) -> PassOutcome {
    DocumentationPass::new(index).run(ast, session)
}
