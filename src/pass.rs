//! The documentation association pass.
//!
//! One depth-first traversal over the AST. Every eligible declaration gets
//! exactly one application of the rule for its kind: a direct index query,
//! or a copy from a related declaration (default-value overload origin,
//! template pattern, concrete class of an interface mirror, cached accessor).

use crate::ast::{
    Ast, ClassKind, DeclId, DeclKind, DeclTag, FunctionOrigin, ParameterKind, SynthKind,
    TranslationUnit, UnitId,
};
use crate::error::PassDiagnostic;
use crate::index::DocIndex;
use crate::session::{DocSession, DocState};
use crate::visit::{walk_ast, walk_context, walk_unit, Visitor};
use log::{debug, info, trace, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassOutcome {
    Applied,
    /// The corpus was unavailable and nothing was traversed.
    Inapplicable,
}

pub struct DocumentationPass<'a, I: DocIndex + ?Sized> {
    index: &'a I,
}

impl<'a, I: DocIndex + ?Sized> DocumentationPass<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Attaches documentation to every eligible declaration of `ast`.
    ///
    /// Comments are written in place; texts resolved for functions and
    /// property accessors stay in the session cache for later passes.
    pub fn run(&self, ast: &mut Ast, session: &mut DocSession) -> PassOutcome {
        if !self.index.is_available() {
            info!("Documentation corpus unavailable, skipping documentation pass");
            return PassOutcome::Inapplicable;
        }

        let before = session.stats();
        let mut associator = Associator {
            index: self.index,
            session,
        };
        walk_ast(&mut associator, ast);

        let after = associator.session.stats();
        info!(
            "Documentation pass: {} documented, {} without documentation, {} skipped ({} index queries, {} cache hits)",
            after.resolved - before.resolved,
            after.resolved_empty - before.resolved_empty,
            after.skipped - before.skipped,
            after.index_queries - before.index_queries,
            after.cache_hits - before.cache_hits,
        );
        PassOutcome::Applied
    }
}

fn unit_is_eligible(unit: &TranslationUnit) -> bool {
    unit.is_generated && !unit.is_system_header
}

fn is_eligible(ast: &Ast, id: DeclId) -> bool {
    let decl = ast.get(id);
    if !decl.is_generated || ast.unit_of(id).is_system_header {
        return false;
    }
    match &decl.kind {
        DeclKind::Class(class) => !class.is_incomplete,
        DeclKind::Function(function) => !function.is_implicit,
        _ => true,
    }
}

struct Associator<'a, 's, I: DocIndex + ?Sized> {
    index: &'a I,
    session: &'s mut DocSession,
}

impl<I: DocIndex + ?Sized> Visitor for Associator<'_, '_, I> {
    fn visit_unit(&mut self, ast: &mut Ast, unit: UnitId) -> bool {
        if !unit_is_eligible(ast.unit(unit)) {
            trace!("Skipping translation unit {}", ast.unit(unit).file_name);
            return false;
        }
        walk_unit(self, ast, unit);
        true
    }

    fn visit_namespace(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        if !is_eligible(ast, id) {
            return false;
        }
        walk_context(self, ast, id);
        true
    }

    fn visit_class(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        if self.resolve(ast, id) == DocState::Skipped {
            return false;
        }
        walk_context(self, ast, id);
        true
    }

    fn visit_enum(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        self.resolve(ast, id) != DocState::Skipped
    }

    fn visit_function(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        self.resolve(ast, id) != DocState::Skipped
    }

    fn visit_property(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        self.resolve(ast, id) != DocState::Skipped
    }

    // Does not descend into the variable's type.
    fn visit_variable(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        self.resolve(ast, id) != DocState::Skipped
    }

    fn visit_event(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        self.resolve(ast, id) != DocState::Skipped
    }
}

impl<I: DocIndex + ?Sized> Associator<'_, '_, I> {
    /// Applies the rule for `id`'s kind unless it already ran.
    fn resolve(&mut self, ast: &mut Ast, id: DeclId) -> DocState {
        let state = self.session.state(id);
        if state != DocState::Unvisited {
            return state;
        }
        if self.session.is_resolving(id) {
            self.report_cycle(ast, id);
            return DocState::ResolvedEmpty;
        }
        if !is_eligible(ast, id) {
            trace!("Skipping {}", ast.get(id).unique_id);
            self.session.mark(id, DocState::Skipped);
            return DocState::Skipped;
        }

        self.session.push_resolving(id);
        let text = match ast.get(id).kind.tag() {
            DeclTag::Class => self.class_doc(ast, id),
            DeclTag::Enumeration => {
                let name = ast.qualified_name(id);
                self.query(|index| index.lookup_enum(&name))
            }
            DeclTag::Function => self.function_doc(ast, id),
            DeclTag::Property => self.property_doc(ast, id),
            DeclTag::Variable => {
                let name = ast.qualified_name(id);
                self.query(|index| index.lookup_variable(&name))
            }
            DeclTag::Event => self.event_doc(ast, id),
            DeclTag::Namespace => None,
        };
        self.session.pop_resolving();
        self.annotate(ast, id, text)
    }

    fn annotate(&mut self, ast: &mut Ast, id: DeclId, text: Option<String>) -> DocState {
        let state = if text.is_some() {
            DocState::Resolved
        } else {
            DocState::ResolvedEmpty
        };
        debug!(
            "{} {}: {}",
            ast.get(id).kind.tag(),
            ast.qualified_name(id),
            if text.is_some() { "documented" } else { "no documentation" }
        );
        if let Some(text) = text {
            ast.get_mut(id).comment = Some(text);
        }
        self.session.mark(id, state);
        state
    }

    /// Gives a mirror member the text of its concrete counterpart.
    fn adopt(&mut self, ast: &mut Ast, id: DeclId, text: Option<String>) {
        if self.session.state(id) != DocState::Unvisited || self.session.is_resolving(id) {
            return;
        }
        if !is_eligible(ast, id) {
            self.session.mark(id, DocState::Skipped);
            return;
        }
        self.annotate(ast, id, text);
    }

    fn query(&mut self, lookup: impl FnOnce(&I) -> Option<String>) -> Option<String> {
        self.session.stats_mut().index_queries += 1;
        lookup(self.index)
    }

    fn cached(&mut self, unique_id: &str) -> Option<String> {
        let text = self.session.cache().get(unique_id).map(str::to_owned)?;
        trace!("Documentation cache hit for {unique_id}");
        self.session.stats_mut().cache_hits += 1;
        Some(text)
    }

    fn borrow_from(&mut self, ast: &mut Ast, source: DeclId) -> Option<String> {
        if self.resolve(ast, source) == DocState::Skipped {
            return None;
        }
        ast.comment(source).map(str::to_owned)
    }

    fn report_cycle(&mut self, ast: &Ast, id: DeclId) {
        let mut chain: Vec<&str> = self
            .session
            .resolving_chain()
            .iter()
            .skip_while(|d| **d != id)
            .map(|d| ast.get(*d).unique_id.as_str())
            .collect();
        chain.push(ast.get(id).unique_id.as_str());
        let chain = chain.join(" -> ");
        warn!("Documentation resolution cycle: {chain}");
        self.session.report(PassDiagnostic::ResolutionCycle { chain });
    }

    fn class_doc(&mut self, ast: &mut Ast, id: DeclId) -> Option<String> {
        let kind = ast.get(id).as_class()?.kind;
        match kind {
            ClassKind::Concrete => {
                let name = ast.qualified_name(id);
                self.query(|index| index.lookup_type(&name))
            }
            ClassKind::InterfaceMirror { concrete } => self.mirror_doc(ast, id, concrete),
        }
    }

    /// Copies the concrete class's documentation onto its interface mirror:
    /// methods are paired by source identity, properties by name.
    fn mirror_doc(&mut self, ast: &mut Ast, mirror: DeclId, concrete: DeclId) -> Option<String> {
        let concrete_is_live = self.resolve(ast, concrete) != DocState::Skipped;

        let (methods, properties) = match ast.get(concrete).as_class() {
            Some(class) => (class.methods.clone(), class.properties.clone()),
            None => return ast.comment(concrete).map(str::to_owned),
        };
        let (mirror_methods, mirror_properties) = match ast.get(mirror).as_class() {
            Some(class) => (class.methods.clone(), class.properties.clone()),
            None => (Vec::new(), Vec::new()),
        };

        for method in methods {
            if concrete_is_live {
                self.resolve(ast, method);
            }
            let Some(source) = ast.get(method).source else {
                continue;
            };
            let counterpart = mirror_methods
                .iter()
                .copied()
                .find(|m| ast.get(*m).source == Some(source));
            if let Some(counterpart) = counterpart {
                let text = ast.comment(method).map(str::to_owned);
                self.adopt(ast, counterpart, text);
            }
        }

        for property in properties {
            if concrete_is_live {
                self.resolve(ast, property);
            }
            let name = &ast.get(property).name;
            let counterpart = mirror_properties
                .iter()
                .copied()
                .find(|p| ast.get(*p).name == *name);
            if let Some(counterpart) = counterpart {
                let text = ast.comment(property).map(str::to_owned);
                self.adopt(ast, counterpart, text);
            }
        }

        ast.comment(concrete).map(str::to_owned)
    }

    fn function_doc(&mut self, ast: &mut Ast, id: DeclId) -> Option<String> {
        let decl = ast.get(id);
        if let Some(existing) = &decl.comment {
            return Some(existing.clone());
        }
        let unique_id = decl.unique_id.clone();
        let origin = decl.as_function().map(|f| f.origin).unwrap_or_default();

        // Interface mirror members only ever borrow.
        if ast.is_interface_member(id) {
            return self.cached(&unique_id);
        }

        let text = match origin {
            FunctionOrigin::Synthesized {
                kind: SynthKind::DefaultValueOverload,
                origin,
            } => self.borrow_from(ast, origin),
            FunctionOrigin::Synthesized { .. } => None,
            FunctionOrigin::Instantiation { pattern } => {
                let text = self.borrow_from(ast, pattern);
                rename_parameters(ast, id, pattern);
                text
            }
            FunctionOrigin::Declared => match self.cached(&unique_id) {
                Some(text) => Some(text),
                None => {
                    let name = ast.qualified_name(id);
                    let (parameter_types, access) = ast
                        .get(id)
                        .as_function()
                        .map(|f| (f.signature_types(), f.access))
                        .unwrap_or_default();
                    self.query(|index| index.lookup_function(&name, &parameter_types, access))
                }
            },
        };

        if let Some(text) = &text {
            self.session.cache_mut().insert(unique_id, text.clone());
        }
        text
    }

    fn property_doc(&mut self, ast: &mut Ast, id: DeclId) -> Option<String> {
        let property = ast.get(id).as_property().cloned().unwrap_or_default();
        if property.is_synthesized {
            return None;
        }
        let getter_key = property.getter.map(|g| ast.get(g).unique_id.clone());
        let setter_key = property.setter.map(|s| ast.get(s).unique_id.clone());

        // Getter first: its key is also the one written back below.
        let mut text = getter_key.as_deref().and_then(|key| self.cached(key));
        if text.is_none() {
            text = setter_key.as_deref().and_then(|key| self.cached(key));
        }
        if text.is_none() && !ast.is_interface_member(id) {
            let name = ast.qualified_name(id);
            text = self.query(|index| index.lookup_property(&name));
        }

        if let (Some(text), Some(key)) = (&text, getter_key.or(setter_key)) {
            self.session.cache_mut().insert(key, text.clone());
        }
        text
    }

    fn event_doc(&mut self, ast: &mut Ast, id: DeclId) -> Option<String> {
        let function = match &ast.get(id).kind {
            DeclKind::Event(event) => event.function,
            _ => None,
        }?;
        if !ast.get(function).is_generated {
            return None;
        }
        self.borrow_from(ast, function)
    }
}

/// Gives the regular parameters of an instantiation the names of the
/// pattern's regular parameters, by position.
fn rename_parameters(ast: &mut Ast, id: DeclId, pattern: DeclId) {
    let names: Vec<String> = match ast.get(pattern).as_function() {
        Some(pattern) => pattern
            .parameters
            .iter()
            .filter(|p| p.kind == ParameterKind::Regular)
            .map(|p| p.name.clone())
            .collect(),
        None => return,
    };
    let qualified_name = ast.qualified_name(id);
    let DeclKind::Function(function) = &mut ast.get_mut(id).kind else {
        return;
    };

    let regular_count = function
        .parameters
        .iter()
        .filter(|p| p.kind == ParameterKind::Regular)
        .count();
    if regular_count != names.len() {
        warn!(
            "{qualified_name} has {regular_count} parameters but its template pattern has {}",
            names.len()
        );
    }
    for (parameter, name) in function
        .parameters
        .iter_mut()
        .filter(|p| p.kind == ParameterKind::Regular)
        .zip(names)
    {
        parameter.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Declaration, FunctionDecl, Parameter, TranslationUnit};

    #[test]
    fn test_rename_parameters_keeps_extension_receiver() {
        let mut ast = Ast::new();
        let unit = ast.add_unit(TranslationUnit::new("qlist.h"));
        let pattern = ast.add(
            unit,
            None,
            Declaration::function("append", FunctionDecl::new(vec![Parameter::new("value", "const T &")])),
        );
        let instance = ast.add(
            unit,
            None,
            Declaration::function(
                "append",
                FunctionDecl::new(vec![
                    Parameter::extension("list", "QList<int>"),
                    Parameter::new("arg0", "const int &"),
                ])
                .with_origin(FunctionOrigin::Instantiation { pattern }),
            ),
        );

        rename_parameters(&mut ast, instance, pattern);

        let names: Vec<&str> = ast
            .get(instance)
            .as_function()
            .unwrap()
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["list", "value"]);
    }

    #[test]
    fn test_eligibility() {
        let mut ast = Ast::new();
        let unit = ast.add_unit(TranslationUnit::new("qglobal.h"));
        let system = ast.add_unit(TranslationUnit::new("stdlib.h").system_header());
        let generated = ast.add(unit, None, Declaration::enumeration("Generated"));
        let ignored = ast.add(unit, None, Declaration::enumeration("Ignored").not_generated());
        let from_system = ast.add(system, None, Declaration::enumeration("div_t"));
        let implicit = ast.add(unit, None, Declaration::function("operator=", FunctionDecl::default().implicit()));

        assert!(is_eligible(&ast, generated));
        assert!(!is_eligible(&ast, ignored));
        assert!(!is_eligible(&ast, from_system));
        assert!(!is_eligible(&ast, implicit));
    }
}
