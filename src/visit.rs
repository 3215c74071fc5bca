//! Depth-first traversal over an [`Ast`].
//!
//! Implement [`Visitor`] and override the hooks you care about; the default
//! hooks descend into namespaces, classes and the types of variables. The
//! `walk_*` functions are the default behaviour and can be called from an
//! override to keep descending.

use crate::ast::{Ast, DeclId, DeclKind, DeclTag, UnitId};

pub trait Visitor {
    /// Called before any declaration hook. Returning `false` prunes `id`.
    fn enter(&mut self, _ast: &mut Ast, _id: DeclId) -> bool {
        true
    }

    fn visit_unit(&mut self, ast: &mut Ast, unit: UnitId) -> bool {
        walk_unit(self, ast, unit);
        true
    }

    fn visit_namespace(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        walk_context(self, ast, id);
        true
    }

    fn visit_class(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        walk_context(self, ast, id);
        true
    }

    fn visit_enum(&mut self, _ast: &mut Ast, _id: DeclId) -> bool {
        true
    }

    fn visit_function(&mut self, _ast: &mut Ast, _id: DeclId) -> bool {
        true
    }

    fn visit_property(&mut self, _ast: &mut Ast, _id: DeclId) -> bool {
        true
    }

    fn visit_variable(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        walk_variable_type(self, ast, id);
        true
    }

    fn visit_event(&mut self, _ast: &mut Ast, _id: DeclId) -> bool {
        true
    }
}

pub fn walk_ast<V: Visitor + ?Sized>(visitor: &mut V, ast: &mut Ast) {
    for unit in ast.unit_ids() {
        visitor.visit_unit(ast, unit);
    }
}

pub fn walk_unit<V: Visitor + ?Sized>(visitor: &mut V, ast: &mut Ast, unit: UnitId) {
    let declarations = ast.unit(unit).declarations.clone();
    for id in declarations {
        walk_decl(visitor, ast, id);
    }
}

/// Dispatches `id` to the hook for its kind.
pub fn walk_decl<V: Visitor + ?Sized>(visitor: &mut V, ast: &mut Ast, id: DeclId) -> bool {
    if !visitor.enter(ast, id) {
        return false;
    }
    match ast.get(id).kind.tag() {
        DeclTag::Namespace => visitor.visit_namespace(ast, id),
        DeclTag::Class => visitor.visit_class(ast, id),
        DeclTag::Enumeration => visitor.visit_enum(ast, id),
        DeclTag::Function => visitor.visit_function(ast, id),
        DeclTag::Property => visitor.visit_property(ast, id),
        DeclTag::Variable => visitor.visit_variable(ast, id),
        DeclTag::Event => visitor.visit_event(ast, id),
    }
}

pub fn walk_context<V: Visitor + ?Sized>(visitor: &mut V, ast: &mut Ast, id: DeclId) {
    for child in ast.children(id) {
        walk_decl(visitor, ast, child);
    }
}

/// Visits the declaration a variable's type refers to.
///
/// There is no visited set here: a visitor that relies on this descent must
/// guard against re-entry in [`Visitor::enter`].
pub fn walk_variable_type<V: Visitor + ?Sized>(visitor: &mut V, ast: &mut Ast, id: DeclId) {
    let target = match &ast.get(id).kind {
        DeclKind::Variable(variable) => variable.type_ref.decl,
        _ => None,
    };
    if let Some(target) = target {
        walk_decl(visitor, ast, target);
    }
}
