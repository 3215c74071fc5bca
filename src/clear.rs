use crate::ast::{Ast, DeclId, UnitId};
use crate::visit::{walk_ast, walk_unit, Visitor};
use std::collections::HashSet;

/// Removes the comments carried over from the headers from every generated
/// declaration outside system headers, so that only documentation from the
/// corpus ends up on the bindings. Returns the number of comments removed.
///
/// Run this before the documentation pass, never after it.
pub fn clear_comments(ast: &mut Ast) -> usize {
    let mut clearer = CommentClearer::default();
    walk_ast(&mut clearer, ast);
    clearer.cleared
}

#[derive(Default)]
struct CommentClearer {
    visited: HashSet<DeclId>,
    cleared: usize,
}

impl Visitor for CommentClearer {
    fn enter(&mut self, ast: &mut Ast, id: DeclId) -> bool {
        if !self.visited.insert(id) {
            return false;
        }
        if ast.unit_of(id).is_system_header {
            return false;
        }
        let decl = ast.get_mut(id);
        if decl.is_generated && decl.comment.take().is_some() {
            self.cleared += 1;
        }
        true
    }

    fn visit_unit(&mut self, ast: &mut Ast, unit: UnitId) -> bool {
        if ast.unit(unit).is_system_header {
            return false;
        }
        walk_unit(self, ast, unit);
        true
    }
}
