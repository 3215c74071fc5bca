use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Stable handle to a declaration stored in an [`Ast`].
///
/// Ids are only meaningful for the `Ast` that handed them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId(usize);

impl DeclId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UnitId(usize);

/// Identity of the parsed header entity a declaration was produced from.
///
/// Clones of the same entity (a concrete method and its interface mirror)
/// share a `SourceId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    Public,
    Protected,
    Private,
}

impl Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessLevel::Public => write!(f, "public"),
            AccessLevel::Protected => write!(f, "protected"),
            AccessLevel::Private => write!(f, "private"),
        }
    }
}

// --- Translation units ---

#[derive(Debug, PartialEq, Clone)]
pub struct TranslationUnit {
    pub file_name: String,
    pub is_system_header: bool,
    pub is_generated: bool,
    pub declarations: Vec<DeclId>,
}

impl TranslationUnit {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            is_system_header: false,
            is_generated: true,
            declarations: Vec::new(),
        }
    }

    #[must_use]
    pub fn system_header(mut self) -> Self {
        self.is_system_header = true;
        self
    }

    #[must_use]
    pub fn not_generated(mut self) -> Self {
        self.is_generated = false;
        self
    }
}

// --- Declarations ---

#[derive(Debug, PartialEq, Clone)]
pub struct Declaration {
    pub name: String,
    /// Key distinguishing overloads and accessors that share a source-level
    /// name (the mangled symbol). Filled in by [`Ast::add`] when left empty.
    pub unique_id: String,
    pub is_generated: bool,
    pub source: Option<SourceId>,
    pub comment: Option<String>,
    pub kind: DeclKind,
    unit: Option<UnitId>,
    parent: Option<DeclId>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            unique_id: String::new(),
            is_generated: true,
            source: None,
            comment: None,
            kind,
            unit: None,
            parent: None,
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::Namespace(NamespaceDecl::default()))
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::Class(ClassDecl::default()))
    }

    pub fn interface_mirror(name: impl Into<String>, concrete: DeclId) -> Self {
        Self::new(
            name,
            DeclKind::Class(ClassDecl {
                kind: ClassKind::InterfaceMirror { concrete },
                ..ClassDecl::default()
            }),
        )
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::Enumeration(EnumDecl::default()))
    }

    pub fn function(name: impl Into<String>, function: FunctionDecl) -> Self {
        Self::new(name, DeclKind::Function(function))
    }

    pub fn property(name: impl Into<String>, property: PropertyDecl) -> Self {
        Self::new(name, DeclKind::Property(property))
    }

    pub fn variable(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self::new(name, DeclKind::Variable(VariableDecl { type_ref }))
    }

    pub fn event(name: impl Into<String>, function: Option<DeclId>) -> Self {
        Self::new(name, DeclKind::Event(EventDecl { function }))
    }

    #[must_use]
    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = unique_id.into();
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn not_generated(mut self) -> Self {
        self.is_generated = false;
        self
    }

    pub fn parent(&self) -> Option<DeclId> {
        self.parent
    }

    pub fn as_class(&self) -> Option<&ClassDecl> {
        match &self.kind {
            DeclKind::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclKind::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyDecl> {
        match &self.kind {
            DeclKind::Property(property) => Some(property),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum DeclKind {
    Namespace(NamespaceDecl),
    Class(ClassDecl),
    Enumeration(EnumDecl),
    Function(FunctionDecl),
    Property(PropertyDecl),
    Variable(VariableDecl),
    Event(EventDecl),
}

/// Payload-free discriminant of [`DeclKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclTag {
    Namespace,
    Class,
    Enumeration,
    Function,
    Property,
    Variable,
    Event,
}

impl DeclKind {
    pub fn tag(&self) -> DeclTag {
        match self {
            DeclKind::Namespace(_) => DeclTag::Namespace,
            DeclKind::Class(_) => DeclTag::Class,
            DeclKind::Enumeration(_) => DeclTag::Enumeration,
            DeclKind::Function(_) => DeclTag::Function,
            DeclKind::Property(_) => DeclTag::Property,
            DeclKind::Variable(_) => DeclTag::Variable,
            DeclKind::Event(_) => DeclTag::Event,
        }
    }
}

impl Display for DeclTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeclTag::Namespace => "namespace",
            DeclTag::Class => "class",
            DeclTag::Enumeration => "enum",
            DeclTag::Function => "function",
            DeclTag::Property => "property",
            DeclTag::Variable => "variable",
            DeclTag::Event => "event",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct NamespaceDecl {
    pub declarations: Vec<DeclId>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct ClassDecl {
    pub kind: ClassKind,
    pub is_incomplete: bool,
    /// Nested classes, enums, variables and other non-member declarations.
    pub declarations: Vec<DeclId>,
    pub methods: Vec<DeclId>,
    pub properties: Vec<DeclId>,
    pub events: Vec<DeclId>,
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum ClassKind {
    #[default]
    Concrete,
    /// Generated pure-virtual shadow of `concrete`.
    InterfaceMirror { concrete: DeclId },
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct EnumDecl {
    pub items: Vec<String>,
}

#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, Default)]
pub enum ParameterKind {
    #[default]
    Regular,
    /// The receiver of a generated extension method.
    Extension,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    pub kind: ParameterKind,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind: ParameterKind::Regular,
        }
    }

    pub fn extension(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            kind: ParameterKind::Extension,
            ..Self::new(name, type_name)
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub enum SynthKind {
    DefaultValueOverload,
    ComplementOperator,
    AbstractImplCall,
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum FunctionOrigin {
    #[default]
    Declared,
    Synthesized { kind: SynthKind, origin: DeclId },
    Instantiation { pattern: DeclId },
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct FunctionDecl {
    pub parameters: Vec<Parameter>,
    pub access: AccessLevel,
    pub is_implicit: bool,
    pub origin: FunctionOrigin,
}

impl FunctionDecl {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: FunctionOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn implicit(mut self) -> Self {
        self.is_implicit = true;
        self
    }

    /// Types of the parameters that exist in the C++ signature.
    pub fn signature_types(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.kind == ParameterKind::Regular)
            .map(|p| p.type_name.clone())
            .collect()
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct PropertyDecl {
    pub getter: Option<DeclId>,
    pub setter: Option<DeclId>,
    pub is_synthesized: bool,
}

#[derive(Debug, PartialEq, Clone)]
pub struct TypeRef {
    pub name: String,
    /// The declaration the type names, if it is part of the AST.
    pub decl: Option<DeclId>,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decl: None,
        }
    }

    pub fn to_decl(name: impl Into<String>, decl: DeclId) -> Self {
        Self {
            name: name.into(),
            decl: Some(decl),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct VariableDecl {
    pub type_ref: TypeRef,
}

#[derive(Debug, PartialEq, Clone)]
pub struct EventDecl {
    /// The signal function this event was generated from.
    pub function: Option<DeclId>,
}

// --- The tree ---

/// Arena holding every translation unit and declaration of a binding run.
///
/// Cross references (origins, patterns, mirrors, accessors) are `DeclId`s
/// into this arena.
#[derive(Debug, Default, Clone)]
pub struct Ast {
    units: Vec<TranslationUnit>,
    decls: Vec<Declaration>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit(&mut self, unit: TranslationUnit) -> UnitId {
        self.units.push(unit);
        UnitId(self.units.len() - 1)
    }

    /// Adds `decl` to `unit`, nested in `parent` when given, and returns its id.
    ///
    /// Functions, properties and events added to a class become its methods,
    /// properties and events. An empty `unique_id` is derived from the
    /// qualified name, plus the parameter types for functions.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a namespace or class of this tree.
    pub fn add(&mut self, unit: UnitId, parent: Option<DeclId>, mut decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len());
        decl.unit = Some(unit);
        decl.parent = parent;
        let tag = decl.kind.tag();
        self.decls.push(decl);

        match parent {
            None => self.units[unit.0].declarations.push(id),
            Some(parent_id) => match &mut self.decls[parent_id.0].kind {
                DeclKind::Namespace(namespace) => namespace.declarations.push(id),
                DeclKind::Class(class) => match tag {
                    DeclTag::Function => class.methods.push(id),
                    DeclTag::Property => class.properties.push(id),
                    DeclTag::Event => class.events.push(id),
                    _ => class.declarations.push(id),
                },
                other => panic!("{} cannot contain declarations", other.tag()),
            },
        }

        if self.decls[id.0].unique_id.is_empty() {
            let mut unique_id = self.qualified_name(id);
            if let Some(function) = self.decls[id.0].as_function() {
                unique_id = format!("{}({})", unique_id, function.signature_types().join(", "));
            }
            self.decls[id.0].unique_id = unique_id;
        }
        id
    }

    pub fn unit(&self, id: UnitId) -> &TranslationUnit {
        &self.units[id.0]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut TranslationUnit {
        &mut self.units[id.0]
    }

    pub fn unit_ids(&self) -> Vec<UnitId> {
        (0..self.units.len()).map(UnitId).collect()
    }

    /// The translation unit `id` was declared in.
    pub fn unit_of(&self, id: DeclId) -> &TranslationUnit {
        // `add` is the only way in, and it always sets the unit.
        let unit = self.decls[id.0].unit.unwrap_or(UnitId(0));
        &self.units[unit.0]
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0]
    }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.0]
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.decls.len()).map(DeclId)
    }

    pub fn comment(&self, id: DeclId) -> Option<&str> {
        self.decls[id.0].comment.as_deref()
    }

    /// `Outer::Inner::name`, built through the chain of enclosing
    /// namespaces and classes.
    pub fn qualified_name(&self, id: DeclId) -> String {
        let mut parts = vec![self.decls[id.0].name.as_str()];
        let mut current = self.decls[id.0].parent;
        while let Some(parent) = current {
            let decl = &self.decls[parent.0];
            if !decl.name.is_empty() {
                parts.push(decl.name.as_str());
            }
            current = decl.parent;
        }
        parts.reverse();
        parts.join("::")
    }

    /// Children of a namespace or class in traversal order; empty otherwise.
    pub fn children(&self, id: DeclId) -> Vec<DeclId> {
        match &self.decls[id.0].kind {
            DeclKind::Namespace(namespace) => namespace.declarations.clone(),
            DeclKind::Class(class) => class
                .declarations
                .iter()
                .chain(&class.methods)
                .chain(&class.properties)
                .chain(&class.events)
                .copied()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Finds a declaration by qualified name.
    pub fn find(&self, qualified_name: &str) -> Option<DeclId> {
        self.ids().find(|id| self.qualified_name(*id) == qualified_name)
    }

    /// Whether `id` is a member of a generated interface mirror.
    pub fn is_interface_member(&self, id: DeclId) -> bool {
        self.decls[id.0]
            .parent
            .and_then(|parent| self.decls[parent.0].as_class())
            .is_some_and(|class| matches!(class.kind, ClassKind::InterfaceMirror { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_names_follow_parents() {
        let mut ast = Ast::new();
        let unit = ast.add_unit(TranslationUnit::new("qpoint.h"));
        let ns = ast.add(unit, None, Declaration::namespace("Qt"));
        let class = ast.add(unit, Some(ns), Declaration::class("QPoint"));
        let method = ast.add(
            unit,
            Some(class),
            Declaration::function("setX", FunctionDecl::new(vec![Parameter::new("x", "int")])),
        );

        assert_eq!(ast.qualified_name(method), "Qt::QPoint::setX");
        assert_eq!(ast.get(method).unique_id, "Qt::QPoint::setX(int)");
        assert_eq!(ast.find("Qt::QPoint"), Some(class));
    }

    #[test]
    fn test_members_are_sorted_into_class_lists() {
        let mut ast = Ast::new();
        let unit = ast.add_unit(TranslationUnit::new("qobject.h"));
        let class = ast.add(unit, None, Declaration::class("QObject"));
        let nested = ast.add(unit, Some(class), Declaration::enumeration("Flags"));
        let method = ast.add(unit, Some(class), Declaration::function("parent", FunctionDecl::default()));
        let property = ast.add(unit, Some(class), Declaration::property("objectName", PropertyDecl::default()));
        let event = ast.add(unit, Some(class), Declaration::event("destroyed", None));

        let class_decl = ast.get(class).as_class().unwrap();
        assert_eq!(class_decl.declarations, vec![nested]);
        assert_eq!(class_decl.methods, vec![method]);
        assert_eq!(class_decl.properties, vec![property]);
        assert_eq!(class_decl.events, vec![event]);
        assert_eq!(ast.children(class), vec![nested, method, property, event]);
    }

    #[test]
    fn test_signature_types_skip_extension_receiver() {
        let function = FunctionDecl::new(vec![
            Parameter::extension("list", "QList<int>"),
            Parameter::new("value", "const int &"),
        ]);
        assert_eq!(function.signature_types(), vec!["const int &".to_string()]);
    }
}
