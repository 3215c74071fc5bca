use crate::ast::AccessLevel;
use crate::utils::normalize_type_name;
use std::collections::HashMap;

/// Read-only oracle over a documentation corpus.
///
/// A miss is `None`, never an error. The only failure mode is an
/// unavailable corpus, reported by [`DocIndex::is_available`] and checked
/// once before a pass starts.
pub trait DocIndex {
    fn is_available(&self) -> bool {
        true
    }

    fn lookup_type(&self, qualified_name: &str) -> Option<String>;

    fn lookup_enum(&self, qualified_name: &str) -> Option<String>;

    /// Overloads share a name in the corpus, so the match is on the full
    /// parameter-type signature and the access level.
    fn lookup_function(
        &self,
        qualified_name: &str,
        parameter_types: &[String],
        access: AccessLevel,
    ) -> Option<String>;

    fn lookup_property(&self, qualified_name: &str) -> Option<String>;

    fn lookup_variable(&self, qualified_name: &str) -> Option<String>;
}

impl<T: DocIndex + ?Sized> DocIndex for &T {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn lookup_type(&self, qualified_name: &str) -> Option<String> {
        (**self).lookup_type(qualified_name)
    }

    fn lookup_enum(&self, qualified_name: &str) -> Option<String> {
        (**self).lookup_enum(qualified_name)
    }

    fn lookup_function(
        &self,
        qualified_name: &str,
        parameter_types: &[String],
        access: AccessLevel,
    ) -> Option<String> {
        (**self).lookup_function(qualified_name, parameter_types, access)
    }

    fn lookup_property(&self, qualified_name: &str) -> Option<String> {
        (**self).lookup_property(qualified_name)
    }

    fn lookup_variable(&self, qualified_name: &str) -> Option<String> {
        (**self).lookup_variable(qualified_name)
    }
}

#[derive(Debug, PartialEq, Clone)]
struct FunctionEntry {
    parameter_types: Vec<String>,
    access: AccessLevel,
    text: String,
}

/// A [`DocIndex`] held entirely in memory.
///
/// The first entry added for a key wins; later duplicates are ignored.
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    available: bool,
    types: HashMap<String, String>,
    enums: HashMap<String, String>,
    functions: HashMap<String, Vec<FunctionEntry>>,
    properties: HashMap<String, String>,
    variables: HashMap<String, String>,
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIndex {
    pub fn new() -> Self {
        MemoryIndex {
            available: true,
            types: HashMap::new(),
            enums: HashMap::new(),
            functions: HashMap::new(),
            properties: HashMap::new(),
            variables: HashMap::new(),
        }
    }

    /// An index standing in for a corpus that could not be found.
    pub fn unavailable() -> Self {
        MemoryIndex {
            available: false,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
            + self.enums.len()
            + self.functions.values().map(Vec::len).sum::<usize>()
            + self.properties.len()
            + self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_type(&mut self, qualified_name: impl Into<String>, text: impl Into<String>) {
        self.types.entry(qualified_name.into()).or_insert_with(|| text.into());
    }

    pub fn add_enum(&mut self, qualified_name: impl Into<String>, text: impl Into<String>) {
        self.enums.entry(qualified_name.into()).or_insert_with(|| text.into());
    }

    pub fn add_function<S: AsRef<str>>(
        &mut self,
        qualified_name: impl Into<String>,
        parameter_types: &[S],
        access: AccessLevel,
        text: impl Into<String>,
    ) {
        let parameter_types: Vec<String> = parameter_types
            .iter()
            .map(|t| normalize_type_name(t.as_ref()))
            .collect();
        let overloads = self.functions.entry(qualified_name.into()).or_default();
        if overloads
            .iter()
            .any(|f| f.parameter_types == parameter_types && f.access == access)
        {
            return;
        }
        overloads.push(FunctionEntry {
            parameter_types,
            access,
            text: text.into(),
        });
    }

    pub fn add_property(&mut self, qualified_name: impl Into<String>, text: impl Into<String>) {
        self.properties.entry(qualified_name.into()).or_insert_with(|| text.into());
    }

    pub fn add_variable(&mut self, qualified_name: impl Into<String>, text: impl Into<String>) {
        self.variables.entry(qualified_name.into()).or_insert_with(|| text.into());
    }

    #[must_use]
    pub fn with_type(mut self, qualified_name: &str, text: &str) -> Self {
        self.add_type(qualified_name, text);
        self
    }

    #[must_use]
    pub fn with_enum(mut self, qualified_name: &str, text: &str) -> Self {
        self.add_enum(qualified_name, text);
        self
    }

    #[must_use]
    pub fn with_function(
        mut self,
        qualified_name: &str,
        parameter_types: &[&str],
        access: AccessLevel,
        text: &str,
    ) -> Self {
        self.add_function(qualified_name, parameter_types, access, text);
        self
    }

    #[must_use]
    pub fn with_property(mut self, qualified_name: &str, text: &str) -> Self {
        self.add_property(qualified_name, text);
        self
    }

    #[must_use]
    pub fn with_variable(mut self, qualified_name: &str, text: &str) -> Self {
        self.add_variable(qualified_name, text);
        self
    }
}

impl DocIndex for MemoryIndex {
    fn is_available(&self) -> bool {
        self.available
    }

    fn lookup_type(&self, qualified_name: &str) -> Option<String> {
        self.types.get(qualified_name).cloned()
    }

    fn lookup_enum(&self, qualified_name: &str) -> Option<String> {
        self.enums.get(qualified_name).cloned()
    }

    fn lookup_function(
        &self,
        qualified_name: &str,
        parameter_types: &[String],
        access: AccessLevel,
    ) -> Option<String> {
        let overloads = self.functions.get(qualified_name)?;
        let wanted: Vec<String> = parameter_types
            .iter()
            .map(|t| normalize_type_name(t))
            .collect();
        overloads
            .iter()
            .find(|f| f.access == access && f.parameter_types == wanted)
            .map(|f| f.text.clone())
    }

    fn lookup_property(&self, qualified_name: &str) -> Option<String> {
        self.properties.get(qualified_name).cloned()
    }

    fn lookup_variable(&self, qualified_name: &str) -> Option<String> {
        self.variables.get(qualified_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryIndex {
        MemoryIndex::new()
            .with_function("QPoint::setX", &["int"], AccessLevel::Public, "Sets the X coordinate.")
            .with_function("QString::arg", &["const QString &"], AccessLevel::Public, "String arg.")
            .with_function("QString::arg", &["int"], AccessLevel::Public, "Integer arg.")
    }

    #[test]
    fn test_function_overloads_match_by_signature() {
        let index = sample();
        assert_eq!(
            index.lookup_function("QString::arg", &["int".to_string()], AccessLevel::Public),
            Some("Integer arg.".to_string())
        );
        assert_eq!(
            index.lookup_function("QString::arg", &["const QString&".to_string()], AccessLevel::Public),
            Some("String arg.".to_string())
        );
    }

    #[test]
    fn test_signature_or_access_mismatch_is_a_miss() {
        let index = sample();
        assert_eq!(
            index.lookup_function("QPoint::setX", &["double".to_string()], AccessLevel::Public),
            None
        );
        assert_eq!(
            index.lookup_function("QPoint::setX", &["int".to_string()], AccessLevel::Protected),
            None
        );
    }

    #[test]
    fn test_first_entry_wins() {
        let index = MemoryIndex::new()
            .with_enum("Qt::Orientation", "first")
            .with_enum("Qt::Orientation", "second");
        assert_eq!(index.lookup_enum("Qt::Orientation"), Some("first".to_string()));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_unavailable_index() {
        assert!(!MemoryIndex::unavailable().is_available());
        assert!(MemoryIndex::default().is_available());
    }
}
