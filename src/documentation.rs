use crate::ast::AccessLevel;
use crate::error::IndexError;
use crate::index::{DocIndex, MemoryIndex};
use crate::serialization::IndexFile;
use crate::utils::span_at;
use log::{debug, warn};
use miette::NamedSource;
use std::path::{Path, PathBuf};

const INDEX_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// The documentation corpus of a set of modules, loaded from a docs root.
///
/// Each module is looked up as `<root>/<module>.<ext>` or
/// `<root>/<module>/<module>.<ext>`, with the module name lowercased and
/// `<ext>` one of `json`, `yaml`, `yml`. Modules without an index file are
/// skipped. The corpus is available when the root is a directory and at least
/// one module index was loaded.
#[derive(Debug, Clone)]
pub struct Documentation {
    root: PathBuf,
    loaded_modules: Vec<String>,
    index: MemoryIndex,
}

impl Documentation {
    /// Loads the module indexes found under `root`.
    ///
    /// A missing root is not an error: the returned corpus simply reports
    /// itself unavailable.
    ///
    /// # Errors
    ///
    /// Returns an `IndexError` if an index file exists but cannot be read or
    /// does not follow the index format.
    pub fn open<I, S>(root: impl AsRef<Path>, modules: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = root.as_ref().to_path_buf();
        let mut documentation = Documentation {
            root: root.clone(),
            loaded_modules: Vec::new(),
            index: MemoryIndex::new(),
        };
        if !root.is_dir() {
            warn!("Documentation root {} does not exist", root.display());
            return Ok(documentation);
        }

        for module in modules {
            let module = module.as_ref();
            let Some(path) = find_module_index(&root, module) else {
                warn!("No documentation index for module {module} under {}", root.display());
                continue;
            };
            let file = read_index_file(&path)?;
            let before = documentation.index.len();
            file.merge_into(&mut documentation.index);
            debug!(
                "Loaded {} documentation entries for {module} from {}",
                documentation.index.len() - before,
                path.display()
            );
            documentation.loaded_modules.push(module.to_string());
        }
        Ok(documentation)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Modules whose index file was found and loaded, in load order.
    pub fn loaded_modules(&self) -> &[String] {
        &self.loaded_modules
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir() && !self.loaded_modules.is_empty()
    }
}

fn find_module_index(root: &Path, module: &str) -> Option<PathBuf> {
    let stem = module.to_lowercase();
    let flat = INDEX_EXTENSIONS
        .iter()
        .map(|ext| root.join(format!("{stem}.{ext}")));
    let nested = INDEX_EXTENSIONS
        .iter()
        .map(|ext| root.join(&stem).join(format!("{stem}.{ext}")));
    flat.chain(nested).find(|candidate| candidate.is_file())
}

fn read_index_file(path: &Path) -> Result<IndexFile, IndexError> {
    let source = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    })?;
    let name = path.to_string_lossy().to_string();

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    if is_json {
        serde_json::from_str(&source).map_err(|e| IndexError::Malformed {
            span: span_at(&source, e.line(), e.column()),
            message: e.to_string(),
            src: NamedSource::new(name, source.clone()),
        })
    } else {
        serde_yaml::from_str(&source).map_err(|e| IndexError::Malformed {
            span: e
                .location()
                .map_or((source.len(), 0).into(), |loc| (loc.index(), 0).into()),
            message: e.to_string(),
            src: NamedSource::new(name, source.clone()),
        })
    }
}

impl DocIndex for Documentation {
    fn is_available(&self) -> bool {
        self.exists()
    }

    fn lookup_type(&self, qualified_name: &str) -> Option<String> {
        self.index.lookup_type(qualified_name)
    }

    fn lookup_enum(&self, qualified_name: &str) -> Option<String> {
        self.index.lookup_enum(qualified_name)
    }

    fn lookup_function(
        &self,
        qualified_name: &str,
        parameter_types: &[String],
        access: AccessLevel,
    ) -> Option<String> {
        self.index.lookup_function(qualified_name, parameter_types, access)
    }

    fn lookup_property(&self, qualified_name: &str) -> Option<String> {
        self.index.lookup_property(qualified_name)
    }

    fn lookup_variable(&self, qualified_name: &str) -> Option<String> {
        self.index.lookup_variable(qualified_name)
    }
}
