use crate::error::ConfigError;
use crate::utils::span_at;
use miette::NamedSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for a documentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Root directory of the documentation corpus.
    pub docs_path: PathBuf,
    /// Modules whose documentation indexes are loaded, e.g. `QtCore`.
    #[serde(default)]
    pub modules: Vec<String>,
    /// Drop comments carried over from the headers before associating.
    #[serde(default = "default_clear_existing_comments")]
    pub clear_existing_comments: bool,
}

fn default_clear_existing_comments() -> bool {
    true
}

impl DocsConfig {
    pub fn new(docs_path: impl Into<PathBuf>, modules: Vec<String>) -> Self {
        DocsConfig {
            docs_path: docs_path.into(),
            modules,
            clear_existing_comments: default_clear_existing_comments(),
        }
    }

    /// Builds a config whose modules are derived from library file names.
    pub fn from_lib_files<I, P>(docs_path: impl Into<PathBuf>, lib_files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let modules = lib_files
            .into_iter()
            .map(|lib| module_name_from_lib_file(lib.as_ref()))
            .collect();
        Self::new(docs_path, modules)
    }

    pub fn from_json_str(source: &str, name: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(source).map_err(|e| ConfigError::Malformed {
            span: span_at(source, e.line(), e.column()),
            message: e.to_string(),
            src: NamedSource::new(name, source.to_string()),
        })
    }

    pub fn from_yaml_str(source: &str, name: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(source).map_err(|e| ConfigError::Malformed {
            span: e
                .location()
                .map_or((source.len(), 0).into(), |loc| (loc.index(), 0).into()),
            message: e.to_string(),
            src: NamedSource::new(name, source.to_string()),
        })
    }

    /// Reads a `.json`, `.yaml` or `.yml` configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let name = path.to_string_lossy().to_string();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !matches!(extension.as_str(), "json" | "yaml" | "yml") {
            return Err(ConfigError::UnsupportedFormat { path: name });
        }

        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: name.clone(),
            source,
        })?;
        if extension == "json" {
            Self::from_json_str(&source, &name)
        } else {
            Self::from_yaml_str(&source, &name)
        }
    }
}

/// Module name for a library file: `libQt5Core.so.5.15.2` and `Qt5Core.dll`
/// both give `QtCore`.
///
/// The `lib` prefix and every extension are dropped, and a major version
/// digit right after `Qt` is removed.
pub fn module_name_from_lib_file(lib_file: &Path) -> String {
    let file_name = lib_file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_name = file_name.strip_prefix("lib").unwrap_or(&file_name);
    let module = file_name.split('.').next().unwrap_or(file_name);

    match module.strip_prefix("Qt") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => format!("Qt{}", &rest[1..]),
        _ => module.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_name_from_lib_file() {
        assert_eq!(module_name_from_lib_file(Path::new("/usr/lib/libQt5Core.so.5.15.2")), "QtCore");
        assert_eq!(module_name_from_lib_file(Path::new("C:/Qt/bin/Qt6Widgets.dll")), "QtWidgets");
        assert_eq!(module_name_from_lib_file(Path::new("libQtGui.dylib")), "QtGui");
        assert_eq!(module_name_from_lib_file(Path::new("libfoo.so")), "foo");
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config = DocsConfig::from_json_str(
            r#"{ "docs_path": "/opt/qt/doc", "modules": ["QtCore"] }"#,
            "docs.json",
        )
        .unwrap();
        assert_eq!(config.docs_path, PathBuf::from("/opt/qt/doc"));
        assert_eq!(config.modules, vec!["QtCore".to_string()]);
        assert!(config.clear_existing_comments);
    }

    #[test]
    fn test_config_from_yaml() {
        let source = "docs_path: docs\nmodules: [QtCore, QtGui]\nclear_existing_comments: false\n";
        let config = DocsConfig::from_yaml_str(source, "docs.yaml").unwrap();
        assert_eq!(config.modules.len(), 2);
        assert!(!config.clear_existing_comments);
    }

    #[test]
    fn test_malformed_config_is_reported() {
        let result = DocsConfig::from_json_str(r#"{ "modules": [] }"#, "docs.json");
        assert!(matches!(result, Err(ConfigError::Malformed { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = DocsConfig::load("docs.toml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }
}
