use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DocError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Diagnostic)]
#[error("Documentation Index Error")]
pub enum IndexError {
    #[error("Failed to read documentation index `{path}`")]
    #[diagnostic(
        code(index::io),
        help("The documentation root exists but one of its module index files could not be read.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed documentation index")]
    #[diagnostic(
        code(index::malformed),
        help("Module index files hold `types`, `enums`, `properties`, `variables` maps and a `functions` list.")
    )]
    Malformed {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },
}

#[derive(Error, Debug, Diagnostic)]
#[error("Configuration Error")]
pub enum ConfigError {
    #[error("Failed to read configuration `{path}`")]
    #[diagnostic(code(config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration")]
    #[diagnostic(
        code(config::malformed),
        help("Expected `docs_path`, `modules` and optionally `clear_existing_comments`.")
    )]
    Malformed {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("Unsupported configuration format `{path}`")]
    #[diagnostic(
        code(config::unsupported_format),
        help("Use a `.json`, `.yaml` or `.yml` file.")
    )]
    UnsupportedFormat { path: String },
}

/// Problems found while associating documentation. These are recorded in the
/// session and never abort the pass.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum PassDiagnostic {
    #[error("Documentation resolution cycle: {chain}")]
    #[diagnostic(
        code(pass::resolution_cycle),
        severity(Warning),
        help("An origin or instantiation pattern refers back to a declaration that is still being resolved; it is left undocumented.")
    )]
    ResolutionCycle { chain: String },
}
