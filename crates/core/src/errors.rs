//! Error types for the gitdist core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Packaging(#[from] PackagingError),

    #[error(transparent)]
    Docs(#[from] DocsError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// External tool errors
// ---------------------------------------------------------------------------

/// Errors from invoking an external program (git, the packaging command,
/// the docs generator, the uploader).
#[derive(Debug, Error)]
pub enum ToolError {
    /// The binary was not found on `$PATH`.
    #[error("{0} binary not found")]
    BinaryNotFound(String),

    /// The command exited with a non-zero status.
    #[error("{program} command failed (exit {exit_code}): {stderr}")]
    CommandFailed {
        program: String,
        exit_code: i32,
        stderr: String,
    },

    /// Generic I/O wrapper (spawn or pipe failure).
    #[error("tool I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Identity errors
// ---------------------------------------------------------------------------

/// Errors from the alias map loader.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The alias file exists but could not be decoded.
    #[error("alias file error at '{path}': {detail}")]
    AliasFileError {
        path: String,
        detail: String,
    },

    /// Generic I/O error.
    #[error("identity I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Artifact generation errors
// ---------------------------------------------------------------------------

/// Errors from the changelog and authors builders.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The history extractor failed.
    #[error("history extraction failed: {0}")]
    Tool(#[from] ToolError),

    /// The alias map could not be loaded.
    #[error("alias map error: {0}")]
    Identity(#[from] IdentityError),

    /// An output artifact could not be written.
    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An optional input existed but could not be read.
    #[error("failed to read '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Packaging errors
// ---------------------------------------------------------------------------

/// Errors from the wrapped source-distribution command.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// Changelog or authors generation failed; packaging is aborted.
    #[error("artifact generation failed: {0}")]
    Generate(#[from] GenerateError),

    /// The manifest template could not be written or removed.
    #[error("manifest template error at '{path}': {source}")]
    TemplateIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The base packaging command exited unsuccessfully.
    #[error("base packaging command '{command}' failed (exit {exit_code})")]
    BaseCommandFailed {
        command: String,
        exit_code: i32,
    },

    /// The base packaging command could not be launched.
    #[error("base packaging command error: {0}")]
    Tool(#[from] ToolError),
}

// ---------------------------------------------------------------------------
// Documentation errors
// ---------------------------------------------------------------------------

/// Errors from the documentation build and upload commands.
#[derive(Debug, Error)]
pub enum DocsError {
    /// The optional collaborator is not installed or not configured.
    #[error("{0} is not available")]
    Unavailable(String),

    /// The docs generator or uploader failed.
    #[error("docs tool error: {0}")]
    Tool(#[from] ToolError),

    /// Autoindex output could not be written, or a package could not be read.
    #[error("docs I/O error at '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = ToolError::BinaryNotFound("git".into());
        assert_eq!(err.to_string(), "git binary not found");

        let err = ToolError::CommandFailed {
            program: "git".into(),
            exit_code: 128,
            stderr: "fatal: not a git repository".into(),
        };
        assert_eq!(
            err.to_string(),
            "git command failed (exit 128): fatal: not a git repository"
        );

        let err = ConfigError::InvalidValue {
            field: "sdist.command".into(),
            detail: "must not be empty".into(),
        };
        assert!(err.to_string().contains("sdist.command"));

        let err = PackagingError::BaseCommandFailed {
            command: "python setup.py sdist".into(),
            exit_code: 1,
        };
        assert!(err.to_string().contains("python setup.py sdist"));
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let tool_err = ToolError::BinaryNotFound("sphinx-build".into());
        let core_err: CoreError = tool_err.into();
        assert!(matches!(core_err, CoreError::Tool(_)));

        let gen_err: GenerateError = ToolError::BinaryNotFound("git".into()).into();
        let pkg_err: PackagingError = gen_err.into();
        assert!(matches!(pkg_err, PackagingError::Generate(GenerateError::Tool(_))));
    }
}
