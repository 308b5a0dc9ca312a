//! TOML-based configuration system for gitdist.
//!
//! Every section is optional; a project with no `gitdist.toml` at all gets
//! the conventional file names (`.mailmap`, `ChangeLog`, `AUTHORS`,
//! `AUTHORS.in`, `MANIFEST.in`) and the classic `python setup.py sdist`
//! base packaging command.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::ConfigError;

/// Default config file name, looked up relative to the project root.
pub const DEFAULT_CONFIG_FILE: &str = "gitdist.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level gitdist configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistConfig {
    /// Distribution metadata handed to the packaging and docs commands.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Input and output file names, relative to the project root.
    #[serde(default)]
    pub files: FilesConfig,

    /// History extraction settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Base packaging command settings.
    #[serde(default)]
    pub sdist: SdistConfig,

    /// Documentation build settings.
    #[serde(default)]
    pub docs: DocsConfig,

    /// Documentation upload settings.
    #[serde(default)]
    pub upload_docs: UploadDocsConfig,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// Distribution metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Distribution name.
    #[serde(default)]
    pub name: String,

    /// Distribution version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Top-level packages, scanned by the API autoindex.
    #[serde(default)]
    pub packages: Vec<String>,

    /// Version-info file referenced by the synthesized manifest template.
    /// Defaults to `<name>/versioninfo`.
    #[serde(default)]
    pub version_info: Option<PathBuf>,
}

fn default_version() -> String {
    "0.0.0".into()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: default_version(),
            packages: Vec::new(),
            version_info: None,
        }
    }
}

impl ProjectConfig {
    /// The version-info path, falling back to `<name>/versioninfo`.
    pub fn version_info_path(&self) -> PathBuf {
        match &self.version_info {
            Some(path) => path.clone(),
            None if self.name.is_empty() => PathBuf::from("versioninfo"),
            None => Path::new(&self.name).join("versioninfo"),
        }
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Conventional file names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Alias mapping file (`<canonical> <alias>` per line).
    #[serde(default = "default_mailmap")]
    pub mailmap: PathBuf,

    /// Changelog output.
    #[serde(default = "default_changelog")]
    pub changelog: PathBuf,

    /// Authors output.
    #[serde(default = "default_authors")]
    pub authors: PathBuf,

    /// Optional seed appended verbatim to the authors output.
    #[serde(default = "default_authors_seed")]
    pub authors_seed: PathBuf,

    /// Manifest template consumed by the base packaging command.
    #[serde(default = "default_manifest_template")]
    pub manifest_template: PathBuf,

    /// Accepted names for the human-readable overview file.
    #[serde(default = "default_readme_candidates")]
    pub readme_candidates: Vec<String>,
}

fn default_mailmap() -> PathBuf {
    PathBuf::from(".mailmap")
}

fn default_changelog() -> PathBuf {
    PathBuf::from("ChangeLog")
}

fn default_authors() -> PathBuf {
    PathBuf::from("AUTHORS")
}

fn default_authors_seed() -> PathBuf {
    PathBuf::from("AUTHORS.in")
}

fn default_manifest_template() -> PathBuf {
    PathBuf::from("MANIFEST.in")
}

fn default_readme_candidates() -> Vec<String> {
    vec!["README.rst".into(), "README".into(), "README.txt".into()]
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            mailmap: default_mailmap(),
            changelog: default_changelog(),
            authors: default_authors(),
            authors_seed: default_authors_seed(),
            manifest_template: default_manifest_template(),
            readme_candidates: default_readme_candidates(),
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// How the external VCS tool is queried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// The git executable.
    #[serde(default = "default_git_binary")]
    pub git_binary: String,

    /// CI bot address excluded from the author list.
    #[serde(default = "default_excluded_email")]
    pub excluded_email: String,

    /// Commit-message trailer naming an additional contributor.
    #[serde(default = "default_co_author_marker")]
    pub co_author_marker: String,
}

fn default_git_binary() -> String {
    "git".into()
}

fn default_excluded_email() -> String {
    "jenkins@review.openstack.org".into()
}

fn default_co_author_marker() -> String {
    "Co-authored-by:".into()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            git_binary: default_git_binary(),
            excluded_email: default_excluded_email(),
            co_author_marker: default_co_author_marker(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sdist
// ---------------------------------------------------------------------------

/// The base packaging command wrapped by `gitdist sdist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdistConfig {
    /// Program followed by its arguments.
    #[serde(default = "default_sdist_command")]
    pub command: Vec<String>,
}

fn default_sdist_command() -> Vec<String> {
    vec!["python".into(), "setup.py".into(), "sdist".into()]
}

impl Default for SdistConfig {
    fn default() -> Self {
        Self {
            command: default_sdist_command(),
        }
    }
}

// ---------------------------------------------------------------------------
// Docs
// ---------------------------------------------------------------------------

/// Documentation generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// The sphinx-build executable.
    #[serde(default = "default_sphinx_binary")]
    pub sphinx_binary: String,

    /// Documentation sources.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Root of the builder output directories.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Builders run in order.
    #[serde(default = "default_builders")]
    pub builders: Vec<String>,

    /// File extension recognised as a module by the autoindex.
    #[serde(default = "default_module_extension")]
    pub module_extension: String,

    /// When this environment variable is set to a non-empty value, the
    /// autoindex is not generated.
    #[serde(default = "default_skip_autoindex_env")]
    pub skip_autoindex_env: String,
}

fn default_sphinx_binary() -> String {
    "sphinx-build".into()
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("doc/source")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("doc/build")
}

fn default_builders() -> Vec<String> {
    vec!["html".into(), "man".into()]
}

fn default_module_extension() -> String {
    "py".into()
}

fn default_skip_autoindex_env() -> String {
    "SPHINX_DEBUG".into()
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            sphinx_binary: default_sphinx_binary(),
            source_dir: default_source_dir(),
            build_dir: default_build_dir(),
            builders: default_builders(),
            module_extension: default_module_extension(),
            skip_autoindex_env: default_skip_autoindex_env(),
        }
    }
}

impl DocsConfig {
    /// Whether the autoindex should be generated before building.
    pub fn autoindex_enabled(&self) -> bool {
        std::env::var_os(&self.skip_autoindex_env).map_or(true, |v| v.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Upload docs
// ---------------------------------------------------------------------------

/// Documentation upload settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadDocsConfig {
    /// Uploader program followed by its arguments. The html directory is
    /// appended as the final argument.
    #[serde(default)]
    pub command: Option<Vec<String>>,

    /// Overrides `<docs.build_dir>/html`.
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl DistConfig {
    /// Load a [`DistConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: DistConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sdist.command.is_empty() || self.sdist.command[0].is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sdist.command".into(),
                detail: "base packaging command must not be empty".into(),
            });
        }
        if self.history.git_binary.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "history.git_binary".into(),
                detail: "git binary must not be empty".into(),
            });
        }
        if !self.history.co_author_marker.ends_with(':') {
            return Err(ConfigError::InvalidValue {
                field: "history.co_author_marker".into(),
                detail: "marker must end with ':'".into(),
            });
        }
        if self.docs.builders.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "docs.builders".into(),
                detail: "at least one builder is required".into(),
            });
        }
        if let Some(command) = &self.upload_docs.command {
            if command.is_empty() || command[0].is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "upload_docs.command".into(),
                    detail: "uploader command must not be empty when set".into(),
                });
            }
        }

        Ok(())
    }

    /// Convenience: load (or default) and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Commented starter config written by `gitdist init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# gitdist configuration
# Every key is optional; the values below are the defaults.

[project]
name = "example"
version = "0.1.0"
packages = ["example"]
# version_info = "example/versioninfo"

[files]
mailmap = ".mailmap"
changelog = "ChangeLog"
authors = "AUTHORS"
authors_seed = "AUTHORS.in"
manifest_template = "MANIFEST.in"
readme_candidates = ["README.rst", "README", "README.txt"]

[history]
git_binary = "git"
excluded_email = "jenkins@review.openstack.org"
co_author_marker = "Co-authored-by:"

[sdist]
command = ["python", "setup.py", "sdist"]

[docs]
sphinx_binary = "sphinx-build"
source_dir = "doc/source"
build_dir = "doc/build"
builders = ["html", "man"]
module_extension = "py"
skip_autoindex_env = "SPHINX_DEBUG"

[upload_docs]
# command = ["twine", "upload-docs"]
# upload_dir = "doc/build/html"
"#;
