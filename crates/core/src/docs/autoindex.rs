//! API reference stubs for the documentation generator.
//!
//! Every module file under each top-level package gets an `automodule` page
//! in `<source_dir>/api/`, and `autoindex.rst` lists them in a toctree.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::DocsError;

const AUTOINDEX_HEADER: &str = ".. toctree::\n   :maxdepth: 1\n\n";

/// Dotted module names found under `packages` (relative to `root`), sorted.
///
/// Dotted package names are skipped; they are reached by walking their
/// top-level parent. `__init__` files are not modules of their own.
/// Symlinked directories are not descended into.
pub fn discover_modules(
    root: &Path,
    packages: &[String],
    extension: &str,
) -> Result<Vec<String>, DocsError> {
    let init = format!("__init__.{}", extension);
    let mut modules = BTreeSet::new();

    for package in packages.iter().filter(|p| !p.contains('.')) {
        let dir = root.join(package);
        if !dir.is_dir() {
            debug!(package = %package, "package directory missing, skipping");
            continue;
        }

        for entry in WalkDir::new(&dir).min_depth(1).follow_links(false) {
            let entry = entry.map_err(|e| walk_error(&dir, e))?;
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let is_module = path.extension().map_or(false, |ext| ext == extension);
            if !is_module || entry.file_name() == init.as_str() {
                continue;
            }
            if let Some(name) = module_name(root, path) {
                modules.insert(name);
            }
        }
    }
    Ok(modules.into_iter().collect())
}

/// `widget/cli/main.py` under `root` becomes `widget.cli.main`.
fn module_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("."))
}

fn walk_error(dir: &Path, err: walkdir::Error) -> DocsError {
    let path = err.path().unwrap_or(dir).display().to_string();
    DocsError::IoError {
        path,
        source: std::io::Error::from(err),
    }
}

/// The `automodule` page for one module.
pub fn render_module_page(module: &str) -> String {
    let heading = format!("The :mod:`{}` Module", module);
    let underline = "=".repeat(heading.len());
    format!(
        "{heading}\n{underline}\n\n.. automodule:: {module}\n  :members:\n  :undoc-members:\n  :show-inheritance:\n"
    )
}

/// The toctree listing every module page.
pub fn render_index(modules: &[String]) -> String {
    let mut index = String::from(AUTOINDEX_HEADER);
    for module in modules {
        index.push_str(&format!("   {}.rst\n", module));
    }
    index
}

/// Write `autoindex.rst` and one page per module into `<source_dir>/api`.
/// Returns the index path.
pub fn write_autoindex(source_dir: &Path, modules: &[String]) -> Result<PathBuf, DocsError> {
    let api_dir = source_dir.join("api");
    let io_err = |path: &Path, source: std::io::Error| DocsError::IoError {
        path: path.display().to_string(),
        source,
    };

    std::fs::create_dir_all(&api_dir).map_err(|e| io_err(&api_dir, e))?;

    for module in modules {
        let page = api_dir.join(format!("{}.rst", module));
        debug!(path = %page.display(), "generating module page");
        std::fs::write(&page, render_module_page(module)).map_err(|e| io_err(&page, e))?;
    }

    let index = api_dir.join("autoindex.rst");
    std::fs::write(&index, render_index(modules)).map_err(|e| io_err(&index, e))?;

    info!(count = modules.len(), path = %index.display(), "wrote API autoindex");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn test_discover_modules() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "widget/__init__.py");
        touch(dir.path(), "widget/core.py");
        touch(dir.path(), "widget/cli/__init__.py");
        touch(dir.path(), "widget/cli/main.py");
        touch(dir.path(), "widget/data.json");
        touch(dir.path(), "other/ignored.py");

        let modules = discover_modules(
            dir.path(),
            &["widget".into(), "widget.cli".into(), "missing".into()],
            "py",
        )
        .unwrap();
        assert_eq!(modules, vec!["widget.cli.main", "widget.core"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "widget/__init__.py");
        touch(dir.path(), "widget/core.py");
        std::os::unix::fs::symlink("..", dir.path().join("widget/loop")).unwrap();

        let modules = discover_modules(dir.path(), &["widget".into()], "py").unwrap();
        assert_eq!(modules, vec!["widget.core"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subpackage_reports_its_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "widget/core.py");
        touch(dir.path(), "widget/private/secret.py");
        let private = dir.path().join("widget/private");
        std::fs::set_permissions(&private, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read the directory regardless of its mode.
        if std::fs::read_dir(&private).is_ok() {
            std::fs::set_permissions(&private, std::fs::Permissions::from_mode(0o755)).unwrap();
            eprintln!("SKIPPED: permissions not enforced for this user");
            return;
        }

        let result = discover_modules(dir.path(), &["widget".into()], "py");
        std::fs::set_permissions(&private, std::fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(DocsError::IoError { path, .. }) => {
                assert_eq!(path, private.display().to_string());
            }
            other => panic!("expected IoError, got {:?}", other),
        }
    }

    #[test]
    fn test_render_module_page() {
        let page = render_module_page("widget.core");
        let expected = "\
The :mod:`widget.core` Module
=============================

.. automodule:: widget.core
  :members:
  :undoc-members:
  :show-inheritance:
";
        assert_eq!(page, expected);
    }

    #[test]
    fn test_write_autoindex() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("doc/source");
        let modules = vec!["widget.cli.main".to_string(), "widget.core".to_string()];

        let index = write_autoindex(&source, &modules).unwrap();

        assert_eq!(index, source.join("api/autoindex.rst"));
        assert_eq!(
            std::fs::read_to_string(&index).unwrap(),
            ".. toctree::\n   :maxdepth: 1\n\n   widget.cli.main.rst\n   widget.core.rst\n"
        );
        assert!(std::fs::read_to_string(source.join("api/widget.core.rst"))
            .unwrap()
            .contains(".. automodule:: widget.core"));
    }

    #[test]
    fn test_empty_index() {
        assert_eq!(render_index(&[]), AUTOINDEX_HEADER);
    }
}
