//! Terminal styling for gitdist status lines.

use console::Style;

use gitdist_core::generate::GenerateOutcome;

/// Create a success-styled string (green with checkmark).
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Create an error-styled string (red with cross).
pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Create a warning-styled string (yellow).
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Create a header-styled string (bold).
pub fn header(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}

/// Status line for one generated artifact. A skipped artifact is dimmed
/// rather than flagged: a tree without git metadata is not an error.
pub fn outcome(what: &str, outcome: &GenerateOutcome) -> String {
    match outcome {
        GenerateOutcome::Written { path, lines } => success(&format!(
            "{} written to {} ({} {})",
            what,
            path.display(),
            lines,
            if *lines == 1 { "line" } else { "lines" }
        )),
        GenerateOutcome::Skipped => dim(&format!("{} skipped: no git metadata", what)),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_written_outcome() {
        console::set_colors_enabled(false);
        let written = GenerateOutcome::Written {
            path: PathBuf::from("/src/widget/AUTHORS"),
            lines: 3,
        };
        assert_eq!(
            outcome("AUTHORS", &written),
            "✓ AUTHORS written to /src/widget/AUTHORS (3 lines)"
        );

        let single = GenerateOutcome::Written {
            path: PathBuf::from("ChangeLog"),
            lines: 1,
        };
        assert_eq!(outcome("ChangeLog", &single), "✓ ChangeLog written to ChangeLog (1 line)");
    }

    #[test]
    fn test_skipped_outcome() {
        console::set_colors_enabled(false);
        assert_eq!(
            outcome("ChangeLog", &GenerateOutcome::Skipped),
            "ChangeLog skipped: no git metadata"
        );
    }
}
