use anyhow::{Context, Result};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize, // 1-based, in the full file
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub lines: Vec<SourceLine>,
}

/// Keep `len` lines (default: all) after skipping `skip`; numbering stays
/// relative to the full text.
pub fn window(name: &str, text: &str, skip: usize, len: Option<usize>) -> Result<Source> {
    let all: Vec<&str> = text.lines().collect();
    anyhow::ensure!(skip <= all.len(), "--skip exceeds line count ({})", all.len());
    let mut rest = &all[skip..];
    if let Some(lim) = len {
        anyhow::ensure!(lim <= rest.len(), "--len exceeds remaining lines after skip");
        rest = &rest[..lim];
    }
    let lines = rest
        .iter()
        .enumerate()
        .map(|(i, t)| SourceLine { number: skip + i + 1, text: t.to_string() })
        .collect();
    Ok(Source { name: name.to_string(), lines })
}

pub fn load_source(path: &Path, skip: usize, len: Option<usize>) -> Result<Source> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    window(&path.display().to_string(), &text, skip, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_windows_skip_and_len() {
        let path = std::env::temp_dir().join("_dspsim_trace_window.asm");
        std::fs::write(&path, "NOP\nLD #1, A\nLD #2, B\nNOP\n").unwrap();
        let src = load_source(&path, 1, Some(2)).unwrap();
        assert_eq!(src.lines.len(), 2);
        assert_eq!(src.lines[0], SourceLine { number: 2, text: "LD #1, A".into() });
        assert_eq!(src.lines[1].number, 3);
        assert!(load_source(&path, 5, None).is_err());
        assert!(load_source(&path, 2, Some(3)).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = std::env::temp_dir().join("_dspsim_trace_missing.asm");
        let _ = std::fs::remove_file(&path);
        let err = load_source(&path, 0, None).unwrap_err();
        assert!(err.to_string().contains("_dspsim_trace_missing.asm"), "{err}");
    }
}
