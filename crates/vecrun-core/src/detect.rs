use std::path::{Path, PathBuf};

/// Resolve a program name to an executable path. Names containing a path
/// separator are checked on disk as-is; bare names are searched on PATH and
/// a few fixed bin roots.
pub(crate) fn find_executable(program: &Path) -> Option<PathBuf> {
    let rendered = program.to_string_lossy();
    if rendered.trim().is_empty() {
        return None;
    }

    if rendered.contains('/') {
        return program.is_file().then(|| program.to_path_buf());
    }

    let mut candidates = Vec::new();

    if let Some(path_var) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&path_var) {
            candidates.push(dir.join(program));
        }
    }

    for root in fixed_bin_roots() {
        candidates.push(root.join(program));
    }

    candidates.into_iter().find(|candidate| candidate.is_file())
}

fn fixed_bin_roots() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/usr/local/bin"),
        PathBuf::from("/opt/homebrew/bin"),
        PathBuf::from("/usr/bin"),
        PathBuf::from("/bin"),
    ];

    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        roots.push(home.join(".local/bin"));
    }

    roots
}
