//! Path helpers shared across the application.

use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` and `$VAR` / `${VAR}` references in a pattern.
///
/// The home directory is passed in rather than read from the process so
/// callers (and tests) decide what `~` means. Unknown variables are left
/// untouched.
///
/// # Example
/// ```
/// use std::path::Path;
/// use context_zones::util::expand_home;
///
/// let expanded = expand_home("~/Projects", Some(Path::new("/home/ada")));
/// assert_eq!(expanded, "/home/ada/Projects");
/// ```
pub fn expand_home(input: &str, home: Option<&Path>) -> String {
    shellexpand::full_with_context_no_errors(
        input,
        || home.and_then(Path::to_str),
        |var| std::env::var(var).ok(),
    )
    .into_owned()
}

/// Remove `.` components and fold `..` into its parent without touching the
/// filesystem.
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    out.iter().map(|c| c.as_os_str()).collect()
}

/// Resolve a path to canonical form where it exists.
///
/// The longest existing prefix of the path as given is canonicalized, so a
/// `..` that follows a symlink is resolved against the link target. The
/// non-existent remainder is appended and cleaned lexically, so paths that do
/// not exist yet still normalize deterministically.
pub fn normalize_path(path: &Path) -> PathBuf {
    let components: Vec<Component<'_>> = path.components().collect();

    for split in (1..=components.len()).rev() {
        let head: PathBuf = components[..split].iter().collect();
        if let Ok(canonical) = std::fs::canonicalize(&head) {
            let tail: PathBuf = components[split..].iter().collect();
            return lexical_clean(&canonical.join(tail));
        }
    }

    lexical_clean(path)
}

/// Split a path into its named segments, dropping the root and any empty
/// segments produced by repeated or trailing separators.
pub fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_tilde() {
        let home = Path::new("/home/ada");
        assert_eq!(expand_home("~", Some(home)), "/home/ada");
        assert_eq!(expand_home("~/Code", Some(home)), "/home/ada/Code");
        // Only a leading tilde is special
        assert_eq!(expand_home("/tmp/~x", Some(home)), "/tmp/~x");
    }

    #[test]
    fn test_expand_home_without_home_is_identity() {
        assert_eq!(expand_home("~/Code", None), "~/Code");
    }

    #[test]
    fn test_expand_unknown_variable_left_alone() {
        assert_eq!(
            expand_home("/data/$CONTEXT_ZONES_SURELY_UNSET_VAR/x", None),
            "/data/$CONTEXT_ZONES_SURELY_UNSET_VAR/x"
        );
    }

    #[test]
    fn test_lexical_clean() {
        assert_eq!(
            lexical_clean(Path::new("/a/./b/../c/")),
            PathBuf::from("/a/c")
        );
        assert_eq!(lexical_clean(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(lexical_clean(Path::new("../x")), PathBuf::from("../x"));
    }

    #[test]
    fn test_normalize_nonexistent_tail() {
        let dir = tempfile::tempdir().unwrap();
        let base = std::fs::canonicalize(dir.path()).unwrap();
        let input = dir.path().join("not").join("there").join("..").join("here");
        assert_eq!(normalize_path(&input), base.join("not").join("here"));
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_parent_of_symlink_is_physical() {
        let dir = tempfile::tempdir().unwrap();
        let base = std::fs::canonicalize(dir.path()).unwrap();
        std::fs::create_dir_all(base.join("real").join("deep")).unwrap();
        std::os::unix::fs::symlink(base.join("real").join("deep"), base.join("link")).unwrap();

        assert_eq!(normalize_path(&base.join("link").join("..")), base.join("real"));
        assert_eq!(
            normalize_path(&base.join("link").join("..").join("missing")),
            base.join("real").join("missing")
        );
    }

    #[test]
    fn test_path_segments_drop_empty() {
        assert_eq!(
            path_segments(Path::new("/home//ada/Projects/")),
            vec!["home", "ada", "Projects"]
        );
        assert_eq!(
            path_segments(Path::new("*/.worktrees/*")),
            vec!["*", ".worktrees", "*"]
        );
    }
}
