//! POSIX path algebra on plain strings.
//!
//! Paths are kept exactly as joined: no normalisation, so `"/repo/"` keeps
//! its trailing slash and `"a//b"` its double slash.

use artpath_core::{ArtifactoryError, Result};
use glob::{MatchOptions, Pattern};

pub const SEP: char = '/';

/// Join segments the way POSIX `join` does.
///
/// A segment starting with `/` discards everything before it; otherwise a
/// separator is inserted unless the accumulated path is empty or already
/// ends with one.
pub fn join<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::new();
    for (i, segment) in segments.into_iter().enumerate() {
        let segment = segment.as_ref();
        if i == 0 || segment.starts_with(SEP) {
            path.clear();
            path.push_str(segment);
        } else if path.is_empty() || path.ends_with(SEP) {
            path.push_str(segment);
        } else {
            path.push(SEP);
            path.push_str(segment);
        }
    }
    path
}

/// Split into `(head, tail)` where tail is everything after the last `/`.
///
/// Trailing slashes are stripped from head unless it consists only of slashes.
pub fn split(path: &str) -> (&str, &str) {
    let i = path.rfind(SEP).map_or(0, |i| i + 1);
    let (head, tail) = path.split_at(i);
    if !head.is_empty() && head.chars().any(|c| c != SEP) {
        (head.trim_end_matches(SEP), tail)
    } else {
        (head, tail)
    }
}

pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEP)
}

pub fn name(path: &str) -> &str {
    split(path).1
}

/// Final suffix of the name, including the dot, or `""`
pub fn suffix(path: &str) -> &str {
    let name = name(path);
    match name.rfind('.') {
        Some(i) if 0 < i && i < name.len() - 1 => &name[i..],
        _ => "",
    }
}

/// All suffixes of the name, e.g. `[".tar", ".gz"]`
pub fn suffixes(path: &str) -> Vec<String> {
    let name = name(path);
    if name.ends_with('.') {
        return Vec::new();
    }
    name.trim_start_matches('.')
        .split('.')
        .skip(1)
        .map(|s| format!(".{s}"))
        .collect()
}

/// Name without its final suffix
pub fn stem(path: &str) -> &str {
    let name = name(path);
    match name.rfind('.') {
        Some(i) if 0 < i && i < name.len() - 1 => &name[..i],
        _ => name,
    }
}

/// Parent path string; equal to `path` when there is no parent
pub fn parent(path: &str) -> &str {
    split(path).0
}

/// Anchor (`"/"` or `""`) followed by the non-empty components
pub fn parts(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    if is_absolute(path) {
        parts.push("/");
    }
    parts.extend(path.split(SEP).filter(|part| !part.is_empty()));
    parts
}

/// Path with its name replaced
pub fn with_name(path: &str, name: &str) -> Result<String> {
    if name.is_empty() || name.contains(SEP) {
        return Err(ArtifactoryError::InvalidPath(format!("Invalid name {name:?}")));
    }
    let current = self::name(path);
    if current.is_empty() {
        return Err(ArtifactoryError::InvalidPath(format!(
            "{path:?} has an empty name"
        )));
    }
    Ok(format!("{}{}", &path[..path.len() - current.len()], name))
}

/// Path with its stem replaced, keeping the suffix
pub fn with_stem(path: &str, stem: &str) -> Result<String> {
    let suffix = suffix(path);
    if suffix.is_empty() {
        with_name(path, stem)
    } else if stem.is_empty() {
        Err(ArtifactoryError::InvalidPath(format!(
            "{path:?} has a non-empty suffix"
        )))
    } else {
        with_name(path, &format!("{stem}{suffix}"))
    }
}

/// Path with its suffix replaced; an empty suffix removes it
pub fn with_suffix(path: &str, suffix: &str) -> Result<String> {
    let stem = stem(path);
    if stem.is_empty() {
        Err(ArtifactoryError::InvalidPath(format!(
            "{path:?} has an empty name"
        )))
    } else if (!suffix.is_empty() && !suffix.starts_with('.')) || suffix == "." {
        Err(ArtifactoryError::InvalidPath(format!(
            "Invalid suffix {suffix:?}"
        )))
    } else {
        with_name(path, &format!("{stem}{suffix}"))
    }
}

/// `path` relative to `other`, comparing components
pub fn relative_to(path: &str, other: &str) -> Result<String> {
    let ours = parts(path);
    let theirs = parts(other);
    if theirs.len() > ours.len() || ours[..theirs.len()] != theirs[..] {
        return Err(ArtifactoryError::InvalidPath(format!(
            "{path:?} is not in the subpath of {other:?}"
        )));
    }
    Ok(join(&ours[theirs.len()..]))
}

/// Whether a glob component contains wildcard characters
pub fn has_magic(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Options for matching Artifactory paths: case sensitive, `*` stops at `/`
pub fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Compile a glob pattern, mapping syntax errors to [`ArtifactoryError::InvalidPath`]
pub fn compile_pattern(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern)
        .map_err(|e| ArtifactoryError::InvalidPath(format!("Invalid pattern {pattern:?}: {e}")))
}

/// Whether the whole `path` matches the glob `pattern`
pub fn full_match(path: &str, pattern: &str) -> Result<bool> {
    Ok(compile_pattern(pattern)?.matches_with(path, match_options()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join(Vec::<&str>::new()), "");
        assert_eq!(join(["/repo"]), "/repo");
        assert_eq!(join(["/repo", "dir", "file"]), "/repo/dir/file");
        assert_eq!(join(["/repo/", "dir"]), "/repo/dir");
        assert_eq!(join(["/repo", "/other"]), "/other");
        assert_eq!(join(["repo", ""]), "repo/");
        assert_eq!(join(["", "repo"]), "repo");
        assert_eq!(join(["/repo//", "dir"]), "/repo//dir");
    }

    #[test]
    fn test_split() {
        assert_eq!(split("/repo/dir/file"), ("/repo/dir", "file"));
        assert_eq!(split("/repo/"), ("/repo", ""));
        assert_eq!(split("/repo"), ("/", "repo"));
        assert_eq!(split("/"), ("/", ""));
        assert_eq!(split("//"), ("//", ""));
        assert_eq!(split("file"), ("", "file"));
        assert_eq!(split("/repo//file"), ("/repo", "file"));
    }

    #[test]
    fn test_name_suffix_stem() {
        assert_eq!(name("/repo/lib.tar.gz"), "lib.tar.gz");
        assert_eq!(suffix("/repo/lib.tar.gz"), ".gz");
        assert_eq!(suffixes("/repo/lib.tar.gz"), vec![".tar", ".gz"]);
        assert_eq!(stem("/repo/lib.tar.gz"), "lib.tar");
        assert_eq!(suffix("/repo/.hidden"), "");
        assert_eq!(stem("/repo/.hidden"), ".hidden");
        assert_eq!(suffix("/repo/trailing."), "");
        assert!(suffixes("/repo/trailing.").is_empty());
        assert_eq!(name("/repo/"), "");
    }

    #[test]
    fn test_parent_and_parts() {
        assert_eq!(parent("/repo/dir/file"), "/repo/dir");
        assert_eq!(parent("/repo"), "/");
        assert_eq!(parent("/"), "/");
        assert_eq!(parent("file"), "");
        assert_eq!(parts("/repo/dir/"), vec!["/", "repo", "dir"]);
        assert_eq!(parts("repo/dir"), vec!["repo", "dir"]);
        assert!(parts("").is_empty());
    }

    #[test]
    fn test_with_name_and_suffix() {
        assert_eq!(with_name("/repo/a.jar", "b.pom").unwrap(), "/repo/b.pom");
        assert!(with_name("/repo/a.jar", "x/y").is_err());
        assert!(with_name("/repo/", "x").is_err());
        assert!(with_name("/repo/a", "").is_err());

        assert_eq!(with_suffix("/repo/a.jar", ".pom").unwrap(), "/repo/a.pom");
        assert_eq!(with_suffix("/repo/a.jar", "").unwrap(), "/repo/a");
        assert_eq!(with_suffix("/repo/a", ".sha1").unwrap(), "/repo/a.sha1");
        assert!(with_suffix("/repo/a.jar", "pom").is_err());
        assert!(with_suffix("/repo/a.jar", ".").is_err());

        assert_eq!(with_stem("/repo/a.jar", "b").unwrap(), "/repo/b.jar");
        assert!(with_stem("/repo/a.jar", "").is_err());
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(relative_to("/repo/dir/file", "/repo").unwrap(), "dir/file");
        assert_eq!(relative_to("/repo", "/repo/").unwrap(), "");
        assert!(relative_to("/repo/dir", "/other").is_err());
        assert!(relative_to("/repo", "/repo/dir").is_err());
    }

    #[test]
    fn test_full_match() {
        assert!(full_match("/repo/dir/lib.jar", "/repo/*/*.jar").unwrap());
        assert!(!full_match("/repo/dir/sub/lib.jar", "/repo/*/*.jar").unwrap());
        assert!(full_match("/repo/dir/sub/lib.jar", "/repo/**/*.jar").unwrap());
        assert!(!full_match("/repo/dir/LIB.JAR", "/repo/dir/*.jar").unwrap());
        assert!(full_match("/repo/a", "[").is_err());
    }

    #[test]
    fn test_has_magic() {
        assert!(has_magic("*.jar"));
        assert!(has_magic("lib-?.pom"));
        assert!(has_magic("[ab]"));
        assert!(!has_magic("plain"));
    }
}
