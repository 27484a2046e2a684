//! Recursive traversal: `walk` and `glob`

use crate::path::ArtifactoryPath;
use crate::pure;
use artpath_core::{ArtifactoryError, Result};
use tracing::warn;

/// One directory visited by [`ArtifactoryPath::walk`]
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub dir: ArtifactoryPath,
    pub dirnames: Vec<String>,
    pub filenames: Vec<String>,
}

impl ArtifactoryPath {
    /// Walk the tree rooted at this directory.
    ///
    /// Returns one entry per directory, parents before children when
    /// `top_down`, children before parents otherwise. Siblings keep server
    /// order. Folders that vanish while walking are skipped.
    pub async fn walk(&self, top_down: bool) -> Result<Vec<WalkEntry>> {
        let mut entries = Vec::new();
        let mut stack = vec![self.clone()];

        while let Some(dir) = stack.pop() {
            let children = match dir.iterdir().await {
                Ok(children) => children,
                Err(err) if dir != *self && err.is_not_found() => {
                    warn!(path = %dir, "Directory disappeared during walk");
                    continue;
                }
                Err(err) => return Err(err),
            };

            let mut dirnames = Vec::new();
            let mut filenames = Vec::new();
            let mut subdirs = Vec::new();
            for child in children {
                if child.is_dir().await? {
                    dirnames.push(child.name().to_string());
                    subdirs.push(child);
                } else {
                    filenames.push(child.name().to_string());
                }
            }

            // Bottom-up order is the reverse of a pre-order visit that takes
            // siblings last-to-first.
            if top_down {
                stack.extend(subdirs.into_iter().rev());
            } else {
                stack.extend(subdirs);
            }

            entries.push(WalkEntry {
                dir,
                dirnames,
                filenames,
            });
        }

        if !top_down {
            entries.reverse();
        }
        Ok(entries)
    }

    /// Descendants matching a relative glob pattern.
    ///
    /// Components support `*`, `?` and `[...]`; a `**` component matches any
    /// number of directories, including none. A trailing `/` restricts
    /// matches to directories.
    pub async fn glob(&self, pattern: &str) -> Result<Vec<ArtifactoryPath>> {
        if pattern.is_empty() {
            return Err(ArtifactoryError::InvalidPath(format!(
                "Unacceptable pattern: {pattern:?}"
            )));
        }
        if pure::is_absolute(pattern) {
            return Err(ArtifactoryError::unsupported(
                "Non-relative patterns are unsupported",
            ));
        }

        let dirs_only = pattern.ends_with(pure::SEP);
        let pattern = pattern.trim_end_matches(pure::SEP);
        let components: Vec<&str> = pattern
            .split(pure::SEP)
            .filter(|c| !c.is_empty())
            .collect();

        if components.contains(&"**") {
            self.glob_recursive(pattern, dirs_only).await
        } else {
            self.glob_levels(&components, dirs_only).await
        }
    }

    /// Match component by component, listing only the directories needed
    async fn glob_levels(&self, components: &[&str], dirs_only: bool) -> Result<Vec<ArtifactoryPath>> {
        let mut current = vec![self.clone()];

        for (i, component) in components.iter().enumerate() {
            let last = i + 1 == components.len();
            let need_dir = !last || dirs_only;
            let mut next = Vec::new();

            if !pure::has_magic(component) {
                for dir in current {
                    let candidate = dir.joinpath(component);
                    let keep = if need_dir {
                        candidate.is_dir().await?
                    } else {
                        candidate.exists().await?
                    };
                    if keep {
                        next.push(candidate);
                    }
                }
            } else {
                let matcher = pure::compile_pattern(component)?;
                for dir in current {
                    let children = match dir.iterdir().await {
                        Ok(children) => children,
                        Err(ArtifactoryError::NotFound(_) | ArtifactoryError::NotADirectory(_)) => {
                            continue;
                        }
                        Err(err) => return Err(err),
                    };
                    for child in children {
                        if !matcher.matches_with(child.name(), pure::match_options()) {
                            continue;
                        }
                        if need_dir && !child.is_dir().await? {
                            continue;
                        }
                        next.push(child);
                    }
                }
            }

            current = next;
        }

        Ok(current)
    }

    /// Walk the whole subtree and match relative paths against the pattern
    async fn glob_recursive(&self, pattern: &str, dirs_only: bool) -> Result<Vec<ArtifactoryPath>> {
        let matcher = pure::compile_pattern(pattern)?;
        let mut matches = Vec::new();

        for entry in self.walk(true).await? {
            let relative = pure::relative_to(entry.dir.as_str(), self.as_str())?;
            let files: &[String] = if dirs_only { &[] } else { &entry.filenames };

            for name in entry.dirnames.iter().chain(files) {
                let candidate = pure::join([relative.as_str(), name.as_str()]);
                if matcher.matches_with(&candidate, pure::match_options()) {
                    matches.push(entry.dir.joinpath(name));
                }
            }
        }

        Ok(matches)
    }
}
