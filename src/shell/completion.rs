//! Tab-completion candidates (spec.md §6). This module only computes the
//! candidate set; the raw key handling ("Tab was pressed", inserting a
//! single match, laying out columns for multiple) is the interactive
//! terminal collaborator's job and out of this crate's scope (§1).

use super::state::Shell;

/// One completion outcome: the matches found, and the directory they were
/// resolved against (VFS matches only; command-name matches resolve
/// against nothing).
pub struct Completions {
    pub matches: Vec<String>,
}

impl Completions {
    /// `true` when there is exactly one candidate, the case a caller
    /// inserts automatically rather than listing.
    pub fn is_unique(&self) -> bool {
        self.matches.len() == 1
    }
}

/// Compute completions for `line` with the cursor at `cursor` (a byte
/// offset). Completes command names when the cursor falls in the first
/// word, otherwise VFS entries under the prefix's directory.
pub async fn complete(shell: &Shell, line: &str, cursor: usize) -> Completions {
    let cursor = cursor.min(line.len());
    let head = &line[..cursor];
    let first_word_end = line.find(char::is_whitespace).unwrap_or(line.len());

    if cursor <= first_word_end {
        return Completions {
            matches: complete_command_name(shell, head),
        };
    }

    let word_start = head.rfind(char::is_whitespace).map(|i| i + 1).unwrap_or(0);
    let prefix = &head[word_start..];
    Completions {
        matches: complete_path(shell, prefix).await,
    }
}

fn complete_command_name(shell: &Shell, prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = shell
        .registry
        .names()
        .into_iter()
        .filter(|name| name.starts_with(prefix))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

async fn complete_path(shell: &Shell, prefix: &str) -> Vec<String> {
    let (dir_part, name_prefix) = match prefix.rfind('/') {
        Some(idx) => (&prefix[..=idx], &prefix[idx + 1..]),
        None => ("", prefix),
    };
    let dir_part_for_resolve = if dir_part.is_empty() { "." } else { dir_part };
    let dir = shell.resolve(dir_part_for_resolve);

    let Ok(entries) = shell.fs.readdir(&dir).await else {
        return Vec::new();
    };

    let mut matches: Vec<String> = entries
        .into_iter()
        .filter(|e| e.name.starts_with(name_prefix))
        .filter(|e| name_prefix.starts_with('.') || !e.name.starts_with('.'))
        .map(|e| format!("{}{}", dir_part, e.name))
        .collect();
    matches.sort();
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_registry;
    use crate::fs::InMemoryFs;
    use std::sync::Arc;

    fn new_shell() -> Shell {
        Shell::new(Arc::new(InMemoryFs::new()), Arc::new(build_registry()))
    }

    #[tokio::test]
    async fn completes_command_names_in_first_word() {
        let shell = new_shell();
        let result = complete(&shell, "ec", 2).await;
        assert!(result.matches.contains(&"echo".to_string()));
    }

    #[tokio::test]
    async fn completes_vfs_entries_after_first_word() {
        let shell = new_shell();
        shell.fs.write_file("/home/report.txt", "x").await.unwrap();
        let line = "cat report";
        let result = complete(&shell, line, line.len()).await;
        assert_eq!(result.matches, vec!["report.txt".to_string()]);
        assert!(result.is_unique());
    }

    #[tokio::test]
    async fn hides_dotfiles_unless_prefix_starts_with_dot() {
        let shell = new_shell();
        shell.fs.write_file("/home/.hidden", "x").await.unwrap();
        shell.fs.write_file("/home/visible", "x").await.unwrap();
        let line = "cat ";
        let result = complete(&shell, line, line.len()).await;
        assert_eq!(result.matches, vec!["visible".to_string()]);

        let line = "cat .";
        let result = complete(&shell, line, line.len()).await;
        assert_eq!(result.matches, vec![".hidden".to_string()]);
    }
}
