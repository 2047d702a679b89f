use async_trait::async_trait;

use super::registry::{BuiltinCommand, Category};
use super::schema::CommandSchema;
use crate::fs::EntryKind;
use crate::shell::{CommandContext, Shell, ShellError};

pub struct FindCommand;

#[async_trait]
impl BuiltinCommand for FindCommand {
    fn name(&self) -> &'static str {
        "find"
    }

    fn category(&self) -> Category {
        Category::Filesystem
    }

    fn schema(&self) -> CommandSchema {
        CommandSchema::new("walk a directory subtree")
            .option("name", None, "filter by basename, '*'/'?' wildcards supported")
            .option("type", None, "filter by entry type: 'f' (file) or 'd' (directory)")
            .positional("starting path (default: cwd)")
            .example("find /home -name '*.txt'")
    }

    async fn run(&self, argv: &[String], shell: &mut Shell, ctx: &mut CommandContext) -> Result<i32, ShellError> {
        let (start, name_pattern, type_filter) = parse_find_args(argv)?;
        let start_path = shell.resolve(&start);

        if !shell.fs.exists(&start_path).await {
            ctx.error(&format!("find: '{}': No such file or directory", start));
            return Ok(1);
        }

        let mut out = Vec::new();
        walk(shell, &start_path, &name_pattern, &type_filter, &mut out).await;
        for path in out {
            ctx.writeln(&path);
        }
        Ok(0)
    }
}

fn parse_find_args(argv: &[String]) -> Result<(String, Option<String>, Option<char>), ShellError> {
    let mut start = None;
    let mut name_pattern = None;
    let mut type_filter = None;
    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-name" => {
                i += 1;
                let pattern = argv
                    .get(i)
                    .ok_or_else(|| ShellError::Usage("find: -name requires an argument".to_string()))?;
                name_pattern = Some(pattern.clone());
            }
            "-type" => {
                i += 1;
                let kind = argv
                    .get(i)
                    .ok_or_else(|| ShellError::Usage("find: -type requires an argument".to_string()))?;
                type_filter = Some(
                    kind.chars()
                        .next()
                        .ok_or_else(|| ShellError::Usage("find: -type requires f or d".to_string()))?,
                );
            }
            other if start.is_none() => start = Some(other.to_string()),
            other => return Err(ShellError::Usage(format!("find: unexpected argument '{}'", other))),
        }
        i += 1;
    }
    Ok((start.unwrap_or_else(|| ".".to_string()), name_pattern, type_filter))
}

/// Depth-first, parent-before-children walk. Directories that fail to
/// read are skipped rather than aborting the whole walk (spec.md §4.7).
fn walk<'a>(
    shell: &'a Shell,
    path: &'a str,
    name_pattern: &'a Option<String>,
    type_filter: &'a Option<char>,
    out: &'a mut Vec<String>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
        let stat = match shell.fs.stat(path).await {
            Ok(stat) => stat,
            Err(_) => return,
        };

        if entry_matches(path, stat.kind, name_pattern, type_filter) {
            out.push(path.to_string());
        }

        if stat.kind != EntryKind::Directory {
            return;
        }

        let Ok(children) = shell.fs.readdir(path).await else { return };
        for child in children {
            let child_path = if path == "/" {
                format!("/{}", child.name)
            } else {
                format!("{}/{}", path, child.name)
            };
            walk(shell, &child_path, name_pattern, type_filter, out).await;
        }
    })
}

fn entry_matches(path: &str, kind: EntryKind, name_pattern: &Option<String>, type_filter: &Option<char>) -> bool {
    if let Some(expected) = type_filter {
        let matches_type = match expected {
            'f' => kind == EntryKind::File,
            'd' => kind == EntryKind::Directory,
            _ => true,
        };
        if !matches_type {
            return false;
        }
    }
    if let Some(pattern) = name_pattern {
        let name = crate::fs::basename(path);
        if !wildcard_match(pattern, name) {
            return false;
        }
    }
    true
}

/// Minimal glob matcher for `-name`: `*` matches any run of characters,
/// `?` matches exactly one.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    fn helper(p: &[char], t: &[char]) -> bool {
        match p.first() {
            None => t.is_empty(),
            Some('*') => helper(&p[1..], t) || (!t.is_empty() && helper(p, &t[1..])),
            Some('?') => !t.is_empty() && helper(&p[1..], &t[1..]),
            Some(c) => t.first() == Some(c) && helper(&p[1..], &t[1..]),
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    helper(&p, &t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::test_support::{new_shell, redirected_ctx};

    #[test]
    fn wildcard_matches_star_and_question() {
        assert!(wildcard_match("*.txt", "a.txt"));
        assert!(!wildcard_match("*.txt", "a.md"));
        assert!(wildcard_match("a?c", "abc"));
        assert!(!wildcard_match("a?c", "abbc"));
    }

    #[tokio::test]
    async fn find_walks_depth_first_parent_before_children() {
        let mut shell = new_shell();
        shell.fs.mkdir("/a", false).await.unwrap();
        shell.fs.write_file("/a/f.txt", "x").await.unwrap();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke("find", &["/a".to_string()], &mut shell, &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "/a\n/a/f.txt");
    }

    #[tokio::test]
    async fn find_filters_by_name_pattern() {
        let mut shell = new_shell();
        shell.fs.write_file("/tmp/a.txt", "x").await.unwrap();
        shell.fs.write_file("/tmp/b.md", "x").await.unwrap();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke(
                "find",
                &["/tmp".to_string(), "-name".to_string(), "*.txt".to_string()],
                &mut shell,
                &mut ctx,
            )
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "/tmp/a.txt");
    }

    #[tokio::test]
    async fn find_filters_by_type() {
        let mut shell = new_shell();
        shell.fs.mkdir("/tmp/d", false).await.unwrap();
        shell.fs.write_file("/tmp/f", "x").await.unwrap();
        let mut ctx = redirected_ctx(None);
        shell
            .registry
            .clone()
            .invoke(
                "find",
                &["/tmp".to_string(), "-type".to_string(), "d".to_string()],
                &mut shell,
                &mut ctx,
            )
            .await
            .unwrap();
        assert_eq!(ctx.get_stdout(), "/tmp/d");
    }
}
