//! `--help` is always derived from a declared schema, never hand-rolled
//! by a builtin (spec.md §6): `description`, `flags`, `options`,
//! `positional`, `examples`, `notes`, `seeAlso`.

use indexmap::IndexMap;

/// A boolean switch, e.g. `-l`/`--long`.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    pub short: Option<char>,
    pub description: &'static str,
}

/// A switch that consumes a following value, e.g. `-n 10`/`--lines=10`.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub short: Option<char>,
    pub description: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct PositionalSpec {
    pub description: &'static str,
}

#[derive(Debug, Clone)]
pub struct CommandSchema {
    pub description: &'static str,
    pub flags: IndexMap<&'static str, FlagSpec>,
    pub options: IndexMap<&'static str, OptionSpec>,
    pub positional: PositionalSpec,
    pub examples: Vec<&'static str>,
    pub notes: Vec<&'static str>,
    pub see_also: Vec<&'static str>,
}

impl CommandSchema {
    pub fn new(description: &'static str) -> Self {
        CommandSchema {
            description,
            flags: IndexMap::new(),
            options: IndexMap::new(),
            positional: PositionalSpec::default(),
            examples: Vec::new(),
            notes: Vec::new(),
            see_also: Vec::new(),
        }
    }

    pub fn flag(mut self, long: &'static str, short: Option<char>, description: &'static str) -> Self {
        self.flags.insert(long, FlagSpec { short, description });
        self
    }

    pub fn option(mut self, long: &'static str, short: Option<char>, description: &'static str) -> Self {
        self.options.insert(long, OptionSpec { short, description });
        self
    }

    pub fn positional(mut self, description: &'static str) -> Self {
        self.positional = PositionalSpec { description };
        self
    }

    pub fn example(mut self, example: &'static str) -> Self {
        self.examples.push(example);
        self
    }

    pub fn note(mut self, note: &'static str) -> Self {
        self.notes.push(note);
        self
    }

    pub fn see_also(mut self, name: &'static str) -> Self {
        self.see_also.push(name);
        self
    }

    /// Render the usage text shown for `-h`/`--help`.
    pub fn render_help(&self, name: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} - {}\n\n", name, self.description));
        out.push_str(&format!("Usage: {}", name));
        if !self.flags.is_empty() || !self.options.is_empty() {
            out.push_str(" [OPTIONS]");
        }
        if !self.positional.description.is_empty() {
            out.push_str(" [ARGS...]");
        }
        out.push('\n');

        if !self.flags.is_empty() || !self.options.is_empty() {
            out.push_str("\nOptions:\n");
            for (long, flag) in &self.flags {
                let short = flag.short.map(|c| format!("-{}, ", c)).unwrap_or_default();
                out.push_str(&format!("  {}--{}  {}\n", short, long, flag.description));
            }
            for (long, opt) in &self.options {
                let short = opt.short.map(|c| format!("-{} VALUE, ", c)).unwrap_or_default();
                out.push_str(&format!("  {}--{}=VALUE  {}\n", short, long, opt.description));
            }
            out.push_str("  -h, --help  show this help message\n");
        }

        if !self.positional.description.is_empty() {
            out.push_str(&format!("\nArguments:\n  {}\n", self.positional.description));
        }

        if !self.examples.is_empty() {
            out.push_str("\nExamples:\n");
            for example in &self.examples {
                out.push_str(&format!("  {}\n", example));
            }
        }

        if !self.notes.is_empty() {
            out.push_str("\nNotes:\n");
            for note in &self.notes {
                out.push_str(&format!("  {}\n", note));
            }
        }

        if !self.see_also.is_empty() {
            out.push_str(&format!("\nSee also: {}\n", self.see_also.join(", ")));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_help_includes_description_and_flags() {
        let schema = CommandSchema::new("list directory contents")
            .flag("long", Some('l'), "use a long listing format")
            .flag("all", Some('a'), "show hidden entries")
            .positional("path to list (default: cwd)");
        let text = schema.render_help("ls");
        assert!(text.contains("ls - list directory contents"));
        assert!(text.contains("-l, --long"));
        assert!(text.contains("-a, --all"));
        assert!(text.contains("Arguments:"));
    }
}
