//! Shared flag parser used by every builtin: `--long`, `-s`,
//! `--long=value`, `-s value`, and combined short flags (`-la` ≡ `-l -a`).

use std::collections::HashMap;

use super::schema::CommandSchema;

#[derive(Debug, Default)]
pub struct ParsedArgs {
    pub flags: HashMap<&'static str, bool>,
    pub options: HashMap<&'static str, String>,
    pub positional: Vec<String>,
}

impl ParsedArgs {
    pub fn has(&self, long: &str) -> bool {
        self.flags.get(long).copied().unwrap_or(false)
    }

    pub fn option(&self, long: &str) -> Option<&str> {
        self.options.get(long).map(String::as_str)
    }
}

/// `true` iff `argv` contains a bare `-h` or `--help` token. Checked by the
/// registry before any builtin-specific parsing runs, so help always
/// short-circuits regardless of what else is on the line.
pub fn wants_help(argv: &[String]) -> bool {
    argv.iter().any(|a| a == "-h" || a == "--help")
}

/// Parse `argv` against the boolean/value flags declared in `schema`.
/// Unknown `-x`/`--xyz` tokens are a usage error; unknown combined short
/// flags likewise. Everything else (bare words, `--`, values) is
/// positional.
pub fn parse_args(argv: &[String], schema: &CommandSchema) -> Result<ParsedArgs, String> {
    let mut result = ParsedArgs::default();
    let mut iter = argv.iter().peekable();
    let mut positional_only = false;

    while let Some(arg) = iter.next() {
        if positional_only {
            result.positional.push(arg.clone());
            continue;
        }
        if arg == "--" {
            positional_only = true;
            continue;
        }
        if let Some(rest) = arg.strip_prefix("--") {
            if let Some((long, value)) = rest.split_once('=') {
                if schema.options.contains_key(long) {
                    result.options.insert(
                        schema.options.get_key_value(long).unwrap().0,
                        value.to_string(),
                    );
                    continue;
                }
                return Err(format!("unknown option --{}", long));
            }
            if let Some((long, _)) = schema.flags.get_key_value(rest) {
                result.flags.insert(long, true);
                continue;
            }
            if let Some((long, _)) = schema.options.get_key_value(rest) {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("option --{} requires a value", rest))?;
                result.options.insert(long, value.clone());
                continue;
            }
            return Err(format!("unknown option --{}", rest));
        }
        if arg.starts_with('-') && arg.len() > 1 {
            let chars: Vec<char> = arg.chars().skip(1).collect();
            let mut i = 0;
            while i < chars.len() {
                let c = chars[i];
                if let Some((long, _)) = flag_by_short(&schema.flags, c) {
                    result.flags.insert(long, true);
                    i += 1;
                    continue;
                }
                if let Some((long, _)) = option_by_short(&schema.options, c) {
                    // Remaining characters in this token are the value
                    // (`-n10`), otherwise the next argv token is.
                    let rest: String = chars[i + 1..].iter().collect();
                    if !rest.is_empty() {
                        result.options.insert(long, rest);
                    } else {
                        let value = iter
                            .next()
                            .ok_or_else(|| format!("option -{} requires a value", c))?;
                        result.options.insert(long, value.clone());
                    }
                    break;
                }
                return Err(format!("unknown option -{}", c));
            }
            continue;
        }
        result.positional.push(arg.clone());
    }

    Ok(result)
}

fn flag_by_short<'a>(
    flags: &'a indexmap::IndexMap<&'static str, super::schema::FlagSpec>,
    c: char,
) -> Option<(&'static str, &'a super::schema::FlagSpec)> {
    flags.iter().find(|(_, spec)| spec.short == Some(c)).map(|(k, v)| (*k, v))
}

fn option_by_short<'a>(
    options: &'a indexmap::IndexMap<&'static str, super::schema::OptionSpec>,
    c: char,
) -> Option<(&'static str, &'a super::schema::OptionSpec)> {
    options.iter().find(|(_, spec)| spec.short == Some(c)).map(|(k, v)| (*k, v))
}
