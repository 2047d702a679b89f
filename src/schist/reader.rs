//! S-expression reader: tokenises by padding `(`/`)` with whitespace and
//! splitting on whitespace (spec.md §4.9), then parses tokens into
//! `Value`s.

use super::value::Value;
use super::SchistError;

fn tokenize(source: &str) -> Vec<String> {
    let padded = source.replace('(', " ( ").replace(')', " ) ");
    padded.split_whitespace().map(str::to_string).collect()
}

fn parse_atom(token: &str) -> Value {
    if let Some(stripped) = token.strip_prefix('\'') {
        return Value::Symbol(stripped.to_string());
    }
    if is_number_literal(token) {
        if let Ok(n) = token.parse::<f64>() {
            return Value::Number(n);
        }
    }
    Value::Symbol(token.to_string())
}

fn is_number_literal(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    if bytes[0] == b'-' {
        i += 1;
    }
    if i >= bytes.len() {
        return false;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
        i += 1;
    }
    seen_digit
}

/// Parse exactly one S-expression from `source`. Trailing tokens after the
/// first complete form are ignored (each call to `SchistCommand` feeds one
/// argument/line as one form).
pub fn read_one(source: &str) -> Result<Value, SchistError> {
    let tokens = tokenize(source);
    if tokens.is_empty() {
        return Err(SchistError::Syntax("empty input".to_string()));
    }
    let mut pos = 0;
    let value = read_form(&tokens, &mut pos)?;
    Ok(value)
}

fn read_form(tokens: &[String], pos: &mut usize) -> Result<Value, SchistError> {
    let token = tokens
        .get(*pos)
        .ok_or_else(|| SchistError::Syntax("unexpected end of input".to_string()))?;
    *pos += 1;

    match token.as_str() {
        "(" => {
            let mut items = Vec::new();
            loop {
                match tokens.get(*pos) {
                    None => return Err(SchistError::Syntax("unterminated list".to_string())),
                    Some(t) if t == ")" => {
                        *pos += 1;
                        break;
                    }
                    _ => items.push(read_form(tokens, pos)?),
                }
            }
            Ok(Value::List(items))
        }
        ")" => Err(SchistError::Syntax("unexpected ')'".to_string())),
        other => Ok(parse_atom(other)),
    }
}
