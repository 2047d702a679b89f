//! Recursive-descent parser: tokens -> AST.
//!
//! Grammar (informal):
//!
//! ```text
//! Input      := Sequence EOF
//! Sequence   := Compound ((';' | NEWLINE)+ Compound)*
//! Compound   := Pipeline Redirects
//! Pipeline   := Command ('|' Command)*
//! Command    := ASSIGNMENT | WORD Args
//! Args       := (WORD | STRING | VARIABLE)*
//! Redirects  := ('<' WORD)? (('>' | '>>') WORD)?
//! ```
//!
//! Parenthesized grouping is intentionally not part of this grammar: `(`
//! and `)` lex as operator tokens but have no production that accepts
//! them, so they only ever appear validly inside a quoted string (used by
//! `test`/`[` expressions that need literal parens as arguments).

use super::ast::{Arg, CommandNode, Compound, CompoundInner, Node, RedirectMode};
use super::error::SyntaxError;
use super::lexer::Lexer;
use super::token::{Token, TokenKind};

/// Recursion guard for nested sequences, well below the point where a
/// legitimate script would ever bottom out.
const MAX_PARSE_DEPTH: usize = 200;

pub fn parse(input: &str) -> Result<Node, SyntaxError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    if parser.current().kind == TokenKind::Eof {
        return Ok(Node::Empty);
    }
    let node = parser.parse_sequence()?;
    let eof = parser.current();
    if eof.kind != TokenKind::Eof {
        return Err(SyntaxError::new(
            format!("unexpected token {} after end of command", eof.kind.describe()),
            eof.line,
            eof.column,
        ));
    }
    Ok(node)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn enter(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            let tok = self.current();
            return Err(SyntaxError::new("exceeded maximum nesting depth", tok.line, tok.column));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_sequence(&mut self) -> Result<Node, SyntaxError> {
        self.enter()?;
        let mut items = vec![self.parse_compound()?];
        while matches!(self.current().kind, TokenKind::Semicolon | TokenKind::Newline) {
            while matches!(self.current().kind, TokenKind::Semicolon | TokenKind::Newline) {
                self.advance();
            }
            if self.current().kind == TokenKind::Eof {
                break;
            }
            items.push(self.parse_compound()?);
        }
        self.leave();
        if items.len() == 1 {
            Ok(items.pop().unwrap())
        } else {
            Ok(Node::Sequence(items))
        }
    }

    fn parse_compound(&mut self) -> Result<Node, SyntaxError> {
        if self.current().kind == TokenKind::Assignment {
            let tok = self.advance();
            let (name, value) = split_assignment(&tok.text);
            return Ok(Node::Assignment { name, value });
        }

        let stages = self.parse_pipeline()?;
        let (stdin_file, stdout_redirect) = self.parse_redirects()?;

        if stdin_file.is_none() && stdout_redirect.is_none() {
            return Ok(if stages.len() == 1 {
                Node::Command(stages.into_iter().next().unwrap())
            } else {
                Node::Pipeline(stages)
            });
        }

        let inner = if stages.len() == 1 {
            CompoundInner::Command(stages.into_iter().next().unwrap())
        } else {
            CompoundInner::Pipeline(stages)
        };
        Ok(Node::Compound(Box::new(Compound {
            inner,
            stdin_file,
            stdout_redirect,
        })))
    }

    fn parse_pipeline(&mut self) -> Result<Vec<CommandNode>, SyntaxError> {
        let mut stages = vec![self.parse_command()?];
        while self.current().kind == TokenKind::Pipe {
            self.advance();
            stages.push(self.parse_command()?);
        }
        Ok(stages)
    }

    fn parse_command(&mut self) -> Result<CommandNode, SyntaxError> {
        let tok = self.current().clone();
        if tok.kind != TokenKind::Word {
            return Err(unexpected(&tok, "expected a command name"));
        }
        self.advance();
        let mut args = Vec::new();
        loop {
            let t = self.current();
            match t.kind {
                TokenKind::Word | TokenKind::Str => {
                    let t = self.advance();
                    args.push(Arg::Literal(t.text));
                }
                TokenKind::Variable => {
                    let t = self.advance();
                    args.push(Arg::VariableRef(t.text));
                }
                _ => break,
            }
        }
        Ok(CommandNode { name: tok.text, args })
    }

    fn parse_redirects(&mut self) -> Result<(Option<String>, Option<(String, RedirectMode)>), SyntaxError> {
        let mut stdin_file = None;
        let mut stdout_redirect = None;

        if self.current().kind == TokenKind::RedirectIn {
            let op = self.advance();
            let file = self.expect_word_filename(&op, "<")?;
            stdin_file = Some(file);
        }

        if matches!(self.current().kind, TokenKind::RedirectOut | TokenKind::RedirectAppend) {
            let op = self.advance();
            let mode = if op.kind == TokenKind::RedirectAppend {
                RedirectMode::Append
            } else {
                RedirectMode::Write
            };
            let symbol = if op.kind == TokenKind::RedirectAppend { ">>" } else { ">" };
            let file = self.expect_word_filename(&op, symbol)?;
            stdout_redirect = Some((file, mode));
        }

        Ok((stdin_file, stdout_redirect))
    }

    fn expect_word_filename(&mut self, op: &Token, symbol: &str) -> Result<String, SyntaxError> {
        let t = self.current().clone();
        if t.kind != TokenKind::Word {
            return Err(SyntaxError::new(
                format!("missing filename after {}", symbol),
                op.line,
                op.column,
            ));
        }
        self.advance();
        Ok(t.text)
    }
}

fn split_assignment(raw: &str) -> (String, String) {
    match raw.split_once('=') {
        Some((name, value)) => (name.to_string(), value.to_string()),
        None => (raw.to_string(), String::new()),
    }
}

fn unexpected(tok: &Token, context: &str) -> SyntaxError {
    SyntaxError::new(
        format!("{}, found {}", context, tok.kind.describe()),
        tok.line,
        tok.column,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(parse("").unwrap(), Node::Empty);
        assert_eq!(parse("   ").unwrap(), Node::Empty);
    }

    #[test]
    fn single_command() {
        let node = parse("echo hello").unwrap();
        assert_eq!(
            node,
            Node::Command(CommandNode {
                name: "echo".into(),
                args: vec![Arg::Literal("hello".into())]
            })
        );
    }

    #[test]
    fn assignment_alone() {
        let node = parse("FOO=bar").unwrap();
        assert_eq!(
            node,
            Node::Assignment {
                name: "FOO".into(),
                value: "bar".into()
            }
        );
    }

    #[test]
    fn sequence_of_assignment_then_command() {
        let node = parse("NAME=world; echo hello $NAME").unwrap();
        match node {
            Node::Sequence(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(
                    items[0],
                    Node::Assignment {
                        name: "NAME".into(),
                        value: "world".into()
                    }
                );
                assert_eq!(
                    items[1],
                    Node::Command(CommandNode {
                        name: "echo".into(),
                        args: vec![Arg::Literal("hello".into()), Arg::VariableRef("NAME".into())]
                    })
                );
            }
            other => panic!("expected Sequence, got {:?}", other),
        }
    }

    #[test]
    fn pipeline_of_three() {
        let node = parse("cat f | grep ap | sort").unwrap();
        match node {
            Node::Pipeline(stages) => assert_eq!(stages.len(), 3),
            other => panic!("expected Pipeline, got {:?}", other),
        }
    }

    #[test]
    fn compound_with_both_redirects() {
        let node = parse("sort < in.txt > out.txt").unwrap();
        match node {
            Node::Compound(c) => {
                assert_eq!(c.stdin_file.as_deref(), Some("in.txt"));
                assert_eq!(c.stdout_redirect.as_ref().unwrap().0, "out.txt");
                assert_eq!(c.stdout_redirect.as_ref().unwrap().1, RedirectMode::Write);
            }
            other => panic!("expected Compound, got {:?}", other),
        }
    }

    #[test]
    fn append_redirect_mode() {
        let node = parse("echo hi >> log.txt").unwrap();
        match node {
            Node::Compound(c) => {
                assert_eq!(c.stdout_redirect.as_ref().unwrap().1, RedirectMode::Append);
            }
            other => panic!("expected Compound, got {:?}", other),
        }
    }

    #[test]
    fn missing_filename_after_redirect_is_error() {
        let err = parse("cat >").unwrap_err();
        assert!(err.message.contains("missing filename"));
    }

    #[test]
    fn pipe_with_no_following_command_is_error() {
        let err = parse("echo a |").unwrap_err();
        assert!(err.message.contains("expected a command name"));
    }

    #[test]
    fn trailing_semicolon_is_tolerated() {
        let node = parse("echo a;").unwrap();
        assert_eq!(
            node,
            Node::Command(CommandNode {
                name: "echo".into(),
                args: vec![Arg::Literal("a".into())]
            })
        );
    }
}
