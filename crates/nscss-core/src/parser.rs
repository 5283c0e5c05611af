//! Recursive-descent parsing of the token stream into a rule tree.
//!
//! The grammar is small enough that every position needs only the
//! current token kind to decide how to proceed. Any token that is
//! lexically possible but not handled at a position is rejected as
//! `NotImplemented`.

use crate::ast::{Declaration, StyleRule, Stylesheet, Variable};
use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{token_text, Token, TokenKind};

/// Parse a tokenized stylesheet. `source` must be the exact input the
/// tokens were produced from, since lexemes are recovered by slicing.
pub fn parse<'src>(tokens: Vec<Token>, source: &'src str) -> CompileResult<Stylesheet<'src>> {
    let mut cursor = TokenCursor::new(tokens, source);
    let mut sheet = Stylesheet::default();

    loop {
        match cursor.peek().kind {
            TokenKind::EndOfFile => break,
            TokenKind::VariableName => {
                let variable = parse_variable(&mut cursor)?;
                sheet.variables.push(variable);
            }
            TokenKind::Selector => {
                let rule = parse_style_rule(&mut cursor, &sheet.variables)?;
                sheet.rules.push(rule);
            }
            _ => return Err(CompileError::NotImplemented),
        }
    }

    Ok(sheet)
}

/// Cursor over the buffered token array. The tokenizer guarantees a
/// trailing `EndOfFile`, and the cursor clamps there, so reading past
/// the end keeps returning it.
struct TokenCursor<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
}

impl<'src> TokenCursor<'src> {
    fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|token| token.kind),
            Some(TokenKind::EndOfFile)
        ));
        Self { tokens, pos: 0, source }
    }

    fn peek(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn eat(&mut self) -> Token {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        let token = self.eat();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(CompileError::NotImplemented)
        }
    }

    fn lexeme(&self, token: &Token) -> &'src str {
        token_text(token, self.source)
    }
}

fn parse_variable<'src>(cursor: &mut TokenCursor<'src>) -> CompileResult<Variable<'src>> {
    let name = cursor.expect(TokenKind::VariableName)?;
    let value = cursor.expect(TokenKind::VariableValue)?;
    cursor.expect(TokenKind::EndStatement)?;
    Ok(Variable {
        name: cursor.lexeme(&name),
        value: cursor.lexeme(&value),
    })
}

fn parse_declaration<'src>(cursor: &mut TokenCursor<'src>) -> CompileResult<Declaration<'src>> {
    let property = cursor.expect(TokenKind::PropertyName)?;
    let value = cursor.expect(TokenKind::PropertyValue)?;
    cursor.expect(TokenKind::EndStatement)?;
    Ok(Declaration {
        property: cursor.lexeme(&property),
        value: cursor.lexeme(&value),
    })
}

/// Parse one rule. The rule's variable list starts as a copy of the
/// parent environment; declarations inside the block are appended, and
/// nested rules receive the list as it stands when they open, so every
/// rule ends up with the full snapshot of bindings visible to it.
fn parse_style_rule<'src>(
    cursor: &mut TokenCursor<'src>,
    parent_variables: &[Variable<'src>],
) -> CompileResult<StyleRule<'src>> {
    let selector = cursor.expect(TokenKind::Selector)?;
    cursor.expect(TokenKind::BlockStart)?;

    let mut rule = StyleRule {
        selector: cursor.lexeme(&selector),
        declarations: Vec::new(),
        children: Vec::new(),
        variables: parent_variables.to_vec(),
    };

    loop {
        match cursor.peek().kind {
            TokenKind::VariableName => {
                let variable = parse_variable(cursor)?;
                rule.variables.push(variable);
            }
            TokenKind::PropertyName => {
                let declaration = parse_declaration(cursor)?;
                rule.declarations.push(declaration);
            }
            TokenKind::Selector => {
                let child = parse_style_rule(cursor, &rule.variables)?;
                rule.children.push(child);
            }
            TokenKind::BlockEnd => {
                cursor.eat();
                return Ok(rule);
            }
            _ => return Err(CompileError::NotImplemented),
        }
    }
}
