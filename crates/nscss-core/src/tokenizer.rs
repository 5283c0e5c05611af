//! Lexical analysis: a byte-driven state machine producing a flat token
//! stream.
//!
//! Every token carries the half-open byte range `[start, end)` that
//! produced it; the lexeme is recovered by slicing the source. Past the
//! end of input the cursor yields a `\0` sentinel, so every state winds
//! down through the same dispatch, and the stream always terminates
//! with a synthetic `EndOfFile` token.

use crate::error::{CompileError, CompileResult};

const NUL: u8 = 0;

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Selector,
    BlockStart,
    BlockEnd,
    PropertyName,
    PropertyValue,
    EndStatement,
    VariableName,
    VariableValue,
    EndOfFile,
}

/// A token kind plus the source range that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

/// Return the slice of the source that produced this token.
///
/// The synthetic `EndOfFile` token points one past the end of input and
/// yields an empty lexeme.
pub fn token_text<'src>(token: &Token, source: &'src str) -> &'src str {
    &source[token.start.min(source.len())..token.end.min(source.len())]
}

/// Lex the source into a token vector terminated by `EndOfFile`.
pub fn tokenize(source: &str) -> CompileResult<Vec<Token>> {
    Tokenizer::new(source).run()
}

/// Tokenizer states. `Selector` remembers where its token opened so the
/// lexeme can be closed once the follow byte is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Selector { start: usize },
    SelectorLookup,
    StartBlock,
    Done,
}

struct Tokenizer<'src> {
    input: &'src [u8],
    pos: usize,
    state: State,
    tokens: Vec<Token>,
}

impl<'src> Tokenizer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            input: source.as_bytes(),
            pos: 0,
            state: State::Start,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> CompileResult<Vec<Token>> {
        while self.state != State::Done {
            self.step()?;
        }
        let end = self.input.len();
        self.push(TokenKind::EndOfFile, end, end + 1);
        Ok(self.tokens)
    }

    /// One dispatch on the current state. Each state either consumes at
    /// least one byte, reaches `Done`, or fails, so the loop terminates.
    fn step(&mut self) -> CompileResult<()> {
        match self.state {
            State::Start => self.state_start(),
            State::Selector { start } => self.state_selector(start),
            State::SelectorLookup => self.state_selector_lookup(),
            State::StartBlock => self.state_block(),
            State::Done => Ok(()),
        }
    }

    fn current(&self) -> u8 {
        self.input.get(self.pos).copied().unwrap_or(NUL)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn eat_while(&mut self, predicate: impl Fn(u8) -> bool) {
        while self.pos < self.input.len() && predicate(self.input[self.pos]) {
            self.pos += 1;
        }
    }

    fn skip_spaces(&mut self) {
        self.eat_while(is_space);
    }

    fn skip_blanks(&mut self) {
        self.eat_while(is_blank);
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token::new(kind, start, end));
    }

    fn state_start(&mut self) -> CompileResult<()> {
        self.skip_spaces();
        match self.current() {
            b'$' => self.variable(),
            NUL => {
                self.state = State::Done;
                Ok(())
            }
            byte if is_selector_start(byte) => {
                self.state = State::Selector { start: self.pos };
                self.advance();
                Ok(())
            }
            _ => Err(CompileError::UnexpectedCharacter),
        }
    }

    fn state_selector(&mut self, start: usize) -> CompileResult<()> {
        self.eat_while(is_identifier);
        match self.current() {
            b'{' => {
                self.push(TokenKind::Selector, start, self.pos);
                self.push(TokenKind::BlockStart, self.pos, self.pos + 1);
                self.advance();
                self.state = State::StartBlock;
                Ok(())
            }
            NUL => Err(CompileError::UnexpectedEndOfFile),
            byte if is_space(byte) => {
                self.push(TokenKind::Selector, start, self.pos);
                self.state = State::SelectorLookup;
                Ok(())
            }
            _ => Err(self.selector_error(start)),
        }
    }

    /// Invalid byte inside a selector. Which kind is reported depends on
    /// how the selector opened: `.`, `#`, or a bare identifier.
    fn selector_error(&self, start: usize) -> CompileError {
        match self.input[start] {
            b'.' => CompileError::ClassSelectorCanOnlyContainsAlphaChar,
            b'#' => CompileError::IdSelectorCanOnlyContainsAlphaChar,
            _ => CompileError::IdentifierCanOnlyContainsAlphaChar,
        }
    }

    fn state_selector_lookup(&mut self) -> CompileResult<()> {
        self.skip_spaces();
        match self.current() {
            b'{' => {
                self.push(TokenKind::BlockStart, self.pos, self.pos + 1);
                self.advance();
                self.state = State::StartBlock;
                Ok(())
            }
            NUL => Err(CompileError::UnexpectedEndOfFile),
            byte if is_selector_start(byte) => {
                self.state = State::Selector { start: self.pos };
                self.advance();
                Ok(())
            }
            _ => Err(CompileError::UnexpectedCharacter),
        }
    }

    /// Inside a block. This state also covers top-level material after
    /// the first rule closed, since its `$` and selector-start arms
    /// mirror `Start`; block balance is the parser's job.
    fn state_block(&mut self) -> CompileResult<()> {
        self.skip_spaces();
        match self.current() {
            b'$' => self.variable(),
            b'}' => {
                self.push(TokenKind::BlockEnd, self.pos, self.pos + 1);
                self.advance();
                Ok(())
            }
            NUL => {
                self.state = State::Done;
                Ok(())
            }
            byte if is_selector_start(byte) => self.name_or_selector(),
            _ => Err(CompileError::UnexpectedCharacter),
        }
    }

    /// An identifier inside a block is only disambiguated once its
    /// follow byte is seen: `:` makes it a property name, `{` a nested
    /// selector.
    fn name_or_selector(&mut self) -> CompileResult<()> {
        let start = self.pos;
        self.advance();
        self.eat_while(is_identifier);
        let end = self.pos;
        self.skip_blanks();
        match self.current() {
            b':' => {
                self.push(TokenKind::PropertyName, start, end);
                self.advance();
                self.property_value()
            }
            b'{' => {
                self.push(TokenKind::Selector, start, end);
                self.push(TokenKind::BlockStart, self.pos, self.pos + 1);
                self.advance();
                Ok(())
            }
            _ => Err(CompileError::NotImplemented),
        }
    }

    /// Read one property value up to its terminating semicolon. Blanks
    /// after the `:` are skipped; blanks inside and after the value
    /// belong to the lexeme.
    fn property_value(&mut self) -> CompileResult<()> {
        self.skip_blanks();
        let start = self.pos;
        self.eat_while(is_property_value);
        match self.current() {
            b';' => {
                if self.pos == start {
                    return Err(CompileError::PropertyValueCannotBeEmpty);
                }
                self.push(TokenKind::PropertyValue, start, self.pos);
                self.push(TokenKind::EndStatement, self.pos, self.pos + 1);
                self.advance();
                Ok(())
            }
            b'}' => Err(CompileError::PropertyValueMustEndWithASemicolon),
            NUL => Err(CompileError::UnexpectedEndOfFile),
            byte if is_crlf(byte) => Err(CompileError::PropertyValueCannotContainCRLF),
            _ => Err(CompileError::PropertyValueCanOnlyContainsAlphaChar),
        }
    }

    /// Read a `$name: value;` declaration. The name lexeme keeps its
    /// leading `$` so later stages compare full `$name` keys. Unlike
    /// property values, the value lexeme is trimmed of trailing blanks.
    fn variable(&mut self) -> CompileResult<()> {
        let start = self.pos;
        self.advance();
        self.eat_while(is_identifier);
        self.push(TokenKind::VariableName, start, self.pos);

        self.skip_blanks();
        match self.current() {
            b':' => self.advance(),
            NUL => return Err(CompileError::UnexpectedEndOfFile),
            byte if is_crlf(byte) => return Err(CompileError::VariableNameCannotContainCRLF),
            _ => return Err(CompileError::VariableNameCanOnlyContainsAlphaChar),
        }

        self.skip_blanks();
        let value_start = self.pos;
        self.eat_while(is_property_value);
        match self.current() {
            b';' => {
                let mut value_end = self.pos;
                while value_end > value_start && is_blank(self.input[value_end - 1]) {
                    value_end -= 1;
                }
                self.push(TokenKind::VariableValue, value_start, value_end);
                self.push(TokenKind::EndStatement, self.pos, self.pos + 1);
                self.advance();
                Ok(())
            }
            NUL => Err(CompileError::UnexpectedEndOfFile),
            byte if is_crlf(byte) => Err(CompileError::VariableValueCannotContainCRLF),
            _ => Err(CompileError::PropertyValueCanOnlyContainsAlphaChar),
        }
    }
}

fn is_identifier(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

fn is_selector_start(byte: u8) -> bool {
    is_identifier(byte) || byte == b'.' || byte == b'#'
}

fn is_property_value(byte: u8) -> bool {
    is_identifier(byte) || is_blank(byte) || byte == b'#' || byte == b'$'
}

fn is_blank(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

fn is_crlf(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

fn is_space(byte: u8) -> bool {
    is_blank(byte) || is_crlf(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("tokenize")
            .iter()
            .map(|token| token.kind)
            .collect()
    }

    fn lexemes(source: &str) -> Vec<String> {
        tokenize(source)
            .expect("tokenize")
            .iter()
            .map(|token| token_text(token, source).to_string())
            .collect()
    }

    fn error(source: &str) -> CompileError {
        tokenize(source).expect_err("expected a tokenize error")
    }

    #[test]
    fn empty_input_is_just_eof() {
        let tokens = tokenize("").expect("tokenize");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::EndOfFile);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 1));
    }

    #[test]
    fn whitespace_only_input_is_just_eof() {
        assert_eq!(kinds(" \t\r\n "), vec![TokenKind::EndOfFile]);
    }

    #[test]
    fn empty_rule_tokenizes_to_four_tokens() {
        assert_eq!(
            kinds("sel{}"),
            vec![
                TokenKind::Selector,
                TokenKind::BlockStart,
                TokenKind::BlockEnd,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn selector_with_space_before_brace() {
        assert_eq!(
            lexemes(".button {}"),
            vec![".button", "{", "}", ""]
        );
    }

    #[test]
    fn selector_with_newline_before_brace() {
        assert_eq!(
            kinds("#main\n{\n}\n"),
            vec![
                TokenKind::Selector,
                TokenKind::BlockStart,
                TokenKind::BlockEnd,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn properties_produce_name_value_end_triples() {
        assert_eq!(
            kinds(".x{margin: 0;padding:0;}"),
            vec![
                TokenKind::Selector,
                TokenKind::BlockStart,
                TokenKind::PropertyName,
                TokenKind::PropertyValue,
                TokenKind::EndStatement,
                TokenKind::PropertyName,
                TokenKind::PropertyValue,
                TokenKind::EndStatement,
                TokenKind::BlockEnd,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn property_value_keeps_inner_and_trailing_blanks() {
        let source = ".x{border: 1px solid \t;}";
        let tokens = tokenize(source).expect("tokenize");
        let value = tokens
            .iter()
            .find(|token| token.kind == TokenKind::PropertyValue)
            .expect("value token");
        assert_eq!(token_text(value, source), "1px solid \t");
    }

    #[test]
    fn property_name_allows_blanks_before_colon() {
        let source = ".x{margin : 0;}";
        let tokens = tokenize(source).expect("tokenize");
        let name = tokens
            .iter()
            .find(|token| token.kind == TokenKind::PropertyName)
            .expect("name token");
        assert_eq!(token_text(name, source), "margin");
    }

    #[test]
    fn nested_selector_is_disambiguated_by_brace() {
        assert_eq!(
            kinds(".button{ h1 { color: red; } }"),
            vec![
                TokenKind::Selector,
                TokenKind::BlockStart,
                TokenKind::Selector,
                TokenKind::BlockStart,
                TokenKind::PropertyName,
                TokenKind::PropertyValue,
                TokenKind::EndStatement,
                TokenKind::BlockEnd,
                TokenKind::BlockEnd,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn material_after_a_closed_block_is_recognised() {
        assert_eq!(
            kinds(".a{} h1{} $x: 1;"),
            vec![
                TokenKind::Selector,
                TokenKind::BlockStart,
                TokenKind::BlockEnd,
                TokenKind::Selector,
                TokenKind::BlockStart,
                TokenKind::BlockEnd,
                TokenKind::VariableName,
                TokenKind::VariableValue,
                TokenKind::EndStatement,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn variable_name_lexeme_keeps_the_dollar() {
        assert_eq!(
            lexemes("$zig-orange: #f7a41d;"),
            vec!["$zig-orange", "#f7a41d", ";", ""]
        );
    }

    #[test]
    fn variable_value_trims_trailing_blanks() {
        assert_eq!(
            lexemes("$c: #111 \t ;"),
            vec!["$c", "#111", ";", ""]
        );
    }

    #[test]
    fn variable_value_may_reference_another_variable() {
        assert_eq!(
            lexemes("$a: $b;"),
            vec!["$a", "$b", ";", ""]
        );
    }

    #[test]
    fn variable_inside_a_block() {
        assert_eq!(
            kinds(".a{ $c: #222; color: $c; }"),
            vec![
                TokenKind::Selector,
                TokenKind::BlockStart,
                TokenKind::VariableName,
                TokenKind::VariableValue,
                TokenKind::EndStatement,
                TokenKind::PropertyName,
                TokenKind::PropertyValue,
                TokenKind::EndStatement,
                TokenKind::BlockEnd,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn token_ranges_are_ordered_and_in_bounds() {
        let sources = [
            "",
            "sel{}",
            ".button{ margin: 0; padding:0; } h1{ color: red; }",
            "$c: #111; .a { $c: #222; .b { color: $c; } }",
        ];
        for source in sources {
            let tokens = tokenize(source).expect("tokenize");
            let mut previous_start = 0;
            let mut previous_end = 0;
            for token in &tokens {
                assert!(token.start <= token.end, "range inverted in {source:?}");
                assert!(token.end <= source.len() + 1, "out of bounds in {source:?}");
                assert!(token.start >= previous_start, "starts regress in {source:?}");
                assert!(token.start >= previous_end, "ranges overlap in {source:?}");
                previous_start = token.start;
                previous_end = token.end;
            }
            assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::EndOfFile));
        }
    }

    #[test]
    fn block_tokens_are_balanced_for_well_formed_input() {
        let tokens = tokenize(".a{ .b{ .c{} } .d{} }").expect("tokenize");
        let starts = tokens.iter().filter(|t| t.kind == TokenKind::BlockStart).count();
        let ends = tokens.iter().filter(|t| t.kind == TokenKind::BlockEnd).count();
        assert_eq!(starts, 4);
        assert_eq!(starts, ends);
    }

    #[test]
    fn unexpected_character_at_top_level() {
        assert_eq!(error(";"), CompileError::UnexpectedCharacter);
        assert_eq!(error("@media"), CompileError::UnexpectedCharacter);
    }

    #[test]
    fn selector_at_end_of_file() {
        assert_eq!(error("sel"), CompileError::UnexpectedEndOfFile);
        assert_eq!(error(".button  "), CompileError::UnexpectedEndOfFile);
    }

    #[test]
    fn selector_error_kind_depends_on_first_byte() {
        assert_eq!(error(".btn!{}"), CompileError::ClassSelectorCanOnlyContainsAlphaChar);
        assert_eq!(error("#main!{}"), CompileError::IdSelectorCanOnlyContainsAlphaChar);
        assert_eq!(error("h1!{}"), CompileError::IdentifierCanOnlyContainsAlphaChar);
    }

    #[test]
    fn garbage_after_selector_lookup() {
        assert_eq!(error(".a ;"), CompileError::UnexpectedCharacter);
    }

    #[test]
    fn empty_property_value() {
        assert_eq!(error(".x{margin:;}"), CompileError::PropertyValueCannotBeEmpty);
    }

    #[test]
    fn blanks_only_property_value() {
        assert_eq!(error(".x{margin: \t ;}"), CompileError::PropertyValueCannotBeEmpty);
    }

    #[test]
    fn crlf_inside_property_value() {
        assert_eq!(error(".x{margin: 0\r\n;}"), CompileError::PropertyValueCannotContainCRLF);
        assert_eq!(error(".x{margin: 0\n;}"), CompileError::PropertyValueCannotContainCRLF);
    }

    #[test]
    fn property_value_stopped_by_closing_brace() {
        assert_eq!(
            error(".x{margin: 0}"),
            CompileError::PropertyValueMustEndWithASemicolon
        );
    }

    #[test]
    fn property_value_cut_off_by_end_of_file() {
        assert_eq!(error(".x{margin: 0"), CompileError::UnexpectedEndOfFile);
    }

    #[test]
    fn invalid_byte_in_property_value() {
        assert_eq!(
            error(".x{width: 50%;}"),
            CompileError::PropertyValueCanOnlyContainsAlphaChar
        );
    }

    #[test]
    fn name_without_colon_or_brace_inside_block() {
        assert_eq!(error(".x{margin@}"), CompileError::NotImplemented);
        assert_eq!(error(".x{margin"), CompileError::NotImplemented);
    }

    #[test]
    fn variable_name_interrupted_by_newline() {
        assert_eq!(error("$c\n: 1;"), CompileError::VariableNameCannotContainCRLF);
    }

    #[test]
    fn invalid_byte_after_variable_name() {
        assert_eq!(error("$c !: 1;"), CompileError::VariableNameCanOnlyContainsAlphaChar);
    }

    #[test]
    fn variable_cut_off_before_colon() {
        assert_eq!(error("$c"), CompileError::UnexpectedEndOfFile);
    }

    #[test]
    fn crlf_inside_variable_value() {
        assert_eq!(error("$c: 1\n;"), CompileError::VariableValueCannotContainCRLF);
    }

    #[test]
    fn variable_value_cut_off_by_end_of_file() {
        assert_eq!(error("$c: 1"), CompileError::UnexpectedEndOfFile);
    }
}
