//! nginx configuration lexer

use nom::IResult;
use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::char;

/// Token types for nginx config
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare word: directive name, argument, number
    Word(String),
    /// Quoted string (either quote style)
    Str(String),
    /// Open brace {
    OpenBrace,
    /// Close brace }
    CloseBrace,
    /// Semicolon ;
    Semicolon,
    /// Comment text (everything after `#`, up to end of line)
    Comment(String),
}

/// Tokenize nginx configuration, tracking the source line of each token
pub fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, String> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut remaining = input;

    while !remaining.is_empty() {
        let (rest, _) = skip_horizontal_whitespace(remaining)
            .map_err(|e| format!("Whitespace error at line {}: {:?}", line, e))?;
        remaining = rest;

        if remaining.is_empty() {
            break;
        }

        if let Some(rest) = remaining.strip_prefix("\r\n") {
            remaining = rest;
            line += 1;
            continue;
        }

        let c = match remaining.chars().next() {
            Some(c) => c,
            None => break,
        };

        match c {
            '\n' => {
                remaining = &remaining[1..];
                line += 1;
            }
            '#' => {
                let (rest, comment) = parse_comment(remaining)
                    .map_err(|e| format!("Comment error at line {}: {:?}", line, e))?;
                tokens.push((Token::Comment(comment), line));
                remaining = rest;
            }
            '{' => {
                tokens.push((Token::OpenBrace, line));
                remaining = &remaining[1..];
            }
            '}' => {
                tokens.push((Token::CloseBrace, line));
                remaining = &remaining[1..];
            }
            ';' => {
                tokens.push((Token::Semicolon, line));
                remaining = &remaining[1..];
            }
            '"' | '\'' => {
                let (rest, s) = parse_quoted(remaining, c)
                    .map_err(|e| format!("String error at line {}: {:?}", line, e))?;
                line += s.matches('\n').count();
                tokens.push((Token::Str(s), line));
                remaining = rest;
            }
            _ => {
                let (rest, word) = parse_word(remaining)
                    .map_err(|e| format!("Word error at line {}: {:?}", line, e))?;
                tokens.push((Token::Word(word), line));
                remaining = rest;
            }
        }
    }

    Ok(tokens)
}

fn skip_horizontal_whitespace(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c == ' ' || c == '\t')(input)
}

fn parse_comment(input: &str) -> IResult<&str, String> {
    let (rest, _) = char('#')(input)?;
    let (rest, comment) = take_while(|c: char| c != '\n' && c != '\r')(rest)?;
    Ok((rest, comment.to_string()))
}

/// Parse a quoted string. Double quotes understand the usual backslash
/// escapes; single quotes only escape the quote itself.
fn parse_quoted(input: &str, quote: char) -> IResult<&str, String> {
    let (rest, _) = char(quote)(input)?;
    let mut result = String::new();
    let mut chars = rest.chars().peekable();
    let mut consumed = 0;

    while let Some(c) = chars.next() {
        consumed += c.len_utf8();
        if c == quote {
            return Ok((&rest[consumed..], result));
        }
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                consumed += next.len_utf8();
                chars.next();
                match next {
                    'n' if quote == '"' => result.push('\n'),
                    't' if quote == '"' => result.push('\t'),
                    'r' if quote == '"' => result.push('\r'),
                    '\\' if quote == '"' => result.push('\\'),
                    c if c == quote => result.push(quote),
                    _ => {
                        result.push('\\');
                        result.push(next);
                    }
                }
            }
        } else {
            result.push(c);
        }
    }

    // Unterminated string
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

fn parse_word(input: &str) -> IResult<&str, String> {
    let (rest, word) = take_while1(|c: char| {
        !c.is_whitespace() && c != '{' && c != '}' && c != ';' && c != '#' && c != '"' && c != '\''
    })(input)?;
    Ok((rest, word.to_string()))
}
