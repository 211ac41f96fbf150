//! nginx configuration parser

use super::lexer::{Token, tokenize};
use super::{Directive, ParseContext, ParseError};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};

/// Recursive-descent parser from tokens to a directive tree.
///
/// Comments become directives named `#` so downstream consumers see them
/// in source order, interleaved with the real directives of a block.
pub struct NginxParser;

impl NginxParser {
    /// Parse the context's primary file, expanding includes
    pub fn parse(ctx: &mut ParseContext) -> Result<Vec<Directive>, ParseError> {
        // Mark primary file as processed (for cycle detection)
        ctx.processed.insert(ctx.primary_path.clone());

        let tokens = Self::lex(&ctx.content, &ctx.primary_path)?;
        let directives = Self::parse_tokens(&tokens, &ctx.primary_path)?;
        Self::process_includes(directives, ctx)
    }

    fn lex(content: &str, file: &Path) -> Result<Vec<(Token, usize)>, ParseError> {
        tokenize(content).map_err(|message| ParseError::Syntax {
            file: file.to_path_buf(),
            line: 0,
            message,
        })
    }

    /// Parse a whole token stream
    fn parse_tokens(tokens: &[(Token, usize)], file: &Path) -> Result<Vec<Directive>, ParseError> {
        let mut directives = Vec::new();
        let mut pos = 0;

        while pos < tokens.len() {
            let (directive, new_pos) = Self::parse_directive(tokens, pos, file)?;
            directives.push(directive);
            pos = new_pos;
        }

        Ok(directives)
    }

    /// Parse a single statement: a comment, a simple directive, or a block
    fn parse_directive(
        tokens: &[(Token, usize)],
        start: usize,
        file: &Path,
    ) -> Result<(Directive, usize), ParseError> {
        let mut pos = start;

        let (name, line) = match &tokens[pos] {
            (Token::Comment(text), line) => {
                let directive =
                    Directive::new("#", *line, file.to_path_buf()).with_comment(text.clone());
                return Ok((directive, pos + 1));
            }
            (Token::Word(name), line) => (name.clone(), *line),
            (token, line) => {
                return Err(ParseError::Syntax {
                    file: file.to_path_buf(),
                    line: *line,
                    message: format!("Expected directive name, got {:?}", token),
                });
            }
        };
        pos += 1;

        let mut directive = Directive::new(name, line, file.to_path_buf());
        let mut args = Vec::new();

        // Collect arguments until ; or {
        while pos < tokens.len() {
            match &tokens[pos] {
                (Token::Word(arg), _) | (Token::Str(arg), _) => {
                    args.push(arg.clone());
                    pos += 1;
                }
                (Token::Comment(_), _) => {
                    // Comment between a directive and its terminator; drop it
                    pos += 1;
                }
                (Token::Semicolon, _) => {
                    directive.args = args;
                    return Ok((directive, pos + 1));
                }
                (Token::OpenBrace, _) => {
                    directive.args = args;
                    pos += 1;

                    let mut block = Vec::new();
                    loop {
                        match tokens.get(pos) {
                            None => {
                                return Err(ParseError::Syntax {
                                    file: file.to_path_buf(),
                                    line,
                                    message: "Unexpected end of file in block".to_string(),
                                });
                            }
                            Some((Token::CloseBrace, _)) => {
                                pos += 1;
                                break;
                            }
                            Some(_) => {
                                let (child, new_pos) = Self::parse_directive(tokens, pos, file)?;
                                block.push(child);
                                pos = new_pos;
                            }
                        }
                    }

                    directive.block = Some(block);
                    return Ok((directive, pos));
                }
                (token, line) => {
                    return Err(ParseError::Syntax {
                        file: file.to_path_buf(),
                        line: *line,
                        message: format!("Unexpected token {:?}", token),
                    });
                }
            }
        }

        Err(ParseError::Syntax {
            file: file.to_path_buf(),
            line,
            message: "Directive not terminated with ; or {".to_string(),
        })
    }

    /// Expand include directives in place, preserving surrounding order
    fn process_includes(
        directives: Vec<Directive>,
        ctx: &mut ParseContext,
    ) -> Result<Vec<Directive>, ParseError> {
        if !ctx.options.follow_includes {
            return Ok(directives);
        }

        let mut result = Vec::new();

        for mut directive in directives {
            if directive.name == "include" && directive.block.is_none() {
                if let Some(pattern) = directive.first_arg() {
                    let pattern = pattern.to_string();
                    let included = Self::resolve_and_parse_include(&pattern, ctx, &directive)?;
                    result.extend(included);
                }
            } else if let Some(block) = directive.block.take() {
                directive.block = Some(Self::process_includes(block, ctx)?);
                result.push(directive);
            } else {
                result.push(directive);
            }
        }

        Ok(result)
    }

    /// Resolve an include pattern and parse every matching file
    fn resolve_and_parse_include(
        pattern: &str,
        ctx: &mut ParseContext,
        include_directive: &Directive,
    ) -> Result<Vec<Directive>, ParseError> {
        let resolved_pattern = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            ctx.base_dir.join(pattern).to_string_lossy().to_string()
        };

        let paths = Self::expand_glob(&resolved_pattern, include_directive)?;

        let mut all_directives = Vec::new();

        for path in paths {
            ctx.can_include(&path)?;
            ctx.processed.insert(path.clone());
            ctx.include_depth += 1;

            let content = fs::read_to_string(&path).map_err(ParseError::Io)?;
            let tokens = Self::lex(&content, &path)?;
            let directives = Self::parse_tokens(&tokens, &path)?;

            // Included files may include further files themselves
            let processed = Self::process_includes(directives, ctx)?;
            all_directives.extend(processed);

            ctx.include_depth -= 1;
        }

        Ok(all_directives)
    }

    /// Expand a glob pattern to a sorted list of files.
    ///
    /// nginx silently ignores glob includes with no matches but errors on
    /// a missing literal include path.
    fn expand_glob(pattern: &str, directive: &Directive) -> Result<Vec<PathBuf>, ParseError> {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let mut paths: Vec<PathBuf> = glob(pattern)
                .map_err(|e| ParseError::Syntax {
                    file: directive.location.file.clone(),
                    line: directive.location.line,
                    message: format!("Invalid glob pattern: {}", e),
                })?
                .filter_map(|r| r.ok())
                .filter(|p| p.is_file())
                .collect();

            paths.sort();
            Ok(paths)
        } else {
            let path = PathBuf::from(pattern);
            if path.exists() {
                Ok(vec![path])
            } else {
                Err(ParseError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Include file not found: {}", pattern),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseOptions;

    fn parse_str(input: &str) -> Vec<Directive> {
        let tokens = tokenize(input).unwrap();
        NginxParser::parse_tokens(&tokens, Path::new("test.conf")).unwrap()
    }

    #[test]
    fn test_parse_simple_directive() {
        let directives = parse_str("worker_processes 4;");
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].name, "worker_processes");
        assert_eq!(directives[0].args, vec!["4"]);
    }

    #[test]
    fn test_parse_block() {
        let directives = parse_str(
            r#"
            server {
                listen 80;
                server_name example.com;
            }
        "#,
        );

        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].name, "server");

        let block = directives[0].children();
        assert_eq!(block.len(), 2);
        assert_eq!(block[0].name, "listen");
        assert_eq!(block[1].name, "server_name");
    }

    #[test]
    fn test_parse_nested_blocks() {
        let directives = parse_str(
            r#"
            http {
                server {
                    location / {
                        proxy_pass http://backend;
                    }
                }
            }
        "#,
        );

        let http = &directives[0];
        assert_eq!(http.name, "http");
        let server = &http.children()[0];
        assert_eq!(server.name, "server");
        let location = &server.children()[0];
        assert_eq!(location.name, "location");
        assert_eq!(location.children()[0].name, "proxy_pass");
    }

    #[test]
    fn test_comments_become_directives() {
        let directives = parse_str(
            r#"
            server {
                server_name a.com;
                # replace_all: b.com
                listen 80;
            }
        "#,
        );

        let block = directives[0].children();
        assert_eq!(block.len(), 3);
        assert!(block[1].is_comment());
        assert_eq!(block[1].comment.as_deref(), Some(" replace_all: b.com"));
        assert_eq!(block[1].location.line, 4);
    }

    #[test]
    fn test_comment_inside_directive_args_is_dropped() {
        let directives = parse_str("server_name a.com # note\n b.com;");
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].args, vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_stray_close_brace_is_an_error() {
        let tokens = tokenize("}").unwrap();
        assert!(NginxParser::parse_tokens(&tokens, Path::new("test.conf")).is_err());
    }

    #[test]
    fn test_includes_disabled_leaves_directive() {
        let directives = vec![
            Directive::new("worker_processes", 1, PathBuf::from("test.conf"))
                .with_args(vec!["4".to_string()]),
            Directive::new("include", 2, PathBuf::from("test.conf"))
                .with_args(vec!["/some/nonexistent/file.conf".to_string()]),
        ];

        let mut ctx = ParseContext::new(PathBuf::from("test.conf"), String::new());
        ctx.options = ParseOptions {
            follow_includes: false,
            ..Default::default()
        };

        let processed = NginxParser::process_includes(directives, &mut ctx).unwrap();
        assert_eq!(processed.len(), 2);
        assert_eq!(processed[1].name, "include");
    }

    #[test]
    fn test_glob_expansion() {
        // Glob with no matches is fine
        assert!(
            NginxParser::expand_glob(
                "/nonexistent/*.conf",
                &Directive::new("include", 1, PathBuf::from("test.conf"))
            )
            .unwrap()
            .is_empty()
        );

        // A literal path that doesn't exist is an error
        assert!(
            NginxParser::expand_glob(
                "/nonexistent/specific.conf",
                &Directive::new("include", 1, PathBuf::from("test.conf")),
            )
            .is_err()
        );
    }
}
