//! Source formatting for generated artifacts
//!
//! The formatter re-indents by bracket depth. It understands string
//! literals and line comments well enough to ignore brackets inside them,
//! which covers everything the builders emit.

use crate::plugin::Syntax;
use proto_converter_common::{ConverterError, FormatOptions, Result};

/// Formats generated source text
pub trait Formatter {
    fn format(&self, source: &str, syntax: Syntax) -> Result<String>;
}

/// Bracket-depth indenter configured by [`FormatOptions`]
#[derive(Debug, Clone, Default)]
pub struct IndentFormatter {
    options: FormatOptions,
}

impl IndentFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    fn indent_unit(&self) -> String {
        if self.options.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.options.indent_width)
        }
    }
}

impl Formatter for IndentFormatter {
    fn format(&self, source: &str, syntax: Syntax) -> Result<String> {
        let unit = self.indent_unit();
        let mut lines: Vec<String> = Vec::new();
        let mut depth: usize = 0;
        let mut in_block_string = false;

        for (number, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                if !in_block_string && lines.last().is_some_and(|l| !l.is_empty()) {
                    lines.push(String::new());
                }
                continue;
            }

            let shape = scan_line(line, syntax, &mut in_block_string)
                .map_err(|e| ConverterError::Format(format!("line {}: {}", number + 1, e)))?;

            let level = depth.checked_sub(shape.leading_closers).ok_or_else(|| {
                ConverterError::Format(format!("line {}: unbalanced closing bracket", number + 1))
            })?;
            lines.push(format!("{}{}", unit.repeat(level), line));

            depth = (depth + shape.opens)
                .checked_sub(shape.closes)
                .ok_or_else(|| {
                    ConverterError::Format(format!(
                        "line {}: unbalanced closing bracket",
                        number + 1
                    ))
                })?;
        }

        if in_block_string {
            return Err(ConverterError::Format(
                "unterminated block string".to_string(),
            ));
        }
        if depth != 0 {
            return Err(ConverterError::Format(format!(
                "{} unclosed bracket(s) at end of input",
                depth
            )));
        }

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        let mut formatted = lines.join("\n");
        if self.options.trailing_newline && !formatted.is_empty() {
            formatted.push('\n');
        }
        Ok(formatted)
    }
}

#[derive(Debug, Default, PartialEq)]
struct LineShape {
    /// Closing brackets before any other code on the line
    leading_closers: usize,
    opens: usize,
    closes: usize,
}

fn is_triple_quote(chars: &[char], at: usize) -> bool {
    chars.get(at..at + 3).is_some_and(|s| s == ['"', '"', '"'])
}

fn scan_line(
    line: &str,
    syntax: Syntax,
    in_block_string: &mut bool,
) -> std::result::Result<LineShape, String> {
    let chars: Vec<char> = line.chars().collect();
    let mut shape = LineShape::default();
    let mut quote: Option<char> = None;
    let mut seen_code = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if *in_block_string {
            // `\"""` is the only escape a block string knows
            if c == '\\' && is_triple_quote(&chars, i + 1) {
                i += 4;
            } else if is_triple_quote(&chars, i) {
                *in_block_string = false;
                i += 3;
            } else {
                i += 1;
            }
            seen_code = true;
            continue;
        }

        if let Some(q) = quote {
            if c == '\\' {
                i += 2;
                continue;
            }
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match (syntax, c) {
            (Syntax::Graphql, '#') => break,
            (Syntax::Typescript, '/') if chars.get(i + 1) == Some(&'/') => break,
            (Syntax::Graphql, '"') if is_triple_quote(&chars, i) => {
                *in_block_string = true;
                seen_code = true;
                i += 3;
                continue;
            }
            (Syntax::Graphql, '"') | (Syntax::Typescript, '"' | '\'') => quote = Some(c),
            (_, '{' | '(' | '[') => shape.opens += 1,
            (_, '}' | ')' | ']') => {
                if !seen_code {
                    shape.leading_closers += 1;
                }
                shape.closes += 1;
            }
            _ => {}
        }

        if !c.is_whitespace() && !matches!(c, '}' | ')' | ']') {
            seen_code = true;
        }
        i += 1;
    }

    if quote.is_some() {
        return Err("unterminated string literal".to_string());
    }
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(source: &str, syntax: Syntax) -> Result<String> {
        IndentFormatter::new(FormatOptions::default()).format(source, syntax)
    }

    #[test]
    fn test_reindents_typescript() {
        let source = "export interface A {\n// note\nid: string;\n}\n\n\n\nexport class B {\nasync f(): Promise<A> {\nthrow new Error('{ nope');\n}\n}\n";
        assert_eq!(
            format(source, Syntax::Typescript).unwrap(),
            "export interface A {\n  // note\n  id: string;\n}\n\nexport class B {\n  async f(): Promise<A> {\n    throw new Error('{ nope');\n  }\n}\n"
        );
    }

    #[test]
    fn test_closer_and_opener_on_one_line() {
        let source = "if (a) {\nx();\n} else {\ny();\n}";
        assert_eq!(
            format(source, Syntax::Typescript).unwrap(),
            "if (a) {\n  x();\n} else {\n  y();\n}\n"
        );
    }

    #[test]
    fn test_graphql_block_strings_and_comments() {
        let source = "type Query {\n\"\"\"\nsay \"}\"\n\"\"\"\n# {\nq(request: R): S\n}";
        assert_eq!(
            format(source, Syntax::Graphql).unwrap(),
            "type Query {\n  \"\"\"\n  say \"}\"\n  \"\"\"\n  # {\n  q(request: R): S\n}\n"
        );
    }

    #[test]
    fn test_escaped_triple_quote_stays_inside_block_string() {
        let source = "type Query {\n\"\"\"say \\\"\"\" {\"\"\"\nq: S\n}";
        assert_eq!(
            format(source, Syntax::Graphql).unwrap(),
            "type Query {\n  \"\"\"say \\\"\"\" {\"\"\"\n  q: S\n}\n"
        );
    }

    #[test]
    fn test_options_are_applied() {
        let formatter = IndentFormatter::new(FormatOptions {
            indent_width: 4,
            use_tabs: false,
            trailing_newline: false,
        });
        assert_eq!(
            formatter.format("a {\nb\n}", Syntax::Typescript).unwrap(),
            "a {\n    b\n}"
        );

        let formatter = IndentFormatter::new(FormatOptions {
            use_tabs: true,
            ..FormatOptions::default()
        });
        assert_eq!(
            formatter.format("a {\nb\n}", Syntax::Typescript).unwrap(),
            "a {\n\tb\n}\n"
        );
    }

    #[test]
    fn test_unbalanced_input_is_rejected() {
        assert!(matches!(
            format("a {\n", Syntax::Typescript),
            Err(ConverterError::Format(_))
        ));
        assert!(format("}\n", Syntax::Typescript).is_err());
        assert!(format("x = 'open\n", Syntax::Typescript).is_err());
        assert!(format("\"\"\"never closed", Syntax::Graphql).is_err());
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(format("\n\n", Syntax::Graphql).unwrap(), "");
    }
}
