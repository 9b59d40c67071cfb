//! The C front-end: parses a C89/C99 translation unit with `lang-c` and
//! lowers it into stack-language source text that `Interpreter::run` can
//! execute directly.

mod emit;

use lang_c::driver::{parse_preprocessed, Config};

use crate::error::{InterpError, Result};

/// Strip `//` and `/* */` comments before handing the buffer to `lang-c`,
/// matching the source's "no preprocessor" contract: comments are the one
/// piece of preprocessing this front-end still performs.
fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    let mut in_string: Option<char> = None;
    while let Some(c) = chars.next() {
        if let Some(q) = in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                in_string = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Compile a C translation unit into stack-language source text.
pub fn compile(source: &str) -> Result<String> {
    let cleaned = strip_comments(source);
    let config = Config::default();
    let parsed = parse_preprocessed(&config, cleaned)
        .map_err(|e| InterpError::Compilation(vec![format!("parse error: {e}")]))?;

    let mut emitter = emit::Emitter::new();
    emitter.compile_translation_unit(&parsed.unit);

    if emitter.errors.is_empty() {
        Ok(emitter.finish())
    } else {
        Err(InterpError::Compilation(emitter.errors))
    }
}
