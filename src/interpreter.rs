//! The interpreter core: lexing, compiling, and run/compile-mode dispatch.

use std::rc::Rc;

use crate::error::{InterpError, Result, Site};
use crate::lexer::Lexer;
use crate::messages::Msg;
use crate::primitives;
use crate::scope::ScopeStack;
use crate::value::Value;
use crate::word::Word;

pub struct Interpreter {
    pub scopes: ScopeStack,
    lexers: Vec<Lexer>,
    pub msg: Msg,
    pub unsafe_ops: bool,
    /// Names currently being accumulated by an open `DEF`, innermost last.
    /// An empty string marks an anonymous (inline) definition.
    pub def_names: Vec<String>,
    /// Set by RETURN; checked by a compiled word's invoke loop to stop
    /// replaying its body early.
    pub returning: bool,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        let mut interp = Interpreter {
            scopes: ScopeStack::new(),
            lexers: Vec::new(),
            msg: Msg::new(),
            unsafe_ops: false,
            def_names: Vec::new(),
            returning: false,
        };
        primitives::register_all(&mut interp.scopes);
        interp
    }

    pub fn site(&self) -> Site {
        self.lexers.last().map(|l| l.site()).unwrap_or_default()
    }

    /// Re-entrant entry point: lexes and interprets `text` to completion.
    /// Safe to call from within a word's own `invoke`.
    pub fn run(&mut self, text: &str) -> Result<()> {
        self.lexers.push(Lexer::new(text));
        let result = self.run_loop();
        let site = self.lexers.pop().map(|l| l.site()).unwrap_or_default();
        result.map_err(|e| e.annotate(site))
    }

    fn run_loop(&mut self) -> Result<()> {
        loop {
            let token = {
                let lexer = self.active_lexer();
                if lexer.peek_word().is_empty() {
                    break;
                }
                lexer.next_word()
            };
            let value = self.compile(&token)?;
            self.interpret(value)?;
        }
        Ok(())
    }

    fn active_lexer(&mut self) -> &mut Lexer {
        self.lexers
            .last_mut()
            .expect("no active lexer: run() is not on the call stack")
    }

    /// Consume the next whitespace-delimited token from the active lexer.
    /// Used by immediate words (DEF, VAR, CONST, IMPORT, ...) that need to
    /// read a name or sub-expression directly.
    pub fn next_word(&mut self) -> String {
        self.active_lexer().next_word()
    }

    pub fn peek_word(&mut self) -> String {
        self.active_lexer().peek_word()
    }

    pub fn clear_line(&mut self) {
        self.active_lexer().clear_line()
    }

    /// Turn a raw token into an internal value: a literal, a string, or a
    /// dictionary word reference.
    pub fn compile(&mut self, token: &str) -> Result<Value> {
        if token.is_empty() {
            return Err(InterpError::MalformedDefinition {
                reason: "empty token".into(),
                site: self.site(),
            });
        }

        if let Ok(i) = token.parse::<i64>() {
            return Ok(Value::Int(i));
        }
        if let Ok(f) = token.parse::<f64>() {
            return Ok(Value::Float(f));
        }

        if token.starts_with("\"\"\"") || token.starts_with("'''") {
            let marker = &token[..3];
            let rest = &token[3..];
            if let Some(idx) = rest.find(marker) {
                return Ok(Value::Str(rest[..idx].to_string()));
            }
            let site = self.site();
            let tail = self
                .active_lexer()
                .chars_till_multiline(marker)
                .map_err(|e| if matches!(e, InterpError::UnterminatedString { .. }) {
                    InterpError::UnterminatedString { word: token.to_string(), site }
                } else {
                    e
                })?;
            let mut body = rest.to_string();
            if !body.is_empty() {
                body.push(' ');
            }
            body.push_str(&tail);
            return Ok(Value::Str(body));
        }

        if token.starts_with('"') || token.starts_with('\'') {
            let quote = token.chars().next().unwrap();
            let rest = &token[1..];
            if !rest.is_empty() && rest.ends_with(quote) {
                return Ok(Value::Str(rest[..rest.len() - 1].to_string()));
            }
            let site = self.site();
            let tail = self.active_lexer().chars_till(quote).map_err(|e| {
                if matches!(e, InterpError::UnterminatedString { .. }) {
                    InterpError::UnterminatedString { word: token.to_string(), site }
                } else {
                    e
                }
            })?;
            let mut body = rest.to_string();
            if !body.is_empty() {
                body.push(' ');
            }
            body.push_str(&tail);
            return Ok(Value::Str(body));
        }

        match self.scopes.lookup(token) {
            Some(word) => Ok(Value::Word(word)),
            None => Err(InterpError::UnknownWord {
                word: token.to_string(),
                site: self.site(),
            }),
        }
    }

    /// Execute or accumulate a compiled value per the compile/run-mode rules:
    /// words execute when not compiling or when marked immediate; everything
    /// else (and non-immediate words while compiling) is pushed onto the
    /// active data stack, which doubles as the AOT accumulator.
    pub fn interpret(&mut self, value: Value) -> Result<()> {
        if let Value::Word(word) = &value {
            if !self.scopes.is_compiling() || word.is_immediate() {
                let word: Rc<dyn Word> = Rc::clone(word);
                return word.invoke(self);
            }
        }
        self.scopes.push(value);
        Ok(())
    }

    /// Read and evaluate the next token as a value, draining any AOT scope
    /// it opens (e.g. `[ ... ]`) before returning the single resulting value.
    /// Used by CONST, `=`, and NEXT.
    pub fn eval_next(&mut self) -> Result<Value> {
        let depth_before = self.scopes.depth();
        let token = self.next_word();
        let value = self.compile(&token)?;
        self.interpret(value)?;
        while self.scopes.depth() > depth_before {
            let token = self.next_word();
            let value = self.compile(&token)?;
            self.interpret(value)?;
        }
        self.scopes.pop().ok_or_else(|| InterpError::Runtime {
            reason: "no value produced".into(),
            site: self.site(),
        })
    }

    pub fn pop(&mut self, word: &str) -> Result<Value> {
        self.scopes.pop().ok_or_else(|| InterpError::Underflow {
            word: word.to_string(),
            needed: 1,
            had: self.scopes.active_len(),
            site: self.site(),
        })
    }

    pub fn push(&mut self, value: Value) {
        self.scopes.push(value)
    }

    pub fn check_stack(&self, word: &str, needed: usize) -> Result<()> {
        let had = self.scopes.active_len();
        if had < needed {
            return Err(InterpError::Underflow {
                word: word.to_string(),
                needed,
                had,
                site: self.site(),
            });
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ok(src: &str) -> Interpreter {
        let mut interp = Interpreter::new();
        interp.run(src).expect("program should run");
        interp
    }

    #[test]
    fn arithmetic_leaves_result_on_stack() {
        let mut interp = run_ok("3 4 +");
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(7));
    }

    #[test]
    fn variable_round_trips_through_store_fetch() {
        let mut interp = run_ok("VAR x 5 x SWAP STORE x FETCH");
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(5));
    }

    #[test]
    fn user_word_computes_square() {
        let mut interp =
            run_ok("DEF sq VAR n n PARAM n FETCH n FETCH * END 6 sq");
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(36));
    }

    #[test]
    fn list_literal_supports_item_and_length() {
        let mut interp = run_ok("[ 10 20 30 ] 1 ITEM");
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(20));
    }

    #[test]
    fn while_loop_counts_to_five() {
        let mut interp = run_ok(
            "VAR i 0 i SWAP STORE [ i FETCH 5 < ] [ i FETCH 1 + i SWAP STORE ] WHILE i FETCH",
        );
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(5));
    }

    #[test]
    fn unknown_word_is_reported() {
        let mut interp = Interpreter::new();
        let err = interp.run("NOSUCHWORD").unwrap_err();
        assert!(format!("{err}").contains("unknown word"));
    }

    #[test]
    fn scope_isolation_after_user_word_call() {
        let mut interp = run_ok("DEF id VAR n n PARAM n FETCH END 1 2 id");
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(2));
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(1));
    }
}
