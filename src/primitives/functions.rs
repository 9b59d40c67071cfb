//! DEF/END and friends: building a callable word out of a source body.

use crate::error::{InterpError, Result};
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::word::{Builtin, CompiledWord};

/// `DEF name` — open an AOT scope that will accumulate the word's body.
/// The name is empty for an inline definition nested inside another DEF.
fn f_def(interp: &mut Interpreter) -> Result<()> {
    let name = interp.next_word();
    let pushed = if interp.scopes.is_compiling() { String::new() } else { name };
    interp.def_names.push(pushed);
    interp.scopes.new_aot_scope();
    Ok(())
}

/// `END` — close the AOT scope opened by DEF, and if it was named, bind it.
fn f_end(interp: &mut Interpreter) -> Result<()> {
    let body = interp.scopes.pop_scope();
    let name = interp.def_names.pop().ok_or_else(|| InterpError::MalformedDefinition {
        reason: "END with no matching DEF".to_string(),
        site: interp.site(),
    })?;
    if !name.is_empty() {
        let word = CompiledWord::new(name.clone(), body);
        interp.scopes.define(&name, word, true);
    }
    Ok(())
}

/// `NEXT` — evaluate the following token (and anything it opens) right away
/// and fold the resulting value into the body being compiled.
fn f_next(interp: &mut Interpreter) -> Result<()> {
    let value = interp.eval_next()?;
    interp.push(value);
    Ok(())
}

/// `RETURN` — stop replaying the enclosing compiled word's body, leaving
/// whatever is already on its stack as the result.
fn f_return(interp: &mut Interpreter) -> Result<()> {
    interp.returning = true;
    Ok(())
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("DEF", Builtin::new_immediate("DEF", f_def));
    scopes.add_word("END", Builtin::new_immediate("END", f_end));
    scopes.add_word("NEXT", Builtin::new_immediate("NEXT", f_next));
    scopes.add_word("RETURN", Builtin::new("RETURN", f_return));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn return_stops_body_early() {
        let mut interp = Interpreter::new();
        interp.run("DEF early 1 RETURN 2 END early").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(1));
        assert_eq!(interp.scopes.active_len(), 0);
    }

    #[test]
    fn next_folds_a_literal_into_the_body() {
        let mut interp = Interpreter::new();
        interp.run("DEF five NEXT 5 END five").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(5));
    }

    #[test]
    fn nested_def_is_an_unnamed_inline_closure() {
        let mut interp = Interpreter::new();
        interp.run("DEF outer DEF 1 END END").unwrap();
        assert!(interp.scopes.lookup("outer").is_some());
        assert_eq!(interp.scopes.active_len(), 0);
    }
}
