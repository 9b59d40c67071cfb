//! Variables and constants: allocation, binding, and the STORE/FETCH pair.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{InterpError, Result};
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::value::Value;
use crate::word::{Builtin, ValuePusher};

/// `VAR name` — allocate a cell, bind `name` locally to a word that pushes a
/// reference to it.
fn f_var(interp: &mut Interpreter) -> Result<()> {
    let name = interp.next_word();
    if name.is_empty() {
        return Err(InterpError::MalformedDefinition {
            reason: "VAR needs a name".to_string(),
            site: interp.site(),
        });
    }
    let cell = Rc::new(RefCell::new(Value::Int(0)));
    let word = ValuePusher::new(&name, Value::Var(cell));
    interp.scopes.define(&name, word, false);
    Ok(())
}

/// `CONST name expr` — evaluate `expr` immediately, bind `name` to a word
/// that pushes the resolved value. Rebinding an existing CONST is an error.
fn f_const(interp: &mut Interpreter) -> Result<()> {
    let name = interp.next_word();
    if name.is_empty() {
        return Err(InterpError::MalformedDefinition {
            reason: "CONST needs a name".to_string(),
            site: interp.site(),
        });
    }
    if interp.scopes.is_defined(&name) {
        return Err(InterpError::ConstRebind {
            name,
            site: interp.site(),
        });
    }
    let value = interp.eval_next()?;
    let word = ValuePusher::new(&name, value);
    interp.scopes.define(&name, word, false);
    Ok(())
}

/// `= name expr` — evaluate `expr` now; the actual pop-a-reference-and-store
/// happens at run time. Outside a definition that means immediately; inside
/// a `DEF ... END` body it means every time the word is later called, so the
/// name-word and STORE are appended to the body instead of run now — the
/// same eager-value/deferred-store split as the original's `ASSIGN` helper.
fn f_assign(interp: &mut Interpreter) -> Result<()> {
    let name = interp.next_word();
    let value = interp.eval_next()?;
    let word = interp.scopes.lookup(&name).ok_or_else(|| InterpError::MalformedDefinition {
        reason: format!("{name:?} is not defined"),
        site: interp.site(),
    })?;
    if interp.scopes.is_compiling() {
        let store_word = interp
            .scopes
            .lookup("STORE")
            .expect("STORE is registered at startup");
        interp.scopes.push(Value::Word(word));
        interp.scopes.push(value);
        interp.scopes.push(Value::Word(store_word));
        Ok(())
    } else {
        word.invoke(interp)?;
        interp.push(value);
        f_store(interp)
    }
}

/// `STORE` ( ref val -- ) writes `val` (the top of stack) through `ref`.
fn f_store(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("STORE", 2)?;
    let value = interp.pop("STORE")?;
    let reference = interp.pop("STORE")?;
    match reference {
        Value::Var(cell) => {
            *cell.borrow_mut() = value;
            Ok(())
        }
        other => Err(InterpError::TypeError {
            word: "STORE".to_string(),
            reason: format!("expected a variable reference, found a {}", other.type_name()),
            site: interp.site(),
        }),
    }
}

fn f_fetch(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("FETCH", 1)?;
    let reference = interp.pop("FETCH")?;
    match reference {
        Value::Var(cell) => {
            interp.push(cell.borrow().clone());
            Ok(())
        }
        other => Err(InterpError::TypeError {
            word: "FETCH".to_string(),
            reason: format!("expected a variable reference, found a {}", other.type_name()),
            site: interp.site(),
        }),
    }
}

/// `PARAM` — pop a value from the *enclosing* scope's data stack (the
/// caller's argument) and store it through the reference on top of the
/// current stack.
fn f_param(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("PARAM", 1)?;
    let reference = interp.pop("PARAM")?;
    let arg = interp
        .scopes
        .enclosing_pop()
        .ok_or_else(|| InterpError::NoCallerValue { site: interp.site() })?;
    interp.push(reference);
    interp.push(arg);
    f_store(interp)
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("VAR", Builtin::new_immediate("VAR", f_var));
    scopes.add_word("CONST", Builtin::new_immediate("CONST", f_const));
    scopes.add_word("=", Builtin::new_immediate("=", f_assign));
    scopes.add_word("STORE", Builtin::new("STORE", f_store));
    scopes.add_word("FETCH", Builtin::new("FETCH", f_fetch));
    scopes.add_word("PARAM", Builtin::new("PARAM", f_param));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn const_refuses_rebind() {
        let mut interp = Interpreter::new();
        interp.run("CONST PI 3").unwrap();
        let err = interp.run("CONST PI 4").unwrap_err();
        assert!(format!("{err}").contains("PI"));
    }

    #[test]
    fn const_pushes_resolved_value() {
        let mut interp = Interpreter::new();
        interp.run("CONST ANSWER 42 ANSWER").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(42));
    }

    #[test]
    fn assign_writes_through_immediately_outside_a_definition() {
        let mut interp = Interpreter::new();
        interp.run("VAR x = x 7 x FETCH").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(7));
    }

    #[test]
    fn assign_inside_a_definition_reruns_on_every_call() {
        let mut interp = Interpreter::new();
        interp.run("VAR x 0 x SWAP STORE DEF setx = x 99 END").unwrap();
        // defining setx must not have touched x yet
        interp.run("x FETCH").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(0));
        interp.run("setx x FETCH").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(99));
    }
}
