//! Boolean words. TRUE/FALSE are immediate so they survive unevaluated
//! inside a compiled body instead of being deferred like ordinary words.

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::value::Value;
use crate::word::Builtin;

fn f_not(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("NOT", 1)?;
    let a = interp.pop("NOT")?;
    interp.push(Value::Bool(!a.as_bool()));
    Ok(())
}

fn f_true(interp: &mut Interpreter) -> Result<()> {
    interp.push(Value::Bool(true));
    Ok(())
}

fn f_false(interp: &mut Interpreter) -> Result<()> {
    interp.push(Value::Bool(false));
    Ok(())
}

fn f_and(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("AND", 2)?;
    let b = interp.pop("AND")?;
    let a = interp.pop("AND")?;
    interp.push(Value::Bool(a.as_bool() && b.as_bool()));
    Ok(())
}

fn f_or(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("OR", 2)?;
    let b = interp.pop("OR")?;
    let a = interp.pop("OR")?;
    interp.push(Value::Bool(a.as_bool() || b.as_bool()));
    Ok(())
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("NOT", Builtin::new("NOT", f_not));
    scopes.add_word("TRUE", Builtin::new_immediate("TRUE", f_true));
    scopes.add_word("FALSE", Builtin::new_immediate("FALSE", f_false));
    scopes.add_word("AND", Builtin::new("AND", f_and));
    scopes.add_word("OR", Builtin::new("OR", f_or));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn true_and_false_push_booleans() {
        let mut interp = Interpreter::new();
        interp.run("TRUE FALSE NOT AND").unwrap();
        assert!(interp.pop("test").unwrap().as_bool());
    }
}
