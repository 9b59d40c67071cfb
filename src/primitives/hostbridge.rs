//! The host-bridge word set. Only the safety gate and the literal-only
//! evaluator are implemented; actual host-language interop (PYEXEC/PYEVAL/
//! PYIMPORT in the source this was distilled from) is a real sandboxed
//! scripting bridge and is intentionally not built here.

use std::io::{self, Write};

use crate::error::{InterpError, Result};
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::value::Value;
use crate::word::Builtin;

/// `REQUESTUNSAFE` — interactively ask the operator to enable unsafe
/// operations for the remainder of the session.
fn f_request_unsafe(interp: &mut Interpreter) -> Result<()> {
    print!("Enable unsafe operations? [y/N] ");
    io::stdout().flush().ok();
    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .map_err(|e| InterpError::Io { reason: e.to_string() })?;
    interp.unsafe_ops = matches!(answer.trim().to_lowercase().as_str(), "y" | "yes");
    Ok(())
}

/// `PYLITEVAL` ( str -- value ) — parse a self-contained literal (integer,
/// float, or boolean); anything else is left as the original string. Always
/// allowed since it never executes arbitrary code.
fn f_pyliteval(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("PYLITEVAL", 1)?;
    let v = interp.pop("PYLITEVAL")?;
    let text = match &v {
        Value::Str(s) => s.clone(),
        other => {
            interp.push(other.clone());
            return Ok(());
        }
    };
    let parsed = if let Ok(i) = text.parse::<i64>() {
        Value::Int(i)
    } else if let Ok(f) = text.parse::<f64>() {
        Value::Float(f)
    } else {
        match text.as_str() {
            "True" | "true" => Value::Bool(true),
            "False" | "false" => Value::Bool(false),
            _ => Value::Str(text),
        }
    };
    interp.push(parsed);
    Ok(())
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("REQUESTUNSAFE", Builtin::new("REQUESTUNSAFE", f_request_unsafe));
    scopes.add_word("PYLITEVAL", Builtin::new("PYLITEVAL", f_pyliteval));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn pyliteval_parses_numeric_strings() {
        let mut interp = Interpreter::new();
        interp.run("\"42\" PYLITEVAL").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(42));
    }
}
