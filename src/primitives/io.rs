//! Console input and output.

use std::io::{self, Write};

use crate::error::{InterpError, Result};
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::value::Value;
use crate::word::Builtin;

fn f_print(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("PRINT", 1)?;
    let v = interp.pop("PRINT")?;
    println!("{v}");
    Ok(())
}

fn f_pstack(interp: &mut Interpreter) -> Result<()> {
    for v in interp.scopes.active_stack().iter().rev() {
        print!("{v} ");
    }
    println!();
    Ok(())
}

fn f_input(interp: &mut Interpreter) -> Result<()> {
    io::stdout().flush().ok();
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) => Err(InterpError::Io {
            reason: "INPUT: end of input".to_string(),
        }),
        Ok(_) => {
            let trimmed = line.trim_end_matches(['\n', '\r']);
            if let Ok(i) = trimmed.parse::<i64>() {
                interp.push(Value::Int(i));
            } else if let Ok(f) = trimmed.parse::<f64>() {
                interp.push(Value::Float(f));
            } else {
                interp.push(Value::Str(trimmed.to_string()));
            }
            Ok(())
        }
        Err(e) => Err(InterpError::Io {
            reason: format!("INPUT: {e}"),
        }),
    }
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("PRINT", Builtin::new("PRINT", f_print));
    scopes.add_word("PSTACK", Builtin::new("PSTACK", f_pstack));
    scopes.add_word("INPUT", Builtin::new("INPUT", f_input));
}
