//! Structured control flow built from quoted code (lists) and RUN.

use crate::error::{InterpError, Result};
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::value::Value;
use crate::word::Builtin;

/// Execute a piece of quoted code: a list runs in its own block scope, with
/// its final value (if any) left behind; a word reference is invoked as-is.
fn run_code(interp: &mut Interpreter, code: Value, word: &str) -> Result<()> {
    match code {
        Value::List(items) => {
            interp.scopes.new_block_scope();
            let result = (|| -> Result<()> {
                for item in items {
                    interp.interpret(item)?;
                }
                Ok(())
            })();
            let stack = interp.scopes.pop_scope();
            result?;
            if let Some(top) = stack.into_iter().last() {
                interp.push(top);
            }
            Ok(())
        }
        Value::Word(w) => w.invoke(interp),
        other => Err(InterpError::TypeError {
            word: word.to_string(),
            reason: format!("expected quoted code, found a {}", other.type_name()),
            site: interp.site(),
        }),
    }
}

fn eval_predicate(interp: &mut Interpreter, code: Value, word: &str) -> Result<bool> {
    run_code(interp, code, word)?;
    let v = interp.pop(word)?;
    Ok(v.as_bool())
}

fn f_run(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("RUN", 1)?;
    let code = interp.pop("RUN")?;
    run_code(interp, code, "RUN")
}

fn f_times(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("TIMES", 2)?;
    let n = interp.pop("TIMES")?;
    let code = interp.pop("TIMES")?;
    let forever = matches!(n, Value::Float(f) if f.is_infinite());
    let count = if forever {
        0
    } else {
        n.as_int().ok_or_else(|| InterpError::TypeError {
            word: "TIMES".to_string(),
            reason: format!("expected an integer count, found a {}", n.type_name()),
            site: interp.site(),
        })?
    };
    if forever {
        loop {
            run_code(interp, code.clone(), "TIMES")?;
        }
    }
    for _ in 0..count {
        run_code(interp, code.clone(), "TIMES")?;
    }
    Ok(())
}

fn f_iftrue(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("IFTRUE", 2)?;
    let code = interp.pop("IFTRUE")?;
    let cond = interp.pop("IFTRUE")?;
    if cond.as_bool() {
        run_code(interp, code, "IFTRUE")?;
    }
    Ok(())
}

fn f_iffalse(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("IFFALSE", 2)?;
    let code = interp.pop("IFFALSE")?;
    let cond = interp.pop("IFFALSE")?;
    if !cond.as_bool() {
        run_code(interp, code, "IFFALSE")?;
    }
    Ok(())
}

fn f_ifelse(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("IFELSE", 3)?;
    let else_code = interp.pop("IFELSE")?;
    let then_code = interp.pop("IFELSE")?;
    let cond = interp.pop("IFELSE")?;
    if cond.as_bool() {
        run_code(interp, then_code, "IFELSE")
    } else {
        run_code(interp, else_code, "IFELSE")
    }
}

fn f_while(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("WHILE", 2)?;
    let body = interp.pop("WHILE")?;
    let cond = interp.pop("WHILE")?;
    loop {
        if !eval_predicate(interp, cond.clone(), "WHILE")? {
            break;
        }
        run_code(interp, body.clone(), "WHILE")?;
    }
    Ok(())
}

fn f_dowhile(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("DOWHILE", 2)?;
    let body = interp.pop("DOWHILE")?;
    let cond = interp.pop("DOWHILE")?;
    loop {
        run_code(interp, body.clone(), "DOWHILE")?;
        if !eval_predicate(interp, cond.clone(), "DOWHILE")? {
            break;
        }
    }
    Ok(())
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("RUN", Builtin::new("RUN", f_run));
    scopes.add_word("TIMES", Builtin::new("TIMES", f_times));
    scopes.add_word("IFTRUE", Builtin::new("IFTRUE", f_iftrue));
    scopes.add_word("IFFALSE", Builtin::new("IFFALSE", f_iffalse));
    scopes.add_word("IFELSE", Builtin::new("IFELSE", f_ifelse));
    scopes.add_word("WHILE", Builtin::new("WHILE", f_while));
    scopes.add_word("DOWHILE", Builtin::new("DOWHILE", f_dowhile));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn iftrue_runs_code_only_when_true() {
        let mut interp = Interpreter::new();
        interp.run("TRUE [ 1 ] IFTRUE").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(1));

        let mut interp = Interpreter::new();
        interp.run("FALSE [ 1 ] IFTRUE").unwrap();
        assert_eq!(interp.scopes.active_len(), 0);
    }

    #[test]
    fn ifelse_picks_the_right_branch() {
        let mut interp = Interpreter::new();
        interp.run("FALSE [ 1 ] [ 2 ] IFELSE").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(2));
    }

    #[test]
    fn times_repeats_n_times() {
        let mut interp = Interpreter::new();
        interp.run("VAR n 0 n SWAP STORE [ n FETCH 1 + n SWAP STORE ] 5 TIMES n FETCH").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(5));
    }

    #[test]
    fn dowhile_runs_body_at_least_once() {
        let mut interp = Interpreter::new();
        interp
            .run("VAR n 0 n SWAP STORE [ n FETCH 1 + n SWAP STORE ] [ FALSE ] DOWHILE n FETCH")
            .unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(1));
    }
}
