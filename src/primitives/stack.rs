//! Basic stack shuffling words.

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::word::Builtin;

fn f_dup(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("DUP", 1)?;
    let top = interp.pop("DUP")?;
    interp.push(top.clone());
    interp.push(top);
    Ok(())
}

fn f_drop(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("DROP", 1)?;
    interp.pop("DROP")?;
    Ok(())
}

fn f_swap(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("SWAP", 2)?;
    let b = interp.pop("SWAP")?;
    let a = interp.pop("SWAP")?;
    interp.push(b);
    interp.push(a);
    Ok(())
}

fn f_over(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("OVER", 2)?;
    let b = interp.pop("OVER")?;
    let a = interp.pop("OVER")?;
    interp.push(a.clone());
    interp.push(b);
    interp.push(a);
    Ok(())
}

fn f_rot(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("ROT", 3)?;
    let c = interp.pop("ROT")?;
    let b = interp.pop("ROT")?;
    let a = interp.pop("ROT")?;
    interp.push(b);
    interp.push(c);
    interp.push(a);
    Ok(())
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("DUP", Builtin::new("DUP", f_dup));
    scopes.add_word("DROP", Builtin::new("DROP", f_drop));
    scopes.add_word("SWAP", Builtin::new("SWAP", f_swap));
    scopes.add_word("OVER", Builtin::new("OVER", f_over));
    scopes.add_word("ROT", Builtin::new("ROT", f_rot));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn dup_drop_is_a_no_op() {
        let mut interp = Interpreter::new();
        interp.run("5 DUP DROP").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(5));
        assert_eq!(interp.scopes.active_len(), 0);
    }

    #[test]
    fn swap_swap_is_a_no_op() {
        let mut interp = Interpreter::new();
        interp.run("1 2 SWAP SWAP").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(2));
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(1));
    }

    #[test]
    fn rot_cycles_three_items() {
        let mut interp = Interpreter::new();
        interp.run("1 2 3 ROT").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(1));
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(3));
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(2));
    }
}
