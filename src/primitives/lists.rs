//! List literals and element access.

use crate::error::{InterpError, Result};
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::value::Value;
use crate::word::Builtin;

fn f_open_list(interp: &mut Interpreter) -> Result<()> {
    interp.scopes.new_aot_scope();
    Ok(())
}

fn f_close_list(interp: &mut Interpreter) -> Result<()> {
    let items = interp.scopes.pop_scope();
    interp.push(Value::List(items));
    Ok(())
}

fn index_of(interp: &Interpreter, word: &str, list: &[Value], idx: &Value) -> Result<usize> {
    let i = idx.as_int().ok_or_else(|| InterpError::TypeError {
        word: word.to_string(),
        reason: format!("expected an integer index, found a {}", idx.type_name()),
        site: interp.site(),
    })?;
    if i < 0 || i as usize >= list.len() {
        return Err(InterpError::Runtime {
            reason: format!("index {i} out of range for list of length {}", list.len()),
            site: interp.site(),
        });
    }
    Ok(i as usize)
}

fn f_length(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("LENGTH", 1)?;
    let v = interp.pop("LENGTH")?;
    match v {
        Value::List(items) => {
            interp.push(Value::Int(items.len() as i64));
            Ok(())
        }
        other => Err(InterpError::TypeError {
            word: "LENGTH".to_string(),
            reason: format!("expected a list, found a {}", other.type_name()),
            site: interp.site(),
        }),
    }
}

fn f_item(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("ITEM", 2)?;
    let idx = interp.pop("ITEM")?;
    let list = interp.pop("ITEM")?;
    match list {
        Value::List(items) => {
            let i = index_of(interp, "ITEM", &items, &idx)?;
            interp.push(items[i].clone());
            Ok(())
        }
        other => Err(InterpError::TypeError {
            word: "ITEM".to_string(),
            reason: format!("expected a list, found a {}", other.type_name()),
            site: interp.site(),
        }),
    }
}

fn f_store_item(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("STORE_ITEM", 3)?;
    let idx = interp.pop("STORE_ITEM")?;
    let list = interp.pop("STORE_ITEM")?;
    let value = interp.pop("STORE_ITEM")?;
    match list {
        Value::List(mut items) => {
            let i = index_of(interp, "STORE_ITEM", &items, &idx)?;
            items[i] = value;
            interp.push(Value::List(items));
            Ok(())
        }
        other => Err(InterpError::TypeError {
            word: "STORE_ITEM".to_string(),
            reason: format!("expected a list, found a {}", other.type_name()),
            site: interp.site(),
        }),
    }
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("[", Builtin::new_immediate("[", f_open_list));
    scopes.add_word("]", Builtin::new_immediate("]", f_close_list));
    scopes.add_word("LENGTH", Builtin::new("LENGTH", f_length));
    scopes.add_word("ITEM", Builtin::new("ITEM", f_item));
    scopes.add_word("STORE_ITEM", Builtin::new("STORE_ITEM", f_store_item));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn list_round_trips_length_and_items() {
        let mut interp = Interpreter::new();
        interp.run("[ 10 20 30 ]").unwrap();
        let list = interp.pop("test").unwrap();
        if let Value::List(items) = &list {
            assert_eq!(items.len(), 3);
        } else {
            panic!("expected a list");
        }
        interp.push(list);
        interp.run("2 ITEM").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(30));
    }

    #[test]
    fn store_item_replaces_an_element() {
        let mut interp = Interpreter::new();
        interp.run("99 [ 1 2 3 ] 1 STORE_ITEM").unwrap();
        let list = interp.pop("test").unwrap();
        if let Value::List(items) = list {
            assert_eq!(items[1].as_int(), Some(99));
        } else {
            panic!("expected a list");
        }
    }
}
