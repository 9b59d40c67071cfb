//! The `Word` abstraction: anything the dictionary can bind a name to.

use std::rc::Rc;

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// A callable bound to a dictionary entry. Builtins and compiled user words
/// both implement this; the interpreter never needs to know which.
pub trait Word {
    fn name(&self) -> &str;

    /// Immediate words execute during compilation instead of being appended
    /// to the enclosing AOT scope.
    fn is_immediate(&self) -> bool {
        false
    }

    fn invoke(&self, interp: &mut Interpreter) -> Result<()>;
}

type BuiltinFn = fn(&mut Interpreter) -> Result<()>;

/// A native word implemented directly in Rust.
pub struct Builtin {
    name: String,
    immediate: bool,
    func: BuiltinFn,
}

impl Builtin {
    pub fn new(name: &str, func: BuiltinFn) -> Rc<Builtin> {
        Rc::new(Builtin {
            name: name.to_string(),
            immediate: false,
            func,
        })
    }

    pub fn new_immediate(name: &str, func: BuiltinFn) -> Rc<Builtin> {
        Rc::new(Builtin {
            name: name.to_string(),
            immediate: true,
            func,
        })
    }
}

impl Word for Builtin {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_immediate(&self) -> bool {
        self.immediate
    }

    fn invoke(&self, interp: &mut Interpreter) -> Result<()> {
        (self.func)(interp)
    }
}

/// A word that does nothing but push a fixed, captured value. Used for both
/// a VAR's access word (captured value is a `Value::Var` cell reference) and
/// a CONST's access word (captured value is the already-resolved literal) —
/// the difference between writable and read-only falls straight out of which
/// `Value` variant got captured, with no extra machinery needed.
pub struct ValuePusher {
    name: String,
    value: Value,
}

impl ValuePusher {
    pub fn new(name: &str, value: Value) -> Rc<ValuePusher> {
        Rc::new(ValuePusher {
            name: name.to_string(),
            value,
        })
    }
}

impl Word for ValuePusher {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, interp: &mut Interpreter) -> Result<()> {
        interp.push(self.value.clone());
        Ok(())
    }
}

/// A word compiled from a `DEF ... END` body: a flat sequence of values
/// (numbers, strings, and word references) captured while the name's AOT
/// scope was open.
pub struct CompiledWord {
    name: String,
    body: Vec<Value>,
}

impl CompiledWord {
    pub fn new(name: String, body: Vec<Value>) -> Rc<CompiledWord> {
        Rc::new(CompiledWord { name, body })
    }
}

impl Word for CompiledWord {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, interp: &mut Interpreter) -> Result<()> {
        interp.scopes.new_block_scope();
        let result = (|| -> Result<()> {
            for value in &self.body {
                interp.interpret(value.clone())?;
                if interp.returning {
                    interp.returning = false;
                    break;
                }
            }
            Ok(())
        })();
        let stack = interp.scopes.pop_scope();
        result?;
        if let Some(top) = stack.into_iter().last() {
            interp.scopes.push(top);
        }
        Ok(())
    }
}
