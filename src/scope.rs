//! The paired dictionary/data-stack scope chain.
//!
//! Each open scope owns both a data stack and a dictionary; the two stacks
//! are kept the same depth by construction, which is the simplest way to
//! guarantee the invariant that they never drift apart.

use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;
use crate::word::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// A runtime scope: words execute as they are interpreted.
    Block,
    /// A compile-time (ahead-of-time) scope: words accumulate into the data
    /// stack instead of executing, e.g. the body of `DEF ... END` or `[ ... ]`.
    Aot,
}

struct Frame {
    data: Vec<Value>,
    dict: HashMap<String, Rc<dyn Word>>,
    kind: ScopeKind,
}

pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> ScopeStack {
        ScopeStack {
            frames: vec![Frame {
                data: Vec::new(),
                dict: HashMap::new(),
                kind: ScopeKind::Block,
            }],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_compiling(&self) -> bool {
        self.frames.last().map(|f| f.kind == ScopeKind::Aot).unwrap_or(false)
    }

    pub fn new_block_scope(&mut self) {
        self.frames.push(Frame {
            data: Vec::new(),
            dict: HashMap::new(),
            kind: ScopeKind::Block,
        });
    }

    pub fn new_aot_scope(&mut self) {
        self.frames.push(Frame {
            data: Vec::new(),
            dict: HashMap::new(),
            kind: ScopeKind::Aot,
        });
    }

    /// Pop the innermost scope, returning its accumulated data stack.
    pub fn pop_scope(&mut self) -> Vec<Value> {
        let frame = self
            .frames
            .pop()
            .expect("pop_scope called with no open scope");
        frame.data
    }

    // --- data stack operations on the innermost (active) scope ---

    pub fn push(&mut self, value: Value) {
        self.active_frame().data.push(value);
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.active_frame().data.pop()
    }

    pub fn peek(&self) -> Option<&Value> {
        self.frames.last().and_then(|f| f.data.last())
    }

    pub fn active_len(&self) -> usize {
        self.frames.last().map(|f| f.data.len()).unwrap_or(0)
    }

    pub fn active_stack(&self) -> &[Value] {
        &self.frames.last().expect("no open scope").data
    }

    /// The data stack of the scope one level out from the active one,
    /// used by PARAM to pick up a caller's argument.
    pub fn enclosing_pop(&mut self) -> Option<Value> {
        let len = self.frames.len();
        if len < 2 {
            return None;
        }
        self.frames[len - 2].data.pop()
    }

    fn active_frame(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("no open scope")
    }

    // --- dictionary operations ---

    /// Insert into the innermost dictionary scope, overwriting any existing
    /// binding there.
    pub fn add_word(&mut self, name: &str, word: Rc<dyn Word>) {
        self.active_frame().dict.insert(name.to_uppercase(), word);
    }

    /// Bind `name` to `word`. If `global` and `name` already exists in some
    /// open scope, rebind it there; otherwise insert into the innermost scope.
    pub fn define(&mut self, name: &str, word: Rc<dyn Word>, global: bool) {
        let key = name.to_uppercase();
        if global {
            for frame in self.frames.iter_mut().rev() {
                if frame.dict.contains_key(&key) {
                    frame.dict.insert(key, word);
                    return;
                }
            }
        }
        self.active_frame().dict.insert(key, word);
    }

    pub fn lookup(&self, name: &str) -> Option<Rc<dyn Word>> {
        let key = name.to_uppercase();
        for frame in self.frames.iter().rev() {
            if let Some(word) = frame.dict.get(&key) {
                return Some(Rc::clone(word));
            }
        }
        None
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Builtin;

    fn noop(_: &mut crate::interpreter::Interpreter) -> crate::error::Result<()> {
        Ok(())
    }

    #[test]
    fn nested_scopes_keep_depth_balanced() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.depth(), 1);
        scopes.new_aot_scope();
        scopes.new_block_scope();
        assert_eq!(scopes.depth(), 3);
        scopes.pop_scope();
        scopes.pop_scope();
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn lookup_walks_outward() {
        let mut scopes = ScopeStack::new();
        scopes.add_word("DUP", Builtin::new("DUP", noop));
        scopes.new_block_scope();
        assert!(scopes.lookup("dup").is_some());
        assert!(scopes.lookup("dup").is_some());
    }

    #[test]
    fn inner_definition_shadows_outer() {
        let mut scopes = ScopeStack::new();
        scopes.add_word("X", Builtin::new("X", noop));
        scopes.new_block_scope();
        scopes.add_word("X", Builtin::new_immediate("X", noop));
        assert!(scopes.lookup("X").unwrap().is_immediate());
        scopes.pop_scope();
        assert!(!scopes.lookup("X").unwrap().is_immediate());
    }

    #[test]
    fn enclosing_pop_reads_one_level_out() {
        let mut scopes = ScopeStack::new();
        scopes.push(Value::Int(7));
        scopes.new_block_scope();
        assert_eq!(scopes.enclosing_pop().unwrap().as_int(), Some(7));
    }
}
