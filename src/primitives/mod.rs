//! The primitive word library, split into the same word-set boundaries the
//! source this was distilled from used: one submodule per set, each
//! exporting a `register` function that installs its words into the
//! top-level dictionary scope.

pub mod arith;
pub mod control;
pub mod execution;
pub mod functions;
pub mod hostbridge;
pub mod imports;
pub mod io;
pub mod lists;
pub mod logic;
pub mod stack;
pub mod text;
pub mod values;

use crate::scope::ScopeStack;

pub fn register_all(scopes: &mut ScopeStack) {
    io::register(scopes);
    stack::register(scopes);
    arith::register(scopes);
    logic::register(scopes);
    values::register(scopes);
    functions::register(scopes);
    lists::register(scopes);
    control::register(scopes);
    text::register(scopes);
    execution::register(scopes);
    hostbridge::register(scopes);
    imports::register(scopes);
}
