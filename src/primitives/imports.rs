//! IMPORT: load and run a library file from `./lib/`.

use crate::error::Result;
use crate::files::read_library;
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::word::Builtin;

fn f_import(interp: &mut Interpreter) -> Result<()> {
    let name = interp.next_word();
    let source = read_library(&name, &interp.msg)?;
    interp.run(&source)
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("IMPORT", Builtin::new_immediate("IMPORT", f_import));
}
