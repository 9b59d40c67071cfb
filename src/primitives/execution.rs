//! Process termination and user-raised errors.

use std::process;

use crate::error::{InterpError, Result};
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::word::Builtin;

fn f_exit(interp: &mut Interpreter) -> Result<()> {
    interp.msg.info("EXIT", "terminating", None::<bool>);
    process::exit(0);
}

fn f_raise(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("RAISE", 2)?;
    let name = interp.pop("RAISE")?;
    let message = interp.pop("RAISE")?;
    Err(InterpError::Raised {
        name: name.to_string(),
        message: message.to_string(),
        site: interp.site(),
    })
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("EXIT", Builtin::new("EXIT", f_exit));
    scopes.add_word("RAISE", Builtin::new("RAISE", f_raise));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn raise_surfaces_name_and_message() {
        let mut interp = Interpreter::new();
        let err = interp.run("\"bad input\" \"ValueError\" RAISE").unwrap_err();
        let text = format!("{err}");
        assert!(text.contains("bad input"));
    }
}
