//! Source-text comments.

use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::word::Builtin;

fn f_comment(interp: &mut Interpreter) -> Result<()> {
    interp.clear_line();
    Ok(())
}

pub fn register(scopes: &mut ScopeStack) {
    scopes.add_word("#", Builtin::new_immediate("#", f_comment));
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;

    #[test]
    fn comment_consumes_rest_of_line() {
        let mut interp = Interpreter::new();
        interp.run("1 # this is ignored\n2 +").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(3));
    }
}
