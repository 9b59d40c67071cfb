//! Arithmetic, bitwise, and comparison binaries, plus their unary cousins.

use crate::error::{InterpError, Result};
use crate::interpreter::Interpreter;
use crate::scope::ScopeStack;
use crate::value::Value;
use crate::word::Builtin;

fn type_err(interp: &Interpreter, word: &str, v: &Value) -> InterpError {
    InterpError::TypeError {
        word: word.to_string(),
        reason: format!("expected a number, found a {}", v.type_name()),
        site: interp.site(),
    }
}

fn numeric_binop(
    interp: &mut Interpreter,
    name: &str,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<()> {
    interp.check_stack(name, 2)?;
    let b = interp.pop(name)?;
    let a = interp.pop(name)?;
    if matches!(a, Value::Float(_)) || matches!(b, Value::Float(_)) {
        let af = a.as_float().ok_or_else(|| type_err(interp, name, &a))?;
        let bf = b.as_float().ok_or_else(|| type_err(interp, name, &b))?;
        interp.push(Value::Float(float_op(af, bf)));
    } else {
        let ai = a.as_int().ok_or_else(|| type_err(interp, name, &a))?;
        let bi = b.as_int().ok_or_else(|| type_err(interp, name, &b))?;
        interp.push(Value::Int(int_op(ai, bi)));
    }
    Ok(())
}

fn int_binop(interp: &mut Interpreter, name: &str, op: fn(i64, i64) -> i64) -> Result<()> {
    interp.check_stack(name, 2)?;
    let b = interp.pop(name)?;
    let a = interp.pop(name)?;
    let ai = a.as_int().ok_or_else(|| type_err(interp, name, &a))?;
    let bi = b.as_int().ok_or_else(|| type_err(interp, name, &b))?;
    interp.push(Value::Int(op(ai, bi)));
    Ok(())
}

fn compare(
    interp: &mut Interpreter,
    name: &str,
    num_cmp: fn(f64, f64) -> bool,
) -> Result<()> {
    interp.check_stack(name, 2)?;
    let b = interp.pop(name)?;
    let a = interp.pop(name)?;
    let af = a.as_float().ok_or_else(|| type_err(interp, name, &a))?;
    let bf = b.as_float().ok_or_else(|| type_err(interp, name, &b))?;
    interp.push(Value::Bool(num_cmp(af, bf)));
    Ok(())
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        _ if a.is_numeric() && b.is_numeric() => a.as_float() == b.as_float(),
        _ => false,
    }
}

macro_rules! def_binop {
    ($fname:ident, $word:literal, $int_op:expr, $float_op:expr) => {
        fn $fname(interp: &mut Interpreter) -> Result<()> {
            numeric_binop(interp, $word, $int_op, $float_op)
        }
    };
}

def_binop!(f_add, "+", |a, b| a + b, |a, b| a + b);
def_binop!(f_sub, "-", |a, b| a - b, |a, b| a - b);
def_binop!(f_mul, "*", |a, b| a * b, |a, b| a * b);

/// `**` ( a b -- a**b ). A negative integer exponent can't be represented by
/// `i64::pow`, so it promotes to float rather than panicking on the cast.
fn f_pow(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("**", 2)?;
    let b = interp.pop("**")?;
    let a = interp.pop("**")?;
    if matches!(a, Value::Float(_)) || matches!(b, Value::Float(_)) || b.as_int().map(|i| i < 0).unwrap_or(false) {
        let af = a.as_float().ok_or_else(|| type_err(interp, "**", &a))?;
        let bf = b.as_float().ok_or_else(|| type_err(interp, "**", &b))?;
        interp.push(Value::Float(af.powf(bf)));
    } else {
        let ai = a.as_int().ok_or_else(|| type_err(interp, "**", &a))?;
        let bi = b.as_int().ok_or_else(|| type_err(interp, "**", &b))?;
        interp.push(Value::Int(ai.pow(bi as u32)));
    }
    Ok(())
}

/// Floor division, matching Python's `//`: the quotient rounds toward
/// negative infinity rather than toward zero as `i64`'s own `/` does.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Modulo matching Python's `%`: the result takes the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

def_binop!(f_mod, "%", |a, b| floor_mod(a, b), |a, b| a - b * (a / b).floor());

fn f_div(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("/", 2)?;
    let b = interp.pop("/")?;
    let a = interp.pop("/")?;
    let af = a.as_float().ok_or_else(|| type_err(interp, "/", &a))?;
    let bf = b.as_float().ok_or_else(|| type_err(interp, "/", &b))?;
    interp.push(Value::Float(af / bf));
    Ok(())
}

fn f_floordiv(interp: &mut Interpreter) -> Result<()> {
    int_binop(interp, "//", floor_div)
}

fn f_shl(interp: &mut Interpreter) -> Result<()> {
    int_binop(interp, "<<", |a, b| a << b)
}

fn f_shr(interp: &mut Interpreter) -> Result<()> {
    int_binop(interp, ">>", |a, b| a >> b)
}

fn f_bitand(interp: &mut Interpreter) -> Result<()> {
    int_binop(interp, "&", |a, b| a & b)
}

fn f_bitor(interp: &mut Interpreter) -> Result<()> {
    int_binop(interp, "|", |a, b| a | b)
}

fn f_bitxor(interp: &mut Interpreter) -> Result<()> {
    int_binop(interp, "^", |a, b| a ^ b)
}

fn f_bitnot(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("BITNOT", 1)?;
    let a = interp.pop("BITNOT")?;
    let ai = a.as_int().ok_or_else(|| type_err(interp, "BITNOT", &a))?;
    interp.push(Value::Int(!ai));
    Ok(())
}

/// `NEGATE` ( a -- -a )
fn f_negate(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("NEGATE", 1)?;
    let a = interp.pop("NEGATE")?;
    match a {
        Value::Int(i) => interp.push(Value::Int(-i)),
        Value::Float(f) => interp.push(Value::Float(-f)),
        other => return Err(type_err(interp, "NEGATE", &other)),
    }
    Ok(())
}

fn f_lt(interp: &mut Interpreter) -> Result<()> {
    compare(interp, "<", |a, b| a < b)
}
fn f_gt(interp: &mut Interpreter) -> Result<()> {
    compare(interp, ">", |a, b| a > b)
}
fn f_le(interp: &mut Interpreter) -> Result<()> {
    compare(interp, "<=", |a, b| a <= b)
}
fn f_ge(interp: &mut Interpreter) -> Result<()> {
    compare(interp, ">=", |a, b| a >= b)
}

fn f_eq(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("==", 2)?;
    let b = interp.pop("==")?;
    let a = interp.pop("==")?;
    interp.push(Value::Bool(values_equal(&a, &b)));
    Ok(())
}

fn f_ne(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("!=", 2)?;
    let b = interp.pop("!=")?;
    let a = interp.pop("!=")?;
    interp.push(Value::Bool(!values_equal(&a, &b)));
    Ok(())
}

fn f_is(interp: &mut Interpreter) -> Result<()> {
    f_eq(interp)
}

fn f_in(interp: &mut Interpreter) -> Result<()> {
    interp.check_stack("IN", 2)?;
    let container = interp.pop("IN")?;
    let needle = interp.pop("IN")?;
    let found = match &container {
        Value::List(items) => items.iter().any(|i| values_equal(i, &needle)),
        Value::Str(s) => match &needle {
            Value::Str(n) => s.contains(n.as_str()),
            _ => false,
        },
        _ => {
            return Err(InterpError::TypeError {
                word: "IN".to_string(),
                reason: format!("cannot search in a {}", container.type_name()),
                site: interp.site(),
            })
        }
    };
    interp.push(Value::Bool(found));
    Ok(())
}

pub fn register(scopes: &mut ScopeStack) {
    let table: &[(&str, fn(&mut Interpreter) -> Result<()>)] = &[
        ("+", f_add),
        ("-", f_sub),
        ("*", f_mul),
        ("**", f_pow),
        ("/", f_div),
        ("//", f_floordiv),
        ("%", f_mod),
        ("<<", f_shl),
        (">>", f_shr),
        ("&", f_bitand),
        ("|", f_bitor),
        ("^", f_bitxor),
        ("BITNOT", f_bitnot),
        ("NEGATE", f_negate),
        ("<", f_lt),
        (">", f_gt),
        ("<=", f_le),
        (">=", f_ge),
        ("==", f_eq),
        ("!=", f_ne),
        ("IN", f_in),
        ("IS", f_is),
    ];
    for (name, func) in table {
        scopes.add_word(name, Builtin::new(name, *func));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn addition_promotes_to_float_when_needed() {
        let mut interp = Interpreter::new();
        interp.run("1 2.5 +").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_float(), Some(3.5));
    }

    #[test]
    fn comparisons_push_booleans() {
        let mut interp = Interpreter::new();
        interp.run("3 4 <").unwrap();
        assert!(interp.pop("test").unwrap().as_bool());
    }

    #[test]
    fn in_checks_list_membership() {
        let mut interp = Interpreter::new();
        interp.run("2 [ 1 2 3 ] IN").unwrap();
        assert!(interp.pop("test").unwrap().as_bool());
    }

    #[test]
    fn floordiv_rounds_toward_negative_infinity() {
        let mut interp = Interpreter::new();
        interp.run("-7 2 //").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(-4));
        interp.run("7 -2 //").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(-4));
    }

    #[test]
    fn mod_takes_the_sign_of_the_divisor() {
        let mut interp = Interpreter::new();
        interp.run("-7 3 %").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(2));
        interp.run("7 -3 %").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(-2));
    }

    #[test]
    fn pow_with_negative_exponent_promotes_to_float_instead_of_panicking() {
        let mut interp = Interpreter::new();
        interp.run("2 -1 **").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_float(), Some(0.5));
    }

    #[test]
    fn negate_flips_the_sign_of_ints_and_floats() {
        let mut interp = Interpreter::new();
        interp.run("5 NEGATE").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_int(), Some(-5));
        interp.run("1.5 NEGATE").unwrap();
        assert_eq!(interp.pop("test").unwrap().as_float(), Some(-1.5));
    }
}
