use ccforth::cfront;
use ccforth::Interpreter;

fn run(src: &str) -> Interpreter {
    let mut interp = Interpreter::new();
    interp.run(src).expect("program should run to completion");
    interp
}

#[test]
fn addition_and_print_contract() {
    let mut interp = run("3 4 +");
    assert_eq!(interp.scopes.active_stack().last().unwrap().as_int(), Some(7));
    let _ = interp.pop("test");
}

#[test]
fn variable_store_and_fetch_round_trip() {
    let mut interp = run("VAR x 5 x SWAP STORE x FETCH");
    assert_eq!(interp.pop("test").unwrap().as_int(), Some(5));
}

#[test]
fn user_word_squares_its_argument() {
    let mut interp = run("DEF sq VAR n n PARAM n FETCH n FETCH * END 6 sq");
    assert_eq!(interp.pop("test").unwrap().as_int(), Some(36));
}

#[test]
fn list_literal_supports_indexing() {
    let mut interp = run("[ 10 20 30 ] 1 ITEM");
    assert_eq!(interp.pop("test").unwrap().as_int(), Some(20));
}

#[test]
fn while_loop_counts_up_to_five() {
    let mut interp = run(
        "VAR i 0 i SWAP STORE [ i FETCH 5 < ] [ i FETCH 1 + i SWAP STORE ] WHILE i FETCH",
    );
    assert_eq!(interp.pop("test").unwrap().as_int(), Some(5));
}

#[test]
fn assign_inside_def_defers_store_until_the_word_is_called() {
    let mut interp = run("VAR x 0 x SWAP STORE DEF setx = x 99 END x FETCH");
    assert_eq!(interp.pop("test").unwrap().as_int(), Some(0));
    interp.run("setx x FETCH").unwrap();
    assert_eq!(interp.pop("test").unwrap().as_int(), Some(99));
}

#[test]
fn nested_scope_depth_is_restored_after_a_call() {
    let mut interp = Interpreter::new();
    let depth_before = interp.scopes.depth();
    interp.run("DEF noop 1 DROP END noop").unwrap();
    assert_eq!(interp.scopes.depth(), depth_before);
}

fn compile_and_call(source: &str, call: &str) -> Interpreter {
    let program = cfront::compile(source).expect("C source should compile");
    let mut interp = Interpreter::new();
    interp
        .run(&format!("{program}\n{call}"))
        .expect("lowered program should run");
    interp
}

#[test]
fn compiled_addition_function_runs_end_to_end() {
    let mut interp = compile_and_call(
        "int add(int a, int b) { return a + b; }\nint main() { return add(2, 3); }",
        "main",
    );
    assert_eq!(interp.pop("test").unwrap().as_int(), Some(5));
}

#[test]
fn compiled_if_else_picks_a_branch() {
    let mut interp = compile_and_call(
        "int pick(int flag) { if (flag) { return 1; } else { return 2; } }\nint main() { return pick(0); }",
        "main",
    );
    assert_eq!(interp.pop("test").unwrap().as_int(), Some(2));
}

#[test]
fn compiled_unary_minus_negates_its_operand() {
    let mut interp = compile_and_call(
        "int negate(int a) { return -a; }\nint main() { return negate(7); }",
        "main",
    );
    assert_eq!(interp.pop("test").unwrap().as_int(), Some(-7));
}

#[test]
fn compiled_while_loop_counts_to_five() {
    let mut interp = compile_and_call(
        "int count() { int i; i = 0; while (i < 5) { i = i + 1; } return i; }\nint main() { return count(); }",
        "main",
    );
    assert_eq!(interp.pop("test").unwrap().as_int(), Some(5));
}
