use pretty_assertions::assert_eq;

use rlox::{Config, InterpretError, RuntimeErrorKind, Value, VM};

type TestVm = VM<Vec<u8>, Vec<u8>>;

fn vm() -> TestVm {
    VM::with_output(Vec::new(), Vec::new(), Config::default())
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Runs `source` on a fresh VM and returns what it printed.
fn eval(source: &str) -> String {
    let mut vm = vm();
    vm.interpret(source)
        .unwrap_or_else(|e| panic!("{:?} failed: {}", source, e));
    text(vm.output())
}

#[test]
fn precedence() {
    assert_eq!(eval("1 + 2 * 3"), "7\n");
    assert_eq!(eval("(1 + 2) * 3"), "9\n");
    assert_eq!(eval("8 / 4 / 2"), "1\n");
    assert_eq!(eval("-2 * -(3 - 1)"), "4\n");
}

#[test]
fn unary_and_relational() {
    assert_eq!(eval("!(5 - 4 > 3 * 2 == !nil)"), "true\n");
    assert_eq!(eval("1 <= 1"), "true\n");
    assert_eq!(eval("2 >= 3"), "false\n");
    assert_eq!(eval("1 != 2"), "true\n");
    assert_eq!(eval("!0"), "false\n");
}

#[test]
fn literals() {
    assert_eq!(eval("nil"), "nil\n");
    assert_eq!(eval("true"), "true\n");
    assert_eq!(eval("\"hello world\""), "hello world\n");
    assert_eq!(eval("// just a comment\n 42 // trailing"), "42\n");
}

#[test]
fn numbers_print_shortest() {
    assert_eq!(eval("10"), "10\n");
    assert_eq!(eval("2.5 * 2"), "5\n");
    assert_eq!(eval("1 / 3"), "0.3333333333333333\n");
    assert_eq!(eval("1 / 0"), "inf\n");
    assert_eq!(eval("1000000 * 1000000 * 1000000 * 1000"), "1e+21\n");
    assert_eq!(eval("0 / 0 == 0 / 0"), "false\n");
}

#[test]
fn concatenation_and_interning() {
    let mut vm = vm();
    vm.interpret("\"ab\" + \"cd\"").unwrap();
    assert_eq!(text(vm.output()), "abcd\n");

    let live = vm.heap().strings().len();
    let objects = vm.heap().len();

    let literal = vm.heap_mut().copy_string("abcd");
    assert_eq!(vm.heap().strings().len(), live);
    assert_eq!(vm.heap().len(), objects);

    let again = vm.heap_mut().take_string("ab".to_owned() + "cd");
    assert_eq!(literal, again);
}

#[test]
fn string_equality_is_by_content() {
    assert_eq!(eval("\"abcd\" == \"ab\" + \"cd\""), "true\n");
    assert_eq!(eval("\"a\" + \"b\" + \"c\" == \"a\" + \"bc\""), "true\n");
    assert_eq!(eval("\"abc\" == \"abd\""), "false\n");
    assert_eq!(eval("\"1\" == 1"), "false\n");
}

#[test]
fn runtime_type_error() {
    let mut vm = vm();
    let result = vm.interpret("1 + true");

    match result {
        Err(InterpretError::Runtime(e)) => {
            assert!(matches!(e.kind, RuntimeErrorKind::AddMismatch));
            assert_eq!(e.line, 1);
        }
        other => panic!("expected runtime error, got {:?}", other),
    }

    assert!(vm.stack().is_empty());
    assert_eq!(text(vm.output()), "");
    assert_eq!(
        text(vm.errors()),
        "Operands must be two numbers or two strings.\n[line 1] in script\n"
    );
}

#[test]
fn malformed_input_runs_nothing() {
    let mut vm = vm();
    let result = vm.interpret("\"unterminated");

    assert!(matches!(result, Err(InterpretError::Compile(_))));
    assert_eq!(text(vm.output()), "");
    assert_eq!(text(vm.errors()), "[line 1] Error: Unterminated string.\n");
}

#[test]
fn compile_errors_accumulate_without_cascades() {
    let mut vm = vm();
    let result = vm.interpret("(1 +\n)");

    match result {
        Err(InterpretError::Compile(e)) => {
            assert_eq!(e.diagnostics.len(), 1);
            assert_eq!(e.diagnostics[0].line, 2);
        }
        other => panic!("expected compile error, got {:?}", other),
    }
    assert_eq!(
        text(vm.errors()),
        "[line 2] Error at ')': Expect expression.\n"
    );
    assert_eq!(text(vm.output()), "");
}

#[test]
fn deep_nesting_is_a_compile_error() {
    let mut vm = vm();
    let result = vm.interpret(&("-".repeat(200_000) + "1"));

    assert!(matches!(result, Err(InterpretError::Compile(_))));
    assert_eq!(
        text(vm.errors()),
        "[line 1] Error at '-': Expression nested too deeply.\n"
    );
    assert!(vm.interpret("-(1)").is_ok());
}

#[test]
fn vm_is_reusable_after_errors() {
    let mut vm = vm();
    assert!(vm.interpret("-nil").is_err());
    assert!(vm.interpret("1 +").is_err());
    vm.interpret("3 * 3").unwrap();

    assert_eq!(text(vm.output()), "9\n");
    assert!(vm.stack().is_empty());
}

#[test]
fn vms_do_not_share_strings() {
    let mut a = vm();
    let mut b = vm();
    a.interpret("\"x\" + \"y\"").unwrap();
    b.interpret("\"x\"").unwrap();

    assert_eq!(a.heap().len(), 3);
    assert_eq!(b.heap().len(), 1);

    let xy = a.heap_mut().copy_string("xy");
    assert_eq!(
        a.heap().string(xy).map(|s| s.as_str()),
        Some("xy")
    );
    assert_eq!(Value::from(xy), Value::from(a.heap_mut().copy_string("xy")));
}

#[test]
fn literals_resolve_against_the_running_vm() {
    let mut vm = vm();
    vm.heap_mut().copy_string("a");
    vm.interpret("\"b\"").unwrap();
    vm.interpret("\"a\" + \"b\"").unwrap();

    assert_eq!(text(vm.output()), "b\nab\n");
}
