//! Black-box end-to-end tests exercising the crate through its public API
//! (`vibe::Lexer` / `vibe::parser::parse` / `vibe::Interpreter`), covering
//! the worked scenarios and cross-cutting properties of the language.

use pretty_assertions::assert_eq;
use vibe::{Env, Interner, Interpreter, Value};

fn run(source: &str) -> Value {
    let mut interner = Interner::new();
    let (program, diagnostics) = vibe::parser::parse(source, &mut interner);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    let env = Env::root();
    vibe::builtins::register_builtins(&env);
    let interpreter = Interpreter::new(&interner);
    interpreter.eval_program(&program, &env)
}

#[test]
fn sum_of_two_variables() {
    assert!(matches!(run("x = 5\ny = 10\nz = x + y\nz"), Value::Integer(15)));
}

#[test]
fn typed_if_else_branch_selection() {
    assert!(matches!(
        run("x: int = 10\ny: int = 0\nif x > 5 do\n  y = 1\nelse\n  y = 2\nend\ny"),
        Value::Integer(1)
    ));
}

#[test]
fn for_loop_accumulates_into_an_outer_variable() {
    assert!(matches!(
        run("sum = 0\nfor i in [1, 2, 3, 4, 5] do\n  sum = sum + i\nend\nsum"),
        Value::Integer(15)
    ));
}

#[test]
fn typed_function_definition_and_call() {
    assert!(matches!(
        run("def add(x: int, y: int): int do\n  x + y\nend\nadd(2, 5)"),
        Value::Integer(7)
    ));
}

#[test]
fn nested_function_closes_over_outer_parameter() {
    assert!(matches!(
        run(
            "def makeAdder(x: int) do\n  def(y: int): int do\n    return x + y\n  end\nend\nadd2 = makeAdder(2)\nadd2(2)"
        ),
        Value::Integer(4)
    ));
}

#[test]
fn string_concatenation_with_plus() {
    match run(r#""hello" + " " + "world""#) {
        Value::String(s) => assert_eq!(s, "hello world".to_string()),
        other => panic!("expected String, got {:?}", other),
    }
}

#[test]
fn incompatible_type_annotation_is_a_runtime_error() {
    assert!(run(r#"a: int = "thirty""#).is_error());
}

#[test]
fn division_by_zero_is_an_error_value_not_a_panic() {
    match run("10 / 0") {
        Value::Error(msg) => assert_eq!(msg, "division by zero"),
        other => panic!("expected Error, got {:?}", other),
    }
}

#[test]
fn early_return_short_circuits_the_rest_of_the_function_body() {
    assert!(matches!(
        run("def first_even(xs) do\n  for x in xs do\n    if x % 2 == 0 do\n      return x\n    end\n  end\n  return -1\nend\nfirst_even([1, 3, 4, 5])"),
        Value::Integer(4)
    ));
}

#[test]
fn return_wrapping_an_error_surfaces_the_error() {
    assert!(run("def bad() do\n  return 1 / 0\nend\nbad()").is_error());
}

#[test]
fn while_loop_mutates_an_outer_binding_across_iterations() {
    assert!(matches!(
        run("n = 0\nwhile n < 5 do\n  n = n + 1\nend\nn"),
        Value::Integer(5)
    ));
}

#[test]
fn recursive_function_computes_factorial() {
    assert!(matches!(
        run("def fact(n: int): int do\n  if n <= 1 do\n    return 1\n  end\n  return n * fact(n - 1)\nend\nfact(5)"),
        Value::Integer(120)
    ));
}

#[test]
fn union_typed_parameter_accepts_either_member() {
    assert!(matches!(
        run("def describe(x: int || string): string do\n  str(x)\nend\ndescribe(1)\ndescribe(\"a\")"),
        Value::String(_)
    ));
}

#[test]
fn out_of_range_array_index_is_nil_not_an_error() {
    assert!(matches!(run("[1, 2, 3][99]"), Value::Nil));
}

#[test]
fn falsy_values_match_the_documented_truthiness_table() {
    assert!(matches!(run("if 0 do\n  1\nelse\n  2\nend"), Value::Integer(2)));
    assert!(matches!(run(r#"if "" do 1 else 2 end"#), Value::Integer(2)));
    assert!(matches!(run("if nil do\n  1\nelse\n  2\nend"), Value::Integer(2)));
}

#[test]
fn arity_mismatch_on_a_user_function_is_an_error() {
    assert!(run("def add(x: int, y: int): int do\n  x + y\nend\nadd(1)").is_error());
}

#[test]
fn script_loaded_from_disk_evaluates_like_an_inline_program() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("greet.vi");
    std::fs::write(&path, "def greet(name: string): string do\n  \"hi \" + name\nend\ngreet(\"vibe\")")
        .expect("write script");

    let source = std::fs::read_to_string(&path).expect("read script back");
    match run(&source) {
        Value::String(s) => assert_eq!(s, "hi vibe".to_string()),
        other => panic!("expected String, got {:?}", other),
    }
}
