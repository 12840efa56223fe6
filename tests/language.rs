use std::{cell::RefCell, io::Cursor, rc::Rc};

use cflat::{CflatError, Interpreter};

/// A clonable byte sink standing in for stdout, so the test can read back
/// what a script printed after the interpreter is done with the handle.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl std::io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn run_with_input(source: &str, input: &str) -> (Result<(), CflatError>, String) {
    let buffer = SharedBuffer::default();
    let mut interpreter = Interpreter::with_io(Box::new(buffer.clone()),
                                               Box::new(Cursor::new(input.to_string())));

    let result = interpreter.run_source(source, "test.cflat");
    let output = String::from_utf8(buffer.0.borrow().clone()).expect("script output is UTF-8");

    (result, output)
}

fn run(source: &str) -> (Result<(), CflatError>, String) {
    run_with_input(source, "")
}

fn assert_output(source: &str, expected: &str) {
    let (result, output) = run(source);
    if let Err(error) = result {
        panic!("script failed: {error}\nscript:\n{source}");
    }
    assert_eq!(output, expected, "for script:\n{source}");
}

fn assert_runtime_error(source: &str) -> String {
    let (result, _) = run(source);
    match result {
        Err(CflatError::Runtime(error)) => error.to_string(),
        Err(other) => panic!("expected a runtime error, got: {other}\nscript:\n{source}"),
        Ok(()) => panic!("script succeeded but a runtime error was expected:\n{source}"),
    }
}

fn assert_syntax_errors(source: &str) -> Vec<String> {
    let (result, _) = run(source);
    match result {
        Err(CflatError::Syntax(diagnostics)) => {
            diagnostics.iter().map(ToString::to_string).collect()
        },
        Err(other) => panic!("expected syntax errors, got: {other}\nscript:\n{source}"),
        Ok(()) => panic!("script succeeded but syntax errors were expected:\n{source}"),
    }
}

#[test]
fn hello_world() {
    assert_output("void main() { print(\"hello\"); } main();", "hello");
}

#[test]
fn fibonacci_through_returns() {
    assert_output("func fib(n){ if(n<2) return n; return fib(n-1)+fib(n-2); } print(fib(10));",
                  "55");
}

#[test]
fn lexical_shadowing() {
    assert_output("var x = 1; { var x = 2; print(x); } print(x);", "21");
}

#[test]
fn multi_level_break() {
    assert_output("var i=0; while(1){ while(1){ break 2; } i=1; } print(i);", "0");
}

#[test]
fn slice_and_mutate() {
    assert_output("arr a = {10,20,30,40};\n\
                   println(length(a));\n\
                   yeet(a,1);\n\
                   println(a[0]);\n\
                   println(a[1]);\n\
                   println(length(a));",
                  "4\n10\n30\n3\n");
}

#[test]
fn switch_falls_through_to_default() {
    assert_output("switch(2){ case 1: print(\"a\"); case 2: print(\"b\"); case 3: print(\"c\"); default: print(\"d\"); }",
                  "bcd");
}

#[test]
fn switch_without_match_runs_default_only() {
    assert_output("switch(9){ case 1: print(\"a\"); default: print(\"d\"); }", "d");
}

#[test]
fn switch_break_stops_fallthrough() {
    assert_output("switch(1){ case 1: print(\"a\"); case 2: { print(\"b\"); break; } case 3: print(\"c\"); default: print(\"d\"); }",
                  "ab");
}

#[test]
fn cast_round_trips() {
    assert_output("print((str)(int)\"42\");", "42");
    assert_output("print((int)(str) 7);", "7");
    assert_output("print((bln)(int) true);", "true");
    assert_output("print((flt) 1);", "1");
    assert_output("print((int) 9.9);", "9");
    assert_output("print((str) null);", "null");
}

#[test]
fn integer_truthiness_is_odd_only() {
    assert_output("if (2) print(\"even\"); else print(\"odd-only\");", "odd-only");
    assert_output("if (3) print(\"taken\");", "taken");
    assert_output("print((bln)(0-3));", "false");
    assert_output("print((bln) 0.5);", "true");
    assert_output("print((bln) \"\");", "false");
    assert_output("print((bln) null);", "false");
}

#[test]
fn postfix_returns_the_previous_value() {
    assert_output("var x = 5; print(x++); print(x); print(x--); print(x);", "5665");
}

#[test]
fn postfix_needs_a_variable() {
    assert_runtime_error("5++;");
}

#[test]
fn compound_assignments() {
    assert_output("var x = 7; x += 3; x *= 2; x -= 4; x /= 2; x %= 5; print(x);", "3");
    assert_output("var y = 1; y <<= 5; print(y); y >>= 2; print(y);", "328");
    assert_output("var z = 6; z &= 3; print(z); z |= 8; print(z); z ^= 2; print(z);",
                  "2108");
}

#[test]
fn bitwise_and_shifts() {
    assert_output("println(6 & 3);\n\
                   println(6 | 3);\n\
                   println(6 ^ 3);\n\
                   println(~0);\n\
                   println(1 << 6);\n\
                   println(0-8 >> 1);\n\
                   println(0-8 >>> 60);",
                  "2\n7\n5\n-1\n64\n-4\n15\n");
}

#[test]
fn ternary_and_short_circuit() {
    assert_output("print(1 ? \"a\" : \"b\");", "a");
    assert_output("print(true || false); print(false && true);", "truefalse");
    assert_output("var x = 0;\n\
                   func bump() { x = x + 1; return x; }\n\
                   var unused = false && bump();\n\
                   print(x);",
                  "0");
}

#[test]
fn string_indexing_and_slices() {
    assert_output("var s = \"hello\";\n\
                   println(s[1]);\n\
                   println(s[1:3]);\n\
                   println(s[:2]);\n\
                   println(s[3:]);\n\
                   println(s[:]);\n\
                   println(length(s));",
                  "e\nel\nhe\nlo\nhello\n5\n");
}

#[test]
fn string_splicing_through_an_index() {
    assert_output("var s = \"cat\"; s[0] = \"b\"; print(s); s[1] += \"oa\"; print(s);",
                  "batboat");
}

#[test]
fn char_literals_are_one_character_strings() {
    assert_output("print('a' + 'b');", "ab");
}

#[test]
fn concatenation_casts_the_other_side() {
    assert_output("println(\"n=\" + 5);\nprintln(1 + \"x\");\nprintln(\"\" + true);",
                  "n=5\n1x\ntrue\n");
}

#[test]
fn lists_are_aliases() {
    assert_output("arr a = {1,2};\n\
                   var b = a;\n\
                   a + 9;\n\
                   println(length(b));\n\
                   println(b[2]);\n\
                   println((bln)(a == b));",
                  "3\n9\ntrue\n");
}

#[test]
fn list_slices_are_fresh_lists() {
    assert_output("arr a = {1,2,3,4};\n\
                   var b = a[1:3];\n\
                   println(length(b));\n\
                   println(b[0]);\n\
                   println((bln)(a[:] == a));",
                  "2\n2\nfalse\n");
}

#[test]
fn double_arithmetic_and_integer_fallthrough() {
    assert_output("println(1.5 + 2);\n\
                   println(7.0 / 2);\n\
                   println(1 / 2);\n\
                   println(7.5 % 2);",
                  "3.5\n3.5\n0\n1\n");
}

#[test]
fn equality_is_structural_without_promotion() {
    assert_output("println((bln)(1 == 1.0));\nprintln(1 < 2.5);\nprintln((bln)(\"5\" == 5));",
                  "false\ntrue\nfalse\n");
}

#[test]
fn functions_dispatch_by_arity() {
    assert_output("func pick(a) { return 1; }\n\
                   func pick(a, b) { return 2; }\n\
                   println(pick(0));\n\
                   println(pick(0, 0));",
                  "1\n2\n");
}

#[test]
fn wrong_arity_suggests_the_real_one() {
    let message = assert_runtime_error("func triple(a, b, c) { return a; } var x = triple(1);");
    assert!(message.contains("unknown function 'triple' with 1 arguments"),
            "unexpected message: {message}");
    assert!(message.contains("Did you mean 'triple' with 3 parameters?"),
            "unexpected message: {message}");
}

#[test]
fn void_functions_produce_no_value() {
    let message = assert_runtime_error("void shout() { print(\"!\"); } var x = shout();");
    assert!(message.contains("does not return a value"),
            "unexpected message: {message}");
}

#[test]
fn func_results_can_be_discarded_in_statement_position() {
    assert_output("func five() { return 5; } five(); print(\"done\");", "done");
}

#[test]
fn unknown_names_are_runtime_errors() {
    assert_runtime_error("print(nope);");
    assert_runtime_error("nope();");
    assert_runtime_error("var a = a;");
}

#[test]
fn redeclaration_in_the_same_scope_fails() {
    assert_runtime_error("var x = 1; var x = 2;");
    assert_runtime_error("func f(a) { return a; } func f(b) { return b; }");
}

#[test]
fn reading_a_local_in_its_own_initializer_is_a_syntax_error() {
    let diagnostics = assert_syntax_errors("{ var a = a; }");
    assert!(diagnostics[0].contains("its own initializer"),
            "unexpected diagnostic: {:?}",
            diagnostics);
}

#[test]
fn break_past_the_nesting_depth_aborts() {
    assert_runtime_error("while (1) { break 2; }");
    assert_runtime_error("break;");
    assert_runtime_error("void f() { break; } f();");
}

#[test]
fn return_at_the_top_level_aborts() {
    assert_runtime_error("return 5;");
}

#[test]
fn for_loops_desugar_to_while() {
    assert_output("var total = 0;\n\
                   for (var i = 0; i < 5; i = i + 1) { total = total + i; }\n\
                   print(total);",
                  "10");
    assert_output("var i = 0; for (;;) { i = i + 1; if (i == 3) break; } print(i);", "3");
}

#[test]
fn return_unwinds_out_of_a_loop() {
    assert_output("func firstOver(limit) {\n\
                       var i = 0;\n\
                       while (1) { i = i + 1; if (i * i > limit) return i; }\n\
                   }\n\
                   print(firstOver(10));",
                  "4");
}

#[test]
fn parser_recovers_once_per_line() {
    let diagnostics = assert_syntax_errors("var = 1;\nvar y = 2\nprint(y);");
    assert_eq!(diagnostics.len(), 2, "diagnostics: {diagnostics:?}");
    assert!(diagnostics[0].contains("ln 1"), "diagnostics: {diagnostics:?}");
}

#[test]
fn malformed_numbers_fail_at_lex_time() {
    let diagnostics = assert_syntax_errors("var x = 123abc;");
    assert!(diagnostics.iter().any(|d| d.contains("malformed number '123abc'")),
            "diagnostics: {diagnostics:?}");
}

#[test]
fn unknown_characters_are_dropped() {
    assert_output("var x@ = #1; print(x);", "1");
}

#[test]
fn compound_operators_on_indexes_are_rejected() {
    let diagnostics = assert_syntax_errors("arr a = {1}; a[0] *= 2;");
    assert!(diagnostics[0].contains("'*='"), "diagnostics: {diagnostics:?}");
}

#[test]
fn slice_targets_cannot_be_assigned() {
    let diagnostics = assert_syntax_errors("var s = \"ab\"; s[0:1] = \"c\";");
    assert!(diagnostics[0].contains("multiple assignment"),
            "diagnostics: {diagnostics:?}");
}

#[test]
fn only_named_functions_are_callable() {
    assert_syntax_errors("var f = 1; (f)();");
}

#[test]
fn arithmetic_faults_are_runtime_errors() {
    assert_runtime_error("print(1 / 0);");
    assert_runtime_error("print(1 % 0);");
    assert_runtime_error("print(\"a\" * 2);");
    assert_runtime_error("print((int) \"oops\");");
}

#[test]
fn index_faults_are_runtime_errors() {
    assert_runtime_error("arr a = {1}; print(a[5]);");
    assert_runtime_error("var s = \"ab\"; print(s[9]);");
    assert_runtime_error("var s = \"ab\"; print(s[-1]);");
    assert_runtime_error("var x = 5; print(x[0]);");
}

#[test]
fn uninitialised_variables_hold_null() {
    assert_output("var x; print(x);", "null");
}

#[test]
fn string_natives() {
    assert_output("println(toUpperCase(\"abc\"));\n\
                   println(toLowerCase(\"AbC\"));\n\
                   println(isAlphabetic(\"a1\"));\n\
                   println(isUpperCase(\"Zoo\"));\n\
                   println(isLowerCase(\"Zoo\"));\n\
                   println(yeet(\"hello\", 1));\n\
                   println(length(5));",
                  "ABC\nabc\ntrue\ntrue\nfalse\nhllo\n-1\n");
}

#[test]
fn input_reads_one_line() {
    let (result, output) = run_with_input("var name = input(); print(\"hi \" + name);", "sam\n");
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output, "hi sam");
}

#[test]
fn input_is_empty_at_end_of_stream() {
    let (result, output) = run_with_input("print(length(input()));", "");
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output, "0");
}

#[test]
fn rand_and_clock_stay_in_range() {
    assert_output("var r = rand();\n\
                   print((bln)(r >= 0.0));\n\
                   print((bln)(r < 1.0));\n\
                   print((bln)(clock() > 0));",
                  "truetruetrue");
}

#[test]
fn imports_splice_functions_from_files() {
    let buffer = SharedBuffer::default();
    let mut interpreter = Interpreter::with_io(Box::new(buffer.clone()),
                                               Box::new(Cursor::new(String::new())));
    interpreter.set_import_root("tests/cflatexe");

    interpreter.run_source("import strlib; print(quad(2));", "test.cflat")
               .expect("imported program runs");

    let output = String::from_utf8(buffer.0.borrow().clone()).unwrap();
    assert_eq!(output, "16");
}

#[test]
fn missing_imports_stop_execution() {
    let buffer = SharedBuffer::default();
    let mut interpreter = Interpreter::with_io(Box::new(buffer.clone()),
                                               Box::new(Cursor::new(String::new())));
    interpreter.set_import_root("tests/cflatexe");

    let result = interpreter.run_source("import nothere; print(\"ran\");", "test.cflat");

    match result {
        Err(CflatError::Syntax(diagnostics)) => {
            assert!(diagnostics[0].to_string().contains("'nothere.cflat' not found"),
                    "diagnostics: {diagnostics:?}");
        },
        other => panic!("expected a missing-import diagnostic, got {other:?}"),
    }
    assert!(buffer.0.borrow().is_empty(), "nothing may run after a bad import");
}

#[test]
fn operator_precedence_reads_like_c() {
    assert_output("print(2 + 3 * 4); print((2 + 3) * 4);", "1420");
    assert_output("print(1 + 2 < 4 && 10 >> 1 == 5);", "true");
    assert_output("print(16 >> 2 >> 1);", "2");
}
