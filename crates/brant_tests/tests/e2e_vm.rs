//! E2E Tests: compile to bytecode and execute on the VM.
//!
//! Each case wraps a function body in `func main() int` (or supplies whole
//! declarations) and asserts the VM's exit value.

mod common;

use common::run_vm;

fn run_body(body: &str) -> i64 {
    run_vm(&format!("func main() int {}", body))
}

#[test]
fn return_zero() {
    assert_eq!(run_body("{return 0}"), 0);
}

#[test]
fn return_constant() {
    assert_eq!(run_body("{return 42}"), 42);
}

#[test]
fn return_simple_expression() {
    assert_eq!(run_body("{return 1+2-2}"), 1);
}

#[test]
fn return_addition() {
    assert_eq!(run_body("{return 5 + 20 - 4}"), 21);
}

#[test]
fn return_addition_with_spaces() {
    assert_eq!(run_body("{return  12 + 34 - 5 }"), 41);
}

#[test]
fn return_multiplication() {
    assert_eq!(run_body("{return 5+6*7}"), 47);
}

#[test]
fn return_parentheses() {
    assert_eq!(run_body("{return 5*(9-6)}"), 15);
}

#[test]
fn return_division() {
    assert_eq!(run_body("{return (3+5)/2}"), 4);
}

#[test]
fn return_negative_number() {
    assert_eq!(run_body("{return -10+20}"), 10);
}

#[test]
fn return_double_negative() {
    assert_eq!(run_body("{return - -10}"), 10);
}

#[test]
fn return_triple_sign() {
    assert_eq!(run_body("{return - - +10}"), 10);
}

#[test]
fn if_statement_false() {
    assert_eq!(run_body("{if 0==1 {return 1} else {return 0}}"), 0);
}

#[test]
fn if_statement_true() {
    assert_eq!(run_body("{if 42==42 {return 1} else {return 0}}"), 1);
}

#[test]
fn not_equal() {
    assert_eq!(run_body("{if 0!=1 {return 1} else {return 0}}"), 1);
}

#[test]
fn not_equal_false() {
    assert_eq!(run_body("{if 42!=42 {return 1} else {return 0}}"), 0);
}

#[test]
fn less_than() {
    assert_eq!(run_body("{if 0<1 {return 1} else {return 0}}"), 1);
    assert_eq!(run_body("{if 1<1 {return 1} else {return 0}}"), 0);
    assert_eq!(run_body("{if 2<1 {return 1} else {return 0}}"), 0);
}

#[test]
fn less_than_or_equal() {
    assert_eq!(run_body("{if 0<=1 {return 1} else {return 0}}"), 1);
    assert_eq!(run_body("{if 1<=1 {return 1} else {return 0}}"), 1);
    assert_eq!(run_body("{if 2<=1 {return 1} else {return 0}}"), 0);
}

#[test]
fn greater_than() {
    assert_eq!(run_body("{if 1>0 {return 1} else {return 0}}"), 1);
    assert_eq!(run_body("{if 1>1 {return 1} else {return 0}}"), 0);
    assert_eq!(run_body("{if 1>2 {return 1} else {return 0}}"), 0);
}

#[test]
fn greater_than_or_equal() {
    assert_eq!(run_body("{if 1>=0 {return 1} else {return 0}}"), 1);
    assert_eq!(run_body("{if 1>=1 {return 1} else {return 0}}"), 1);
    assert_eq!(run_body("{if 1>=2 {return 1} else {return 0}}"), 0);
}

#[test]
fn assign_variable() {
    assert_eq!(run_body("{a:=3; return a}"), 3);
}

#[test]
fn add_variables() {
    assert_eq!(run_body("{a:=3; z:=5; return a+z}"), 8);
}

#[test]
fn assign_variable_with_letters() {
    assert_eq!(run_body("{foo:=3; return foo}"), 3);
}

#[test]
fn add_variables_with_letters() {
    assert_eq!(run_body("{foo123:=3; bar:=5; return foo123+bar}"), 8);
}

#[test]
fn multiple_variables() {
    assert_eq!(run_body("{al := 3; bal := 5; baz := 10; return bal + al * 4 - baz}"), 7);
}

#[test]
fn booleans_as_conditions() {
    assert_eq!(run_body("{ if false {return 2} return 3 }"), 3);
    assert_eq!(run_body("{ if true { 1; 2; return 3 } else { return 4 } }"), 3);
    assert_eq!(run_body("{ if false { 1; 2; return 3 } else { return 4 } }"), 4);
}

#[test]
fn nested_blocks() {
    assert_eq!(run_body("{ {1; {2;} return 3;} }"), 3);
}

#[test]
fn extra_semicolons() {
    assert_eq!(run_body("{ ;;; return 5; }"), 5);
}

#[test]
fn for_loop_sums_one_to_ten() {
    assert_eq!(
        run_body("{ i:=0; j:=0; for i=0; i<=10; i=i+1 { j=i+j; } return j }"),
        55
    );
}

#[test]
fn for_with_single_clause_is_condition() {
    assert_eq!(
        run_body("{ i:=0; for i<4 { i=i+1 } return i }"),
        4
    );
}

#[test]
fn bare_for_loop_returns_from_body() {
    assert_eq!(run_body("{ for {return 3;} return 5 }"), 3);
}

#[test]
fn dereference_pointer() {
    assert_eq!(run_body("{ x:=3; return *&x; }"), 3);
}

#[test]
fn dereference_pointer_to_pointer() {
    assert_eq!(run_body("{ x:=3; y:=&x; z:=&y; return **z; }"), 3);
}

#[test]
fn triple_indirection_read() {
    assert_eq!(run_body("{ x:=9; y:=&x; z:=&y; w:=&z; return ***w; }"), 9);
}

#[test]
fn modify_value_through_pointer() {
    assert_eq!(run_body("{ x:=3; y:=&x; *y=5; return x; }"), 5);
}

#[test]
fn if_expression_then_value() {
    assert_eq!(run_body("{ a := if true {1} else {2}; 5; return a }"), 1);
}

#[test]
fn if_expression_else_value() {
    assert_eq!(run_body("{ a := if false {1} else {2}; 5; return a }"), 2);
}

#[test]
fn block_expression() {
    assert_eq!(run_body("{ a := {true; 42}; return a }"), 42);
}

#[test]
fn reassign() {
    assert_eq!(run_body("{ a := 1; a = 29; return a }"), 29);
}

#[test]
fn shadowing_uses_innermost_binding() {
    assert_eq!(run_body("{ a := 1; { a := 2; a = 40 }\n return a }"), 1);
}

#[test]
fn newlines_terminate_statements() {
    assert_eq!(run_vm("func main() int {\n\ta := 3\n\tz := 5\n\treturn a + z\n}\n"), 8);
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        run_vm("// header\nfunc main() int {\n\t/* block\n\tcomment */ return 6 // six\n}\n"),
        6
    );
}

#[test]
fn call_void_function() {
    assert_eq!(
        run_vm("func foo() {}\nfunc main() int { foo()\n return 0 }"),
        0
    );
}

#[test]
fn call_with_one_argument() {
    assert_eq!(
        run_vm("func main() int { return double(21) }\nfunc double(x int) int { return x + x }"),
        42
    );
}

#[test]
fn call_declared_after_use() {
    assert_eq!(
        run_vm("func main() int { return one() + two() }\nfunc one() int { return 1 }\nfunc two() int { return 2 }"),
        3
    );
}

#[test]
fn eight_argument_call_uses_all_registers() {
    assert_eq!(
        run_vm(
            "func main() int { return foo(1,2,3,4,5,6,7,8) }\n\
             func foo(a int,b int,c int,d int,e int,f int,g int,h int) int { return a+b+c+d+e+f+g+h }"
        ),
        36
    );
}

#[test]
fn nested_calls_preserve_frames() {
    assert_eq!(
        run_vm(
            "func main() int { return add(add(1, 2), add(3, 4)) }\n\
             func add(a int, b int) int { return a + b }"
        ),
        10
    );
}

#[test]
fn recursion_terminates() {
    assert_eq!(
        run_vm(
            "func main() int { return fib(10) }\n\
             func fib(n int) int { if n < 2 { return n }\n return fib(n-1) + fib(n-2) }"
        ),
        55
    );
}
