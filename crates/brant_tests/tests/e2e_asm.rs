//! E2E Tests: ARM64 listing structure.
//!
//! The textual output is not executed here (that needs a system assembler
//! and linker); these tests pin down the listing's shape: header, frame
//! setup, label naming, and the exit syscall in main's return path.

mod common;

use common::asm_listing;

#[test]
fn listing_has_text_header_and_global_main() {
    let out = asm_listing("func main() int { return 0 }");
    assert!(out.contains(".text"));
    assert!(out.contains(".global _main"));
    assert!(out.contains(".align 2"));
    assert!(out.contains("_main:"));
}

#[test]
fn frame_setup_and_teardown() {
    let out = asm_listing("func main() int { a := 1; b := 2; return a + b }");
    assert!(out.contains("  stp x29, x30, [sp, #-16]!"));
    assert!(out.contains("  mov x29, sp"));
    // two 8-byte locals round up to a 16-byte frame
    assert!(out.contains("  sub sp, sp, #16"));
    assert!(out.contains("  mov sp, x29"));
    assert!(out.contains("  ldp x29, x30, [sp], #16"));
}

#[test]
fn main_returns_through_exit_syscall() {
    let out = asm_listing("func main() int { return 3 }");
    assert!(out.contains("  mov x16, #1"));
    assert!(out.contains("  svc #0"));
    assert!(out.trim_end().ends_with("ret"));
}

#[test]
fn helper_functions_return_normally() {
    let out = asm_listing("func main() int { return foo() }\nfunc foo() int { return 1 }");
    // exactly one exit syscall, in main's path
    assert_eq!(out.matches("svc #0").count(), 1);
    assert!(out.contains("  bl _foo"));
    assert!(out.contains(".global _foo"));
}

#[test]
fn labels_use_block_names_with_prefix() {
    let out = asm_listing("func main() int { if true { return 1 }\n return 0 }");
    assert!(out.contains(".L.main.entry0:"));
    assert!(out.contains(".L.then0:"));
    assert!(out.contains(".L.endif0:"));
    assert!(out.contains(".L.main.epilogue0:"));
    assert!(out.contains("  b .L.main.epilogue0"));
}

#[test]
fn comparisons_emit_cset() {
    let out = asm_listing("func main() int { if 1 < 2 { return 1 }\n return 0 }");
    assert!(out.contains("  cmp x1, x0"));
    assert!(out.contains("  cset x0, lt"));
    // the branch on the condition value
    assert!(out.contains("  cmp x0, #0"));
    assert!(out.contains("  b.eq .L.endif0"));
}

#[test]
fn locals_are_frame_relative() {
    let out = asm_listing("func main() int { a := 7; return a }");
    assert!(out.contains("  sub x0, x29, #8"));
    assert!(out.contains("  ldr x0, [x29, #-8]"));
}

#[test]
fn stack_spills_use_sixteen_byte_slots() {
    let out = asm_listing("func main() int { return 1 + 2 }");
    assert!(out.contains("  str x0, [sp, #-16]!"));
    assert!(out.contains("  ldr x1, [sp], #16"));
    assert!(out.contains("  add x0, x1, x0"));
}

#[test]
fn arguments_spill_into_their_slots() {
    let out = asm_listing(
        "func main() int { return foo(1, 2) }\nfunc foo(a int, b int) int { return a + b }",
    );
    // caller pops args into x0/x1, callee stores them to its frame
    assert!(out.contains("  ldr x1, [sp], #16"));
    assert!(out.contains("  ldr x0, [sp], #16"));
    assert!(out.contains("  str x0, [x29, #-8]"));
    assert!(out.contains("  str x1, [x29, #-16]"));
}
