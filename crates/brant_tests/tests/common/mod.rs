//! E2E test harness: compile helpers shared by the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use brant_base::File;

/// Wraps a source string in a `File`.
pub fn file(src: &str) -> Arc<File> {
    Arc::new(File::new("test.bt", src).unwrap())
}

/// Compiles and runs a program on the VM, panicking on any diagnostic.
pub fn run_vm(src: &str) -> i64 {
    let file = file(src);
    match brant_compile::run(&file) {
        Ok(code) => code,
        Err(errs) => {
            let rendered: Vec<String> = errs.iter().map(|e| e.render(&file)).collect();
            panic!("expected no errors, got:\n{}", rendered.join("\n"));
        }
    }
}

/// Compiles a program expected to fail, returning all diagnostic messages.
pub fn compile_err(src: &str) -> Vec<String> {
    let file = file(src);
    match brant_compile::run(&file) {
        Ok(code) => panic!("expected errors, but program compiled and returned {}", code),
        Err(errs) => errs.iter().map(|e| e.message().to_string()).collect(),
    }
}

/// Asserts that compiling `src` produces a diagnostic containing `want`.
pub fn assert_err(src: &str, want: &str) {
    let errs = compile_err(src);
    assert!(
        errs.iter().any(|e| e.contains(want)),
        "expected a diagnostic containing {:?}, got {:?}",
        want,
        errs
    );
}

/// Compiles a program to its IR dump.
pub fn dump_ir(src: &str) -> String {
    let file = file(src);
    brant_compile::compile_to_ir(&file)
        .unwrap_or_else(|errs| panic!("expected no errors, got {:?}", errs))
        .dump()
}

/// Compiles a program to its ARM64 listing.
pub fn asm_listing(src: &str) -> String {
    let file = file(src);
    brant_compile::compile_to_asm(&file)
        .unwrap_or_else(|errs| panic!("expected no errors, got {:?}", errs))
}

/// Normalizes an IR dump for comparison: trims each line and the whole
/// string, so test expectations can be indented naturally.
pub fn trim(s: &str) -> String {
    s.trim()
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}
