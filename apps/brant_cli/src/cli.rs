//! Command-line argument parsing and dispatch for `brant`.
//!
//! One compilation per invocation: a single source file (or inline
//! `--expr` text) is lowered to either an ARM64 listing or the IR dump on
//! stdout, or compiled to bytecode and executed on the in-process VM with
//! `--run`. Diagnostics go to stderr, rendered with source context, or as
//! a JSON array with `--json`. Exit code 0 on success, 1 if any diagnostic
//! was emitted; with `--run` the program's own exit value is the exit code.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use brant_base::{Diagnostic, File};
use brant_compile::{compile_to_asm, compile_to_ir, run};

use crate::style::Style;

/// What to write to stdout.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum Emit {
    /// An ARM64 `.s` text listing.
    Asm,
    /// The HLIR program dump.
    Ir,
}

/// The brant compiler.
#[derive(Parser, Debug)]
#[command(name = "brant")]
#[command(about = "Compiler for the brant language", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the source file to compile.
    #[arg(required_unless_present = "expr")]
    pub file: Option<PathBuf>,

    /// Compile the given source text instead of a file.
    #[arg(long, value_name = "SOURCE", conflicts_with = "file")]
    pub expr: Option<String>,

    /// What to write to stdout.
    #[arg(long, value_enum, default_value_t = Emit::Asm)]
    pub emit: Emit,

    /// Compile to bytecode and run on the VM; the program's exit value
    /// becomes the process exit code.
    #[arg(long)]
    pub run: bool,

    /// Print diagnostics as a JSON array instead of rendered text.
    #[arg(long)]
    pub json: bool,
}

/// Parses arguments, runs one compilation, and returns the exit code.
pub fn run_cli() -> i32 {
    let cli = Cli::parse();
    execute(&cli)
}

pub fn execute(cli: &Cli) -> i32 {
    let (name, src) = match load_source(cli) {
        Ok(pair) => pair,
        Err(message) => {
            eprintln!("{}: {}", Style::bold_red("error"), message);
            return 1;
        }
    };

    let file = match File::new(name, src) {
        Ok(file) => Arc::new(file),
        Err(diag) => {
            eprintln!("{}: {}", Style::bold_red("error"), diag.message());
            return 1;
        }
    };

    if cli.run {
        return match run(&file) {
            Ok(code) => (code & 0xff) as i32,
            Err(errs) => {
                report(&errs, &file, cli.json);
                1
            }
        };
    }

    let result = match cli.emit {
        Emit::Asm => compile_to_asm(&file),
        Emit::Ir => compile_to_ir(&file).map(|program| program.dump()),
    };

    match result {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(errs) => {
            report(&errs, &file, cli.json);
            1
        }
    }
}

fn load_source(cli: &Cli) -> Result<(String, String), String> {
    if let Some(expr) = &cli.expr {
        return Ok(("<expr>".to_string(), expr.clone()));
    }

    let path = cli.file.as_ref().expect("clap requires file or --expr");
    let src = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {}", path.display(), err))?;
    Ok((path.display().to_string(), src))
}

/// Writes diagnostics to stderr, one per line with source context, or as a
/// JSON array for structured consumers.
fn report(errs: &[Diagnostic], file: &File, json: bool) {
    if json {
        let reports: Vec<_> = errs.iter().map(|e| e.report(file)).collect();
        match serde_json::to_string_pretty(&reports) {
            Ok(out) => eprintln!("{}", out),
            Err(err) => eprintln!("cannot serialize diagnostics: {}", err),
        }
        return;
    }

    for err in errs {
        let rendered = err.render(file);
        match rendered.strip_prefix("error") {
            Some(rest) => eprint!("{}{}", Style::bold_red("error"), rest),
            None => eprint!("{}", rendered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;
    use std::io::Write;

    #[test]
    fn parses_file_argument() {
        let cli = Cli::try_parse_from(["brant", "prog.bt"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("prog.bt")));
        assert_eq!(cli.emit, Emit::Asm);
        assert!(!cli.run);
    }

    #[test]
    fn requires_file_or_expr() {
        assert!(Cli::try_parse_from(["brant"]).is_err());
        assert!(Cli::try_parse_from(["brant", "--expr", "func main() int { return 0 }"]).is_ok());
    }

    #[test]
    fn file_and_expr_conflict() {
        assert!(Cli::try_parse_from(["brant", "prog.bt", "--expr", "x"]).is_err());
    }

    #[test]
    fn run_flag_executes_program() {
        let cli = Cli::try_parse_from([
            "brant",
            "--run",
            "--expr",
            "func main() int { return 41 + 1 }",
        ])
        .unwrap();
        assert_eq!(execute(&cli), 42);
    }

    #[test]
    fn diagnostics_exit_with_one() {
        let cli = Cli::try_parse_from([
            "brant",
            "--run",
            "--expr",
            "func main() int { return x }",
        ])
        .unwrap();
        assert_eq!(execute(&cli), 1);
    }

    #[test]
    fn compiles_source_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "func main() int {{ return 7 }}").unwrap();

        let cli = Cli::try_parse_from([
            "brant",
            "--run",
            tmp.path().to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(execute(&cli), 7);
    }

    #[test]
    fn missing_file_reports_error() {
        let cli = Cli::try_parse_from(["brant", "/definitely/not/here.bt"]).unwrap();
        assert_eq!(execute(&cli), 1);
    }
}
