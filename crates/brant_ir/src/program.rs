//! The IR program: functions, the type universe, and the source file.

use std::fmt::Write;
use std::sync::Arc;

use brant_base::File;
use brant_types::{Type, Universe};

use crate::constant::Constant;
use crate::func::Func;
use crate::op;
use crate::value::ValueId;

/// Identifies a function in the program.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FuncId(pub u32);

/// The root of the IR: an ordered list of functions plus the interned type
/// universe and the source file for diagnostics.
pub struct Program {
    file: Arc<File>,
    funcs: Vec<Func>,
    types: Universe,
}

impl Program {
    /// Creates an empty program. The common opcode set is registered here,
    /// before any value can exist.
    pub fn new(file: Arc<File>) -> Program {
        op::register_common_ops();
        Program {
            file,
            funcs: Vec::new(),
            types: Universe::new(),
        }
    }

    pub fn file(&self) -> &Arc<File> {
        &self.file
    }

    /// Creates a new function in the program.
    pub fn new_func(&mut self, name: impl Into<String>, sig: Type) -> FuncId {
        let id = FuncId(self.funcs.len() as u32);
        self.funcs.push(Func::new(name.into(), sig));
        id
    }

    pub fn num_funcs(&self) -> usize {
        self.funcs.len()
    }

    pub fn func(&self, id: FuncId) -> &Func {
        &self.funcs[id.0 as usize]
    }

    pub fn func_mut(&mut self, id: FuncId) -> &mut Func {
        &mut self.funcs[id.0 as usize]
    }

    pub fn func_named(&self, name: &str) -> Option<FuncId> {
        self.funcs
            .iter()
            .position(|f| f.name() == name)
            .map(|i| FuncId(i as u32))
    }

    pub fn types(&self) -> &Universe {
        &self.types
    }

    /// Installs the universe built by the type checker.
    pub fn set_types(&mut self, types: Universe) {
        self.types = types;
    }

    /// Renders the whole program in the textual form the IR tests assert.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for func in &self.funcs {
            self.dump_func(func, &mut out);
        }
        out
    }

    fn dump_func(&self, f: &Func, out: &mut String) {
        let sig = self.types.func(f.sig());
        let params = sig
            .params()
            .iter()
            .enumerate()
            .map(|(i, ty)| format!("r{} {}", i, self.types.string_of(*ty)))
            .collect::<Vec<_>>()
            .join(", ");

        if sig.return_type() == Type::VOID {
            let _ = writeln!(out, "func {}({}) {{", f.name(), params);
        } else {
            let _ = writeln!(
                out,
                "func {}({}) {} {{",
                f.name(),
                params,
                self.types.string_of(sig.return_type())
            );
        }

        for i in 0..f.num_blocks() {
            let block = f.block_at(i);
            let _ = writeln!(out, "{}:", block.name());
            for v in block.values() {
                self.dump_value(f, *v, out);
            }
            if block.terminator() != ValueId::INVALID {
                self.dump_value(f, block.terminator(), out);
            }
        }

        out.push_str("}\n\n");
    }

    fn dump_value(&self, f: &Func, v: ValueId, out: &mut String) {
        let mut opers = Vec::new();
        for i in 0..f.num_operands(v) {
            let ov = f.operand(v, i);

            if let Some(c) = f.const_for_value(ov) {
                match c {
                    Constant::Func(fid) => opers.push(self.func(fid).name().to_string()),
                    other => opers.push(other.to_string()),
                }
                continue;
            }

            if !f.regs(ov).is_empty() {
                opers.push(f.regs(ov).to_string());
                continue;
            }

            opers.push(self.value_string(f, ov));
        }

        let ostr = if opers.is_empty() {
            String::new()
        } else {
            format!(" {}", opers.join(", "))
        };

        if f.ty(v) == Type::VOID {
            let _ = writeln!(out, "\t{}{}", f.op(v).name(), ostr);
        } else {
            let _ = writeln!(out, "\t{} = {}{}", self.value_string(f, v), f.op(v).name(), ostr);
        }
    }

    fn value_string(&self, f: &Func, v: ValueId) -> String {
        if f.is_block(v) {
            return f.block(v).name().to_string();
        }
        if f.regs(v).is_empty() {
            format!("v{}", v.0)
        } else {
            f.regs(v).to_string()
        }
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file.name())
    }
}
