//! The stack-machine virtual machine.
//!
//! A quick way to test code generation without shelling out to an external
//! assembler and linker. The machine has a small register file `r0..r7`
//! used to move arguments into callee locals, a value stack, a call stack
//! of return addresses, and one flat locals memory with per-frame base
//! pointers, so a `LocalAddr` stays a valid address for as long as its
//! frame is live. Runs until `Exit` and returns r0.

use super::opcodes::{Instr, Opcode};

const NUM_REGS: usize = 8;

/// The virtual machine state.
pub struct Cpu {
    regs: [i64; NUM_REGS],
    stack: Vec<i64>,
    locals: Vec<i64>,
    frames: Vec<usize>,
    calls: Vec<usize>,

    program: Vec<Instr>,
    pc: usize,
}

impl Cpu {
    pub fn new(program: Vec<Instr>) -> Cpu {
        Cpu {
            regs: [0; NUM_REGS],
            stack: Vec::new(),
            locals: Vec::new(),
            frames: Vec::new(),
            calls: Vec::new(),
            program,
            pc: 0,
        }
    }

    fn frame_base(&self) -> usize {
        *self.frames.last().expect("no active frame")
    }

    /// Runs the program from pc 0 until `Exit`, returning r0.
    pub fn run(&mut self) -> i64 {
        loop {
            let instr = self.program[self.pc];
            self.pc += 1;

            match instr.opcode() {
                Opcode::Prologue => {
                    let num_locals = instr.arg() as usize;
                    self.frames.push(self.locals.len());
                    self.locals.resize(self.locals.len() + num_locals, 0);
                }
                Opcode::Push => self.stack.push(self.regs[0]),
                Opcode::Pop => {
                    let value = self.stack.pop().expect("pop from empty stack");
                    self.regs[instr.arg() as usize] = value;
                }
                Opcode::LoadLocal => {
                    self.regs[0] = self.locals[self.frame_base() + instr.arg() as usize];
                }
                Opcode::StoreLocal => {
                    let slot = instr.arg() as usize;
                    let base = self.frame_base();
                    self.locals[base + slot] = self.regs[slot];
                }
                Opcode::Load => self.regs[0] = self.locals[self.regs[0] as usize],
                Opcode::Store => self.locals[self.regs[1] as usize] = self.regs[0],
                Opcode::LocalAddr => {
                    self.regs[0] = (self.frame_base() + instr.arg() as usize) as i64;
                }
                Opcode::LoadInt => self.regs[0] = instr.arg(),
                Opcode::Add => self.regs[0] = self.regs[1].wrapping_add(self.regs[0]),
                Opcode::Sub => self.regs[0] = self.regs[1].wrapping_sub(self.regs[0]),
                Opcode::Mul => self.regs[0] = self.regs[1].wrapping_mul(self.regs[0]),
                Opcode::Div => self.regs[0] = self.regs[1] / self.regs[0],
                Opcode::Neg => self.regs[0] = self.regs[0].wrapping_neg(),
                Opcode::Eq => self.regs[0] = (self.regs[1] == self.regs[0]) as i64,
                Opcode::Ne => self.regs[0] = (self.regs[1] != self.regs[0]) as i64,
                Opcode::Lt => self.regs[0] = (self.regs[1] < self.regs[0]) as i64,
                Opcode::Le => self.regs[0] = (self.regs[1] <= self.regs[0]) as i64,
                Opcode::Gt => self.regs[0] = (self.regs[1] > self.regs[0]) as i64,
                Opcode::Ge => self.regs[0] = (self.regs[1] >= self.regs[0]) as i64,
                Opcode::JumpIfFalse => {
                    if self.regs[0] == 0 {
                        self.pc = instr.arg() as usize;
                    }
                }
                Opcode::Jump => self.pc = instr.arg() as usize,
                Opcode::Call => {
                    self.calls.push(self.pc);
                    self.pc = instr.arg() as usize;
                }
                Opcode::Return => {
                    let base = self.frames.pop().expect("return without frame");
                    self.locals.truncate(base);
                    self.pc = self.calls.pop().expect("return without call");
                }
                Opcode::Exit => return self.regs[0],
                Opcode::Undef => panic!("undefined opcode at pc {}", self.pc - 1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(program: Vec<Instr>) -> i64 {
        Cpu::new(program).run()
    }

    #[test]
    fn load_int_and_exit() {
        let program = vec![
            Instr::with_arg(Opcode::Prologue, 0),
            Instr::with_arg(Opcode::LoadInt, 42),
            Instr::new(Opcode::Exit),
        ];
        assert_eq!(run(program), 42);
    }

    #[test]
    fn arithmetic_uses_r1_and_r0() {
        // r0 = 5; push; r0 = 3; r1 = pop; r0 = r1 - r0
        let program = vec![
            Instr::with_arg(Opcode::Prologue, 0),
            Instr::with_arg(Opcode::LoadInt, 5),
            Instr::new(Opcode::Push),
            Instr::with_arg(Opcode::LoadInt, 3),
            Instr::with_arg(Opcode::Pop, 1),
            Instr::new(Opcode::Sub),
            Instr::new(Opcode::Exit),
        ];
        assert_eq!(run(program), 2);
    }

    #[test]
    fn locals_and_pointers() {
        // locals[0] = 7 via a pointer taken with LocalAddr
        let program = vec![
            Instr::with_arg(Opcode::Prologue, 1),
            Instr::with_arg(Opcode::LocalAddr, 0),
            Instr::new(Opcode::Push),
            Instr::with_arg(Opcode::LoadInt, 7),
            Instr::with_arg(Opcode::Pop, 1),
            Instr::new(Opcode::Store),
            Instr::with_arg(Opcode::LoadLocal, 0),
            Instr::new(Opcode::Exit),
        ];
        assert_eq!(run(program), 7);
    }

    #[test]
    fn call_and_return_restore_frames() {
        // main: r0 = 1; push; r0(arg0) = pop; call f; exit
        // f: store arg into local 0, load it back, return
        let program = vec![
            Instr::with_arg(Opcode::Prologue, 0), // 0 _main
            Instr::with_arg(Opcode::LoadInt, 9),  // 1
            Instr::new(Opcode::Push),             // 2
            Instr::with_arg(Opcode::Pop, 0),      // 3
            Instr::with_arg(Opcode::Call, 6),     // 4
            Instr::new(Opcode::Exit),             // 5
            Instr::with_arg(Opcode::Prologue, 1), // 6 _f
            Instr::with_arg(Opcode::StoreLocal, 0), // 7
            Instr::with_arg(Opcode::LoadLocal, 0), // 8
            Instr::new(Opcode::Return),           // 9
        ];
        assert_eq!(run(program), 9);
    }

    #[test]
    fn jump_if_false_takes_else_path() {
        let program = vec![
            Instr::with_arg(Opcode::Prologue, 0),
            Instr::with_arg(Opcode::LoadInt, 0),
            Instr::with_arg(Opcode::JumpIfFalse, 4),
            Instr::with_arg(Opcode::LoadInt, 1),
            Instr::new(Opcode::Exit),
        ];
        assert_eq!(run(program), 0);
    }
}
