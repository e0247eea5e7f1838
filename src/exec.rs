use serde::{Deserialize, Serialize};

use crate::chip::SimError;
use crate::decoder::Operand;
use crate::instruction::{Arity, Executor, Order};
use crate::register::Register;
use crate::register_set::RegisterSet;

/// Built-in register operations a chip variant can bind mnemonics to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Nop,
    /// dst <- src; right shifts apply as the source is read, left shifts as dst is written
    Move,
    Add,
    Sub,
    And,
    Or,
    Xor,
    /// dst <- dst shifted by an immediate amount
    Shift,
    /// as `Shift`, but right shifts sign-extend from the register width
    ShiftArith,
    Neg,
    Not,
    Clear,
}

impl Op {
    pub fn arity(self) -> Arity {
        match self {
            Op::Nop => Arity::exact(0),
            Op::Move | Op::Add | Op::Sub | Op::And | Op::Or | Op::Xor => Arity::range(2, 3),
            Op::Shift | Op::ShiftArith => Arity::exact(2),
            Op::Neg | Op::Not | Op::Clear => Arity::exact(1),
        }
    }
}

/// An [`Op`] together with its operand order and a fixed source shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub op: Op,
    pub order: Order,
    pub shift: i32,
}

impl Builtin {
    pub fn new(op: Op) -> Self {
        Self {
            op,
            order: Order::DstFirst,
            shift: 0,
        }
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn shift(mut self, shift: i32) -> Self {
        self.shift = shift;
        self
    }

    fn binary<'a>(&self, ops: &'a [Operand]) -> Result<Binary<'a>, SimError> {
        // (dst, src, optional shift) with their operand positions
        let ((d, di), s, k) = match (self.order, ops) {
            (Order::DstFirst, [d, s]) => ((d, 0), s, None),
            (Order::DstFirst, [d, s, k]) => ((d, 0), s, Some((k, 2))),
            (Order::SrcFirst, [s, d]) => ((d, 1), s, None),
            (Order::SrcFirst, [s, k, d]) => ((d, 2), s, Some((k, 1))),
            _ => return Err(count_error(self.op.arity(), ops.len())),
        };
        let extra = match k {
            Some((k, ki)) => shift_operand(k, ki)?,
            None => 0,
        };
        Ok(Binary {
            dst: register_operand(d, di)?,
            src: s,
            shift: self.shift.saturating_add(extra),
        })
    }

    fn unary<'a>(&self, ops: &'a [Operand]) -> Result<&'a str, SimError> {
        match ops {
            [d] => register_operand(d, 0),
            _ => Err(count_error(self.op.arity(), ops.len())),
        }
    }

    fn shifted<'a>(&self, ops: &'a [Operand]) -> Result<(&'a str, i32), SimError> {
        match ops {
            [d, k] => Ok((
                register_operand(d, 0)?,
                shift_operand(k, 1)?.saturating_add(self.shift),
            )),
            _ => Err(count_error(self.op.arity(), ops.len())),
        }
    }
}

struct Binary<'a> {
    dst: &'a str,
    src: &'a Operand,
    shift: i32,
}

fn count_error(expected: Arity, found: usize) -> SimError {
    SimError::OperandCount {
        mnemonic: String::new(),
        expected,
        found,
    }
}

fn register_operand(op: &Operand, index: usize) -> Result<&str, SimError> {
    op.as_register().ok_or_else(|| SimError::InvalidOperand {
        mnemonic: String::new(),
        index,
        expected: "register",
        found: op.to_string(),
    })
}

fn shift_operand(op: &Operand, index: usize) -> Result<i32, SimError> {
    op.as_immediate()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| SimError::InvalidOperand {
            mnemonic: String::new(),
            index,
            expected: "shift amount",
            found: op.to_string(),
        })
}

fn value_of(op: &Operand, regs: &RegisterSet, shift: i32) -> Result<i64, SimError> {
    match op {
        Operand::Immediate(v) => Ok(Register::shift(*v, shift)),
        Operand::Register(name) => regs.fetch(name, shift),
    }
}

impl Executor for Builtin {
    fn arity(&self) -> Arity {
        self.op.arity()
    }

    fn exec(&self, operands: &[Operand], regs: &mut RegisterSet) -> Result<(), SimError> {
        match self.op {
            Op::Nop => {}
            Op::Move => {
                // right shifts happen on the source's side of the bus, left
                // shifts on the destination's
                let b = self.binary(operands)?;
                let v = value_of(b.src, regs, b.shift.min(0))?;
                regs.store(b.dst, v, b.shift.max(0))?;
            }
            Op::Add | Op::Sub | Op::And | Op::Or | Op::Xor => {
                let b = self.binary(operands)?;
                let src = Register::shift(value_of(b.src, regs, 0)?, b.shift);
                let cur = regs.fetch(b.dst, 0)?;
                let res = match self.op {
                    // carries past the register width go through its overflow policy
                    Op::Add => regs.settle(b.dst, i128::from(cur) + i128::from(src))?,
                    Op::Sub => regs.settle(b.dst, i128::from(cur) - i128::from(src))?,
                    Op::And => cur & src,
                    Op::Or => cur | src,
                    _ => cur ^ src,
                };
                regs.store(b.dst, res, 0)?;
            }
            Op::Shift => {
                let (dst, amount) = self.shifted(operands)?;
                let cur = regs.fetch(dst, 0)?;
                regs.store(dst, cur, amount)?;
            }
            Op::ShiftArith => {
                let (dst, amount) = self.shifted(operands)?;
                if amount >= 0 {
                    let cur = regs.fetch(dst, 0)?;
                    regs.store(dst, cur, amount)?;
                } else {
                    let cur = regs.fetch_signed(dst)?;
                    regs.store(dst, Register::shift(cur, amount), 0)?;
                }
            }
            Op::Neg => {
                let dst = self.unary(operands)?;
                let cur = regs.fetch(dst, 0)?;
                regs.store(dst, cur.wrapping_neg(), 0)?;
            }
            Op::Not => {
                let dst = self.unary(operands)?;
                let cur = regs.fetch(dst, 0)?;
                regs.store(dst, !cur, 0)?;
            }
            Op::Clear => {
                let dst = self.unary(operands)?;
                regs.store(dst, 0, 0)?;
            }
        }
        Ok(())
    }
}

impl Executor for Op {
    fn arity(&self) -> Arity {
        Op::arity(*self)
    }

    fn exec(&self, operands: &[Operand], regs: &mut RegisterSet) -> Result<(), SimError> {
        Builtin::new(*self).exec(operands, regs)
    }
}
