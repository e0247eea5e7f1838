use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chip::SimError;
use crate::decoder::Operand;
use crate::register_set::RegisterSet;

/// Accepted operand counts, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    pub const fn exact(n: usize) -> Self {
        Self { min: n, max: n }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn accepts(self, n: usize) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} to {}", self.min, self.max)
        }
    }
}

/// Where the destination sits in a two-or-three operand instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// `OP dst, src[, shift]`
    #[default]
    DstFirst,
    /// `OP src[, shift], dst`
    SrcFirst,
}

/// Effect of one opcode on a register file.
pub trait Executor: fmt::Debug + Send + Sync {
    fn arity(&self) -> Arity;
    fn exec(&self, operands: &[Operand], regs: &mut RegisterSet) -> Result<(), SimError>;
}

pub type Handler = fn(&[Operand], &mut RegisterSet) -> Result<(), SimError>;

/// A plain function used as an instruction body.
pub struct Custom {
    arity: Arity,
    handler: Handler,
}

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Custom")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl Executor for Custom {
    fn arity(&self) -> Arity {
        self.arity
    }

    fn exec(&self, operands: &[Operand], regs: &mut RegisterSet) -> Result<(), SimError> {
        (self.handler)(operands, regs)
    }
}

/// One opcode: a mnemonic and the behavior it dispatches to.
#[derive(Debug)]
pub struct Instruction {
    mnemonic: String,
    exec: Box<dyn Executor>,
}

impl Instruction {
    pub fn new(mnemonic: impl Into<String>, exec: impl Executor + 'static) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            exec: Box::new(exec),
        }
    }

    pub fn custom(mnemonic: impl Into<String>, arity: Arity, handler: Handler) -> Self {
        Self::new(mnemonic, Custom { arity, handler })
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn arity(&self) -> Arity {
        self.exec.arity()
    }

    /// Exact, ASCII case-insensitive mnemonic match.
    pub fn parse(&self, mnemonic: &str) -> bool {
        self.mnemonic.eq_ignore_ascii_case(mnemonic)
    }

    /// Run the opcode. On error no register has been modified.
    pub fn execute(&self, operands: &[Operand], regs: &mut RegisterSet) -> Result<(), SimError> {
        let arity = self.exec.arity();
        if !arity.accepts(operands.len()) {
            return Err(SimError::OperandCount {
                mnemonic: self.mnemonic.clone(),
                expected: arity,
                found: operands.len(),
            });
        }
        self.exec
            .exec(operands, regs)
            .map_err(|e| e.in_instruction(&self.mnemonic))
    }
}
