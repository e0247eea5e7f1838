use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decoder::{Decoded, Decoder, LineDecoder};
use crate::instruction::{Arity, Instruction};
use crate::instruction_set::InstructionSet;
use crate::register::{Access, OverflowPolicy, Register};
use crate::register_set::RegisterSet;
use crate::variant::ChipDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChipConfig {
    pub overflow: OverflowPolicy, // for registers that name no policy of their own
    pub comment: char,
}

impl Default for ChipConfig {
    fn default() -> Self {
        Self {
            overflow: OverflowPolicy::Wrap,
            comment: ';',
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { mnemonic: String },
    #[error("cannot parse operand `{token}`: {reason}")]
    OperandParse { token: String, reason: &'static str },
    #[error("invalid label `{label}`")]
    InvalidLabel { label: String },
    #[error("{mnemonic} takes {expected} operand(s), got {found}")]
    OperandCount {
        mnemonic: String,
        expected: Arity,
        found: usize,
    },
    #[error("{mnemonic}: operand {index} must be a {expected}, got `{found}`")]
    InvalidOperand {
        mnemonic: String,
        index: usize,
        expected: &'static str,
        found: String,
    },
    #[error("unknown register `{name}`")]
    UnknownRegister { name: String },
    #[error("value {value:#x} shifted by {shift} overflows register {register}")]
    RegisterOverflow {
        register: String,
        value: i64,
        shift: i32,
    },
    #[error("register {register} does not allow {access:?}")]
    AccessDenied { register: String, access: Access },
    #[error("mnemonic `{mnemonic}` is already registered")]
    DuplicateMnemonic { mnemonic: String },
    #[error("register name `{name}` is already in use")]
    DuplicateRegister { name: String },
    #[error("invalid register {name}: {reason}")]
    InvalidRegister { name: String, reason: String },
    #[error("comment delimiter `{comment}` is part of the line grammar")]
    InvalidComment { comment: char },
}

impl SimError {
    /// Attach the mnemonic to operand errors raised below the instruction layer.
    pub(crate) fn in_instruction(mut self, name: &str) -> Self {
        match &mut self {
            SimError::OperandCount { mnemonic, .. } | SimError::InvalidOperand { mnemonic, .. } => {
                if mnemonic.is_empty() {
                    *mnemonic = name.to_string();
                }
            }
            _ => {}
        }
        self
    }
}

/// A failure while running a multi-line program, with its 1-based line.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct LineError {
    pub line: usize,
    pub text: String,
    #[source]
    pub source: SimError,
}

/// A simulated chip: one register file, one instruction table, and a line
/// decoder feeding the table.
#[derive(Debug)]
pub struct Chip<D: Decoder = LineDecoder> {
    name: String,
    short_name: String,
    config: ChipConfig,
    registers: RegisterSet,
    instructions: InstructionSet,
    decoder: D,
}

impl Chip {
    pub fn new(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self::with_decoder(name, short_name, ChipConfig::default(), LineDecoder::default())
    }

    /// Fails with `InvalidComment` when `cfg.comment` could start or split an
    /// instruction token.
    pub fn with_config(
        name: impl Into<String>,
        short_name: impl Into<String>,
        cfg: ChipConfig,
    ) -> Result<Self, SimError> {
        let decoder = LineDecoder::new(cfg.comment)?;
        Ok(Self::with_decoder(name, short_name, cfg, decoder))
    }

    pub fn from_descriptor(desc: &ChipDescriptor) -> Result<Self, SimError> {
        desc.build()
    }
}

impl<D: Decoder> Chip<D> {
    pub fn with_decoder(
        name: impl Into<String>,
        short_name: impl Into<String>,
        cfg: ChipConfig,
        decoder: D,
    ) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            config: cfg,
            registers: RegisterSet::new(),
            instructions: InstructionSet::new(),
            decoder,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn config(&self) -> &ChipConfig {
        &self.config
    }

    pub fn add_register(&mut self, reg: Register) -> Result<(), SimError> {
        self.registers.add(reg)
    }

    pub fn add_instruction(&mut self, instr: Instruction) -> Result<(), SimError> {
        self.instructions.add(instr)
    }

    pub fn register(&self, ident: &str) -> Option<&Register> {
        self.registers.get(ident)
    }

    pub fn registers(&self) -> &RegisterSet {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterSet {
        &mut self.registers
    }

    pub fn instructions(&self) -> &InstructionSet {
        &self.instructions
    }

    pub fn reset(&mut self) {
        self.registers.reset();
    }

    /// Decode one instruction line and dispatch it.
    ///
    /// Returns the decoded line, or `None` for a line without an instruction.
    /// A failing line leaves every register as it was.
    pub fn execute(&mut self, line: &str) -> Result<Option<Decoded>, SimError> {
        let Some(d) = self.decoder.decode(line)? else {
            return Ok(None);
        };
        let Some(instr) = self.instructions.lookup(&d.mnemonic) else {
            warn!(chip = %self.short_name, mnemonic = %d.mnemonic, "unknown mnemonic");
            return Err(SimError::UnknownMnemonic {
                mnemonic: d.mnemonic,
            });
        };
        debug!(
            chip = %self.short_name,
            mnemonic = instr.mnemonic(),
            operands = d.operands.len(),
            "dispatch"
        );
        instr.execute(&d.operands, &mut self.registers)?;
        Ok(Some(d))
    }

    /// Execute `source` line by line, stopping at the first failure.
    /// Returns how many instructions ran.
    pub fn run(&mut self, source: &str) -> Result<usize, LineError> {
        let mut executed = 0;
        for (i, text) in source.lines().enumerate() {
            match self.execute(text) {
                Ok(Some(_)) => executed += 1,
                Ok(None) => {}
                Err(source) => {
                    return Err(LineError {
                        line: i + 1,
                        text: text.to_string(),
                        source,
                    })
                }
            }
        }
        Ok(executed)
    }
}
