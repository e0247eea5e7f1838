//! Chip variants as data.
//!
//! A variant is a [`ChipDescriptor`]: the register file and opcode table of a
//! chip model, buildable into a [`Chip`] and loadable from JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::chip::{Chip, ChipConfig, SimError};
use crate::exec::{Builtin, Op};
use crate::instruction::{Instruction, Order};
use crate::isa::vc5441;
use crate::register::{Access, OverflowPolicy, Register};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSpec {
    pub name: String,
    pub short_name: String,
    pub bits: u32,
    /// Defaults to `bits`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus_width: Option<u32>,
    /// Defaults to the chip config's policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<OverflowPolicy>,
    #[serde(default)]
    pub access: Access,
}

impl RegisterSpec {
    pub fn new(name: impl Into<String>, short_name: impl Into<String>, bits: u32) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            bits,
            bus_width: None,
            overflow: None,
            access: Access::default(),
        }
    }

    pub fn bus(mut self, width: u32) -> Self {
        self.bus_width = Some(width);
        self
    }

    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = Some(policy);
        self
    }

    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn build(&self, cfg: &ChipConfig) -> Result<Register, SimError> {
        Ok(Register::new(
            self.name.as_str(),
            self.short_name.as_str(),
            self.bits,
            self.bus_width.unwrap_or(self.bits),
        )?
        .with_overflow(self.overflow.unwrap_or(cfg.overflow))
        .with_access(self.access))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionSpec {
    pub mnemonic: String,
    pub op: Op,
    #[serde(default)]
    pub order: Order,
    /// Fixed shift added to the source operand.
    #[serde(default)]
    pub shift: i32,
}

impl InstructionSpec {
    pub fn new(mnemonic: impl Into<String>, op: Op) -> Self {
        Self {
            mnemonic: mnemonic.into(),
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

    pub fn build(&self) -> Instruction {
        Instruction::new(
            self.mnemonic.as_str(),
            Builtin::new(self.op).order(self.order).shift(self.shift),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipDescriptor {
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub config: ChipConfig,
    #[serde(default)]
    pub registers: Vec<RegisterSpec>,
    #[serde(default)]
    pub instructions: Vec<InstructionSpec>,
}

impl ChipDescriptor {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid chip descriptor")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add every register and instruction, in order, to a fresh chip.
    pub fn build(&self) -> Result<Chip, SimError> {
        let mut chip = Chip::with_config(self.name.as_str(), self.short_name.as_str(), self.config)?;
        for spec in &self.registers {
            chip.add_register(spec.build(&self.config)?)?;
        }
        for spec in &self.instructions {
            chip.add_instruction(spec.build())?;
        }
        debug!(
            chip = %self.short_name,
            registers = chip.registers().len(),
            instructions = chip.instructions().len(),
            "built chip"
        );
        Ok(chip)
    }
}

/// Names of the variants compiled into the crate.
pub const BUILTIN: &[&str] = &["vc5441"];

/// Look up a compiled-in variant by key, full name or short name.
pub fn builtin(name: &str) -> Option<ChipDescriptor> {
    let d = vc5441::descriptor();
    let hit = ["vc5441", d.name.as_str(), d.short_name.as_str()]
        .iter()
        .any(|n| n.eq_ignore_ascii_case(name));
    hit.then_some(d)
}
