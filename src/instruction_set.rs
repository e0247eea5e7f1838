use std::collections::HashMap;

use crate::chip::SimError;
use crate::instruction::Instruction;

/// Insertion-ordered opcode table with case-insensitive mnemonic lookup.
///
/// Mnemonics are unique, so the first registration of a mnemonic is the one
/// every lookup finds.
#[derive(Debug, Default)]
pub struct InstructionSet {
    list: Vec<Instruction>,
    index: HashMap<String, usize>,
}

impl InstructionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, instr: Instruction) -> Result<(), SimError> {
        let key = instr.mnemonic().to_ascii_lowercase();
        if self.index.contains_key(&key) {
            return Err(SimError::DuplicateMnemonic {
                mnemonic: instr.mnemonic().to_string(),
            });
        }
        self.index.insert(key, self.list.len());
        self.list.push(instr);
        Ok(())
    }

    pub fn lookup(&self, mnemonic: &str) -> Option<&Instruction> {
        let i = *self.index.get(&mnemonic.to_ascii_lowercase())?;
        self.list.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
