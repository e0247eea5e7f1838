use crate::chip::SimError;
use crate::register::{Access, Register, RegisterSnapshot};

/// Insertion-ordered register file owned by one chip.
#[derive(Debug, Clone, Default)]
pub struct RegisterSet {
    list: Vec<Register>,
}

impl RegisterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `reg`. Its name and short name must not collide (ignoring ASCII
    /// case) with the name or short name of a register already present.
    pub fn add(&mut self, reg: Register) -> Result<(), SimError> {
        for ident in [reg.name(), reg.short_name()] {
            if self.get(ident).is_some() {
                return Err(SimError::DuplicateRegister {
                    name: ident.to_string(),
                });
            }
        }
        self.list.push(reg);
        Ok(())
    }

    pub fn get(&self, ident: &str) -> Option<&Register> {
        self.list.iter().find(|r| r.matches(ident))
    }

    pub fn get_mut(&mut self, ident: &str) -> Option<&mut Register> {
        self.list.iter_mut().find(|r| r.matches(ident))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Register> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    fn readable(&self, ident: &str) -> Result<&Register, SimError> {
        let reg = self.get(ident).ok_or_else(|| SimError::UnknownRegister {
            name: ident.to_string(),
        })?;
        if !reg.access().contains(Access::READ) {
            return Err(SimError::AccessDenied {
                register: reg.name().to_string(),
                access: Access::READ,
            });
        }
        Ok(reg)
    }

    /// Read `ident` through its bus as an instruction operand.
    pub fn fetch(&self, ident: &str, shift: i32) -> Result<i64, SimError> {
        self.readable(ident).map(|r| r.read(shift))
    }

    /// Full contents of `ident`, sign-extended from its width.
    pub fn fetch_signed(&self, ident: &str) -> Result<i64, SimError> {
        self.readable(ident).map(Register::signed)
    }

    /// Fit an arithmetic result to `ident`'s width per its overflow policy.
    pub fn settle(&self, ident: &str, result: i128) -> Result<i64, SimError> {
        self.get(ident)
            .ok_or_else(|| SimError::UnknownRegister {
                name: ident.to_string(),
            })?
            .settle(result)
    }

    /// Write `value` into `ident` on behalf of an instruction, honoring the
    /// register's access flags and overflow policy.
    pub fn store(&mut self, ident: &str, value: i64, shift: i32) -> Result<(), SimError> {
        let reg = self.get_mut(ident).ok_or_else(|| SimError::UnknownRegister {
            name: ident.to_string(),
        })?;
        if !reg.access().contains(Access::WRITE) {
            return Err(SimError::AccessDenied {
                register: reg.name().to_string(),
                access: Access::WRITE,
            });
        }
        reg.try_write(value, shift)
    }

    /// Zero every register.
    pub fn reset(&mut self) {
        for reg in &mut self.list {
            reg.write(0, 0);
        }
    }

    pub fn snapshot(&self) -> Vec<RegisterSnapshot> {
        self.list.iter().map(Register::snapshot).collect()
    }
}

impl<'a> IntoIterator for &'a RegisterSet {
    type Item = &'a Register;
    type IntoIter = std::slice::Iter<'a, Register>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
