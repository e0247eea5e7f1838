use crate::decoder::Decoded;
use crate::register::{Base, Register};
use crate::register_set::RegisterSet;

/// Canonical listing form: upper-case mnemonic, `", "`-separated operands.
pub fn fmt_decoded(d: &Decoded) -> String {
    let mut s = String::new();
    if let Some(label) = &d.label {
        s.push_str(label);
        s.push_str(": ");
    }
    s.push_str(&d.mnemonic.to_ascii_uppercase());
    if !d.operands.is_empty() {
        let ops: Vec<String> = d.operands.iter().map(ToString::to_string).collect();
        s.push(' ');
        s.push_str(&ops.join(", "));
    }
    s
}

pub fn fmt_register(reg: &Register, base: Base, width: usize) -> String {
    format!("{:<width$} {}", reg.short_name(), reg.format(base))
}

/// One line per register, short names aligned.
pub fn fmt_registers(regs: &RegisterSet, base: Base) -> String {
    let width = regs.iter().map(|r| r.short_name().len()).max().unwrap_or(0);
    regs.iter()
        .map(|r| fmt_register(r, base, width))
        .collect::<Vec<_>>()
        .join("\n")
}
