use crate::chip::ChipConfig;
use crate::exec::Op;
use crate::instruction::Order;
use crate::variant::{ChipDescriptor, InstructionSpec, RegisterSpec};

/// TMS320VC5441 ('5441) CPU core, one of its four C54x subsystems.
///
/// Covers the CPU register file and a representative slice of the C54x
/// accumulator instructions. Operands follow TI order: source first,
/// destination last (`ADD #1, 16, A`).
pub fn descriptor() -> ChipDescriptor {
    let mut registers = vec![
        RegisterSpec::new("Accumulator A", "A", 40),
        RegisterSpec::new("Accumulator B", "B", 40),
        RegisterSpec::new("Temporary register", "T", 16),
        RegisterSpec::new("Transition register", "TRN", 16),
    ];
    registers.extend(
        (0..8).map(|n| RegisterSpec::new(format!("Auxiliary register {n}"), format!("AR{n}"), 16)),
    );
    registers.extend([
        RegisterSpec::new("Stack pointer", "SP", 16),
        RegisterSpec::new("Circular buffer size register", "BK", 16),
        RegisterSpec::new("Block repeat counter", "BRC", 16),
        RegisterSpec::new("Status register 0", "ST0", 16),
        RegisterSpec::new("Status register 1", "ST1", 16),
        RegisterSpec::new("Processor mode status register", "PMST", 16),
    ]);

    let src_first = |mn: &str, op: Op| InstructionSpec::new(mn, op).order(Order::SrcFirst);
    let instructions = vec![
        src_first("LD", Op::Move),
        src_first("ADD", Op::Add),
        src_first("SUB", Op::Sub),
        src_first("AND", Op::And),
        src_first("OR", Op::Or),
        src_first("XOR", Op::Xor),
        // store low word; the 16-bit destination bus drops the rest
        src_first("STL", Op::Move),
        src_first("STH", Op::Move).shift(-16),
        src_first("MVMM", Op::Move),
        InstructionSpec::new("SFTL", Op::Shift),
        InstructionSpec::new("SFTA", Op::ShiftArith),
        InstructionSpec::new("NEG", Op::Neg),
        InstructionSpec::new("CMPL", Op::Not),
        InstructionSpec::new("NOP", Op::Nop),
    ];

    ChipDescriptor {
        name: "TMS320VC5441".into(),
        short_name: "'5441".into(),
        config: ChipConfig::default(),
        registers,
        instructions,
    }
}
