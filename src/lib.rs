pub mod chip;
pub mod decoder;
pub mod exec;
pub mod format;
pub mod instruction;
pub mod instruction_set;
pub mod register;
pub mod register_set;
pub mod variant;

pub mod isa {
    pub mod vc5441; // TMS320VC5441 variant descriptor
}

pub use chip::{Chip, ChipConfig, LineError, SimError};
pub use decoder::{Decoded, Decoder, LineDecoder, Operand};
pub use exec::{Builtin, Op};
pub use instruction::{Arity, Executor, Handler, Instruction, Order};
pub use instruction_set::InstructionSet;
pub use register::{Access, Base, OverflowPolicy, Register};
pub use register_set::RegisterSet;
pub use variant::ChipDescriptor;
