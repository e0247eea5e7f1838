use serde::Serialize;

use dspsim::register::{format_value, RegisterSnapshot};
use dspsim::{format::fmt_decoded, Base, Chip, Register};

use crate::source::Source;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub register: String,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOut {
    pub line: usize,
    pub listing: String,
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorOut {
    pub line: usize,
    pub text: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub chip: String,
    pub source: String,
    pub base: Base,
    pub steps: Vec<StepOut>,
    pub error: Option<ErrorOut>,
    pub registers: Vec<RegisterSnapshot>,
}

/// Run `src` on `chip`, recording which registers each instruction changed.
/// Stops at the first failing line or after `max_steps` instructions.
pub fn trace(chip: &mut Chip, src: &Source, base: Base, max_steps: usize) -> Report {
    let mut steps = Vec::new();
    let mut error = None;
    for line in &src.lines {
        if steps.len() >= max_steps {
            tracing::warn!(max_steps, "step limit reached");
            break;
        }
        let before: Vec<i64> = chip.registers().iter().map(Register::value).collect();
        match chip.execute(&line.text) {
            Ok(Some(d)) => {
                let changes = chip
                    .registers()
                    .iter()
                    .zip(&before)
                    .filter(|(r, b)| r.value() != **b)
                    .map(|(r, b)| Change {
                        register: r.short_name().to_string(),
                        before: format_value(*b, base),
                        after: r.format(base),
                    })
                    .collect();
                steps.push(StepOut { line: line.number, listing: fmt_decoded(&d), changes });
            }
            Ok(None) => {}
            Err(e) => {
                error = Some(ErrorOut { line: line.number, text: line.text.clone(), message: e.to_string() });
                break;
            }
        }
    }
    Report {
        chip: chip.name().to_string(),
        source: src.name.clone(),
        base,
        steps,
        error,
        registers: chip.registers().snapshot(),
    }
}
