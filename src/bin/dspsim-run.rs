use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dspsim::format::fmt_registers;
use dspsim::{variant, Base, ChipDescriptor};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run an assembly source file on a simulated DSP chip"
)]
struct Opts {
    /// Builtin chip variant
    #[arg(short, long, default_value = "vc5441", conflicts_with = "descriptor")]
    variant: String,
    /// JSON chip descriptor to use instead of a builtin variant
    #[arg(short, long)]
    descriptor: Option<PathBuf>,
    /// Radix of the final register dump (dec, hex, bin)
    #[arg(short, long, default_value_t = Base::Hex)]
    base: Base,
    #[arg(value_name = "SOURCE")]
    input: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let desc = match &opts.descriptor {
        Some(path) => ChipDescriptor::load(path)?,
        None => variant::builtin(&opts.variant).ok_or_else(|| {
            anyhow!(
                "unknown variant `{}` (builtin: {})",
                opts.variant,
                variant::BUILTIN.join(", ")
            )
        })?,
    };
    let mut chip = desc.build()?;

    let source = std::fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;

    let result = chip.run(&source);
    println!("{} ({})", chip.name(), chip.short_name());
    println!("{}", fmt_registers(chip.registers(), opts.base));
    match result {
        Ok(n) => {
            tracing::info!(executed = n, "run complete");
            Ok(())
        }
        Err(e) => Err(anyhow!("{}:{}: {}", opts.input.display(), e.line, e.source)),
    }
}
