use anyhow::{anyhow, bail, Result};
use clap::{Parser, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dspsim::{variant, Base, ChipDescriptor};
use dspsim_trace::{load_source, trace, Report};

#[derive(Parser, Debug)]
#[command(author, version, about = "Trace register changes of an assembly source, line by line", long_about = None)]
struct Cli {
    /// Builtin chip variant
    #[arg(long, default_value = "vc5441", conflicts_with = "descriptor")]
    variant: String,
    /// JSON chip descriptor to use instead of a builtin variant
    #[arg(long, value_name = "FILE")]
    descriptor: Option<PathBuf>,
    /// Radix for register values (dec, hex, bin)
    #[arg(long, default_value_t = Base::Hex)]
    base: Base,
    /// Skip N lines at start of file
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Limit lines loaded (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// Maximum instructions to execute before stopping
    #[arg(long, default_value_t = 1_000_000usize)]
    max_steps: usize,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write output to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    /// Input assembly source
    #[arg(value_name = "SOURCE")]
    input: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn render_text(report: &Report) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{} <- {}", report.chip, report.source);
    for step in &report.steps {
        let changes: Vec<String> = step
            .changes
            .iter()
            .map(|c| format!("{}: {} -> {}", c.register, c.before, c.after))
            .collect();
        let _ = writeln!(s, "{:>5} | {:<28} {}", step.line, step.listing, changes.join("  "));
    }
    let _ = writeln!(s, "Registers:");
    for r in &report.registers {
        let _ = writeln!(s, "  {:<5} {}", r.short_name, dspsim::register::format_value(r.value, report.base));
    }
    if let Some(err) = &report.error {
        let _ = writeln!(s, "error: line {}: {}", err.line, err.message);
        let _ = writeln!(s, "{:>5} | {}", err.line, err.text.trim_end());
    }
    s
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let desc = match &cli.descriptor {
        Some(path) => ChipDescriptor::load(path)?,
        None => variant::builtin(&cli.variant)
            .ok_or_else(|| anyhow!("unknown variant `{}` (builtin: {})", cli.variant, variant::BUILTIN.join(", ")))?,
    };
    let mut chip = desc.build()?;
    let src = load_source(&cli.input, cli.skip, cli.len)?;
    let report = trace(&mut chip, &src, cli.base, cli.max_steps);

    let out = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => render_text(&report),
    };
    if let Some(path) = &cli.out {
        std::fs::write(path, out)?;
    } else {
        println!("{}", out);
    }

    if let Some(err) = &report.error {
        bail!("{}:{}: {}", report.source, err.line, err.message);
    }
    Ok(())
}
