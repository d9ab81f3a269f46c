//! `zynn` — command-line interface for the MLP inference accelerator.
//!
//! ```text
//! USAGE:
//!   zynn status [--base ADDR]        Decode and print the STATUS register
//!   zynn reset [--base ADDR]         Soft-reset the accelerator
//!   zynn configure [--base ADDR] ..  Program the network topology
//!   zynn classify <SCORES>...        Interpret output scores (no hardware)
//!   zynn demo                        Full lifecycle against the simulator
//! ```
//!
//! Hardware subcommands map the register window through `/dev/mem` and need
//! root (or `CAP_SYS_RAWIO`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zynn_chip::{fixed, Topology};
use zynn_driver::{interpret, Controller, DevMemBus, LoopbackTransfer, SimulatedAccelerator};

#[derive(Parser)]
#[command(name = "zynn", about = "MLP accelerator control and interpretation", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Decode and print the STATUS register.
    Status {
        /// Physical base address of the register window.
        #[arg(long, value_parser = parse_base, default_value = "0x43C00000")]
        base: u64,
    },
    /// Soft-reset the accelerator.
    Reset {
        /// Physical base address of the register window.
        #[arg(long, value_parser = parse_base, default_value = "0x43C00000")]
        base: u64,
    },
    /// Program the network topology registers.
    Configure {
        /// Physical base address of the register window.
        #[arg(long, value_parser = parse_base, default_value = "0x43C00000")]
        base: u64,
        /// Input node count.
        #[arg(long, default_value_t = 784)]
        inputs: u16,
        /// Hidden layer 1 size.
        #[arg(long, default_value_t = 16)]
        hidden1: u16,
        /// Hidden layer 2 size.
        #[arg(long, default_value_t = 16)]
        hidden2: u16,
        /// Output node count.
        #[arg(long, default_value_t = 10)]
        outputs: u16,
    },
    /// Interpret a set of output scores (floats, Q4.11-encoded internally).
    Classify {
        /// One score per class, e.g. `0.1 0.1 0.9 0.1`.
        #[arg(required = true)]
        scores: Vec<f32>,
    },
    /// Run one fabricated inference against the simulated device.
    Demo,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Status { base } => cmd_status(base)?,
        Cmd::Reset { base } => cmd_reset(base)?,
        Cmd::Configure {
            base,
            inputs,
            hidden1,
            hidden2,
            outputs,
        } => cmd_configure(base, Topology::new(inputs, hidden1, hidden2, outputs))?,
        Cmd::Classify { scores } => cmd_classify(&scores)?,
        Cmd::Demo => cmd_demo()?,
    }

    Ok(())
}

fn cmd_status(base: u64) -> Result<()> {
    let bus = DevMemBus::map(base).context("mapping register window")?;
    let ctl = Controller::new(bus);
    let s = ctl.status();

    println!("Accelerator @ {base:#x}");
    println!("  busy:  {}", s.busy);
    println!("  done:  {}", s.done);
    println!("  state: {:#x}", s.state);
    Ok(())
}

fn cmd_reset(base: u64) -> Result<()> {
    let bus = DevMemBus::map(base).context("mapping register window")?;
    let mut ctl = Controller::new(bus);
    ctl.reset();
    println!("Reset issued to accelerator @ {base:#x}");
    Ok(())
}

fn cmd_configure(base: u64, topology: Topology) -> Result<()> {
    let bus = DevMemBus::map(base).context("mapping register window")?;
    let mut ctl = Controller::new(bus);
    ctl.configure(topology);
    println!(
        "Programmed topology {}-{}-{}-{} @ {base:#x}",
        topology.num_inputs, topology.num_hidden1, topology.num_hidden2, topology.num_outputs
    );
    Ok(())
}

fn cmd_classify(scores: &[f32]) -> Result<()> {
    let raw: Vec<i16> = scores.iter().map(|&f| fixed::from_f32(f)).collect();
    let result = interpret::interpret(&raw)?;

    println!("class:      {}", result.index);
    println!("confidence: {:.4}", result.confidence);
    Ok(())
}

fn cmd_demo() -> Result<()> {
    // Canned MNIST-like output: a confident "3" against nine weak classes.
    let mut scores = vec![fixed::from_f32(0.1); 10];
    scores[3] = fixed::from_f32(0.9);

    let mut ctl = Controller::new(SimulatedAccelerator::with_latency(3))
        .with_reset_settle(std::time::Duration::ZERO);
    ctl.initialize(None);

    let topology = ctl.topology();
    println!(
        "Simulated accelerator, topology {}-{}-{}-{}",
        topology.num_inputs, topology.num_hidden1, topology.num_hidden2, topology.num_outputs
    );

    let image = vec![0i16; usize::from(topology.num_inputs)];
    let mut dma = LoopbackTransfer::new(scores);
    let outputs = ctl.run_inference(&mut dma, &image)?;

    println!("Output vector ({} classes):", outputs.len());
    for (i, &raw) in outputs.iter().enumerate() {
        println!("  [{i}] raw {raw:>6}  ({:+.4})", fixed::to_f32(raw));
    }

    let result = interpret::interpret(&outputs)?;
    println!();
    println!(
        "Classified as {} with confidence {:.4}",
        result.index, result.confidence
    );
    Ok(())
}

/// Parse a physical base address, accepting `0x`-prefixed hex or decimal.
fn parse_base(s: &str) -> std::result::Result<u64, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|e| format!("invalid address {s:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zynn_chip::regs;

    #[test]
    fn parses_hex_and_decimal_bases() {
        assert_eq!(parse_base("0x43C00000").unwrap(), regs::DEFAULT_BASE_ADDR);
        assert_eq!(parse_base("1024").unwrap(), 1024);
        assert!(parse_base("nonsense").is_err());
    }
}
