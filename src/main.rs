use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use eyre::{bail, Result};
use log::info;

use mac_sim::equivalence::{LONG_TRACE_LEN, SHORT_TRACE_LEN};
use mac_sim::trace::dump_vcd;
use mac_sim::{
    check_equivalence, simulate_mac, EquivalenceConfig, FixedBench, MacTestbench, Verdict, S9,
};

#[derive(Parser)]
#[command(name = "mac-sim")]
#[command(about = "Cycle-accurate multiply-accumulate unit with equivalence checking")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the fixed-vector test bench
    Bench {
        /// Number of cycles to sample
        #[arg(short, long, default_value = "4")]
        cycles: usize,
    },
    /// Check the simulated unit against the reference model on random traces
    Check {
        /// Number of random traces
        #[arg(short, long, default_value = "256")]
        cases: u32,
        /// Longest channel to generate
        #[arg(short, long, default_value_t = SHORT_TRACE_LEN)]
        max_len: usize,
        /// Use the long-trace configuration
        #[arg(long, conflicts_with = "max_len")]
        long: bool,
        /// Seed for trace generation
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },
    /// Simulate literal operand channels
    Run {
        /// First operand channel, e.g. 1,2,3,4
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true,
              value_parser = clap::value_parser!(i16).range(-256..=255))]
        xs: Vec<i16>,
        /// Second operand channel
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true,
              value_parser = clap::value_parser!(i16).range(-256..=255))]
        ys: Vec<i16>,
        /// Write a waveform of the run to this file
        #[arg(long)]
        vcd: Option<Utf8PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { cycles } => bench(cycles),
        Commands::Check {
            cases,
            max_len,
            long,
            seed,
        } => {
            let max_len = if long { LONG_TRACE_LEN } else { max_len };
            check(EquivalenceConfig::new(cases, max_len).with_seed(seed))
        }
        Commands::Run { xs, ys, vcd } => run(&xs, &ys, vcd),
    }
}

fn bench(cycles: usize) -> Result<()> {
    println!("🔄 Running fixed-vector bench for {cycles} cycles...");
    let report = FixedBench::default_vectors().run(cycles);
    if !report.passed() {
        bail!(
            "verification signal raised on cycles {:?}",
            report.failed_cycles()
        );
    }
    println!("✅ No failures over {} cycles", report.cycles());
    Ok(())
}

fn check(config: EquivalenceConfig) -> Result<()> {
    match check_equivalence(&config, simulate_mac::<S9>) {
        Verdict::Equivalent { cases } => {
            println!("✅ {cases} traces match the reference model");
            Ok(())
        }
        Verdict::Diverged(cex) => bail!("{cex}"),
        Verdict::Aborted(reason) => bail!("equivalence check aborted: {reason}"),
    }
}

fn run(xs: &[i16], ys: &[i16], vcd: Option<Utf8PathBuf>) -> Result<()> {
    let xs: Vec<S9> = xs.iter().copied().map(S9::new).collect();
    let ys: Vec<S9> = ys.iter().copied().map(S9::new).collect();

    let mut tb = MacTestbench::<S9>::new();
    tb.run_for_cycles(xs.iter().copied().zip(ys.iter().copied()), usize::MAX);
    info!("Simulated {} cycles", tb.cycle_count());

    for record in tb.records() {
        println!(
            "cycle {:>4}: x={:>4} y={:>4} out={:>4}",
            record.cycle, record.x, record.y, record.output
        );
    }

    if let Some(path) = vcd {
        dump_vcd(&path, tb.records())?;
        println!("🎉 Waveform written to {path}");
    }
    Ok(())
}
