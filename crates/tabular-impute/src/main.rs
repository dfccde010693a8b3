//! CLI entry point for the imputation demonstrations.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tabular_impute::table::missing_count;
use tabular_impute::{Block, ConstantImputer, RunSpec, StatisticImputer, TableInput};
use tracing::info;

/// Which demonstration to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Demo {
    /// Fill every missing cell with 0
    Constant,
    /// Fill each column with its mean
    Mean,
    /// Fill with the median within groups of column "1"
    Grouped,
    /// Run all demonstrations
    All,
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Missing-value imputation demonstrations",
    long_about = "Runs the built-in imputation demonstrations on small in-memory tables\n\
                  and prints each table before and after filling.\n\n\
                  EXAMPLES:\n  \
                  # Run everything\n  \
                  tabular-impute\n\n  \
                  # Grouped median only, with block dumps and debug logs\n  \
                  tabular-impute --demo grouped --dump -l debug"
)]
struct Args {
    /// Demonstration to run
    #[arg(short, long, value_enum, default_value = "all")]
    demo: Demo,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print each imputer's configuration dump as JSON
    #[arg(long)]
    dump: bool,
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let runspec = RunSpec::default();

    if matches!(args.demo, Demo::Constant | Demo::All) {
        let imputer = ConstantImputer::new(0);
        run_demo("Constant fill (0)", &imputer, &runspec, sample_rows(), args.dump)?;
    }

    if matches!(args.demo, Demo::Mean | Demo::All) {
        let imputer = StatisticImputer::new("mean", None)?;
        run_demo("Mean fill", &imputer, &runspec, sample_rows(), args.dump)?;
    }

    if matches!(args.demo, Demo::Grouped | Demo::All) {
        let imputer = StatisticImputer::new("median", Some("1"))?;
        run_demo(
            "Median fill grouped by column \"1\"",
            &imputer,
            &runspec,
            grouped_rows(),
            args.dump,
        )?;
    }

    Ok(())
}

/// Run one block on `rows` and print the table before and after.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn run_demo(
    title: &str,
    block: &dyn Block,
    runspec: &RunSpec,
    rows: Vec<Vec<f64>>,
    dump: bool,
) -> Result<()> {
    let input = TableInput::from(rows).into_frame()?;

    println!("\n{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));

    if dump {
        println!("{}", serde_json::to_string_pretty(&block.dump()?)?);
    }

    println!("\nBEFORE");
    println!("{}", input);

    let (filled, _, _) = block.invoke(runspec, (&input).into(), None, None)?;
    info!(
        "'{}' done: {} -> {} missing",
        block.config().name,
        missing_count(&input),
        missing_count(&filled)
    );

    println!("\nAFTER");
    println!("{}", filled);
    Ok(())
}

fn sample_rows() -> Vec<Vec<f64>> {
    vec![
        vec![1.0, f64::NAN, 1.0],
        vec![f64::NAN, 2.0, 2.0],
        vec![3.0, 3.0, f64::NAN],
    ]
}

fn grouped_rows() -> Vec<Vec<f64>> {
    vec![
        vec![1.0, 1.0],
        vec![1.0, 1.0],
        vec![2.0, 1.0],
        vec![2.0, 1.0],
        vec![2.0, 1.0],
        vec![f64::NAN, 1.0],
        vec![1.0, 2.0],
        vec![1.0, 2.0],
        vec![1.0, 2.0],
        vec![2.0, 2.0],
        vec![2.0, 2.0],
        vec![f64::NAN, 2.0],
    ]
}
