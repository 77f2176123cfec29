use clap::{Parser, Subcommand};
use diodelab::batch;
use diodelab::cents;
use diodelab::error::DecodeError;
use diodelab::fourier;
use diodelab::output;
use diodelab::parser::{self, ErrorPolicy};
use diodelab::physics;
use diodelab::units;
use std::io;
use std::path::PathBuf;

/// Diode model library and Fourier distortion tool
#[derive(Parser)]
#[command(name = "diodelab", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every diode model in a library as a canonical card
    Models {
        library: PathBuf,

        /// Skip cards with undecodable values instead of failing
        #[arg(long)]
        skip_bad: bool,
    },
    /// Forward voltage of one model
    Vf {
        library: PathBuf,
        model: String,

        /// Forward current, engineering notation accepted
        #[arg(long, default_value = "1m", value_parser = parse_eng)]
        current: f64,

        /// Junction temperature in kelvin
        #[arg(long, default_value_t = physics::DEFAULT_TEMPERATURE)]
        temperature: f64,
    },
    /// Cumulative THD series of one Fourier report
    Thd { report: PathBuf },
    /// Flattened row for one diode pair report
    Flatten {
        folder: PathBuf,
        positive: String,
        negative: String,
    },
    /// Flattened rows for every model named in a list file
    Table {
        folder: PathBuf,
        list: PathBuf,

        /// Every ordered pair instead of self pairs only
        #[arg(long)]
        all_pairs: bool,
    },
    /// Harmonic series against equal-tempered scale degrees
    Cents {
        #[arg(short, long, default_value_t = 20)]
        number: u32,
    },
    /// Print the diode parameter schema
    Params,
}

fn parse_eng(s: &str) -> Result<f64, DecodeError> {
    units::decode(s)
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", context, e);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = io::stdout();

    match cli.command {
        Command::Models { library, skip_bad } => {
            let policy = if skip_bad {
                ErrorPolicy::Skip
            } else {
                ErrorPolicy::Abort
            };
            let models = parser::read_models(&library, policy)
                .unwrap_or_else(|e| fail("Parse error", e));
            output::write_models(&models, &mut stdout).unwrap_or_else(|e| fail("Output error", e));
        }
        Command::Vf {
            library,
            model,
            current,
            temperature,
        } => {
            let models = parser::read_models(&library, ErrorPolicy::Skip)
                .unwrap_or_else(|e| fail("Parse error", e));
            let found = models
                .iter()
                .find(|m| m.name.eq_ignore_ascii_case(&model))
                .unwrap_or_else(|| fail("Lookup error", format!("no model {} in {}", model, library.display())));
            match physics::forward_voltage_at(found, current, temperature) {
                Some(v) => println!("{}", v),
                None => fail(
                    "Domain error",
                    format!("forward voltage undefined for I={} IS={}", current, found.params.is),
                ),
            }
        }
        Command::Thd { report } => {
            let analysis = fourier::read_report(&report).unwrap_or_else(|e| fail("Report error", e));
            eprintln!("{}", analysis);
            output::write_thd_series_csv(&analysis, &mut stdout)
                .unwrap_or_else(|e| fail("Output error", e));
        }
        Command::Flatten {
            folder,
            positive,
            negative,
        } => {
            let path = batch::pair_report_path(&folder, &positive, &negative);
            let analysis = fourier::read_report(&path).unwrap_or_else(|e| fail("Report error", e));
            output::write_flat_row(&positive, &negative, &analysis, &mut stdout)
                .unwrap_or_else(|e| fail("Output error", e));
        }
        Command::Table {
            folder,
            list,
            all_pairs,
        } => {
            let names = std::fs::read_to_string(&list).unwrap_or_else(|e| {
                fail(&format!("Error reading {}", list.display()), e)
            });
            let names: Vec<&str> = names.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
            let pairs = if all_pairs {
                batch::all_pairs(&names)
            } else {
                batch::self_pairs(&names)
            };
            for report in batch::analyze_pairs(&folder, &pairs) {
                if let Ok(analysis) = &report.analysis {
                    output::write_flat_row(&report.positive, &report.negative, analysis, &mut stdout)
                        .unwrap_or_else(|e| fail("Output error", e));
                }
            }
        }
        Command::Cents { number } => {
            output::write_degree_table(&cents::degree_table(number), &mut stdout)
                .unwrap_or_else(|e| fail("Output error", e));
        }
        Command::Params => {
            output::write_param_table(&mut stdout).unwrap_or_else(|e| fail("Output error", e));
        }
    }
}
