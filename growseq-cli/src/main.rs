//! Command-line driver for growable sequences.
//!
//! ```bash
//! growseq demo
//! growseq grow --initial-capacity 4 --count 20
//! growseq errors 0 3 9
//! RUST_LOG=debug growseq --config growseq.yaml grow --count 100
//! ```

use std::{error::Error, num::NonZeroUsize, path::PathBuf};

use clap::{Parser, Subcommand};
use growseq_core::{
    ErrorCode, GrowableSequence, RawSequence, SeqError, SequenceConfig, capacity_after,
    error_string, logger::init_logging,
};
use tracing::{debug, info};

type DynError = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug, Parser)]
#[command(name = "growseq", version, about = "Exercise growable append-only sequences")]
struct Cli {
    /// YAML file with a `growseq:` section; defaults come from the environment
    #[arg(long, global = true, env = "GROWSEQ_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the reference scenario step by step
    Demo,

    /// Append values and report every capacity change
    Grow {
        /// Elements allocated up front
        #[arg(long)]
        initial_capacity: Option<usize>,

        /// Number of values to append
        #[arg(long, default_value_t = 20)]
        count: u32,

        /// Storage ceiling in bytes
        #[arg(long)]
        max_bytes: Option<usize>,
    },

    /// Describe raw error codes (all codes when none are given)
    Errors {
        #[arg(allow_negative_numbers = true)]
        codes: Vec<i32>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SequenceConfig, DynError> {
    let config = match path {
        Some(path) => SequenceConfig::from_yaml_file(path)?,
        None => SequenceConfig::from_env()?,
    };
    debug!(?config, "configuration loaded");
    Ok(config)
}

fn run_demo() -> Result<(), DynError> {
    let element_size = NonZeroUsize::new(4).ok_or("element size must be non-zero")?;
    let mut seq = RawSequence::new(element_size, 2)?;
    println!(
        "constructed: element size {}, capacity {}",
        seq.element_size(),
        seq.capacity()
    );

    for value in [10u32, 20, 30] {
        let before = seq.capacity();
        seq.append(&value.to_ne_bytes())?;
        if seq.capacity() != before {
            println!("append {value}: grew {before} -> {}", seq.capacity());
        } else {
            println!("append {value}");
        }
    }

    seq.reset_cursor()?;
    let mut out = [0u8; 4];
    loop {
        match seq.next_into(&mut out) {
            Ok(()) => println!("next: {}", u32::from_ne_bytes(out)),
            Err(SeqError::EndOfSequence) => {
                println!("next: {}", ErrorCode::EndOfSequence);
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    seq.clear()?;
    seq.reset_cursor()?;
    match seq.next_into(&mut out) {
        Err(SeqError::EndOfSequence) => println!("after clear: empty"),
        other => println!("after clear: unexpected {other:?}"),
    }

    seq.destroy()?;
    println!("after destroy: {}", ErrorCode::from(&seq.validate()));
    Ok(())
}

fn run_grow(config: SequenceConfig, count: u32) -> Result<(), DynError> {
    let mut seq = GrowableSequence::<u32>::with_config(&config)?;
    let predicted = capacity_after(seq.capacity(), count as usize);
    info!(
        initial_capacity = seq.capacity(),
        max_storage_bytes = ?seq.max_storage_bytes(),
        ?predicted,
        "growing"
    );

    let mut completed = true;
    for value in 0..count {
        let before = seq.capacity();
        if let Err(err) = seq.append(value) {
            println!(
                "append {value}: {err} (len {}, capacity {})",
                seq.len(),
                seq.capacity()
            );
            completed = false;
            break;
        }
        if seq.capacity() != before {
            println!(
                "len {:>6}: capacity {before} -> {} ({} bytes)",
                seq.len(),
                seq.capacity(),
                seq.storage_bytes()
            );
        }
    }

    match predicted {
        Some(predicted) => println!(
            "final: len {}, capacity {} (predicted {predicted})",
            seq.len(),
            seq.capacity()
        ),
        None => println!("final: len {}, capacity {}", seq.len(), seq.capacity()),
    }
    if completed && predicted != Some(seq.capacity()) {
        return Err(format!(
            "capacity {} does not follow the growth law ({predicted:?})",
            seq.capacity()
        )
        .into());
    }

    seq.reset_cursor()?;
    let items: Vec<String> = seq.cursor_items().map(|v| v.to_string()).collect();
    println!("items: [{}]", items.join(", "));
    Ok(())
}

fn run_errors(codes: &[i32]) {
    if codes.is_empty() {
        for code in ErrorCode::ALL {
            println!("{:>3}  {:?}: {}", code.as_raw(), code, code.description());
        }
    } else {
        for &raw in codes {
            println!("{raw:>3}  {}", error_string(raw));
        }
    }
}

fn main() -> Result<(), DynError> {
    init_logging("growseq");
    let cli = Cli::parse();

    match cli.command {
        Command::Demo => run_demo(),
        Command::Grow {
            initial_capacity,
            count,
            max_bytes,
        } => {
            let mut config = load_config(cli.config.as_ref())?;
            if let Some(initial_capacity) = initial_capacity {
                config = config.with_initial_capacity(initial_capacity);
            }
            if max_bytes.is_some() {
                config = config.with_max_storage_bytes(max_bytes);
            }
            run_grow(config, count)
        }
        Command::Errors { codes } => {
            run_errors(&codes);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_grow() {
        let cli = Cli::try_parse_from([
            "growseq",
            "grow",
            "--initial-capacity",
            "4",
            "--count",
            "9",
            "--max-bytes",
            "64",
        ])
        .unwrap();
        match cli.command {
            Command::Grow {
                initial_capacity,
                count,
                max_bytes,
            } => {
                assert_eq!(initial_capacity, Some(4));
                assert_eq!(count, 9);
                assert_eq!(max_bytes, Some(64));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_codes() {
        let cli = Cli::try_parse_from(["growseq", "errors", "-1", "2"]).unwrap();
        match cli.command {
            Command::Errors { codes } => assert_eq!(codes, vec![-1, 2]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_runs_succeed() {
        run_demo().unwrap();
        run_grow(SequenceConfig::bounded(16).with_initial_capacity(1), 10).unwrap();
        run_grow(SequenceConfig::default().with_initial_capacity(3), 7).unwrap();
        run_grow(SequenceConfig::default().with_initial_capacity(0), 0).unwrap();
        run_errors(&[]);
        run_errors(&[-3, 4, 99]);
    }
}
