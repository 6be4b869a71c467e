use clap::Parser;
use dotbridge::logging::{error, LogFormat};
use dotbridge::{BridgeConfig, ManagedOption, Result, TestClass, TestStaticClass};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dotbridge",
    about = "Replay the managed test scenario against the native library",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    /// Configuration file (default: discover .dotbridge.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Print interop statistics as JSON when done
    #[arg(long)]
    stats: bool,
}

fn main() {
    let code = run(Cli::parse());
    if code != 0 {
        std::process::exit(code);
    }
}

/// Run the scenario and return the exit code; the log writer is flushed
/// before returning
fn run(cli: Cli) -> i32 {
    let mut config = match &cli.config {
        Some(path) => match BridgeConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 2;
            }
        },
        None => BridgeConfig::discover(),
    };
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    let guard = dotbridge::init(config);

    let outcome = run_scenario();
    let leaked = dotbridge::shutdown();

    if cli.stats {
        match serde_json::to_string_pretty(&dotbridge::stats()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    let code = match outcome {
        Err(e) => {
            error!("scenario failed: {}", e);
            eprintln!("Error: {}", e);
            1
        }
        Ok(()) if leaked > 0 => 1,
        Ok(()) => 0,
    };
    drop(guard);
    code
}

fn run_scenario() -> Result<()> {
    TestStaticClass::hello()?;
    TestStaticClass::print_number(123)?;
    println!("{}", TestStaticClass::add(1, 2)?);
    println!("{}", TestStaticClass::concat(&"Concatenated ".into(), &"String".into())?);
    println!("{}", TestStaticClass::concat_str(&"Concatenated ".into(), &"str".into())?);

    let mut obj = TestClass::new()?;
    obj.print()?;
    obj.increment()?;
    obj.print()?;
    obj.add(3)?;
    obj.print()?;
    println!("{}", obj.get()?);

    TestStaticClass::test_obj_by_value(&obj)?;

    TestStaticClass::print_vec_len(&[1, 2])?;
    for e in TestStaticClass::get_vec()? {
        println!("{}", e);
    }

    let found = TestStaticClass::maybe_return_class(&ManagedOption::some("asdf".into()))?;
    found.value()?.print()?;
    println!("{}", TestStaticClass::maybe_add_one(ManagedOption::none())?.is_some());

    obj.dispose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_flag_uses_config_names() {
        let cli = Cli::try_parse_from(["dotbridge", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Json));

        let cli = Cli::try_parse_from(["dotbridge", "-v", "--stats"]).unwrap();
        assert_eq!(cli.log_format, None);
        assert!(cli.verbose && cli.stats);

        assert!(Cli::try_parse_from(["dotbridge", "--log-format", "yaml"]).is_err());
    }
}
