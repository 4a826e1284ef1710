use clap::Parser;
use lambda_census_cli::args::Args;
use lambda_census_cli::config::Config;
use lambda_census_cli::error::Result;
use lambda_census_cli::presentation;
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();

    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Application Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    // Convert args to engine::Config
    let config = Config::try_from(args)?;
    log::debug!("{config:?}");
    let result = lambda_census_engine::run(&config)?;

    for (path, err) in &result.errors {
        eprintln!("Error processing {}: {err}", path.display());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    presentation::write_results(&mut out, &result, &config)?;
    out.flush()?;

    presentation::write_side_files(&result, &config)
}
