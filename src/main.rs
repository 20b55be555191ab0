use anyhow::{Context, Result};
use clap::Parser;
use fencesplit::cli::{Cli, Commands};
use fencesplit::models::segment::SegmentStats;
use fencesplit::processor::{OutputWriter, Processor, STDIN_SOURCE};
use fencesplit::utils::path::expand_paths;
use std::io::{self, Read, Write};
use std::process::ExitCode;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode> {
    if let Some(Commands::Init { output, force }) = &cli.command {
        Cli::handle_init_command(output, *force)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = cli.load_config()?;
    let options = cli.render_options(&config)?;
    let extension = options.format.extension();

    let processor = Processor::new();
    let mut writer = OutputWriter::new(cli.output_dir.clone(), cli.dry_run, cli.verbose);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.reads_stdin() {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read response from stdin")?;

        let response = processor.process_text(STDIN_SOURCE, &content, &options)?;
        writer.write_response(&response, extension, false, &mut out)?;
        out.flush()?;
        writer.print_summary(1, &response.stats, 0);
        return Ok(ExitCode::SUCCESS);
    }

    let paths = expand_paths(&cli.paths, &config.input);
    if paths.is_empty() {
        eprintln!("No files found matching the provided patterns.");
        return Ok(ExitCode::SUCCESS);
    }

    log::info!("Processing {} response(s)", paths.len());

    let with_banner = paths.len() > 1;
    let mut totals = SegmentStats::default();
    let mut failed = 0;

    for (path, result) in processor.process_files(&paths, &options) {
        let written = result.and_then(|response| {
            writer.write_response(&response, extension, with_banner, &mut out)?;
            Ok(response)
        });

        match written {
            Ok(response) => totals.absorb(&response.stats),
            Err(err) => {
                failed += 1;
                eprintln!("Error processing {}: {:#}", path.display(), err);
            }
        }
    }

    out.flush()?;
    writer.print_summary(paths.len(), &totals, failed);

    Ok(if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
