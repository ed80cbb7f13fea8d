use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;

use tinyutils::cli::{CliArgs, Command};
use tinyutils::commands::{run_export, run_guard, run_preview};
use tinyutils::config::ToolConfig;
use tinyutils::export::{BlobSink, DirectorySink, WriterSink};

fn main() -> Result<()> {
    tinyutils::tracing::init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => ToolConfig::load_from(path).map_err(anyhow::Error::msg)?,
        None => ToolConfig::load(),
    };

    let command = args.into_command(&config).map_err(anyhow::Error::msg)?;
    tracing::debug!(?command, "Running command");

    match command {
        Command::Preview(job) => {
            println!("{}", run_preview(&job)?);
        }
        Command::Export(job) => {
            let mut sink: Box<dyn BlobSink> = match &job.output_dir {
                Some(dir) => Box::new(DirectorySink::new(dir)),
                None => Box::new(WriterSink::stdout()),
            };
            let location = run_export(&job, sink.as_mut())?;
            if job.output_dir.is_some() {
                eprintln!("Wrote {}", location);
            } else if std::io::stdout().is_terminal() {
                // Exports carry no trailing line break; keep the prompt on its own line
                println!();
            }
        }
        Command::Guard(values) => {
            println!("{}", run_guard(&values));
        }
    }

    Ok(())
}
