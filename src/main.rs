mod cli;

use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

use cli::{Cli, Command, GenerateArgs};
use exam_seating::config::load_plan_config;
use exam_seating::display::print_report;
use exam_seating::export::export_report;
use exam_seating::logging::{init_logging, LogConfig};
use exam_seating::parser::load_roster;
use exam_seating::seating::generate;
use exam_seating::web;

fn run_generate(args: &GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let roster = load_roster(&args.students)?;
    let mut config = load_plan_config(&args.config)?;
    if let Some(branch) = &args.branch {
        config.branch_name = branch.clone();
    }

    let report = generate(&roster, &config)?;

    if !args.quiet {
        print_report(&report)?;
    }

    if let Some(dir) = &args.output_dir {
        let written = export_report(&report, dir)?;
        println!("\nWrote {} files to {}", written.len(), dir.display());
    }

    if let Some(path) = &args.json {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &report)?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format.into()));

    match cli.command {
        Command::Generate(args) => run_generate(&args)?,
        Command::Serve(args) => {
            println!("Access the API at http://localhost:{}/api/generate", args.port);
            web::start_server(&args.bind, args.port, args.static_dir).await?;
        }
    }

    Ok(())
}
