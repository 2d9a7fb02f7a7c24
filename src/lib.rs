pub mod cli;
pub mod display;
pub mod filter;
pub mod loader;
pub mod record;

pub use cli::{Cli, Commands, OutputFormat, cli_parse};
pub use filter::{
    FlagClause, FlagFilter, FlagRegistry, HeaderDescriptor, ParsedQuery, SizeValue,
    default_headers, is_freetext_match,
};
pub use loader::{LoadError, load_records};
pub use record::{RequestCause, RequestRecord, UrlDetails};

use anyhow::Context;

fn write_output_file(path: &std::path::Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    let registry = FlagRegistry::default();

    match &cli.command {
        Commands::Filter { file, query, count } => {
            let records = load_records(file)
                .with_context(|| format!("Failed to load request log '{}'", file.display()))?;

            let matched: Vec<&RequestRecord> = records
                .iter()
                .filter(|record| is_freetext_match(record, query, &registry))
                .collect();

            if *count {
                println!("{}", matched.len());
                return Ok(());
            }

            let rendered = match cli.format {
                OutputFormat::Text => display::format_records_text(&matched, true),
                OutputFormat::Table => display::format_records_table(&matched),
                OutputFormat::Json => display::format_records_json(&matched),
            };
            print!("{rendered}");

            if cli.format != OutputFormat::Json {
                println!(
                    "{} of {} records match query: {}",
                    matched.len(),
                    records.len(),
                    query
                );
            }

            if let Some(path) = &cli.output {
                // Files get a plain rendering, without terminal escapes.
                let plain = match cli.format {
                    OutputFormat::Text => display::format_records_text(&matched, false),
                    OutputFormat::Table | OutputFormat::Json => rendered,
                };
                write_output_file(path, &plain)?;
            }
        }
        Commands::Explain { query } => {
            let parsed = ParsedQuery::parse(query, &registry);
            let rendered = match cli.format {
                OutputFormat::Json => display::format_query_json(query, &parsed),
                OutputFormat::Text | OutputFormat::Table => {
                    display::format_query_text(query, &parsed)
                }
            };
            print!("{rendered}");

            if let Some(path) = &cli.output {
                write_output_file(path, &rendered)?;
            }
        }
        Commands::Keys => {
            let mut rendered = String::new();
            for key in registry.keys() {
                rendered.push_str(key);
                rendered.push('\n');
            }
            print!("{rendered}");

            if let Some(path) = &cli.output {
                write_output_file(path, &rendered)?;
            }
        }
    }

    Ok(())
}
