use super::args::Cli;
use bundler_history_core::config::SourceConfig;
use bundler_history_core::report::{console, CsvDirSink, TableSink};
use bundler_history_core::source::{FileHistorySource, HistorySource, HttpHistorySource};
use bundler_history_core::pivot;

pub mod exit_codes {
    use bundler_history_core::HistoryError;

    pub const OK: i32 = 0;
    pub const UNEXPECTED: i32 = 2;

    pub fn for_error(err: &anyhow::Error) -> i32 {
        err.chain()
            .find_map(|e| e.downcast_ref::<HistoryError>())
            .map(HistoryError::exit_code)
            .unwrap_or(UNEXPECTED)
    }
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let source: Box<dyn HistorySource> = match &cli.input {
        Some(path) => Box::new(FileHistorySource::new(path)),
        None => {
            let cfg = SourceConfig::default()
                .with_base_url(cli.base_url.clone())
                .with_version(cli.results_version);
            Box::new(HttpHistorySource::new(&cfg)?)
        }
    };
    let mut sink = CsvDirSink::new(&cli.out_dir);

    cmd_pivot(source.as_ref(), &mut sink, cli.quiet).await
}

async fn cmd_pivot(
    source: &dyn HistorySource,
    sink: &mut dyn TableSink,
    quiet: bool,
) -> anyhow::Result<i32> {
    tracing::info!(source = %source.describe(), "loading history");
    let doc = source.fetch().await?;

    // Pivot everything before writing so a bad token leaves no partial output.
    let tables = pivot(&doc)?;

    for table in &tables {
        let path = sink.write_table(table)?;
        eprintln!("wrote {}", path.display());
    }

    if !quiet {
        console::print_summary(&tables);
    }

    Ok(exit_codes::OK)
}
