use lockscan::adapters::outbound::console::StderrProgressReporter;
use lockscan::adapters::outbound::filesystem::FileSystemReader;
use lockscan::adapters::outbound::formatters::JsonReportFormatter;
use lockscan::application::factories::{
    PresenterFactory, PresenterType, VulnerabilitySourceFactory,
};
use lockscan::application::use_cases::{CheckVulnerabilitiesUseCase, ScanDependenciesUseCase};
use lockscan::cli::Args;
use lockscan::config::{discover_config, load_config_from_path, ConfigFile};
use lockscan::ports::outbound::{ProgressReporter, ReportFormatter};
use lockscan::shared::error::ExitCode;
use lockscan::shared::Result;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse_args() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let progress_reporter = Arc::new(StderrProgressReporter::new());

    let config = load_config(&args, progress_reporter.as_ref())?;
    let options = args.into_options(config);

    let request = options.to_request(std::env::var("GITHUB_TOKEN").ok());

    let repositories = VulnerabilitySourceFactory::create_with_endpoints(
        request.sources,
        request.github_token.clone(),
        progress_reporter.clone(),
        &options.endpoints,
    )?;

    let use_case = ScanDependenciesUseCase::new(
        FileSystemReader::new(),
        FileSystemReader::new(),
        progress_reporter.clone(),
        CheckVulnerabilitiesUseCase::new(repositories),
    );

    let response = use_case.execute(request).await?;

    progress_reporter.report("📝 Generating JSON report...");
    let formatted_output = JsonReportFormatter::new().format(&response.report)?;

    let presenter = PresenterFactory::create(PresenterType::from_output(options.output));
    presenter.present(&formatted_output)?;

    Ok(response.exit_code())
}

/// Explicit `--config` must exist; otherwise look next to the target
fn load_config(args: &Args, reporter: &dyn ProgressReporter) -> Result<Option<ConfigFile>> {
    match &args.config {
        Some(path) => load_config_from_path(path, reporter).map(Some),
        None => discover_config(&args.target, reporter),
    }
}
