use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use docblocks_cli::Commands;
use docblocks_cli::DocblocksCli;
use docblocks_cli::OutputFormat;
use docblocks_core::DocError;
use docblocks_core::DocumentationEntry;
use docblocks_core::config::DocblocksConfig;
use docblocks_core::project::DocumentFailure;
use docblocks_core::project::ProjectScan;
use docblocks_core::project::ScanOptions;
use docblocks_core::project::scan_project_with_options;
use miette::Diagnostic;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DocblocksCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::List { format }) => run_list(&args, *format),
		Some(Commands::Show { name, package }) => run_show(&args, name, package.as_deref()),
		Some(Commands::Check) => run_check(&args),
		None => {
			eprintln!("No subcommand specified. Run `docblocks --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<DocError>() {
			Ok(doc_err) => {
				let report: miette::Report = (*doc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init()
		.ok();
}

fn resolve_root(args: &DocblocksCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

fn scan(args: &DocblocksCli) -> Result<ProjectScan, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DocblocksConfig::load(&root)?;
	let mut options = ScanOptions::from_config(config.as_ref());
	options.parallel = !args.no_parallel;
	tracing::debug!(root = %root.display(), parallel = options.parallel, "scanning project");

	Ok(scan_project_with_options(&root, &options)?)
}

/// Scan the project and print one warning line per failed file.
fn scan_and_warn(args: &DocblocksCli) -> Result<ProjectScan, Box<dyn std::error::Error>> {
	let scan = scan(args)?;
	let root = resolve_root(args);

	for failure in &scan.failures {
		eprintln!(
			"{} skipped {}: {}",
			colored!("warning:", yellow),
			make_relative(&failure.path, &root),
			failure.error.inner()
		);
	}

	Ok(scan)
}

#[derive(Serialize)]
struct ListOutput<'a> {
	entries: Vec<ListEntry<'a>>,
	failures: Vec<FailureOutput>,
}

#[derive(Serialize)]
struct ListEntry<'a> {
	unique_id: String,
	#[serde(flatten)]
	entry: &'a DocumentationEntry,
}

#[derive(Serialize)]
struct FailureOutput {
	path: String,
	message: String,
}

fn run_list(args: &DocblocksCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	match format {
		OutputFormat::Json => {
			let scan = scan(args)?;
			let output = ListOutput {
				entries: scan
					.registry
					.sorted_entries()
					.into_iter()
					.map(|entry| {
						ListEntry {
							unique_id: entry.unique_id(),
							entry,
						}
					})
					.collect(),
				failures: scan
					.failures
					.iter()
					.map(|failure| {
						FailureOutput {
							path: make_relative(&failure.path, &root),
							message: failure.error.to_string(),
						}
					})
					.collect(),
			};
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
		OutputFormat::Text => {
			let scan = scan_and_warn(args)?;

			if scan.registry.is_empty() {
				println!("No documentation blocks found.");
				return Ok(());
			}

			println!("{}", colored!("Documentation blocks:", bold));
			for entry in scan.registry.sorted_entries() {
				let rel = make_relative(&entry.provenance.original_file_path, &root);
				println!("  {}.{} {rel}", entry.package_name, entry.name);
			}

			println!(
				"\n{} block(s) in {} file(s)",
				scan.registry.len(),
				scan.files.len()
			);
		}
	}

	Ok(())
}

fn run_show(
	args: &DocblocksCli,
	name: &str,
	package: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
	let scan = scan_and_warn(args)?;

	let Some(entry) = scan.registry.find(name, package) else {
		eprintln!(
			"{} no documentation block named `{name}`",
			colored!("error:", red)
		);
		process::exit(1);
	};

	println!("{}", entry.block_contents);

	Ok(())
}

fn run_check(args: &DocblocksCli) -> Result<(), Box<dyn std::error::Error>> {
	let scan = scan(args)?;
	let root = resolve_root(args);

	if scan.is_ok() {
		println!(
			"{} {} documentation block(s) in {} file(s) are valid.",
			colored!("ok:", green),
			scan.registry.len(),
			scan.files.len()
		);
		return Ok(());
	}

	for failure in &scan.failures {
		eprintln!("{:?}", failure_report(failure, &root));
	}

	eprintln!(
		"\n{} {} of {} file(s) failed to parse.",
		colored!("error:", red),
		scan.failures.len(),
		scan.files.len()
	);
	process::exit(1);
}

/// Render a failure as a miette report that names the file, keeping the
/// code and help of the underlying error.
fn failure_report(failure: &DocumentFailure, root: &Path) -> miette::Report {
	let error = failure.error.inner();
	let mut diagnostic = miette::MietteDiagnostic::new(format!(
		"{}: {error}",
		make_relative(&failure.path, root)
	))
	.with_severity(miette::Severity::Error);

	if let Some(code) = error.code() {
		diagnostic = diagnostic.with_code(code.to_string());
	}
	if let Some(help) = error.help() {
		diagnostic = diagnostic.with_help(help.to_string());
	}

	miette::Report::new(diagnostic)
}
