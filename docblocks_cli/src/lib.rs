use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Find named documentation blocks in markdown files.",
	long_about = "docblocks collects `{% docs name %}` ... `{% enddocs %}` blocks from the markdown \
	              files of a project and indexes them by package and name.\n\nText between `{% \
	              raw %}` and `{% endraw %}` is kept literally, so blocks can document the tag \
	              syntax itself.\n\nQuick start:\n  docblocks list   List every block\n  \
	              docblocks show   Print the contents of one block\n  docblocks check  Fail \
	              when any file has malformed or duplicate blocks"
)]
pub struct DocblocksCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Parse files one at a time instead of on a thread pool.
	#[arg(long, global = true, default_value_t = false)]
	pub no_parallel: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// List every documentation block in the project.
	///
	/// Blocks are sorted by package, then name. Files that fail to parse are
	/// reported as warnings and contribute no blocks.
	List {
		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print the contents of one documentation block.
	///
	/// Exits with status 1 when no block has the given name.
	Show {
		/// The block name, as written in `{% docs name %}`.
		name: String,

		/// Prefer the block from this package when several packages define
		/// the same name.
		#[arg(long)]
		package: Option<String>,
	},
	/// Verify that every documentation file parses.
	///
	/// Prints a diagnostic for each unbalanced, nested, malformed or
	/// duplicate block and exits with status 1 when there are any.
	Check,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
