use std::path::Path;

use assert_cmd::Command;
use docblocks_core::AnyEmptyResult;

pub fn docblocks_cmd() -> Command {
	let mut cmd = Command::cargo_bin("docblocks")
		.unwrap_or_else(|e| panic!("docblocks binary should be built: {e}"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

pub fn write_file(root: &Path, relative: &str, contents: &str) -> AnyEmptyResult {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, contents)?;

	Ok(())
}

/// A project with two blocks in `models/sessions.md`.
#[allow(dead_code)]
pub fn write_snowplow_project(root: &Path) -> AnyEmptyResult {
	write_file(
		root,
		"docblocks.toml",
		"name = \"snowplow\"\ndocs_paths = [\"models\"]\n",
	)?;
	write_file(
		root,
		"models/sessions.md",
		"# Sessions\n\n{% docs snowplow_sessions %}\nOne record per session.\n{% enddocs \
		 %}\n\n{% docs snowplow_sessions__session_id %}\nThe unique session id.\n{% enddocs %}\n",
	)?;

	Ok(())
}
