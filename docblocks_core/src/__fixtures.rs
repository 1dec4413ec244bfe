use crate::Document;
use crate::SourcePath;

pub const ROOT_PATH: &str = "/test_root";
pub const SUBDIR_PATH: &str = "/test_root/test_subdir";
pub const TESTFILE_PATH: &str = "/test_root/test_subdir/test_file.md";
pub const PACKAGE_NAME: &str = "some_package";

pub const SNOWPLOW_SESSIONS_DOCS: &str = r"
This table contains one record for every session recorded by Snowplow.
A session is itself comprised of pageviews that all occur within 30 minutes
of each other. If more than 30 minutes elapse between pageviews, then a
new session is created. Given the following pageviews:

| session_id | page_view_id | page_title |
| ---------- | ------------ | ---------- |
| abc        | 123          | Home       |
| abc        | 456          | About      |
| abc        | 789          | Home       |

The following sessions will be created:

| session_id | first_page_title | count_pageviews |
| ---------- | ---------------- | --------------- |
| abc        | 123              | 2               |
| abc        | 789              | 1               |
";

pub const SNOWPLOW_SESSIONS_SESSION_ID_DOCS: &str = r"
This column is the unique identifier for a Snowplow session. It is generated by
a cookie then expires after 30 minutes of inactivity.
";

pub const MULTIPLE_RAW_BLOCKS: &str = r"
{% docs some_doc %}
{% raw %}
    ```
    {% docs %}some doc{% enddocs %}
    ```
{% endraw %}
{% enddocs %}

{% docs other_doc %}
{% raw %}
    ```
    {% docs %}other doc{% enddocs %}
    ```
{% endraw %}
{% enddocs %}
";

pub fn snowplow_sessions_block() -> String {
	format!("{{% docs snowplow_sessions %}}\n{SNOWPLOW_SESSIONS_DOCS}\n{{% enddocs %}}")
}

pub fn snowplow_sessions_session_id_block() -> String {
	format!(
		"{{% docs snowplow_sessions__session_id %}}\n{SNOWPLOW_SESSIONS_SESSION_ID_DOCS}\n{{% \
		 enddocs %}}"
	)
}

pub fn test_documentation_file() -> String {
	format!(
		"\n{}\n\n{}\n",
		snowplow_sessions_block(),
		snowplow_sessions_session_id_block()
	)
}

pub fn build_document(contents: &str, relative_path: &str) -> Document {
	Document::new(
		SourcePath::new(ROOT_PATH, SUBDIR_PATH, relative_path),
		PACKAGE_NAME,
		contents,
	)
}

pub fn build_package_document(contents: &str, package: &str, relative_path: &str) -> Document {
	Document::new(
		SourcePath::new(ROOT_PATH, SUBDIR_PATH, relative_path),
		package,
		contents,
	)
}
