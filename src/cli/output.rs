use anyhow::Result;
use fadrec::RenderSpec;
use serde_json::json;

use crate::workflow::Report;

/// Format rows as a pretty-printed JSON array.
pub(crate) fn format_rows_json(rows: &[RenderSpec]) -> Result<String> {
	let payload: Vec<_> = rows
		.iter()
		.enumerate()
		.map(|(index, row)| {
			json!({
				"index": index,
				"file_name": row.file_name,
				"path": row.handle.path(),
				"selected": row.selected,
			})
		})
		.collect();

	Ok(serde_json::to_string_pretty(&payload)?)
}

fn print_rows_plain(rows: &[RenderSpec]) {
	if rows.is_empty() {
		println!("No recordings");
		return;
	}
	for (index, row) in rows.iter().enumerate() {
		println!("{index:>3}  {}  {}", row.file_name, row.handle);
	}
}

/// Print a command report; failures go to stderr.
pub(crate) fn print_report(report: &Report) -> Result<()> {
	match report {
		Report::Rows { rows, json: true } => println!("{}", format_rows_json(rows)?),
		Report::Rows { rows, json: false } => print_rows_plain(rows),
		Report::Notices { notices, missing } => {
			for notice in notices {
				if notice.is_failure() {
					eprintln!("{notice}");
				} else {
					println!("{notice}");
				}
			}
			print_missing(missing);
		}
		Report::Confirm {
			prompt,
			names,
			missing,
		} => {
			println!("{}", prompt.title);
			println!("{}", prompt.message);
			for name in names {
				println!("  {name}");
			}
			println!(
				"Re-run with --yes to {}, or leave it to {}.",
				prompt.confirm_label.to_lowercase(),
				prompt.cancel_label.to_lowercase()
			);
			print_missing(missing);
		}
	}
	Ok(())
}

fn print_missing(missing: &[String]) {
	for name in missing {
		eprintln!("No recording named {name}");
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use fadrec::RecordHandle;
	use fadrec::presenter::{PLACEHOLDER_THUMBNAIL, ThumbnailRequest};
	use serde_json::Value;

	use super::*;

	fn row(path: &str, selected: bool) -> RenderSpec {
		let handle = RecordHandle::new(path).unwrap();
		RenderSpec {
			file_name: handle.file_name().into_owned(),
			selected,
			thumbnail: ThumbnailRequest {
				path: PathBuf::from(path),
				placeholder: PLACEHOLDER_THUMBNAIL,
			},
			handle,
		}
	}

	#[test]
	fn json_rows_carry_index_and_selection() {
		let rows = vec![row("/v/a.mp4", false), row("/v/b.mp4", true)];

		let json = format_rows_json(&rows).unwrap();
		let value: Value = serde_json::from_str(&json).unwrap();

		assert_eq!(value[1]["index"], 1);
		assert_eq!(value[1]["file_name"], "b.mp4");
		assert_eq!(value[1]["path"], "/v/b.mp4");
		assert_eq!(value[1]["selected"], true);
		assert_eq!(value[0]["selected"], false);
	}
}
