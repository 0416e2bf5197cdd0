use std::collections::HashSet;
use std::env;
use std::io;
use std::path::PathBuf;

/// Lower-case, strip leading dots and drop duplicate or empty extensions.
pub(super) fn sanitize_extensions(values: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();
	values
		.into_iter()
		.map(|value| value.trim().trim_start_matches('.').to_ascii_lowercase())
		.filter(|value| !value.is_empty() && seen.insert(value.clone()))
		.collect()
}

/// Anchor a relative path at the working directory.
pub(super) fn absolutize(path: PathBuf) -> io::Result<PathBuf> {
	if path.is_absolute() {
		Ok(path)
	} else {
		Ok(env::current_dir()?.join(path))
	}
}
