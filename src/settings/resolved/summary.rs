use super::ResolvedConfig;

pub(super) fn print_summary(config: &ResolvedConfig) {
	println!("Effective configuration:");
	println!("  Records directory: {}", config.records_dir.display());
	println!("  Extensions: {}", config.extensions.join(", "));
	println!("  Storage: {}", storage_word(config));
	println!("  Downloads directory: {}", config.downloads_dir.display());
	println!("  MIME type: {}", config.mime_type);
	println!(
		"  Remove partial exports: {}",
		bool_to_word(config.remove_partial_on_failure)
	);
	println!("  Menu icons: {}", bool_to_word(config.show_menu_icons));
	println!(
		"  Prune selection on update: {}",
		bool_to_word(config.prune_selection_on_update)
	);
	println!("  Log level: {}", config.log_level);
}

fn storage_word(config: &ResolvedConfig) -> &'static str {
	match config.storage {
		fadrec::StorageAccess::Scoped => "scoped",
		fadrec::StorageAccess::Legacy => "legacy",
	}
}

fn bool_to_word(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}
