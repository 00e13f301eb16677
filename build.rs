fn main() {
    // Build-time information (version, git hash etc.) used in run metadata
    built::write_built_file().expect("Failed to acquire build-time information");
}
