//! Lexical path handling for resource paths and recorded source identifiers.
//!
//! None of these functions touch the file system.

/// Converts all backslashes to forward slashes.
fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Turns a generated file name as reported by the runtime into a path
/// relative to its resource, by stripping a leading `@<resource>/`.
pub fn resource_relative_path(path: &str) -> String {
    let path = match path.strip_prefix('@').and_then(|p| p.split_once('/')) {
        Some((_resource, rest)) => rest,
        None => path,
    };
    to_forward_slashes(path)
}

/// Resolves a `./` or `../` relative `path` against the directory of `base`.
pub fn resolve_relative_path(base: &str, path: &str) -> String {
    let mut components: Vec<&str> = match base.rfind('/') {
        Some(idx) => base[..idx].split('/').collect(),
        None => Vec::new(),
    };

    for part in path.split('/') {
        match part {
            "." => {}
            ".." => {
                components.pop();
            }
            part => components.push(part),
        }
    }

    components.join("/")
}

/// Cleans up a source path for display.
///
/// Separators are normalized, the first `/build/` segment is removed and a
/// trailing `generated_ext` is replaced with `original_ext`.
pub fn clean_source_path(path: &str, generated_ext: &str, original_ext: &str) -> String {
    let mut path = to_forward_slashes(path).replacen("/build/", "/", 1);

    if !generated_ext.is_empty() {
        if let Some(stem) = path.strip_suffix(generated_ext) {
            path = format!("{stem}{original_ext}");
        }
    }

    path
}

/// Turns a source identifier recorded in the map of `generated_file` into
/// the path that is displayed for it.
pub fn normalize_source_path(
    generated_file: &str,
    source: &str,
    generated_ext: &str,
    original_ext: &str,
) -> String {
    if source.starts_with("./") || source.starts_with("../") {
        let resolved = resolve_relative_path(generated_file, source);
        clean_source_path(&resolved, generated_ext, original_ext)
    } else {
        clean_source_path(source, generated_ext, original_ext)
    }
}
