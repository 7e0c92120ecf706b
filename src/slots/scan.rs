use std::fs;
use std::io;
use std::path::Path;

pub const PROMPT_FILE_PREFIX: &str = "prompts_";
pub const PROMPT_FILE_SUFFIX: &str = ".json";

/// Lists prompt bundles in `dir` matching the `prompts_*.json` naming
/// convention, in directory-listing order.
pub fn discover_prompt_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(PROMPT_FILE_PREFIX) && name.ends_with(PROMPT_FILE_SUFFIX) {
            files.push(name.to_string());
        }
    }
    Ok(files)
}

/// Derives a role label from a prompt file name: prefix and suffix stripped,
/// each underscore segment title-cased. `prompts_frontend_dev.json` becomes
/// `Frontend_Dev`.
pub fn role_from_file_name(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(PROMPT_FILE_SUFFIX)
        .unwrap_or(file_name);
    let raw = stem.strip_prefix(PROMPT_FILE_PREFIX).unwrap_or(stem);
    raw.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Template reference for a discovered file: the file name without its
/// extension, prefixed with `@`.
pub fn reference_from_file_name(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(PROMPT_FILE_SUFFIX)
        .unwrap_or(file_name);
    format!("@{stem}")
}
