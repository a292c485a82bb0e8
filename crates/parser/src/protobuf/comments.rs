//! Comment lookup from `SourceCodeInfo`

use prost_reflect::DescriptorPool;
use std::collections::HashMap;

/// Comments of every file in a pool, keyed by file name and descriptor path
#[derive(Debug, Default)]
pub struct CommentIndex {
    files: HashMap<String, HashMap<Vec<i32>, String>>,
}

impl CommentIndex {
    pub fn new(pool: &DescriptorPool) -> Self {
        let mut files = HashMap::new();

        for file in pool.files() {
            let Some(info) = file.file_descriptor_proto().source_code_info.as_ref() else {
                continue;
            };

            let mut locations = HashMap::new();
            for location in &info.location {
                let text = location
                    .leading_comments
                    .as_deref()
                    .or(location.trailing_comments.as_deref());
                if let Some(comment) = text.and_then(normalize_comment) {
                    locations.entry(location.path.clone()).or_insert(comment);
                }
            }

            if !locations.is_empty() {
                files.insert(file.name().to_string(), locations);
            }
        }

        Self { files }
    }

    pub fn get(&self, file_name: &str, path: &[i32]) -> Option<String> {
        self.files.get(file_name)?.get(path).cloned()
    }
}

/// Trim comment markers and blank lines; `None` when nothing is left
fn normalize_comment(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw
        .lines()
        .map(|line| line.trim())
        .map(|line| line.strip_prefix('*').map(str::trim_start).unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
