//! Repository zip archive extraction
//!
//! GitHub serves a zipball where every entry lives under a single
//! `<owner>-<repo>-<sha>/` directory. That prefix is stripped so paths are
//! relative to the repository root.

use crate::error::EngineError;
use crate::filter::FileFilter;
use crate::types::SourceFile;
use log::debug;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Extract every file in the scope of `filter`, sorted by path
///
/// Files the filter does not accept are still extracted, flagged as
/// non-candidates, so their references are counted.
pub fn extract_source_files(
    zip_data: &[u8],
    filter: &FileFilter,
) -> Result<Vec<SourceFile>, EngineError> {
    let mut archive = ZipArchive::new(Cursor::new(zip_data))?;
    let mut files = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let Some(path) = strip_archive_root(entry.name()).map(str::to_string) else {
            continue;
        };
        if !filter.in_scope(&path) {
            continue;
        }
        let candidate = filter.accepts(&path, entry.size());

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        match String::from_utf8(bytes) {
            Ok(content) => files.push(SourceFile {
                path,
                content,
                candidate,
            }),
            Err(_) => debug!("Skipping non UTF-8 file {}", path),
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(
        "Extracted {} files, {} may report dead code",
        files.len(),
        files.iter().filter(|f| f.candidate).count()
    );
    Ok(files)
}

fn strip_archive_root(name: &str) -> Option<&str> {
    let (_, rest) = name.split_once('/')?;
    (!rest.is_empty()).then_some(rest)
}
