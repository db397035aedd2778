//! Output folder and file naming

use super::SaveRequest;
use crate::constants::PDF_EXTENSION;
use crate::tokens::expand_filename;
use crate::types::OutputSpec;
use std::path::{Path, PathBuf};

/// Folder the outputs go to: `folder` plus the optional subfolder.
/// Trailing slashes are dropped; a blank subfolder name is ignored.
pub fn output_folder(folder: &Path, subfolder: Option<&str>) -> PathBuf {
    let base = folder.to_string_lossy();
    let trimmed = base.trim_end_matches('/');
    let mut path = if trimmed.is_empty() && base.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::from(trimmed)
    };

    if let Some(name) = subfolder
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
    {
        path.push(name);
    }
    path
}

/// `<expanded template>.pdf` for one output
pub fn output_file_name(request: &SaveRequest, spec: &OutputSpec) -> String {
    format!(
        "{}.{}",
        expand_filename(&request.template, spec.width_mm, spec.height_mm, request.date),
        PDF_EXTENSION
    )
}

/// One output file the save will produce
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOutput {
    pub spec: OutputSpec,
    pub file_name: String,
    pub path: PathBuf,
}

/// Name every output, in adjuster order. `destination` maps a file name to
/// the path it will be written to.
pub fn plan_outputs(
    request: &SaveRequest,
    destination: impl Fn(&Path, &str) -> PathBuf,
) -> Vec<PlannedOutput> {
    let folder = output_folder(&request.folder, request.subfolder.as_deref());
    request
        .outputs
        .iter()
        .map(|spec| {
            let file_name = output_file_name(request, spec);
            let path = destination(&folder, &file_name);
            PlannedOutput {
                spec: *spec,
                file_name,
                path,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_folder() {
        assert_eq!(
            output_folder(Path::new("/tmp/out//"), None),
            PathBuf::from("/tmp/out")
        );
        assert_eq!(
            output_folder(Path::new("/tmp/out/"), Some(" PDF/ ")),
            PathBuf::from("/tmp/out/PDF")
        );
        assert_eq!(
            output_folder(Path::new("/tmp/out"), Some("   ")),
            PathBuf::from("/tmp/out")
        );
        assert_eq!(output_folder(Path::new("/"), None), PathBuf::from("/"));
    }
}
