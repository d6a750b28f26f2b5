//! Reference grouping and asset identity resolution
//!
//! Turns discovered reference sites into groups keyed by normalized
//! absolute path. Resolution is purely lexical; the filesystem is never
//! touched here, so `..` crosses symlinks by name, which is the
//! deterministic behavior the cache key needs.

use crate::error::PathResolutionError;
use crate::types::{AssetId, ReferenceGroups, ReferenceSite};
use std::path::{Component, Path, PathBuf};

/// Group reference sites by the asset identity they resolve to
///
/// Groups keep discovery order, both across identities (first sighting)
/// and within one identity's site list.
///
/// # Errors
/// [`PathResolutionError`] when `base_dir` is `None`; without the
/// document's own location, relative targets cannot be resolved and the
/// whole document is skipped.
pub fn group_references(
    sites: Vec<ReferenceSite>,
    base_dir: Option<&Path>,
) -> Result<ReferenceGroups, PathResolutionError> {
    let base_dir = base_dir.ok_or(PathResolutionError)?;

    let mut groups = ReferenceGroups::new();
    for site in sites {
        let id = resolve_target(&site.target, base_dir);
        groups.entry(id).or_default().push(site);
    }
    Ok(groups)
}

/// Resolve a target path against the document's base directory
#[must_use]
pub fn resolve_target(target: &str, base_dir: &Path) -> AssetId {
    let target_path = Path::new(target);
    let joined = if target_path.is_absolute() {
        target_path.to_path_buf()
    } else {
        base_dir.join(target_path)
    };
    AssetId::new(normalize(&joined).to_string_lossy().into_owned())
}

/// Lexical normalization: drop `.`, fold `..` into its parent
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays at the root; only a
                // relative prefix keeps leading `..` segments
                if !out.pop() && !out.has_root() {
                    out.push(component.as_os_str());
                }
            }
            Component::RootDir | Component::Prefix(_) | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
        }
    }
    out
}
