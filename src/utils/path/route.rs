//! Link-target helpers.

/// Markdown document suffix.
pub const MD_SUFFIX: &str = ".md";

/// Check if a link target points off-site.
///
/// Anything starting with `http` (which covers `https`) or a
/// protocol-relative `//` counts as external.
#[inline]
pub fn is_external_target(target: &str) -> bool {
    target.starts_with("http") || target.starts_with("//")
}

/// Check if a link target looks like a reference to a local document.
#[inline]
pub fn is_local_doc_target(target: &str) -> bool {
    target.contains(MD_SUFFIX)
        || target.starts_with("./")
        || target.starts_with("../")
        || target.starts_with('/')
}

/// Split a link target into path and fragment parts
///
/// The fragment is an empty string if no `#` is found.
#[inline]
pub fn split_path_fragment(target: &str) -> (&str, &str) {
    target.split_once('#').unwrap_or((target, ""))
}

/// Strip a trailing `.md` suffix, if any.
#[inline]
pub fn strip_md_suffix(path: &str) -> &str {
    path.strip_suffix(MD_SUFFIX).unwrap_or(path)
}
