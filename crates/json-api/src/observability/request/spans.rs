//! Route labels for spans and metrics.

use uuid::Uuid;

/// Collapse identifier segments so labels stay low-cardinality.
pub(super) fn route_label(path: &str) -> String {
    let segments = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>();

    format!("/{}", segments.join("/"))
}
