//! Response body classification.
//!
//! The upstream reports its own status inside the body rather than via the HTTP
//! status line, so success/failure is decided by a substring check.

/// Literal marker the upstream embeds in a body when it rejected the request.
pub const FAILURE_MARKER: &str = "\"success\":0";

/// Returns true if the body reports a failed request.
///
/// Only the presence of the marker counts. An empty or garbled body classifies
/// as success; a call that never completed is signaled at the transport layer,
/// never here.
pub fn is_failure(body: &str) -> bool {
    body.contains(FAILURE_MARKER)
}
