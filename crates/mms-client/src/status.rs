//! HTTP status classification

/// User-facing message for a failed backend response.
///
/// A 500 whose body mentions `ENOTFOUND` is a proxy failing to resolve the
/// backend host, reported as a network problem rather than a server fault.
/// Unrecognized statuses (including 0, no response at all) are treated as
/// timeouts.
pub fn status_message(status: u16, body: &str) -> &'static str {
    match status {
        404 => "Not Found",
        500 if body.contains("ENOTFOUND") => "Network Error (Please check network)",
        500 => "Server Error",
        401 | 403 => "Permission Error",
        409 => "Conflict",
        400 => "Bad Request",
        410 => "Deleted",
        408 => "Timed Out",
        _ => "Timed Out (Please check network)",
    }
}
