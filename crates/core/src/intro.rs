//! "Seen the intro popup" preference.
//!
//! The only value that survives between visits. It is kept client-side as
//! a long-lived cookie; the server only reads and sets it.

/// Cookie carrying the flag.
pub const INTRO_COOKIE_NAME: &str = "invitewiz_intro_seen";

/// One year, in seconds.
pub const INTRO_COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Whether a `Cookie` header value says the intro has been seen.
pub fn intro_seen(cookie_header: Option<&str>) -> bool {
    cookie_header
        .into_iter()
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name.trim() == INTRO_COOKIE_NAME && value.trim() == "1")
}

/// `Set-Cookie` value that records the intro as seen.
pub fn intro_seen_cookie() -> String {
    format!(
        "{INTRO_COOKIE_NAME}=1; Max-Age={INTRO_COOKIE_MAX_AGE_SECS}; Path=/; SameSite=Lax"
    )
}
