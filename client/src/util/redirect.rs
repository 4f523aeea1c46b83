//! Post-login redirect resolution.
//!
//! The appliance appends `redirurl` (the page the user originally asked for)
//! to the portal URL. It is untrusted: only targets that parse as http(s)
//! URLs are followed; everything else degrades to reloading the portal.

use url::Url;

/// Query parameter carrying the original destination.
pub const REDIRECT_PARAM: &str = "redirurl";

/// Appended to the destination so it knows a portal login just completed and
/// connectivity should be re-checked.
pub const REFRESH_PARAM: &str = "refresh";

fn has_http_scheme(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Parse a raw `redirurl` value. Scheme-less values are taken as https.
#[must_use]
pub fn resolve_redirect_target(raw: Option<&str>) -> Option<Url> {
    let raw = raw.filter(|r| !r.is_empty())?;
    let candidate = if has_http_scheme(raw) { raw.to_owned() } else { format!("https://{raw}") };
    Url::parse(&candidate).ok()
}

/// Final navigation URL: optionally upgraded to https, with an empty
/// `refresh` parameter set (replacing any existing one in place).
#[must_use]
pub fn prepare_redirect(mut target: Url, prefer_https: bool) -> Url {
    if prefer_https && target.scheme() == "http" {
        // http -> https is always a permitted scheme change.
        let _ = target.set_scheme("https");
    }

    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut replaced = false;
    for (key, value) in target.query_pairs().into_owned() {
        if key == REFRESH_PARAM {
            if !replaced {
                pairs.push((key, String::new()));
                replaced = true;
            }
        } else {
            pairs.push((key, value));
        }
    }
    if !replaced {
        pairs.push((REFRESH_PARAM.to_owned(), String::new()));
    }

    target.query_pairs_mut().clear().extend_pairs(pairs);
    target
}

/// `resolve_redirect_target` + `prepare_redirect`. `None` means "reload the
/// portal page instead".
#[must_use]
pub fn redirect_url(raw: Option<&str>, prefer_https: bool) -> Option<Url> {
    resolve_redirect_target(raw).map(|target| prepare_redirect(target, prefer_https))
}

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;
