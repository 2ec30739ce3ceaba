/// Where to send the browser after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextTarget {
    /// No redirect intent was supplied; use the default landing page.
    None,
    /// A same-origin relative path.
    Path(String),
}

/// The caller-supplied `next` value pointed off-site.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("refusing off-site redirect target {target:?}")]
pub struct OpenRedirect {
    pub target: String,
}

/// Classify a raw `next` value from the login flow.
///
/// The value is first normalized the way a browser address bar (and Python's
/// `urlsplit`) treats it: tab, CR and LF are dropped anywhere, leading C0
/// controls and spaces are trimmed. Classifying the raw bytes instead would
/// let `ht<TAB>tp://evil.com` through as a relative path. Only a path-only,
/// same-origin-relative reference is accepted: anything carrying a URL
/// scheme (`http:`, `mailto:`, ...) or a network location (protocol-relative
/// `//host/...`) is an open-redirect attempt and rejected. An empty value
/// means the caller had no redirect intent.
pub fn validate(raw: &str) -> Result<NextTarget, OpenRedirect> {
    let target = normalize(raw);
    if target.is_empty() {
        return Ok(NextTarget::None);
    }
    if leading_scheme(&target).is_some() || target.starts_with("//") {
        return Err(OpenRedirect {
            target: raw.to_string(),
        });
    }
    Ok(NextTarget::Path(target))
}

/// The view of `raw` a browser navigates on: ASCII tab and newlines removed
/// anywhere, leading C0 controls and spaces ignored.
fn normalize(raw: &str) -> String {
    raw.trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// The scheme prefix of `raw`, if it has one: a letter followed by
/// letters, digits, `+`, `-` or `.`, terminated by `:` before any other
/// delimiter can intervene.
fn leading_scheme(raw: &str) -> Option<&str> {
    let colon = raw.find(':')?;
    let prefix = &raw[..colon];
    let mut chars = prefix.chars();
    if !chars.next()?.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(prefix)
}
