//! Text rendering utilities for human-friendly error messages.
//!
//! Rust type names coming from [`std::any::type_name`] are long and noisy,
//! and registered names are easy to mistype. These helpers keep the
//! messages produced by `dim-container` short and actionable.

/// Strips module paths from a Rust type name, keeping generics intact.
///
/// ```
/// use dim_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("app::mail::Mailer"), "Mailer");
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<dyn app::log::Logger>"),
///     "Arc<dyn Logger>"
/// );
/// assert_eq!(
///     shorten_type_name("core::option::Option<(u8, alloc::string::String)>"),
///     "Option<(u8, String)>"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut out = String::with_capacity(full_name.len());
    let mut segment_start = 0;

    for (i, ch) in full_name.char_indices() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            continue;
        }
        out.push_str(last_segment(&full_name[segment_start..i]));
        out.push(ch);
        segment_start = i + ch.len_utf8();
    }
    out.push_str(last_segment(&full_name[segment_start..]));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Picks the registered names closest to `requested`, best first.
///
/// Matching is case-insensitive and ignores module paths. A candidate
/// qualifies when one name contains the other, or when their edit
/// distance is small relative to the requested name's length.
///
/// ```
/// use dim_support::rendering::suggest_similar;
///
/// let known = ["Mailer", "Transport", "Logger"];
/// assert_eq!(suggest_similar("Mialer", &known, 3), vec!["Mailer".to_string()]);
/// assert!(suggest_similar("Database", &known, 3).is_empty());
/// ```
pub fn suggest_similar<S: AsRef<str>>(
    requested: &str,
    available: &[S],
    max_suggestions: usize,
) -> Vec<String> {
    let wanted = shorten_type_name(requested).to_lowercase();
    if wanted.is_empty() {
        return Vec::new();
    }
    let budget = (wanted.chars().count() / 3).max(1);

    let mut scored: Vec<(usize, &str)> = available
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|name| {
            let candidate = shorten_type_name(name).to_lowercase();
            if candidate == wanted {
                return Some((0, name));
            }
            if candidate.contains(&wanted) || wanted.contains(&candidate) {
                return Some((1, name));
            }
            let distance = strsim::levenshtein(&candidate, &wanted);
            (distance <= budget).then_some((distance + 1, name))
        })
        .collect();

    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(_, name)| name.to_string())
        .collect()
}
