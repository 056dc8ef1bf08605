//! URL to filename sanitization
//!
//! Downloaded documents are named after the last path segment of their URL,
//! reduced to `[a-z0-9_]` plus the original extension.

/// Derives a filesystem-safe filename from a URL
///
/// # Steps
///
/// 1. Lowercase the whole URL
/// 2. Keep only the final path segment (trailing slashes are ignored)
/// 3. Record that segment's extension (last `.` onward, dot included)
/// 4. Replace every character outside `[a-z0-9]` with `_`
/// 5. Collapse runs of `_` and trim them from both ends
/// 6. Drop the `_<ext>` marker left where the extension dot used to be
/// 7. Append the recorded extension if the name no longer carries it
///
/// A segment without an extension is sanitized with no suffix added.
///
/// # Examples
///
/// ```
/// use pdf_gather::url::url_to_filename;
///
/// assert_eq!(
///     url_to_filename("https://Example.com/Docs/Manual_V2.PDF"),
///     "manual_v2.pdf"
/// );
/// assert_eq!(url_to_filename("https://example.com/docs/README"), "readme");
/// ```
pub fn url_to_filename(raw_url: &str) -> String {
    let lower = raw_url.to_lowercase();
    let segment = final_segment(&lower);
    let extension = file_extension(segment);

    let mut safe = collapse_underscores(&replace_non_alphanumeric(segment));

    let marker_stem = replace_non_alphanumeric(extension.trim_start_matches('.'));
    let marker_stem = collapse_underscores(&marker_stem);
    if !marker_stem.is_empty() {
        let marker = format!("_{}", marker_stem);
        if let Some(stripped) = safe.strip_suffix(&marker) {
            safe = stripped.to_string();
        }
    }

    if file_extension(&safe) != extension {
        safe.push_str(extension);
    }

    safe
}

/// Returns the text after the last `/`, ignoring trailing slashes
fn final_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Returns the extension of a name, including the leading dot, or "" if none
fn file_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

fn replace_non_alphanumeric(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn collapse_underscores(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_underscore = false;

    for c in input.chars() {
        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    out.trim_matches('_').to_string()
}
