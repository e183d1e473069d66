use std::cmp::Ordering;

use percent_encoding::percent_decode_str;

use crate::error::{Result, SiteError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    File,
    Folder,
}

/// A file or folder name, split into what the site needs from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub title: String,
    pub route_segment: String,
    pub ordinal: Option<u32>,
}

impl Segment {
    /// Sibling order: explicit ordinals first, ascending, then unordered
    /// entries; ties fall back to the route segment.
    pub fn cmp_order(&self, other: &Segment) -> Ordering {
        order(self.ordinal, &self.route_segment, other.ordinal, &other.route_segment)
    }
}

pub(crate) fn order(a_ord: Option<u32>, a_seg: &str, b_ord: Option<u32>, b_seg: &str) -> Ordering {
    let rank = |o: Option<u32>| o.map_or((1, 0), |n| (0, n));
    rank(a_ord)
        .cmp(&rank(b_ord))
        .then_with(|| a_seg.cmp(b_seg))
}

/// Normalize one raw path segment.
///
/// - Percent-decodes the name
/// - Strips the extension (files only)
/// - Splits off a `NN.` ordinal prefix
/// - Derives a lowercase, hyphenated route segment and a display title
///
/// # Examples
///
/// ```
/// use sitetree_core::{normalize_segment, SegmentKind};
///
/// let seg = normalize_segment("03. Special Types (Map, Set, WeakMap, WeakSet).md", SegmentKind::File).unwrap();
/// assert_eq!(seg.route_segment, "special-types-map-set-weakmap-weakset");
/// assert_eq!(seg.title, "Special Types (Map, Set, WeakMap, WeakSet)");
/// assert_eq!(seg.ordinal, Some(3));
///
/// let seg = normalize_segment("getting_started", SegmentKind::Folder).unwrap();
/// assert_eq!(seg.route_segment, "getting-started");
/// assert_eq!(seg.title, "getting started");
/// assert_eq!(seg.ordinal, None);
///
/// assert!(normalize_segment("!!!.md", SegmentKind::File).is_err());
/// ```
pub fn normalize_segment(raw: &str, kind: SegmentKind) -> Result<Segment> {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    let decoded: &str = &decoded;

    let stem = match kind {
        SegmentKind::File => strip_extension(decoded),
        SegmentKind::Folder => decoded,
    };

    let (ordinal, base) = split_ordinal(stem);

    let title = display_title(base);
    let route_segment = slugify(base);

    if title.is_empty() || route_segment.is_empty() {
        return Err(SiteError::InvalidSegment {
            segment: raw.to_string(),
        });
    }

    Ok(Segment {
        title,
        route_segment,
        ordinal,
    })
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    }
}

/// `^(\d+)\.\s*(.+)$`
fn split_ordinal(name: &str) -> (Option<u32>, &str) {
    let digits = name.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return (None, name);
    }

    let Some(rest) = name[digits..].strip_prefix('.') else {
        return (None, name);
    };
    if rest.is_empty() {
        return (None, name);
    }

    match name[..digits].parse::<u32>() {
        Ok(n) => (Some(n), rest.trim_start()),
        Err(_) => (None, name),
    }
}

fn display_title(base: &str) -> String {
    base.chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

fn slugify(base: &str) -> String {
    let mut slug = String::with_capacity(base.len());
    let mut pending_hyphen = false;

    for c in base.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
