//! Caller resolution
//!
//! Turns the compile-time path captured by a [`CallSite`] into the logical
//! calling method. Closures and async bodies show up as compiler-generated
//! continuation segments in that path; they are unwrapped so the enclosing
//! user function is reported instead.

use super::call_site::{CallSite, Param, MARKER_FN};
use serde::{Deserialize, Serialize};

/// Path segments generated for closures, coroutines and async bodies
pub const CONTINUATION_FRAMES: &[&str] = &[
    "{{closure}}",
    "{{async_block}}",
    "{{async_fn_body}}",
    "{{coroutine}}",
];

/// The resolved logical caller of a marker method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerMethod {
    pub declaring_type: String,
    pub method_name: String,
    pub params: Vec<Param>,
}

impl CallerMethod {
    pub fn new(
        declaring_type: impl Into<String>,
        method_name: impl Into<String>,
        params: Vec<Param>,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method_name: method_name.into(),
            params,
        }
    }
}

pub struct CallerResolver;

impl CallerResolver {
    /// Resolve a call site, or `None` when the caller cannot be determined
    pub fn resolve(site: CallSite) -> Option<CallerMethod> {
        let (declaring_type, method_name) = Self::resolve_path(site.path())?;
        Some(CallerMethod {
            declaring_type,
            method_name,
            params: site.into_params(),
        })
    }

    /// Resolve a raw path into `(declaring type, method name)`
    pub fn resolve_path(path: &str) -> Option<(String, String)> {
        let mut segments = split_segments(path)?;

        if segments.last() == Some(&MARKER_FN) {
            segments.pop();
        }
        while segments.last().is_some_and(|s| is_continuation_frame(s)) {
            segments.pop();
        }

        if segments.len() < 2 {
            return None;
        }
        let method = segments.pop()?;
        if method.starts_with("{{") {
            return None;
        }
        let declaring_type = declaring_type_name(segments.last()?)?;

        Some((declaring_type, method.to_string()))
    }
}

pub fn is_continuation_frame(segment: &str) -> bool {
    CONTINUATION_FRAMES.contains(&segment)
}

/// Split on `::` outside of angle brackets
fn split_segments(path: &str) -> Option<Vec<&str>> {
    if path.is_empty() {
        return None;
    }

    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            // `->` in fn pointer types is not a closing bracket
            b'>' if i == 0 || bytes[i - 1] != b'-' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    if depth != 0 {
        return None;
    }
    segments.push(&path[start..]);

    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments)
}

/// Reduce a type segment to a bare type name
///
/// `<app::Widget<T> as core::fmt::Display>` becomes `Widget`.
fn declaring_type_name(segment: &str) -> Option<String> {
    let qualified = match segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        Some(inner) => split_as(inner),
        None => segment,
    };
    let qualified = qualified
        .trim_start_matches('&')
        .trim_start_matches("mut ")
        .trim();

    let last = split_segments(qualified)?.pop()?;
    let name = match last.find('<') {
        Some(pos) => &last[..pos],
        None => last,
    };

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Self type of a `Type as Trait` qualified segment
fn split_as(inner: &str) -> &str {
    let mut depth: i32 = 0;
    for (i, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth -= 1,
            ' ' if depth == 0 && inner[i..].starts_with(" as ") => return &inner[..i],
            _ => {}
        }
    }
    inner
}
