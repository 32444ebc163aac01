//! Call-site capture
//!
//! A [`CallSite`] is captured at the point a marker method is invoked. It
//! holds the compile-time path of a marker function declared inside the
//! calling function, so no stack walking is needed at runtime.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Name of the marker function the `call_site!` macro declares
pub const MARKER_FN: &str = "__callsite";

/// Type name of any value, used by the capture macros on a nested fn item
#[doc(hidden)]
pub fn type_name_of<T>(_: T) -> &'static str {
    std::any::type_name::<T>()
}

/// Shorten a fully qualified type name to its last path segments
///
/// Generic arguments, references, tuples and slices are shortened
/// recursively: `core::option::Option<alloc::string::String>` becomes
/// `Option<String>`.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut token = String::new();
    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            token.push(ch);
        } else {
            push_last_segment(&mut out, &token);
            token.clear();
            out.push(ch);
        }
    }
    push_last_segment(&mut out, &token);
    out
}

fn push_last_segment(out: &mut String, token: &str) {
    if let Some(last) = token.rsplit("::").next() {
        out.push_str(last);
    }
}

/// One declared parameter of the calling method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub type_name: String,
    pub name: String,
}

impl Param {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// Describe a parameter from a borrowed binding
    pub fn of<T: ?Sized>(name: &str, _value: &T) -> Self {
        Self::new(short_type_name(std::any::type_name::<T>()), name)
    }
}

/// An opaque argument value, stringified when it is captured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub type_name: String,
    pub value: String,
}

impl Argument {
    pub fn new<T: Display + ?Sized>(value: &T) -> Self {
        Self {
            type_name: short_type_name(std::any::type_name::<T>()),
            value: value.to_string(),
        }
    }

    /// Build an argument from already rendered parts
    pub fn raw(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
        }
    }
}

/// Where a marker method was invoked from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallSite {
    path: &'static str,
    params: Vec<Param>,
}

impl CallSite {
    /// `path` is normally the type name of a nested marker fn
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            params: Vec::new(),
        }
    }

    /// A call site that cannot be resolved
    pub fn unknown() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub(crate) fn into_params(self) -> Vec<Param> {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("i32"), "i32");
        assert_eq!(short_type_name("alloc::string::String"), "String");
        assert_eq!(short_type_name("&str"), "&str");
        assert_eq!(
            short_type_name("core::option::Option<alloc::string::String>"),
            "Option<String>"
        );
        assert_eq!(
            short_type_name("(i32, &alloc::vec::Vec<u8>)"),
            "(i32, &Vec<u8>)"
        );
        assert_eq!(short_type_name("dyn core::fmt::Display"), "dyn Display");
    }

    #[test]
    fn test_argument_captures_type_and_value() {
        let arg = Argument::new(&42);
        assert_eq!(arg.type_name, "i32");
        assert_eq!(arg.value, "42");

        let text = String::from("someString");
        let arg = Argument::new(&text);
        assert_eq!(arg.type_name, "String");
        assert_eq!(arg.value, "someString");

        let arg = Argument::new("borrowed");
        assert_eq!(arg.type_name, "str");
    }

    #[test]
    fn test_param_of_binding() {
        let flag = true;
        assert_eq!(Param::of("flag", &flag), Param::new("bool", "flag"));
    }

    #[test]
    fn test_marker_path_points_inside_function() {
        fn __callsite() {}
        let path = type_name_of(__callsite);
        assert!(path.ends_with("test_marker_path_points_inside_function::__callsite"));
    }
}
