//! Rendering of call records into log lines
//!
//! Every record becomes one line:
//!
//! ```text
//! HH:MM:SS.mmm|KIND|DeclaringType|MethodName<body>
//! ```
//!
//! The body depends on the kind:
//!
//! | Kind | Body |
//! |------|------|
//! | `CALLED`, no declared params | `()` |
//! | `CALLED`, arity matches | `((Type)name=value, ...)` |
//! | `PROP` | `(value)` |
//! | `INFO`, `ERROR` | `((text))` |
//! | anything else | `(Type name, ...)` `\|` `(Type)=value; ...` or `none` |

use super::call_record::CallRecord;
use super::call_site::{Argument, Param};
use chrono::NaiveDateTime;

/// Timestamp layout of the line header
pub const HEADER_TIME_FORMAT: &str = "%H:%M:%S%.3f";

pub struct LineFormatter;

impl LineFormatter {
    /// Render a call record. Unresolved callers render with empty name fields.
    pub fn format(record: &CallRecord) -> String {
        let (class_name, method_name, params) = match record.caller() {
            Some(caller) => (
                caller.declaring_type.as_str(),
                caller.method_name.as_str(),
                caller.params.as_slice(),
            ),
            None => ("", "", &[][..]),
        };

        Self::build_line(
            record.timestamp(),
            record.kind().name(),
            class_name,
            method_name,
            params,
            record.arguments(),
        )
    }

    /// Build a line from its parts
    ///
    /// `kind` is upper-cased before the body is chosen, so `"called"` and
    /// `"Called"` take the same branch.
    pub fn build_line(
        timestamp: NaiveDateTime,
        kind: &str,
        class_name: &str,
        method_name: &str,
        params: &[Param],
        arguments: &[Argument],
    ) -> String {
        let kind = kind.to_uppercase();

        let body = match kind.as_str() {
            "CALLED" if params.is_empty() => "()".to_string(),
            "CALLED" if params.len() == arguments.len() => Self::build_called(params, arguments),
            "PROP" => Self::build_prop(arguments),
            "INFO" | "ERROR" => Self::build_info_error(arguments),
            _ => Self::build_other(params, arguments),
        };

        let mut line = Self::build_header(timestamp, &kind, class_name, method_name);
        line.push_str(&body);
        Self::sanitize(line)
    }

    fn build_header(
        timestamp: NaiveDateTime,
        kind: &str,
        class_name: &str,
        method_name: &str,
    ) -> String {
        format!(
            "{}|{}|{}|{}",
            timestamp.format(HEADER_TIME_FORMAT),
            kind,
            class_name,
            method_name
        )
    }

    fn build_called(params: &[Param], arguments: &[Argument]) -> String {
        let parts: Vec<String> = params
            .iter()
            .zip(arguments)
            .map(|(param, arg)| {
                if arg.value.is_empty() {
                    format!("({}){}", param.type_name, param.name)
                } else {
                    format!("({}){}={}", param.type_name, param.name, arg.value)
                }
            })
            .collect();

        format!("({})", parts.join(", "))
    }

    // arguments[0] is the property name and is not rendered
    fn build_prop(arguments: &[Argument]) -> String {
        let value = arguments.get(1).map(|a| a.value.as_str()).unwrap_or_default();
        format!("({})", value)
    }

    fn build_info_error(arguments: &[Argument]) -> String {
        let text = arguments.first().map(|a| a.value.as_str()).unwrap_or_default();
        format!("(({}))", text)
    }

    /// Generic dump: declared parameter types and names, then argument values
    fn build_other(params: &[Param], arguments: &[Argument]) -> String {
        let mut out = String::new();

        if !params.is_empty() {
            let declared: Vec<String> = params
                .iter()
                .map(|p| format!("{} {}", p.type_name, p.name))
                .collect();
            out.push('(');
            out.push_str(&declared.join(", "));
            out.push(')');
        }

        out.push('|');

        if arguments.is_empty() {
            out.push_str("none");
        } else {
            let values: Vec<String> = arguments
                .iter()
                .map(|a| format!("({})={}", a.type_name, a.value))
                .collect();
            out.push_str(&values.join("; "));
        }

        out
    }

    /// Escape line breaks and tabs so a record never spans more than one line
    fn sanitize(line: String) -> String {
        if !line.contains(['\n', '\r', '\t']) {
            return line;
        }
        line.replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::call_kind::CallKind;
    use crate::core::resolver::CallerMethod;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 2)
            .and_then(|d| d.and_hms_milli_opt(h, m, s, ms))
            .unwrap()
    }

    fn caller(params: Vec<Param>) -> Option<CallerMethod> {
        Some(CallerMethod::new("ClassName", "Foo", params))
    }

    #[test]
    fn test_called_with_matching_arity() {
        let record = CallRecord::new(
            CallKind::Called,
            at(3, 4, 5, 678),
            vec![
                Argument::new(&1),
                Argument::new("someString"),
                Argument::new(&true),
            ],
            caller(vec![
                Param::new("i32", "a"),
                Param::new("&str", "b"),
                Param::new("bool", "c"),
            ]),
        );

        assert_eq!(
            LineFormatter::format(&record),
            "03:04:05.678|CALLED|ClassName|Foo((i32)a=1, (&str)b=someString, (bool)c=true)"
        );
    }

    #[test]
    fn test_called_empty_value_omits_equals() {
        let record = CallRecord::new(
            CallKind::Called,
            at(3, 4, 5, 678),
            vec![Argument::new(""), Argument::new(&7)],
            caller(vec![Param::new("&str", "name"), Param::new("i32", "n")]),
        );

        assert_eq!(
            LineFormatter::format(&record),
            "03:04:05.678|CALLED|ClassName|Foo((&str)name, (i32)n=7)"
        );
    }

    #[test]
    fn test_called_without_params() {
        let record = CallRecord::new(
            CallKind::Called,
            at(3, 4, 5, 678),
            vec![Argument::new("someString")],
            caller(Vec::new()),
        );

        assert_eq!(
            LineFormatter::format(&record),
            "03:04:05.678|CALLED|ClassName|Foo()"
        );
    }

    #[test]
    fn test_called_arity_mismatch_falls_back() {
        let record = CallRecord::new(
            CallKind::Called,
            at(3, 4, 5, 678),
            vec![Argument::new(&1)],
            caller(vec![Param::new("i32", "a"), Param::new("i32", "b")]),
        );

        assert_eq!(
            LineFormatter::format(&record),
            "03:04:05.678|CALLED|ClassName|Foo(i32 a, i32 b)|(i32)=1"
        );
    }

    #[test]
    fn test_prop_renders_value_only() {
        let record = CallRecord::new(
            CallKind::Prop,
            at(1, 1, 1, 0),
            vec![Argument::new("score"), Argument::new(&42)],
            Some(CallerMethod::new("Player", "set_score", vec![Param::new("u32", "v")])),
        );

        assert_eq!(
            LineFormatter::format(&record),
            "01:01:01.000|PROP|Player|set_score(42)"
        );
    }

    #[test]
    fn test_info_and_error_double_wrap() {
        for (kind, name) in [(CallKind::Info, "INFO"), (CallKind::Error, "ERROR")] {
            let record = CallRecord::new(
                kind,
                at(12, 0, 0, 0),
                vec![Argument::new("disk full")],
                Some(CallerMethod::new("ClassName", "MethodName", Vec::new())),
            );

            assert_eq!(
                LineFormatter::format(&record),
                format!("12:00:00.000|{}|ClassName|MethodName((disk full))", name)
            );
        }
    }

    #[test]
    fn test_unresolved_caller_renders_empty_fields() {
        let record = CallRecord::new(
            CallKind::Info,
            at(12, 0, 0, 5),
            vec![Argument::new("x")],
            None,
        );

        assert_eq!(LineFormatter::format(&record), "12:00:00.005|INFO||((x))");

        let record = CallRecord::new(CallKind::Called, at(12, 0, 0, 5), Vec::new(), None);
        assert_eq!(LineFormatter::format(&record), "12:00:00.005|CALLED||()");
    }

    #[test]
    fn test_reserved_kind_uses_generic_dump() {
        let record = CallRecord::new(
            CallKind::Ended,
            at(23, 59, 59, 999),
            Vec::new(),
            caller(vec![Param::new("i32", "a")]),
        );
        assert_eq!(
            LineFormatter::format(&record),
            "23:59:59.999|ENDED|ClassName|Foo(i32 a)|none"
        );

        let record = CallRecord::new(
            CallKind::Ended,
            at(23, 59, 59, 999),
            vec![Argument::new(&1), Argument::new("two")],
            caller(Vec::new()),
        );
        assert_eq!(
            LineFormatter::format(&record),
            "23:59:59.999|ENDED|ClassName|Foo|(i32)=1; (str)=two"
        );
    }

    #[test]
    fn test_kind_dispatch_after_upper_casing() {
        let line = LineFormatter::build_line(
            at(0, 0, 0, 1),
            "info",
            "A",
            "b",
            &[],
            &[Argument::new("hi")],
        );
        assert_eq!(line, "00:00:00.001|INFO|A|b((hi))");

        let line = LineFormatter::build_line(at(0, 0, 0, 1), "Custom", "A", "b", &[], &[]);
        assert_eq!(line, "00:00:00.001|CUSTOM|A|b|none");
    }

    #[test]
    fn test_line_breaks_are_escaped() {
        let record = CallRecord::new(
            CallKind::Error,
            at(0, 0, 0, 0),
            vec![Argument::new("first\nsecond\tthird")],
            None,
        );

        let line = LineFormatter::format(&record);
        assert_eq!(line, "00:00:00.000|ERROR||((first\\nsecond\\tthird))");
        assert_eq!(line.lines().count(), 1);
    }
}
