//! Event kinds produced by the marker methods

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallKind {
    /// A property changed; arguments are `[property name, new value]`
    Prop,
    /// A method was entered; arguments are the method's argument values
    Called,
    /// Free-form information text
    Info,
    /// Free-form error text
    Error,
    /// Reserved. No marker method produces it; it renders through the
    /// generic fallback.
    Ended,
}

impl CallKind {
    /// The kind name as the marker method spells it
    pub fn name(&self) -> &'static str {
        match self {
            CallKind::Prop => "Prop",
            CallKind::Called => "Called",
            CallKind::Info => "Info",
            CallKind::Error => "Error",
            CallKind::Ended => "Ended",
        }
    }

    /// Upper-cased name used in the rendered header
    pub fn to_str(&self) -> &'static str {
        match self {
            CallKind::Prop => "PROP",
            CallKind::Called => "CALLED",
            CallKind::Info => "INFO",
            CallKind::Error => "ERROR",
            CallKind::Ended => "ENDED",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            CallKind::Prop => Cyan,
            CallKind::Called => Blue,
            CallKind::Info => Green,
            CallKind::Error => Red,
            CallKind::Ended => BrightBlack,
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for CallKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PROP" => Ok(CallKind::Prop),
            "CALLED" => Ok(CallKind::Called),
            "INFO" => Ok(CallKind::Info),
            "ERROR" => Ok(CallKind::Error),
            "ENDED" => Ok(CallKind::Ended),
            _ => Err(format!("Invalid call kind: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("called".parse::<CallKind>(), Ok(CallKind::Called));
        assert_eq!("Prop".parse::<CallKind>(), Ok(CallKind::Prop));
        assert_eq!("ERROR".parse::<CallKind>(), Ok(CallKind::Error));
        assert!("warn".parse::<CallKind>().is_err());
    }

    #[test]
    fn test_name_and_header_form() {
        assert_eq!(CallKind::Info.name(), "Info");
        assert_eq!(CallKind::Info.to_string(), "INFO");
        assert_eq!(CallKind::Ended.name().to_uppercase(), CallKind::Ended.to_str());
    }
}
