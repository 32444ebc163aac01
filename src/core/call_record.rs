//! Call record structure

use super::call_kind::CallKind;
use super::call_site::Argument;
use super::resolver::CallerMethod;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of one marker invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    kind: CallKind,
    timestamp: NaiveDateTime,
    arguments: Vec<Argument>,
    caller: Option<CallerMethod>,
}

impl CallRecord {
    pub fn new(
        kind: CallKind,
        timestamp: NaiveDateTime,
        arguments: Vec<Argument>,
        caller: Option<CallerMethod>,
    ) -> Self {
        Self {
            kind,
            timestamp,
            arguments,
            caller,
        }
    }

    pub fn kind(&self) -> CallKind {
        self.kind
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// `None` when the caller could not be resolved
    pub fn caller(&self) -> Option<&CallerMethod> {
        self.caller.as_ref()
    }
}
