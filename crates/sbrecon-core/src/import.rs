//! Identifiers used to bring an existing endpoint under management.

use std::fmt;
use std::str::FromStr;

use crate::error::ReconcileError;

/// `<topic_name>,<endpoint_name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    pub topic_name: String,
    pub endpoint_name: String,
}

impl ImportId {
    pub fn parse(id: &str) -> Result<Self, ReconcileError> {
        let invalid = |reason: &str| ReconcileError::InvalidImportId {
            id: id.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = id.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [topic, endpoint] if !topic.is_empty() && !endpoint.is_empty() => Ok(Self {
                topic_name: topic.to_string(),
                endpoint_name: endpoint.to_string(),
            }),
            [_, _] => Err(invalid("topic and endpoint names must not be empty")),
            _ => Err(invalid("expected format <topic_name>,<endpoint_name>")),
        }
    }
}

impl FromStr for ImportId {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.topic_name, self.endpoint_name)
    }
}
