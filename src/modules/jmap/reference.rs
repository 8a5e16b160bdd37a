// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::method::MethodName;

/// Prefix that marks an argument key as a back-reference.
pub const REFERENCE_PREFIX: char = '#';

/// Server-side substitution of `path` inside the result of call `result_of`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultReference {
    #[serde(rename = "resultOf")]
    pub result_of: String,
    pub name: MethodName,
    pub path: String,
}

impl ResultReference {
    pub fn new(result_of: impl Into<String>, name: MethodName, path: impl Into<String>) -> Self {
        Self {
            result_of: result_of.into(),
            name,
            path: path.into(),
        }
    }

    /// The argument key under which a reference to `arg_key` is stored.
    pub fn key_for(arg_key: &str) -> String {
        format!("{}{}", REFERENCE_PREFIX, arg_key)
    }
}

impl Display for ResultReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ resultOf: {}, name: {}, path: {} }}",
            self.result_of, self.name, self.path
        )
    }
}
