// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;
use serde_json::{Map, Value};

use super::jmap_method;
use crate::modules::jmap::method::MethodName;

/// `Core/echo` returns its arguments unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CoreEchoArgs(pub Map<String, Value>);

jmap_method!(CoreEchoArgs, MethodName::CoreEcho, Map<String, Value>);
