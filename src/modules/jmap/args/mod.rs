// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::method::MethodName;

pub mod core;
pub mod email;
pub mod mailbox;
pub mod submission;

/// `/set` patch object: JSON-pointer-like property paths mapped to new values
/// (`null` removes the entry).
pub type PatchObject = Map<String, Value>;

/// Argument shape of one JMAP method. The builder only accepts arguments through this
/// trait, so a method can never be called with another method's shape.
pub trait MethodArguments: Serialize {
    const METHOD: MethodName;
    type Response: DeserializeOwned;
}

/// Arguments of a `*/query` method: its result exposes `/ids`.
pub trait QueryMethod: MethodArguments {}

/// Arguments of a `*/get` method: it accepts an `ids` argument.
pub trait GetMethod: MethodArguments {}

macro_rules! jmap_method {
    ($args:ty, $method:expr, $response:ty) => {
        impl $crate::modules::jmap::args::MethodArguments for $args {
            const METHOD: $crate::modules::jmap::method::MethodName = $method;
            type Response = $response;
        }
    };
    ($args:ty, $method:expr, $response:ty, query) => {
        $crate::modules::jmap::args::jmap_method!($args, $method, $response);
        impl $crate::modules::jmap::args::QueryMethod for $args {}
    };
    ($args:ty, $method:expr, $response:ty, get) => {
        $crate::modules::jmap::args::jmap_method!($args, $method, $response);
        impl $crate::modules::jmap::args::GetMethod for $args {}
    };
}

pub(crate) use jmap_method;
