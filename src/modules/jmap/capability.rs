// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "urn:ietf:params:jmap:core")]
    Core,
    #[serde(rename = "urn:ietf:params:jmap:mail")]
    Mail,
    #[serde(rename = "urn:ietf:params:jmap:submission")]
    Submission,
    #[serde(rename = "urn:ietf:params:jmap:vacationresponse")]
    VacationResponse,
    #[serde(rename = "urn:ietf:params:jmap:contacts")]
    Contacts,
    #[serde(rename = "urn:ietf:params:jmap:calendars")]
    Calendars,
    #[serde(rename = "urn:ietf:params:jmap:blob")]
    Blob,
    #[serde(rename = "urn:ietf:params:jmap:quota")]
    Quota,
}

impl Capability {
    /// Capabilities every batch declares unless told otherwise.
    pub const BASELINE: [Capability; 2] = [Capability::Core, Capability::Mail];

    pub fn urn(&self) -> &'static str {
        match self {
            Capability::Core => "urn:ietf:params:jmap:core",
            Capability::Mail => "urn:ietf:params:jmap:mail",
            Capability::Submission => "urn:ietf:params:jmap:submission",
            Capability::VacationResponse => "urn:ietf:params:jmap:vacationresponse",
            Capability::Contacts => "urn:ietf:params:jmap:contacts",
            Capability::Calendars => "urn:ietf:params:jmap:calendars",
            Capability::Blob => "urn:ietf:params:jmap:blob",
            Capability::Quota => "urn:ietf:params:jmap:quota",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.urn())
    }
}

/// Insertion-ordered set of declared capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet(Vec<Capability>);

impl CapabilitySet {
    pub fn baseline() -> Self {
        Self(Capability::BASELINE.to_vec())
    }

    /// Returns `true` when the capability was not declared yet.
    pub fn insert(&mut self, capability: Capability) -> bool {
        if self.0.contains(&capability) {
            return false;
        }
        self.0.push(capability);
        true
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn to_vec(&self) -> Vec<Capability> {
        self.0.clone()
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::baseline()
    }
}
