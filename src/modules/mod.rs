// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod common;
pub mod context;
pub mod email;
pub mod error;
pub mod jmap;
pub mod logger;
pub mod mailbox;
pub mod rest;
pub mod settings;
pub mod utils;
