// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod args;
pub mod builder;
pub mod capability;
pub mod client;
pub mod method;
pub mod parser;
pub mod reference;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
mod tests;
