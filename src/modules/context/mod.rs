// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::JmapGateResult;

pub mod status;


pub trait Initialize {
    async fn initialize() -> JmapGateResult<()>;
}
