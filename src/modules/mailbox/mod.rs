// Copyright © 2025 jmapgate authors
// Licensed under jmapgate License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod list;
