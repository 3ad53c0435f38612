// ABOUTME: Configuration context holding the immutable server configuration
// ABOUTME: Shared read-only across request handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::ServerConfig;
use std::sync::Arc;

/// Configuration context
#[derive(Clone)]
pub struct ConfigContext {
    config: Arc<ServerConfig>,
}

impl ConfigContext {
    /// Create new configuration context
    #[must_use]
    pub const fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }

    /// Get server configuration
    #[must_use]
    pub const fn config(&self) -> &Arc<ServerConfig> {
        &self.config
    }
}
