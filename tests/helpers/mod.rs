// ABOUTME: Shared helper modules for integration tests
// ABOUTME: Axum request utilities and a scripted completion provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod axum_test;
pub mod mock_llm;
