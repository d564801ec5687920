// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 n64rx contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Emulator error types
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
///
/// Only load-time and save-state conditions are surfaced as errors. Runtime
/// anomalies (unknown opcodes, unmapped bus accesses, divide by zero) are
/// absorbed by the core and never propagate here.
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("ROM file not found: {0}")]
    RomNotFound(String),

    #[error("ROM header too short: {got} bytes (need at least {expected})")]
    HeaderTooShort { expected: usize, got: usize },

    #[error("no ROM image loaded")]
    NoRomLoaded,

    #[error("ROM too short for boot stub: {got} bytes (need at least {expected})")]
    RomTooShort { expected: usize, got: usize },

    #[error("save state version mismatch: got {got} (expected {expected})")]
    SaveStateVersion { expected: u32, got: u32 },

    #[error("save state shape mismatch: {0}")]
    SaveStateShape(String),

    #[error("save state encoding error: {0}")]
    SaveStateEncoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
