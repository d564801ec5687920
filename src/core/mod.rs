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

//! Core emulation components
//!
//! This module contains all hardware emulation components:
//! - CPU (MIPS R4300i, boot-stub subset)
//! - Memory bus (RDRAM, SP DMEM/IMEM, cartridge)
//! - Cartridge image handling (byte order, header)
//! - System integration, save states, execution runner

pub mod cpu;
pub mod error;
pub mod memory;
pub mod rom;
pub mod runner;
pub mod save_state;
pub mod system;

// Re-export commonly used types
pub use cpu::CPU;
pub use error::{EmulatorError, Result};
pub use memory::Bus;
pub use rom::{ByteOrder, RomHeader};
pub use runner::Runner;
pub use save_state::SaveState;
pub use system::System;
