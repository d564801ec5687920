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

//! Nintendo 64 emulator core library
//!
//! This library provides the core emulation components for a Nintendo 64
//! emulator: a MIPS R4300i interpreter, the RDRAM/SP memory map, cartridge
//! image normalization and header parsing, and the IPL3 boot-stub loader.
//!
//! # Example
//!
//! ```
//! use n64rx::core::cpu::CPU;
//! use n64rx::core::memory::Bus;
//!
//! let mut cpu = CPU::new();
//! let mut bus = Bus::new();
//!
//! // Execute one instruction (no-op while the CPU is stopped)
//! cpu.step(&mut bus);
//! ```

pub mod core;
