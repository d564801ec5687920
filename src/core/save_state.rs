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

//! Save state serialization
//!
//! Captures a complete emulation session (CPU registers, COP0 file, RDRAM,
//! and the SP memories) so it can be written to disk and restored later. The cartridge image itself is not part of a save state: it is
//! read-only and the user is expected to load the same ROM before applying
//! one.
//!
//! Save states are serialized with bincode for compact binary encoding and
//! carry a version number; loading a state with a different version fails
//! instead of silently misinterpreting the payload. [`SaveState::apply`]
//! validates the memory shapes before mutating anything, so a rejected
//! state never leaves the session half-restored.
//!
//! # Example
//!
//! ```no_run
//! use n64rx::core::save_state::SaveState;
//! use n64rx::core::system::System;
//!
//! let mut system = System::new();
//! // ... load a ROM, run a while ...
//!
//! let state = SaveState::from_system(&system);
//! state.save_to_file("session.state").unwrap();
//!
//! let loaded = SaveState::load_from_file("session.state").unwrap();
//! loaded.apply(&mut system).unwrap();
//! ```

use super::error::{EmulatorError, Result};
use super::memory::Bus;
use super::system::System;
use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Save state version for compatibility checking
///
/// Incremented whenever the save state format changes incompatibly.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Complete emulator save state
#[derive(Serialize, Deserialize, Encode, Decode)]
pub struct SaveState {
    /// Version number for compatibility checking
    pub version: u32,

    /// Save state metadata
    pub metadata: SaveStateMetadata,

    /// CPU state
    pub cpu: CpuState,

    /// Memory state (RDRAM, SP DMEM/IMEM)
    pub memory: MemoryState,
}

/// Save state metadata
#[derive(Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct SaveStateMetadata {
    /// Timestamp when the save state was created
    #[bincode(with_serde)]
    pub timestamp: DateTime<Utc>,

    /// Title of the loaded cartridge (empty if none)
    pub rom_title: String,
}

/// CPU state (MIPS R4300i)
#[derive(Serialize, Deserialize, Encode, Decode)]
pub struct CpuState {
    /// General purpose registers (r0-r31)
    pub regs: [u32; 32],

    /// Program counter
    pub pc: u32,

    /// HI register
    pub hi: u32,

    /// LO register
    pub lo: u32,

    /// COP0 registers (System Control Coprocessor)
    pub cop0_regs: [u32; 32],

    /// Retired instruction count
    pub instructions: u64,
}

/// Memory state
#[derive(Serialize, Deserialize, Encode, Decode)]
pub struct MemoryState {
    /// RDRAM (8MB)
    pub rdram: Vec<u8>,

    /// SP DMEM (4KB)
    pub sp_dmem: Vec<u8>,

    /// SP IMEM (4KB)
    pub sp_imem: Vec<u8>,
}

impl SaveState {
    /// Capture the current state of a system
    pub fn from_system(system: &System) -> Self {
        let cpu = system.cpu();
        let bus = system.bus();

        let mut cop0_regs = [0u32; 32];
        for (i, reg) in cop0_regs.iter_mut().enumerate() {
            *reg = cpu.cop0_reg(i as u8);
        }

        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                rom_title: system
                    .header()
                    .map(|h| h.title.clone())
                    .unwrap_or_default(),
            },
            cpu: CpuState {
                regs: cpu.regs(),
                pc: cpu.pc(),
                hi: cpu.hi(),
                lo: cpu.lo(),
                cop0_regs,
                instructions: cpu.instruction_count(),
            },
            memory: MemoryState {
                rdram: bus.rdram().to_vec(),
                sp_dmem: bus.sp_dmem().to_vec(),
                sp_imem: bus.sp_imem().to_vec(),
            },
        }
    }

    /// Restore this state into a system
    ///
    /// # Errors
    ///
    /// Fails with [`EmulatorError::SaveStateVersion`] on a version mismatch
    /// and [`EmulatorError::SaveStateShape`] if any memory buffer has the
    /// wrong length. Validation happens before any mutation: a rejected
    /// state leaves the system exactly as it was.
    pub fn apply(&self, system: &mut System) -> Result<()> {
        if self.version != SAVE_STATE_VERSION {
            return Err(EmulatorError::SaveStateVersion {
                expected: SAVE_STATE_VERSION,
                got: self.version,
            });
        }
        if self.memory.rdram.len() != Bus::RDRAM_SIZE {
            return Err(EmulatorError::SaveStateShape(format!(
                "RDRAM length {} (expected {})",
                self.memory.rdram.len(),
                Bus::RDRAM_SIZE
            )));
        }
        if self.memory.sp_dmem.len() != Bus::SP_MEM_SIZE {
            return Err(EmulatorError::SaveStateShape(format!(
                "SP DMEM length {} (expected {})",
                self.memory.sp_dmem.len(),
                Bus::SP_MEM_SIZE
            )));
        }
        if self.memory.sp_imem.len() != Bus::SP_MEM_SIZE {
            return Err(EmulatorError::SaveStateShape(format!(
                "SP IMEM length {} (expected {})",
                self.memory.sp_imem.len(),
                Bus::SP_MEM_SIZE
            )));
        }

        let cpu = system.cpu_mut();
        for i in 0..32 {
            cpu.set_reg(i as u8, self.cpu.regs[i]);
        }
        cpu.set_pc(self.cpu.pc);
        cpu.set_hi(self.cpu.hi);
        cpu.set_lo(self.cpu.lo);
        for (i, &value) in self.cpu.cop0_regs.iter().enumerate() {
            cpu.set_cop0_reg(i as u8, value);
        }
        cpu.set_instruction_count(self.cpu.instructions);

        let bus = system.bus_mut();
        bus.rdram_mut().copy_from_slice(&self.memory.rdram);
        bus.sp_dmem_mut().copy_from_slice(&self.memory.sp_dmem);
        bus.sp_imem_mut().copy_from_slice(&self.memory.sp_imem);

        log::info!(
            "save state applied: PC=0x{:08X}, {} instructions",
            self.cpu.pc,
            self.cpu.instructions
        );
        Ok(())
    }

    /// Serialize this state to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = bincode::encode_to_vec(self, config::standard())
            .map_err(|e| EmulatorError::SaveStateEncoding(e.to_string()))?;

        let mut file = File::create(path)?;
        file.write_all(&encoded)?;

        log::info!("save state written: {} bytes", encoded.len());
        Ok(())
    }

    /// Deserialize a state from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;

        let (state, _) = bincode::decode_from_slice::<Self, _>(&buffer, config::standard())
            .map_err(|e| EmulatorError::SaveStateEncoding(e.to_string()))?;
        Ok(state)
    }
}
