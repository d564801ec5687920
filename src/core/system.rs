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

//! System integration module
//!
//! Ties the CPU, memory bus, and cartridge handling together into one owned
//! emulation session, and exposes the read-only [`Snapshot`] that display
//! collaborators consume. There are no ambient globals: everything about a
//! session lives in the [`System`] value.

use super::cpu::CPU;
use super::error::{EmulatorError, Result};
use super::memory::Bus;
use super::rom::{self, ByteOrder, RomHeader};
use std::path::Path;

/// N64 emulation session
///
/// Owns the CPU and bus and manages the cartridge load sequence:
/// normalize byte order, parse the header, map the image, place the boot
/// stub, reset the CPU.
///
/// # Example
/// ```no_run
/// use n64rx::core::system::System;
///
/// let mut system = System::new();
/// system.load_rom("game.z64").unwrap();
/// system.start();
/// system.step();
/// ```
pub struct System {
    /// CPU instance
    cpu: CPU,
    /// Memory bus
    bus: Bus,
    /// Header of the currently loaded cartridge, if any
    header: Option<RomHeader>,
    /// Byte order the current cartridge was dumped in
    byte_order: ByteOrder,
}

/// Read-only point-in-time view of the emulation state
///
/// This is the entire contract display collaborators get: they can render
/// it, but nothing in it lets them reach back into the session. Snapshots
/// taken while another context is stepping are point-in-time and may be
/// stale by the time they are read.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Program counter
    pub pc: u32,
    /// Retired instruction count
    pub instructions: u64,
    /// General purpose registers
    pub regs: [u32; 32],
    /// Whether the CPU is currently running
    pub running: bool,
    /// Parsed cartridge header, if an image is loaded
    pub header: Option<RomHeader>,
}

impl System {
    /// Create a new System instance with no cartridge loaded
    pub fn new() -> Self {
        Self {
            cpu: CPU::new(),
            bus: Bus::new(),
            header: None,
            byte_order: ByteOrder::Unknown,
        }
    }

    /// Load a cartridge image from a file
    ///
    /// Reads the file and hands it to [`System::load_rom_bytes`]. A missing
    /// file is reported as [`EmulatorError::RomNotFound`].
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|_| EmulatorError::RomNotFound(path.display().to_string()))?;
        log::info!("loading ROM: {} ({} bytes)", path.display(), data.len());
        self.load_rom_bytes(data)
    }

    /// Load a cartridge image from raw bytes
    ///
    /// Runs the full load sequence: detect and normalize byte order, parse
    /// the header, map the image into the bus, copy the boot stub into SP
    /// DMEM, and reset the CPU so the next `step` executes from the boot
    /// entry point.
    ///
    /// # Errors
    ///
    /// Fails if the image is too short for the header or the boot stub; the
    /// previous session state is left unmodified in that case.
    pub fn load_rom_bytes(&mut self, data: Vec<u8>) -> Result<()> {
        let byte_order = ByteOrder::detect(&data);
        let image = rom::normalize(data);
        let header = RomHeader::parse(&image)?;

        // Validate up front so a failed load never clobbers current state.
        if image.len() < Bus::BOOT_STUB_END {
            return Err(EmulatorError::RomTooShort {
                expected: Bus::BOOT_STUB_END,
                got: image.len(),
            });
        }

        self.bus.load_rom(image);
        self.bus.load_boot_stub()?;
        self.cpu.set_running(false);
        self.cpu.reset();

        log::info!(
            "ROM loaded: {} ({}) region={} format={}",
            header.title,
            header.game_id,
            header.region,
            byte_order
        );

        self.header = Some(header);
        self.byte_order = byte_order;
        Ok(())
    }

    /// Reset the session as if the console was power-cycled
    ///
    /// Clears RDRAM and the SP memories, re-places the boot stub from the
    /// cartridge (which is preserved), and resets the CPU. The running flag
    /// is untouched so a live session resumes from the boot entry.
    pub fn reset(&mut self) {
        self.bus.reset();
        if self.bus.has_rom() {
            // Image length was validated at load time; placement cannot fail.
            let _ = self.bus.load_boot_stub();
        }
        self.cpu.reset();
        log::info!("system reset, PC=0x{:08X}", self.cpu.pc());
    }

    /// Start execution: subsequent `step` calls run instructions
    pub fn start(&mut self) {
        self.cpu.set_running(true);
    }

    /// Stop execution
    ///
    /// Idempotent; only prevents the next `step` from doing work.
    pub fn stop(&mut self) {
        self.cpu.set_running(false);
    }

    /// Whether the CPU is currently running
    pub fn is_running(&self) -> bool {
        self.cpu.is_running()
    }

    /// Execute one CPU instruction (no-op while stopped)
    pub fn step(&mut self) {
        self.cpu.step(&mut self.bus);
    }

    /// Current program counter
    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    /// Retired instruction count
    pub fn instruction_count(&self) -> u64 {
        self.cpu.instruction_count()
    }

    /// Header of the currently loaded cartridge
    pub fn header(&self) -> Option<&RomHeader> {
        self.header.as_ref()
    }

    /// Byte order the current cartridge was dumped in
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Whether a cartridge is loaded
    pub fn has_rom(&self) -> bool {
        self.bus.has_rom()
    }

    /// CPU reference
    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }

    /// CPU reference, mutable (save-state restore, tests)
    pub fn cpu_mut(&mut self) -> &mut CPU {
        &mut self.cpu
    }

    /// Bus reference
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Bus reference, mutable (save-state restore, tests)
    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Take a read-only snapshot of the current state for display
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pc: self.cpu.pc(),
            instructions: self.cpu.instruction_count(),
            regs: self.cpu.regs(),
            running: self.cpu.is_running(),
            header: self.header.clone(),
        }
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal loadable image: valid header plus a full boot-stub range
    fn test_image() -> Vec<u8> {
        let mut image = vec![0u8; Bus::BOOT_STUB_END];
        image[0..4].copy_from_slice(&0x80371240u32.to_be_bytes());
        image[0x08..0x0C].copy_from_slice(&0x80000400u32.to_be_bytes());
        image[0x20..0x28].copy_from_slice(b"TESTGAME");
        image
    }

    #[test]
    fn test_load_rom_bytes_sets_up_session() {
        let mut system = System::new();
        system.load_rom_bytes(test_image()).unwrap();

        assert!(system.has_rom());
        assert_eq!(system.pc(), 0xA4000040);
        assert_eq!(system.header().unwrap().title, "TESTGAME");
        assert_eq!(system.byte_order(), ByteOrder::BigEndian);
        assert!(!system.is_running());
    }

    #[test]
    fn test_load_too_short_rom_leaves_state_unmodified() {
        let mut system = System::new();
        system.load_rom_bytes(test_image()).unwrap();
        system.start();

        // 64 bytes parse as a header but cannot carry a boot stub.
        let mut short = vec![0u8; 0x40];
        short[0..4].copy_from_slice(&0x80371240u32.to_be_bytes());
        let result = system.load_rom_bytes(short);

        assert!(matches!(result, Err(EmulatorError::RomTooShort { .. })));
        assert_eq!(system.header().unwrap().title, "TESTGAME");
        assert!(system.is_running());
    }

    #[test]
    fn test_load_rejects_headerless_image() {
        let mut system = System::new();
        let result = system.load_rom_bytes(vec![0u8; 16]);
        assert!(matches!(result, Err(EmulatorError::HeaderTooShort { .. })));
        assert!(!system.has_rom());
    }

    #[test]
    fn test_missing_rom_file() {
        let mut system = System::new();
        let result = system.load_rom("/nonexistent/path/game.z64");
        assert!(matches!(result, Err(EmulatorError::RomNotFound(_))));
    }

    #[test]
    fn test_step_noop_until_started() {
        let mut system = System::new();
        system.load_rom_bytes(test_image()).unwrap();

        system.step();
        assert_eq!(system.instruction_count(), 0);

        system.start();
        system.step();
        assert_eq!(system.instruction_count(), 1);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut system = System::new();
        system.load_rom_bytes(test_image()).unwrap();
        system.start();
        system.stop();
        system.stop();
        assert!(!system.is_running());

        system.step();
        assert_eq!(system.instruction_count(), 0);
    }

    #[test]
    fn test_reset_restores_boot_state_and_stub() {
        let mut system = System::new();
        let mut image = test_image();
        image[0x40] = 0xAB; // recognizable stub byte
        system.load_rom_bytes(image).unwrap();

        system.start();
        system.step();
        system.bus_mut().write32(0x00000100, 0xDEADBEEF);
        system.bus_mut().write8(0xA4000040, 0x00); // scribble over the stub

        system.reset();

        assert_eq!(system.pc(), 0xA4000040);
        assert_eq!(system.instruction_count(), 0);
        assert_eq!(system.bus().read32(0x00000100), 0);
        assert_eq!(system.bus().read8(0xA4000040), 0xAB); // stub re-placed
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut system = System::new();
        system.load_rom_bytes(test_image()).unwrap();
        system.start();
        system.cpu_mut().set_reg(7, 0x1234);

        let snapshot = system.snapshot();

        assert_eq!(snapshot.pc, 0xA4000040);
        assert_eq!(snapshot.regs[7], 0x1234);
        assert!(snapshot.running);
        assert_eq!(snapshot.header.as_ref().unwrap().title, "TESTGAME");
    }
}
