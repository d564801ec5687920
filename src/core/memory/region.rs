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

//! Memory region identification and address translation
//!
//! Handles the N64's MIPS memory segmentation: KUSEG, KSEG0 and KSEG1 all
//! mirror the same physical range and are folded onto it by masking.

use super::Bus;

/// Memory region identification
///
/// Used to identify which memory region an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    /// RDRAM (8MB)
    Rdram,
    /// RSP data memory (4KB)
    SpDmem,
    /// RSP instruction memory (4KB)
    SpImem,
    /// Cartridge ROM (read-only)
    Cartridge,
    /// Unmapped region (reads 0, writes discarded)
    Unmapped,
}

impl Bus {
    /// Translate virtual address to physical address
    ///
    /// The N64 uses MIPS memory segments:
    /// - KUSEG (0x00000000-0x7FFFFFFF): user space, cached
    /// - KSEG0 (0x80000000-0x9FFFFFFF): kernel space, cached mirror
    /// - KSEG1 (0xA0000000-0xBFFFFFFF): kernel space, uncached mirror
    ///
    /// Masking to the low 29 bits folds all three onto one physical range.
    /// This is a deliberate simplification: no TLB, no cache behavior.
    #[inline(always)]
    pub(super) fn translate_address(vaddr: u32) -> u32 {
        vaddr & 0x1FFF_FFFF
    }

    /// Identify the memory region for an address
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::memory::{Bus, MemoryRegion};
    ///
    /// let bus = Bus::new();
    ///
    /// assert_eq!(bus.identify_region(0x00000000), MemoryRegion::Rdram);
    /// assert_eq!(bus.identify_region(0xA4000000), MemoryRegion::SpDmem);
    /// assert_eq!(bus.identify_region(0xA4001000), MemoryRegion::SpImem);
    /// assert_eq!(bus.identify_region(0xB0000000), MemoryRegion::Cartridge);
    /// assert_eq!(bus.identify_region(0x1FFFFFFF), MemoryRegion::Unmapped);
    /// ```
    pub fn identify_region(&self, vaddr: u32) -> MemoryRegion {
        let paddr = Self::translate_address(vaddr);

        if (Self::SP_DMEM_START..=Self::SP_DMEM_END).contains(&paddr) {
            MemoryRegion::SpDmem
        } else if (Self::SP_IMEM_START..=Self::SP_IMEM_END).contains(&paddr) {
            MemoryRegion::SpImem
        } else if (Self::RDRAM_START..=Self::RDRAM_END).contains(&paddr) {
            MemoryRegion::Rdram
        } else if (Self::CART_START..=Self::CART_END).contains(&paddr) {
            MemoryRegion::Cartridge
        } else {
            MemoryRegion::Unmapped
        }
    }
}
