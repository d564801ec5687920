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

/// Coprocessor 0 (System Control)
///
/// On real hardware COP0 drives exceptions, the TLB, and timing. This core
/// models it as opaque register storage only: MFC0/MTC0 move words in and
/// out, nothing is interpreted, and all other COP0 operations are no-ops.
pub(super) struct COP0 {
    /// COP0 registers (32 registers)
    regs: [u32; 32],
}

impl COP0 {
    /// Count
    #[allow(dead_code)]
    pub const COUNT: usize = 9;
    /// Compare
    #[allow(dead_code)]
    pub const COMPARE: usize = 11;
    /// Status Register
    #[allow(dead_code)]
    pub const SR: usize = 12;
    /// Cause Register
    #[allow(dead_code)]
    pub const CAUSE: usize = 13;
    /// Exception PC
    #[allow(dead_code)]
    pub const EPC: usize = 14;
    /// Processor ID
    #[allow(dead_code)]
    pub const PRID: usize = 15;

    /// Create a new COP0 instance with all registers zeroed
    pub(super) fn new() -> Self {
        Self { regs: [0u32; 32] }
    }

    /// Reset all COP0 registers to zero
    pub(super) fn reset(&mut self) {
        self.regs = [0u32; 32];
    }

    /// Read a register by index (low 5 bits significant)
    pub(super) fn read(&self, index: u8) -> u32 {
        self.regs[(index & 0x1F) as usize]
    }

    /// Write a register by index (low 5 bits significant)
    pub(super) fn write(&mut self, index: u8, value: u32) {
        self.regs[(index & 0x1F) as usize] = value;
    }
}
