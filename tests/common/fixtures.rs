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

//! Test fixtures for common test scenarios

use super::test_roms;
use n64rx::core::system::System;

/// Create a System with the given program loaded at the boot stub
#[allow(dead_code)]
pub fn system_with_program(program: &[u32]) -> System {
    let mut system = System::new();
    system
        .load_rom_bytes(test_roms::build_test_rom(program))
        .expect("failed to load test ROM");
    system
}

/// Create a System with a program loaded, started, and stepped `n` times
#[allow(dead_code)]
pub fn run_program(program: &[u32], n: usize) -> System {
    let mut system = system_with_program(program);
    system.start();
    for _ in 0..n {
        system.step();
    }
    system
}
