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

//! Test ROM builders and small test programs

/// Build a minimal 4096-byte big-endian test image
///
/// The header carries the canonical magic, a clock rate of 0x0F, a boot
/// address of 0x80000400, the title "TESTGAME", game ID "NTGE" and region
/// 'E'. The given program words are placed at offset 0x40, where the boot
/// stub loader copies them into SP DMEM.
#[allow(dead_code)]
pub fn build_test_rom(program: &[u32]) -> Vec<u8> {
    let mut image = vec![0u8; 0x1000];
    image[0x00..0x04].copy_from_slice(&0x80371240u32.to_be_bytes());
    image[0x04..0x08].copy_from_slice(&0x0000000Fu32.to_be_bytes());
    image[0x08..0x0C].copy_from_slice(&0x80000400u32.to_be_bytes());
    image[0x10..0x14].copy_from_slice(&0x12345678u32.to_be_bytes());
    image[0x14..0x18].copy_from_slice(&0x9ABCDEF0u32.to_be_bytes());
    image[0x20..0x28].copy_from_slice(b"TESTGAME");
    image[0x3B..0x3F].copy_from_slice(b"NTGE");
    image[0x3F] = b'E';

    for (i, &word) in program.iter().enumerate() {
        let offset = 0x40 + i * 4;
        image[offset..offset + 4].copy_from_slice(&word.to_be_bytes());
    }
    image
}

/// Re-encode a big-endian image as 32-bit little-endian words (.n64 layout)
#[allow(dead_code)]
pub fn to_little_endian(image: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(image.len());
    for chunk in image.chunks(4) {
        let mut group: Vec<u8> = chunk.to_vec();
        if group.len() == 4 {
            group.reverse();
        }
        out.extend(group);
    }
    out
}

/// Re-encode a big-endian image with 16-bit pairs byte-swapped (.v64 layout)
#[allow(dead_code)]
pub fn to_byte_swapped(image: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(image.len());
    for chunk in image.chunks(2) {
        if chunk.len() == 2 {
            out.extend([chunk[1], chunk[0]]);
        } else {
            out.extend_from_slice(chunk);
        }
    }
    out
}

/// Program: build 0x12345678 in r8 and store it at RDRAM 0x100
///
/// Ends in a jump-to-self so further steps are harmless.
#[allow(dead_code)]
pub fn program_store_word() -> Vec<u32> {
    vec![
        0x3C081234, // LUI   r8, 0x1234
        0x35085678, // ORI   r8, r8, 0x5678
        0xAC080100, // SW    r8, 0x100(r0)
        0x09000013, // J     0xA400004C (self)
        0x00000000, // NOP (delay slot)
    ]
}

/// Program: arithmetic into r3, then spin
#[allow(dead_code)]
pub fn program_basic_arithmetic() -> Vec<u32> {
    vec![
        0x24010001, // ADDIU r1, r0, 1
        0x24020002, // ADDIU r2, r0, 2
        0x00221821, // ADDU  r3, r1, r2
        0x09000013, // J     0xA400004C (self)
        0x00000000, // NOP (delay slot)
    ]
}
