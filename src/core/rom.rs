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

//! Cartridge image handling
//!
//! N64 cartridge dumps circulate in three byte orders, distinguished by the
//! 32-bit magic value at offset 0:
//!
//! | Magic        | Extension | Layout                          |
//! |--------------|-----------|---------------------------------|
//! | `0x80371240` | `.z64`    | big-endian (canonical)          |
//! | `0x40123780` | `.n64`    | 32-bit little-endian words      |
//! | `0x37804012` | `.v64`    | 16-bit byte-swapped pairs       |
//!
//! Everything downstream of this module (header parsing, the memory bus,
//! the CPU) only ever sees the canonical big-endian layout; [`normalize`]
//! is the single point where the other two orders are folded away. Images
//! with an unrecognized magic pass through unchanged so they can still be
//! loaded and inspected.
//!
//! The 64-byte header at the start of the normalized image carries the boot
//! address, checksums, and title shown to the user; [`RomHeader::parse`]
//! extracts those fields.

use super::error::{EmulatorError, Result};

/// Byte order of a cartridge image as dumped
///
/// Detected from the magic word before normalization; kept around so the
/// source format can be reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// `.z64`, canonical big-endian
    BigEndian,
    /// `.n64`, 32-bit little-endian words
    LittleEndian,
    /// `.v64`, adjacent 16-bit pairs byte-swapped
    ByteSwapped,
    /// Unrecognized magic; treated as already big-endian
    #[default]
    Unknown,
}

impl ByteOrder {
    /// Magic word of a canonical big-endian image
    pub const MAGIC_BIG: u32 = 0x80371240;
    /// Magic word of a 32-bit little-endian image
    pub const MAGIC_LITTLE: u32 = 0x40123780;
    /// Magic word of a 16-bit byte-swapped image
    pub const MAGIC_SWAPPED: u32 = 0x37804012;

    /// Detect the byte order of a raw image from its first four bytes
    ///
    /// Images shorter than four bytes are reported as [`ByteOrder::Unknown`].
    pub fn detect(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }
        let magic = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        match magic {
            Self::MAGIC_BIG => Self::BigEndian,
            Self::MAGIC_LITTLE => Self::LittleEndian,
            Self::MAGIC_SWAPPED => Self::ByteSwapped,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::BigEndian => "big",
            Self::LittleEndian => "little",
            Self::ByteSwapped => "byteswap",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Normalize a raw cartridge image to canonical big-endian byte order
///
/// Pure, length-preserving transform keyed on the detected magic. Canonical
/// and unrecognized images are returned unchanged. A trailing group shorter
/// than the swap unit passes through unchanged.
pub fn normalize(data: Vec<u8>) -> Vec<u8> {
    match ByteOrder::detect(&data) {
        ByteOrder::BigEndian | ByteOrder::Unknown => data,
        ByteOrder::LittleEndian => swap_words(&data),
        ByteOrder::ByteSwapped => swap_halves(&data),
    }
}

/// Reverse the bytes of every complete 4-byte group
///
/// Converts between 32-bit little-endian and big-endian word layouts. The
/// transform is its own inverse on inputs whose length is a multiple of 4.
fn swap_words(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        out.extend([chunk[3], chunk[2], chunk[1], chunk[0]]);
    }
    out.extend_from_slice(chunks.remainder());
    out
}

/// Swap the bytes of every complete 2-byte pair
///
/// Converts between the byte-swapped `.v64` layout and big-endian. The
/// transform is its own inverse.
fn swap_halves(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        out.extend([chunk[1], chunk[0]]);
    }
    out.extend_from_slice(chunks.remainder());
    out
}

/// N64 cartridge header
///
/// Parsed once from the first 64 bytes of a normalized image, read-only
/// thereafter, and replaced wholesale on the next load.
///
/// # Header layout (big-endian)
///
/// ```text
/// 0x00: magic / endian tag
/// 0x04: clock rate
/// 0x08: boot address (entry point)
/// 0x0C: release
/// 0x10: CRC1
/// 0x14: CRC2
/// 0x20: title (20 bytes, ASCII, NUL-padded)
/// 0x3B: game ID (4 bytes, ASCII)
/// 0x3F: region code (1 byte)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomHeader {
    /// Magic word (canonical images carry `0x80371240`)
    pub magic: u32,
    /// Clock rate field
    pub clock_rate: u32,
    /// Boot address (entry point advertised by the cartridge)
    pub boot_address: u32,
    /// Release field
    pub release: u32,
    /// First checksum
    pub crc1: u32,
    /// Second checksum
    pub crc2: u32,
    /// Game title, trailing NUL padding stripped
    pub title: String,
    /// Four-character game ID
    pub game_id: String,
    /// Region code character
    pub region: char,
}

impl RomHeader {
    /// Header size in bytes
    pub const SIZE: usize = 0x40;

    /// Parse a header from a normalized (big-endian) image
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::HeaderTooShort`] if fewer than 64 bytes are
    /// available; no out-of-bounds reads are attempted.
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::rom::RomHeader;
    ///
    /// let mut image = vec![0u8; 0x40];
    /// image[0..4].copy_from_slice(&0x80371240u32.to_be_bytes());
    /// image[0x20..0x28].copy_from_slice(b"TESTGAME");
    ///
    /// let header = RomHeader::parse(&image).unwrap();
    /// assert_eq!(header.title, "TESTGAME");
    /// ```
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(EmulatorError::HeaderTooShort {
                expected: Self::SIZE,
                got: data.len(),
            });
        }

        let word = |off: usize| u32::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]]);

        let header = Self {
            magic: word(0x00),
            clock_rate: word(0x04),
            boot_address: word(0x08),
            release: word(0x0C),
            crc1: word(0x10),
            crc2: word(0x14),
            title: ascii_lossy(&data[0x20..0x34]).trim_end_matches('\0').to_string(),
            game_id: ascii_lossy(&data[0x3B..0x3F]),
            region: data[0x3F] as char,
        };

        log::info!(
            "ROM header: title={:?} id={:?} region={:?} boot=0x{:08X} crc1=0x{:08X} crc2=0x{:08X}",
            header.title,
            header.game_id,
            header.region,
            header.boot_address,
            header.crc1,
            header.crc2
        );

        Ok(header)
    }
}

/// Decode ASCII text, dropping undecodable bytes instead of failing
fn ascii_lossy(bytes: &[u8]) -> String {
    bytes.iter().filter(|b| b.is_ascii()).map(|&b| b as char).collect()
}
