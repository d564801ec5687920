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

use clap::Parser;
use log::{error, info};
use n64rx::core::error::Result;
use n64rx::core::save_state::SaveState;
use n64rx::core::system::System;

/// Nintendo 64 emulator core, headless runner
#[derive(Parser)]
#[command(name = "n64rx")]
#[command(about = "Nintendo 64 emulator core", long_about = None)]
struct Args {
    /// Path to the N64 ROM image (.z64/.n64/.v64)
    rom_file: String,

    /// Number of instructions to execute
    #[arg(short = 'n', long, default_value = "100000")]
    instructions: u64,

    /// Write a save state to this path when the run completes
    #[arg(short = 's', long)]
    save_state: Option<String>,
}

fn main() -> Result<()> {
    // Pick up RUST_LOG and friends from .env, then initialize logging
    dotenvy::dotenv().ok();
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("n64rx v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut system = System::new();
    if let Err(e) = system.load_rom(&args.rom_file) {
        error!("Failed to load ROM: {}", e);
        return Err(e);
    }

    if let Some(header) = system.header() {
        info!(
            "Game: {} ({}) region={} boot=0x{:08X}",
            header.title, header.game_id, header.region, header.boot_address
        );
        info!("CRC1=0x{:08X} CRC2=0x{:08X}", header.crc1, header.crc2);
    }
    info!("Format: {}", system.byte_order());

    info!("Starting emulation...");
    system.start();

    let total_instructions = args.instructions;
    let log_interval = (total_instructions / 10).max(1); // Log ~10 times during execution

    for i in 0..total_instructions {
        if i % log_interval == 0 && i > 0 {
            info!(
                "Progress: {}/{} instructions | PC: 0x{:08X}",
                i,
                total_instructions,
                system.pc()
            );
        }
        system.step();
    }
    system.stop();

    info!("Emulation completed");
    info!("Total instructions: {}", system.instruction_count());
    info!("Final PC: 0x{:08X}", system.pc());
    system.cpu().dump_registers();

    if let Some(path) = &args.save_state {
        let state = SaveState::from_system(&system);
        state.save_to_file(path)?;
        info!("Save state written to {}", path);
    }

    Ok(())
}
