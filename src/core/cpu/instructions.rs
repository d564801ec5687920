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

//! Instruction decode and execution
//!
//! Two-level fail-open dispatch: the primary opcode selects a handler, and
//! the SPECIAL (0x00) / REGIMM (0x01) groups re-dispatch on their secondary
//! code. Every unknown code at either level resolves to a no-op; the
//! default arms below are the single place that contract is enforced.
//!
//! Branch handlers never touch the PC themselves. They return the branch
//! target to [`CPU::step`], which runs the delay-slot instruction first and
//! then redirects; this keeps the delay-slot sequencing in one place.

use super::decode::{decode_i_type, decode_j_type, decode_r_type, sign_extend};
use super::CPU;
use crate::core::memory::Bus;

impl CPU {
    /// Decode and execute one instruction
    ///
    /// `next_pc` is the address of the following instruction (`pc + 4`);
    /// branch targets and link values are derived from it. Returns the
    /// branch target when a branch or jump is taken, `None` otherwise.
    pub(super) fn execute_instruction(&mut self, instr: u32, next_pc: u32, bus: &mut Bus) -> Option<u32> {
        let opcode = ((instr >> 26) & 0x3F) as u8;

        match opcode {
            0x00 => self.execute_special(instr, next_pc),
            0x01 => self.execute_regimm(instr, next_pc),
            0x02 => self.op_j(instr, next_pc),         // J
            0x03 => self.op_jal(instr, next_pc),       // JAL
            0x04 => self.op_beq(instr, next_pc),       // BEQ
            0x05 => self.op_bne(instr, next_pc),       // BNE
            0x06 => self.op_blez(instr, next_pc),      // BLEZ
            0x07 => self.op_bgtz(instr, next_pc),      // BGTZ
            0x08 | 0x09 => self.op_addiu(instr),       // ADDI / ADDIU
            0x0A => self.op_slti(instr),               // SLTI
            0x0B => self.op_sltiu(instr),              // SLTIU
            0x0C => self.op_andi(instr),               // ANDI
            0x0D => self.op_ori(instr),                // ORI
            0x0E => self.op_xori(instr),               // XORI
            0x0F => self.op_lui(instr),                // LUI
            0x10 => self.execute_cop0(instr),          // COP0
            0x20 => self.op_lb(instr, bus),            // LB
            0x21 => self.op_lh(instr, bus),            // LH
            0x23 => self.op_lw(instr, bus),            // LW
            0x24 => self.op_lbu(instr, bus),           // LBU
            0x25 => self.op_lhu(instr, bus),           // LHU
            0x28 => self.op_sb(instr, bus),            // SB
            0x29 => self.op_sh(instr, bus),            // SH
            0x2B => self.op_sw(instr, bus),            // SW
            0x2F => None,                              // CACHE (no-op)
            _ => {
                log::warn!(
                    "unimplemented opcode 0x{:02X} at PC=0x{:08X}, treated as NOP",
                    opcode,
                    self.pc()
                );
                None
            }
        }
    }

    /// Handle SPECIAL instructions (opcode 0x00)
    ///
    /// The funct field (lower 6 bits) selects the operation. ADD/SUB are
    /// not distinguished from ADDU/SUBU: both wrap instead of trapping on
    /// overflow.
    fn execute_special(&mut self, instr: u32, next_pc: u32) -> Option<u32> {
        let (rs, rt, rd, shamt, funct) = decode_r_type(instr);

        match funct {
            // Shifts, fixed amount
            0x00 => self.set_reg(rd, self.reg(rt) << shamt), // SLL
            0x02 => self.set_reg(rd, self.reg(rt) >> shamt), // SRL
            0x03 => self.set_reg(rd, ((self.reg(rt) as i32) >> shamt) as u32), // SRA

            // Shifts, amount from rs (low 5 bits)
            0x04 => self.set_reg(rd, self.reg(rt) << (self.reg(rs) & 0x1F)), // SLLV
            0x06 => self.set_reg(rd, self.reg(rt) >> (self.reg(rs) & 0x1F)), // SRLV
            0x07 => self.set_reg(rd, ((self.reg(rt) as i32) >> (self.reg(rs) & 0x1F)) as u32), // SRAV

            // Register jumps
            0x08 => return Some(self.reg(rs)), // JR
            0x09 => return self.op_jalr(rs, rd, next_pc), // JALR

            // HI/LO transfers
            0x10 => self.set_reg(rd, self.hi), // MFHI
            0x11 => self.hi = self.reg(rs),    // MTHI
            0x12 => self.set_reg(rd, self.lo), // MFLO
            0x13 => self.lo = self.reg(rs),    // MTLO

            // Multiply / divide into HI:LO
            0x18 => self.op_mult(rs, rt),  // MULT
            0x19 => self.op_multu(rs, rt), // MULTU
            0x1A => self.op_div(rs, rt),   // DIV
            0x1B => self.op_divu(rs, rt),  // DIVU

            // ALU; the overflow-trapping encodings behave like the unsigned ones
            0x20 | 0x21 => self.set_reg(rd, self.reg(rs).wrapping_add(self.reg(rt))), // ADD / ADDU
            0x22 | 0x23 => self.set_reg(rd, self.reg(rs).wrapping_sub(self.reg(rt))), // SUB / SUBU
            0x24 => self.set_reg(rd, self.reg(rs) & self.reg(rt)),    // AND
            0x25 => self.set_reg(rd, self.reg(rs) | self.reg(rt)),    // OR
            0x26 => self.set_reg(rd, self.reg(rs) ^ self.reg(rt)),    // XOR
            0x27 => self.set_reg(rd, !(self.reg(rs) | self.reg(rt))), // NOR
            0x2A => self.set_reg(rd, ((self.reg(rs) as i32) < (self.reg(rt) as i32)) as u32), // SLT
            0x2B => self.set_reg(rd, (self.reg(rs) < self.reg(rt)) as u32), // SLTU

            _ => {
                log::warn!(
                    "unimplemented SPECIAL function 0x{:02X} at PC=0x{:08X}, treated as NOP",
                    funct,
                    self.pc()
                );
            }
        }

        None
    }

    /// Handle REGIMM instructions (opcode 0x01)
    ///
    /// The rt field selects among BLTZ (0x00), BGEZ (0x01), BLTZAL (0x10)
    /// and BGEZAL (0x11). The link variants store the return address in r31
    /// only when the branch is taken.
    fn execute_regimm(&mut self, instr: u32, next_pc: u32) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let value = self.reg(rs) as i32;

        let taken = match rt {
            0x00 | 0x10 => value < 0,  // BLTZ / BLTZAL
            0x01 | 0x11 => value >= 0, // BGEZ / BGEZAL
            _ => {
                log::warn!(
                    "unimplemented REGIMM code 0x{:02X} at PC=0x{:08X}, treated as NOP",
                    rt,
                    self.pc()
                );
                return None;
            }
        };

        if !taken {
            return None;
        }
        if rt & 0x10 != 0 {
            self.set_reg(31, next_pc);
        }
        Some(Self::branch_target(next_pc, imm))
    }

    /// Handle COP0 instructions (opcode 0x10)
    ///
    /// MFC0/MTC0 move words between the general registers and the COP0
    /// register file; every other COP0 sub-operation (TLB maintenance and
    /// friends) is a no-op.
    fn execute_cop0(&mut self, instr: u32) -> Option<u32> {
        let (rs, rt, rd, _, _) = decode_r_type(instr);

        match rs {
            0x00 => self.set_reg(rt, self.cop0_reg(rd)), // MFC0
            0x04 => {
                let value = self.reg(rt);
                self.set_cop0_reg(rd, value); // MTC0
            }
            _ => {
                log::trace!("COP0 sub-op 0x{:02X} at PC=0x{:08X}, treated as NOP", rs, self.pc());
            }
        }

        None
    }

    /// Execute the instruction in a taken branch's delay slot
    ///
    /// Re-enters the main dispatch restricted to the boot-code whitelist:
    /// ADDU, OR, ORI, LUI, LW, SW. Everything else, including a nested
    /// branch, is a no-op, so a delay slot can never redirect again.
    /// Sharing the dispatch keeps both paths from drifting apart as the
    /// instruction set grows.
    pub(super) fn execute_delay_slot(&mut self, instr: u32, bus: &mut Bus) {
        if !Self::delay_slot_whitelisted(instr) {
            return;
        }
        // Whitelisted ops never branch and never read next_pc.
        let _ = self.execute_instruction(instr, 0, bus);
    }

    /// Whether an instruction may execute in a branch delay slot
    fn delay_slot_whitelisted(instr: u32) -> bool {
        let opcode = ((instr >> 26) & 0x3F) as u8;
        match opcode {
            0x00 => matches!((instr & 0x3F) as u8, 0x21 | 0x25), // ADDU, OR
            0x0D | 0x0F | 0x23 | 0x2B => true,                   // ORI, LUI, LW, SW
            _ => false,
        }
    }

    /// Branch target relative to the delay slot's successor
    ///
    /// `next_pc` already points past the branch; the sign-extended offset is
    /// applied in units of instructions.
    #[inline(always)]
    fn branch_target(next_pc: u32, imm: u16) -> u32 {
        next_pc.wrapping_add(sign_extend(imm) << 2)
    }

    // === Jumps ===

    /// J: Jump
    ///
    /// Format: j target
    /// Operation: PC = (next_pc & 0xF0000000) | (target << 2)
    fn op_j(&mut self, instr: u32, next_pc: u32) -> Option<u32> {
        let (_, target) = decode_j_type(instr);
        Some((next_pc & 0xF000_0000) | (target << 2))
    }

    /// JAL: Jump And Link
    ///
    /// Stores the address of the instruction after the delay slot in r31,
    /// then jumps like J.
    ///
    /// Format: jal target
    /// Operation: r31 = next_pc; PC = (next_pc & 0xF0000000) | (target << 2)
    fn op_jal(&mut self, instr: u32, next_pc: u32) -> Option<u32> {
        self.set_reg(31, next_pc);
        self.op_j(instr, next_pc)
    }

    /// JALR: Jump And Link Register
    ///
    /// The link register defaults to r31 when the rd field is 0.
    ///
    /// Format: jalr rd, rs
    /// Operation: rd = next_pc; PC = rs
    fn op_jalr(&mut self, rs: u8, rd: u8, next_pc: u32) -> Option<u32> {
        let link = if rd == 0 { 31 } else { rd };
        self.set_reg(link, next_pc);
        Some(self.reg(rs))
    }

    // === Conditional branches ===

    /// BEQ: Branch on Equal
    ///
    /// Format: beq rs, rt, offset
    fn op_beq(&mut self, instr: u32, next_pc: u32) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        (self.reg(rs) == self.reg(rt)).then(|| Self::branch_target(next_pc, imm))
    }

    /// BNE: Branch on Not Equal
    ///
    /// Format: bne rs, rt, offset
    fn op_bne(&mut self, instr: u32, next_pc: u32) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        (self.reg(rs) != self.reg(rt)).then(|| Self::branch_target(next_pc, imm))
    }

    /// BLEZ: Branch on Less Than or Equal to Zero (signed)
    ///
    /// Format: blez rs, offset
    fn op_blez(&mut self, instr: u32, next_pc: u32) -> Option<u32> {
        let (_, rs, _, imm) = decode_i_type(instr);
        ((self.reg(rs) as i32) <= 0).then(|| Self::branch_target(next_pc, imm))
    }

    /// BGTZ: Branch on Greater Than Zero (signed)
    ///
    /// Format: bgtz rs, offset
    fn op_bgtz(&mut self, instr: u32, next_pc: u32) -> Option<u32> {
        let (_, rs, _, imm) = decode_i_type(instr);
        ((self.reg(rs) as i32) > 0).then(|| Self::branch_target(next_pc, imm))
    }

    // === Immediate ALU ===

    /// ADDIU: Add Immediate (sign-extended, wrapping)
    ///
    /// Also handles the ADDI encoding: the overflow trap is not modeled, so
    /// both behave identically.
    ///
    /// Format: addiu rt, rs, imm
    /// Operation: rt = rs + sign_extend(imm)
    fn op_addiu(&mut self, instr: u32) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        self.set_reg(rt, self.reg(rs).wrapping_add(sign_extend(imm)));
        None
    }

    /// SLTI: Set on Less Than Immediate (signed compare)
    ///
    /// Format: slti rt, rs, imm
    /// Operation: rt = (rs < sign_extend(imm)) ? 1 : 0
    fn op_slti(&mut self, instr: u32) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let result = (self.reg(rs) as i32) < (sign_extend(imm) as i32);
        self.set_reg(rt, result as u32);
        None
    }

    /// SLTIU: Set on Less Than Immediate Unsigned
    ///
    /// The immediate is sign-extended first, then compared unsigned.
    ///
    /// Format: sltiu rt, rs, imm
    fn op_sltiu(&mut self, instr: u32) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let result = self.reg(rs) < sign_extend(imm);
        self.set_reg(rt, result as u32);
        None
    }

    /// ANDI: AND Immediate (zero-extended)
    ///
    /// Format: andi rt, rs, imm
    fn op_andi(&mut self, instr: u32) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        self.set_reg(rt, self.reg(rs) & imm as u32);
        None
    }

    /// ORI: OR Immediate (zero-extended)
    ///
    /// Format: ori rt, rs, imm
    fn op_ori(&mut self, instr: u32) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        self.set_reg(rt, self.reg(rs) | imm as u32);
        None
    }

    /// XORI: XOR Immediate (zero-extended)
    ///
    /// Format: xori rt, rs, imm
    fn op_xori(&mut self, instr: u32) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        self.set_reg(rt, self.reg(rs) ^ imm as u32);
        None
    }

    /// LUI: Load Upper Immediate
    ///
    /// Format: lui rt, imm
    /// Operation: rt = imm << 16
    fn op_lui(&mut self, instr: u32) -> Option<u32> {
        let (_, _, rt, imm) = decode_i_type(instr);
        self.set_reg(rt, (imm as u32) << 16);
        None
    }

    // === Multiply / divide ===

    /// MULT: signed 32x32 -> 64-bit multiply into HI:LO
    fn op_mult(&mut self, rs: u8, rt: u8) {
        let product = (self.reg(rs) as i32 as i64).wrapping_mul(self.reg(rt) as i32 as i64) as u64;
        self.hi = (product >> 32) as u32;
        self.lo = product as u32;
    }

    /// MULTU: unsigned 32x32 -> 64-bit multiply into HI:LO
    fn op_multu(&mut self, rs: u8, rt: u8) {
        let product = (self.reg(rs) as u64) * (self.reg(rt) as u64);
        self.hi = (product >> 32) as u32;
        self.lo = product as u32;
    }

    /// DIV: signed divide, LO = quotient, HI = remainder
    ///
    /// A zero divisor leaves HI/LO unchanged (architecturally undefined,
    /// modeled as "no effect").
    fn op_div(&mut self, rs: u8, rt: u8) {
        let a = self.reg(rs) as i32;
        let b = self.reg(rt) as i32;
        if b == 0 {
            return;
        }
        self.lo = a.wrapping_div(b) as u32;
        self.hi = a.wrapping_rem(b) as u32;
    }

    /// DIVU: unsigned divide, LO = quotient, HI = remainder
    ///
    /// A zero divisor leaves HI/LO unchanged.
    fn op_divu(&mut self, rs: u8, rt: u8) {
        let a = self.reg(rs);
        let b = self.reg(rt);
        if b == 0 {
            return;
        }
        self.lo = a / b;
        self.hi = a % b;
    }

    // === Loads ===

    /// Effective address: base register plus sign-extended 16-bit offset
    #[inline(always)]
    fn effective_address(&self, rs: u8, imm: u16) -> u32 {
        self.reg(rs).wrapping_add(sign_extend(imm))
    }

    /// LB: Load Byte (sign-extended)
    ///
    /// Format: lb rt, offset(rs)
    fn op_lb(&mut self, instr: u32, bus: &mut Bus) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let addr = self.effective_address(rs, imm);
        let value = bus.read8(addr) as i8 as i32 as u32;
        self.set_reg(rt, value);
        None
    }

    /// LH: Load Halfword (sign-extended)
    ///
    /// Format: lh rt, offset(rs)
    fn op_lh(&mut self, instr: u32, bus: &mut Bus) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let addr = self.effective_address(rs, imm);
        let value = bus.read16(addr) as i16 as i32 as u32;
        self.set_reg(rt, value);
        None
    }

    /// LW: Load Word
    ///
    /// Format: lw rt, offset(rs)
    fn op_lw(&mut self, instr: u32, bus: &mut Bus) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let addr = self.effective_address(rs, imm);
        let value = bus.read32(addr);
        self.set_reg(rt, value);
        None
    }

    /// LBU: Load Byte Unsigned (zero-extended)
    ///
    /// Format: lbu rt, offset(rs)
    fn op_lbu(&mut self, instr: u32, bus: &mut Bus) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let addr = self.effective_address(rs, imm);
        let value = bus.read8(addr) as u32;
        self.set_reg(rt, value);
        None
    }

    /// LHU: Load Halfword Unsigned (zero-extended)
    ///
    /// Format: lhu rt, offset(rs)
    fn op_lhu(&mut self, instr: u32, bus: &mut Bus) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let addr = self.effective_address(rs, imm);
        let value = bus.read16(addr) as u32;
        self.set_reg(rt, value);
        None
    }

    // === Stores ===

    /// SB: Store Byte
    ///
    /// Format: sb rt, offset(rs)
    fn op_sb(&mut self, instr: u32, bus: &mut Bus) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let addr = self.effective_address(rs, imm);
        bus.write8(addr, self.reg(rt) as u8);
        None
    }

    /// SH: Store Halfword
    ///
    /// Format: sh rt, offset(rs)
    fn op_sh(&mut self, instr: u32, bus: &mut Bus) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let addr = self.effective_address(rs, imm);
        bus.write16(addr, self.reg(rt) as u16);
        None
    }

    /// SW: Store Word
    ///
    /// Format: sw rt, offset(rs)
    fn op_sw(&mut self, instr: u32, bus: &mut Bus) -> Option<u32> {
        let (_, rs, rt, imm) = decode_i_type(instr);
        let addr = self.effective_address(rs, imm);
        bus.write32(addr, self.reg(rt));
        None
    }
}
