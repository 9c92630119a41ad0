// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! Gameboy cpu's arithmetic and logic unit.
//!
//! The operations themselves are pure: they take operand values (and the
//! carry, where relevant) and return the result along with the flags it
//! produces. The instruction helpers decide which of those flags are stored.

use super::Cpu;
use super::state::CpuState;
use super::state::registers::*;
use super::instructions::InsnResult;

use crate::bus::Memory;

/// The result of an ALU operation and the flags it derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome<T> {
	/// The computed value.
	pub result: T,
	/// Zero flag.
	pub z: bool,
	/// Subtract flag.
	pub n: bool,
	/// Half-carry flag.
	pub h: bool,
	/// Carry flag.
	pub c: bool,
}

impl<T> Outcome<T> {
	/// Store all four flags.
	pub fn store_flags(&self, registers: &mut CpuState) {
		registers.set_flag(Flag::Z, self.z);
		registers.set_flag(Flag::N, self.n);
		registers.set_flag(Flag::H, self.h);
		registers.set_flag(Flag::C, self.c);
	}
}

/// Implementation of 8-bit arithmetic operations.
pub mod alu8 {
	use super::*;

	/// The operations sharing the `op A, r` encoding.
	#[derive(Clone, Copy, Debug, PartialEq, Eq)]
	#[allow(missing_docs)]
	pub enum AluOp {
		Add,
		Adc,
		Sub,
		Sbc,
		And,
		Xor,
		Or,
		Cp,
	}

	impl AluOp {
		/// Compute the operation over the accumulator and the operand.
		pub fn apply(self, lhs: u8, rhs: u8, carry: bool) -> Outcome<u8> {
			match self {
				AluOp::Add => add(lhs, rhs, false),
				AluOp::Adc => add(lhs, rhs, carry),
				AluOp::Sub | AluOp::Cp => sub(lhs, rhs, false),
				AluOp::Sbc => sub(lhs, rhs, carry),
				AluOp::And => and(lhs, rhs),
				AluOp::Xor => xor(lhs, rhs),
				AluOp::Or => or(lhs, rhs),
			}
		}

		/// Compare operations does not affect the lhs.
		pub fn stores_result(self) -> bool {
			self != AluOp::Cp
		}
	}

	/// Applies the operation on A and `rhs`, storing all flags.
	fn execute(op: AluOp, cpu: &mut Cpu, rhs: u8) {
		let outcome = op.apply(cpu.registers.a, rhs, cpu.registers.flag(Flag::C));

		outcome.store_flags(&mut cpu.registers);

		if op.stores_result() {
			cpu.registers.a = outcome.result;
		}
	}

	/// Applies the given operation on the A register and another 8-bit register.
	pub fn op_registers(op: AluOp, cpu: &mut Cpu, rhs: Register) -> InsnResult {
		debug_assert!(!rhs.is_wide());

		let right = cpu.registers.get(rhs) as u8;
		execute(op, cpu, right);

		Ok(4)
	}

	/// Applies the given operation on the A register and the given 8-bit immediate.
	pub fn op_imm(op: AluOp, cpu: &mut Cpu) -> InsnResult {
		let imm = cpu.fetch::<u8>()?;
		execute(op, cpu, imm);

		Ok(8)
	}

	/// Applies the given operation on the A register and the value at (HL).
	pub fn op_mem(op: AluOp, cpu: &mut Cpu) -> InsnResult {
		let right: u8 = cpu.mmap.read(cpu.registers.hl())?;
		execute(op, cpu, right);

		Ok(8)
	}

	/// Adds the given arguments and the carry, if set.
	pub fn add(lhs: u8, rhs: u8, carry: bool) -> Outcome<u8> {
		let carry = carry as u16;
		let result_16 = lhs as u16 + rhs as u16 + carry;
		let result_4 = (lhs & 0x0F) as u16 + (rhs & 0x0F) as u16 + carry;

		let result = result_16 as u8;

		Outcome {
			result,
			z: result == 0,
			n: false,
			h: result_4 > 0x0F,
			c: result_16 > 0xFF,
		}
	}

	/// Subtracts `rhs` and the carry, if set, from `lhs`.
	pub fn sub(lhs: u8, rhs: u8, carry: bool) -> Outcome<u8> {
		let carry = carry as i16;
		let result_16 = lhs as i16 - rhs as i16 - carry;
		let result_4 = (lhs & 0x0F) as i16 - (rhs & 0x0F) as i16 - carry;

		let result = result_16 as u8;

		Outcome {
			result,
			z: result == 0,
			n: true,
			h: result_4 < 0,
			c: result_16 < 0,
		}
	}

	#[allow(missing_docs)]
	pub fn and(lhs: u8, rhs: u8) -> Outcome<u8> {
		let result = lhs & rhs;
		Outcome { result, z: result == 0, n: false, h: true, c: false }
	}

	#[allow(missing_docs)]
	pub fn or(lhs: u8, rhs: u8) -> Outcome<u8> {
		let result = lhs | rhs;
		Outcome { result, z: result == 0, n: false, h: false, c: false }
	}

	#[allow(missing_docs)]
	pub fn xor(lhs: u8, rhs: u8) -> Outcome<u8> {
		let result = lhs ^ rhs;
		Outcome { result, z: result == 0, n: false, h: false, c: false }
	}

	/// Result of the shifts and rotations: only the carry is meaningful.
	fn shifted(result: u8, carry: bool) -> Outcome<u8> {
		Outcome { result, z: result == 0, n: false, h: false, c: carry }
	}

	/// Rotates left; bit 7 moves to both bit 0 and the carry.
	pub fn rlc(value: u8) -> Outcome<u8> {
		shifted(value.rotate_left(1), value & 0x80 != 0)
	}

	/// Rotates right; bit 0 moves to both bit 7 and the carry.
	pub fn rrc(value: u8) -> Outcome<u8> {
		shifted(value.rotate_right(1), value & 1 != 0)
	}

	/// Rotates left through the carry flag.
	pub fn rl(value: u8, carry: bool) -> Outcome<u8> {
		shifted((value << 1) | carry as u8, value & 0x80 != 0)
	}

	/// Rotates right through the carry flag.
	pub fn rr(value: u8, carry: bool) -> Outcome<u8> {
		shifted((value >> 1) | ((carry as u8) << 7), value & 1 != 0)
	}

	/// Shifts left, bit 0 is cleared.
	pub fn sla(value: u8) -> Outcome<u8> {
		shifted(value << 1, value & 0x80 != 0)
	}

	/// Arithmetic shift right, bit 7 stays the same.
	pub fn sra(value: u8) -> Outcome<u8> {
		shifted((value >> 1) | (value & 0x80), value & 1 != 0)
	}

	/// Logical shift right, bit 7 is cleared.
	pub fn srl(value: u8) -> Outcome<u8> {
		shifted(value >> 1, value & 1 != 0)
	}

	/// Swaps the lower and higher nibble of the given value.
	pub fn swap(value: u8) -> Outcome<u8> {
		shifted(value.rotate_left(4), false)
	}

	/// Adjusts the accumulator to binary coded decimal after an addition
	/// or a subtraction of two BCD values.
	///
	/// `n`, `h` and `c` are the flags left by that operation. The returned
	/// half-carry is always cleared and `n` is passed through.
	pub fn daa(value: u8, n: bool, h: bool, c: bool) -> Outcome<u8> {
		let mut result = value;
		let mut carry = c;

		if !n {
			// After an addition, adjust if a (half-)carry occurred or if
			// the result is out of bounds.
			if c || result > 0x99 {
				result = result.wrapping_add(0x60);
				carry = true;
			}

			if h || (result & 0x0F) > 0x09 {
				result = result.wrapping_add(0x06);
			}
		} else {
			if c {
				result = result.wrapping_sub(0x60);
			}

			if h {
				result = result.wrapping_sub(0x06);
			}
		}

		Outcome { result, z: result == 0, n, h: false, c: carry }
	}

	/// Increment the given 8-bit register.
	pub fn inc_register(cpu: &mut Cpu, reg: Register) -> InsnResult {
		debug_assert!(!reg.is_wide());

		let value = cpu.registers.get(reg) as u8;
		let outcome = add(value, 1, false);

		cpu.registers.set(reg, outcome.result as u16);
		store_inc_flags(&mut cpu.registers, &outcome);

		Ok(4)
	}

	/// Increment the given 8-bit memory pointed by HL.
	pub fn inc_mem(cpu: &mut Cpu) -> InsnResult {
		let address = cpu.registers.hl();

		let value: u8 = cpu.mmap.read(address)?;
		let outcome = add(value, 1, false);

		cpu.mmap.write(address, outcome.result)?;
		store_inc_flags(&mut cpu.registers, &outcome);

		Ok(12)
	}

	/// Decrement the given 8-bit register.
	pub fn dec_register(cpu: &mut Cpu, reg: Register) -> InsnResult {
		debug_assert!(!reg.is_wide());

		let value = cpu.registers.get(reg) as u8;
		let outcome = sub(value, 1, false);

		cpu.registers.set(reg, outcome.result as u16);
		store_inc_flags(&mut cpu.registers, &outcome);

		Ok(4)
	}

	/// Decrement the given 8-bit memory pointed by HL.
	pub fn dec_mem(cpu: &mut Cpu) -> InsnResult {
		let address = cpu.registers.hl();

		let value: u8 = cpu.mmap.read(address)?;
		let outcome = sub(value, 1, false);

		cpu.mmap.write(address, outcome.result)?;
		store_inc_flags(&mut cpu.registers, &outcome);

		Ok(12)
	}

	/// inc and dec don't affect the carry flag.
	fn store_inc_flags(registers: &mut CpuState, outcome: &Outcome<u8>) {
		registers.set_flag(Flag::Z, outcome.z);
		registers.set_flag(Flag::N, outcome.n);
		registers.set_flag(Flag::H, outcome.h);
	}

}

/// Implementation of 16-bit arithmetic operations.
pub mod alu16 {
	use super::*;

	/// Adds the given arguments; the half carry comes out of bit 11.
	pub fn add(lhs: u16, rhs: u16) -> Outcome<u16> {
		let result_32 = lhs as u32 + rhs as u32;
		let result_12 = (lhs & 0x0FFF) + (rhs & 0x0FFF);

		let result = result_32 as u16;

		Outcome {
			result,
			z: result == 0,
			n: false,
			h: result_12 > 0x0FFF,
			c: result_32 > 0xFFFF,
		}
	}

	/// Adds a signed 8-bit offset to the given word.
	///
	/// The flags come from the unsigned addition of the low byte and the
	/// offset, as for `add SP, e` and `ld HL, SP+e`; z and n are cleared.
	pub fn add_signed_offset(value: u16, offset: u8) -> Outcome<u16> {
		let result = value.wrapping_add(offset as i8 as u16);
		let low = super::alu8::add(value as u8, offset, false);

		Outcome {
			result,
			z: false,
			n: false,
			h: low.h,
			c: low.c,
		}
	}

	/// Adds the given 16-bit register to HL.
	/// In this operation, the zero flag is not affected.
	pub fn add_hl(cpu: &mut Cpu, rhs: Register) -> InsnResult {
		debug_assert!(rhs.is_wide());

		let outcome = add(cpu.registers.hl(), cpu.registers.get(rhs));

		cpu.registers.set_hl(outcome.result);
		cpu.registers.set_flag(Flag::N, outcome.n);
		cpu.registers.set_flag(Flag::H, outcome.h);
		cpu.registers.set_flag(Flag::C, outcome.c);

		Ok(8)
	}

	/// Increment the given 16-bit register.
	pub fn inc_register(cpu: &mut Cpu, reg: Register) -> InsnResult {
		debug_assert!(reg.is_wide());

		let value: u16 = cpu.registers.get(reg);
		cpu.registers.set(reg, value.wrapping_add(1));

		Ok(8)
	}

	/// Decrement the given 16-bit register.
	pub fn dec_register(cpu: &mut Cpu, reg: Register) -> InsnResult {
		debug_assert!(reg.is_wide());

		let value: u16 = cpu.registers.get(reg);
		cpu.registers.set(reg, value.wrapping_sub(1));

		Ok(8)
	}

	#[cfg(test)]
	mod tests {
		use super::*;

		#[test]
		fn test_add() {
			assert_eq!(Outcome { result: 0x1000, z: false, n: false, h: true, c: false }, add(0x0FFF, 0x0001));
			assert_eq!(Outcome { result: 0x0000, z: true, n: false, h: true, c: true }, add(0xFFFF, 0x0001));
			assert!(!add(0x00FF, 0x0001).h);
		}

		#[test]
		fn test_signed_offset() {
			assert_eq!(Outcome { result: 0xFFFD, z: false, n: false, h: true, c: true }, add_signed_offset(0xFFFE, 0xFF));
			assert_eq!(Outcome { result: 0x0000, z: false, n: false, h: true, c: true }, add_signed_offset(0xFFFF, 0x01));
			assert_eq!(Outcome { result: 0x000F, z: false, n: false, h: false, c: true }, add_signed_offset(0x0010, 0xFF));
			assert_eq!(Outcome { result: 0x0100, z: false, n: false, h: true, c: true }, add_signed_offset(0x00F8, 0x08));
		}
	}
}
