// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! Implementation of the Z80-like cpu's instructions.

use super::{Cpu, State};
use super::alu::*;
use super::alu::alu8::AluOp;
use super::decode::{PrefixOp, Prefixed, Target};
use super::interrupts::Ime;
use super::state::registers::*;

use crate::bus::{Memory, MemoryExt};
use crate::GameboyError;

/// Instructions implementations returns the amount of cycles taken,
/// of the relevant error if occured.
pub type InsnResult = Result<usize, GameboyError>;
/// An instruction's method.
pub type Instruction = fn(&mut Cpu) -> InsnResult;

/// A branch condition: the flag to test and its expected state.
type Condition = Option<(Flag, bool)>;

/// Internal utilities for implementing repeating logic once.
mod util {
	use super::*;

	/// Loads an 8-bit value into the given register.
	pub fn load_imm8_to_register(cpu: &mut Cpu,
								 reg: Register) -> InsnResult {

		debug_assert!(!reg.is_wide());

		let value: u8 = cpu.fetch()?;
		cpu.registers.set(reg, value as u16);

		Ok(8)
	}

	/// Loads a 16-bit value into the given register.
	pub fn load_imm16_to_register(cpu: &mut Cpu,
								  reg: Register) -> InsnResult {

		debug_assert!(reg.is_wide());

		let value: u16 = cpu.fetch()?;
		cpu.registers.set(reg, value);

		Ok(12)
	}

	/// Moves the source register to the destination.
	pub fn move_registers(cpu: &mut Cpu,
						  dst: Register,
						  src: Register) -> InsnResult {

		debug_assert_eq!(src.is_wide(), dst.is_wide());

		let value = cpu.registers.get(src);
		cpu.registers.set(dst, value);

		// Wide registers moves are twice as long as short ones.
		if dst.is_wide() {
			Ok(8)
		} else {
			Ok(4)
		}
	}

	/// Reads the memory at the address held by `mem` and stores the value
	/// to the given register.
	pub fn load_mem_to_register(cpu: &mut Cpu,
								reg: Register,
								mem: Register) -> InsnResult {
		debug_assert!(mem.is_wide());
		debug_assert!(!reg.is_wide());

		let address = cpu.registers.get(mem);
		let value: u8 = cpu.mmap.read(address)?;
		cpu.registers.set(reg, value as u16);

		Ok(8)
	}

	/// Writes the given register's value to the memory at the address
	/// represented by the given 16-bit `mem` register (eg. HL).
	pub fn store_register_into_mem(cpu: &mut Cpu,
								   mem: Register,
								   reg: Register) -> InsnResult {
		debug_assert!(mem.is_wide());
		debug_assert!(!reg.is_wide());

		let value: u8 = cpu.registers.get(reg) as u8;
		let address = cpu.registers.get(mem);

		cpu.mmap.write(address, value)?;

		Ok(8)
	}

	/// Places a word on the stack.
	pub fn push_word(cpu: &mut Cpu, value: u16) -> Result<(), GameboyError> {
		let [low, high] = value.to_le_bytes();
		let mut address: u16 = cpu.registers.sp;

		address = address.wrapping_sub(1);
		cpu.mmap.write(address, high)?;

		address = address.wrapping_sub(1);
		cpu.mmap.write(address, low)?;

		cpu.registers.sp = address;

		Ok(())
	}

	/// Takes a word off the stack.
	pub fn pop_word(cpu: &mut Cpu) -> Result<u16, GameboyError> {
		let address: u16 = cpu.registers.sp;
		let value = cpu.mmap.read_word(address)?;

		cpu.registers.sp = address.wrapping_add(2);

		Ok(value)
	}

	/// Places a 16-bit register on the stack.
	pub fn push_nn(cpu: &mut Cpu,
				   reg: Register) -> InsnResult {

		debug_assert!(reg.is_wide());

		let value: u16 = cpu.registers.get(reg);
		push_word(cpu, value)?;

		Ok(16)
	}

	/// Pops a 16-bit register from the stack.
	pub fn pop_nn(cpu: &mut Cpu,
				  reg: Register) -> InsnResult {

		debug_assert!(reg.is_wide());

		let value = pop_word(cpu)?;
		cpu.registers.set(reg, value);

		Ok(12)
	}

	/// Whether a branch should be taken. Unconditional branches always are.
	pub fn taken(cpu: &Cpu, condition: Condition) -> bool {
		match condition {
			Some((flag, expected)) => cpu.registers.flag(flag) == expected,
			None => true,
		}
	}

	/// Adds a signed 8-bit immediate to the program counter.
	pub fn jump_relative(cpu: &mut Cpu,
						 condition: Condition) -> InsnResult {

		let taken = taken(cpu, condition);
		let offset: i8 = cpu.fetch::<u8>()? as i8;

		if taken {
			// Add the offset to the program counter (preserving the offset's sign)
			cpu.registers.pc = cpu.registers.pc.wrapping_add(offset as u16);
			Ok(12)
		} else {
			Ok(8)
		}
	}

	/// Jumps to a 16-bit immediate address.
	pub fn jump_absolute(cpu: &mut Cpu,
						 condition: Condition) -> InsnResult {

		let taken = taken(cpu, condition);
		let dest: u16 = cpu.fetch()?;

		if taken {
			cpu.registers.pc = dest;
			Ok(16)
		} else {
			Ok(12)
		}
	}

	/// Pushes the address of the next instruction and jumps to a 16-bit
	/// immediate address.
	pub fn call(cpu: &mut Cpu,
				condition: Condition) -> InsnResult {

		let taken = taken(cpu, condition);
		let dest: u16 = cpu.fetch()?;

		if taken {
			let next = cpu.registers.pc;
			push_word(cpu, next)?;
			cpu.registers.pc = dest;
			Ok(24)
		} else {
			Ok(12)
		}
	}

	/// Returns from a call if the flag holds the expected state.
	pub fn ret_conditional(cpu: &mut Cpu,
						   flag: Flag,
						   expected_state: bool) -> InsnResult {

		if cpu.registers.flag(flag) == expected_state {
			cpu.registers.pc = pop_word(cpu)?;
			Ok(20)
		} else {
			Ok(8)
		}
	}

	/// Calls one of the fixed restart vectors.
	pub fn rst(cpu: &mut Cpu, vector: u16) -> InsnResult {
		let next = cpu.registers.pc;
		push_word(cpu, next)?;
		cpu.registers.pc = vector;

		Ok(16)
	}

	/// The accumulator-only rotations always clear the zero flag.
	pub fn rotate_accumulator<F>(cpu: &mut Cpu, op: F) -> InsnResult
		where F: FnOnce(u8) -> Outcome<u8>
	{
		let outcome = op(cpu.registers.a);

		cpu.registers.a = outcome.result;
		outcome.store_flags(&mut cpu.registers);
		cpu.registers.set_flag(Flag::Z, false);

		Ok(4)
	}
}

use util::*;

/// Execute an opcode of the prefixed map.
///
/// Register operands take 8 cycles, (HL) operands take 16, except for
/// `bit` which only reads the memory and takes 12.
pub fn execute_prefixed(cpu: &mut Cpu, insn: &Prefixed) -> InsnResult {
	let value: u8 = match insn.target {
		Target::Reg(reg) => cpu.registers.get(reg) as u8,
		Target::HlIndirect => cpu.mmap.read(cpu.registers.hl())?,
	};

	let mask: u8 = 1 << insn.bit;

	let result = match insn.op {
		PrefixOp::Bit => {
			cpu.registers.set_flag(Flag::Z, value & mask == 0);
			cpu.registers.set_flag(Flag::N, false);
			cpu.registers.set_flag(Flag::H, true);

			return match insn.target {
				Target::Reg(_) => Ok(8),
				Target::HlIndirect => Ok(12),
			};
		}
		PrefixOp::Res => value & !mask,
		PrefixOp::Set => value | mask,
		PrefixOp::Shift(op) => {
			let outcome = op.apply(value, cpu.registers.flag(Flag::C));
			outcome.store_flags(&mut cpu.registers);
			outcome.result
		}
	};

	match insn.target {
		Target::Reg(reg) => {
			cpu.registers.set(reg, result as u16);
			Ok(8)
		}
		Target::HlIndirect => {
			cpu.mmap.write(cpu.registers.hl(), result)?;
			Ok(16)
		}
	}
}

/// nop
pub fn opcode_00(_cpu: &mut Cpu) -> InsnResult {
	Ok(4)
}

/// ld BC, nn
pub fn opcode_01(cpu: &mut Cpu) -> InsnResult {
	load_imm16_to_register(cpu, Register::BC)
}

/// ld (BC), A
pub fn opcode_02(cpu: &mut Cpu) -> InsnResult {
	store_register_into_mem(cpu, Register::BC, Register::A)
}

/// inc BC
pub fn opcode_03(cpu: &mut Cpu) -> InsnResult {
	alu16::inc_register(cpu, Register::BC)
}

/// inc B
pub fn opcode_04(cpu: &mut Cpu) -> InsnResult {
	alu8::inc_register(cpu, Register::B)
}

/// dec B
pub fn opcode_05(cpu: &mut Cpu) -> InsnResult {
	alu8::dec_register(cpu, Register::B)
}

/// ld B, n
pub fn opcode_06(cpu: &mut Cpu) -> InsnResult {
	load_imm8_to_register(cpu, Register::B)
}

/// rlca
pub fn opcode_07(cpu: &mut Cpu) -> InsnResult {
	rotate_accumulator(cpu, alu8::rlc)
}

/// ld (nn), SP
pub fn opcode_08(cpu: &mut Cpu) -> InsnResult {
	let address: u16 = cpu.fetch()?;
	let value = cpu.registers.sp;

	cpu.mmap.write_word(address, value)?;

	Ok(20)
}

/// add HL, BC
pub fn opcode_09(cpu: &mut Cpu) -> InsnResult {
	alu16::add_hl(cpu, Register::BC)
}

/// ld A, (BC)
pub fn opcode_0a(cpu: &mut Cpu) -> InsnResult {
	load_mem_to_register(cpu, Register::A, Register::BC)
}

/// dec BC
pub fn opcode_0b(cpu: &mut Cpu) -> InsnResult {
	alu16::dec_register(cpu, Register::BC)
}

/// inc C
pub fn opcode_0c(cpu: &mut Cpu) -> InsnResult {
	alu8::inc_register(cpu, Register::C)
}

/// dec C
pub fn opcode_0d(cpu: &mut Cpu) -> InsnResult {
	alu8::dec_register(cpu, Register::C)
}

/// ld C, n
pub fn opcode_0e(cpu: &mut Cpu) -> InsnResult {
	load_imm8_to_register(cpu, Register::C)
}

/// rrca
pub fn opcode_0f(cpu: &mut Cpu) -> InsnResult {
	rotate_accumulator(cpu, alu8::rrc)
}

/// stop
pub fn opcode_10(cpu: &mut Cpu) -> InsnResult {
	log::debug!("stop at {:#06x}", cpu.registers.pc.wrapping_sub(1));
	cpu.state = State::Stopped;

	Ok(4)
}

/// ld DE, nn
pub fn opcode_11(cpu: &mut Cpu) -> InsnResult {
	load_imm16_to_register(cpu, Register::DE)
}

/// ld (DE), A
pub fn opcode_12(cpu: &mut Cpu) -> InsnResult {
	store_register_into_mem(cpu, Register::DE, Register::A)
}

/// inc DE
pub fn opcode_13(cpu: &mut Cpu) -> InsnResult {
	alu16::inc_register(cpu, Register::DE)
}

/// inc D
pub fn opcode_14(cpu: &mut Cpu) -> InsnResult {
	alu8::inc_register(cpu, Register::D)
}

/// dec D
pub fn opcode_15(cpu: &mut Cpu) -> InsnResult {
	alu8::dec_register(cpu, Register::D)
}

/// ld D, n
pub fn opcode_16(cpu: &mut Cpu) -> InsnResult {
	load_imm8_to_register(cpu, Register::D)
}

/// rla
pub fn opcode_17(cpu: &mut Cpu) -> InsnResult {
	let carry = cpu.registers.flag(Flag::C);
	rotate_accumulator(cpu, |value| alu8::rl(value, carry))
}

/// jr n
pub fn opcode_18(cpu: &mut Cpu) -> InsnResult {
	jump_relative(cpu, None)
}

/// add HL, DE
pub fn opcode_19(cpu: &mut Cpu) -> InsnResult {
	alu16::add_hl(cpu, Register::DE)
}

/// ld A, (DE)
pub fn opcode_1a(cpu: &mut Cpu) -> InsnResult {
	load_mem_to_register(cpu, Register::A, Register::DE)
}

/// dec DE
pub fn opcode_1b(cpu: &mut Cpu) -> InsnResult {
	alu16::dec_register(cpu, Register::DE)
}

/// inc E
pub fn opcode_1c(cpu: &mut Cpu) -> InsnResult {
	alu8::inc_register(cpu, Register::E)
}

/// dec E
pub fn opcode_1d(cpu: &mut Cpu) -> InsnResult {
	alu8::dec_register(cpu, Register::E)
}

/// ld E, n
pub fn opcode_1e(cpu: &mut Cpu) -> InsnResult {
	load_imm8_to_register(cpu, Register::E)
}

/// rra
pub fn opcode_1f(cpu: &mut Cpu) -> InsnResult {
	let carry = cpu.registers.flag(Flag::C);
	rotate_accumulator(cpu, |value| alu8::rr(value, carry))
}

/// jr NZ, n
pub fn opcode_20(cpu: &mut Cpu) -> InsnResult {
	jump_relative(cpu, Some((Flag::Z, false)))
}

/// ld HL, nn
pub fn opcode_21(cpu: &mut Cpu) -> InsnResult {
	load_imm16_to_register(cpu, Register::HL)
}

/// ld (HL+), A
pub fn opcode_22(cpu: &mut Cpu) -> InsnResult {
	let address = cpu.registers.hl();
	store_register_into_mem(cpu, Register::HL, Register::A)?;
	cpu.registers.set_hl(address.wrapping_add(1));

	Ok(8)
}

/// inc HL
pub fn opcode_23(cpu: &mut Cpu) -> InsnResult {
	alu16::inc_register(cpu, Register::HL)
}

/// inc H
pub fn opcode_24(cpu: &mut Cpu) -> InsnResult {
	alu8::inc_register(cpu, Register::H)
}

/// dec H
pub fn opcode_25(cpu: &mut Cpu) -> InsnResult {
	alu8::dec_register(cpu, Register::H)
}

/// ld H, n
pub fn opcode_26(cpu: &mut Cpu) -> InsnResult {
	load_imm8_to_register(cpu, Register::H)
}

/// daa
pub fn opcode_27(cpu: &mut Cpu) -> InsnResult {
	let outcome = alu8::daa(
		cpu.registers.a,
		cpu.registers.flag(Flag::N),
		cpu.registers.flag(Flag::H),
		cpu.registers.flag(Flag::C));

	cpu.registers.a = outcome.result;
	outcome.store_flags(&mut cpu.registers);

	Ok(4)
}

/// jr Z, n
pub fn opcode_28(cpu: &mut Cpu) -> InsnResult {
	jump_relative(cpu, Some((Flag::Z, true)))
}

/// add HL, HL
pub fn opcode_29(cpu: &mut Cpu) -> InsnResult {
	alu16::add_hl(cpu, Register::HL)
}

/// ld A, (HL+)
pub fn opcode_2a(cpu: &mut Cpu) -> InsnResult {
	let address = cpu.registers.hl();
	load_mem_to_register(cpu, Register::A, Register::HL)?;
	cpu.registers.set_hl(address.wrapping_add(1));

	Ok(8)
}

/// dec HL
pub fn opcode_2b(cpu: &mut Cpu) -> InsnResult {
	alu16::dec_register(cpu, Register::HL)
}

/// inc L
pub fn opcode_2c(cpu: &mut Cpu) -> InsnResult {
	alu8::inc_register(cpu, Register::L)
}

/// dec L
pub fn opcode_2d(cpu: &mut Cpu) -> InsnResult {
	alu8::dec_register(cpu, Register::L)
}

/// ld L, n
pub fn opcode_2e(cpu: &mut Cpu) -> InsnResult {
	load_imm8_to_register(cpu, Register::L)
}

/// cpl
pub fn opcode_2f(cpu: &mut Cpu) -> InsnResult {
	cpu.registers.a = !cpu.registers.a;

	cpu.registers.set_flag(Flag::N, true);
	cpu.registers.set_flag(Flag::H, true);

	Ok(4)
}

/// jr NC, n
pub fn opcode_30(cpu: &mut Cpu) -> InsnResult {
	jump_relative(cpu, Some((Flag::C, false)))
}

/// ld SP, nn
pub fn opcode_31(cpu: &mut Cpu) -> InsnResult {
	load_imm16_to_register(cpu, Register::SP)
}

/// ld (HL-), A
pub fn opcode_32(cpu: &mut Cpu) -> InsnResult {
	let address = cpu.registers.hl();
	store_register_into_mem(cpu, Register::HL, Register::A)?;
	cpu.registers.set_hl(address.wrapping_sub(1));

	Ok(8)
}

/// inc SP
pub fn opcode_33(cpu: &mut Cpu) -> InsnResult {
	alu16::inc_register(cpu, Register::SP)
}

/// inc (HL)
pub fn opcode_34(cpu: &mut Cpu) -> InsnResult {
	alu8::inc_mem(cpu)
}

/// dec (HL)
pub fn opcode_35(cpu: &mut Cpu) -> InsnResult {
	alu8::dec_mem(cpu)
}

/// ld (HL), n
pub fn opcode_36(cpu: &mut Cpu) -> InsnResult {
	let value: u8 = cpu.fetch()?;
	cpu.mmap.write(cpu.registers.hl(), value)?;

	Ok(12)
}

/// scf
pub fn opcode_37(cpu: &mut Cpu) -> InsnResult {
	cpu.registers.set_flag(Flag::N, false);
	cpu.registers.set_flag(Flag::H, false);
	cpu.registers.set_flag(Flag::C, true);

	Ok(4)
}

/// jr C, n
pub fn opcode_38(cpu: &mut Cpu) -> InsnResult {
	jump_relative(cpu, Some((Flag::C, true)))
}

/// add HL, SP
pub fn opcode_39(cpu: &mut Cpu) -> InsnResult {
	alu16::add_hl(cpu, Register::SP)
}

/// ld A, (HL-)
pub fn opcode_3a(cpu: &mut Cpu) -> InsnResult {
	let address = cpu.registers.hl();
	load_mem_to_register(cpu, Register::A, Register::HL)?;
	cpu.registers.set_hl(address.wrapping_sub(1));

	Ok(8)
}

/// dec SP
pub fn opcode_3b(cpu: &mut Cpu) -> InsnResult {
	alu16::dec_register(cpu, Register::SP)
}

/// inc A
pub fn opcode_3c(cpu: &mut Cpu) -> InsnResult {
	alu8::inc_register(cpu, Register::A)
}

/// dec A
pub fn opcode_3d(cpu: &mut Cpu) -> InsnResult {
	alu8::dec_register(cpu, Register::A)
}

/// ld A, n
pub fn opcode_3e(cpu: &mut Cpu) -> InsnResult {
	load_imm8_to_register(cpu, Register::A)
}

/// ccf
pub fn opcode_3f(cpu: &mut Cpu) -> InsnResult {
	let carry = cpu.registers.flag(Flag::C);

	cpu.registers.set_flag(Flag::N, false);
	cpu.registers.set_flag(Flag::H, false);
	cpu.registers.set_flag(Flag::C, !carry);

	Ok(4)
}

/// ld B, B
pub fn opcode_40(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::B, Register::B)
}

/// ld B, C
pub fn opcode_41(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::B, Register::C)
}

/// ld B, D
pub fn opcode_42(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::B, Register::D)
}

/// ld B, E
pub fn opcode_43(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::B, Register::E)
}

/// ld B, H
pub fn opcode_44(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::B, Register::H)
}

/// ld B, L
pub fn opcode_45(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::B, Register::L)
}

/// ld B, (HL)
pub fn opcode_46(cpu: &mut Cpu) -> InsnResult {
	load_mem_to_register(cpu, Register::B, Register::HL)
}

/// ld B, A
pub fn opcode_47(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::B, Register::A)
}

/// ld C, B
pub fn opcode_48(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::C, Register::B)
}

/// ld C, C
pub fn opcode_49(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::C, Register::C)
}

/// ld C, D
pub fn opcode_4a(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::C, Register::D)
}

/// ld C, E
pub fn opcode_4b(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::C, Register::E)
}

/// ld C, H
pub fn opcode_4c(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::C, Register::H)
}

/// ld C, L
pub fn opcode_4d(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::C, Register::L)
}

/// ld C, (HL)
pub fn opcode_4e(cpu: &mut Cpu) -> InsnResult {
	load_mem_to_register(cpu, Register::C, Register::HL)
}

/// ld C, A
pub fn opcode_4f(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::C, Register::A)
}

/// ld D, B
pub fn opcode_50(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::D, Register::B)
}

/// ld D, C
pub fn opcode_51(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::D, Register::C)
}

/// ld D, D
pub fn opcode_52(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::D, Register::D)
}

/// ld D, E
pub fn opcode_53(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::D, Register::E)
}

/// ld D, H
pub fn opcode_54(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::D, Register::H)
}

/// ld D, L
pub fn opcode_55(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::D, Register::L)
}

/// ld D, (HL)
pub fn opcode_56(cpu: &mut Cpu) -> InsnResult {
	load_mem_to_register(cpu, Register::D, Register::HL)
}

/// ld D, A
pub fn opcode_57(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::D, Register::A)
}

/// ld E, B
pub fn opcode_58(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::E, Register::B)
}

/// ld E, C
pub fn opcode_59(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::E, Register::C)
}

/// ld E, D
pub fn opcode_5a(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::E, Register::D)
}

/// ld E, E
pub fn opcode_5b(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::E, Register::E)
}

/// ld E, H
pub fn opcode_5c(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::E, Register::H)
}

/// ld E, L
pub fn opcode_5d(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::E, Register::L)
}

/// ld E, (HL)
pub fn opcode_5e(cpu: &mut Cpu) -> InsnResult {
	load_mem_to_register(cpu, Register::E, Register::HL)
}

/// ld E, A
pub fn opcode_5f(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::E, Register::A)
}

/// ld H, B
pub fn opcode_60(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::H, Register::B)
}

/// ld H, C
pub fn opcode_61(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::H, Register::C)
}

/// ld H, D
pub fn opcode_62(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::H, Register::D)
}

/// ld H, E
pub fn opcode_63(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::H, Register::E)
}

/// ld H, H
pub fn opcode_64(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::H, Register::H)
}

/// ld H, L
pub fn opcode_65(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::H, Register::L)
}

/// ld H, (HL)
pub fn opcode_66(cpu: &mut Cpu) -> InsnResult {
	load_mem_to_register(cpu, Register::H, Register::HL)
}

/// ld H, A
pub fn opcode_67(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::H, Register::A)
}

/// ld L, B
pub fn opcode_68(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::L, Register::B)
}

/// ld L, C
pub fn opcode_69(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::L, Register::C)
}

/// ld L, D
pub fn opcode_6a(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::L, Register::D)
}

/// ld L, E
pub fn opcode_6b(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::L, Register::E)
}

/// ld L, H
pub fn opcode_6c(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::L, Register::H)
}

/// ld L, L
pub fn opcode_6d(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::L, Register::L)
}

/// ld L, (HL)
pub fn opcode_6e(cpu: &mut Cpu) -> InsnResult {
	load_mem_to_register(cpu, Register::L, Register::HL)
}

/// ld L, A
pub fn opcode_6f(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::L, Register::A)
}

/// ld (HL), B
pub fn opcode_70(cpu: &mut Cpu) -> InsnResult {
	store_register_into_mem(cpu, Register::HL, Register::B)
}

/// ld (HL), C
pub fn opcode_71(cpu: &mut Cpu) -> InsnResult {
	store_register_into_mem(cpu, Register::HL, Register::C)
}

/// ld (HL), D
pub fn opcode_72(cpu: &mut Cpu) -> InsnResult {
	store_register_into_mem(cpu, Register::HL, Register::D)
}

/// ld (HL), E
pub fn opcode_73(cpu: &mut Cpu) -> InsnResult {
	store_register_into_mem(cpu, Register::HL, Register::E)
}

/// ld (HL), H
pub fn opcode_74(cpu: &mut Cpu) -> InsnResult {
	store_register_into_mem(cpu, Register::HL, Register::H)
}

/// ld (HL), L
pub fn opcode_75(cpu: &mut Cpu) -> InsnResult {
	store_register_into_mem(cpu, Register::HL, Register::L)
}

/// halt
///
/// The halt bug (the byte after `halt` being read twice when interrupts
/// are pending with IME disabled) is not modelled.
pub fn opcode_76(cpu: &mut Cpu) -> InsnResult {
	log::debug!("halt at {:#06x}", cpu.registers.pc.wrapping_sub(1));
	cpu.state = State::Halted;

	Ok(4)
}

/// ld (HL), A
pub fn opcode_77(cpu: &mut Cpu) -> InsnResult {
	store_register_into_mem(cpu, Register::HL, Register::A)
}

/// ld A, B
pub fn opcode_78(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::A, Register::B)
}

/// ld A, C
pub fn opcode_79(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::A, Register::C)
}

/// ld A, D
pub fn opcode_7a(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::A, Register::D)
}

/// ld A, E
pub fn opcode_7b(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::A, Register::E)
}

/// ld A, H
pub fn opcode_7c(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::A, Register::H)
}

/// ld A, L
pub fn opcode_7d(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::A, Register::L)
}

/// ld A, (HL)
pub fn opcode_7e(cpu: &mut Cpu) -> InsnResult {
	load_mem_to_register(cpu, Register::A, Register::HL)
}

/// ld A, A
pub fn opcode_7f(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::A, Register::A)
}

/// add A, B
pub fn opcode_80(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Add, cpu, Register::B)
}

/// add A, C
pub fn opcode_81(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Add, cpu, Register::C)
}

/// add A, D
pub fn opcode_82(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Add, cpu, Register::D)
}

/// add A, E
pub fn opcode_83(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Add, cpu, Register::E)
}

/// add A, H
pub fn opcode_84(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Add, cpu, Register::H)
}

/// add A, L
pub fn opcode_85(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Add, cpu, Register::L)
}

/// add A, (HL)
pub fn opcode_86(cpu: &mut Cpu) -> InsnResult {
	alu8::op_mem(AluOp::Add, cpu)
}

/// add A, A
pub fn opcode_87(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Add, cpu, Register::A)
}

/// adc A, B
pub fn opcode_88(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Adc, cpu, Register::B)
}

/// adc A, C
pub fn opcode_89(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Adc, cpu, Register::C)
}

/// adc A, D
pub fn opcode_8a(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Adc, cpu, Register::D)
}

/// adc A, E
pub fn opcode_8b(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Adc, cpu, Register::E)
}

/// adc A, H
pub fn opcode_8c(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Adc, cpu, Register::H)
}

/// adc A, L
pub fn opcode_8d(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Adc, cpu, Register::L)
}

/// adc A, (HL)
pub fn opcode_8e(cpu: &mut Cpu) -> InsnResult {
	alu8::op_mem(AluOp::Adc, cpu)
}

/// adc A, A
pub fn opcode_8f(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Adc, cpu, Register::A)
}

/// sub A, B
pub fn opcode_90(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sub, cpu, Register::B)
}

/// sub A, C
pub fn opcode_91(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sub, cpu, Register::C)
}

/// sub A, D
pub fn opcode_92(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sub, cpu, Register::D)
}

/// sub A, E
pub fn opcode_93(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sub, cpu, Register::E)
}

/// sub A, H
pub fn opcode_94(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sub, cpu, Register::H)
}

/// sub A, L
pub fn opcode_95(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sub, cpu, Register::L)
}

/// sub A, (HL)
pub fn opcode_96(cpu: &mut Cpu) -> InsnResult {
	alu8::op_mem(AluOp::Sub, cpu)
}

/// sub A, A
pub fn opcode_97(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sub, cpu, Register::A)
}

/// sbc A, B
pub fn opcode_98(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sbc, cpu, Register::B)
}

/// sbc A, C
pub fn opcode_99(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sbc, cpu, Register::C)
}

/// sbc A, D
pub fn opcode_9a(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sbc, cpu, Register::D)
}

/// sbc A, E
pub fn opcode_9b(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sbc, cpu, Register::E)
}

/// sbc A, H
pub fn opcode_9c(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sbc, cpu, Register::H)
}

/// sbc A, L
pub fn opcode_9d(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sbc, cpu, Register::L)
}

/// sbc A, (HL)
pub fn opcode_9e(cpu: &mut Cpu) -> InsnResult {
	alu8::op_mem(AluOp::Sbc, cpu)
}

/// sbc A, A
pub fn opcode_9f(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Sbc, cpu, Register::A)
}

/// and A, B
pub fn opcode_a0(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::And, cpu, Register::B)
}

/// and A, C
pub fn opcode_a1(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::And, cpu, Register::C)
}

/// and A, D
pub fn opcode_a2(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::And, cpu, Register::D)
}

/// and A, E
pub fn opcode_a3(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::And, cpu, Register::E)
}

/// and A, H
pub fn opcode_a4(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::And, cpu, Register::H)
}

/// and A, L
pub fn opcode_a5(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::And, cpu, Register::L)
}

/// and A, (HL)
pub fn opcode_a6(cpu: &mut Cpu) -> InsnResult {
	alu8::op_mem(AluOp::And, cpu)
}

/// and A, A
pub fn opcode_a7(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::And, cpu, Register::A)
}

/// xor A, B
pub fn opcode_a8(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Xor, cpu, Register::B)
}

/// xor A, C
pub fn opcode_a9(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Xor, cpu, Register::C)
}

/// xor A, D
pub fn opcode_aa(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Xor, cpu, Register::D)
}

/// xor A, E
pub fn opcode_ab(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Xor, cpu, Register::E)
}

/// xor A, H
pub fn opcode_ac(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Xor, cpu, Register::H)
}

/// xor A, L
pub fn opcode_ad(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Xor, cpu, Register::L)
}

/// xor A, (HL)
pub fn opcode_ae(cpu: &mut Cpu) -> InsnResult {
	alu8::op_mem(AluOp::Xor, cpu)
}

/// xor A, A
pub fn opcode_af(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Xor, cpu, Register::A)
}

/// or A, B
pub fn opcode_b0(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Or, cpu, Register::B)
}

/// or A, C
pub fn opcode_b1(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Or, cpu, Register::C)
}

/// or A, D
pub fn opcode_b2(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Or, cpu, Register::D)
}

/// or A, E
pub fn opcode_b3(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Or, cpu, Register::E)
}

/// or A, H
pub fn opcode_b4(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Or, cpu, Register::H)
}

/// or A, L
pub fn opcode_b5(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Or, cpu, Register::L)
}

/// or A, (HL)
pub fn opcode_b6(cpu: &mut Cpu) -> InsnResult {
	alu8::op_mem(AluOp::Or, cpu)
}

/// or A, A
pub fn opcode_b7(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Or, cpu, Register::A)
}

/// cp A, B
pub fn opcode_b8(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Cp, cpu, Register::B)
}

/// cp A, C
pub fn opcode_b9(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Cp, cpu, Register::C)
}

/// cp A, D
pub fn opcode_ba(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Cp, cpu, Register::D)
}

/// cp A, E
pub fn opcode_bb(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Cp, cpu, Register::E)
}

/// cp A, H
pub fn opcode_bc(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Cp, cpu, Register::H)
}

/// cp A, L
pub fn opcode_bd(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Cp, cpu, Register::L)
}

/// cp A, (HL)
pub fn opcode_be(cpu: &mut Cpu) -> InsnResult {
	alu8::op_mem(AluOp::Cp, cpu)
}

/// cp A, A
pub fn opcode_bf(cpu: &mut Cpu) -> InsnResult {
	alu8::op_registers(AluOp::Cp, cpu, Register::A)
}

/// ret NZ
pub fn opcode_c0(cpu: &mut Cpu) -> InsnResult {
	ret_conditional(cpu, Flag::Z, false)
}

/// pop BC
pub fn opcode_c1(cpu: &mut Cpu) -> InsnResult {
	pop_nn(cpu, Register::BC)
}

/// jp NZ, nn
pub fn opcode_c2(cpu: &mut Cpu) -> InsnResult {
	jump_absolute(cpu, Some((Flag::Z, false)))
}

/// jp nn
pub fn opcode_c3(cpu: &mut Cpu) -> InsnResult {
	jump_absolute(cpu, None)
}

/// call NZ, nn
pub fn opcode_c4(cpu: &mut Cpu) -> InsnResult {
	call(cpu, Some((Flag::Z, false)))
}

/// push BC
pub fn opcode_c5(cpu: &mut Cpu) -> InsnResult {
	push_nn(cpu, Register::BC)
}

/// add A, n
pub fn opcode_c6(cpu: &mut Cpu) -> InsnResult {
	alu8::op_imm(AluOp::Add, cpu)
}

/// rst 00H
pub fn opcode_c7(cpu: &mut Cpu) -> InsnResult {
	rst(cpu, 0x00)
}

/// ret Z
pub fn opcode_c8(cpu: &mut Cpu) -> InsnResult {
	ret_conditional(cpu, Flag::Z, true)
}

/// ret
pub fn opcode_c9(cpu: &mut Cpu) -> InsnResult {
	cpu.registers.pc = pop_word(cpu)?;

	Ok(16)
}

/// jp Z, nn
pub fn opcode_ca(cpu: &mut Cpu) -> InsnResult {
	jump_absolute(cpu, Some((Flag::Z, true)))
}

/// prefix
pub fn opcode_cb(cpu: &mut Cpu) -> InsnResult {
	let opcode: u8 = cpu.fetch()?;
	let insn = Cpu::decode_cb(opcode);

	execute_prefixed(cpu, insn)
}

/// call Z, nn
pub fn opcode_cc(cpu: &mut Cpu) -> InsnResult {
	call(cpu, Some((Flag::Z, true)))
}

/// call nn
pub fn opcode_cd(cpu: &mut Cpu) -> InsnResult {
	call(cpu, None)
}

/// adc A, n
pub fn opcode_ce(cpu: &mut Cpu) -> InsnResult {
	alu8::op_imm(AluOp::Adc, cpu)
}

/// rst 08H
pub fn opcode_cf(cpu: &mut Cpu) -> InsnResult {
	rst(cpu, 0x08)
}

/// ret NC
pub fn opcode_d0(cpu: &mut Cpu) -> InsnResult {
	ret_conditional(cpu, Flag::C, false)
}

/// pop DE
pub fn opcode_d1(cpu: &mut Cpu) -> InsnResult {
	pop_nn(cpu, Register::DE)
}

/// jp NC, nn
pub fn opcode_d2(cpu: &mut Cpu) -> InsnResult {
	jump_absolute(cpu, Some((Flag::C, false)))
}

/// call NC, nn
pub fn opcode_d4(cpu: &mut Cpu) -> InsnResult {
	call(cpu, Some((Flag::C, false)))
}

/// push DE
pub fn opcode_d5(cpu: &mut Cpu) -> InsnResult {
	push_nn(cpu, Register::DE)
}

/// sub A, n
pub fn opcode_d6(cpu: &mut Cpu) -> InsnResult {
	alu8::op_imm(AluOp::Sub, cpu)
}

/// rst 10H
pub fn opcode_d7(cpu: &mut Cpu) -> InsnResult {
	rst(cpu, 0x10)
}

/// ret C
pub fn opcode_d8(cpu: &mut Cpu) -> InsnResult {
	ret_conditional(cpu, Flag::C, true)
}

/// reti
pub fn opcode_d9(cpu: &mut Cpu) -> InsnResult {
	cpu.registers.pc = pop_word(cpu)?;
	cpu.ime = Ime::Enabled;

	Ok(16)
}

/// jp C, nn
pub fn opcode_da(cpu: &mut Cpu) -> InsnResult {
	jump_absolute(cpu, Some((Flag::C, true)))
}

/// call C, nn
pub fn opcode_dc(cpu: &mut Cpu) -> InsnResult {
	call(cpu, Some((Flag::C, true)))
}

/// sbc A, n
pub fn opcode_de(cpu: &mut Cpu) -> InsnResult {
	alu8::op_imm(AluOp::Sbc, cpu)
}

/// rst 18H
pub fn opcode_df(cpu: &mut Cpu) -> InsnResult {
	rst(cpu, 0x18)
}

/// ld (n), A
pub fn opcode_e0(cpu: &mut Cpu) -> InsnResult {
	let low_byte = cpu.fetch::<u8>()? as u16;
	let address: u16 = 0xFF00 | low_byte;

	cpu.mmap.write(address, cpu.registers.a)?;

	Ok(12)
}

/// pop HL
pub fn opcode_e1(cpu: &mut Cpu) -> InsnResult {
	pop_nn(cpu, Register::HL)
}

/// ld (C), A
pub fn opcode_e2(cpu: &mut Cpu) -> InsnResult {
	let address: u16 = 0xFF00 | cpu.registers.c as u16;

	cpu.mmap.write(address, cpu.registers.a)?;

	Ok(8)
}

/// push HL
pub fn opcode_e5(cpu: &mut Cpu) -> InsnResult {
	push_nn(cpu, Register::HL)
}

/// and A, n
pub fn opcode_e6(cpu: &mut Cpu) -> InsnResult {
	alu8::op_imm(AluOp::And, cpu)
}

/// rst 20H
pub fn opcode_e7(cpu: &mut Cpu) -> InsnResult {
	rst(cpu, 0x20)
}

/// add SP, n
pub fn opcode_e8(cpu: &mut Cpu) -> InsnResult {
	let offset: u8 = cpu.fetch()?;
	let outcome = alu16::add_signed_offset(cpu.registers.sp, offset);

	cpu.registers.sp = outcome.result;
	outcome.store_flags(&mut cpu.registers);

	Ok(16)
}

/// jp HL
pub fn opcode_e9(cpu: &mut Cpu) -> InsnResult {
	cpu.registers.pc = cpu.registers.hl();

	Ok(4)
}

/// ld (nn), A
pub fn opcode_ea(cpu: &mut Cpu) -> InsnResult {
	let address: u16 = cpu.fetch::<u16>()?;

	cpu.mmap.write(address, cpu.registers.a)?;

	Ok(16)
}

/// xor A, n
pub fn opcode_ee(cpu: &mut Cpu) -> InsnResult {
	alu8::op_imm(AluOp::Xor, cpu)
}

/// rst 28H
pub fn opcode_ef(cpu: &mut Cpu) -> InsnResult {
	rst(cpu, 0x28)
}

/// ld A, (n)
pub fn opcode_f0(cpu: &mut Cpu) -> InsnResult {
	let low_byte = cpu.fetch::<u8>()? as u16;
	let address: u16 = 0xFF00 | low_byte;

	cpu.registers.a = cpu.mmap.read(address)?;

	Ok(12)
}

/// pop AF
pub fn opcode_f1(cpu: &mut Cpu) -> InsnResult {
	pop_nn(cpu, Register::AF)
}

/// ld A, (C)
pub fn opcode_f2(cpu: &mut Cpu) -> InsnResult {
	let address: u16 = 0xFF00 | cpu.registers.c as u16;

	cpu.registers.a = cpu.mmap.read(address)?;

	Ok(8)
}

/// di
pub fn opcode_f3(cpu: &mut Cpu) -> InsnResult {
	cpu.ime = Ime::Disabled;

	Ok(4)
}

/// push AF
pub fn opcode_f5(cpu: &mut Cpu) -> InsnResult {
	push_nn(cpu, Register::AF)
}

/// or A, n
pub fn opcode_f6(cpu: &mut Cpu) -> InsnResult {
	alu8::op_imm(AluOp::Or, cpu)
}

/// rst 30H
pub fn opcode_f7(cpu: &mut Cpu) -> InsnResult {
	rst(cpu, 0x30)
}

/// ld HL, SP+n
pub fn opcode_f8(cpu: &mut Cpu) -> InsnResult {
	let offset: u8 = cpu.fetch()?;
	let outcome = alu16::add_signed_offset(cpu.registers.sp, offset);

	cpu.registers.set_hl(outcome.result);
	outcome.store_flags(&mut cpu.registers);

	Ok(12)
}

/// ld SP, HL
pub fn opcode_f9(cpu: &mut Cpu) -> InsnResult {
	move_registers(cpu, Register::SP, Register::HL)
}

/// ld A, (nn)
pub fn opcode_fa(cpu: &mut Cpu) -> InsnResult {
	let address: u16 = cpu.fetch::<u16>()?;

	cpu.registers.a = cpu.mmap.read(address)?;

	Ok(16)
}

/// ei
pub fn opcode_fb(cpu: &mut Cpu) -> InsnResult {
	// Takes effect after the next instruction.
	cpu.ime = Ime::Enabling;

	Ok(4)
}

/// cp A, n
pub fn opcode_fe(cpu: &mut Cpu) -> InsnResult {
	alu8::op_imm(AluOp::Cp, cpu)
}

/// rst 38H
pub fn opcode_ff(cpu: &mut Cpu) -> InsnResult {
	rst(cpu, 0x38)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bus::buffer::Buffer;
	use crate::cpu::state::CpuState;

	/// Creates a cpu over a flat 64KiB ram, with the program placed at 0x100.
	fn cpu_with(program: &[u8]) -> Result<Cpu, GameboyError> {
		let mut ram = Buffer::new(0x10000);
		ram.write_all(0x100, program)?;

		let mut cpu = Cpu::new(Box::new(ram));
		cpu.registers.pc = 0x100;
		cpu.registers.sp = 0xFFFE;

		Ok(cpu)
	}

	#[test]
	fn test_nop() -> Result<(), GameboyError> {
		let mut cpu = cpu_with(&[0x00])?;
		cpu.registers.set_af(0x12F0);
		cpu.registers.set_hl(0xC000);

		let before: CpuState = cpu.registers.clone();
		assert_eq!(4, cpu.step()?);

		let mut expected = before;
		expected.pc = 0x101;
		assert_eq!(expected, cpu.registers);

		Ok(())
	}

	#[test]
	fn test_inc_b() -> Result<(), GameboyError> {
		let mut cpu = cpu_with(&[0x04])?;
		cpu.registers.b = 0x0F;
		cpu.registers.set_flag(Flag::N, true);
		cpu.registers.set_flag(Flag::C, true);

		assert_eq!(4, cpu.step()?);
		assert_eq!(0x10, cpu.registers.b);
		assert_eq!(0x101, cpu.registers.pc);
		assert!(!cpu.registers.flag(Flag::Z));
		assert!(!cpu.registers.flag(Flag::N));
		assert!(cpu.registers.flag(Flag::H));
		// Untouched by inc.
		assert!(cpu.registers.flag(Flag::C));

		Ok(())
	}

	#[test]
	fn test_dec_mem() -> Result<(), GameboyError> {
		// ld HL, 0xC000; dec (HL)
		let mut cpu = cpu_with(&[0x21, 0x00, 0xC0, 0x35])?;

		assert_eq!(12, cpu.step()?);
		assert_eq!(12, cpu.step()?);
		assert_eq!(0xFF, cpu.mmap.read(0xC000)?);
		assert!(cpu.registers.flag(Flag::N));
		assert!(cpu.registers.flag(Flag::H));
		assert!(!cpu.registers.flag(Flag::Z));

		Ok(())
	}

	#[test]
	fn test_call_and_ret() -> Result<(), GameboyError> {
		// call 0x1234
		let mut cpu = cpu_with(&[0xCD, 0x34, 0x12])?;
		cpu.mmap.write(0x1234, 0xC9)?;

		assert_eq!(24, cpu.step()?);
		assert_eq!(0x1234, cpu.registers.pc);
		assert_eq!(0xFFFC, cpu.registers.sp);
		assert_eq!(0x03, cpu.mmap.read(0xFFFC)?);
		assert_eq!(0x01, cpu.mmap.read(0xFFFD)?);

		// ret
		assert_eq!(16, cpu.step()?);
		assert_eq!(0x103, cpu.registers.pc);
		assert_eq!(0xFFFE, cpu.registers.sp);

		Ok(())
	}

	#[test]
	fn test_conditional_durations() -> Result<(), GameboyError> {
		// jr NZ, +2 (taken); jr Z, +0 (not taken)
		let mut cpu = cpu_with(&[0x20, 0x02, 0x00, 0x00, 0x28, 0x00])?;
		assert_eq!(12, cpu.step()?);
		assert_eq!(0x104, cpu.registers.pc);
		assert_eq!(8, cpu.step()?);
		assert_eq!(0x106, cpu.registers.pc);

		// jp C, nn (not taken); jp NC, 0x0200 (taken)
		let mut cpu = cpu_with(&[0xDA, 0x00, 0x02, 0xD2, 0x00, 0x02])?;
		assert_eq!(12, cpu.step()?);
		assert_eq!(0x103, cpu.registers.pc);
		assert_eq!(16, cpu.step()?);
		assert_eq!(0x200, cpu.registers.pc);

		// call Z, nn (not taken); ret NZ (taken)
		let mut cpu = cpu_with(&[0xCC, 0x00, 0x02, 0xC0])?;
		cpu.mmap.write_word(0xFFFC, 0x0300)?;
		cpu.registers.sp = 0xFFFC;
		assert_eq!(12, cpu.step()?);
		assert_eq!(0xFFFC, cpu.registers.sp);
		assert_eq!(20, cpu.step()?);
		assert_eq!(0x300, cpu.registers.pc);

		// ret C (not taken)
		let mut cpu = cpu_with(&[0xD8])?;
		assert_eq!(8, cpu.step()?);
		assert_eq!(0x101, cpu.registers.pc);

		Ok(())
	}

	#[test]
	fn test_jr_backwards() -> Result<(), GameboyError> {
		// jr -2 loops on itself
		let mut cpu = cpu_with(&[0x18, 0xFE])?;

		assert_eq!(12, cpu.step()?);
		assert_eq!(0x100, cpu.registers.pc);

		Ok(())
	}

	#[test]
	fn test_rst() -> Result<(), GameboyError> {
		let mut cpu = cpu_with(&[0xEF])?;

		assert_eq!(16, cpu.step()?);
		assert_eq!(0x28, cpu.registers.pc);
		assert_eq!(0x0101, cpu.mmap.read_word(0xFFFC)?);

		Ok(())
	}

	#[test]
	fn test_push_pop_af() -> Result<(), GameboyError> {
		// push BC; pop AF
		let mut cpu = cpu_with(&[0xC5, 0xF1])?;
		cpu.registers.set_bc(0x12FF);

		assert_eq!(16, cpu.step()?);
		assert_eq!(0xFF, cpu.mmap.read(0xFFFC)?);
		assert_eq!(0x12, cpu.mmap.read(0xFFFD)?);

		assert_eq!(12, cpu.step()?);
		assert_eq!(0x12F0, cpu.registers.af());
		assert_eq!(0xFFFE, cpu.registers.sp);

		Ok(())
	}

	#[test]
	fn test_loads() -> Result<(), GameboyError> {
		// ld HL, 0xC000; ld (HL+), A; ld (HL-), A; ld B, (HL); ld (0xFF80), A via ldh
		let mut cpu = cpu_with(&[0x21, 0x00, 0xC0, 0x22, 0x32, 0x46, 0xE0, 0x80])?;
		cpu.registers.a = 0x5A;

		assert_eq!(12, cpu.step()?);
		assert_eq!(8, cpu.step()?);
		assert_eq!(0xC001, cpu.registers.hl());
		assert_eq!(8, cpu.step()?);
		assert_eq!(0xC000, cpu.registers.hl());
		assert_eq!(0x5A, cpu.mmap.read(0xC001)?);
		assert_eq!(8, cpu.step()?);
		assert_eq!(0x5A, cpu.registers.b);
		assert_eq!(12, cpu.step()?);
		assert_eq!(0x5A, cpu.mmap.read(0xFF80)?);

		Ok(())
	}

	#[test]
	fn test_ld_nn_sp() -> Result<(), GameboyError> {
		let mut cpu = cpu_with(&[0x08, 0x00, 0xC0])?;
		cpu.registers.sp = 0xBEEF;

		assert_eq!(20, cpu.step()?);
		assert_eq!(0xEF, cpu.mmap.read(0xC000)?);
		assert_eq!(0xBE, cpu.mmap.read(0xC001)?);

		Ok(())
	}

	#[test]
	fn test_alu_ops() -> Result<(), GameboyError> {
		// cp B; sub B; xor A
		let mut cpu = cpu_with(&[0xB8, 0x90, 0xAF])?;
		cpu.registers.a = 0x42;
		cpu.registers.b = 0x42;

		assert_eq!(4, cpu.step()?);
		assert_eq!(0x42, cpu.registers.a);
		assert!(cpu.registers.flag(Flag::Z));
		assert!(cpu.registers.flag(Flag::N));

		assert_eq!(4, cpu.step()?);
		assert_eq!(0x00, cpu.registers.a);

		cpu.registers.a = 0x13;
		assert_eq!(4, cpu.step()?);
		assert_eq!(0x00, cpu.registers.a);
		assert_eq!(0x80, cpu.registers.flags());

		Ok(())
	}

	#[test]
	fn test_sub_imm() -> Result<(), GameboyError> {
		// sub 0x01; sbc 0x00
		let mut cpu = cpu_with(&[0xD6, 0x01, 0xDE, 0x00])?;
		cpu.registers.a = 0x00;

		assert_eq!(8, cpu.step()?);
		assert_eq!(0xFF, cpu.registers.a);
		assert!(cpu.registers.flag(Flag::N));
		assert!(cpu.registers.flag(Flag::C));

		assert_eq!(8, cpu.step()?);
		assert_eq!(0xFE, cpu.registers.a);
		assert!(cpu.registers.flag(Flag::N));
		assert!(!cpu.registers.flag(Flag::C));

		Ok(())
	}

	#[test]
	fn test_add_hl_keeps_zero() -> Result<(), GameboyError> {
		let mut cpu = cpu_with(&[0x09])?;
		cpu.registers.set_hl(0x0FFF);
		cpu.registers.set_bc(0x0001);
		cpu.registers.set_flag(Flag::Z, true);

		assert_eq!(8, cpu.step()?);
		assert_eq!(0x1000, cpu.registers.hl());
		assert!(cpu.registers.flag(Flag::Z));
		assert!(cpu.registers.flag(Flag::H));
		assert!(!cpu.registers.flag(Flag::C));

		Ok(())
	}

	#[test]
	fn test_stack_pointer_offsets() -> Result<(), GameboyError> {
		// ld HL, SP-1; add SP, 2
		let mut cpu = cpu_with(&[0xF8, 0xFF, 0xE8, 0x02])?;
		cpu.registers.sp = 0xFFF8;

		assert_eq!(12, cpu.step()?);
		assert_eq!(0xFFF7, cpu.registers.hl());
		assert_eq!(0x30, cpu.registers.flags());

		assert_eq!(16, cpu.step()?);
		assert_eq!(0xFFFA, cpu.registers.sp);
		assert_eq!(0x00, cpu.registers.flags());

		Ok(())
	}

	#[test]
	fn test_accumulator_rotations() -> Result<(), GameboyError> {
		// rlca; rra
		let mut cpu = cpu_with(&[0x07, 0x1F])?;
		cpu.registers.a = 0x80;

		assert_eq!(4, cpu.step()?);
		assert_eq!(0x01, cpu.registers.a);
		assert_eq!(0x10, cpu.registers.flags());

		cpu.registers.a = 0x01;
		cpu.registers.set_flag(Flag::C, false);
		assert_eq!(4, cpu.step()?);
		// The zero flag is cleared even though the result is zero.
		assert_eq!(0x00, cpu.registers.a);
		assert_eq!(0x10, cpu.registers.flags());

		Ok(())
	}

	#[test]
	fn test_daa_after_add() -> Result<(), GameboyError> {
		// add A, 0x27; daa
		let mut cpu = cpu_with(&[0xC6, 0x27, 0x27])?;
		cpu.registers.a = 0x15;

		cpu.step()?;
		assert_eq!(4, cpu.step()?);
		assert_eq!(0x42, cpu.registers.a);

		Ok(())
	}

	#[test]
	fn test_flag_instructions() -> Result<(), GameboyError> {
		// scf; ccf; cpl
		let mut cpu = cpu_with(&[0x37, 0x3F, 0x2F])?;
		cpu.registers.a = 0x0F;

		cpu.step()?;
		assert!(cpu.registers.flag(Flag::C));
		cpu.step()?;
		assert!(!cpu.registers.flag(Flag::C));
		cpu.step()?;
		assert_eq!(0xF0, cpu.registers.a);
		assert_eq!(0x60, cpu.registers.flags());

		Ok(())
	}

	#[test]
	fn test_prefixed() -> Result<(), GameboyError> {
		// bit 5, H; swap (HL); bit 0, (HL); set 3, A; res 3, A; rl C
		let mut cpu = cpu_with(&[
			0xCB, 0x6C,
			0xCB, 0x36,
			0xCB, 0x46,
			0xCB, 0xDF,
			0xCB, 0x9F,
			0xCB, 0x11,
		])?;
		cpu.registers.set_hl(0xC000);
		cpu.mmap.write(0xC000, 0x12)?;
		cpu.registers.set_flag(Flag::C, true);

		assert_eq!(8, cpu.step()?);
		assert!(cpu.registers.flag(Flag::Z));
		assert!(cpu.registers.flag(Flag::H));
		// bit leaves the carry alone.
		assert!(cpu.registers.flag(Flag::C));

		assert_eq!(16, cpu.step()?);
		assert_eq!(0x21, cpu.mmap.read(0xC000)?);
		assert!(!cpu.registers.flag(Flag::C));

		assert_eq!(12, cpu.step()?);
		assert!(!cpu.registers.flag(Flag::Z));

		assert_eq!(8, cpu.step()?);
		assert_eq!(0x08, cpu.registers.a);
		assert_eq!(8, cpu.step()?);
		assert_eq!(0x00, cpu.registers.a);

		cpu.registers.c = 0x80;
		assert_eq!(8, cpu.step()?);
		assert_eq!(0x00, cpu.registers.c);
		assert!(cpu.registers.flag(Flag::Z));
		assert!(cpu.registers.flag(Flag::C));
		assert_eq!(0x10C, cpu.registers.pc);

		Ok(())
	}

	#[test]
	fn test_halt_and_stop() -> Result<(), GameboyError> {
		let mut cpu = cpu_with(&[0x76])?;
		assert_eq!(4, cpu.step()?);
		assert!(cpu.is_halted());
		assert_eq!(0, cpu.step()?);
		assert_eq!(0x101, cpu.registers.pc);

		// stop; inc A
		let mut cpu = cpu_with(&[0x10, 0x3C])?;
		assert_eq!(4, cpu.step()?);
		assert!(cpu.is_stopped());
		assert_eq!(0x101, cpu.registers.pc);

		cpu.resume();
		assert_eq!(4, cpu.step()?);
		assert_eq!(1, cpu.registers.a);

		Ok(())
	}
}
