// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! Gameboy cpu's opcode decoder.
//!
//! Both opcode maps are immutable tables indexed by the opcode byte. The
//! prefixed map is regular enough to be computed at compile time.

use super::Cpu;
use super::alu::{alu8, Outcome};
use super::instructions::*;
use super::state::registers::Register;
use crate::GameboyError;

/// Marks the beginning of a two-byte opcode.
pub const PREFIX: u8 = 0xCB;

/// The rotations and shifts of the prefixed opcode map, in encoding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ShiftOp {
	Rlc,
	Rrc,
	Rl,
	Rr,
	Sla,
	Sra,
	Swap,
	Srl,
}

impl ShiftOp {
	const fn from_bits(bits: u8) -> Self {
		match bits & 0x07 {
			0 => ShiftOp::Rlc,
			1 => ShiftOp::Rrc,
			2 => ShiftOp::Rl,
			3 => ShiftOp::Rr,
			4 => ShiftOp::Sla,
			5 => ShiftOp::Sra,
			6 => ShiftOp::Swap,
			_ => ShiftOp::Srl,
		}
	}

	/// Compute the operation, `carry` being the current carry flag.
	pub fn apply(self, value: u8, carry: bool) -> Outcome<u8> {
		match self {
			ShiftOp::Rlc => alu8::rlc(value),
			ShiftOp::Rrc => alu8::rrc(value),
			ShiftOp::Rl => alu8::rl(value, carry),
			ShiftOp::Rr => alu8::rr(value, carry),
			ShiftOp::Sla => alu8::sla(value),
			ShiftOp::Sra => alu8::sra(value),
			ShiftOp::Swap => alu8::swap(value),
			ShiftOp::Srl => alu8::srl(value),
		}
	}
}

/// The category of a prefixed opcode (bits 6-7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixOp {
	/// Rotate or shift, selected by bits 3-5.
	Shift(ShiftOp),
	/// Test a bit.
	Bit,
	/// Clear a bit.
	Res,
	/// Set a bit.
	Set,
}

/// The operand of a prefixed opcode (bits 0-2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
	/// An 8-bit register.
	Reg(Register),
	/// The byte addressed by HL.
	HlIndirect,
}

/// A decoded prefixed opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prefixed {
	/// What to do.
	pub op: PrefixOp,
	/// The bit index for bit, res and set.
	pub bit: u8,
	/// What to do it to.
	pub target: Target,
}

impl Prefixed {
	/// Split a prefixed opcode into its fields.
	pub const fn new(opcode: u8) -> Self {
		let bit = (opcode >> 3) & 0x07;

		let target = match opcode & 0x07 {
			0 => Target::Reg(Register::B),
			1 => Target::Reg(Register::C),
			2 => Target::Reg(Register::D),
			3 => Target::Reg(Register::E),
			4 => Target::Reg(Register::H),
			5 => Target::Reg(Register::L),
			6 => Target::HlIndirect,
			_ => Target::Reg(Register::A),
		};

		let op = match opcode >> 6 {
			0 => PrefixOp::Shift(ShiftOp::from_bits(bit)),
			1 => PrefixOp::Bit,
			2 => PrefixOp::Res,
			_ => PrefixOp::Set,
		};

		Prefixed { op, bit, target }
	}
}

const fn prefixed_table() -> [Prefixed; 256] {
	let mut table = [Prefixed::new(0); 256];

	let mut opcode = 0;
	while opcode < 256 {
		table[opcode] = Prefixed::new(opcode as u8);
		opcode += 1;
	}

	table
}

/// The primary opcode map. Undefined opcodes have no entry.
pub static OPCODES: [Option<Instruction>; 256] = [
	// 0x00
	Some(opcode_00), Some(opcode_01), Some(opcode_02), Some(opcode_03), Some(opcode_04), Some(opcode_05), Some(opcode_06), Some(opcode_07),
	Some(opcode_08), Some(opcode_09), Some(opcode_0a), Some(opcode_0b), Some(opcode_0c), Some(opcode_0d), Some(opcode_0e), Some(opcode_0f),
	// 0x10
	Some(opcode_10), Some(opcode_11), Some(opcode_12), Some(opcode_13), Some(opcode_14), Some(opcode_15), Some(opcode_16), Some(opcode_17),
	Some(opcode_18), Some(opcode_19), Some(opcode_1a), Some(opcode_1b), Some(opcode_1c), Some(opcode_1d), Some(opcode_1e), Some(opcode_1f),
	// 0x20
	Some(opcode_20), Some(opcode_21), Some(opcode_22), Some(opcode_23), Some(opcode_24), Some(opcode_25), Some(opcode_26), Some(opcode_27),
	Some(opcode_28), Some(opcode_29), Some(opcode_2a), Some(opcode_2b), Some(opcode_2c), Some(opcode_2d), Some(opcode_2e), Some(opcode_2f),
	// 0x30
	Some(opcode_30), Some(opcode_31), Some(opcode_32), Some(opcode_33), Some(opcode_34), Some(opcode_35), Some(opcode_36), Some(opcode_37),
	Some(opcode_38), Some(opcode_39), Some(opcode_3a), Some(opcode_3b), Some(opcode_3c), Some(opcode_3d), Some(opcode_3e), Some(opcode_3f),
	// 0x40
	Some(opcode_40), Some(opcode_41), Some(opcode_42), Some(opcode_43), Some(opcode_44), Some(opcode_45), Some(opcode_46), Some(opcode_47),
	Some(opcode_48), Some(opcode_49), Some(opcode_4a), Some(opcode_4b), Some(opcode_4c), Some(opcode_4d), Some(opcode_4e), Some(opcode_4f),
	// 0x50
	Some(opcode_50), Some(opcode_51), Some(opcode_52), Some(opcode_53), Some(opcode_54), Some(opcode_55), Some(opcode_56), Some(opcode_57),
	Some(opcode_58), Some(opcode_59), Some(opcode_5a), Some(opcode_5b), Some(opcode_5c), Some(opcode_5d), Some(opcode_5e), Some(opcode_5f),
	// 0x60
	Some(opcode_60), Some(opcode_61), Some(opcode_62), Some(opcode_63), Some(opcode_64), Some(opcode_65), Some(opcode_66), Some(opcode_67),
	Some(opcode_68), Some(opcode_69), Some(opcode_6a), Some(opcode_6b), Some(opcode_6c), Some(opcode_6d), Some(opcode_6e), Some(opcode_6f),
	// 0x70
	Some(opcode_70), Some(opcode_71), Some(opcode_72), Some(opcode_73), Some(opcode_74), Some(opcode_75), Some(opcode_76), Some(opcode_77),
	Some(opcode_78), Some(opcode_79), Some(opcode_7a), Some(opcode_7b), Some(opcode_7c), Some(opcode_7d), Some(opcode_7e), Some(opcode_7f),
	// 0x80
	Some(opcode_80), Some(opcode_81), Some(opcode_82), Some(opcode_83), Some(opcode_84), Some(opcode_85), Some(opcode_86), Some(opcode_87),
	Some(opcode_88), Some(opcode_89), Some(opcode_8a), Some(opcode_8b), Some(opcode_8c), Some(opcode_8d), Some(opcode_8e), Some(opcode_8f),
	// 0x90
	Some(opcode_90), Some(opcode_91), Some(opcode_92), Some(opcode_93), Some(opcode_94), Some(opcode_95), Some(opcode_96), Some(opcode_97),
	Some(opcode_98), Some(opcode_99), Some(opcode_9a), Some(opcode_9b), Some(opcode_9c), Some(opcode_9d), Some(opcode_9e), Some(opcode_9f),
	// 0xA0
	Some(opcode_a0), Some(opcode_a1), Some(opcode_a2), Some(opcode_a3), Some(opcode_a4), Some(opcode_a5), Some(opcode_a6), Some(opcode_a7),
	Some(opcode_a8), Some(opcode_a9), Some(opcode_aa), Some(opcode_ab), Some(opcode_ac), Some(opcode_ad), Some(opcode_ae), Some(opcode_af),
	// 0xB0
	Some(opcode_b0), Some(opcode_b1), Some(opcode_b2), Some(opcode_b3), Some(opcode_b4), Some(opcode_b5), Some(opcode_b6), Some(opcode_b7),
	Some(opcode_b8), Some(opcode_b9), Some(opcode_ba), Some(opcode_bb), Some(opcode_bc), Some(opcode_bd), Some(opcode_be), Some(opcode_bf),
	// 0xC0
	Some(opcode_c0), Some(opcode_c1), Some(opcode_c2), Some(opcode_c3), Some(opcode_c4), Some(opcode_c5), Some(opcode_c6), Some(opcode_c7),
	Some(opcode_c8), Some(opcode_c9), Some(opcode_ca), Some(opcode_cb), Some(opcode_cc), Some(opcode_cd), Some(opcode_ce), Some(opcode_cf),
	// 0xD0
	Some(opcode_d0), Some(opcode_d1), Some(opcode_d2), None, Some(opcode_d4), Some(opcode_d5), Some(opcode_d6), Some(opcode_d7),
	Some(opcode_d8), Some(opcode_d9), Some(opcode_da), None, Some(opcode_dc), None, Some(opcode_de), Some(opcode_df),
	// 0xE0
	Some(opcode_e0), Some(opcode_e1), Some(opcode_e2), None, None, Some(opcode_e5), Some(opcode_e6), Some(opcode_e7),
	Some(opcode_e8), Some(opcode_e9), Some(opcode_ea), None, None, None, Some(opcode_ee), Some(opcode_ef),
	// 0xF0
	Some(opcode_f0), Some(opcode_f1), Some(opcode_f2), Some(opcode_f3), None, Some(opcode_f5), Some(opcode_f6), Some(opcode_f7),
	Some(opcode_f8), Some(opcode_f9), Some(opcode_fa), Some(opcode_fb), None, None, Some(opcode_fe), Some(opcode_ff),
];

/// The opcode map that follows the 0xCB prefix.
pub static PREFIXED: [Prefixed; 256] = prefixed_table();

impl Cpu {
	/// Returns the instruction that matches the given opcode.
	pub fn decode(opcode: u8) -> Result<Instruction, GameboyError> {
		OPCODES[opcode as usize].ok_or(GameboyError::IllegalOpcode(opcode))
	}

	/// Decode the byte that follows the 0xCB prefix.
	pub fn decode_cb(opcode: u8) -> &'static Prefixed {
		&PREFIXED[opcode as usize]
	}
}
