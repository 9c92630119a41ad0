// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Gameboy's processor state.

use crate::config::HardwareModel;
use registers::*;

#[allow(missing_docs)]
pub mod registers {
	#[derive(PartialEq, Eq, Clone, Copy, Debug)]
	pub enum Register {
		/// Accumulator and Flag registers
		A, F, AF,
		B, C, BC,
		D, E, DE,
		/// Indirect access register
		H, L, HL,
		/// Stack pointer
		SP,
		/// Program counter
		PC,
	}

	impl Register {
		/// Whether this is one of the 16-bit registers.
		pub fn is_wide(self) -> bool {
			matches!(self,
				Register::AF | Register::BC | Register::DE |
				Register::HL | Register::SP | Register::PC)
		}
	}

	/// The flag register encodes the following flags within
	/// the register's bits.
	#[derive(PartialEq, Eq, Clone, Copy, Debug)]
	pub enum Flag {
		/// Carry flag
		C = 4,
		/// Half-Carry flag
		H = 5,
		/// Subtract flag
		N = 6,
		/// Zero flag
		Z = 7,
	}

	/// The flag register's lower nibble always reads as zero.
	pub const FLAGS_MASK: u8 = 0xF0;
}

/// Structure holding the current processor state.
///
/// The 16-bit pairs are views over the 8-bit registers; they are composed
/// high:low on read and split back on write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CpuState {
	/// Accumulator
	pub a: u8,
	f: u8,
	#[allow(missing_docs)]
	pub b: u8,
	#[allow(missing_docs)]
	pub c: u8,
	#[allow(missing_docs)]
	pub d: u8,
	#[allow(missing_docs)]
	pub e: u8,
	#[allow(missing_docs)]
	pub h: u8,
	#[allow(missing_docs)]
	pub l: u8,
	/// Stack pointer
	pub sp: u16,
	/// Program counter
	pub pc: u16,
}

impl CpuState {
	/// Initializes a zeroed cpu state, as found before the boot rom runs.
	pub fn new() -> Self {
		CpuState::default()
	}

	/// Reset registers to the state the boot rom leaves them in.
	pub fn reset(&mut self, model: HardwareModel) {
		self.set(Register::F, 0xB0);
		self.set(Register::BC, 0x0013);
		self.set(Register::DE, 0x00D8);
		self.set(Register::HL, 0x014D);
		self.set(Register::SP, 0xFFFE);
		self.set(Register::PC, 0x0100);

		match model {
			HardwareModel::GB | HardwareModel::SGB => {
				self.set(Register::A, 0x01);
			},
			HardwareModel::GBP => {
				self.set(Register::A, 0xFF);
			},
		}
	}

	/// The packed flags byte.
	pub fn flags(&self) -> u8 {
		self.f
	}

	/// Overwrite the packed flags byte. The lower nibble is dropped.
	pub fn set_flags(&mut self, value: u8) {
		self.f = value & FLAGS_MASK;
	}

	#[allow(missing_docs)]
	pub fn af(&self) -> u16 {
		u16::from_be_bytes([self.a, self.f])
	}

	#[allow(missing_docs)]
	pub fn set_af(&mut self, value: u16) {
		let [high, low] = value.to_be_bytes();
		self.a = high;
		self.set_flags(low);
	}

	#[allow(missing_docs)]
	pub fn bc(&self) -> u16 {
		u16::from_be_bytes([self.b, self.c])
	}

	#[allow(missing_docs)]
	pub fn set_bc(&mut self, value: u16) {
		let [high, low] = value.to_be_bytes();
		self.b = high;
		self.c = low;
	}

	#[allow(missing_docs)]
	pub fn de(&self) -> u16 {
		u16::from_be_bytes([self.d, self.e])
	}

	#[allow(missing_docs)]
	pub fn set_de(&mut self, value: u16) {
		let [high, low] = value.to_be_bytes();
		self.d = high;
		self.e = low;
	}

	#[allow(missing_docs)]
	pub fn hl(&self) -> u16 {
		u16::from_be_bytes([self.h, self.l])
	}

	#[allow(missing_docs)]
	pub fn set_hl(&mut self, value: u16) {
		let [high, low] = value.to_be_bytes();
		self.h = high;
		self.l = low;
	}

	/// Writes a value to a given register.
	///
	/// * `reg` - The register file identifier to write into.
	/// * `value` - The value to write. In cases of 8-bit register,
	///     the higher 8 bits will be discarded.
	pub fn set(&mut self, reg: Register, value: u16) {
		let byte = value as u8;

		match reg {
			Register::A => self.a = byte,
			Register::F => self.set_flags(byte),
			Register::B => self.b = byte,
			Register::C => self.c = byte,
			Register::D => self.d = byte,
			Register::E => self.e = byte,
			Register::H => self.h = byte,
			Register::L => self.l = byte,
			Register::AF => self.set_af(value),
			Register::BC => self.set_bc(value),
			Register::DE => self.set_de(value),
			Register::HL => self.set_hl(value),
			Register::SP => self.sp = value,
			Register::PC => self.pc = value,
		}
	}

	/// Reads the given register.
	pub fn get(&self, reg: Register) -> u16 {
		match reg {
			Register::A => self.a as u16,
			Register::F => self.f as u16,
			Register::B => self.b as u16,
			Register::C => self.c as u16,
			Register::D => self.d as u16,
			Register::E => self.e as u16,
			Register::H => self.h as u16,
			Register::L => self.l as u16,
			Register::AF => self.af(),
			Register::BC => self.bc(),
			Register::DE => self.de(),
			Register::HL => self.hl(),
			Register::SP => self.sp,
			Register::PC => self.pc,
		}
	}

	/// Returns the state of the given cpu flag, as stored in
	/// the 'F' register.
	pub fn flag(&self, flag: Flag) -> bool {
		// Check whether the relevant bit is on
		((self.f >> flag as u8) & 1) == 1
	}

	/// Sets the state of the given cpu flag, as stored in
	/// the 'F' register.
	pub fn set_flag(&mut self, flag: Flag, value: bool) {
		let new_flags = if value {
			// Turn on the relevant bit
			self.f | (1 << (flag as u8))
		} else {
			// Turn off the relevant bit
			self.f & !(1 << (flag as u8))
		};

		self.set_flags(new_flags);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_registers_rw() {
		let mut cpu = CpuState::new();
		cpu.reset(HardwareModel::GB);

		assert_eq!(0x0013, cpu.get(Register::BC));
		assert_eq!(0x01B0, cpu.af());

		cpu.set(Register::AF, 0x1234);
		assert_eq!(0x12, cpu.get(Register::A));
		assert_eq!(0x30, cpu.get(Register::F));
		assert_eq!(0x1230, cpu.af());

		cpu.set(Register::B, 0x18);
		assert_eq!(0x18, cpu.b);
		assert_eq!(0x1813, cpu.bc());

		cpu.set_hl(0xBEEF);
		assert_eq!(0xBE, cpu.h);
		assert_eq!(0xEF, cpu.get(Register::L));

		cpu.set(Register::SP, 0x7FFC);
		assert_eq!(0x7FFC, cpu.sp);
	}

	#[test]
	fn test_reset_models() {
		let mut cpu = CpuState::new();

		cpu.reset(HardwareModel::GBP);
		assert_eq!(0xFF, cpu.a);

		cpu.reset(HardwareModel::SGB);
		assert_eq!(0x01, cpu.a);
		assert_eq!(0xFFFE, cpu.sp);
		assert_eq!(0x0100, cpu.pc);
		assert_eq!(0x00D8, cpu.de());
		assert_eq!(0x014D, cpu.hl());
	}

	#[test]
	fn test_cpu_flags() {
		let mut cpu = CpuState::new();

		cpu.set(Register::F, 0b10010000);
		//                    ^ZNHC
		assert_eq!(true, cpu.flag(Flag::Z) &&
						!cpu.flag(Flag::N) &&
						!cpu.flag(Flag::H) &&
						 cpu.flag(Flag::C));

		cpu.set(Register::F, 0b01000000);
		assert_eq!(true, !cpu.flag(Flag::Z) &&
						  cpu.flag(Flag::N) &&
						 !cpu.flag(Flag::H) &&
						 !cpu.flag(Flag::C));

		cpu.set_flag(Flag::N, false);
		assert_eq!(false, cpu.flag(Flag::N));

		cpu.set_flag(Flag::C, true);
		assert_eq!(true, cpu.flag(Flag::C));
	}

	#[test]
	fn test_flags_low_nibble() {
		let mut cpu = CpuState::new();
		let flags = [Flag::Z, Flag::N, Flag::H, Flag::C];

		cpu.set_flags(0xFF);
		assert_eq!(0xF0, cpu.flags());

		cpu.set(Register::AF, 0xFFFF);
		assert_eq!(0x00, cpu.flags() & 0x0F);

		for i in 0..64_usize {
			let flag = flags[i % 4];
			cpu.set_flag(flag, (i / 4) % 3 != 0);
			assert_eq!(0, cpu.flags() & 0x0F);
		}
	}
}
