// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! Gameboy's processor emulation.

pub mod state;
pub mod interrupts;
pub mod alu;
pub mod decode;
pub mod instructions;

use num::PrimInt;
use core::mem::size_of;

use state::CpuState;
use interrupts::Ime;
use instructions::Instruction;

use crate::bus::Memory;
use crate::GameboyError;

#[cfg(feature = "cpu-trace")]
macro_rules! cpu_trace {
	($($arg:tt)*) => {
		log::trace!($($arg)*);
	};
}

#[cfg(not(feature = "cpu-trace"))]
macro_rules! cpu_trace {
	($($arg:tt)*) => {};
}

/// The execution state of the processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
	/// Instructions are fetched and executed.
	Running,
	/// Halted until an interrupt arrives.
	Halted,
	/// Stopped until a button is pressed.
	Stopped,
}

/// The gameboy's processor.
pub struct Cpu {
	/// The cpu's registers.
	pub registers: CpuState,
	/// The address space, as seen by the cpu.
	pub mmap: Box<dyn Memory>,
	state: State,
	ime: Ime,
}

impl Cpu {
	/// Initializes a new virtual cpu over the given address space.
	///
	/// The registers start zeroed, as they are when the boot rom begins.
	pub fn new(mmap: Box<dyn Memory>) -> Self {
		Cpu {
			registers: CpuState::new(),
			mmap,
			state: State::Running,
			ime: Ime::default(),
		}
	}

	/// Reads the next instruction bytes and increments the program counter appropriately.
	///
	/// The function works in little-endian, that is, when reading 2 bytes,
	/// the first byte will be the least-significant one.
	pub fn fetch<T: PrimInt + From<u8>>(&mut self) -> Result<T, GameboyError> {
		let mut result = T::zero();

		for i in 0..size_of::<T>() {
			let pc = self.registers.pc;
			let data = <T as From<u8>>::from(self.mmap.read(pc)?);

			// We're using little-endianity.
			result = result | (data << (8 * i));

			self.registers.pc = pc.wrapping_add(1);
		}

		Ok(result)
	}

	/// Emulates the execution of a single instruction.
	///
	/// Returns the number of clock cycles the instruction has taken. A halted
	/// or stopped cpu doesn't execute anything and takes no cycles.
	pub fn step(&mut self) -> Result<usize, GameboyError> {
		if self.state != State::Running {
			return Ok(0);
		}

		let previous = self.ime;
		let pc = self.registers.pc;

		let opcode: u8 = self.fetch()?;
		let insn: Instruction = Cpu::decode(opcode).map_err(|e| {
			log::warn!("illegal opcode {:#04x} at {:#06x}", opcode, pc);
			e
		})?;

		cpu_trace!("{:#06x}: {:#04x} {:?}", pc, opcode, self.registers);

		let cycles = insn(self)?;
		self.ime = self.ime.settle(previous);

		Ok(cycles)
	}

	/// The current execution state.
	pub fn state(&self) -> State {
		self.state
	}

	#[allow(missing_docs)]
	pub fn is_running(&self) -> bool {
		self.state == State::Running
	}

	#[allow(missing_docs)]
	pub fn is_halted(&self) -> bool {
		self.state == State::Halted
	}

	#[allow(missing_docs)]
	pub fn is_stopped(&self) -> bool {
		self.state == State::Stopped
	}

	/// Leave the halted or stopped state.
	///
	/// There is no interrupt controller yet, so waking the cpu up is
	/// left to the caller.
	pub fn resume(&mut self) {
		if self.state != State::Running {
			log::debug!("resuming at {:#06x}", self.registers.pc);
		}

		self.state = State::Running;
	}

	/// The interrupt master enable flag.
	pub fn ime(&self) -> Ime {
		self.ime
	}

	/// Whether interrupts would be serviced right now.
	pub fn interrupts_enabled(&self) -> bool {
		self.ime == Ime::Enabled
	}
}
