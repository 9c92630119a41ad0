// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Gameboy's lcd controller / picture processing unit.
//!
//! Only the timing is emulated: the ppu walks through its four modes in
//! lockstep with the clocks consumed by the cpu, keeps LY and STAT up to date
//! and blocks the cpu's access to the video ram and the OAM while it would be
//! using them.

use super::{shared, Shared};
use super::buffer::Buffer;
use super::guard::Guard;
use super::register_bank::{RegisterBank, RegisterDef};

#[allow(missing_docs)]
pub mod consts {
	/// Clocks spent on each scanline, visible or not.
	pub const LINE_DURATION: usize = 456;
	pub const TOTAL_LINES: usize = 154;
	pub const VISIBLE_LINES: usize = 144;
	/// Offset within a line at which OAM search ends.
	pub const DRAWING_START: usize = 80;
	/// Offset within a line at which pixel transfer ends.
	pub const HBLANK_START: usize = 252;
	pub const FRAME_DURATION: usize = LINE_DURATION * TOTAL_LINES;

	pub const VRAM_SIZE: usize = 0x2000;
	pub const OAM_SIZE: usize = 0xA0;
	/// The amount of addresses covered by the register bank (0xFF40-0xFF4B).
	pub const REGISTERS_SIZE: u16 = 0x0C;

	/// What the cpu reads from a locked video ram or OAM.
	pub const LOCKED_VALUE: u8 = 0xFF;

	/// The read/write interrupt-enable bits of STAT.
	pub const STAT_WRITE_MASK: u8 = 0b0111_1000;
	pub const STAT_COINCIDENCE: u8 = 0b0000_0100;
	pub const STAT_MODE: u8 = 0b0000_0011;
}

use consts::*;

#[cfg(feature = "ppu-trace")]
macro_rules! ppu_trace {
	($($arg:tt)*) => {
		log::trace!($($arg)*);
	};
}

#[cfg(not(feature = "ppu-trace"))]
macro_rules! ppu_trace {
	($($arg:tt)*) => {};
}

/// The lcd controller peripheral has four states; the numeric values are
/// the ones reported in STAT's bits 0-1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PpuMode {
	/// Horizontal blanking, both memories are available.
	HBlank = 0,
	/// Vertical blanking, both memories are available.
	VBlank = 1,
	/// Scanning the OAM, which is unavailable to the cpu.
	OamSearch = 2,
	/// Transferring pixels, neither memory is available to the cpu.
	Drawing = 3,
}

/// The ppu's memory mapped registers, relative to 0xFF40.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PpuRegister {
	Lcdc,
	Stat,
	Scy,
	Scx,
	Ly,
	Lyc,
	Dma,
	Bgp,
	Obp0,
	Obp1,
	Wy,
	Wx,
}

fn registers() -> RegisterBank<PpuRegister> {
	RegisterBank::new(vec![
		RegisterDef::new(0x00, PpuRegister::Lcdc),
		RegisterDef::new(0x01, PpuRegister::Stat).write_mask(STAT_WRITE_MASK),
		RegisterDef::new(0x02, PpuRegister::Scy),
		RegisterDef::new(0x03, PpuRegister::Scx),
		// Read only.
		RegisterDef::new(0x04, PpuRegister::Ly).write_mask(0),
		RegisterDef::new(0x05, PpuRegister::Lyc),
		RegisterDef::new(0x06, PpuRegister::Dma),
		RegisterDef::new(0x07, PpuRegister::Bgp),
		RegisterDef::new(0x08, PpuRegister::Obp0),
		RegisterDef::new(0x09, PpuRegister::Obp1),
		RegisterDef::new(0x0A, PpuRegister::Wy),
		RegisterDef::new(0x0B, PpuRegister::Wx),
	])
}

/// The gameboy's lcd controller.
pub struct Ppu {
	vram: Shared<Guard<Buffer>>,
	oam: Shared<Guard<Buffer>>,
	registers: Shared<RegisterBank<PpuRegister>>,

	frame_clocks: usize,
	line_clocks: usize,
}

impl Ppu {
	/// Initialize a new ppu instance, at the start of a frame.
	pub fn new() -> Self {
		let mut ppu = Ppu {
			vram: shared(Guard::new(Buffer::new(VRAM_SIZE))),
			oam: shared(Guard::new(Buffer::new(OAM_SIZE))),
			registers: shared(registers()),
			frame_clocks: 0,
			line_clocks: 0,
		};

		// Establish the registers and locks of the initial mode.
		ppu.step(0);

		ppu
	}

	/// Set the registers to the values the boot rom leaves behind.
	pub fn reset(&mut self) {
		{
			let mut registers = self.registers.borrow_mut();

			registers.set(PpuRegister::Lcdc, 0x91);
			registers.set(PpuRegister::Bgp, 0xFC);
			registers.set(PpuRegister::Obp0, 0xFF);
			registers.set(PpuRegister::Obp1, 0xFF);
		}

		self.step(0);
	}

	/// Advance the ppu by the given amount of clocks.
	pub fn step(&mut self, clocks: usize) {
		let previous = self.mode();
		let lines = (self.line_clocks + clocks) / LINE_DURATION;

		self.frame_clocks = (self.frame_clocks + clocks) % FRAME_DURATION;
		self.line_clocks = (self.line_clocks + clocks) % LINE_DURATION;

		let mode = self.mode();
		if mode != previous {
			ppu_trace!("ppu: {:?} -> {:?} (frame clock {})", previous, mode, self.frame_clocks);
		}

		{
			let mut registers = self.registers.borrow_mut();

			if lines > 0 {
				let ly = (registers.get(PpuRegister::Ly) as usize + lines) % TOTAL_LINES;
				registers.set(PpuRegister::Ly, ly as u8);
			}

			let coincidence = registers.get(PpuRegister::Ly) == registers.get(PpuRegister::Lyc);
			let stat = (registers.get(PpuRegister::Stat) & STAT_WRITE_MASK)
				| if coincidence { STAT_COINCIDENCE } else { 0 }
				| (mode as u8 & STAT_MODE);

			registers.set(PpuRegister::Stat, stat);
		}

		match mode {
			PpuMode::OamSearch | PpuMode::Drawing => self.oam.borrow_mut().lock(LOCKED_VALUE),
			_ => self.oam.borrow_mut().unlock(),
		}

		match mode {
			PpuMode::Drawing => self.vram.borrow_mut().lock(LOCKED_VALUE),
			_ => self.vram.borrow_mut().unlock(),
		}
	}

	/// The current mode, derived from the position within the frame.
	pub fn mode(&self) -> PpuMode {
		if self.frame_clocks >= LINE_DURATION * VISIBLE_LINES {
			PpuMode::VBlank
		} else if self.line_clocks < DRAWING_START {
			PpuMode::OamSearch
		} else if self.line_clocks < HBLANK_START {
			PpuMode::Drawing
		} else {
			PpuMode::HBlank
		}
	}

	/// Clocks elapsed since the start of the current frame.
	pub fn frame_clocks(&self) -> usize {
		self.frame_clocks
	}

	/// Clocks elapsed since the start of the current scanline.
	pub fn line_clocks(&self) -> usize {
		self.line_clocks
	}

	/// Read a register, bypassing the cpu's view of it.
	pub fn register(&self, register: PpuRegister) -> u8 {
		self.registers.borrow().get(register)
	}

	/// A handle to the video ram, to be mapped on the bus.
	pub fn vram(&self) -> Shared<Guard<Buffer>> {
		self.vram.clone()
	}

	/// A handle to the object attribute memory, to be mapped on the bus.
	pub fn oam(&self) -> Shared<Guard<Buffer>> {
		self.oam.clone()
	}

	/// A handle to the register bank, to be mapped on the bus at 0xFF40.
	pub fn registers(&self) -> Shared<RegisterBank<PpuRegister>> {
		self.registers.clone()
	}
}

impl Default for Ppu {
	fn default() -> Self {
		Ppu::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bus::Memory;
	use crate::GameboyError;

	fn stat_mode(ppu: &Ppu) -> u8 {
		ppu.register(PpuRegister::Stat) & STAT_MODE
	}

	#[test]
	fn test_initial_state() {
		let ppu = Ppu::new();

		assert_eq!(PpuMode::OamSearch, ppu.mode());
		assert_eq!(PpuMode::OamSearch as u8, stat_mode(&ppu));
		// LY == LYC == 0
		assert_ne!(0, ppu.register(PpuRegister::Stat) & STAT_COINCIDENCE);
		assert!(ppu.oam.borrow().is_locked());
		assert!(!ppu.vram.borrow().is_locked());
	}

	#[test]
	fn test_full_frame() {
		let mut ppu = Ppu::new();

		for line in 0..VISIBLE_LINES {
			assert_eq!(line as u8, ppu.register(PpuRegister::Ly));
			assert_eq!(PpuMode::OamSearch, ppu.mode());

			ppu.step(DRAWING_START);
			assert_eq!(PpuMode::Drawing, ppu.mode());
			assert_eq!(PpuMode::Drawing as u8, stat_mode(&ppu));

			ppu.step(HBLANK_START - DRAWING_START);
			assert_eq!(PpuMode::HBlank, ppu.mode());
			assert_eq!(PpuMode::HBlank as u8, stat_mode(&ppu));

			ppu.step(LINE_DURATION - HBLANK_START);
		}

		assert_eq!(PpuMode::VBlank, ppu.mode());
		assert_eq!(PpuMode::VBlank as u8, stat_mode(&ppu));
		assert_eq!(VISIBLE_LINES as u8, ppu.register(PpuRegister::Ly));

		ppu.step(LINE_DURATION * (TOTAL_LINES - VISIBLE_LINES));
		assert_eq!(PpuMode::OamSearch, ppu.mode());
		assert_eq!(PpuMode::OamSearch as u8, stat_mode(&ppu));
		assert_eq!(0, ppu.register(PpuRegister::Ly));
		assert_eq!(0, ppu.frame_clocks());
	}

	#[test]
	fn test_ly_wraps() {
		let mut ppu = Ppu::new();

		ppu.step(FRAME_DURATION - 1);
		assert_eq!((TOTAL_LINES - 1) as u8, ppu.register(PpuRegister::Ly));

		ppu.step(LINE_DURATION + 1);
		assert_eq!(1, ppu.register(PpuRegister::Ly));
		assert_eq!(0, ppu.line_clocks());
	}

	#[test]
	fn test_coincidence() -> Result<(), GameboyError> {
		let mut ppu = Ppu::new();
		let mut registers = ppu.registers();

		registers.write(0x05, 3)?;
		ppu.step(LINE_DURATION * 2);
		assert_eq!(0, registers.read(0x01)? & STAT_COINCIDENCE);

		ppu.step(LINE_DURATION);
		assert_eq!(STAT_COINCIDENCE, registers.read(0x01)? & STAT_COINCIDENCE);

		ppu.step(LINE_DURATION);
		assert_eq!(0, registers.read(0x01)? & STAT_COINCIDENCE);

		Ok(())
	}

	#[test]
	fn test_stat_and_ly_writes() -> Result<(), GameboyError> {
		let mut ppu = Ppu::new();
		let mut registers = ppu.registers();

		// Only the interrupt-enable bits are writable.
		registers.write(0x01, 0xFF)?;
		ppu.step(DRAWING_START);
		assert_eq!(STAT_WRITE_MASK | PpuMode::Drawing as u8, registers.read(0x01)? & !STAT_COINCIDENCE);

		registers.write(0x04, 0x42)?;
		assert_eq!(0, registers.read(0x04)?);

		Ok(())
	}

	#[test]
	fn test_memory_locks() -> Result<(), GameboyError> {
		let mut ppu = Ppu::new();
		let mut vram = ppu.vram();
		let mut oam = ppu.oam();

		// OAM search: only the OAM is blocked.
		vram.write(0x10, 0x12)?;
		oam.write(0x10, 0x34)?;
		assert_eq!(0x12, vram.read(0x10)?);
		assert_eq!(LOCKED_VALUE, oam.read(0x10)?);

		// Drawing: both are blocked.
		ppu.step(DRAWING_START);
		vram.write(0x10, 0x56)?;
		oam.write(0x10, 0x56)?;
		assert_eq!(LOCKED_VALUE, vram.read(0x10)?);
		assert_eq!(LOCKED_VALUE, oam.read(0x10)?);
		assert_eq!(0x12, vram.borrow().inner().read(0x10)?);
		assert_eq!(0x00, oam.borrow().inner().read(0x10)?);

		// HBlank: both are available.
		ppu.step(HBLANK_START - DRAWING_START);
		oam.write(0x10, 0x78)?;
		assert_eq!(0x12, vram.read(0x10)?);
		assert_eq!(0x78, oam.read(0x10)?);

		// VBlank: both are available.
		ppu.step(LINE_DURATION * VISIBLE_LINES - HBLANK_START);
		assert_eq!(PpuMode::VBlank, ppu.mode());
		vram.write(0x11, 0x9A)?;
		assert_eq!(0x9A, vram.read(0x11)?);
		assert_eq!(0x78, oam.read(0x10)?);

		Ok(())
	}

	#[test]
	fn test_reset() {
		let mut ppu = Ppu::new();

		ppu.reset();
		assert_eq!(0x91, ppu.register(PpuRegister::Lcdc));
		assert_eq!(0xFC, ppu.register(PpuRegister::Bgp));
		assert_eq!(PpuMode::OamSearch as u8, stat_mode(&ppu));
	}
}
