// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! The emulation library's front-end API.

use std::collections::HashSet;

use crate::cpu::Cpu;
use crate::bus::*;
use crate::bus::consts::*;
use crate::bus::memory_range::*;
use crate::bus::boot::BootOverlay;
use crate::bus::buffer::Buffer;
use crate::bus::cartridge::{Cartridge, Header};
use crate::bus::null::Null;
use crate::bus::ppu::Ppu;
use crate::config::Config;
use crate::GameboyError;
use crate::{range_start, range_size};

/// The complete emulator's state.
///
/// Owns the cpu, which owns the address space, and the ppu whose memories
/// are mapped on it. Every instruction's duration is forwarded to the ppu
/// right after it executes.
pub struct Emulator {
	cpu: Cpu,
	ppu: Ppu,
	header: Header,
	breakpoints: HashSet<u16>,
}

impl Emulator {
	/// Create a new emulator running the given rom image.
	pub fn new(config: Config, rom: &[u8]) -> Result<Self, GameboyError> {
		let cartridge = Cartridge::new(rom)?;
		let valid = cartridge.has_valid_header();
		let (header, mbc) = cartridge.into_parts();

		log::info!("loaded {:?}, cartridge type {:#04x}, header {}",
				   header.title, header.cartridge_type,
				   if valid { "valid" } else { "invalid" });
		if !valid {
			log::warn!("the cartridge header doesn't pass validation");
		}

		let mut ppu = Ppu::new();
		let wram = Buffer::new(range_size!(MMAP_RAM_INTERNAL) as usize);
		let echo = wram.share();

		let mut bus = Bus::new(vec![
			AddressMapping {
				offset: range_start!(MMAP_ROM_BANK0),
				length: range_size!(MMAP_ROM_BANK0),
				device: mbc.rom0,
			},
			AddressMapping {
				offset: range_start!(MMAP_ROM_BANK_SW),
				length: range_size!(MMAP_ROM_BANK_SW),
				device: mbc.rom_x,
			},
			AddressMapping::new(range_start!(MMAP_VIDEO_RAM),
								range_size!(MMAP_VIDEO_RAM), ppu.vram()),
			AddressMapping {
				offset: range_start!(MMAP_RAM_BANK_SW),
				length: range_size!(MMAP_RAM_BANK_SW),
				device: mbc.ram,
			},
			AddressMapping::new(range_start!(MMAP_RAM_INTERNAL),
								range_size!(MMAP_RAM_INTERNAL), wram),
			AddressMapping::new(range_start!(MMAP_RAM_ECHO),
								range_size!(MMAP_RAM_ECHO), echo),
			AddressMapping::new(range_start!(MMAP_SPRITE_OAM),
								range_size!(MMAP_SPRITE_OAM), ppu.oam()),
			AddressMapping::new(range_start!(MMAP_UNUSABLE),
								range_size!(MMAP_UNUSABLE), Null),
			AddressMapping::new(range_start!(MMAP_IO_PORTS),
								range_size!(MMAP_IO_PORTS), Null),
			AddressMapping::new(range_start!(MMAP_IO_DISPLAY),
								range_size!(MMAP_IO_DISPLAY), ppu.registers()),
			AddressMapping::new(range_start!(MMAP_RAM_HIGH),
								range_size!(MMAP_RAM_HIGH),
								Buffer::new(range_size!(MMAP_RAM_HIGH) as usize)),
			AddressMapping::new(range_start!(MMAP_INTERRUPT_EN),
								range_size!(MMAP_INTERRUPT_EN),
								Buffer::new(range_size!(MMAP_INTERRUPT_EN) as usize)),
		])?;

		if config.strict_memory {
			bus.on_unmapped(strict_unmapped);
		}

		let cpu = match &config.boot_rom {
			Some(image) => {
				// The boot rom starts from zeroed registers and sets up the rest itself.
				Cpu::new(Box::new(BootOverlay::new(bus, image)?))
			}
			None => {
				let mut cpu = Cpu::new(Box::new(bus));
				cpu.registers.reset(config.model);
				ppu.reset();
				cpu
			}
		};

		Ok(Emulator {
			cpu,
			ppu,
			header,
			breakpoints: HashSet::new(),
		})
	}

	/// Run instructions until at least `window` clocks have elapsed.
	///
	/// The run ends early once the cpu halts or stops, or when the program
	/// counter reaches a breakpoint. Returns the amount of clocks taken.
	pub fn step(&mut self, window: usize) -> Result<usize, GameboyError> {
		let mut elapsed: usize = 0;

		while elapsed < window && self.cpu.is_running() {
			let cycles = self.cpu.step()?;
			self.ppu.step(cycles);
			elapsed += cycles;

			let pc = self.cpu.registers.pc;
			if self.breakpoints.contains(&pc) {
				log::debug!("breakpoint hit at {:#06x}", pc);
				break;
			}
		}

		Ok(elapsed)
	}

	/// Stop running once the program counter reaches `address`.
	pub fn add_breakpoint(&mut self, address: u16) {
		self.breakpoints.insert(address);
	}

	/// Returns whether there was a breakpoint at `address`.
	pub fn remove_breakpoint(&mut self, address: u16) -> bool {
		self.breakpoints.remove(&address)
	}

	#[allow(missing_docs)]
	pub fn cpu(&self) -> &Cpu {
		&self.cpu
	}

	/// The cpu, for poking at registers and memory between steps.
	pub fn cpu_mut(&mut self) -> &mut Cpu {
		&mut self.cpu
	}

	#[allow(missing_docs)]
	pub fn ppu(&self) -> &Ppu {
		&self.ppu
	}

	/// The header of the loaded cartridge.
	pub fn header(&self) -> &Header {
		&self.header
	}
}
