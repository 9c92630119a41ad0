// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! Emulate the gameboy's memory mapping and bus access.
//!
//! Every peripheral is a [`Memory`] device addressed from zero. The [`Bus`]
//! composes a fixed set of devices into the cpu's 16-bit address space and
//! translates absolute addresses into device-relative ones.

#[macro_use]
pub mod memory_range;
pub mod null;
pub mod buffer;
pub mod guard;
pub mod register_bank;
pub mod boot;
pub mod cartridge;
pub mod ppu;

use std::cell::RefCell;
use std::rc::Rc;

use memory_range::*;

use crate::GameboyError;

/// Bus locations-related constants.
#[allow(missing_docs)]
pub mod consts {
	use super::*;

	pub const MMAP_ROM_BANK0: MemoryRange = make_range!(0x0000, 0x3FFF);
	/// Switchable ROM bank.
	pub const MMAP_ROM_BANK_SW: MemoryRange = make_range!(0x4000, 0x7FFF);
	pub const MMAP_VIDEO_RAM: MemoryRange = make_range!(0x8000, 0x9FFF);
	/// Switchable RAM bank.
	pub const MMAP_RAM_BANK_SW: MemoryRange = make_range!(0xA000, 0xBFFF);
	pub const MMAP_RAM_INTERNAL: MemoryRange = make_range!(0xC000, 0xDFFF);
	/// Maps to the same physical memory as the internal ram.
	pub const MMAP_RAM_ECHO: MemoryRange = make_range!(0xE000, 0xFDFF);
	/// Sprite/Object attribute memory.
	pub const MMAP_SPRITE_OAM: MemoryRange = make_range!(0xFE00, 0xFE9F);
	/// Reads as zero and ignores writes.
	pub const MMAP_UNUSABLE: MemoryRange = make_range!(0xFEA0, 0xFEFF);
	pub const MMAP_IO_PORTS: MemoryRange = make_range!(0xFF00, 0xFF3F);
	pub const MMAP_IO_DISPLAY: MemoryRange = make_range!(0xFF40, 0xFF4B);
	/// High RAM.
	pub const MMAP_RAM_HIGH: MemoryRange = make_range!(0xFF80, 0xFFFE);
	/// Interrupt enable register.
	pub const MMAP_INTERRUPT_EN: MemoryRange = make_range!(0xFFFF, 0xFFFF);

	/// The boot rom shadows the beginning of the cartridge's first bank.
	pub const MMAP_BOOT_ROM: MemoryRange = make_range!(0x0000, 0x00FF);
	/// Any write here unmaps the boot rom for good.
	pub const IO_BOOT_OFF: u16 = 0xFF50;
}

/// A peripheral that can be written and read by the cpu.
///
/// Addresses are always relative to the start of the device's own window.
pub trait Memory {
	/// Write a 8-bit value to the peripheral.
	///
	/// * `address` - The device-relative address to write into.
	/// * `value` - The value to write.
	fn write(&mut self, address: u16, value: u8) -> Result<(), GameboyError>;

	/// Read a 8-bit value from this peripheral.
	///
	/// * `address` - The device-relative address to read from.
	fn read(&self, address: u16) -> Result<u8, GameboyError>;
}

/// A device that is owned by more than one component, e.g. a ppu-managed
/// video ram that's also mapped on the bus.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a device so it can be shared between its owner and the bus.
pub fn shared<T>(device: T) -> Shared<T> {
	Rc::new(RefCell::new(device))
}

impl<T: Memory + ?Sized> Memory for Rc<RefCell<T>> {
	fn write(&mut self, address: u16, value: u8) -> Result<(), GameboyError> {
		self.borrow_mut().write(address, value)
	}

	fn read(&self, address: u16) -> Result<u8, GameboyError> {
		self.borrow().read(address)
	}
}

impl<T: Memory + ?Sized> Memory for Box<T> {
	fn write(&mut self, address: u16, value: u8) -> Result<(), GameboyError> {
		(**self).write(address, value)
	}

	fn read(&self, address: u16) -> Result<u8, GameboyError> {
		(**self).read(address)
	}
}

/// Reads and writes a little-endian 16-bit word.
pub trait MemoryExt: Memory {
	/// Read the word stored at `address` and `address + 1`.
	fn read_word(&self, address: u16) -> Result<u16, GameboyError> {
		let low = self.read(address)?;
		let high = self.read(address.wrapping_add(1))?;

		Ok(u16::from_le_bytes([low, high]))
	}

	/// Store a word at `address` (low byte) and `address + 1` (high byte).
	fn write_word(&mut self, address: u16, value: u16) -> Result<(), GameboyError> {
		let [low, high] = value.to_le_bytes();

		self.write(address, low)?;
		self.write(address.wrapping_add(1), high)
	}

	/// Writes the complete array's bytes starting from the given address.
	fn write_all(&mut self, address: u16, array: &[u8]) -> Result<(), GameboyError> {
		for (index, value) in array.iter().enumerate() {
			self.write(address.wrapping_add(index as u16), *value)?;
		}

		Ok(())
	}
}

impl<M: Memory + ?Sized> MemoryExt for M { }

/// Places a device in a window of the bus' address space.
pub struct AddressMapping {
	/// The absolute address of the window's first byte.
	pub offset: u16,
	/// The size of the window in bytes.
	pub length: u16,
	/// The device presented in this window.
	pub device: Box<dyn Memory>,
}

impl AddressMapping {
	/// Create a new mapping.
	pub fn new<M: Memory + 'static>(offset: u16, length: u16, device: M) -> Self {
		AddressMapping {
			offset,
			length,
			device: Box::new(device),
		}
	}
}

/// The kind of access that missed every mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
	/// A read, which will return zero unless the hook fails.
	Read,
	/// A write, which will be discarded unless the hook fails.
	Write,
}

/// Invoked whenever the bus is accessed at an address no device claims.
pub type UnmappedHook = Box<dyn Fn(u16, Access) -> Result<(), GameboyError>>;

/// The default policy: note the access and carry on.
pub fn ignore_unmapped(address: u16, access: Access) -> Result<(), GameboyError> {
	log::trace!("{:?} of unmapped address {:#06x}", access, address);
	Ok(())
}

/// Escalates every unmapped access into a fatal error.
pub fn strict_unmapped(address: u16, access: Access) -> Result<(), GameboyError> {
	Err(GameboyError::UnmappedAccess {
		address,
		write: access == Access::Write,
	})
}

/// A virtual representation of the gameboy's memory bus.
///
/// The mappings are fixed at construction and resolved through a flat
/// per-address lookup table.
pub struct Bus {
	mappings: Vec<AddressMapping>,
	lookup: Vec<Option<usize>>,
	unmapped: UnmappedHook,
}

impl Bus {
	/// Build a new address space out of the given mappings.
	///
	/// Fails if two mappings claim the same address, or if a mapping
	/// reaches past 0xFFFF.
	pub fn new(mappings: Vec<AddressMapping>) -> Result<Self, GameboyError> {
		let size = mappings.iter()
			.map(|mapping| mapping.offset as usize + mapping.length as usize)
			.max()
			.unwrap_or(0);

		let mut lookup: Vec<Option<usize>> = vec![None; size];

		for (index, mapping) in mappings.iter().enumerate() {
			let start = mapping.offset as usize;
			let end = start + mapping.length as usize;

			if end > 0x10000 {
				return Err(GameboyError::MappingOutOfBounds {
					offset: mapping.offset,
					length: mapping.length,
				});
			}

			for (address, slot) in lookup[start..end].iter_mut().enumerate() {
				if slot.is_some() {
					return Err(GameboyError::OverlappingMapping((start + address) as u16));
				}

				*slot = Some(index);
			}
		}

		Ok(Bus {
			mappings,
			lookup,
			unmapped: Box::new(ignore_unmapped),
		})
	}

	/// Replace the policy applied on unmapped accesses.
	pub fn on_unmapped<F>(&mut self, hook: F)
		where F: Fn(u16, Access) -> Result<(), GameboyError> + 'static
	{
		self.unmapped = Box::new(hook);
	}

	/// Returns the index of the mapping that contains the given address.
	fn mapping(&self, address: u16) -> Option<usize> {
		self.lookup.get(address as usize).copied().flatten()
	}
}

impl Memory for Bus {
	/// Handle writing to a memory region.
	/// The function calls the relevent peripheral's implementation.
	fn write(&mut self, address: u16, value: u8) -> Result<(), GameboyError> {
		match self.mapping(address) {
			Some(index) => {
				let mapping = &mut self.mappings[index];
				mapping.device.write(address - mapping.offset, value)
			}
			None => (self.unmapped)(address, Access::Write),
		}
	}

	/// Handle reading from a memory region.
	/// The function calls the relevent peripheral's implementation.
	fn read(&self, address: u16) -> Result<u8, GameboyError> {
		match self.mapping(address) {
			Some(index) => {
				let mapping = &self.mappings[index];
				mapping.device.read(address - mapping.offset)
			}
			None => {
				(self.unmapped)(address, Access::Read)?;
				Ok(0)
			}
		}
	}
}
