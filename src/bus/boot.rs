// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Emulate the boot rom's shadowing of the cartridge header.

use super::Memory;
use super::consts::*;
use super::memory_range::*;

use crate::GameboyError;

/// The boot rom's size in bytes.
pub const BOOT_ROM_SIZE: usize = range_size!(MMAP_BOOT_ROM) as usize;

/// Presents a boot rom over the first 256 bytes of the wrapped address space.
///
/// While booting, reads below 0x100 return the boot image and writes there
/// are dropped. The first write to 0xFF50 ends booting for good; that write
/// is swallowed rather than forwarded.
pub struct BootOverlay<M: Memory> {
	memory: M,
	image: Box<[u8; BOOT_ROM_SIZE]>,
	booting: bool,
}

impl<M: Memory> BootOverlay<M> {
	/// Overlay `image` on top of `memory`. The image must be exactly 256 bytes.
	pub fn new(memory: M, image: &[u8]) -> Result<Self, GameboyError> {
		let mut rom = Box::new([0_u8; BOOT_ROM_SIZE]);

		if image.len() != BOOT_ROM_SIZE {
			return Err(GameboyError::BadBootRom(image.len()));
		}
		rom.copy_from_slice(image);

		Ok(BootOverlay {
			memory,
			image: rom,
			booting: true,
		})
	}

	/// Whether the boot rom is still mapped.
	pub fn is_booting(&self) -> bool {
		self.booting
	}

	/// The wrapped address space.
	pub fn inner(&self) -> &M {
		&self.memory
	}

	/// The wrapped address space, mutably.
	pub fn inner_mut(&mut self) -> &mut M {
		&mut self.memory
	}
}

impl<M: Memory> Memory for BootOverlay<M> {
	fn write(&mut self, address: u16, value: u8) -> Result<(), GameboyError> {
		if self.booting {
			match address {
				memory_range!(MMAP_BOOT_ROM) => return Ok(()),
				IO_BOOT_OFF => {
					log::debug!("boot rom unmapped");
					self.booting = false;
					return Ok(());
				}
				_ => { }
			}
		}

		self.memory.write(address, value)
	}

	fn read(&self, address: u16) -> Result<u8, GameboyError> {
		match address {
			memory_range!(MMAP_BOOT_ROM) if self.booting => {
				Ok(self.image[address as usize])
			}
			_ => self.memory.read(address),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bus::buffer::Buffer;

	fn image() -> Vec<u8> {
		(0..BOOT_ROM_SIZE).map(|i| !(i as u8)).collect()
	}

	#[test]
	fn test_bad_image() {
		let result = BootOverlay::new(Buffer::new(0x10), &[0; 0x80]);

		assert_eq!(Some(GameboyError::BadBootRom(0x80)), result.err());
	}

	#[test]
	fn test_overlay() -> Result<(), GameboyError> {
		let memory = Buffer::new(0x10000);
		let mut boot = BootOverlay::new(memory.share(), &image())?;

		assert!(boot.is_booting());
		assert_eq!(0xFF, boot.read(0x00)?);
		assert_eq!(0x00, boot.read(0xFF)?);

		// Rejected while booting, but the rest of the space is reachable.
		boot.write(0x10, 0x42)?;
		boot.write(0x100, 0x42)?;
		assert_eq!(0x00, memory.read(0x10)?);
		assert_eq!(0x42, boot.read(0x100)?);

		boot.write(IO_BOOT_OFF, 1)?;
		assert!(!boot.is_booting());
		assert_eq!(0x00, memory.read(IO_BOOT_OFF)?);

		boot.write(0x10, 0x42)?;
		assert_eq!(0x42, boot.read(0x10)?);
		assert_eq!(0x00, boot.read(0x00)?);

		// From now on the control register is a plain address.
		boot.write(IO_BOOT_OFF, 1)?;
		assert_eq!(0x01, memory.read(IO_BOOT_OFF)?);

		Ok(())
	}
}
