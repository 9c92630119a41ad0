// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! A lockable wrapper around another device.

use super::Memory;

use crate::GameboyError;

/// The access policy of a [`Guard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lock {
	/// Accesses pass through to the wrapped device.
	Unlocked,
	/// Reads return the held value, writes are discarded.
	Locked(u8),
}

/// Blocks cpu accesses to a device while its owner is using it.
///
/// The ppu locks the video ram and the OAM this way; while locked the cpu
/// reads the lock value (0xFF on hardware) and its writes are dropped.
pub struct Guard<T: Memory> {
	inner: T,
	lock: Lock,
}

impl<T: Memory> Guard<T> {
	/// Wrap a device, initially unlocked.
	pub fn new(inner: T) -> Self {
		Guard {
			inner,
			lock: Lock::Unlocked,
		}
	}

	/// Block accesses; reads will return `value` until unlocked.
	pub fn lock(&mut self, value: u8) {
		self.lock = Lock::Locked(value);
	}

	/// Let accesses through again.
	pub fn unlock(&mut self) {
		self.lock = Lock::Unlocked;
	}

	/// The current policy.
	pub fn state(&self) -> Lock {
		self.lock
	}

	/// Whether accesses are currently blocked.
	pub fn is_locked(&self) -> bool {
		self.lock != Lock::Unlocked
	}

	/// Direct access to the wrapped device, regardless of the lock.
	pub fn inner(&self) -> &T {
		&self.inner
	}

	/// Direct mutable access to the wrapped device, regardless of the lock.
	pub fn inner_mut(&mut self) -> &mut T {
		&mut self.inner
	}
}

impl<T: Memory> Memory for Guard<T> {
	fn write(&mut self, address: u16, value: u8) -> Result<(), GameboyError> {
		match self.lock {
			Lock::Unlocked => self.inner.write(address, value),
			Lock::Locked(_) => Ok(()),
		}
	}

	fn read(&self, address: u16) -> Result<u8, GameboyError> {
		match self.lock {
			Lock::Unlocked => self.inner.read(address),
			Lock::Locked(value) => Ok(value),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bus::buffer::Buffer;

	#[test]
	fn test_guard() -> Result<(), GameboyError> {
		let mut vram = Guard::new(Buffer::new(0x10));

		vram.write(0, 0x12)?;
		assert_eq!(0x12, vram.read(0)?);

		vram.lock(0xFF);
		assert!(vram.is_locked());
		assert_eq!(0xFF, vram.read(0)?);

		// Dropped while locked.
		vram.write(0, 0x34)?;
		assert_eq!(0x12, vram.inner().read(0)?);

		vram.unlock();
		assert_eq!(Lock::Unlocked, vram.state());
		assert_eq!(0x12, vram.read(0)?);

		Ok(())
	}

	#[test]
	fn test_lock_value() -> Result<(), GameboyError> {
		let mut guard = Guard::new(Buffer::from_bytes(vec![0xFF_u8]));

		guard.lock(0x00);
		assert_eq!(0x00, guard.read(0)?);

		guard.write(0, 0x12)?;
		assert_eq!(0xFF, guard.inner().read(0)?);

		guard.unlock();
		assert_eq!(0xFF, guard.read(0)?);

		Ok(())
	}

	#[test]
	fn test_inner_bypasses_lock() -> Result<(), GameboyError> {
		let mut oam = Guard::new(Buffer::new(0xA0));

		oam.lock(0xFF);
		oam.inner_mut().write(0x9F, 0x77)?;

		assert_eq!(0xFF, oam.read(0x9F)?);
		assert_eq!(0x77, oam.inner().read(0x9F)?);

		Ok(())
	}
}
