// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Emulate a block of memory-mapped, named I/O registers.

use super::Memory;

use crate::GameboyError;

/// Transforms a byte on its way in or out of a register.
pub type Transform = fn(u8) -> u8;

/// Describes a single register of a [`RegisterBank`].
#[derive(Clone, Copy, Debug)]
pub struct RegisterDef<K> {
	address: u16,
	name: K,
	write_mask: Option<u8>,
	on_write: Option<Transform>,
	on_read: Option<Transform>,
}

impl<K> RegisterDef<K> {
	/// A fully writable register at the given bank-relative address.
	pub const fn new(address: u16, name: K) -> Self {
		RegisterDef {
			address,
			name,
			write_mask: None,
			on_write: None,
			on_read: None,
		}
	}

	/// Only the set bits of `mask` may be changed through the address space.
	pub fn write_mask(mut self, mask: u8) -> Self {
		self.write_mask = Some(mask);
		self
	}

	/// Replace addressed writes by the transform's result. Takes precedence
	/// over the write mask.
	pub fn on_write(mut self, transform: Transform) -> Self {
		self.on_write = Some(transform);
		self
	}

	/// Pass the stored value through the transform on addressed reads.
	pub fn on_read(mut self, transform: Transform) -> Self {
		self.on_read = Some(transform);
		self
	}
}

/// Sparse registers, reachable both by address (the cpu's view) and by
/// name (the owning peripheral's view).
///
/// Accesses by name bypass the write mask and both transforms.
pub struct RegisterBank<K: Copy + Eq> {
	data: Vec<u8>,
	/// Maps an address into its register definition.
	index: Vec<Option<usize>>,
	registers: Vec<RegisterDef<K>>,
}

impl<K: Copy + Eq> RegisterBank<K> {
	/// Build a bank spanning up to its highest register's address.
	pub fn new(registers: Vec<RegisterDef<K>>) -> Self {
		let size = registers.iter()
			.map(|register| register.address as usize + 1)
			.max()
			.unwrap_or(0);

		let mut index = vec![None; size];
		for (position, register) in registers.iter().enumerate() {
			index[register.address as usize] = Some(position);
		}

		RegisterBank {
			data: vec![0_u8; size],
			index,
			registers,
		}
	}

	fn register(&self, address: u16) -> Option<&RegisterDef<K>> {
		self.index.get(address as usize)
			.copied()
			.flatten()
			.map(|position| &self.registers[position])
	}

	fn address_of(&self, name: K) -> Option<usize> {
		self.registers.iter()
			.find(|register| register.name == name)
			.map(|register| register.address as usize)
	}

	/// Read a register's stored value.
	pub fn get(&self, name: K) -> u8 {
		self.address_of(name)
			.map(|address| self.data[address])
			.unwrap_or(0)
	}

	/// Overwrite a register's stored value.
	pub fn set(&mut self, name: K, value: u8) {
		if let Some(address) = self.address_of(name) {
			self.data[address] = value;
		}
	}
}

impl<K: Copy + Eq> Memory for RegisterBank<K> {
	fn write(&mut self, address: u16, value: u8) -> Result<(), GameboyError> {
		let (on_write, write_mask) = match self.register(address) {
			Some(register) => (register.on_write, register.write_mask),
			None => return Ok(()),
		};

		let old = self.data[address as usize];
		self.data[address as usize] = match (on_write, write_mask) {
			(Some(transform), _) => transform(value),
			(None, Some(mask)) => (value & mask) | (old & !mask),
			(None, None) => value,
		};

		Ok(())
	}

	fn read(&self, address: u16) -> Result<u8, GameboyError> {
		Ok(match self.register(address) {
			Some(register) => {
				let value = self.data[address as usize];
				register.on_read.map_or(value, |transform| transform(value))
			}
			None => 0,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Clone, Copy, Debug, PartialEq, Eq)]
	enum Reg {
		Zero,
		One,
		Sparse,
	}

	#[test]
	fn test_address_and_name() -> Result<(), GameboyError> {
		let mut bank = RegisterBank::new(vec![
			RegisterDef::new(0, Reg::Zero),
			RegisterDef::new(1, Reg::One),
		]);

		bank.write(0, 0xFF)?;
		assert_eq!(0xFF, bank.read(0)?);
		assert_eq!(0xFF, bank.get(Reg::Zero));
		assert_eq!(0, bank.get(Reg::One));

		bank.set(Reg::One, 1);
		assert_eq!(1, bank.read(1)?);

		Ok(())
	}

	#[test]
	fn test_unregistered() -> Result<(), GameboyError> {
		let mut bank = RegisterBank::new(vec![RegisterDef::new(4, Reg::Sparse)]);

		bank.write(2, 0x42)?;
		assert_eq!(0, bank.read(2)?);
		assert_eq!(0, bank.read(0x100)?);

		Ok(())
	}

	#[test]
	fn test_write_mask() -> Result<(), GameboyError> {
		let mut bank = RegisterBank::new(vec![
			RegisterDef::new(0, Reg::Zero).write_mask(0b1100_0001),
		]);

		bank.set(Reg::Zero, 0xFF);
		bank.write(0, 0)?;
		assert_eq!(0b0011_1110, bank.read(0)?);

		bank.set(Reg::Zero, 0);
		bank.write(0, 0xFF)?;
		assert_eq!(0b1100_0001, bank.get(Reg::Zero));

		Ok(())
	}

	#[test]
	fn test_transforms() -> Result<(), GameboyError> {
		let mut bank = RegisterBank::new(vec![
			RegisterDef::new(0, Reg::Zero).write_mask(0).on_write(|value| value.wrapping_add(1)),
			RegisterDef::new(1, Reg::One).on_read(|value| value.wrapping_add(1)),
		]);

		// The write transform wins over the mask.
		bank.write(0, 0xFF)?;
		assert_eq!(0, bank.get(Reg::Zero));
		bank.write(0, 0x10)?;
		assert_eq!(0x11, bank.read(0)?);

		// The read transform only applies to the address space.
		bank.set(Reg::One, 0xFF);
		assert_eq!(0, bank.read(1)?);
		assert_eq!(0xFF, bank.get(Reg::One));

		Ok(())
	}
}
