// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! A device without storage.

use super::Memory;

use crate::GameboyError;

/// Reads as zero, and silently discards every write.
///
/// Used for holes in the address space that must not fault, e.g. the
/// unusable region after the OAM, or a cartridge without external ram.
#[derive(Clone, Copy, Debug, Default)]
pub struct Null;

impl Memory for Null {
	fn write(&mut self, _address: u16, _value: u8) -> Result<(), GameboyError> {
		Ok(())
	}

	fn read(&self, _address: u16) -> Result<u8, GameboyError> {
		Ok(0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_null() -> Result<(), GameboyError> {
		let mut null = Null;

		for address in [0_u16, 0x1234, 0xFFFF].iter() {
			null.write(*address, 0xFF)?;
			assert_eq!(0, null.read(*address)?);
		}

		Ok(())
	}
}
