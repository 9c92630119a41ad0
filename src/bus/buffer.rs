// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Emulate plain random access memory.

use std::cell::RefCell;
use std::rc::Rc;

use super::Memory;

use crate::GameboyError;

/// A fixed-size block of bytes.
///
/// The storage is reference counted, so two buffers may present the same
/// bytes (the internal ram and its echo are mapped that way).
pub struct Buffer {
	data: Rc<RefCell<Box<[u8]>>>,
}

impl Buffer {
	/// Create a zeroed buffer of the given size.
	pub fn new(size: usize) -> Self {
		Buffer::from_bytes(vec![0_u8; size])
	}

	/// Create a buffer that holds the given bytes.
	pub fn from_bytes<B: Into<Box<[u8]>>>(bytes: B) -> Self {
		Buffer {
			data: Rc::new(RefCell::new(bytes.into())),
		}
	}

	/// Create a new view of this buffer's storage.
	///
	/// Writes through either view are visible through both.
	pub fn share(&self) -> Self {
		Buffer {
			data: self.data.clone(),
		}
	}

	/// The buffer's size in bytes.
	pub fn len(&self) -> usize {
		self.data.borrow().len()
	}

	/// Whether the buffer has no storage at all.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns a copy of the buffer's contents.
	pub fn to_vec(&self) -> Vec<u8> {
		self.data.borrow().to_vec()
	}
}

impl Memory for Buffer {
	fn write(&mut self, address: u16, value: u8) -> Result<(), GameboyError> {
		match self.data.borrow_mut().get_mut(address as usize) {
			Some(cell) => {
				*cell = value;
				Ok(())
			}
			None => Err(GameboyError::BadAddress(address)),
		}
	}

	fn read(&self, address: u16) -> Result<u8, GameboyError> {
		self.data.borrow()
			.get(address as usize)
			.copied()
			.ok_or(GameboyError::BadAddress(address))
	}
}
