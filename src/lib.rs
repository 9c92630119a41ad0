// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! This library provides emulation of the original gameboy's (DMG) Z80-like CPU,
//! its memory-mapped address space and the timing of its picture processing unit,
//! as described in the publicly available "Game Boy CPU Manual" and the pandocs.

use thiserror::Error;

pub mod bus;
pub mod cpu;
pub mod config;
pub mod emulator;

/// Every fault the emulation core can raise.
///
/// The core is a deterministic interpreter: identical inputs always lead to
/// identical errors, and no error is retried or swallowed internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameboyError {
	/// Two bus mappings claim the same absolute address.
	#[error("address mapping overlap at {0:#06x}")]
	OverlappingMapping(u16),
	/// A bus mapping reaches past the 16-bit address space.
	#[error("address mapping at {offset:#06x} with length {length:#x} exceeds the address space")]
	MappingOutOfBounds {
		/// The mapping's first address.
		offset: u16,
		/// The mapping's size in bytes.
		length: u16,
	},
	/// The cpu executed one of the undefined opcodes.
	#[error("illegal opcode encountered: {0:#04x}")]
	IllegalOpcode(u8),
	/// No device is mapped at the accessed address (strict mode only).
	#[error("unmapped access at {address:#06x} (write: {write})")]
	UnmappedAccess {
		/// The absolute address that was accessed.
		address: u16,
		/// Whether the access was a write.
		write: bool,
	},
	/// A device was accessed past its own extent.
	#[error("address {0:#06x} is out of the device's bounds")]
	BadAddress(u16),
	/// The cartridge's type byte describes an unsupported memory bank controller.
	#[error("unsupported cartridge type {0:#04x}")]
	UnsupportedCartridge(u8),
	/// The rom image is too small to hold the two fixed rom windows.
	#[error("rom image of {0} bytes is too small")]
	RomTooSmall(usize),
	/// The boot rom image doesn't have the expected size.
	#[error("boot rom image must be 256 bytes, got {0}")]
	BadBootRom(usize),
}
