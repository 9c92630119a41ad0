// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! Emulator hardware emulation configuration and preferences.

/// The hardware specification for the different models differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HardwareModel {
	/// Original GameBoy
	GB,
	/// GameBoy Pocket
	GBP,
	/// Super GameBoy
	SGB,
}

/// Emulation settings and preferences goes here.
#[derive(Clone, Debug)]
pub struct Config {
	/// The model of the emulated machine
	pub model: HardwareModel,
	/// A 256-byte boot rom image.
	///
	/// Without one, the cpu starts at 0x100 with the registers the boot
	/// rom of `model` would have left behind.
	pub boot_rom: Option<Vec<u8>>,
	/// Treat every access to an unmapped address as a fatal error.
	pub strict_memory: bool,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			model: HardwareModel::GB,
			boot_rom: None,
			strict_memory: false,
		}
	}
}
