// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use dmg_core::bus::cartridge::consts::*;
use dmg_core::bus::cartridge::header_checksum;

/// Where `rom_with_program` places the program.
pub const PROGRAM_START: u16 = 0x150;

/// Builds a rom-only image with a valid header whose entry point jumps to
/// `program`, placed right after the header.
pub fn rom_with_program(program: &[u8]) -> Vec<u8> {
	let mut rom = vec![0_u8; 0x8000];

	// nop; jp 0x0150
	rom[0x100..0x104].copy_from_slice(&[0x00, 0xC3, 0x50, 0x01]);
	rom[0x104..0x134].copy_from_slice(&NINTENDO_LOGO);
	rom[0x134..0x138].copy_from_slice(b"TEST");
	rom[ROM_CARTRIDGE_TYPE] = CARTRIDGE_ROM_RAM;
	rom[ROM_HEADER_CHECKSUM] = header_checksum(&rom);

	let start = PROGRAM_START as usize;
	rom[start..start + program.len()].copy_from_slice(program);

	rom
}
