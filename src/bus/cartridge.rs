// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
//! The cartridge controller - parses the game's header and exposes the rom and
//! ram windows the cartridge presents on the bus.

use crate::GameboyError;
use super::Memory;
use super::buffer::Buffer;
use super::null::Null;
use super::consts::*;
use super::memory_range::*;

/// cartridge addresses-related constants.
#[allow(missing_docs)]
pub mod consts {
	use super::*;

	/// Compared against by the boot rom before handing over to the game.
	pub const ROM_LOGO: MemoryRange = make_range!(0x0104, 0x0133);
	/// Game title, padded with NULs.
	pub const ROM_GAME_TITLE: MemoryRange = make_range!(0x0134, 0x0143);
	/// Overlaps the end of the title on newer (CGB) cartridges.
	pub const ROM_MANUFACTURER_CODE: MemoryRange = make_range!(0x013F, 0x0142);

	/// Gameboy color indicator.
	/// 0x80 if supported, 0xC0 if required.
	pub const ROM_GAMEBOY_COLOR: usize = 0x0143;
	/// Gameboy Super indicator.
	/// 0x03 for SGB, 0x00 for GB.
	pub const ROM_GAMEBOY_SUPER: usize = 0x0146;
	/// Cartridge type.
	///
	/// 0 - ROM Only, 1 - ROM+MBC1, 2 - ROM+MBC1+RAM, 3 - ROM+MBC1+RAM+Battery,
	/// 5 - ROM+MBC2, 6 - ROM+MBC2+Battery, 8 - ROM+RAM, 9 - ROM+RAM+Battery,
	/// 12 - ROM+MBC3+RAM, 13 - ROM+MBC3+RAM+Battery, 19 - ROM+MBC5,
	/// 1A - ROM+MBC5+RAM, 1B - ROM+MBC5+RAM+Battery, 1C - ROM+MBC5+Rumble,
	/// 1D - ROM+MBC5+Rumble+SRAM, 1E - ROM+MBC5+Rumble+SRAM+Battery
	pub const ROM_CARTRIDGE_TYPE: usize = 0x0147;
	pub const ROM_HEADER_CHECKSUM: usize = 0x014D;
	/// Big-endian, covers the whole rom. Not verified by the hardware.
	pub const ROM_GLOBAL_CHECKSUM: usize = 0x014E;

	pub const CGB_SUPPORTED: u8 = 0x80;
	pub const CGB_REQUIRED: u8 = 0xC0;
	pub const SGB_SUPPORTED: u8 = 0x03;

	pub const CARTRIDGE_ROM_ONLY: u8 = 0x00;
	pub const CARTRIDGE_ROM_RAM: u8 = 0x08;
	pub const CARTRIDGE_ROM_RAM_BATTERY: u8 = 0x09;

	/// Cartridge types that carry a battery.
	pub const BATTERY_TYPES: [u8; 11] = [
		0x03, 0x06, 0x09, 0x0D, 0x0F, 0x10, 0x13, 0x1B, 0x1E, 0x22, 0xFF,
	];

	/// The title is cut short on cartridges that know about the color model.
	pub const CGB_TITLE_LENGTH: usize = 11;

	pub const NINTENDO_LOGO: [u8; 48] = [
		0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83,
		0x00, 0x0C, 0x00, 0x0D, 0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E,
		0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99, 0xBB, 0xBB, 0x67, 0x63,
		0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
	];
}

use consts::*;

/// Convert a memory range into a slice range over the rom image.
macro_rules! rom_range {
	($range:tt) => (
		(range_start!($range) as usize)..(range_end!($range) as usize + 1)
	)
}

/// The color model support advertised by the cartridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CgbSupport {
	/// A DMG-only game.
	None,
	/// Runs on both models.
	Supported,
	/// Runs only on the color model.
	Required,
}

/// Metadata extracted from the cartridge header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
	/// The game's title.
	pub title: String,
	/// Color model support.
	pub cgb_support: CgbSupport,
	/// The manufacturer code, only present on color-aware cartridges.
	pub game_id: Option<String>,
	/// Whether the game uses the Super Gameboy's features.
	pub sgb_support: bool,
	/// The memory bank controller type.
	pub cartridge_type: u8,
	/// The checksum stored in the header.
	pub header_checksum: u8,
	/// The checksum of the whole rom stored in the header.
	pub global_checksum: u16,
	/// Whether the external ram is battery-backed.
	pub has_battery: bool,
}

/// The windows a cartridge maps onto the bus.
pub struct Mbc {
	/// The fixed first bank, 0x0000-0x3FFF.
	pub rom0: Box<dyn Memory>,
	/// The switchable bank, 0x4000-0x7FFF.
	pub rom_x: Box<dyn Memory>,
	/// External ram, 0xA000-0xBFFF.
	pub ram: Box<dyn Memory>,
}

/// A single read-only rom bank.
struct RomBank {
	data: Buffer,
}

impl Memory for RomBank {
	fn write(&mut self, address: u16, value: u8) -> Result<(), GameboyError> {
		log::trace!("dropped write of {:#04x} to rom offset {:#06x}", value, address);
		Ok(())
	}

	fn read(&self, address: u16) -> Result<u8, GameboyError> {
		self.data.read(address)
	}
}

/// The game's cartridge
pub struct Cartridge {
	header: Header,
	mbc: Mbc,
	header_valid: bool,
}

impl Cartridge {
	/// Parse the rom image and build its memory bank controller.
	pub fn new(data: &[u8]) -> Result<Self, GameboyError> {
		// Make sure that the rom contains both fixed windows
		let bank_size = range_size!(MMAP_ROM_BANK0) as usize;
		if data.len() < bank_size * 2 {
			return Err(GameboyError::RomTooSmall(data.len()));
		}

		let header = parse_header(data);
		let header_valid = header_checksum(data) == header.header_checksum
			&& data[rom_range!(ROM_LOGO)] == NINTENDO_LOGO[..];

		let rom0 = RomBank { data: Buffer::from_bytes(&data[..bank_size]) };
		let rom_x = RomBank { data: Buffer::from_bytes(&data[bank_size..bank_size * 2]) };

		let ram: Box<dyn Memory> = match header.cartridge_type {
			CARTRIDGE_ROM_ONLY => Box::new(Null),
			CARTRIDGE_ROM_RAM | CARTRIDGE_ROM_RAM_BATTERY => {
				Box::new(Buffer::new(range_size!(MMAP_RAM_BANK_SW) as usize))
			}
			other => return Err(GameboyError::UnsupportedCartridge(other)),
		};

		Ok(Cartridge {
			header,
			mbc: Mbc {
				rom0: Box::new(rom0),
				rom_x: Box::new(rom_x),
				ram,
			},
			header_valid,
		})
	}

	/// The parsed header.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Whether both the header checksum and the logo match.
	pub fn has_valid_header(&self) -> bool {
		self.header_valid
	}

	/// Split the cartridge into its metadata and its bus windows.
	pub fn into_parts(self) -> (Header, Mbc) {
		(self.header, self.mbc)
	}
}

/// Compute the header checksum the way the boot rom does.
pub fn header_checksum(data: &[u8]) -> u8 {
	data[range_start!(ROM_GAME_TITLE) as usize..ROM_HEADER_CHECKSUM]
		.iter()
		.fold(0_u8, |checksum, byte| checksum.wrapping_sub(*byte).wrapping_sub(1))
}

/// Decode a NUL-padded ascii field.
fn ascii(bytes: &[u8]) -> String {
	let text: String = bytes.iter()
		.map(|byte| if *byte == 0 { ' ' } else { *byte as char })
		.collect();

	text.trim_end().to_string()
}

fn parse_header(data: &[u8]) -> Header {
	let cartridge_type = data[ROM_CARTRIDGE_TYPE];

	let cgb_flag = data[ROM_GAMEBOY_COLOR];
	let cgb_support = if cgb_flag & CGB_REQUIRED == CGB_REQUIRED {
		CgbSupport::Required
	} else if cgb_flag & CGB_SUPPORTED != 0 {
		CgbSupport::Supported
	} else {
		CgbSupport::None
	};

	let title = &data[rom_range!(ROM_GAME_TITLE)];
	let (title, game_id) = match cgb_support {
		CgbSupport::None => (ascii(title), None),
		_ => (
			ascii(&title[..CGB_TITLE_LENGTH]),
			Some(ascii(&data[rom_range!(ROM_MANUFACTURER_CODE)])),
		),
	};

	Header {
		title,
		cgb_support,
		game_id,
		sgb_support: data[ROM_GAMEBOY_SUPER] == SGB_SUPPORTED,
		cartridge_type,
		header_checksum: data[ROM_HEADER_CHECKSUM],
		global_checksum: u16::from_be_bytes([
			data[ROM_GLOBAL_CHECKSUM],
			data[ROM_GLOBAL_CHECKSUM + 1],
		]),
		has_battery: BATTERY_TYPES.contains(&cartridge_type),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TEST_GAME_TITLE: &[u8] = b"TEST TITLE\0\0\0\0\0\0";

	/// Creates an empty rom with a valid header for testing.
	pub fn empty() -> Vec<u8> {
		let mut rom = vec![0_u8; 0x8000];
		rom[rom_range!(ROM_LOGO)].copy_from_slice(&NINTENDO_LOGO);
		rom[rom_range!(ROM_GAME_TITLE)].copy_from_slice(TEST_GAME_TITLE);
		rom[ROM_CARTRIDGE_TYPE] = CARTRIDGE_ROM_ONLY;
		rom[ROM_GLOBAL_CHECKSUM] = 0x12;
		rom[ROM_GLOBAL_CHECKSUM + 1] = 0x34;
		rom[ROM_HEADER_CHECKSUM] = header_checksum(&rom);

		rom
	}

	#[test]
	fn test_cartridge_loading() -> Result<(), GameboyError> {
		let cart = Cartridge::new(&empty())?;
		let header = cart.header();

		assert_eq!("TEST TITLE", header.title);
		assert_eq!(CgbSupport::None, header.cgb_support);
		assert_eq!(None, header.game_id);
		assert!(!header.sgb_support);
		assert!(!header.has_battery);
		assert_eq!(0x1234, header.global_checksum);
		assert!(cart.has_valid_header());

		Ok(())
	}

	#[test]
	fn test_invalid_header() -> Result<(), GameboyError> {
		let mut rom = empty();
		rom[ROM_HEADER_CHECKSUM] ^= 1;
		assert!(!Cartridge::new(&rom)?.has_valid_header());

		let mut rom = empty();
		rom[range_start!(ROM_LOGO) as usize] = 0;
		assert!(!Cartridge::new(&rom)?.has_valid_header());

		Ok(())
	}

	#[test]
	fn test_cgb_header() -> Result<(), GameboyError> {
		let mut rom = empty();
		rom[range_start!(ROM_GAME_TITLE) as usize..ROM_GAMEBOY_COLOR].copy_from_slice(b"POKEMON_GLDAAUE");
		rom[ROM_GAMEBOY_COLOR] = CGB_SUPPORTED;
		rom[ROM_GAMEBOY_SUPER] = SGB_SUPPORTED;
		rom[ROM_CARTRIDGE_TYPE] = CARTRIDGE_ROM_RAM_BATTERY;

		let header = Cartridge::new(&rom)?.header().clone();
		assert_eq!("POKEMON_GLD", header.title);
		assert_eq!(Some("AAUE".to_string()), header.game_id);
		assert_eq!(CgbSupport::Supported, header.cgb_support);
		assert!(header.sgb_support);
		assert!(header.has_battery);

		rom[ROM_GAMEBOY_COLOR] = CGB_REQUIRED;
		assert_eq!(CgbSupport::Required, Cartridge::new(&rom)?.header().cgb_support);

		Ok(())
	}

	#[test]
	fn test_rom_windows() -> Result<(), GameboyError> {
		let mut rom = empty();
		rom[0x0000] = 0x11;
		rom[0x4000] = 0x22;
		rom[0x7FFF] = 0x33;

		let (_, mut mbc) = Cartridge::new(&rom)?.into_parts();

		assert_eq!(0x11, mbc.rom0.read(0)?);
		assert_eq!(0x22, mbc.rom_x.read(0)?);
		assert_eq!(0x33, mbc.rom_x.read(0x3FFF)?);

		// Read only.
		mbc.rom0.write(0, 0xFF)?;
		assert_eq!(0x11, mbc.rom0.read(0)?);

		// No external ram.
		mbc.ram.write(0, 0xFF)?;
		assert_eq!(0, mbc.ram.read(0)?);

		Ok(())
	}

	#[test]
	fn test_external_ram() -> Result<(), GameboyError> {
		let mut rom = empty();
		rom[ROM_CARTRIDGE_TYPE] = CARTRIDGE_ROM_RAM;

		let (_, mut mbc) = Cartridge::new(&rom)?.into_parts();
		mbc.ram.write(0x1FFF, 0x42)?;
		assert_eq!(0x42, mbc.ram.read(0x1FFF)?);

		Ok(())
	}

	#[test]
	fn test_unsupported() {
		let mut rom = empty();
		rom[ROM_CARTRIDGE_TYPE] = 0x01;

		assert_eq!(Some(GameboyError::UnsupportedCartridge(0x01)), Cartridge::new(&rom).err());
		assert_eq!(Some(GameboyError::RomTooSmall(0x4000)), Cartridge::new(&rom[..0x4000]).err());
	}
}
