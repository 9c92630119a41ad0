// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Abstraction for the cpu's interrupts.

/// The interrupt master enable flag.
///
/// `ei` only takes effect after the instruction that follows it, so the
/// flag passes through an intermediate state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ime {
	/// Interrupts are ignored.
	Disabled,
	/// `ei` was executed; interrupts are enabled once the next
	/// instruction completes.
	Enabling,
	/// Interrupts are serviced.
	Enabled,
}

impl Default for Ime {
	fn default() -> Self {
		Ime::Disabled
	}
}

impl Ime {
	/// Resolve the flag after an instruction completes.
	///
	/// * `previous` - The flag before the instruction was executed.
	pub fn settle(self, previous: Ime) -> Ime {
		match (previous, self) {
			(Ime::Enabling, Ime::Enabling) => Ime::Enabled,
			(_, current) => current,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_settle() {
		// ei, then any instruction.
		assert_eq!(Ime::Enabling, Ime::Enabling.settle(Ime::Disabled));
		assert_eq!(Ime::Enabled, Ime::Enabling.settle(Ime::Enabling));

		// ei, then di.
		assert_eq!(Ime::Disabled, Ime::Disabled.settle(Ime::Enabling));

		// ei, then reti.
		assert_eq!(Ime::Enabled, Ime::Enabled.settle(Ime::Enabling));

		// ei while already enabled.
		assert_eq!(Ime::Enabling, Ime::Enabling.settle(Ime::Enabled));
	}
}
