// This file is part of Substrate.

// Copyright (C) Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: Apache-2.0

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Weights for `pallet_pawn_shop`.
//!
//! Every dispatchable has a benchmark in `benchmarking.rs`, run against its worst case (a buyout
//! for `underwrite_loan`). Reads and writes below are counted along those paths: ticket record,
//! ledgers, operator storage, asset accounts and registry entries. The execution time constants
//! have not been measured on reference hardware yet; regenerate this file with
//!
//! ```text
//! frame-omni-bencher v1 benchmark pallet --runtime <RUNTIME_WASM> --pallet pallet_pawn_shop \
//!     --extrinsic "*" --output substrate/frame/pawn-shop/src/weights.rs
//! ```

#![allow(unused_parens)]
#![allow(unused_imports)]

use core::marker::PhantomData;
use frame_support::{
	traits::Get,
	weights::{constants::RocksDbWeight, Weight},
};

/// Weight functions needed for `pallet_pawn_shop`.
pub trait WeightInfo {
	fn mint_ticket() -> Weight;
	fn close_ticket() -> Weight;
	fn underwrite_loan() -> Weight;
	fn draw_loan() -> Weight;
	fn repay_and_close() -> Weight;
	fn seize_collateral() -> Weight;
	fn withdraw_loan_payment() -> Weight;
	fn set_loan_collection() -> Weight;
	fn withdraw_from_cash_drawer() -> Weight;
	fn transfer_operator() -> Weight;
	fn update_origination_fee_rate() -> Weight;
}

/// Weights for `pallet_pawn_shop` using the Substrate node and recommended hardware.
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn mint_ticket() -> Weight {
		Weight::from_parts(48_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(3_u64))
			.saturating_add(T::DbWeight::get().writes(4_u64))
	}
	fn close_ticket() -> Weight {
		Weight::from_parts(36_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(3_u64))
			.saturating_add(T::DbWeight::get().writes(2_u64))
	}
	fn underwrite_loan() -> Weight {
		Weight::from_parts(95_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(10_u64))
			.saturating_add(T::DbWeight::get().writes(7_u64))
	}
	fn draw_loan() -> Weight {
		Weight::from_parts(52_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(5_u64))
			.saturating_add(T::DbWeight::get().writes(3_u64))
	}
	fn repay_and_close() -> Weight {
		Weight::from_parts(78_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(8_u64))
			.saturating_add(T::DbWeight::get().writes(5_u64))
	}
	fn seize_collateral() -> Weight {
		Weight::from_parts(41_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(4_u64))
			.saturating_add(T::DbWeight::get().writes(2_u64))
	}
	fn withdraw_loan_payment() -> Weight {
		Weight::from_parts(50_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(4_u64))
			.saturating_add(T::DbWeight::get().writes(3_u64))
	}
	fn set_loan_collection() -> Weight {
		Weight::from_parts(14_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(2_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	fn withdraw_from_cash_drawer() -> Weight {
		Weight::from_parts(49_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(4_u64))
			.saturating_add(T::DbWeight::get().writes(3_u64))
	}
	fn transfer_operator() -> Weight {
		Weight::from_parts(13_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
	fn update_origination_fee_rate() -> Weight {
		Weight::from_parts(13_000_000_u64, 0)
			.saturating_add(T::DbWeight::get().reads(1_u64))
			.saturating_add(T::DbWeight::get().writes(1_u64))
	}
}

// For backwards compatibility and tests.
impl WeightInfo for () {
	fn mint_ticket() -> Weight {
		Weight::from_parts(48_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(3_u64))
			.saturating_add(RocksDbWeight::get().writes(4_u64))
	}
	fn close_ticket() -> Weight {
		Weight::from_parts(36_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(3_u64))
			.saturating_add(RocksDbWeight::get().writes(2_u64))
	}
	fn underwrite_loan() -> Weight {
		Weight::from_parts(95_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(10_u64))
			.saturating_add(RocksDbWeight::get().writes(7_u64))
	}
	fn draw_loan() -> Weight {
		Weight::from_parts(52_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(5_u64))
			.saturating_add(RocksDbWeight::get().writes(3_u64))
	}
	fn repay_and_close() -> Weight {
		Weight::from_parts(78_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(8_u64))
			.saturating_add(RocksDbWeight::get().writes(5_u64))
	}
	fn seize_collateral() -> Weight {
		Weight::from_parts(41_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(4_u64))
			.saturating_add(RocksDbWeight::get().writes(2_u64))
	}
	fn withdraw_loan_payment() -> Weight {
		Weight::from_parts(50_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(4_u64))
			.saturating_add(RocksDbWeight::get().writes(3_u64))
	}
	fn set_loan_collection() -> Weight {
		Weight::from_parts(14_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(2_u64))
			.saturating_add(RocksDbWeight::get().writes(1_u64))
	}
	fn withdraw_from_cash_drawer() -> Weight {
		Weight::from_parts(49_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(4_u64))
			.saturating_add(RocksDbWeight::get().writes(3_u64))
	}
	fn transfer_operator() -> Weight {
		Weight::from_parts(13_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(1_u64))
			.saturating_add(RocksDbWeight::get().writes(1_u64))
	}
	fn update_origination_fee_rate() -> Weight {
		Weight::from_parts(13_000_000_u64, 0)
			.saturating_add(RocksDbWeight::get().reads(1_u64))
			.saturating_add(RocksDbWeight::get().writes(1_u64))
	}
}
