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

use crate::{self as pallet_pawn_shop, InterestRate, LoanCollection, OwnershipRegistry};
use codec::Encode;
use frame_support::{
	assert_ok, construct_runtime, derive_impl, ensure, parameter_types,
	storage::unhashed,
	traits::{fungibles, AsEnsureOriginWithArg, ConstU128},
	PalletId,
};
use frame_system::{EnsureRoot, EnsureSigned};
use sp_runtime::{BuildStorage, DispatchError, DispatchResult};

pub type AccountId = u64;
pub type Balance = u128;

// Test accounts
pub const BORROWER: AccountId = 1;
pub const LENDER: AccountId = 2;
pub const LENDER_TWO: AccountId = 3;
pub const LENDER_THREE: AccountId = 4;
pub const OPERATOR: AccountId = 10;
pub const ASSET_ADMIN: AccountId = 99;

pub const LOAN_ASSET: u32 = 1;
pub const OTHER_ASSET: u32 = 2;
/// Not created at genesis. Tests create it with a minimum balance above one.
pub const DUSTY_ASSET: u32 = 3;

/// What custody holds of each genesis asset before any loan: its minimum balance.
pub const CUSTODY_RESERVE: Balance = 1;

pub const COLLATERAL_COLLECTION: u32 = 1;
pub const TICKET_COLLECTION: u32 = 2;
pub const LOAN_COLLECTION: u32 = 3;
pub const COLLATERAL_ITEM: u64 = 7;

pub const INITIAL_BALANCE: Balance = 1_000_000;

/// 1% in `SCALAR` units.
pub const ONE_PERCENT_FEE: InterestRate = 1_000_000_000;

construct_runtime!(
	pub enum Test {
		System: frame_system,
		Balances: pallet_balances,
		Assets: pallet_assets,
		PawnShop: pallet_pawn_shop,
	}
);

type Block = frame_system::mocking::MockBlock<Test>;

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
	type Block = Block;
	type AccountData = pallet_balances::AccountData<Balance>;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
	type Balance = Balance;
	type ExistentialDeposit = ConstU128<1>;
	type AccountStore = System;
	type RuntimeHoldReason = RuntimeHoldReason;
}

#[derive_impl(pallet_assets::config_preludes::TestDefaultConfig)]
impl pallet_assets::Config for Test {
	type Balance = Balance;
	type AssetId = u32;
	type AssetIdParameter = u32;
	type Currency = Balances;
	type CreateOrigin = AsEnsureOriginWithArg<EnsureSigned<AccountId>>;
	type ForceOrigin = EnsureRoot<AccountId>;
}

/// Ownership registry kept in plain storage so it is rolled back together with the pallet.
///
/// Items can be frozen to make every transfer of them fail.
pub struct MockRegistry;

impl MockRegistry {
	fn owner_key(collection: &u32, item: &u64) -> Vec<u8> {
		(b"pawn-shop/mock/owner", collection, item).encode()
	}

	fn frozen_key(collection: &u32, item: &u64) -> Vec<u8> {
		(b"pawn-shop/mock/frozen", collection, item).encode()
	}

	/// Create `item` in `collection` owned by `to`, bypassing all checks.
	pub fn force_mint(collection: u32, item: u64, to: AccountId) {
		unhashed::put(&Self::owner_key(&collection, &item), &to);
	}

	pub fn freeze(collection: u32, item: u64) {
		unhashed::put(&Self::frozen_key(&collection, &item), &true);
	}

	pub fn thaw(collection: u32, item: u64) {
		unhashed::kill(&Self::frozen_key(&collection, &item));
	}
}

impl OwnershipRegistry<AccountId> for MockRegistry {
	type CollectionId = u32;
	type ItemId = u64;

	fn owner_of(collection: &u32, item: &u64) -> Option<AccountId> {
		unhashed::get(&Self::owner_key(collection, item))
	}

	fn mint(collection: &u32, item: &u64, to: &AccountId) -> DispatchResult {
		let key = Self::owner_key(collection, item);
		ensure!(!unhashed::exists(&key), DispatchError::Other("item already exists"));
		unhashed::put(&key, to);
		Ok(())
	}

	fn transfer(collection: &u32, item: &u64, from: &AccountId, to: &AccountId) -> DispatchResult {
		ensure!(
			Self::owner_of(collection, item).as_ref() == Some(from),
			DispatchError::Other("not the owner")
		);
		ensure!(
			!unhashed::exists(&Self::frozen_key(collection, item)),
			DispatchError::Other("item is frozen")
		);
		unhashed::put(&Self::owner_key(collection, item), to);
		Ok(())
	}
}

parameter_types! {
	pub const PawnShopPalletId: PalletId = PalletId(*b"py/pawns");
	pub const TicketCollection: u32 = TICKET_COLLECTION;
}

impl pallet_pawn_shop::Config for Test {
	type AssetId = u32;
	type Assets = Assets;
	type CollectionId = u32;
	type ItemId = u64;
	type Registry = MockRegistry;
	type PalletId = PawnShopPalletId;
	type TicketCollection = TicketCollection;
	type WeightInfo = ();
	#[cfg(feature = "runtime-benchmarks")]
	type BenchmarkHelper = PawnShopBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct PawnShopBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl pallet_pawn_shop::BenchmarkHelper<AccountId, u32, u32, u64, Balance>
	for PawnShopBenchmarkHelper
{
	fn loan_asset() -> u32 {
		LOAN_ASSET
	}

	fn fund_account(asset: u32, who: &AccountId, amount: Balance) {
		assert_ok!(<Assets as fungibles::Mutate<AccountId>>::mint_into(asset, who, amount));
	}

	fn create_collateral(owner: &AccountId) -> (u32, u64) {
		let item = 1_000;
		MockRegistry::force_mint(COLLATERAL_COLLECTION, item, *owner);
		(COLLATERAL_COLLECTION, item)
	}

	fn loan_collection() -> u32 {
		LOAN_COLLECTION
	}
}

pub struct ExtBuilder {
	origination_fee_rate: InterestRate,
	loan_collection: Option<u32>,
}

impl Default for ExtBuilder {
	fn default() -> Self {
		Self { origination_fee_rate: ONE_PERCENT_FEE, loan_collection: Some(LOAN_COLLECTION) }
	}
}

impl ExtBuilder {
	pub fn origination_fee_rate(mut self, rate: InterestRate) -> Self {
		self.origination_fee_rate = rate;
		self
	}

	/// Leave the loan collection for the operator to set.
	pub fn without_loan_collection(mut self) -> Self {
		self.loan_collection = None;
		self
	}

	pub fn build(self) -> sp_io::TestExternalities {
		sp_tracing::try_init_simple();
		let mut storage = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

		pallet_balances::GenesisConfig::<Test> {
			balances: vec![
				(BORROWER, INITIAL_BALANCE),
				(LENDER, INITIAL_BALANCE),
				(LENDER_TWO, INITIAL_BALANCE),
				(LENDER_THREE, INITIAL_BALANCE),
				(OPERATOR, INITIAL_BALANCE),
				(ASSET_ADMIN, INITIAL_BALANCE),
			],
			..Default::default()
		}
		.assimilate_storage(&mut storage)
		.unwrap();

		pallet_assets::GenesisConfig::<Test> {
			assets: vec![
				// (asset_id, owner, is_sufficient, min_balance)
				(LOAN_ASSET, ASSET_ADMIN, true, 1),
				(OTHER_ASSET, ASSET_ADMIN, true, 1),
			],
			metadata: vec![
				// (asset_id, name, symbol, decimals)
				(LOAN_ASSET, b"Loan Dollar".to_vec(), b"LUSD".to_vec(), 6),
				(OTHER_ASSET, b"Other Dollar".to_vec(), b"OUSD".to_vec(), 6),
			],
			accounts: vec![
				// (asset_id, account, balance)
				(LOAN_ASSET, BORROWER, INITIAL_BALANCE),
				(LOAN_ASSET, LENDER, INITIAL_BALANCE),
				(LOAN_ASSET, LENDER_TWO, INITIAL_BALANCE),
				(LOAN_ASSET, LENDER_THREE, INITIAL_BALANCE),
				(OTHER_ASSET, LENDER, INITIAL_BALANCE),
				(LOAN_ASSET, PawnShop::account_id(), CUSTODY_RESERVE),
				(OTHER_ASSET, PawnShop::account_id(), CUSTODY_RESERVE),
			],
			next_asset_id: None,
			reserves: vec![],
		}
		.assimilate_storage(&mut storage)
		.unwrap();

		pallet_pawn_shop::GenesisConfig::<Test> {
			operator: Some(OPERATOR),
			origination_fee_rate: self.origination_fee_rate,
		}
		.assimilate_storage(&mut storage)
		.unwrap();

		let mut ext = sp_io::TestExternalities::from(storage);

		ext.execute_with(|| {
			// for events to be deposited.
			System::set_block_number(1);
			MockRegistry::force_mint(COLLATERAL_COLLECTION, COLLATERAL_ITEM, BORROWER);
			if let Some(collection) = self.loan_collection {
				LoanCollection::<Test>::put(collection);
			}
		});

		ext
	}

	pub fn build_and_execute(self, test: impl FnOnce()) {
		let mut ext = self.build();
		ext.execute_with(test);
		ext.execute_with(|| {
			PawnShop::do_try_state().unwrap();
		});
	}
}

/// Jump to block `n` without running any hooks. Only the block number matters to the pallet.
pub fn jump_to_block(n: u64) {
	assert!(n > System::block_number(), "Can only jump forward in blocks");
	System::set_block_number(n);
}

pub fn asset_balance(asset: u32, who: AccountId) -> Balance {
	<Assets as fungibles::Inspect<AccountId>>::balance(asset, &who)
}

pub fn owner_of(collection: u32, item: u64) -> Option<AccountId> {
	MockRegistry::owner_of(&collection, &item)
}

/// Mint a ticket for `COLLATERAL_ITEM` with the given posted terms and return its id.
pub fn mint_ticket(max_rate: InterestRate, min_amount: Balance, min_duration: u64) -> u64 {
	assert_ok!(PawnShop::mint_ticket(
		RuntimeOrigin::signed(BORROWER),
		COLLATERAL_COLLECTION,
		COLLATERAL_ITEM,
		max_rate,
		min_amount,
		LOAN_ASSET,
		min_duration,
	));
	pallet_pawn_shop::TicketNonce::<Test>::get()
}
