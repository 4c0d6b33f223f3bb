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

//! Pawn shop pallet benchmarking.

use super::*;
use crate::Pallet as PawnShop;
use frame_benchmarking::{v1::account, v2::*};
use frame_support::assert_ok;
use frame_system::{pallet_prelude::BlockNumberFor, RawOrigin};
use sp_runtime::traits::Zero;

const SEED: u32 = 0;

/// 0.001% per block.
const RATE: InterestRate = 1_000_000;

fn loan_amount<T: Config>() -> BalanceOf<T> {
	1_000_000u32.into()
}

fn loan_duration<T: Config>() -> BlockNumberFor<T> {
	100u32.into()
}

fn funded_account<T: Config>(name: &'static str) -> T::AccountId {
	let who: T::AccountId = account(name, 0, SEED);
	T::BenchmarkHelper::fund_account(
		T::BenchmarkHelper::loan_asset(),
		&who,
		10_000_000u32.into(),
	);
	who
}

fn set_up_operator<T: Config>() -> T::AccountId {
	let operator: T::AccountId = account("operator", 0, SEED);
	Operator::<T>::put(&operator);
	operator
}

fn set_up_ticket<T: Config>(borrower: &T::AccountId) -> TicketId {
	let (collection, item) = T::BenchmarkHelper::create_collateral(borrower);
	assert_ok!(PawnShop::<T>::mint_ticket(
		RawOrigin::Signed(borrower.clone()).into(),
		collection,
		item,
		RATE,
		loan_amount::<T>(),
		T::BenchmarkHelper::loan_asset(),
		loan_duration::<T>(),
	));
	TicketNonce::<T>::get()
}

/// A ticket of `borrower` funded by `lender`, with the highest origination fee.
fn set_up_loan<T: Config>(borrower: &T::AccountId, lender: &T::AccountId) -> TicketId {
	if LoanCollection::<T>::get().is_none() {
		LoanCollection::<T>::put(T::BenchmarkHelper::loan_collection());
	}
	OriginationFeeRate::<T>::put(MAX_ORIGINATION_FEE_RATE);

	let ticket_id = set_up_ticket::<T>(borrower);
	assert_ok!(PawnShop::<T>::underwrite_loan(
		RawOrigin::Signed(lender.clone()).into(),
		ticket_id,
		RATE,
		loan_duration::<T>(),
		loan_amount::<T>(),
	));
	ticket_id
}

fn advance_blocks<T: Config>(n: u32) {
	let n: BlockNumberFor<T> = n.into();
	frame_system::Pallet::<T>::set_block_number(frame_system::Pallet::<T>::block_number() + n);
}

#[benchmarks]
mod benchmarks {
	use super::*;

	#[benchmark]
	fn mint_ticket() {
		let borrower = funded_account::<T>("borrower");
		let (collection, item) = T::BenchmarkHelper::create_collateral(&borrower);
		let asset = T::BenchmarkHelper::loan_asset();

		#[extrinsic_call]
		_(
			RawOrigin::Signed(borrower.clone()),
			collection,
			item,
			RATE,
			loan_amount::<T>(),
			asset,
			loan_duration::<T>(),
		);

		let ticket_id = TicketNonce::<T>::get();
		assert!(Tickets::<T>::contains_key(ticket_id));
		assert_eq!(PawnShop::<T>::ticket_owner(ticket_id), Some(borrower));
	}

	#[benchmark]
	fn close_ticket() {
		let borrower = funded_account::<T>("borrower");
		let ticket_id = set_up_ticket::<T>(&borrower);

		#[extrinsic_call]
		_(RawOrigin::Signed(borrower), ticket_id);

		assert!(Tickets::<T>::get(ticket_id).map_or(false, |ticket| ticket.closed));
	}

	// Buying out a lender touches more state than a first funding.
	#[benchmark]
	fn underwrite_loan() {
		let borrower = funded_account::<T>("borrower");
		let lender = funded_account::<T>("lender");
		let new_lender = funded_account::<T>("new_lender");
		let ticket_id = set_up_loan::<T>(&borrower, &lender);
		advance_blocks::<T>(10);
		let amount: BalanceOf<T> = 2_000_000u32.into();

		#[extrinsic_call]
		_(RawOrigin::Signed(new_lender.clone()), ticket_id, RATE, loan_duration::<T>(), amount);

		assert_eq!(PawnShop::<T>::loan_owner(ticket_id), Some(new_lender));
		assert!(!LoanPaymentBalances::<T>::get(ticket_id, &lender).is_zero());
	}

	#[benchmark]
	fn draw_loan() {
		let borrower = funded_account::<T>("borrower");
		let lender = funded_account::<T>("lender");
		let ticket_id = set_up_loan::<T>(&borrower, &lender);
		let drawable = PawnShop::<T>::drawable_balance(ticket_id).unwrap();

		#[extrinsic_call]
		_(RawOrigin::Signed(borrower), ticket_id, drawable);

		assert_eq!(Tickets::<T>::get(ticket_id).unwrap().loan_amount_drawn, drawable);
	}

	#[benchmark]
	fn repay_and_close() {
		let borrower = funded_account::<T>("borrower");
		let lender = funded_account::<T>("lender");
		let ticket_id = set_up_loan::<T>(&borrower, &lender);
		assert_ok!(PawnShop::<T>::draw_loan(
			RawOrigin::Signed(borrower.clone()).into(),
			ticket_id,
			500_000u32.into(),
		));
		advance_blocks::<T>(10);

		#[extrinsic_call]
		_(RawOrigin::Signed(borrower), ticket_id);

		assert!(Tickets::<T>::get(ticket_id).map_or(false, |ticket| ticket.closed));
		assert!(!LoanPaymentBalances::<T>::get(ticket_id, &lender).is_zero());
	}

	#[benchmark]
	fn seize_collateral() {
		let borrower = funded_account::<T>("borrower");
		let lender = funded_account::<T>("lender");
		let ticket_id = set_up_loan::<T>(&borrower, &lender);
		advance_blocks::<T>(101);

		#[extrinsic_call]
		_(RawOrigin::Signed(lender), ticket_id);

		assert!(Tickets::<T>::get(ticket_id).map_or(false, |ticket| ticket.collateral_seized));
	}

	#[benchmark]
	fn withdraw_loan_payment() {
		let borrower = funded_account::<T>("borrower");
		let lender = funded_account::<T>("lender");
		let ticket_id = set_up_loan::<T>(&borrower, &lender);
		assert_ok!(PawnShop::<T>::repay_and_close(
			RawOrigin::Signed(borrower).into(),
			ticket_id
		));
		let balance = LoanPaymentBalances::<T>::get(ticket_id, &lender);

		#[extrinsic_call]
		_(RawOrigin::Signed(lender.clone()), ticket_id, balance);

		assert!(!LoanPaymentBalances::<T>::contains_key(ticket_id, &lender));
	}

	#[benchmark]
	fn set_loan_collection() {
		let operator = set_up_operator::<T>();
		LoanCollection::<T>::kill();
		let collection = T::BenchmarkHelper::loan_collection();

		#[extrinsic_call]
		_(RawOrigin::Signed(operator), collection);

		assert!(LoanCollection::<T>::get().is_some());
	}

	#[benchmark]
	fn withdraw_from_cash_drawer() {
		let operator = set_up_operator::<T>();
		let borrower = funded_account::<T>("borrower");
		let lender = funded_account::<T>("lender");
		let dest = funded_account::<T>("dest");
		set_up_loan::<T>(&borrower, &lender);
		let asset = T::BenchmarkHelper::loan_asset();
		let fees = CashDrawer::<T>::get(asset);

		#[extrinsic_call]
		_(RawOrigin::Signed(operator), asset, fees, dest);

		assert!(!CashDrawer::<T>::contains_key(asset));
	}

	#[benchmark]
	fn transfer_operator() {
		let operator = set_up_operator::<T>();
		let new_operator: T::AccountId = account("new_operator", 0, SEED);

		#[extrinsic_call]
		_(RawOrigin::Signed(operator), new_operator.clone());

		assert_eq!(Operator::<T>::get(), Some(new_operator));
	}

	#[benchmark]
	fn update_origination_fee_rate() {
		let operator = set_up_operator::<T>();

		#[extrinsic_call]
		_(RawOrigin::Signed(operator), MAX_ORIGINATION_FEE_RATE);

		assert_eq!(OriginationFeeRate::<T>::get(), MAX_ORIGINATION_FEE_RATE);
	}

	impl_benchmark_test_suite!(
		PawnShop,
		crate::mock::ExtBuilder::default().build(),
		crate::mock::Test
	);
}
