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

//! Underwriting protocol and custody helpers for the pawn shop pallet.

use super::*;
use crate::{pallet::LOG_TARGET, types::scale};
use frame_support::{
	ensure,
	traits::{
		fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
		tokens::Preservation,
		Get,
	},
};
use frame_system::pallet_prelude::BlockNumberFor;
use sp_runtime::{
	traits::{AccountIdConversion, CheckedAdd, Saturating, Zero},
	ArithmeticError, DispatchResult,
};

impl<T: Config> Pallet<T> {
	/// The keyless account holding collateral and loan funds.
	pub fn account_id() -> T::AccountId {
		T::PalletId::get().into_account_truncating()
	}

	/// Current owner of the ticket token, i.e. the borrower.
	pub fn ticket_owner(ticket_id: TicketId) -> Option<T::AccountId> {
		T::Registry::owner_of(&T::TicketCollection::get(), &ticket_id.into())
	}

	/// Current owner of the loan token, i.e. the lender. `None` while the ticket is unfunded.
	pub fn loan_owner(ticket_id: TicketId) -> Option<T::AccountId> {
		LoanCollection::<T>::get()
			.and_then(|collection| T::Registry::owner_of(&collection, &ticket_id.into()))
	}

	pub(crate) fn current_block() -> BlockNumberFor<T> {
		frame_system::Pallet::<T>::block_number()
	}

	pub(crate) fn ensure_operator(who: &T::AccountId) -> DispatchResult {
		ensure!(Operator::<T>::get().as_ref() == Some(who), Error::<T>::Unauthorized);
		Ok(())
	}

	pub(crate) fn ensure_ticket_owner(ticket_id: TicketId, who: &T::AccountId) -> DispatchResult {
		ensure!(Self::ticket_owner(ticket_id).as_ref() == Some(who), Error::<T>::Unauthorized);
		Ok(())
	}

	/// Fund `ticket_id` on behalf of `lender`, buying out the current lender if there is one.
	///
	/// Terms are checked against the ticket's current terms, which before the first funding are
	/// the borrower's posted terms. A buyout settles all interest owed under the outgoing terms:
	/// the incoming lender pays it on top of `amount`, the outgoing lender is credited it on top
	/// of their principal, and it stays owed by the borrower as `accumulated_interest`.
	pub(crate) fn do_underwrite(
		lender: T::AccountId,
		ticket_id: TicketId,
		per_block_interest_rate: InterestRate,
		block_duration: BlockNumberFor<T>,
		amount: BalanceOf<T>,
	) -> DispatchResult {
		Tickets::<T>::try_mutate(ticket_id, |maybe_ticket| -> DispatchResult {
			let ticket = maybe_ticket.as_mut().ok_or(Error::<T>::TicketNotFound)?;
			ensure!(!ticket.closed, Error::<T>::AlreadyClosed);
			ensure!(
				per_block_interest_rate <= ticket.per_block_interest_rate &&
					block_duration >= ticket.block_duration &&
					amount >= ticket.loan_amount,
				Error::<T>::TermsNotQualifying
			);
			let loan_collection =
				LoanCollection::<T>::get().ok_or(Error::<T>::LoanCollectionNotSet)?;

			let now = Self::current_block();
			let fee_rate = OriginationFeeRate::<T>::get();
			let loan_item: T::ItemId = ticket_id.into();
			let asset = ticket.loan_asset;

			let event = if ticket.is_funded() {
				ensure!(
					per_block_interest_rate < ticket.per_block_interest_rate ||
						block_duration > ticket.block_duration ||
						amount > ticket.loan_amount,
					Error::<T>::TermsNotImproved
				);
				let previous_lender = T::Registry::owner_of(&loan_collection, &loan_item)
					.ok_or(Error::<T>::LoanNotFunded)?;

				let settled_interest = ticket.interest_owed(now)?;
				let fee = scale::<T>(amount.saturating_sub(ticket.loan_amount), fee_rate)?;
				let payment =
					amount.checked_add(&settled_interest).ok_or(ArithmeticError::Overflow)?;
				let previous_lender_payment = ticket
					.loan_amount
					.checked_add(&settled_interest)
					.ok_or(ArithmeticError::Overflow)?;

				Self::collect(asset, &lender, payment)?;
				Self::credit_loan_payment(ticket_id, &previous_lender, previous_lender_payment)?;
				T::Registry::transfer(&loan_collection, &loan_item, &previous_lender, &lender)?;
				Self::credit_cash_drawer(asset, fee)?;

				ticket.accumulated_interest = settled_interest;
				Event::LoanBoughtOut {
					ticket_id,
					previous_lender,
					lender: lender.clone(),
					amount,
					per_block_interest_rate,
					block_duration,
					settled_interest,
					fee,
				}
			} else {
				let fee = scale::<T>(amount, fee_rate)?;

				Self::collect(asset, &lender, amount)?;
				T::Registry::mint(&loan_collection, &loan_item, &lender)?;
				Self::credit_cash_drawer(asset, fee)?;

				Event::LoanUnderwritten {
					ticket_id,
					lender: lender.clone(),
					amount,
					per_block_interest_rate,
					block_duration,
					fee,
				}
			};

			ticket.per_block_interest_rate = per_block_interest_rate;
			ticket.last_accumulated_interest_block = now;
			ticket.block_duration = block_duration;
			ticket.loan_amount = amount;

			log::debug!(
				target: LOG_TARGET,
				"Ticket {} funded by {:?}: amount {:?}, rate {}, duration {:?}",
				ticket_id,
				lender,
				amount,
				per_block_interest_rate,
				block_duration,
			);
			Self::deposit_event(event);
			Ok(())
		})
	}

	/// Move `amount` of `asset` from `from` into custody.
	///
	/// If custody holds less than the asset's minimum balance, `from` also pays the shortfall.
	/// That reserve is never paid out, so custody outflows cannot reap the account or burn dust
	/// that is owed to someone.
	pub(crate) fn collect(
		asset: T::AssetId,
		from: &T::AccountId,
		amount: BalanceOf<T>,
	) -> DispatchResult {
		if amount.is_zero() {
			return Ok(())
		}
		let custody = Self::account_id();
		let reserve = T::Assets::minimum_balance(asset)
			.saturating_sub(T::Assets::balance(asset, &custody));
		let total = amount.checked_add(&reserve).ok_or(ArithmeticError::Overflow)?;
		T::Assets::transfer(asset, from, &custody, total, Preservation::Expendable)?;

		if !reserve.is_zero() {
			log::debug!(
				target: LOG_TARGET,
				"Custody reserve of {:?} for asset {:?} paid by {:?}",
				reserve,
				asset,
				from,
			);
			Self::deposit_event(Event::CustodyReserveFunded {
				asset,
				who: from.clone(),
				amount: reserve,
			});
		}
		Ok(())
	}

	/// Move `amount` of `asset` out of custody to `to`, keeping the custody reserve in place.
	pub(crate) fn pay_out(
		asset: T::AssetId,
		to: &T::AccountId,
		amount: BalanceOf<T>,
	) -> DispatchResult {
		if amount.is_zero() {
			return Ok(())
		}
		T::Assets::transfer(asset, &Self::account_id(), to, amount, Preservation::Preserve)?;
		Ok(())
	}

	pub(crate) fn credit_loan_payment(
		ticket_id: TicketId,
		who: &T::AccountId,
		amount: BalanceOf<T>,
	) -> DispatchResult {
		if amount.is_zero() {
			return Ok(())
		}
		LoanPaymentBalances::<T>::try_mutate(ticket_id, who, |balance| -> DispatchResult {
			*balance = balance.checked_add(&amount).ok_or(ArithmeticError::Overflow)?;
			Ok(())
		})
	}

	pub(crate) fn credit_cash_drawer(asset: T::AssetId, amount: BalanceOf<T>) -> DispatchResult {
		if amount.is_zero() {
			return Ok(())
		}
		CashDrawer::<T>::try_mutate(asset, |balance| -> DispatchResult {
			*balance = balance.checked_add(&amount).ok_or(ArithmeticError::Overflow)?;
			Ok(())
		})
	}

	/// Make sure the custody account is alive before it first receives anything.
	pub(crate) fn ensure_custody_account_exists() {
		let account = Self::account_id();
		if !frame_system::Pallet::<T>::account_exists(&account) {
			frame_system::Pallet::<T>::inc_providers(&account);
			log::debug!(target: LOG_TARGET, "Created custody account: {:?}", account);
		}
	}
}

#[cfg(any(feature = "try-runtime", test))]
impl<T: Config> Pallet<T> {
	/// Ensure the correctness of the state of this pallet.
	///
	/// This should be valid before or after each state transition of this pallet.
	pub fn do_try_state() -> Result<(), sp_runtime::TryRuntimeError> {
		Self::try_state_tickets()
	}

	/// # Invariants
	///
	/// * Every ticket id is between 1 and [`TicketNonce`].
	/// * A seized ticket is closed.
	/// * No more than the principal has been drawn.
	/// * An unfunded ticket has nothing drawn and no interest carried over.
	/// * A funded ticket has a loan token.
	fn try_state_tickets() -> Result<(), sp_runtime::TryRuntimeError> {
		let nonce = TicketNonce::<T>::get();

		for (ticket_id, ticket) in Tickets::<T>::iter() {
			ensure!(
				(1..=nonce).contains(&ticket_id),
				"ticket id must be between 1 and `TicketNonce`"
			);
			ensure!(!ticket.collateral_seized || ticket.closed, "a seized ticket must be closed");
			ensure!(
				ticket.loan_amount_drawn <= ticket.loan_amount,
				"drawn amount must not exceed the principal"
			);
			if ticket.is_funded() {
				ensure!(
					Self::loan_owner(ticket_id).is_some(),
					"a funded ticket must have a loan token"
				);
			} else {
				ensure!(
					ticket.loan_amount_drawn.is_zero() && ticket.accumulated_interest.is_zero(),
					"an unfunded ticket must have nothing drawn and no interest"
				);
			}
		}

		Ok(())
	}
}
