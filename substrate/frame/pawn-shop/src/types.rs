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

//! Ticket record and the fixed-point interest arithmetic used by the pawn shop.

use crate::{BalanceOf, Config};
use codec::{Decode, Encode, MaxEncodedLen};
use frame_system::pallet_prelude::BlockNumberFor;
use scale_info::TypeInfo;
use sp_core::U256;
use sp_runtime::{
	traits::{CheckedAdd, One, Saturating, Zero},
	ArithmeticError,
};

/// Identifier of a pawn ticket. Doubles as the item id in the ticket and loan collections.
pub type TicketId = u64;

/// Per-block interest rate (or fee rate) in [`SCALAR`] units.
pub type InterestRate = u128;

/// Number of decimals of an [`InterestRate`].
pub const INTEREST_RATE_DECIMALS: u32 = 11;

/// `1.0` expressed as an [`InterestRate`].
pub const SCALAR: InterestRate = 10u128.pow(INTEREST_RATE_DECIMALS);

/// Highest origination fee rate the operator may configure: 5%.
pub const MAX_ORIGINATION_FEE_RATE: InterestRate = 5 * 10u128.pow(INTEREST_RATE_DECIMALS - 2);

/// A collateral deposit together with the terms and state of the loan written against it.
#[derive(Encode, Decode, MaxEncodedLen, TypeInfo, Clone, PartialEq, Debug)]
#[scale_info(skip_type_params(T))]
pub struct PawnTicket<T: Config> {
	/// The loan lifecycle has ended: closed unfunded, repaid or seized.
	pub closed: bool,
	/// The ticket was closed by seizing the collateral for the lender.
	pub collateral_seized: bool,
	/// Current rate. Until the first funding this is the borrower's maximum acceptable rate.
	pub per_block_interest_rate: InterestRate,
	/// Interest settled at the last funding or buyout and still owed by the borrower.
	pub accumulated_interest: BalanceOf<T>,
	/// Block of the last funding or buyout. Zero while the ticket has never been funded.
	pub last_accumulated_interest_block: BlockNumberFor<T>,
	/// Blocks after `last_accumulated_interest_block` before the loan is in default.
	pub block_duration: BlockNumberFor<T>,
	/// Principal. Until the first funding this is the borrower's minimum loan amount.
	pub loan_amount: BalanceOf<T>,
	/// Part of the principal the borrower has drawn.
	pub loan_amount_drawn: BalanceOf<T>,
	/// Collection the collateral item belongs to.
	pub collateral_collection: T::CollectionId,
	/// The collateral item held in custody.
	pub collateral_item: T::ItemId,
	/// Asset the loan is denominated in.
	pub loan_asset: T::AssetId,
}

impl<T: Config> PawnTicket<T> {
	/// A new, unfunded ticket carrying the borrower's posted terms.
	pub(crate) fn new(
		collateral_collection: T::CollectionId,
		collateral_item: T::ItemId,
		loan_asset: T::AssetId,
		max_per_block_interest_rate: InterestRate,
		min_loan_amount: BalanceOf<T>,
		min_block_duration: BlockNumberFor<T>,
	) -> Self {
		Self {
			closed: false,
			collateral_seized: false,
			per_block_interest_rate: max_per_block_interest_rate,
			accumulated_interest: Zero::zero(),
			last_accumulated_interest_block: Zero::zero(),
			block_duration: min_block_duration,
			loan_amount: min_loan_amount,
			loan_amount_drawn: Zero::zero(),
			collateral_collection,
			collateral_item,
			loan_asset,
		}
	}

	/// Whether a lender has ever funded this ticket.
	pub fn is_funded(&self) -> bool {
		!self.last_accumulated_interest_block.is_zero()
	}

	/// Last block of the loan term. The loan is in default in any later block.
	pub fn loan_end_block(&self) -> BlockNumberFor<T> {
		self.last_accumulated_interest_block.saturating_add(self.block_duration)
	}

	/// Interest owed at block `now`.
	///
	/// ```text
	/// owed = loan_amount * (now - last_accumulated_interest_block - 1) * rate / SCALAR
	///        + accumulated_interest
	/// ```
	///
	/// Neither the block the loan was funded (or bought out) in nor the block `now` accrue
	/// interest, so the accrued part is zero in the funding block and the one after it. Closed
	/// and never funded tickets owe nothing.
	pub fn interest_owed(&self, now: BlockNumberFor<T>) -> Result<BalanceOf<T>, ArithmeticError> {
		if self.closed || !self.is_funded() {
			return Ok(Zero::zero())
		}

		let elapsed = now
			.saturating_sub(self.last_accumulated_interest_block)
			.saturating_sub(One::one());
		let accrued = mul_div_scalar(&[
			balance_to_u128::<T>(self.loan_amount)?,
			elapsed.try_into().map_err(|_| ArithmeticError::Overflow)?,
			self.per_block_interest_rate,
		])?;

		u128_to_balance::<T>(accrued)?
			.checked_add(&self.accumulated_interest)
			.ok_or(ArithmeticError::Overflow)
	}

	/// Interest owed at `now` plus everything the borrower has drawn.
	pub fn total_owed(&self, now: BlockNumberFor<T>) -> Result<BalanceOf<T>, ArithmeticError> {
		self.interest_owed(now)?
			.checked_add(&self.loan_amount_drawn)
			.ok_or(ArithmeticError::Overflow)
	}

	/// How much more the borrower may draw given the origination `fee_rate`.
	///
	/// The ceiling is `loan_amount * (SCALAR - fee_rate) / SCALAR`. A ticket that was never
	/// funded has nothing in custody to draw from.
	pub fn drawable_balance(
		&self,
		fee_rate: InterestRate,
	) -> Result<BalanceOf<T>, ArithmeticError> {
		if !self.is_funded() {
			return Ok(Zero::zero())
		}
		let ceiling = scale::<T>(self.loan_amount, SCALAR.saturating_sub(fee_rate))?;
		Ok(ceiling.saturating_sub(self.loan_amount_drawn))
	}
}

/// `amount * rate / SCALAR`, rounded down.
pub(crate) fn scale<T: Config>(
	amount: BalanceOf<T>,
	rate: InterestRate,
) -> Result<BalanceOf<T>, ArithmeticError> {
	u128_to_balance::<T>(mul_div_scalar(&[balance_to_u128::<T>(amount)?, rate])?)
}

/// Product of `factors` divided by [`SCALAR`], rounded down.
///
/// The product is formed in 256 bits so only a quotient that does not fit `u128` overflows.
pub(crate) fn mul_div_scalar(factors: &[u128]) -> Result<u128, ArithmeticError> {
	let product = factors
		.iter()
		.try_fold(U256::one(), |acc, factor| acc.checked_mul(U256::from(*factor)))
		.ok_or(ArithmeticError::Overflow)?;
	(product / U256::from(SCALAR)).try_into().map_err(|_| ArithmeticError::Overflow)
}

fn balance_to_u128<T: Config>(amount: BalanceOf<T>) -> Result<u128, ArithmeticError> {
	amount.try_into().map_err(|_| ArithmeticError::Overflow)
}

fn u128_to_balance<T: Config>(amount: u128) -> Result<BalanceOf<T>, ArithmeticError> {
	amount.try_into().map_err(|_| ArithmeticError::Overflow)
}
