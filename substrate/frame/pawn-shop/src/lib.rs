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

//! # Pawn Shop Pallet
//!
//! Collateralized loans against non-fungible items.
//!
//! ## Pallet API
//!
//! See the [`pallet`] module for more information about the interfaces this pallet exposes,
//! including its configuration trait, dispatchables, storage items, events and errors.
//!
//! ## Overview
//!
//! A borrower deposits an item as collateral and posts the loan terms they are willing to accept.
//! Any account may fund the loan on those terms or better. Once funded, the loan can be bought out
//! by another lender offering strictly better terms, repaid by anyone, or defaulted on, in which
//! case the lender takes the collateral.
//!
//! ### Key Concepts
//!
//! * **[`PawnTicket`]**: One collateral deposit together with the terms and accounting state of
//!   the loan written against it. Stored in [`Tickets`] under a [`TicketId`].
//!
//! * **Ticket and loan tokens**: Every ticket id is minted as an item in two collections of the
//!   [`Config::Registry`]. The item in [`Config::TicketCollection`] is the borrower's claim on the
//!   collateral; the item in [`LoanCollection`] is the lender's claim on repayment. Both are
//!   independently transferable. Whoever owns them at the time of a call is the borrower or lender.
//!
//! * **Posted terms**: Before funding, a ticket carries the borrower's maximum per-block interest
//!   rate, minimum loan amount and minimum duration. A lender must match or beat all three.
//!
//! * **Buyout**: A funded loan may be taken over by a lender whose terms are strictly better in at
//!   least one of rate, amount or duration. The outgoing lender is paid principal plus interest
//!   owed through the loan payment ledger.
//!
//! * **Loan payment ledger**: [`LoanPaymentBalances`] holds what displaced or repaid lenders may
//!   withdraw. Lenders are never paid by a direct transfer, so an account that cannot receive
//!   funds only ever blocks its own withdrawal.
//!
//! * **Cash drawer**: [`CashDrawer`] accumulates origination fees per asset for the [`Operator`].
//!
//! ### Ticket Lifecycle
//!
//! 1. **Mint**: The borrower deposits collateral via [`Pallet::mint_ticket`]
//! 2. **Underwrite**: A lender funds it via [`Pallet::underwrite_loan`]
//! 3. **Draw**: The borrower takes out funds via [`Pallet::draw_loan`]
//! 4. **Buyout**: Another lender improves the terms via [`Pallet::underwrite_loan`]
//! 5. **Close**: One of [`Pallet::close_ticket`] (never funded), [`Pallet::repay_and_close`] or
//!    [`Pallet::seize_collateral`] (after default)
//! 6. **Withdraw**: Lenders collect their proceeds via [`Pallet::withdraw_loan_payment`]
//!
//! ### Example
//!
//! ```ignore
//! // Borrower posts item 7 of collection 1, asking for at least 1_000 units for 50 blocks.
//! PawnShop::mint_ticket(RuntimeOrigin::signed(borrower), 1, 7, max_rate, 1_000, asset, 50)?;
//!
//! // Lender funds ticket 1 at the posted terms and the borrower draws what the fee allows.
//! PawnShop::underwrite_loan(RuntimeOrigin::signed(lender), 1, max_rate, 50, 1_000)?;
//! PawnShop::draw_loan(RuntimeOrigin::signed(borrower), 1, PawnShop::drawable_balance(1)?)?;
//!
//! // Anyone repays, and the lender withdraws principal plus interest.
//! PawnShop::repay_and_close(RuntimeOrigin::signed(borrower), 1)?;
//! PawnShop::withdraw_loan_payment(RuntimeOrigin::signed(lender), 1, owed_to_lender)?;
//! ```
//!
//! ## Low Level / Implementation Details
//!
//! ### Interest
//!
//! Rates are fixed-point numbers with [`INTEREST_RATE_DECIMALS`] decimals. Interest accrues per
//! block on the full principal, drawn or not:
//!
//! ```text
//! owed = loan_amount * (now - last_accumulated_interest_block - 1) * rate / SCALAR
//!        + accumulated_interest
//! ```
//!
//! The block a loan is funded or bought out in does not accrue. A buyout settles everything owed
//! into `accumulated_interest`, which the incoming lender pays to the outgoing one.
//!
//! ### Custody
//!
//! Collateral and loan funds are held by a keyless account derived from [`Config::PalletId`].
//! Loan funds move through [`Config::Assets`]; items move through [`Config::Registry`].
//!
//! Custody always keeps the minimum balance of every asset it has held. Payments out of custody
//! never touch that reserve, so no claim on the pool is lost to dust.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod functions;
pub mod traits;
pub mod types;
pub mod weights;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

#[cfg(test)]
mod mock;


pub use pallet::*;
pub use traits::OwnershipRegistry;
pub use types::{
	InterestRate, PawnTicket, TicketId, INTEREST_RATE_DECIMALS, MAX_ORIGINATION_FEE_RATE, SCALAR,
};
pub use weights::WeightInfo;

#[frame_support::pallet]
pub mod pallet {
	use super::*;

	use frame_support::{
		pallet_prelude::*,
		traits::{fungibles, fungibles::Inspect as FungiblesInspect},
		PalletId,
	};
	use frame_system::pallet_prelude::*;
	use sp_runtime::{
		traits::{CheckedAdd, CheckedSub, MaybeSerializeDeserialize, Member, Zero},
		ArithmeticError,
	};

	/// Log target for this pallet.
	pub(crate) const LOG_TARGET: &str = "runtime::pawn-shop";

	/// Balance type of the loan assets.
	pub type BalanceOf<T> =
		<<T as Config>::Assets as FungiblesInspect<<T as frame_system::Config>::AccountId>>::Balance;

	#[pallet::config]
	pub trait Config: frame_system::Config {
		/// Identifier of a loan asset.
		type AssetId: Parameter + Member + Copy + MaybeSerializeDeserialize + MaxEncodedLen;

		/// The fungible assets loans are denominated in.
		type Assets: fungibles::Mutate<Self::AccountId, AssetId = Self::AssetId>;

		/// Identifier of a collection in [`Config::Registry`].
		type CollectionId: Parameter + Member + Copy + MaxEncodedLen;

		/// Identifier of an item within a collection. Ticket and loan tokens use the ticket id.
		type ItemId: Parameter + Member + Copy + MaxEncodedLen + From<TicketId>;

		/// Ownership of collateral items and of the ticket and loan tokens.
		type Registry: OwnershipRegistry<
			Self::AccountId,
			CollectionId = Self::CollectionId,
			ItemId = Self::ItemId,
		>;

		/// The pallet id, used for deriving the custody account.
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		/// Collection the ticket tokens are minted into. The pallet must be allowed to mint in it.
		#[pallet::constant]
		type TicketCollection: Get<Self::CollectionId>;

		/// A type representing the weights required by the dispatchables of this pallet.
		type WeightInfo: WeightInfo;

		/// Helper type for benchmarking.
		#[cfg(feature = "runtime-benchmarks")]
		type BenchmarkHelper: BenchmarkHelper<
			Self::AccountId,
			Self::AssetId,
			Self::CollectionId,
			Self::ItemId,
			BalanceOf<Self>,
		>;
	}

	#[pallet::pallet]
	pub struct Pallet<T>(_);

	/// Helper trait for benchmarking setup.
	///
	/// Provides the loan asset, funded accounts and registry items the benchmarks need.
	#[cfg(feature = "runtime-benchmarks")]
	pub trait BenchmarkHelper<AccountId, AssetId, CollectionId, ItemId, Balance> {
		/// The asset benchmarked loans are denominated in. Must exist.
		fn loan_asset() -> AssetId;

		/// Give `who` `amount` of `asset`.
		fn fund_account(asset: AssetId, who: &AccountId, amount: Balance);

		/// Create an item owned by `owner` that may be pawned.
		fn create_collateral(owner: &AccountId) -> (CollectionId, ItemId);

		/// A collection the pallet may mint loan tokens into.
		fn loan_collection() -> CollectionId;
	}

	/// Id of the most recently minted ticket. The first ticket gets id 1.
	#[pallet::storage]
	pub type TicketNonce<T: Config> = StorageValue<_, TicketId, ValueQuery>;

	/// Every ticket ever minted, closed ones included.
	#[pallet::storage]
	pub type Tickets<T: Config> = StorageMap<_, Twox64Concat, TicketId, PawnTicket<T>>;

	/// Amount each account may withdraw from a ticket, in the ticket's loan asset.
	#[pallet::storage]
	pub type LoanPaymentBalances<T: Config> = StorageDoubleMap<
		_,
		Twox64Concat,
		TicketId,
		Blake2_128Concat,
		T::AccountId,
		BalanceOf<T>,
		ValueQuery,
	>;

	/// Origination fees collected per asset and not yet withdrawn by the operator.
	#[pallet::storage]
	pub type CashDrawer<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AssetId, BalanceOf<T>, ValueQuery>;

	/// Account allowed to configure the pallet and empty the cash drawer.
	#[pallet::storage]
	pub type Operator<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

	/// Share of newly lent principal kept as origination fee, in [`SCALAR`] units.
	#[pallet::storage]
	pub type OriginationFeeRate<T: Config> = StorageValue<_, InterestRate, ValueQuery>;

	/// Collection the loan tokens are minted into. Can be set only once.
	#[pallet::storage]
	pub type LoanCollection<T: Config> = StorageValue<_, T::CollectionId, OptionQuery>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		/// Initial operator.
		pub operator: Option<T::AccountId>,
		/// Initial origination fee rate. Must not exceed [`MAX_ORIGINATION_FEE_RATE`].
		pub origination_fee_rate: InterestRate,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			assert!(
				self.origination_fee_rate <= MAX_ORIGINATION_FEE_RATE,
				"origination fee rate above the maximum"
			);
			match &self.operator {
				Some(operator) => Operator::<T>::put(operator),
				None => log::warn!(
					target: LOG_TARGET,
					"No operator at genesis; fees and the loan collection cannot be managed"
				),
			}
			OriginationFeeRate::<T>::put(self.origination_fee_rate);
			Pallet::<T>::ensure_custody_account_exists();
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// Collateral was deposited and a ticket minted to the borrower.
		TicketMinted {
			ticket_id: TicketId,
			borrower: T::AccountId,
			collateral_collection: T::CollectionId,
			collateral_item: T::ItemId,
			loan_asset: T::AssetId,
		},
		/// An unfunded ticket was closed and its collateral returned.
		TicketClosed { ticket_id: TicketId, borrower: T::AccountId },
		/// A ticket was funded for the first time.
		LoanUnderwritten {
			ticket_id: TicketId,
			lender: T::AccountId,
			amount: BalanceOf<T>,
			per_block_interest_rate: InterestRate,
			block_duration: BlockNumberFor<T>,
			fee: BalanceOf<T>,
		},
		/// A funded loan was taken over by a lender offering better terms.
		LoanBoughtOut {
			ticket_id: TicketId,
			/// Lender credited with the previous principal and the settled interest.
			previous_lender: T::AccountId,
			lender: T::AccountId,
			amount: BalanceOf<T>,
			per_block_interest_rate: InterestRate,
			block_duration: BlockNumberFor<T>,
			/// Interest owed to the previous lender at the time of the buyout.
			settled_interest: BalanceOf<T>,
			fee: BalanceOf<T>,
		},
		/// The borrower drew funds from the loan.
		LoanDrawn { ticket_id: TicketId, borrower: T::AccountId, amount: BalanceOf<T> },
		/// The loan was repaid and the collateral returned to the borrower.
		LoanRepaid {
			ticket_id: TicketId,
			payer: T::AccountId,
			lender: T::AccountId,
			/// Amount paid in: interest plus everything drawn.
			amount: BalanceOf<T>,
			interest: BalanceOf<T>,
		},
		/// A defaulted loan's collateral was transferred to the lender.
		CollateralSeized { ticket_id: TicketId, lender: T::AccountId },
		/// A lender withdrew from the loan payment ledger.
		LoanPaymentWithdrawn { ticket_id: TicketId, who: T::AccountId, amount: BalanceOf<T> },
		/// The collection loan tokens are minted into was configured.
		LoanCollectionSet { collection: T::CollectionId },
		/// The operator withdrew collected fees.
		CashDrawerWithdrawn { asset: T::AssetId, amount: BalanceOf<T>, dest: T::AccountId },
		/// The operator role changed hands.
		OperatorTransferred { old: Option<T::AccountId>, new: T::AccountId },
		/// The origination fee rate was updated by the operator.
		OriginationFeeRateUpdated { old_value: InterestRate, new_value: InterestRate },
		/// `who` topped up the custody account to the minimum balance of `asset`.
		CustodyReserveFunded { asset: T::AssetId, who: T::AccountId, amount: BalanceOf<T> },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// No ticket has been minted with this id.
		TicketNotFound,
		/// The caller does not hold the role this call requires.
		///
		/// Depending on the call this is the ticket owner, the loan owner or the [`Operator`].
		Unauthorized,
		/// The ticket has already been closed.
		AlreadyClosed,
		/// The proposed terms are worse than the terms the borrower posted.
		TermsNotQualifying,
		/// A buyout must offer a lower rate, a longer duration or a larger amount.
		TermsNotImproved,
		/// The amount exceeds what is available to draw or withdraw.
		InsufficientFunds,
		/// The loan has not yet passed its end block.
		NotYetDefaulted,
		/// The loan collection has already been set.
		AlreadyConfigured,
		/// The origination fee rate is above [`MAX_ORIGINATION_FEE_RATE`].
		FeeTooHigh,
		/// The ticket has been funded.
		///
		/// Close it through [`Pallet::repay_and_close`] instead.
		LoanExists,
		/// The ticket has never been funded.
		LoanNotFunded,
		/// Loans cannot be underwritten before the operator sets [`LoanCollection`].
		LoanCollectionNotSet,
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		#[cfg(feature = "try-runtime")]
		fn try_state(_n: BlockNumberFor<T>) -> Result<(), sp_runtime::TryRuntimeError> {
			Self::do_try_state()
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Deposit an item as collateral and post the terms of the loan wanted against it.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the owner of the collateral item.
		///
		/// ## Details
		///
		/// Moves the collateral into custody and mints the ticket token with the next ticket id
		/// to the caller. Lenders may then underwrite the ticket at a rate no higher than
		/// `max_per_block_interest_rate`, an amount no lower than `min_loan_amount` and a
		/// duration no shorter than `min_block_duration`.
		///
		/// ## Errors
		///
		/// - Any error of [`Config::Registry`] if the caller cannot transfer the collateral.
		///
		/// ## Events
		///
		/// - [`Event::TicketMinted`]
		#[pallet::call_index(0)]
		#[pallet::weight(T::WeightInfo::mint_ticket())]
		pub fn mint_ticket(
			origin: OriginFor<T>,
			collateral_collection: T::CollectionId,
			collateral_item: T::ItemId,
			max_per_block_interest_rate: InterestRate,
			min_loan_amount: BalanceOf<T>,
			loan_asset: T::AssetId,
			min_block_duration: BlockNumberFor<T>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;

			let ticket_id = TicketNonce::<T>::try_mutate(|nonce| -> Result<_, DispatchError> {
				*nonce = nonce.checked_add(1).ok_or(ArithmeticError::Overflow)?;
				Ok(*nonce)
			})?;

			T::Registry::transfer(
				&collateral_collection,
				&collateral_item,
				&who,
				&Self::account_id(),
			)?;
			T::Registry::mint(&T::TicketCollection::get(), &ticket_id.into(), &who)?;

			Tickets::<T>::insert(
				ticket_id,
				PawnTicket::new(
					collateral_collection,
					collateral_item,
					loan_asset,
					max_per_block_interest_rate,
					min_loan_amount,
					min_block_duration,
				),
			);

			log::debug!(target: LOG_TARGET, "Minted ticket {} for {:?}", ticket_id, who);
			Self::deposit_event(Event::TicketMinted {
				ticket_id,
				borrower: who,
				collateral_collection,
				collateral_item,
				loan_asset,
			});
			Ok(())
		}

		/// Close a ticket that was never funded and take the collateral back.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the owner of the ticket token.
		///
		/// ## Errors
		///
		/// - [`Error::TicketNotFound`]: If no ticket has this id.
		/// - [`Error::Unauthorized`]: If the caller does not own the ticket token.
		/// - [`Error::AlreadyClosed`]: If the ticket is closed.
		/// - [`Error::LoanExists`]: If the ticket has been funded.
		///
		/// ## Events
		///
		/// - [`Event::TicketClosed`]
		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::close_ticket())]
		pub fn close_ticket(origin: OriginFor<T>, ticket_id: TicketId) -> DispatchResult {
			let who = ensure_signed(origin)?;

			Tickets::<T>::try_mutate(ticket_id, |maybe_ticket| -> DispatchResult {
				let ticket = maybe_ticket.as_mut().ok_or(Error::<T>::TicketNotFound)?;
				Self::ensure_ticket_owner(ticket_id, &who)?;
				ensure!(!ticket.closed, Error::<T>::AlreadyClosed);
				ensure!(!ticket.is_funded(), Error::<T>::LoanExists);

				ticket.closed = true;
				T::Registry::transfer(
					&ticket.collateral_collection,
					&ticket.collateral_item,
					&Self::account_id(),
					&who,
				)?;

				Self::deposit_event(Event::TicketClosed { ticket_id, borrower: who.clone() });
				Ok(())
			})
		}

		/// Fund a ticket, or buy out its current lender with better terms.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the lender.
		///
		/// ## Details
		///
		/// The terms must be at least as good for the borrower as the ones posted at mint:
		/// `per_block_interest_rate` no higher, `block_duration` no shorter, `amount` no lower.
		///
		/// On first funding the caller pays `amount` into custody and receives the loan token.
		/// The origination fee on `amount` goes to the cash drawer.
		///
		/// On a funded ticket the terms must also strictly improve on the current loan in at
		/// least one of the three. The caller pays `amount` plus all interest owed, the current
		/// lender is credited the previous principal plus that interest in
		/// [`LoanPaymentBalances`], and the loan token moves to the caller. The fee is charged
		/// on the increase in principal only.
		///
		/// The first payment of an asset into custody also covers the asset's minimum balance.
		/// That reserve stays in custody for good.
		///
		/// ## Errors
		///
		/// - [`Error::TicketNotFound`]: If no ticket has this id.
		/// - [`Error::AlreadyClosed`]: If the ticket is closed.
		/// - [`Error::TermsNotQualifying`]: If the terms are worse than the posted terms.
		/// - [`Error::LoanCollectionNotSet`]: If the operator has not set [`LoanCollection`].
		/// - [`Error::TermsNotImproved`]: If a buyout does not improve any term.
		///
		/// ## Events
		///
		/// - [`Event::LoanUnderwritten`]: On first funding.
		/// - [`Event::LoanBoughtOut`]: When the current lender is bought out.
		/// - [`Event::CustodyReserveFunded`]: If the caller paid the custody reserve.
		#[pallet::call_index(2)]
		#[pallet::weight(T::WeightInfo::underwrite_loan())]
		pub fn underwrite_loan(
			origin: OriginFor<T>,
			ticket_id: TicketId,
			per_block_interest_rate: InterestRate,
			block_duration: BlockNumberFor<T>,
			amount: BalanceOf<T>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::do_underwrite(who, ticket_id, per_block_interest_rate, block_duration, amount)
		}

		/// Draw funds from a funded loan.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the owner of the ticket token.
		///
		/// ## Details
		///
		/// At most [`Pallet::drawable_balance`] may be drawn. Drawing stays possible after the
		/// collateral has been seized, but not after any other close.
		///
		/// ## Errors
		///
		/// - [`Error::TicketNotFound`]: If no ticket has this id.
		/// - [`Error::Unauthorized`]: If the caller does not own the ticket token.
		/// - [`Error::AlreadyClosed`]: If the ticket was closed other than by seizure.
		/// - [`Error::InsufficientFunds`]: If `amount` exceeds the drawable balance.
		///
		/// ## Events
		///
		/// - [`Event::LoanDrawn`]
		#[pallet::call_index(3)]
		#[pallet::weight(T::WeightInfo::draw_loan())]
		pub fn draw_loan(
			origin: OriginFor<T>,
			ticket_id: TicketId,
			amount: BalanceOf<T>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;

			Tickets::<T>::try_mutate(ticket_id, |maybe_ticket| -> DispatchResult {
				let ticket = maybe_ticket.as_mut().ok_or(Error::<T>::TicketNotFound)?;
				Self::ensure_ticket_owner(ticket_id, &who)?;
				ensure!(!ticket.closed || ticket.collateral_seized, Error::<T>::AlreadyClosed);

				let drawable = ticket.drawable_balance(OriginationFeeRate::<T>::get())?;
				ensure!(amount <= drawable, Error::<T>::InsufficientFunds);

				ticket.loan_amount_drawn = ticket
					.loan_amount_drawn
					.checked_add(&amount)
					.ok_or(ArithmeticError::Overflow)?;
				Self::pay_out(ticket.loan_asset, &who, amount)?;

				Self::deposit_event(Event::LoanDrawn { ticket_id, borrower: who.clone(), amount });
				Ok(())
			})
		}

		/// Repay a loan and return the collateral to the borrower.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed`. Anyone may repay.
		///
		/// ## Details
		///
		/// The caller pays [`Pallet::total_owed`]: the interest owed plus everything drawn. The
		/// lender is credited the interest owed plus the full principal in
		/// [`LoanPaymentBalances`], and the collateral goes to the owner of the ticket token.
		///
		/// ## Errors
		///
		/// - [`Error::TicketNotFound`]: If no ticket has this id.
		/// - [`Error::AlreadyClosed`]: If the ticket is closed.
		/// - [`Error::LoanNotFunded`]: If the ticket has never been funded.
		///
		/// ## Events
		///
		/// - [`Event::LoanRepaid`]
		/// - [`Event::CustodyReserveFunded`]: If the caller paid the custody reserve.
		#[pallet::call_index(4)]
		#[pallet::weight(T::WeightInfo::repay_and_close())]
		pub fn repay_and_close(origin: OriginFor<T>, ticket_id: TicketId) -> DispatchResult {
			let payer = ensure_signed(origin)?;

			Tickets::<T>::try_mutate(ticket_id, |maybe_ticket| -> DispatchResult {
				let ticket = maybe_ticket.as_mut().ok_or(Error::<T>::TicketNotFound)?;
				ensure!(!ticket.closed, Error::<T>::AlreadyClosed);
				ensure!(ticket.is_funded(), Error::<T>::LoanNotFunded);

				let lender = Self::loan_owner(ticket_id).ok_or(Error::<T>::LoanNotFunded)?;
				let borrower = Self::ticket_owner(ticket_id).ok_or(Error::<T>::TicketNotFound)?;

				let interest = ticket.interest_owed(Self::current_block())?;
				let amount = interest
					.checked_add(&ticket.loan_amount_drawn)
					.ok_or(ArithmeticError::Overflow)?;
				let lender_payment =
					interest.checked_add(&ticket.loan_amount).ok_or(ArithmeticError::Overflow)?;

				Self::collect(ticket.loan_asset, &payer, amount)?;
				Self::credit_loan_payment(ticket_id, &lender, lender_payment)?;

				ticket.loan_amount_drawn = Zero::zero();
				ticket.closed = true;
				T::Registry::transfer(
					&ticket.collateral_collection,
					&ticket.collateral_item,
					&Self::account_id(),
					&borrower,
				)?;

				Self::deposit_event(Event::LoanRepaid {
					ticket_id,
					payer,
					lender,
					amount,
					interest,
				});
				Ok(())
			})
		}

		/// Take the collateral of a loan past its end block.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the owner of the loan token.
		///
		/// ## Details
		///
		/// Possible from the block after [`Pallet::loan_end_block`]. The collateral is
		/// transferred to the caller and the ticket is closed.
		///
		/// ## Errors
		///
		/// - [`Error::TicketNotFound`]: If no ticket has this id.
		/// - [`Error::AlreadyClosed`]: If the ticket is closed.
		/// - [`Error::LoanNotFunded`]: If the ticket has never been funded.
		/// - [`Error::Unauthorized`]: If the caller does not own the loan token.
		/// - [`Error::NotYetDefaulted`]: If the loan has not passed its end block.
		///
		/// ## Events
		///
		/// - [`Event::CollateralSeized`]
		#[pallet::call_index(5)]
		#[pallet::weight(T::WeightInfo::seize_collateral())]
		pub fn seize_collateral(origin: OriginFor<T>, ticket_id: TicketId) -> DispatchResult {
			let who = ensure_signed(origin)?;

			Tickets::<T>::try_mutate(ticket_id, |maybe_ticket| -> DispatchResult {
				let ticket = maybe_ticket.as_mut().ok_or(Error::<T>::TicketNotFound)?;
				ensure!(!ticket.closed, Error::<T>::AlreadyClosed);
				ensure!(ticket.is_funded(), Error::<T>::LoanNotFunded);
				ensure!(Self::loan_owner(ticket_id) == Some(who.clone()), Error::<T>::Unauthorized);
				ensure!(
					Self::current_block() > ticket.loan_end_block(),
					Error::<T>::NotYetDefaulted
				);

				ticket.closed = true;
				ticket.collateral_seized = true;
				T::Registry::transfer(
					&ticket.collateral_collection,
					&ticket.collateral_item,
					&Self::account_id(),
					&who,
				)?;

				log::info!(
					target: LOG_TARGET,
					"Collateral of ticket {} seized by {:?}",
					ticket_id,
					who
				);
				Self::deposit_event(Event::CollateralSeized { ticket_id, lender: who.clone() });
				Ok(())
			})
		}

		/// Withdraw from the caller's loan payment balance for a ticket.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the account holding the balance.
		///
		/// ## Errors
		///
		/// - [`Error::InsufficientFunds`]: If `amount` exceeds the caller's balance.
		/// - Any error of [`Config::Assets`] if the transfer to the caller fails.
		///
		/// ## Events
		///
		/// - [`Event::LoanPaymentWithdrawn`]
		#[pallet::call_index(6)]
		#[pallet::weight(T::WeightInfo::withdraw_loan_payment())]
		pub fn withdraw_loan_payment(
			origin: OriginFor<T>,
			ticket_id: TicketId,
			amount: BalanceOf<T>,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;

			LoanPaymentBalances::<T>::try_mutate_exists(
				ticket_id,
				&who,
				|maybe_balance| -> DispatchResult {
					let remaining = maybe_balance
						.take()
						.unwrap_or_else(Zero::zero)
						.checked_sub(&amount)
						.ok_or(Error::<T>::InsufficientFunds)?;
					*maybe_balance = Some(remaining).filter(|balance| !balance.is_zero());
					Ok(())
				},
			)?;
			let loan_asset =
				Tickets::<T>::get(ticket_id).ok_or(Error::<T>::TicketNotFound)?.loan_asset;
			Self::pay_out(loan_asset, &who, amount)?;

			Self::deposit_event(Event::LoanPaymentWithdrawn { ticket_id, who, amount });
			Ok(())
		}

		/// Set the collection loan tokens are minted into.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the [`Operator`].
		///
		/// ## Errors
		///
		/// - [`Error::Unauthorized`]: If the caller is not the operator.
		/// - [`Error::AlreadyConfigured`]: If the collection has already been set.
		#[pallet::call_index(7)]
		#[pallet::weight(T::WeightInfo::set_loan_collection())]
		pub fn set_loan_collection(
			origin: OriginFor<T>,
			collection: T::CollectionId,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_operator(&who)?;

			LoanCollection::<T>::try_mutate(|maybe_collection| -> DispatchResult {
				ensure!(maybe_collection.is_none(), Error::<T>::AlreadyConfigured);
				*maybe_collection = Some(collection);
				Ok(())
			})?;

			Self::deposit_event(Event::LoanCollectionSet { collection });
			Ok(())
		}

		/// Withdraw collected origination fees of `asset` to `dest`.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the [`Operator`].
		///
		/// ## Errors
		///
		/// - [`Error::Unauthorized`]: If the caller is not the operator.
		/// - [`Error::InsufficientFunds`]: If `amount` exceeds the fees collected in `asset`.
		#[pallet::call_index(8)]
		#[pallet::weight(T::WeightInfo::withdraw_from_cash_drawer())]
		pub fn withdraw_from_cash_drawer(
			origin: OriginFor<T>,
			asset: T::AssetId,
			amount: BalanceOf<T>,
			dest: T::AccountId,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_operator(&who)?;

			CashDrawer::<T>::try_mutate_exists(asset, |maybe_balance| -> DispatchResult {
				let remaining = maybe_balance
					.take()
					.unwrap_or_else(Zero::zero)
					.checked_sub(&amount)
					.ok_or(Error::<T>::InsufficientFunds)?;
				*maybe_balance = Some(remaining).filter(|balance| !balance.is_zero());
				Ok(())
			})?;
			Self::pay_out(asset, &dest, amount)?;

			Self::deposit_event(Event::CashDrawerWithdrawn { asset, amount, dest });
			Ok(())
		}

		/// Hand the operator role to `new_operator`.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the [`Operator`].
		#[pallet::call_index(9)]
		#[pallet::weight(T::WeightInfo::transfer_operator())]
		pub fn transfer_operator(
			origin: OriginFor<T>,
			new_operator: T::AccountId,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_operator(&who)?;

			let old = Operator::<T>::mutate(|operator| operator.replace(new_operator.clone()));

			log::info!(target: LOG_TARGET, "Operator changed to {:?}", new_operator);
			Self::deposit_event(Event::OperatorTransferred { old, new: new_operator });
			Ok(())
		}

		/// Set the share of newly lent principal kept as origination fee.
		///
		/// ## Dispatch Origin
		///
		/// Must be `Signed` by the [`Operator`].
		///
		/// ## Errors
		///
		/// - [`Error::Unauthorized`]: If the caller is not the operator.
		/// - [`Error::FeeTooHigh`]: If `rate` exceeds [`MAX_ORIGINATION_FEE_RATE`].
		#[pallet::call_index(10)]
		#[pallet::weight(T::WeightInfo::update_origination_fee_rate())]
		pub fn update_origination_fee_rate(
			origin: OriginFor<T>,
			rate: InterestRate,
		) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Self::ensure_operator(&who)?;
			ensure!(rate <= MAX_ORIGINATION_FEE_RATE, Error::<T>::FeeTooHigh);

			let old_value = OriginationFeeRate::<T>::mutate(|fee| core::mem::replace(fee, rate));

			Self::deposit_event(Event::OriginationFeeRateUpdated { old_value, new_value: rate });
			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		/// The stored state of a ticket.
		pub fn ticket_info(ticket_id: TicketId) -> Option<PawnTicket<T>> {
			Tickets::<T>::get(ticket_id)
		}

		/// Interest owed on a ticket at the current block.
		pub fn interest_owed(ticket_id: TicketId) -> Result<BalanceOf<T>, DispatchError> {
			let ticket = Tickets::<T>::get(ticket_id).ok_or(Error::<T>::TicketNotFound)?;
			Ok(ticket.interest_owed(Self::current_block())?)
		}

		/// Amount [`Pallet::repay_and_close`] would collect at the current block.
		pub fn total_owed(ticket_id: TicketId) -> Result<BalanceOf<T>, DispatchError> {
			let ticket = Tickets::<T>::get(ticket_id).ok_or(Error::<T>::TicketNotFound)?;
			Ok(ticket.total_owed(Self::current_block())?)
		}

		/// Amount the borrower may still draw under the current origination fee rate.
		pub fn drawable_balance(ticket_id: TicketId) -> Result<BalanceOf<T>, DispatchError> {
			let ticket = Tickets::<T>::get(ticket_id).ok_or(Error::<T>::TicketNotFound)?;
			Ok(ticket.drawable_balance(OriginationFeeRate::<T>::get())?)
		}

		/// Last block before the loan can be seized.
		pub fn loan_end_block(ticket_id: TicketId) -> Result<BlockNumberFor<T>, DispatchError> {
			let ticket = Tickets::<T>::get(ticket_id).ok_or(Error::<T>::TicketNotFound)?;
			Ok(ticket.loan_end_block())
		}

		/// What `who` may withdraw from a ticket's loan payments.
		pub fn loan_payment_balance(ticket_id: TicketId, who: &T::AccountId) -> BalanceOf<T> {
			LoanPaymentBalances::<T>::get(ticket_id, who)
		}

		/// Fees of `asset` collected and not yet withdrawn.
		pub fn cash_drawer_balance(asset: T::AssetId) -> BalanceOf<T> {
			CashDrawer::<T>::get(asset)
		}
	}
}
