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

//! Capabilities the pawn shop consumes from the runtime.

use sp_runtime::DispatchResult;

/// Ownership of non-fungible items, addressed by a collection and an item within it.
///
/// The pawn shop uses a single implementation for three roles: the external collection the
/// collateral lives in, the ticket collection (the borrower's claim on the collateral) and the
/// loan collection (the lender's claim on repayment). A ticket id is used as the item id in both
/// the ticket and the loan collection.
///
/// Implementations must fail without side effects when an operation is not allowed, and should
/// keep their state in runtime storage so that a failing dispatchable rolls them back as well.
pub trait OwnershipRegistry<AccountId> {
	/// Identifier of a collection.
	type CollectionId;
	/// Identifier of an item within a collection.
	type ItemId;

	/// Current owner of `item`, or `None` if it was never minted.
	fn owner_of(collection: &Self::CollectionId, item: &Self::ItemId) -> Option<AccountId>;

	/// Create `item` in `collection`, owned by `to`.
	///
	/// Fails if the item already exists.
	fn mint(collection: &Self::CollectionId, item: &Self::ItemId, to: &AccountId) -> DispatchResult;

	/// Move `item` from `from` to `to`.
	///
	/// Fails if the item does not exist or `from` is not its current owner.
	fn transfer(
		collection: &Self::CollectionId,
		item: &Self::ItemId,
		from: &AccountId,
		to: &AccountId,
	) -> DispatchResult;
}
