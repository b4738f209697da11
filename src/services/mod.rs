// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

//! Thin pass-through wrappers around database queries and external APIs.

#[cfg(feature = "demo")]
pub mod chat;
pub mod products;
pub mod webinars;
