// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

pub mod admin;
pub mod api;
pub mod auth;
#[cfg(feature = "demo")]
pub mod chat;
pub mod pages;
