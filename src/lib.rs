// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod seed;
pub mod services;
pub mod web;
