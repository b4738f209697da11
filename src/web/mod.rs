// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

// Export commonly used items
pub use state::AppState;
