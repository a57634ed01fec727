// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::envelope::ApiResponse;

/// Liveness probe. Answers every method.
#[utoipa::path(
    get,
    path = "/ping",
    tag = "Health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn ping() -> ApiResponse<()> {
    ApiResponse::message("OK")
}
