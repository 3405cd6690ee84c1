/*
 * Responsibility
 * - GET /me: 現在の principal を返す
 * - pass-through モードでは未認証でも届くので anonymous を返す
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::CurrentPrincipal};

pub async fn me(principal: Option<CurrentPrincipal>) -> Json<MeResponse> {
    match principal {
        Some(CurrentPrincipal(identity)) => Json(MeResponse::from(&identity)),
        None => Json(MeResponse::anonymous()),
    }
}
