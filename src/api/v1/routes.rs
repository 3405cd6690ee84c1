/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は public、それ以外は basic_auth を route_layer で適用
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me};
use crate::middleware::basic_auth::{self, BasicAuth};
use crate::state::AppState;

pub fn routes(auth: BasicAuth) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let protected = basic_auth::apply(Router::new().route("/me", get(me)), auth);

    public.merge(protected)
}
