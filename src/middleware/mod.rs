/*
 * Responsibility
 * - middleware の公開インターフェース
 * - basic_auth: Authorization: Basic の検証 → identity を extensions へ
 * - http: request-id / trace / body limit / timeout
 */
pub mod basic_auth;
pub mod http;
