/*
 * Responsibility
 * - auth: Basic 認証の判定ロジック (framework 非依存)
 * - membership: credential store の既定 adapter (Postgres)
 */
pub mod auth;
pub mod membership;
