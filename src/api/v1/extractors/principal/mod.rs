/*!
 * Current principal extractor
 *
 * Responsibility:
 * - basic_auth middleware が extensions に入れた AuthenticatedIdentity を handler に渡す
 *
 * Public API:
 * - CurrentPrincipal            (無ければ 401 challenge)
 * - Option<CurrentPrincipal>    (無ければ None, pass-through 用)
 */

mod core;

pub use self::core::CurrentPrincipal;
