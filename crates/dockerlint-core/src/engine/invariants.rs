//! Whole-file checks that run after the line pass.

use super::ScanState;
use crate::catalog::RuleCatalog;
use crate::context::FileContext;
use crate::rule::RuleRole;

/// Content of the synthesized issue for a file with no `USER` instruction.
pub const NO_USER_CONTENT: &str = "No USER instruction found in Dockerfile";
/// Content of the synthesized issue for a file with no `FROM` instruction.
pub const NO_FROM_CONTENT: &str = "No FROM instruction found in Dockerfile";

/// Appends the user-presence and named-stage issues.
///
/// Each fires at most once per scan.
pub(crate) fn check(catalog: &RuleCatalog, ctx: &FileContext<'_>, state: &mut ScanState<'_>) {
    if !state.has_user {
        state.fire(
            catalog,
            RuleRole::NonRootUser,
            ctx.line_count(),
            NO_USER_CONTENT,
        );
    }

    if !ctx.has_named_stage() {
        match ctx.first_from() {
            Some(from) => {
                state.fire(catalog, RuleRole::MultiStageBuild, from.number, from.trimmed());
            }
            None => {
                state.fire(catalog, RuleRole::MultiStageBuild, 1, NO_FROM_CONTENT);
            }
        }
    }
}
