//! EXPLAIN diagnostics.
//!
//! The slow-plan check is a plain substring match on the `extra` attribute.
//! Its shape varies by engine version, so misses are expected.

use crate::db::link::Link;
use crate::error::DbResult;
use crate::models::{Bind, ExplainResult, bind_all};
use tracing::{debug, warn};

/// `extra` markers that indicate a temporary structure or an on-disk sort.
pub const SLOW_PLAN_MARKERS: [&str; 2] = ["filesort", "temporary"];

/// Prefix `sql` with the explain directive.
pub fn explain_sql(sql: &str) -> String {
    format!("EXPLAIN {}", sql)
}

/// Return the `extra` text when it carries a slow-plan marker.
pub fn slow_plan_marker(result: &ExplainResult) -> Option<String> {
    result
        .extra()
        .filter(|extra| SLOW_PLAN_MARKERS.iter().any(|m| extra.contains(m)))
}

/// Re-run `sql` with `binds` under EXPLAIN and return the first plan row.
pub async fn explain(link: &mut dyn Link, sql: &str, binds: &[Bind]) -> DbResult<ExplainResult> {
    let params = bind_all(binds);
    let row = link.fetch_optional(&explain_sql(sql), &params).await?;

    let result = row.map(ExplainResult::from_row).unwrap_or_default();
    debug!(sql = %sql, attributes = result.plan.len(), "Explained statement");

    if let Some(extra) = slow_plan_marker(&result) {
        warn!("SQL:{}[{}]", sql, extra);
    }

    Ok(result)
}
