//! XA command issuing.
//!
//! Each call sends fixed command text with the xid embedded as a literal. No
//! ordering is enforced here and failures come back from the driver as-is.

use crate::db::link::Link;
use crate::error::DbResult;
use tracing::debug;

/// XA protocol verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XaCommand {
    Start,
    End,
    Prepare,
    Commit,
    Rollback,
}

impl XaCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::End => "END",
            Self::Prepare => "PREPARE",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
        }
    }

    /// Command text for `xid`, e.g. `XA START 'tx1'`.
    pub fn sql(&self, xid: &str) -> String {
        format!("XA {} '{}'", self.verb(), xid)
    }
}

/// Issue one XA command.
pub async fn issue(link: &mut dyn Link, command: XaCommand, xid: &str) -> DbResult<()> {
    let sql = command.sql(xid);
    debug!(xid = %xid, command = command.verb(), "Issuing XA command");
    link.exec(&sql).await?;
    Ok(())
}

/// End the branch and prepare it. The engine only prepares ended branches.
pub async fn prepare(link: &mut dyn Link, xid: &str) -> DbResult<()> {
    issue(link, XaCommand::End, xid).await?;
    issue(link, XaCommand::Prepare, xid).await
}
