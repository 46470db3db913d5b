//! Integration tests for XA transaction control.

mod common;

use common::{Call, ScriptedConnector, config};
use dm_dialect::Connection;
use dm_dialect::error::DbError;
use dm_dialect::models::{XaPhase, Xid};
use std::sync::Arc;

#[tokio::test]
async fn test_xa_full_cycle_statement_order() {
    let connector = ScriptedConnector::new();
    let mut conn = Connection::dameng(config(), Arc::new(connector.clone()));

    assert!(conn.start_trans_xa("xa1").await.unwrap());
    conn.prepare_xa("xa1").await.unwrap();
    conn.commit_xa("xa1").await.unwrap();

    assert_eq!(
        connector.statements(),
        vec![
            "XA START 'xa1'",
            "XA END 'xa1'",
            "XA PREPARE 'xa1'",
            "XA COMMIT 'xa1'",
        ]
    );
    assert!(
        connector
            .calls()
            .iter()
            .all(|c| matches!(c, Call::Exec { .. })),
        "XA commands must be sent unprepared"
    );
}

#[tokio::test]
async fn test_xa_rollback_after_end() {
    let connector = ScriptedConnector::new();
    let mut conn = Connection::dameng(config(), Arc::new(connector.clone()));

    conn.start_trans_xa("xa2").await.unwrap();
    conn.end_xa("xa2").await.unwrap();
    conn.rollback_xa("xa2").await.unwrap();

    assert_eq!(
        connector.statements(),
        vec!["XA START 'xa2'", "XA END 'xa2'", "XA ROLLBACK 'xa2'"]
    );
    assert_eq!(conn.xa_state().unwrap().phase, XaPhase::RolledBack);
}

#[tokio::test]
async fn test_commit_without_start_sends_command() {
    let connector = ScriptedConnector::new();
    let mut conn = Connection::dameng(config(), Arc::new(connector.clone()));

    // Phase tracking is advisory; the server decides validity
    conn.commit_xa("orphan").await.unwrap();

    assert_eq!(connector.statements(), vec!["XA COMMIT 'orphan'"]);
    assert_eq!(conn.xa_state().unwrap().phase, XaPhase::Committed);
}

#[tokio::test]
async fn test_start_without_link_returns_false() {
    let connector = ScriptedConnector::refusing();
    let mut conn = Connection::dameng(config(), Arc::new(connector.clone()));

    let started = conn.start_trans_xa("xa3").await.unwrap();

    assert!(!started);
    assert!(connector.statements().is_empty());
    assert!(conn.xa_state().is_none());
    assert!(!conn.is_connected());
}

#[tokio::test]
async fn test_commit_without_link_is_error() {
    let connector = ScriptedConnector::refusing();
    let mut conn = Connection::dameng(config(), Arc::new(connector));

    let err = conn.commit_xa("xa4").await.unwrap_err();
    assert!(matches!(err, DbError::Connection { .. }));
}

#[tokio::test]
async fn test_server_rejection_propagates() {
    let connector = ScriptedConnector::new().failing_on("XA PREPARE");
    let mut conn = Connection::dameng(config(), Arc::new(connector.clone()));

    conn.start_trans_xa("xa5").await.unwrap();
    let err = conn.prepare_xa("xa5").await.unwrap_err();

    assert!(matches!(err, DbError::Database { .. }));
    assert_eq!(err.sql_state(), Some("XAE04"));
    // END went out before PREPARE failed
    assert_eq!(
        connector.statements(),
        vec!["XA START 'xa5'", "XA END 'xa5'", "XA PREPARE 'xa5'"]
    );
    assert_eq!(conn.xa_state().unwrap().phase, XaPhase::Started);
}

#[tokio::test]
async fn test_failed_start_leaves_no_state() {
    let connector = ScriptedConnector::new().failing_on("XA START");
    let mut conn = Connection::dameng(config(), Arc::new(connector));

    assert!(conn.start_trans_xa("xa6").await.is_err());
    assert!(conn.xa_state().is_none());
}

#[tokio::test]
async fn test_generated_xid_round_trip() {
    let connector = ScriptedConnector::new();
    let mut conn = Connection::dameng(config(), Arc::new(connector.clone()));
    let xid = Xid::generate();

    assert!(conn.start_trans_xa(&xid).await.unwrap());
    assert_eq!(connector.statements(), vec![format!("XA START '{}'", xid)]);
    assert_eq!(conn.xa_state().unwrap().xid, xid);
}
