//! Entity registration, table sets and the shared metadata cache

use sqlcraft::entity_catalog::{
    resolve, ColumnDef, Entity, EntityDescriptor, MetadataError, TableSet,
};
use sqlcraft::expr::{Value, ValueError, ValueKind};
use sqlcraft::query::{Row, RowError};
use std::sync::Arc;

#[derive(Clone, Copy)]
enum AuditShard {
    Live,
    Cold,
}

impl TableSet for AuditShard {
    fn members() -> &'static [Self] {
        &[AuditShard::Live, AuditShard::Cold]
    }

    fn description(&self) -> &'static str {
        match self {
            AuditShard::Live => "audit_event",
            AuditShard::Cold => "audit_event_cold",
        }
    }
}

struct AuditEvent {
    event_id: i64,
    actor: String,
}

impl Entity for AuditEvent {
    fn describe() -> EntityDescriptor {
        EntityDescriptor::new("AuditEvent")
            .table_set::<AuditShard>()
            .column(ColumnDef::new("EventID", ValueKind::Int).key())
            .column(ColumnDef::new("Actor", ValueKind::Text))
            .column(ColumnDef::new("CreatedAt", ValueKind::DateTime).read_only())
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("EventID", self.event_id.into()),
            ("Actor", self.actor.clone().into()),
        ]
    }

    fn assign(&mut self, _member: &str, _value: Value) -> Result<(), ValueError> {
        Ok(())
    }

    fn from_row(row: &Row) -> Result<Self, RowError> {
        Ok(Self {
            event_id: row.member("EventID")?,
            actor: row.member("Actor")?,
        })
    }
}

struct Tableless;

impl Entity for Tableless {
    fn describe() -> EntityDescriptor {
        EntityDescriptor::new("Tableless").column(ColumnDef::new("Id", ValueKind::Int).key())
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        Vec::new()
    }

    fn assign(&mut self, _member: &str, _value: Value) -> Result<(), ValueError> {
        Ok(())
    }

    fn from_row(_row: &Row) -> Result<Self, RowError> {
        Ok(Tableless)
    }
}

#[test]
fn test_resolve_is_shared() {
    let first = resolve::<AuditEvent>().unwrap();
    let second = resolve::<AuditEvent>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_table_set_and_column_mapping() {
    let meta = resolve::<AuditEvent>().unwrap();
    assert_eq!(meta.default_table(), "audit_event");
    assert_eq!(meta.table_candidate(1).unwrap(), "audit_event_cold");

    let key = meta.identity_column().unwrap();
    assert_eq!(key.column_name, "event_id");
    let created = meta.column("CreatedAt").unwrap();
    assert_eq!(created.column_name, "created_at");
    assert!(!created.writable);

    let persisted: Vec<_> = meta.persisted_columns().map(|c| c.member_name.as_str()).collect();
    assert_eq!(persisted, vec!["Actor"]);
}

#[test]
fn test_missing_table_is_reported_every_time() {
    for _ in 0..2 {
        assert!(matches!(
            resolve::<Tableless>(),
            Err(MetadataError::NoTableCandidates { .. })
        ));
    }
}

#[test]
fn test_row_decoding_by_member() {
    let row = Row::new().with("event_id", 7).with("actor", "ops");
    let event = AuditEvent::from_row(&row).unwrap();
    assert_eq!(event.event_id, 7);
    assert_eq!(event.actor, "ops");

    let missing = Row::new().with("event_id", 7);
    assert!(matches!(
        AuditEvent::from_row(&missing),
        Err(RowError::MissingColumn(column)) if column == "actor"
    ));
}
