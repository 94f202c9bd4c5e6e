// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test opens its own store through
//! `Persistence::new_in_memory()`, so connection setup and migrations are
//! exercised throughout. These tests pin down isolation, foreign keys and
//! the capability value carried by the handle.

use shiftboard_domain::{ScheduleId, StoreCapabilities};

use crate::error::PersistenceError;
use crate::{Persistence, ScheduleData};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = Persistence::new_in_memory().unwrap();
    let mut db2: Persistence = Persistence::new_in_memory().unwrap();

    let schedule_id: ScheduleId = db1.create_schedule("North").unwrap();

    let seen: Option<ScheduleData> = db1.get_schedule(schedule_id).unwrap();
    assert_eq!(seen.map(|s| s.name), Some(String::from("North")));
    assert!(db2.get_schedule(schedule_id).unwrap().is_none());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_capabilities_default_to_full() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(persistence.capabilities(), StoreCapabilities::full());
}

#[test]
fn test_with_capabilities_replaces_descriptor() {
    let limited: StoreCapabilities = StoreCapabilities {
        supports_shift_versioning: false,
        supports_event_scoping: false,
        supports_custom_event_colors: true,
    };
    let persistence: Persistence = Persistence::new_in_memory()
        .unwrap()
        .with_capabilities(limited);
    assert_eq!(persistence.capabilities(), limited);
}

#[test]
fn test_file_database_initializes() {
    let path: std::path::PathBuf = std::env::temp_dir().join(format!(
        "shiftboard_init_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
    let schedule_id: ScheduleId = persistence.create_schedule("File").unwrap();
    assert!(persistence.get_schedule(schedule_id).unwrap().is_some());

    drop(persistence);
    let _ = std::fs::remove_file(&path);
}
