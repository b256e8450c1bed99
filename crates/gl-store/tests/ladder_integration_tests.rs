//! Integration tests for the ladder repository.
//!
//! These tests open on-disk databases through `StoreConfig`, the way importer
//! and scoring processes do, and exercise the public `LadderDb` API.

use chrono::{NaiveDate, NaiveDateTime};
use gl_core::{ClubCode, DanglingReferencePolicy, LadderId, Registration, StoreConfig, TurnpointCode};
use gl_store::migration::current_version;
use gl_store::query::{count_unlinked, table_row_count, unlinked_rows};
use gl_store::reference::{NewClub, NewPilot, NewTurnpoint};
use gl_store::trace::read_trace;
use gl_store::{
    ConstraintKind, ExternalColumn, FlightLinks, LadderDb, LadderTable, NewFlight, ScoringFields,
    StoreError,
};
use std::path::Path;

// ── Helpers ────────────────────────────────────────────────────────────

fn write_config(dir: &Path, body: &str) -> StoreConfig {
    std::fs::write(dir.join("ladder.yml"), body).unwrap();
    StoreConfig::load_from_dir(dir).unwrap()
}

fn open(dir: &Path) -> LadderDb {
    let config = write_config(
        dir,
        r#"
database_path: ladder.sqlite
trace_archive: traces
busy_timeout_ms: 2000
"#,
    );
    LadderDb::open(&config, dir).unwrap()
}

fn date(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn turnpoint(code: &str) -> NewTurnpoint {
    NewTurnpoint {
        code: TurnpointCode::new(code),
        lat: 52.0,
        lon: -1.0,
        height_amsl: None,
        description: None,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

#[test]
fn reopen_keeps_data_and_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let club_id = {
        let db = open(dir.path());
        db.find_or_create_club(&NewClub::with_code(ClubCode::new("LAS")))
            .unwrap()
            .row
            .id
    };

    let db = open(dir.path());
    let version = current_version(db.conn()).unwrap();
    assert_eq!(version, gl_store::ddl::MIGRATIONS.len() as i32);

    let again = db
        .find_or_create_club(&NewClub::with_code(ClubCode::new("las")))
        .unwrap();
    assert!(!again.created);
    assert_eq!(again.row.id, club_id);
}

#[test]
fn two_connections_share_find_or_create() {
    let dir = tempfile::tempdir().unwrap();
    let importer = open(dir.path());
    let scorer = open(dir.path());

    let pilot = NewPilot::new("Ann", "Welch", Some(LadderId::new(77)));
    let a = importer.find_or_create_pilot(&pilot).unwrap();
    let b = scorer.find_or_create_pilot(&pilot).unwrap();

    assert!(a.created);
    assert!(!b.created);
    assert_eq!(a.row, b.row);
    assert_eq!(table_row_count(scorer.conn(), "pilot").unwrap(), 1);
}

#[test]
fn concurrent_writers_converge_on_one_row() {
    let dir = tempfile::tempdir().unwrap();
    open(dir.path());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let root = dir.path().to_path_buf();
            std::thread::spawn(move || {
                let config = StoreConfig::load_from_dir(&root).unwrap();
                let db = LadderDb::open(&config, &root).unwrap();
                db.find_or_create_club(&NewClub::with_code(ClubCode::new("CAM")))
                    .unwrap()
                    .row
                    .id
            })
        })
        .collect();

    let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]), "{ids:?}");

    let db = open(dir.path());
    assert_eq!(table_row_count(db.conn(), "club").unwrap(), 1);
}

#[test]
fn concurrent_writers_share_name_keyed_rows() {
    let dir = tempfile::tempdir().unwrap();
    open(dir.path());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let root = dir.path().to_path_buf();
            std::thread::spawn(move || {
                let config = StoreConfig::load_from_dir(&root).unwrap();
                let db = LadderDb::open(&config, &root).unwrap();
                let pilot = db
                    .find_or_create_pilot(&NewPilot::new("Derek", "Piggott", None))
                    .unwrap()
                    .row
                    .id;
                let club = db
                    .find_or_create_club(&NewClub {
                        club_name: Some("Unaffiliated".to_string()),
                        ..Default::default()
                    })
                    .unwrap()
                    .row
                    .id;
                (pilot, club)
            })
        })
        .collect();

    let ids: Vec<(i64, i64)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]), "{ids:?}");

    let db = open(dir.path());
    assert_eq!(table_row_count(db.conn(), "pilot").unwrap(), 1);
    assert_eq!(table_row_count(db.conn(), "club").unwrap(), 1);
}

#[test]
fn trace_dedup_across_connections_with_archive() {
    let dir = tempfile::tempdir().unwrap();
    let first = open(dir.path());
    let second = open(dir.path());
    let igc = b"AXXXABC\nHFDTE150624\n";

    let a = first.intern_trace(igc, "a.igc", date(15)).unwrap();
    let b = second.intern_trace(igc, "b.igc", date(16)).unwrap();

    assert!(a.created);
    assert!(!b.created);
    assert_eq!(b.row.original_filename, "a.igc");
    assert_eq!(b.row.downloaded_at, date(15));

    let archive = first.trace_archive().unwrap();
    assert_eq!(archive, dir.path().join("traces"));
    assert_eq!(read_trace(archive, &a.row).unwrap(), igc.to_vec());
}

#[test]
fn task_is_write_once() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(dir.path());
    let route = TurnpointCode::parse_all(["CBA", "DEF", "GHI"]).unwrap();

    db.define_task(5, &route).unwrap();
    let err = db
        .define_task(5, &TurnpointCode::parse_all(["XYZ"]).unwrap())
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::ConstraintViolation {
            kind: ConstraintKind::PrimaryKey,
            ..
        }
    ));
    assert_eq!(db.get_task(5).unwrap(), route);
    assert!(matches!(
        db.get_task(6),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn reject_policy_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"
database_path: ladder.sqlite
dangling_references: reject
"#,
    );
    let db = LadderDb::open(&config, dir.path()).unwrap();
    assert_eq!(db.dangling_references(), DanglingReferencePolicy::Reject);
    assert!(db.trace_archive().is_none());

    db.find_or_create_turnpoint(&turnpoint("LAS")).unwrap();
    assert!(matches!(
        db.define_new_task(&TurnpointCode::parse_all(["LAS", "NOP"]).unwrap()),
        Err(StoreError::DanglingReference { .. })
    ));
    db.find_or_create_turnpoint(&turnpoint("NOP")).unwrap();
    assert_eq!(
        db.define_new_task(&TurnpointCode::parse_all(["LAS", "NOP"]).unwrap())
            .unwrap(),
        0
    );
}

#[test]
fn flight_enrichment_and_correlation() {
    let dir = tempfile::tempdir().unwrap();
    let db = open(dir.path());

    let glider = db
        .find_or_create_glider(&Registration::new("G-CKLA"), None)
        .unwrap()
        .into_row();
    let flight = db
        .record_flight(&NewFlight {
            links: FlightLinks {
                glider: Some(glider.id),
                ..Default::default()
            },
            flight_date: Some(date(20)),
            ..Default::default()
        })
        .unwrap();

    let column = ExternalColumn::from(LadderTable::Flight);
    assert_eq!(unlinked_rows(db.conn(), column).unwrap(), vec![flight.id]);

    db.link_flight_ladder_id(flight.id, LadderId::new(42)).unwrap();
    db.link_flight_ladder_id(flight.id, LadderId::new(42)).unwrap();
    assert!(matches!(
        db.link_flight_ladder_id(flight.id, LadderId::new(43)),
        Err(StoreError::IntegrityConflict { .. })
    ));
    assert_eq!(count_unlinked(db.conn(), column).unwrap(), 0);

    let scoring = ScoringFields {
        speed: Some(90.0),
        total_points: Some(1000.0),
        ..Default::default()
    };
    db.update_scoring(flight.id, &scoring).unwrap();
    db.update_scoring(flight.id, &scoring).unwrap();
    assert_eq!(db.get_flight(flight.id).unwrap().scoring, scoring);

    let dangling = db.record_flight(&NewFlight {
        links: FlightLinks {
            pilot: Some(999),
            ..Default::default()
        },
        ..Default::default()
    });
    assert!(dangling.unwrap_err().is_foreign_key_violation());
}
