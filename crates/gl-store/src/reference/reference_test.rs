use super::club::{find_or_create_club, get_club};
use super::glider::find_or_create_glider;
use super::glider_model::{find_glider_model_by_ladder_id, find_or_create_glider_model};
use super::launch_point::find_or_create_launch_point;
use super::pilot::find_or_create_pilot;
use super::turnpoint::{find_or_create_turnpoint, turnpoint_exists};
use super::*;
use crate::error::{ConstraintKind, StoreError};
use crate::LadderDb;
use gl_core::{feet_to_metres, ClubCode, GliderType, LadderId, Registration, TurnpointCode};
use std::cell::Cell;

fn open() -> LadderDb {
    LadderDb::open_memory().unwrap()
}

fn club(name: &str, code: &str) -> NewClub {
    NewClub {
        club_name: Some(name.to_string()),
        is_university: Some(false),
        ladder_code: Some(ClubCode::new(code)),
    }
}

fn lasham(club_code: Option<&str>) -> NewLaunchPoint {
    NewLaunchPoint {
        site_name: "Lasham".to_string(),
        lat: 51.187,
        lon: -1.033,
        height_amsl: Some(feet_to_metres(618.0)),
        ladder_id: Some(LadderId::new(31)),
        club_ladder_code: club_code.map(ClubCode::new),
    }
}

// ── Clubs ──────────────────────────────────────────────────────────────

#[test]
fn club_find_or_create_is_idempotent() {
    let db = open();
    let first = find_or_create_club(db.conn(), &club("Cambridge GC", "ABC")).unwrap();
    let second = find_or_create_club(db.conn(), &club("Cambridge GC", "ABC")).unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.row, second.row);
}

#[test]
fn club_find_or_create_keeps_first_name() {
    let db = open();
    let first = find_or_create_club(db.conn(), &club("Cambridge GC", "ABC")).unwrap();
    let second = find_or_create_club(db.conn(), &club("Renamed GC", "ABC")).unwrap();

    assert!(!second.created);
    assert_eq!(second.row.id, first.row.id);
    assert_eq!(second.row.club_name.as_deref(), Some("Cambridge GC"));
    assert_eq!(
        get_club(db.conn(), first.row.id).unwrap().club_name.as_deref(),
        Some("Cambridge GC")
    );
}

#[test]
fn club_known_only_by_code() {
    let db = open();
    let resolved = find_or_create_club(db.conn(), &NewClub::with_code(ClubCode::new("lon"))).unwrap();
    assert_eq!(resolved.row.ladder_code, Some(ClubCode::new("LON")));
    assert_eq!(resolved.row.club_name, None);
    assert_eq!(resolved.row.is_university, None);
}

#[test]
fn club_without_code_or_name_rejected() {
    let db = open();
    let err = find_or_create_club(db.conn(), &NewClub::default()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn club_without_code_keyed_by_name() {
    let db = open();
    let new = NewClub {
        club_name: Some("Unaffiliated".to_string()),
        ..Default::default()
    };
    let a = find_or_create_club(db.conn(), &new).unwrap();
    let b = find_or_create_club(db.conn(), &new).unwrap();
    assert_eq!(a.row.id, b.row.id);
    assert!(!b.created);
}

#[test]
fn get_club_missing_is_not_found() {
    let db = open();
    assert!(matches!(
        get_club(db.conn(), 404),
        Err(StoreError::NotFound { entity: "club", .. })
    ));
}

// ── Pilots ─────────────────────────────────────────────────────────────

#[test]
fn pilot_keyed_by_ladder_id() {
    let db = open();
    let new = NewPilot::new("Ann", "Welch", Some(LadderId::new(1001)));
    let first = find_or_create_pilot(db.conn(), &new).unwrap();
    let again = find_or_create_pilot(db.conn(), &NewPilot::new("Anne", "Welch", Some(LadderId::new(1001)))).unwrap();

    assert!(first.created);
    assert_eq!(again.row, first.row);
    assert_eq!(again.row.forename, "Ann");
}

#[test]
fn pilots_without_ladder_id_keyed_by_name() {
    let db = open();
    let a = find_or_create_pilot(db.conn(), &NewPilot::new("Derek", "Piggott", None)).unwrap();
    let b = find_or_create_pilot(db.conn(), &NewPilot::new("Derek", "Piggott", None)).unwrap();
    let c = find_or_create_pilot(db.conn(), &NewPilot::new("Derek", "Piggott", Some(LadderId::new(5)))).unwrap();

    assert_eq!(a.row.id, b.row.id);
    assert!(c.created, "a ladder ID is a distinct natural key");
    assert_ne!(c.row.id, a.row.id);
}

#[test]
fn pilot_requires_names() {
    let db = open();
    let err = find_or_create_pilot(db.conn(), &NewPilot::new("", "Smith", None)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

// ── Glider models & gliders ────────────────────────────────────────────

#[test]
fn glider_model_keyed_by_name() {
    let db = open();
    let new = NewGliderModel {
        model_name: GliderType::new("LS8-18"),
        seats: Some(1),
        vintage: Some(false),
        turbo: Some(false),
        handicap: Some(105.0),
        ladder_id: Some(LadderId::new(88)),
    };
    let first = find_or_create_glider_model(db.conn(), &new).unwrap();
    let named = find_or_create_glider_model(
        db.conn(),
        &NewGliderModel::named(GliderType::new("LS8-18"), None),
    )
    .unwrap();

    assert!(!named.created);
    assert_eq!(named.row, first.row);
    assert_eq!(named.row.handicap, Some(105.0));
    assert_eq!(
        find_glider_model_by_ladder_id(db.conn(), LadderId::new(88))
            .unwrap()
            .map(|m| m.id),
        Some(first.row.id)
    );
}

#[test]
fn glider_model_ladder_id_offered_for_unlinked_model_is_reported() {
    let db = open();
    let stored = find_or_create_glider_model(
        db.conn(),
        &NewGliderModel::named(GliderType::new("Discus"), None),
    )
    .unwrap()
    .into_row();

    let offered = NewGliderModel::named(GliderType::new("Discus"), Some(LadderId::new(9)));
    let again = find_or_create_glider_model(db.conn(), &offered).unwrap();

    assert!(!again.created);
    assert_eq!(again.row.ladder_id, None, "find-or-create never links");
    assert!(offered.differs_from(&stored));
    assert!(!NewGliderModel::named(GliderType::new("Discus"), None).differs_from(&stored));
}

#[test]
fn glider_model_ladder_id_unique() {
    let db = open();
    find_or_create_glider_model(
        db.conn(),
        &NewGliderModel::named(GliderType::new("Discus"), Some(LadderId::new(9))),
    )
    .unwrap();
    let err = find_or_create_glider_model(
        db.conn(),
        &NewGliderModel::named(GliderType::new("Discus 2"), Some(LadderId::new(9))),
    )
    .unwrap_err();

    assert!(err.is_unique_violation(), "{err}");
}

#[test]
fn glider_keyed_by_registration() {
    let db = open();
    let model = find_or_create_glider_model(
        db.conn(),
        &NewGliderModel::named(GliderType::new("ASW 28"), None),
    )
    .unwrap()
    .into_row();

    let reg = Registration::new("G-CKLA");
    let first = find_or_create_glider(db.conn(), &reg, Some(model.id)).unwrap();
    let second = find_or_create_glider(db.conn(), &reg, None).unwrap();

    assert!(first.created);
    assert_eq!(second.row, first.row);
    assert_eq!(second.row.model, Some(model.id));
}

#[test]
fn glider_with_unknown_model_rejected() {
    let db = open();
    let err = find_or_create_glider(db.conn(), &Registration::new("G-DDXK"), Some(999)).unwrap_err();
    assert!(err.is_foreign_key_violation(), "{err}");
}

// ── Turnpoints ─────────────────────────────────────────────────────────

#[test]
fn turnpoint_keyed_by_code() {
    let db = open();
    let new = NewTurnpoint {
        code: TurnpointCode::new("NMK"),
        lat: 52.2,
        lon: -0.9,
        height_amsl: Some(120.0),
        description: Some("Newmarket racecourse".to_string()),
    };
    let first = find_or_create_turnpoint(db.conn(), &new).unwrap();
    let second = find_or_create_turnpoint(db.conn(), &new).unwrap();

    assert!(first.created);
    assert_eq!(first.row, second.row);
    assert!(turnpoint_exists(db.conn(), &TurnpointCode::new("nmk")).unwrap());
    assert!(!turnpoint_exists(db.conn(), &TurnpointCode::new("XYZ")).unwrap());
}

// ── Launch points ──────────────────────────────────────────────────────

#[test]
fn launch_point_with_known_club() {
    let db = open();
    find_or_create_club(db.conn(), &club("Lasham Gliding Society", "LAS")).unwrap();
    let lp = find_or_create_launch_point(db.conn(), DanglingReferencePolicy::Reject, &lasham(Some("LAS")))
        .unwrap();

    assert!(lp.created);
    assert_eq!(lp.row.club_ladder_code, Some(ClubCode::new("LAS")));
    assert!((lp.row.height_amsl.unwrap() - 188.3664).abs() < 1e-6);
}

#[test]
fn launch_point_dangling_club_warns_by_default() {
    let db = open();
    let lp = find_or_create_launch_point(db.conn(), DanglingReferencePolicy::Warn, &lasham(Some("ZZZ")))
        .unwrap();
    assert_eq!(lp.row.club_ladder_code, Some(ClubCode::new("ZZZ")));
}

#[test]
fn launch_point_dangling_club_rejected() {
    let db = open();
    let err = find_or_create_launch_point(db.conn(), DanglingReferencePolicy::Reject, &lasham(Some("ZZZ")))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::DanglingReference { ref code, .. } if code == "ZZZ"
    ));
}

#[test]
fn launch_point_keyed_by_ladder_id() {
    let db = open();
    let first = find_or_create_launch_point(db.conn(), DanglingReferencePolicy::Warn, &lasham(None)).unwrap();
    let mut renamed = lasham(None);
    renamed.site_name = "Lasham Airfield".to_string();
    let second = find_or_create_launch_point(db.conn(), DanglingReferencePolicy::Warn, &renamed).unwrap();

    assert!(!second.created);
    assert_eq!(second.row.site_name, "Lasham");
    assert_eq!(second.row.id, first.row.id);
}

// ── Find-or-create race fallback ───────────────────────────────────────

#[test]
fn lost_insert_race_resolves_to_lookup() {
    let db = open();
    let winner = find_or_create_club(db.conn(), &club("Winner GC", "WIN")).unwrap().into_row();

    // The first lookup misses as if the competing insert had not committed yet.
    let calls = Cell::new(0);
    let resolved = find_or_create(
        db.conn(),
        "club",
        |conn| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Ok(None)
            } else {
                club::find_club_by_code(conn, &ClubCode::new("WIN"))
            }
        },
        |conn| {
            conn.execute("INSERT INTO club (ladder_code) VALUES ('WIN')", [])?;
            unreachable!("insert must hit the unique constraint")
        },
    )
    .unwrap();

    assert_eq!(calls.get(), 2);
    assert!(!resolved.created);
    assert_eq!(resolved.row, winner);
}

#[test]
fn persistent_conflict_is_surfaced() {
    let db = open();
    find_or_create_club(db.conn(), &club("Winner GC", "WIN")).unwrap();

    let result = find_or_create(
        db.conn(),
        "club",
        |_| Ok(None::<Club>),
        |conn| {
            conn.execute("INSERT INTO club (ladder_code) VALUES ('WIN')", [])?;
            unreachable!()
        },
    );

    assert!(matches!(
        result,
        Err(StoreError::ConstraintViolation {
            kind: ConstraintKind::Unique,
            ..
        })
    ));
}
