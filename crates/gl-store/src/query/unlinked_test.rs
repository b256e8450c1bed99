use super::*;
use crate::external_id::{link_club_code, link_ladder_id, LadderTable};
use crate::reference::{NewClub, NewPilot};
use crate::LadderDb;
use gl_core::{ClubCode, LadderId};

#[test]
fn empty_database_has_nothing_unlinked() {
    let db = LadderDb::open_memory().unwrap();
    for table in LadderTable::ALL {
        assert!(unlinked_rows(db.conn(), table.into()).unwrap().is_empty());
    }
    assert_eq!(count_unlinked(db.conn(), ExternalColumn::ClubLadderCode).unwrap(), 0);
}

#[test]
fn unlinked_pilots_shrink_as_ids_are_backfilled() {
    let db = LadderDb::open_memory().unwrap();
    let a = db
        .find_or_create_pilot(&NewPilot::new("Ann", "Welch", None))
        .unwrap()
        .row
        .id;
    let b = db
        .find_or_create_pilot(&NewPilot::new("Derek", "Piggott", None))
        .unwrap()
        .row
        .id;
    db.find_or_create_pilot(&NewPilot::new("Philip", "Wills", Some(LadderId::new(3))))
        .unwrap();

    let column = ExternalColumn::from(LadderTable::Pilot);
    assert_eq!(unlinked_rows(db.conn(), column).unwrap(), vec![a, b]);

    link_ladder_id(db.conn(), LadderTable::Pilot, a, LadderId::new(1)).unwrap();
    assert_eq!(unlinked_rows(db.conn(), column).unwrap(), vec![b]);
    assert_eq!(count_unlinked(db.conn(), column).unwrap(), 1);
}

#[test]
fn unlinked_clubs() {
    let db = LadderDb::open_memory().unwrap();
    let club = db
        .find_or_create_club(&NewClub {
            club_name: Some("Unaffiliated".to_string()),
            ..Default::default()
        })
        .unwrap()
        .row;

    let column = ExternalColumn::ClubLadderCode;
    assert_eq!(unlinked_rows(db.conn(), column).unwrap(), vec![club.id]);

    link_club_code(db.conn(), club.id, &ClubCode::new("UNA")).unwrap();
    assert_eq!(count_unlinked(db.conn(), column).unwrap(), 0);
}
