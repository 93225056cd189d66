//! Hand-built documents shared by the unit tests.
//!
//! The standard document spans 2024-01-01 to 2024-01-05 and has:
//!
//! | train | kind        | parts  |
//! |-------|-------------|--------|
//! | 101   | commercial  | A, B   |
//! | 900   | operational | B, C   |
//! | 102   | commercial  | C      |
//! | 201   | commercial  | D      |
//! | 901   | operational | E      |
//!
//! Calendars: A `odd` (10101), B `daily` (11111), C `even` (01010),
//! D `never` (00000), E `daily`. So 101, 900 and 102 form one related
//! chain; 201 and 901 stand alone.

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::document::RailmlDocument;

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

pub fn from_json(value: Value) -> RailmlDocument {
    serde_json::from_value(value).unwrap()
}

fn stop(ocp: &str, kind: &str, arrival: Option<&str>, departure: Option<&str>) -> Value {
    let mut times = json!({"scope": "published"});
    if let Some(a) = arrival {
        times["arrival"] = json!(a);
    }
    if let Some(d) = departure {
        times["departure"] = json!(d);
    }
    json!({
        "attributes": {"ocpRef": ocp, "ocpType": kind},
        "times": {"attributes": times}
    })
}

fn part(id: &str, calendar: &str, stops: Vec<Value>) -> Value {
    json!({
        "attributes": {"id": id, "name": format!("part {id}")},
        "operatingPeriodRef": {"attributes": {"ref": calendar}},
        "ocpsTT": {"ocpTT": stops}
    })
}

fn train(id: &str, kind: &str, number: &str, parts: &[&str]) -> Value {
    let refs: Vec<Value> = parts
        .iter()
        .enumerate()
        .map(|(i, p)| json!({"attributes": {"position": i + 1, "ref": p}}))
        .collect();
    json!({
        "attributes": {"id": id, "type": kind, "trainNumber": number},
        "trainPartSequence": {
            "attributes": {"sequence": "1"},
            "trainPartRef": refs
        }
    })
}

fn document_with(calendars: Value, parts: Vec<Value>, trains: Vec<Value>) -> Value {
    json!({
        "railml": {
            "infrastructure": {
                "operationControlPoints": {
                    "ocp": [
                        {
                            "attributes": {"id": "o1", "name": "Chur", "code": "CH"},
                            "geoCoord": {"attributes": {"coord": "759500 190900"}}
                        },
                        {
                            "attributes": {"id": "o2", "name": "Landquart", "code": "LQ"},
                            "geoCoord": {"attributes": {"coord": "763350 203800"}}
                        },
                        {
                            "attributes": {"id": "o3", "name": "Zizers", "code": ""}
                        }
                    ]
                }
            },
            "timetable": {
                "timetablePeriods": {
                    "timetablePeriod": {
                        "attributes": {
                            "id": "tt",
                            "startDate": "2024-01-01",
                            "endDate": "2024-01-05T00:00:00"
                        }
                    }
                },
                "operatingPeriods": {"operatingPeriod": calendars},
                "trainParts": {"trainPart": parts},
                "trains": {"train": trains}
            }
        }
    })
}

/// The standard document as raw JSON, for tests that need to corrupt it.
pub fn document_json() -> Value {
    let calendars = json!([
        {"attributes": {"id": "daily", "name": "daily", "bitMask": "11111"}},
        {"attributes": {"id": "odd", "bitMask": "10101"}},
        {"attributes": {"id": "even", "bitMask": "01010"}},
        {"attributes": {"id": "never", "bitMask": "00000"}}
    ]);
    let parts = vec![
        part(
            "A",
            "odd",
            vec![
                stop("o1", "stop", None, Some("08:00:00")),
                stop("o2", "stop", Some("08:20:00"), None),
            ],
        ),
        part(
            "B",
            "daily",
            vec![
                stop("o2", "stop", None, Some("08:25:00")),
                stop("o3", "pass", Some("08:35:00"), Some("08:35:00")),
                stop("o1", "stop", Some("08:50:00"), None),
            ],
        ),
        part(
            "C",
            "even",
            vec![
                stop("o1", "stop", None, Some("10:00:00")),
                stop("o2", "stop", Some("10:20:00"), None),
            ],
        ),
        part(
            "D",
            "never",
            vec![
                stop("o3", "stop", None, Some("06:00:00")),
                stop("o1", "stop", Some("06:15:00"), None),
            ],
        ),
        part(
            "E",
            "daily",
            vec![
                stop("o1", "stop", None, Some("23:50:00")),
                stop("o2", "stop", Some("24:10:00"), None),
            ],
        ),
    ];
    let trains = vec![
        train("t101", "commercial", "101", &["A", "B"]),
        train("t900", "operational", "900", &["B", "C"]),
        train("t102", "commercial", "102", &["C"]),
        train("t201", "commercial", "201", &["D"]),
        train("t901", "operational", "901", &["E"]),
    ];
    document_with(calendars, parts, trains)
}

pub fn document() -> RailmlDocument {
    from_json(document_json())
}

/// Two trains sharing one part: 101 runs A and B, 202 runs B.
pub fn shared_part_document() -> RailmlDocument {
    let calendars = json!({"attributes": {"id": "daily", "bitMask": "11111"}});
    let parts = vec![
        part("A", "daily", vec![stop("o1", "stop", None, Some("07:00:00"))]),
        part("B", "daily", vec![stop("o2", "stop", Some("07:30:00"), None)]),
    ];
    let trains = vec![
        train("t101", "commercial", "101", &["A", "B"]),
        train("t202", "commercial", "202", &["B"]),
    ];
    from_json(document_with(calendars, parts, trains))
}
