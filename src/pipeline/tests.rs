//! Session scenarios and pipeline properties

use std::collections::BTreeSet;

use proptest::prelude::*;

use super::codec::normalize_isbn;
use super::*;
use crate::Error;
use crate::config::PipelineConfig;
use crate::sheet::Table;

const HEADERS: [&str; 13] = [
    "Wi_Number",
    "Limp_ISBN",
    "Cased_ISBN",
    "Title",
    "Trim_Height",
    "Trim_Width",
    "Page_Extent",
    "Spine_Size",
    "Reel_Width",
    "Cut_Off",
    "Imposition",
    "Paper_Code",
    "Production_Route",
];

const LIMP_ROUTE: &str = "Limp P/Bound 8pp Cover";

fn job(wi: &str, limp: &str, cased: &str, width: &str, route: &str) -> Vec<String> {
    [
        wi, limp, cased, "A Title, Revised", "234", width, "320", "18", "640", "12", "16pp", "P80",
        route,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn table_of(rows: Vec<Vec<String>>) -> Table {
    Table {
        headers: HEADERS.iter().map(|s| s.to_string()).collect(),
        rows,
    }
}

fn sample_session() -> Session {
    Session::load(
        table_of(vec![
            job("W1", "9780000000002", "", "150", LIMP_ROUTE),
            job("W2", "", "9781234567897", "156", "Cased"),
            job("W3", "9780000000019", "", "129", LIMP_ROUTE),
            job("W4", "", "", "150", LIMP_ROUTE),
        ]),
        PipelineConfig::default(),
    )
}

#[test]
fn test_load_applies_rule_and_derives_records() {
    let session = sample_session();

    assert_eq!(session.len(), 4);
    assert_eq!(session.adjusted_rows(), &BTreeSet::from([0, 2, 3]));
    assert_eq!(session.rows()[0][5], "160");
    assert_eq!(session.rows()[1][5], "156");

    let xml = &session.xml_records()[0];
    assert_eq!(xml.wi_number, "W1");
    assert_eq!(xml.isbn, "9780000000002");
    assert_eq!(xml.title, "A Title Revised");
    assert_eq!(xml.trim_width, "160");
    assert_eq!(xml.file_name(), "W1.xml");
    let doc = xml.xml.as_deref().unwrap();
    assert!(doc.contains("<Title>A Title Revised</Title>"));
    assert!(doc.contains("<Trim_Width>160</Trim_Width>"));

    let barcodes = session.barcode_records();
    assert!(barcodes[0].payload.as_ref().unwrap().as_str().ends_with("16001"));
    assert_eq!(barcodes[1].payload.as_ref().unwrap().transfer_station(), TransferStation::Cased);
    assert!(!barcodes[3].is_eligible());
    assert_eq!(session.eligible_barcodes().count(), 3);
    assert_eq!(session.xml_records()[3].isbn, "N/A");
}

#[test]
fn test_delete_row_updates_everything_together() {
    let mut session = sample_session();
    session.delete_row(1).unwrap();

    assert_eq!(session.len(), 3);
    assert_eq!(session.xml_records().len(), 3);
    assert_eq!(session.barcode_records().len(), 3);
    assert_eq!(session.adjusted_rows(), &BTreeSet::from([0, 1, 2]));

    let wis: Vec<&str> = session.xml_records().iter().map(|r| r.wi_number.as_str()).collect();
    assert_eq!(wis, vec!["W1", "W3", "W4"]);
    let indices: Vec<usize> = session.barcode_records().iter().map(|r| r.row_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);

    session.delete_row(0).unwrap();
    assert_eq!(session.adjusted_rows(), &BTreeSet::from([0, 1]));
    assert_eq!(session.rows()[0][0], "W3");
}

#[test]
fn test_delete_out_of_range_leaves_state_untouched() {
    let mut session = sample_session();
    let before = session.clone();
    let err = session.delete_row(4).unwrap_err();
    assert!(matches!(err, Error::RowOutOfRange { index: 4, len: 4 }));
    assert_eq!(session.rows(), before.rows());
    assert_eq!(session.adjusted_rows(), before.adjusted_rows());
}

#[test]
fn test_edit_cell_rederives_row() {
    let mut session = sample_session();
    session.edit_cell(3, "Cased_ISBN", "978-1-23456-789-7").unwrap();

    let record = &session.barcode_records()[3];
    assert!(record.is_eligible());
    assert_eq!(record.file_name().as_deref(), Some("W4_9781234567897_DBC.pdf"));
    // The rule is not re-run by an edit
    assert_eq!(session.rows()[3][5], "160");
    assert!(session.is_adjusted(3));

    session.edit_cell(0, "Title", "New, Title").unwrap();
    assert!(session.xml_document(0).unwrap().contains("<Title>New Title</Title>"));
}

#[test]
fn test_edit_cell_errors() {
    let mut session = sample_session();
    assert!(matches!(
        session.edit_cell(0, "Binding", "x"),
        Err(Error::UnknownColumn(_))
    ));
    assert!(matches!(
        session.edit_cell(10, "Title", "x"),
        Err(Error::RowOutOfRange { index: 10, len: 4 })
    ));
}

#[test]
fn test_reapply_rules_replaces_adjusted_set() {
    let mut session = sample_session();
    session.edit_cell(0, "Production_Route", "Cased").unwrap();

    let count = session.reapply_rules();
    assert_eq!(count, 2);
    assert_eq!(session.adjusted_rows(), &BTreeSet::from([2, 3]));
    // Rows that still match are widened again
    assert_eq!(session.rows()[2][5], "149");
    assert_eq!(session.rows()[0][5], "160");
    assert_eq!(session.xml_records()[2].trim_width, "149");
}

#[test]
fn test_rule_can_be_disabled() {
    let config = PipelineConfig::default().with_production_rule(false);
    let session = Session::load(table_of(vec![job("W1", "9780000000002", "", "150", LIMP_ROUTE)]), config);
    assert!(session.adjusted_rows().is_empty());
    assert_eq!(session.rows()[0][5], "150");
}

#[test]
fn test_replace_and_clear() {
    let mut session = sample_session();
    session.replace(table_of(vec![job("W9", "", "", "100", "Cased")]));
    assert_eq!(session.len(), 1);
    assert!(session.adjusted_rows().is_empty());
    assert_eq!(session.xml_records()[0].wi_number, "W9");

    session.clear();
    assert!(session.is_empty());
    assert!(session.headers().is_empty());
    assert!(session.xml_records().is_empty());
    assert!(session.barcode_records().is_empty());
    assert!(matches!(session.xml_document(0), Err(Error::RowOutOfRange { .. })));
}

#[test]
fn test_missing_columns_degrade_features() {
    let table = Table::from_rows(vec![
        vec!["Wi_Number".to_string(), "Title".to_string()],
        vec!["W1".to_string(), "Only, Title".to_string()],
    ])
    .unwrap();
    let session = Session::load(table, PipelineConfig::default());

    assert_eq!(session.len(), 1);
    assert!(session.adjusted_rows().is_empty());
    assert!(!session.barcode_records()[0].is_eligible());
    assert_eq!(session.xml_records()[0].production_route, "N/A");
    assert!(session.xml_document(0).unwrap().contains("<Title>Only Title</Title>"));
}

#[test]
fn test_unknown_wi_number() {
    let session = Session::load(
        table_of(vec![job("", "9780000000002", "", "150", "Cased")]),
        PipelineConfig::default(),
    );
    assert_eq!(session.xml_records()[0].file_name(), "unknown.xml");
    assert_eq!(
        session.barcode_records()[0].file_name().as_deref(),
        Some("unknown_9780000000002_DBC.pdf")
    );
}

fn route_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(LIMP_ROUTE), Just("Cased"), Just(""), Just("Limp P/Bound 4pp Cover")]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_rule_adjusts_exactly_matching_rows(
        rows in prop::collection::vec((route_strategy(), 0u32..1000), 0..20)
    ) {
        let input: Vec<Vec<String>> = rows
            .iter()
            .enumerate()
            .map(|(i, (route, width))| job(&format!("W{}", i), "9780000000002", "", &width.to_string(), route))
            .collect();
        let session = Session::load(table_of(input), PipelineConfig::default());

        for (i, (route, width)) in rows.iter().enumerate() {
            let out = &session.rows()[i][5];
            if *route == LIMP_ROUTE {
                prop_assert_eq!(out, &(width + 10).to_string());
                prop_assert!(session.is_adjusted(i));
            } else {
                prop_assert_eq!(out, &width.to_string());
                prop_assert!(!session.is_adjusted(i));
            }
        }
    }

    #[test]
    fn prop_payload_is_always_37_digits(
        limp in "[0-9 -]{0,20}",
        cased in "\\PC{0,20}",
        height in "\\PC{0,8}",
        width in "[0-9.]{0,6}",
        spine in "[0-9.]{0,4}",
        cut_off in "\\PC{0,6}",
    ) {
        let headers = ["Limp_ISBN", "Cased_ISBN", "Trim_Height", "Trim_Width", "Spine_Size", "Cut_Off"];
        let columns = ColumnMap::resolve(&headers);
        let row = [limp, cased, height, width, spine, cut_off];
        if let Some(payload) = BarcodeEncoder::new(&columns).encode(&row) {
            prop_assert_eq!(payload.as_str().len(), PAYLOAD_LEN);
            prop_assert!(payload.as_str().bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn prop_isbn_normalization_is_idempotent(raw in "\\PC{0,30}") {
        let once = normalize_isbn(&raw);
        prop_assert_eq!(once.len(), 13);
        prop_assert_eq!(normalize_isbn(&once), once.clone());
    }

    #[test]
    fn prop_thirteen_digit_isbn_is_unchanged(isbn in "[0-9]{13}") {
        prop_assert_eq!(normalize_isbn(&isbn), isbn);
    }

    #[test]
    fn prop_delete_remaps_adjusted_rows(
        routes in prop::collection::vec(route_strategy(), 1..15),
        pick in any::<prop::sample::Index>(),
    ) {
        let input: Vec<Vec<String>> = routes
            .iter()
            .enumerate()
            .map(|(i, route)| job(&format!("W{}", i), "", "", "150", route))
            .collect();
        let mut session = Session::load(table_of(input), PipelineConfig::default());
        let n = session.len();
        let deleted = pick.index(n);
        let before = session.adjusted_rows().clone();

        session.delete_row(deleted).unwrap();

        prop_assert_eq!(session.len(), n - 1);
        prop_assert_eq!(session.xml_records().len(), n - 1);
        prop_assert_eq!(session.barcode_records().len(), n - 1);
        for &i in &before {
            if i < deleted {
                prop_assert!(session.is_adjusted(i));
            } else if i > deleted {
                prop_assert!(session.is_adjusted(i - 1));
            }
        }
        let expected = before.len() - usize::from(before.contains(&deleted));
        prop_assert_eq!(session.adjusted_rows().len(), expected);
    }
}
