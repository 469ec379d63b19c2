use std::path::PathBuf;

use super::common::*;
use crate::workflows::edits::domain::{ClassificationResult, EditCategory, VerdictTier};
use crate::workflows::edits::feed::{EditFeed, FeedError, FeedLocation, VALIDATION_COLUMN};
use crate::workflows::edits::validator::EditFeedValidator;

const FEED: &str = "\u{feff}propnum,spi,property pfi,edit_code,comments,plan_number,house_number_1,road_name,road_type,locality_name,council_val,vicmap_val\n\
171763.0,2\\PS828727,nan,A,\"New lot, subdivision PS828727\",PS828727,71.0,GOWRIE,STREET,TATURA,,\n\
\x20nan , 3\\PS423158 ,130692255,R,Removing propnum,,,,,,,\n";

#[test]
fn parses_rows_into_intents() {
    let feed = EditFeed::from_reader(FEED.as_bytes()).expect("feed parses");

    assert_eq!(feed.len(), 2);
    assert_eq!(feed.headers().next(), Some("propnum"));

    let first = &feed.intents()[0];
    assert_eq!(first.identifier.primary_key.as_deref(), Some("171763.0"));
    assert_eq!(first.identifier.secondary_key, None);
    assert_eq!(first.edit_code, "A");
    assert_eq!(first.comments, "New lot, subdivision PS828727");
    assert_eq!(first.plan_number.as_deref(), Some("PS828727"));
    assert_eq!(first.address.proposed_address(), "71 gowrie street tatura");

    let second = &feed.intents()[1];
    assert_eq!(second.identifier.primary_key, None);
    assert_eq!(second.identifier.alternate_key.as_deref(), Some("3\\PS423158"));
    assert_eq!(second.identifier.secondary_key.as_deref(), Some("130692255"));
    assert_eq!(second.plan_number, None);
}

#[test]
fn writes_every_row_back_with_its_verdict() {
    let feed = EditFeed::from_reader(FEED.as_bytes()).expect("feed parses");
    let registry = vec![
        active(
            "171763.0",
            "New child parcel from subdivision PS828727. Processing complete.",
        ),
        registry_record(
            "199533.0",
            "3\\PS423158",
            "PFI_130692255",
            crate::workflows::edits::RegistryStatus::Inactive,
            "Parcel retired.",
        ),
    ];
    let run = EditFeedValidator::default().validate(feed.intents(), &registry);

    let mut output = Vec::new();
    feed.write_validated(&run.results, &mut output)
        .expect("annotated feed written");

    let mut reader = csv::Reader::from_reader(output.as_slice());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.len(), 13);
    assert_eq!(headers.get(12), Some(VALIDATION_COLUMN));

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("rows parse");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get(4), Some("New lot, subdivision PS828727"));
    assert_eq!(rows[0].get(12), Some(run.results[0].message.as_str()));
    assert_eq!(rows[1].get(0), Some(" nan "));
    assert_eq!(rows[1].get(1), Some(" 3\\PS423158 "));
    assert!(rows[1]
        .get(12)
        .is_some_and(|message| message.starts_with("OK: Retirement (R)")));
}

#[test]
fn short_rows_keep_the_verdict_under_its_own_header() {
    let feed = EditFeed::from_reader("propnum,edit_code,comments,road_name\n1,NC\n".as_bytes())
        .expect("feed parses");
    let run = EditFeedValidator::default().validate(feed.intents(), &[]);

    let mut output = Vec::new();
    feed.write_validated(&run.results, &mut output)
        .expect("annotated feed written");

    let mut reader = csv::Reader::from_reader(output.as_slice());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.len(), 5);
    assert_eq!(headers.get(4), Some(VALIDATION_COLUMN));

    let row = reader
        .records()
        .next()
        .expect("one row")
        .expect("row parses");
    assert_eq!(row.len(), 5);
    assert_eq!(row.get(2), Some(""));
    assert_eq!(row.get(3), Some(""));
    assert_eq!(row.get(4), Some(run.results[0].message.as_str()));
    assert!(run.results[0].message.starts_with("Not Found: No change (NC)"));
}

#[test]
fn rows_wider_than_the_header_are_rejected() {
    let err = EditFeed::from_reader("propnum,edit_code\n1,NC\n2,A,extra\n".as_bytes())
        .expect_err("wide row rejected");

    assert!(matches!(
        err,
        FeedError::RowTooLong {
            row: 2,
            fields: 3,
            columns: 2
        }
    ));
}

#[test]
fn write_rejects_misaligned_results() {
    let feed = EditFeed::from_reader(FEED.as_bytes()).expect("feed parses");
    let results = vec![ClassificationResult {
        tier: VerdictTier::Ok,
        category: EditCategory::NoChange,
        message: "OK".to_string(),
        evidence: Vec::new(),
    }];

    let err = feed
        .write_validated(&results, Vec::new())
        .expect_err("misaligned results rejected");

    assert!(matches!(
        err,
        FeedError::ResultCountMismatch {
            rows: 2,
            results: 1
        }
    ));
}

#[tokio::test]
async fn fetch_rejects_blank_files() {
    let path = std::env::temp_dir().join(format!("parcel-recon-blank-{}.csv", std::process::id()));
    std::fs::write(&path, "\u{feff}  \n").expect("write blank feed");

    let result = FeedLocation::Path(path.clone()).fetch().await;
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(FeedError::Empty { .. })));
}

#[tokio::test]
async fn load_reads_feed_from_disk() {
    let path = std::env::temp_dir().join(format!("parcel-recon-feed-{}.csv", std::process::id()));
    std::fs::write(&path, FEED).expect("write feed");

    let feed = FeedLocation::parse(path.to_str().expect("utf-8 temp path"))
        .load()
        .await;
    std::fs::remove_file(&path).ok();

    assert_eq!(feed.expect("feed loads").len(), 2);
}

#[tokio::test]
async fn fetch_reports_missing_files() {
    let missing = PathBuf::from("/nonexistent/parcel-recon/feed.csv");
    match FeedLocation::Path(missing.clone()).fetch().await {
        Err(FeedError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected io error, got {other:?}"),
    }
}
