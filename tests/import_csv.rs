use pmf_upgrade::api::MockFaqStore;
use pmf_upgrade::errors::{ApiError, ImportError, RawResponse};
use pmf_upgrade::import::{parse_csv, validate_csv, FaqImport};
use std::io::Write;

fn row(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

fn valid_row() -> Vec<String> {
    row(&["1", "Q?", "A.", "kw", "en", "Jan", "a@b.com", "true", "false"])
}

#[test]
fn test_validation_accepts_a_well_formed_record() {
    assert!(validate_csv(&[valid_row()]));
}

#[test]
fn test_validation_rejects_wrong_field_count() {
    let mut short = valid_row();
    short.pop();
    assert!(!validate_csv(&[short]));

    let mut long = valid_row();
    long.push("extra".to_string());
    assert!(!validate_csv(&[valid_row(), long]));
}

#[test]
fn test_validation_rejects_empty_required_fields() {
    for column in [0, 1, 2, 4, 5, 6, 7, 8] {
        let mut record = valid_row();
        record[column] = String::new();
        assert!(!validate_csv(&[record]), "column {column} must be required");
    }
}

#[test]
fn test_validation_treats_zero_as_missing() {
    let mut category = valid_row();
    category[0] = "0".to_string();
    assert!(!validate_csv(&[category]));

    let mut author = valid_row();
    author[5] = "0".to_string();
    assert!(!validate_csv(&[author]));

    let mut keywords = valid_row();
    keywords[3] = "0".to_string();
    assert!(validate_csv(&[keywords]));

    let mut blank_author = valid_row();
    blank_author[5] = " ".to_string();
    assert!(validate_csv(&[blank_author]));
}

#[test]
fn test_validation_rejects_non_boolean_flags() {
    let mut active = valid_row();
    active[7] = "yes".to_string();
    assert!(!validate_csv(&[active]));

    let mut sticky = valid_row();
    sticky[8] = "1".to_string();
    assert!(!validate_csv(&[sticky]));

    let mut mixed_case = valid_row();
    mixed_case[7] = "TRUE".to_string();
    mixed_case[8] = "False".to_string();
    assert!(validate_csv(&[mixed_case]));
}

#[tokio::test]
async fn test_import_sets_flags_and_category() {
    let mut store = MockFaqStore::new();
    store
        .expect_create_faq()
        .withf(|faq| faq.active && !faq.sticky && faq.language == "en" && faq.question == "Q?")
        .times(1)
        .returning(|_| Ok(17));
    store
        .expect_save_metadata()
        .withf(|meta| meta.faq_id == 17 && meta.categories == vec![1] && meta.faq_language == "en")
        .times(1)
        .returning(|_| Ok(()));

    let importer = FaqImport::new(store);
    assert_eq!(importer.import(&valid_row()).await.unwrap(), 17);
}

#[tokio::test]
async fn test_import_rejects_hash_in_question_before_anything_else() {
    let mut store = MockFaqStore::new();
    store.expect_create_faq().times(0);
    store.expect_save_metadata().times(0);

    let importer = FaqImport::new(store);

    let mut record = valid_row();
    record[1] = "What is #1?".to_string();
    assert!(matches!(
        importer.import(&record).await,
        Err(ImportError::HashInQuestion { .. })
    ));

    // Even a record that would otherwise fail validation.
    let broken = row(&["x", "Tag #faq"]);
    assert!(matches!(
        importer.import(&broken).await,
        Err(ImportError::HashInQuestion { .. })
    ));
}

#[tokio::test]
async fn test_metadata_failure_reports_the_created_id() {
    let mut store = MockFaqStore::new();
    store.expect_create_faq().times(1).returning(|_| Ok(99));
    store.expect_save_metadata().times(1).returning(|_| {
        Err(ApiError::Status {
            endpoint: "api/faq/meta".to_string(),
            response: RawResponse {
                status: 500,
                body: "{}".to_string(),
            },
        })
    });

    let importer = FaqImport::new(store);
    match importer.import(&valid_row()).await {
        Err(ImportError::Metadata { faq_id, .. }) => assert_eq!(faq_id, 99),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_import_all_skips_invalid_files() {
    let mut store = MockFaqStore::new();
    store.expect_create_faq().times(0);

    let importer = FaqImport::new(store);
    let rows = vec![valid_row(), row(&["1", "Q?"])];
    assert!(importer.import_all(&rows).await.is_none());
}

#[tokio::test]
async fn test_import_all_from_file() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "1,Q1?,A1,kw,en,Jan,jan@example.com,true,false").unwrap();
    writeln!(file, "2,\"Q2, really?\",A2,,de,Eva,eva@example.com,false,true").unwrap();
    writeln!(file, "3,Q#3?,A3,kw,en,Jan,jan@example.com,true,true").unwrap();
    file.flush().unwrap();

    let rows = parse_csv(std::fs::File::open(file.path()).unwrap()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][1], "Q2, really?");

    let mut store = MockFaqStore::new();
    let mut next_id = 0;
    store.expect_create_faq().times(2).returning(move |_| {
        next_id += 1;
        Ok(next_id)
    });
    store.expect_save_metadata().times(2).returning(|_| Ok(()));

    let summary = FaqImport::new(store).import_all(&rows).await.unwrap();
    assert_eq!(summary.imported, vec![1, 2]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, 3);
    assert!(!summary.is_clean());
}
