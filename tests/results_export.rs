//! Results export in JSON, CSV and plain text.

use std::time::Duration;

use chrono::Utc;

use asin_extractor::analysis::build_report;
use asin_extractor::error_handling::{ExtractionFailure, FailureReason};
use asin_extractor::export::{export_file_name, export_results, ExportFormat};
use asin_extractor::extractor::{ExtractionResult, ProductImages};
use asin_extractor::store::ExtractorResults;

fn product(asin: &str, count: usize, token: &str) -> ProductImages {
    let images: Vec<String> = (0..count)
        .map(|i| format!("https://m.media-amazon.com/images/I/71product{i:02}image.{token}jpg"))
        .collect();
    ProductImages {
        asin: asin.to_string(),
        title: "Widget".to_string(),
        thumbnail: images[0].clone(),
        image_count: images.len(),
        images,
        page_url: format!("https://www.amazon.com/dp/{asin}"),
        extracted_at: Utc::now(),
    }
}

fn stored_results() -> ExtractorResults {
    let first = product("B0AAAAAAAA", 8, "_AC_SL1500_.");
    let second = product("B0BBBBBBBB", 3, "");
    let results = vec![
        ExtractionResult::Success(first.clone()),
        ExtractionResult::Success(second.clone()),
        ExtractionResult::failed(
            "B0CCCCCCCC",
            ExtractionFailure::new(FailureReason::TimedOut, "Page load timeout (20s)"),
        ),
    ];
    let asins = ["B0AAAAAAAA", "B0BBBBBBBB", "B0CCCCCCCC"];
    ExtractorResults {
        images: vec![first, second],
        report: Some(build_report(&results, &asins, Duration::from_millis(500))),
        timestamp: Some(Utc::now()),
    }
}

fn export_to_string(results: &ExtractorResults, format: ExportFormat) -> String {
    let mut buffer = Vec::new();
    export_results(results, format, &mut buffer).expect("export should succeed");
    String::from_utf8(buffer).expect("export should be UTF-8")
}

#[test]
fn test_export_csv_one_row_per_product() {
    let csv_content = export_to_string(&stored_results(), ExportFormat::Csv);
    let lines: Vec<&str> = csv_content.lines().collect();

    assert_eq!(
        lines,
        vec![
            "ASIN,Total Images,Main Images,Variant Images,Lifestyle Images,Quality Score,Variant Coverage,Lifestyle Score",
            "B0AAAAAAAA,8,1,0,0,72,0.0,0",
            "B0BBBBBBBB,3,1,0,0,55,0.0,0",
            "B0CCCCCCCC,0,0,0,0,0,0.0,0",
        ]
    );
}

#[test]
fn test_export_text_summary() {
    let results = stored_results();
    let text = export_to_string(&results, ExportFormat::Txt);
    let extraction_id = &results.report.as_ref().unwrap().extraction_id;

    assert!(text.starts_with("AMZ Extractor ALL - Extraction Report\n"));
    assert!(text.contains(&format!("Extraction ID: {extraction_id}\n")));
    assert!(text.contains("Total Products: 3\n"));
    assert!(text.contains("Total Images: 11\n"));
    assert!(text.contains("Average Images per Product: 3.7\n"));
    assert!(text.contains(
        "1. ASIN: B0AAAAAAAA\n   Total Images: 8\n   Quality Score: 72%\n   Main: 1, Variants: 0, Lifestyle: 0\n"
    ));
    assert!(text.contains("3. ASIN: B0CCCCCCCC\n"));
}

#[test]
fn test_export_json_keeps_stored_results() {
    let results = stored_results();
    let json = export_to_string(&results, ExportFormat::Json);

    let parsed: ExtractorResults = serde_json::from_str(&json).expect("export should be JSON");
    assert_eq!(parsed, results);
}

#[test]
fn test_flattened_formats_need_a_report() {
    let empty = ExtractorResults::default();

    for format in [ExportFormat::Csv, ExportFormat::Txt] {
        let mut buffer = Vec::new();
        let err = export_results(&empty, format, &mut buffer).unwrap_err();
        assert!(err.to_string().contains("No extraction report stored"), "{err}");
        assert!(buffer.is_empty());
    }

    let json = export_to_string(&empty, ExportFormat::Json);
    assert_eq!(serde_json::from_str::<serde_json::Value>(&json).unwrap()["images"], serde_json::json!([]));
}

#[test]
fn test_export_file_name_uses_extraction_id() {
    let results = stored_results();
    let extraction_id = results.report.as_ref().unwrap().extraction_id.clone();

    assert_eq!(
        export_file_name(&results, ExportFormat::Csv),
        format!("amz-extraction-{extraction_id}.csv")
    );
    assert!(export_file_name(&ExtractorResults::default(), ExportFormat::Txt).ends_with(".txt"));
}
