//! End-to-end decoding of report files into blocks.

mod fixtures;

use std::io::Write;
use std::sync::Arc;

use flatreport::logging::ReportLogger;
use flatreport::reader::{BlockReader, SchemaSource};
use flatreport::record::{Block, BlockKind, CellData};
use flatreport::report::{JsonLinesSink, ReportFailure, ReportManager};
use flatreport::schema::SchemaCompiler;

use fixtures::{Fixture, REPORT_TSV};

// =============================================================================
// Helper Functions
// =============================================================================

fn compiled_source(fixture: &Fixture, logger: &ReportLogger) -> SchemaSource {
    let schema = SchemaCompiler::new(&fixture.schema_path, Some(fixture.enums_path.clone()))
        .compile(logger)
        .unwrap();
    SchemaSource::Compiled(Arc::new(schema))
}

fn decode(fixture: &Fixture, name: &str, content: &str, logger: &ReportLogger) -> Vec<Block> {
    let path = fixture.write_report(name, content);
    let source = compiled_source(fixture, logger);
    BlockReader::new(path, source)
        .blocks(1, logger)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

// =============================================================================
// Decoding
// =============================================================================

#[test]
fn test_report_decodes_into_head_body_and_foot_blocks() {
    let fixture = Fixture::new();
    let logger = ReportLogger::sink();
    let blocks = decode(&fixture, "report.tsv", REPORT_TSV, &logger);
    let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, [BlockKind::Head, BlockKind::Body, BlockKind::Body, BlockKind::Foot]);
    assert_eq!(blocks[1].number, Some(1));
    assert_eq!(blocks[2].number, Some(2));
    assert_eq!(logger.error_count(), 0);
}

#[test]
fn test_header_block_carries_version_and_file_name() {
    let fixture = Fixture::new();
    let logger = ReportLogger::sink();
    let blocks = decode(&fixture, "report.tsv", REPORT_TSV, &logger);
    assert_eq!(blocks[0].version.as_deref(), Some("1.2"));
    assert_eq!(blocks[0].file_name.as_deref(), Some("report.tsv"));
    assert_eq!(blocks[0].rows.len(), 2);
}

#[test]
fn test_cells_are_typed_and_repeated_values_split() {
    let fixture = Fixture::new();
    let logger = ReportLogger::sink();
    let blocks = decode(&fixture, "report.tsv", REPORT_TSV, &logger);
    let release = &blocks[1].rows[0];
    assert_eq!(release.row_type, "AS01");
    assert_eq!(release.cell("BlockId").unwrap().data, CellData::Integers(vec![1]));
    assert_eq!(
        release.cell("Title").unwrap().data,
        CellData::Strings(vec!["First Song".to_string()])
    );
    assert_eq!(
        release.cell("UseTypes").unwrap().data,
        CellData::Strings(vec!["DOWNLOAD".to_string(), "STREAM".to_string()])
    );
    assert_eq!(release.cell("Price").unwrap().data, CellData::Decimals(vec![9.99]));
    assert_eq!(release.cell("Active").unwrap().data, CellData::Booleans(vec![true]));
}

#[test]
fn test_invalid_cells_are_omitted_and_the_stream_continues() {
    let fixture = Fixture::new();
    let logger = ReportLogger::sink();
    let broken = REPORT_TSV.replace("\t9.99\t", "\tcheap\t");
    let blocks = decode(&fixture, "report.tsv", &broken, &logger);
    let release = &blocks[1].rows[0];
    assert!(release.cell("Price").is_none());
    assert!(release.cell("Active").is_some());
    assert_eq!(logger.error_count(), 1);
}

/// The HEAD record triggers schema resolution when only the documents are
/// supplied up front.
#[test]
fn test_schema_resolves_from_the_head_record() {
    let fixture = Fixture::new();
    let logger = ReportLogger::sink();
    let path = fixture.write_report("report.tsv", REPORT_TSV);
    let source = SchemaSource::Documents {
        schema_path: fixture.schema_path.clone(),
        enums_path: Some(fixture.enums_path.clone()),
    };
    let blocks: Vec<Block> = BlockReader::new(path, source)
        .blocks(1, &logger)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(blocks.len(), 4);
    assert_eq!(logger.error_count(), 0);
}

#[test]
fn test_gzip_input_decodes_like_plain_text() {
    let fixture = Fixture::new();
    let logger = ReportLogger::sink();
    let mut plain = decode(&fixture, "report.tsv", REPORT_TSV, &logger);

    let gz_path = fixture.dir.path().join("report.tsv.gz");
    let mut encoder = flate2::write::GzEncoder::new(
        std::fs::File::create(&gz_path).unwrap(),
        flate2::Compression::default(),
    );
    encoder.write_all(REPORT_TSV.as_bytes()).unwrap();
    encoder.finish().unwrap();
    let source = compiled_source(&fixture, &logger);
    let mut zipped: Vec<Block> = BlockReader::new(gz_path, source)
        .blocks(1, &logger)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    for block in plain.iter_mut().chain(zipped.iter_mut()) {
        block.file_name = None;
    }
    assert_eq!(plain, zipped);
}

// =============================================================================
// Report manager
// =============================================================================

#[test]
fn test_report_blocks_reach_the_sink_as_json_lines() {
    let fixture = Fixture::new();
    let logger = ReportLogger::sink();
    let path = fixture.write_report("report.tsv", REPORT_TSV);
    let mut sink = JsonLinesSink::new(Vec::new());
    ReportManager::new(&logger)
        .parse_report(
            &[path],
            &fixture.schema_path,
            Some(&fixture.enums_path),
            &mut sink,
            true,
        )
        .unwrap();
    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    // Header and two body blocks; the footer is not forwarded.
    assert_eq!(lines.len(), 3);
    let head: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(head["kind"], "HEAD");
    let body: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(body["kind"], "BODY");
    assert_eq!(body["number"], 1);
}

#[test]
fn test_duplicate_block_numbers_across_files_are_fatal() {
    let fixture = Fixture::new();
    let logger = ReportLogger::sink();
    let first = fixture.write_report(
        "report_1of2.tsv",
        "HEAD\t1.2\tBasicAudioProfile\t1.1\nAS01\t7\tSong\nFOOT\n",
    );
    let second = fixture.write_report(
        "report_2of2.tsv",
        "HEAD\t1.2\tBasicAudioProfile\t1.1\nAS01\t7\tOther\nFOOT\n",
    );
    let mut sink = JsonLinesSink::new(Vec::new());
    let err = ReportManager::new(&logger)
        .parse_report(
            &[first, second],
            &fixture.schema_path,
            Some(&fixture.enums_path),
            &mut sink,
            true,
        )
        .unwrap_err();
    match err {
        ReportFailure::DuplicateBlockNumber { number, first_file, second_file } => {
            assert_eq!(number, 7);
            assert_eq!((first_file, second_file), (1, 2));
        }
        other => panic!("expected a duplicate block number, got {}", other),
    }
}

#[test]
fn test_duplicate_block_numbers_within_one_file_are_fatal() {
    let fixture = Fixture::new();
    let logger = ReportLogger::sink();
    let path = fixture.write_report(
        "report.tsv",
        "HEAD\t1.2\tBasicAudioProfile\t1.1\n\
         AS01\t1\tSong\n\
         AS01\t2\tOther\n\
         AS01\t1\tAgain\n\
         FOOT\n",
    );
    let mut sink = JsonLinesSink::new(Vec::new());
    let err = ReportManager::new(&logger)
        .parse_report(
            &[path],
            &fixture.schema_path,
            Some(&fixture.enums_path),
            &mut sink,
            true,
        )
        .unwrap_err();
    assert!(matches!(err, ReportFailure::DuplicateBlockNumber { number: 1, .. }));
}

/// Row-level errors do not stop the stream, but the run as a whole fails
/// once it completes.
#[test]
fn test_logged_errors_surface_as_a_summary_failure() {
    let fixture = Fixture::new();
    let logger = ReportLogger::sink();
    let broken = REPORT_TSV.replace("\ttrue\n", "\tmaybe\n");
    let path = fixture.write_report("report.tsv", &broken);
    let mut sink = JsonLinesSink::new(Vec::new());
    let err = ReportManager::new(&logger)
        .parse_report(
            &[path],
            &fixture.schema_path,
            Some(&fixture.enums_path),
            &mut sink,
            true,
        )
        .unwrap_err();
    assert!(matches!(err, ReportFailure::Diagnostics(_)));
    // The blocks were still decoded and forwarded.
    let output = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(output.lines().count(), 3);
}
