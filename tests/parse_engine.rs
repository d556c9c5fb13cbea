use anyhow::Result;
use csv_streamy::testing::{Expected, assert_rows_equal, csv_fixtures, positional_row};
use csv_streamy::{
    CsvOptions, CsvStreamError, EngineStatus, ParseEngine, ParseEvent, Row, Stats, parse_str,
};

fn headers_quotes() -> CsvOptions {
    CsvOptions::new().with_headers(true).with_double_quotes(true)
}

#[test]
fn plain_rows_use_positional_keys() -> Result<()> {
    let (rows, total) = parse_str("a,b\nc,d\n", CsvOptions::default())?;
    assert_rows_equal(
        &rows,
        &[positional_row(["a", "b"]), positional_row(["c", "d"])],
    );
    assert_eq!(total, Stats::new(2, 6));
    Ok(())
}

#[test]
fn quoted_header_row_names_the_fields() -> Result<()> {
    let (rows, total) = parse_str("\"h1\",\"h2\"\n\"x\",\"y\"\n", headers_quotes())?;
    assert_rows_equal(&rows, &[Row::from([("h1", "x"), ("h2", "y")])]);
    assert_eq!(total.count, 1);
    Ok(())
}

#[test]
fn extra_field_is_rejected_with_counts() {
    let err = parse_str("h1,h2\nx,y,z\n", CsvOptions::new().with_headers(true)).unwrap_err();
    assert!(matches!(
        err,
        CsvStreamError::InvalidNumberOfFields {
            expected: 2,
            actual: 3
        }
    ));
    assert_eq!(err.to_string(), "The number of fields must be 2 but 3.");
}

#[test]
fn every_fixture_parses_as_expected() {
    for fixture in csv_fixtures() {
        let result = parse_str(fixture.text, fixture.options);
        match (fixture.expected, result) {
            (Expected::Rows(n), Ok((rows, total))) => {
                assert_eq!(rows.len(), n, "{}", fixture.name);
                assert_eq!(total.count, n as u64, "{}", fixture.name);
            }
            (Expected::FieldCountError, Err(CsvStreamError::InvalidNumberOfFields { .. })) => {}
            (Expected::FormatError, Err(CsvStreamError::InvalidCsvFormat(_))) => {}
            (expected, got) => panic!("{}: expected {expected:?}, got {got:?}", fixture.name),
        }
    }
}

#[test]
fn quoted_field_newline_is_kept_in_value() -> Result<()> {
    let text = "\"header[1]\",\"header[2]\"\n\"item\n[1][1]\",\"item[1][2]\"\n";
    let (rows, _) = parse_str(text, headers_quotes())?;
    assert_eq!(rows[0].get("header[1]"), Some("item\n[1][1]"));
    Ok(())
}

#[test]
fn embedded_comma_is_kept_in_value() -> Result<()> {
    let (rows, _) = parse_str("\"a,b\",\"c\"\n", CsvOptions::new().with_double_quotes(true))?;
    assert_rows_equal(&rows, &[positional_row(["a,b", "c"])]);
    Ok(())
}

#[test]
fn doubled_quote_escape_is_not_collapsed() -> Result<()> {
    let (rows, _) = parse_str("\"a\"\"b\",\"c\"\n", CsvOptions::new().with_double_quotes(true))?;
    assert_eq!(rows[0].get("1"), Some("a\"\"b"));
    Ok(())
}

#[test]
fn empty_and_blank_streams_yield_zero_total() -> Result<()> {
    for text in ["", "\n", "\n\n  \n"] {
        let mut engine = ParseEngine::new(CsvOptions::default());
        assert!(engine.feed(text.as_bytes())?.is_empty());
        let events = engine.finish()?;
        assert_eq!(events, vec![ParseEvent::Total(Stats::new(0, 0))]);
        assert_eq!(engine.status(), EngineStatus::Completed);
    }
    Ok(())
}

#[test]
fn header_only_stream_captures_headers_and_no_rows() -> Result<()> {
    let mut engine = ParseEngine::new(CsvOptions::new().with_headers(true));
    assert!(engine.feed(b"id,name")?.is_empty());
    assert!(engine.headers().is_empty());
    let events = engine.finish()?;
    assert_eq!(events, vec![ParseEvent::Total(Stats::default())]);
    assert_eq!(engine.headers(), ["id", "name"]);
    Ok(())
}

#[test]
fn headers_are_captured_once() -> Result<()> {
    let mut engine = ParseEngine::new(CsvOptions::new().with_headers(true));
    engine.feed(b"h1,h2\n")?;
    let events = engine.feed(b"h1,h2\nx,y\n")?;
    assert_eq!(engine.headers(), ["h1", "h2"]);
    assert_eq!(events.len(), 2);
    match &events[0] {
        ParseEvent::Row(parsed) => assert_eq!(parsed.row, Row::from([("h1", "h1"), ("h2", "h2")])),
        other => panic!("expected a row, got {other:?}"),
    }
    Ok(())
}

#[test]
fn row_stats_are_running_totals_without_header() -> Result<()> {
    let mut engine = ParseEngine::new(CsvOptions::new().with_headers(true));
    let events = engine.feed(b"k,v\nab,c\nd,efg\n")?;
    let stats: Vec<Stats> = events
        .iter()
        .map(|e| match e {
            ParseEvent::Row(parsed) => parsed.stats,
            ParseEvent::Total(total) => *total,
        })
        .collect();
    assert_eq!(stats, [Stats::new(1, 4), Stats::new(2, 9)]);
    assert_eq!(engine.finish()?, vec![ParseEvent::Total(Stats::new(2, 9))]);
    Ok(())
}

#[test]
fn final_line_without_newline_is_flushed_on_finish() -> Result<()> {
    let mut engine = ParseEngine::new(CsvOptions::default());
    let events = engine.feed(b"a,b\nc,d")?;
    assert_eq!(events.len(), 1);
    assert_eq!(engine.carried(), 3);

    let events = engine.finish()?;
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], ParseEvent::Row(p) if p.row == positional_row(["c", "d"])));
    assert!(matches!(events[1], ParseEvent::Total(Stats { count: 2, amount: 6 })));
    Ok(())
}

#[test]
fn engine_refuses_work_after_failure() {
    let mut engine = ParseEngine::new(CsvOptions::new().with_headers(true));
    assert!(engine.feed(b"h1,h2\nx\n").is_err());
    assert_eq!(engine.status(), EngineStatus::Failed);

    let err = engine.feed(b"x,y\n").unwrap_err();
    assert!(matches!(err, CsvStreamError::EngineHalted(EngineStatus::Failed)));
    assert!(matches!(
        engine.finish(),
        Err(CsvStreamError::EngineHalted(EngineStatus::Failed))
    ));
}

#[test]
fn engine_refuses_work_after_completion() -> Result<()> {
    let mut engine = ParseEngine::new(CsvOptions::default());
    engine.feed(b"a\n")?;
    engine.finish()?;
    assert!(matches!(
        engine.feed(b"b\n"),
        Err(CsvStreamError::EngineHalted(EngineStatus::Completed))
    ));
    Ok(())
}

#[test]
fn status_moves_from_idle_to_streaming() -> Result<()> {
    let mut engine = ParseEngine::new(CsvOptions::default());
    assert_eq!(engine.status(), EngineStatus::Idle);
    engine.feed(b"a,")?;
    assert_eq!(engine.status(), EngineStatus::Streaming);
    Ok(())
}

#[test]
fn invalid_utf8_reports_stream_offset() -> Result<()> {
    let mut engine = ParseEngine::new(CsvOptions::default());
    engine.feed(b"ab\ncd")?;
    let err = engine.feed(&[b'e', 0xff, b'\n']).unwrap_err();
    assert!(matches!(err, CsvStreamError::InvalidEncoding { offset: 6 }));
    Ok(())
}

#[test]
fn truncated_utf8_at_end_of_stream_is_an_error() -> Result<()> {
    let bytes = "a,é".as_bytes();
    let mut engine = ParseEngine::new(CsvOptions::default());
    engine.feed(&bytes[..bytes.len() - 1])?;
    assert!(matches!(
        engine.finish(),
        Err(CsvStreamError::InvalidEncoding { offset: 2 })
    ));
    Ok(())
}

#[test]
fn duplicate_header_names_are_rejected() {
    let err = parse_str("id,id\n1,2\n", CsvOptions::new().with_headers(true)).unwrap_err();
    assert!(matches!(err, CsvStreamError::DuplicateHeader(name) if name == "id"));
}
