use anyhow::Result;
use csv_streamy::io::{StopSignal, split_reader};
use csv_streamy::testing::{CsvTextBuilder, MemorySinks, positional_row};
use csv_streamy::{
    CsvOptions, CsvStreamError, EngineStatus, OutputSummary, SplitConfig, SplitPolicy, Splitter,
    SinkProvider, Stats,
};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

fn split_text(text: &str, config: &SplitConfig) -> csv_streamy::error::Result<MemorySinks> {
    split_reader(text.as_bytes(), config, MemorySinks::new(), &StopSignal::new())
        .map(|(_, sinks)| sinks)
}

#[test]
fn rows_mode_fills_each_output_before_rotating() -> Result<()> {
    let text = CsvTextBuilder::new().generated_rows(5, 2).build();
    let sinks = split_text(&text, &SplitConfig::rows(2))?;
    assert_eq!(
        sinks.texts(),
        [
            "r1c1,r1c2\nr2c1,r2c2\n",
            "r3c1,r3c2\nr4c1,r4c2\n",
            "r5c1,r5c2\n"
        ]
    );
    Ok(())
}

#[test]
fn every_output_gets_its_own_header_line() -> Result<()> {
    let config = SplitConfig::rows(2).with_csv(CsvOptions::new().with_headers(true));
    let sinks = split_text("h\n1\n2\n3\n4\n5\n", &config)?;
    assert_eq!(sinks.texts(), ["h\n1\n2\n", "h\n3\n4\n", "h\n5\n"]);
    Ok(())
}

#[test]
fn quoted_outputs_are_requoted() -> Result<()> {
    let options = CsvOptions::new().with_headers(true).with_double_quotes(true);
    let text = "\"k\",\"v\"\n\"a\",\"1,2\"\n\"b\",\"x\ny\"\n";
    let sinks = split_text(text, &SplitConfig::rows(1).with_csv(options))?;
    assert_eq!(
        sinks.texts(),
        [
            "\"k\",\"v\"\n\"a\",\"1,2\"\n",
            "\"k\",\"v\"\n\"b\",\"x\ny\"\n"
        ]
    );
    Ok(())
}

#[test]
fn report_lists_each_output() -> Result<()> {
    let config = SplitConfig::rows(2).with_csv(CsvOptions::new().with_headers(true));
    let (report, _) = split_reader(
        "h\n1\n2\n3\n".as_bytes(),
        &config,
        MemorySinks::new(),
        &StopSignal::new(),
    )?;
    assert_eq!(
        report.files,
        [
            OutputSummary {
                sequence: 1,
                rows: 2,
                bytes: 6
            },
            OutputSummary {
                sequence: 2,
                rows: 1,
                bytes: 4
            },
        ]
    );
    assert_eq!(report.total, Stats::new(3, 3));
    Ok(())
}

#[test]
fn bytes_mode_rotates_before_exceeding_threshold() -> Result<()> {
    let text = "aaaa\nbbbb\ncccc\ndddd\neeee\n";
    let sinks = split_text(text, &SplitConfig::bytes("10"))?;
    assert_eq!(sinks.texts(), ["aaaa\nbbbb\n", "cccc\ndddd\neeee\n"]);
    Ok(())
}

#[test]
fn bytes_mode_threshold_is_inclusive() -> Result<()> {
    let sinks = split_text("aaaa\nbbbb\ncc\n", &SplitConfig::bytes("10"))?;
    assert_eq!(sinks.texts(), ["aaaa\nbbbb\ncc\n"]);
    Ok(())
}

#[test]
fn first_row_over_threshold_fails_before_any_output() {
    let mut splitter = Splitter::new(SplitPolicy::Bytes(3), CsvOptions::default(), MemorySinks::new());
    let err = splitter
        .accept(&positional_row(["abcd"]), Stats::new(1, 4))
        .unwrap_err();
    assert!(matches!(
        err,
        CsvStreamError::SizePolicyViolation {
            threshold: 3,
            row_bytes: 4
        }
    ));
    assert_eq!(splitter.status(), EngineStatus::Failed);
    assert_eq!(splitter.provider().opened(), 0);
    assert!(splitter.provider().is_empty());
}

#[test]
fn rotating_row_starts_the_new_output_at_zero() -> Result<()> {
    let sinks = split_text("aaaa\nccc\nccc\n", &SplitConfig::bytes("5"))?;
    assert_eq!(sinks.texts(), ["aaaa\n", "ccc\nccc\n"]);
    Ok(())
}

#[test]
fn bytes_mode_report_counts_rows_per_output() -> Result<()> {
    let (report, _) = split_reader(
        "ab\ncd\nef\ngh\n".as_bytes(),
        &SplitConfig::bytes("4"),
        MemorySinks::new(),
        &StopSignal::new(),
    )?;
    let rows: Vec<u64> = report.files.iter().map(|f| f.rows).collect();
    assert_eq!(rows, [2, 2]);
    Ok(())
}

#[test]
fn later_oversized_row_opens_a_new_output() -> Result<()> {
    let sinks = split_text("ab\ncdefgh\nij\n", &SplitConfig::bytes("4"))?;
    assert_eq!(sinks.texts(), ["ab\n", "cdefgh\nij\n"]);
    Ok(())
}

/// Records which outputs were flushed, relying on the provided `close`.
#[derive(Default)]
struct FlushLog(Rc<RefCell<Vec<u64>>>);

struct LoggedSink {
    sequence: u64,
    log: Rc<RefCell<Vec<u64>>>,
}

impl Write for LoggedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.log.borrow_mut().push(self.sequence);
        Ok(())
    }
}

impl SinkProvider for FlushLog {
    type Sink = LoggedSink;

    fn open(&mut self, sequence: u64) -> io::Result<Self::Sink> {
        Ok(LoggedSink {
            sequence,
            log: Rc::clone(&self.0),
        })
    }
}

#[test]
fn default_close_flushes_every_output() -> Result<()> {
    let provider = FlushLog::default();
    let log = Rc::clone(&provider.0);
    let mut splitter = Splitter::new(SplitPolicy::Rows(1), CsvOptions::default(), provider);
    splitter.accept(&positional_row(["a"]), Stats::new(1, 1))?;
    splitter.accept(&positional_row(["b"]), Stats::new(2, 2))?;
    let report = splitter.finish()?;

    assert_eq!(report.files.len(), 2);
    assert_eq!(*log.borrow(), [1, 2]);
    Ok(())
}

#[test]
fn no_data_rows_open_no_outputs() -> Result<()> {
    let config = SplitConfig::rows(2).with_csv(CsvOptions::new().with_headers(true));
    let (report, sinks) = split_reader(
        "h1,h2\n".as_bytes(),
        &config,
        MemorySinks::new(),
        &StopSignal::new(),
    )?;
    assert!(report.files.is_empty());
    assert_eq!(report.total, Stats::default());
    assert_eq!(sinks.opened(), 0);
    Ok(())
}

#[test]
fn sink_failure_closes_previous_output_and_halts() {
    let mut splitter = Splitter::new(
        SplitPolicy::Rows(1),
        CsvOptions::default(),
        MemorySinks::new().failing_on(2),
    );
    assert!(splitter.accept(&positional_row(["a"]), Stats::new(1, 1)).is_ok());
    let err = splitter
        .accept(&positional_row(["b"]), Stats::new(2, 2))
        .unwrap_err();
    assert!(matches!(err, CsvStreamError::Io(_)));
    assert_eq!(splitter.status(), EngineStatus::Failed);
    assert_eq!(splitter.current_sequence(), None);
    assert_eq!(splitter.provider().text(1).as_deref(), Some("a\n"));

    assert!(matches!(
        splitter.accept(&positional_row(["c"]), Stats::new(3, 3)),
        Err(CsvStreamError::EngineHalted(EngineStatus::Failed))
    ));
}

#[test]
fn abort_keeps_partial_output() -> Result<()> {
    let mut splitter = Splitter::new(SplitPolicy::Rows(10), CsvOptions::default(), MemorySinks::new());
    splitter.accept(&positional_row(["a", "b"]), Stats::new(1, 3))?;
    assert_eq!(splitter.current_sequence(), Some(1));
    splitter.abort();

    assert!(matches!(
        splitter.finish(),
        Err(CsvStreamError::EngineHalted(EngineStatus::Failed))
    ));
    let sinks = splitter.into_provider();
    assert_eq!(sinks.text(1).as_deref(), Some("a,b\n"));
    Ok(())
}

#[test]
fn parse_errors_abort_the_split() {
    let config = SplitConfig::rows(1).with_csv(CsvOptions::new().with_headers(true));
    let err = split_text("h1,h2\nx,y\nx,y,z\n", &config).unwrap_err();
    assert!(matches!(err, CsvStreamError::InvalidNumberOfFields { .. }));
}

#[test]
fn policy_requires_exactly_one_limit() {
    let both = SplitConfig {
        rows_per_file: Some(1),
        bytes_per_file: Some("1K".to_string()),
        ..SplitConfig::default()
    };
    let err = SplitPolicy::from_config(&both).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Configuration error: Only one --rows or --bytes can be specified."
    );

    let err = SplitPolicy::from_config(&SplitConfig::default()).unwrap_err();
    assert!(matches!(err, CsvStreamError::Config(m) if m == "--rows or --bytes option is required."));
}

#[test]
fn policy_rejects_zero_and_malformed_limits() -> Result<()> {
    assert!(matches!(
        SplitPolicy::from_config(&SplitConfig::rows(0)),
        Err(CsvStreamError::Config(_))
    ));
    assert!(matches!(
        SplitPolicy::from_config(&SplitConfig::bytes("0")),
        Err(CsvStreamError::Config(_))
    ));
    assert!(matches!(
        SplitPolicy::from_config(&SplitConfig::bytes("ten")),
        Err(CsvStreamError::NotANumber(_))
    ));
    assert_eq!(
        SplitPolicy::from_config(&SplitConfig::bytes("1.5K"))?,
        SplitPolicy::Bytes(2048)
    );
    assert_eq!(
        SplitPolicy::from_config(&SplitConfig::bytes("99Z"))?,
        SplitPolicy::Bytes(u64::MAX)
    );
    Ok(())
}
