use std::str::FromStr;

use crate::errors::SimdbenchError;
use crate::types::BenchmarkRow;

/// Number of whitespace-separated values on the benchmark's result line.
pub const FIELD_COUNT: usize = 8;

/// Parse the last non-empty line of the benchmark's stdout into a row.
///
/// The line must hold exactly [`FIELD_COUNT`] tokens: four integer timings
/// followed by four floating-point gains. Values are not range-checked.
pub fn parse_last_line(raw_stdout: &str) -> Result<BenchmarkRow, SimdbenchError> {
    let line = raw_stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| malformed("", "benchmark printed no result line".to_string()))?;

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != FIELD_COUNT {
        return Err(malformed(
            line,
            format!("expected {} fields, found {}", FIELD_COUNT, tokens.len()),
        ));
    }

    Ok(BenchmarkRow {
        naive_time: field(line, &tokens, 0, "integer")?,
        vectorized_time: field(line, &tokens, 1, "integer")?,
        multithreaded_time: field(line, &tokens, 2, "integer")?,
        multithreaded_vectorized_time: field(line, &tokens, 3, "integer")?,
        vector_speedup: field(line, &tokens, 4, "number")?,
        vector_speedup_alt: field(line, &tokens, 5, "number")?,
        multithread_speedup: field(line, &tokens, 6, "number")?,
        multithread_vector_speedup: field(line, &tokens, 7, "number")?,
    })
}

fn field<T: FromStr>(
    line: &str,
    tokens: &[&str],
    index: usize,
    kind: &str,
) -> Result<T, SimdbenchError> {
    tokens[index].parse().map_err(|_| {
        malformed(
            line,
            format!("field {} ({:?}) is not a valid {}", index + 1, tokens[index], kind),
        )
    })
}

fn malformed(line: &str, detail: String) -> SimdbenchError {
    SimdbenchError::MalformedOutput {
        line: line.to_string(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_of(err: SimdbenchError) -> String {
        match err {
            SimdbenchError::MalformedOutput { detail, .. } => detail,
            other => panic!("expected MalformedOutput, got {other:?}"),
        }
    }

    #[test]
    fn parses_reference_line() {
        let row = parse_last_line("120 15 60 8 8.0 15.0 2.0 16.0\n").unwrap();
        assert_eq!(
            row,
            BenchmarkRow {
                naive_time: 120,
                vectorized_time: 15,
                multithreaded_time: 60,
                multithreaded_vectorized_time: 8,
                vector_speedup: 8.0,
                vector_speedup_alt: 15.0,
                multithread_speedup: 2.0,
                multithread_vector_speedup: 16.0,
            }
        );
    }

    #[test]
    fn only_last_line_is_used() {
        let out = "-- Ok let's see where 12 is in the array...\n\
                   Time elapsed: 42 microseconds\n\
                   T_NAIVE T_VECT T_MT_NAIVE T_MT_VECT PERF_VECT PERF_VECT_BIS PERF_MT PERF_MT_VECT\n\
                   1000 250 400 100 4.000000 4.100000 2.500000 10.000000\n";
        let row = parse_last_line(out).unwrap();
        assert_eq!(row.timings(), [1000, 250, 400, 100]);
        assert_eq!(row.gains(), [4.0, 4.1, 2.5, 10.0]);
    }

    #[test]
    fn trailing_blank_lines_skipped() {
        let row = parse_last_line("1 2 3 4 1.0 2.0 3.0 4.0\n\n   \n").unwrap();
        assert_eq!(row.naive_time, 1);
    }

    #[test]
    fn crlf_and_tabs_accepted() {
        let row = parse_last_line("1\t2\t3\t4\t0.5\t0.25\t1.5\t2.5\r\n").unwrap();
        assert_eq!(row.multithread_vector_speedup, 2.5);
    }

    #[test]
    fn six_tokens_is_malformed() {
        let err = parse_last_line("120 15 60 8 8.0 15.0\n").unwrap_err();
        assert!(detail_of(err).contains("expected 8 fields, found 6"));
    }

    #[test]
    fn extra_tokens_are_malformed() {
        let err = parse_last_line("1 2 3 4 1.0 2.0 3.0 4.0 5.0\n").unwrap_err();
        assert!(detail_of(err).contains("found 9"));
    }

    #[test]
    fn empty_output_is_malformed() {
        let err = parse_last_line("").unwrap_err();
        assert!(detail_of(err).contains("no result line"));
        assert!(parse_last_line("\n\n").is_err());
    }

    #[test]
    fn float_in_timing_slot_is_malformed() {
        let err = parse_last_line("1.5 2 3 4 1.0 2.0 3.0 4.0").unwrap_err();
        let detail = detail_of(err);
        assert!(detail.contains("field 1"), "{detail}");
        assert!(detail.contains("integer"), "{detail}");
    }

    #[test]
    fn garbage_ratio_is_malformed() {
        let err = parse_last_line("1 2 3 4 1.0 fast 3.0 4.0").unwrap_err();
        assert!(detail_of(err).contains("\"fast\""));
    }

    #[test]
    fn values_are_not_range_checked() {
        let row = parse_last_line("-5 0 0 0 NaN inf 0.0 -1.0").unwrap();
        assert_eq!(row.naive_time, -5);
        assert!(row.vector_speedup.is_nan());
        assert!(row.vector_speedup_alt.is_infinite());
    }

    #[test]
    fn error_message_includes_line() {
        let err = parse_last_line("oops").unwrap_err();
        assert!(err.to_string().contains("\"oops\""));
    }
}
