//! Verify command implementation.

use glad_stream::{Completeness, ReconstructorConfig, RecordReconstructor};
use std::io::Read;
use std::path::Path;

use super::open_input;

/// Verification result.
#[derive(Debug, Default)]
pub struct VerifyResult {
    /// Number of records decoded.
    pub records: u64,
    /// Records per completeness class (verified streams only).
    pub complete: u64,
    /// See `complete`.
    pub incomplete: u64,
    /// See `complete`.
    pub unknown: u64,
    /// Bytes skipped while searching for markers.
    pub skipped_bytes: u64,
    /// Bytes read from the input.
    pub bytes_read: u64,
    /// Announced total in verified streams.
    pub announced: Option<u64>,
    /// Frame faults found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(input: &Path, config: ReconstructorConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying stream {:?}", input);
    println!();

    let source = open_input(input)?;
    let result = verify_stream(source, config);
    print_result(&result);

    println!();
    if result.is_ok() {
        println!("✓ Stream verification passed");
        Ok(())
    } else {
        println!("✗ Stream verification failed");
        Err("Verification failed".into())
    }
}

/// Reads the whole stream and tallies what was found.
pub fn verify_stream<R: Read>(source: R, config: ReconstructorConfig) -> VerifyResult {
    let mut reader = RecordReconstructor::new(source, config);
    let mut result = VerifyResult::default();

    for item in reader.by_ref() {
        match item {
            Ok(delivered) => match delivered.completeness {
                Some(Completeness::Complete) => result.complete += 1,
                Some(Completeness::Incomplete) => result.incomplete += 1,
                Some(Completeness::Unknown) => result.unknown += 1,
                None => {}
            },
            Err(fault) => result.errors.push(fault.to_string()),
        }
    }

    let stats = reader.stats();
    result.records = stats.records;
    result.skipped_bytes = stats.skipped_bytes;
    result.bytes_read = stats.bytes_read;
    result.announced = reader.counts().map(|c| c.total());
    result
}

fn print_result(result: &VerifyResult) {
    println!(
        "  records: {}, faults: {}, skipped bytes: {}, bytes read: {}",
        result.records,
        result.errors.len(),
        result.skipped_bytes,
        result.bytes_read
    );
    if let Some(announced) = result.announced {
        println!(
            "  announced: {}, complete: {}, incomplete: {}, unknown: {}",
            announced, result.complete, result.incomplete, result.unknown
        );
    }
    for error in &result.errors {
        println!("    ERROR: {}", error);
    }
}
