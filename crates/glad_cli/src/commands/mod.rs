//! CLI command implementations.

pub mod dump;
pub mod verify;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Opens a stream input. `-` is stdin.
pub fn open_input(path: &Path) -> io::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}
