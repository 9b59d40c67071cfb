//! File I/O: loading libraries for IMPORT and source files for the batch
//! runner. Adapted from the interpreter's own open/read-fully/close/discard
//! handle, but trimmed to the read-only cases this crate actually needs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InterpError, Result};
use crate::messages::Msg;

pub const LIB_DIR: &str = "./lib";
pub const LIB_EXTENSION: &str = "sxlib";

/// Resolve and fully read `./lib/<name>.sxlib` for IMPORT.
pub fn read_library(name: &str, msg: &Msg) -> Result<String> {
    if name.is_empty() {
        return Err(InterpError::Io {
            reason: "IMPORT needs a library name".to_string(),
        });
    }
    let path: PathBuf = Path::new(LIB_DIR).join(format!("{name}.{LIB_EXTENSION}"));
    read_file(&path, msg)
}

/// Fully read a source file for the batch runner (a `.sx` script or a `.c`
/// translation unit, picked by the caller based on extension).
pub fn read_source(path: &Path, msg: &Msg) -> Result<String> {
    read_file(path, msg)
}

fn read_file(path: &Path, msg: &Msg) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        msg.error("files::read_file", "unable to open file", Some(path.display().to_string()));
        InterpError::Io {
            reason: format!("{}: {e}", path.display()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_source_returns_contents() {
        let mut tmp = std::env::temp_dir();
        tmp.push("ccforth_files_test.sx");
        {
            let mut f = fs::File::create(&tmp).unwrap();
            writeln!(f, "1 2 +").unwrap();
        }
        let msg = Msg::new();
        let text = read_source(&tmp, &msg).unwrap();
        assert!(text.contains("1 2 +"));
        fs::remove_file(&tmp).ok();
    }

    #[test]
    fn missing_library_is_an_io_error() {
        let msg = Msg::new();
        assert!(read_library("does-not-exist", &msg).is_err());
    }
}
