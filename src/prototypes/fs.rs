/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * File Collaborator
 * ==========================================================================
 *
 * Text file helpers behind the file statements:
 *
 *   let NAME be read file PATH     -> read_text
 *   write CONTENT to file PATH     -> write_text  (create or truncate)
 *   append CONTENT to file PATH    -> append_text (create or extend)
 *
 * Each helper opens, uses and closes its file within the call. Failures
 * come back as runtime errors naming the path and the OS cause.
 *
 * All file paths are interpreted relative to the process working
 * directory unless absolute paths are provided.
 *
 * --------------------------------------------------------------------------
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the EzScript programming language project.
 *
 * EzScript is dual-licensed under the terms of:
 *   - The MIT License
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::fs::{self, OpenOptions};
use std::io::{self, Write};

use tracing::debug;

use crate::error::{ErrorKind, EzError};

/// Reads a whole UTF-8 text file.
///
/// # Errors
/// - `FileNotFound` when nothing exists at `path`
/// - `Io` for every other failure (permissions, invalid UTF-8, ...)
pub fn read_text(path: &str) -> Result<String, EzError> {
    debug!(path, "read file");

    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            EzError::new(ErrorKind::FileNotFound, format!("File not found: '{}'", path))
        }
        _ => EzError::new(
            ErrorKind::Io,
            format!("Cannot read file '{}': {}", path, e),
        ),
    })
}

/// Replaces the file's content with `content`.
pub fn write_text(path: &str, content: &str) -> Result<(), EzError> {
    debug!(path, bytes = content.len(), "write file");

    fs::write(path, content).map_err(|e| {
        EzError::new(
            ErrorKind::Io,
            format!("Cannot write to file '{}': {}", path, e),
        )
    })
}

/// Appends `content`, creating the file when needed.
pub fn append_text(path: &str, content: &str) -> Result<(), EzError> {
    debug!(path, bytes = content.len(), "append file");

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| file.write_all(content.as_bytes()))
        .map_err(|e| {
            EzError::new(
                ErrorKind::Io,
                format!("Cannot append to file '{}': {}", path, e),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_append_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let path = path.to_str().unwrap();

        write_text(path, "one").unwrap();
        append_text(path, "two").unwrap();
        assert_eq!(read_text(path).unwrap(), "onetwo");

        write_text(path, "fresh").unwrap();
        assert_eq!(read_text(path).unwrap(), "fresh");
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let path = path.to_str().unwrap();

        let err = read_text(path).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FileNotFound);
        assert_eq!(err.message, format!("File not found: '{}'", path));
    }

    #[test]
    fn writing_into_a_missing_directory_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir.txt");
        let path = path.to_str().unwrap();

        let err = write_text(path, "x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.message.starts_with(&format!("Cannot write to file '{}'", path)));
    }
}
