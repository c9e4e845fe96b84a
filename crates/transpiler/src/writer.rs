//! # Code Writer
//!
//! Buffered textual output with nested indentation. The destination is
//! acquired once at construction and released when the writer drops; an
//! unopenable destination degrades to a null sink that safely absorbs
//! writes, so a single bad path never takes down a batch.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Emitted script files carry this extension.
pub const SCRIPT_EXTENSION: &str = "us";

enum WriteTarget {
    File(BufWriter<File>),
    Buffer(String),
    /// Fallback when the destination could not be opened.
    Sink,
}

pub struct CodeWriter {
    target: WriteTarget,
    indent: usize,
}

impl CodeWriter {
    /// In-memory writer, used by tests and `transpile_to_string`.
    pub fn buffer() -> Self {
        Self { target: WriteTarget::Buffer(String::new()), indent: 0 }
    }

    /// Open `<content_root>/<folder>/<name>.us`, creating directories as
    /// needed. Failure is reported and the writer degrades to a sink.
    pub fn open(content_root: &Path, folder: &str, name: &str) -> Self {
        let dir = content_root.join(folder);
        let path = dir.join(format!("{name}.{SCRIPT_EXTENSION}"));

        let target = match fs::create_dir_all(&dir).and_then(|()| File::create(&path)) {
            Ok(file) => WriteTarget::File(BufWriter::new(file)),
            Err(err) => {
                tracing::warn!("[WRITER] Could not open {}: {err}", path.display());
                WriteTarget::Sink
            }
        };

        Self { target, indent: 0 }
    }

    pub fn is_sink(&self) -> bool {
        matches!(self.target, WriteTarget::Sink)
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn indentation(&self) -> String {
        " ".repeat(self.indent * 2)
    }

    /// Raw write, no indentation or newline.
    pub fn write_raw(&mut self, text: &str) {
        match &mut self.target {
            WriteTarget::File(file) => {
                if let Err(err) = file.write_all(text.as_bytes()) {
                    tracing::warn!("[WRITER] Write failed: {err}");
                }
            }
            WriteTarget::Buffer(buffer) => buffer.push_str(text),
            WriteTarget::Sink => {}
        }
    }

    /// One indented line.
    pub fn write_line(&mut self, text: &str) {
        let line = format!("{}{}\n", self.indentation(), text);
        self.write_raw(&line);
    }

    pub fn blank_line(&mut self) {
        self.write_raw("\n");
    }

    /// Triple-quoted docstring with embedded newlines re-aligned to the
    /// current indentation.
    pub fn format_docstring(&self, text: &str) -> String {
        let indented = text.replace('\n', &format!("\n{}", self.indentation()));
        format!("\"\"\"{indented}\"\"\"")
    }

    /// Flush a file-backed writer, reporting rather than panicking.
    pub fn finish(&mut self) {
        if let WriteTarget::File(file) = &mut self.target {
            if let Err(err) = file.flush() {
                tracing::warn!("[WRITER] Flush failed: {err}");
            }
        }
    }

    /// Consume a buffer-backed writer. File and sink writers yield an empty
    /// string.
    pub fn into_string(mut self) -> String {
        match std::mem::replace(&mut self.target, WriteTarget::Sink) {
            WriteTarget::Buffer(buffer) => buffer,
            _ => String::new(),
        }
    }
}

impl Drop for CodeWriter {
    fn drop(&mut self) {
        self.finish();
    }
}
