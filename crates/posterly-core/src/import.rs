//! Import: turn a file or pasted text into markup for the canvas.

use thiserror::Error;

/// Import errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("Nothing to import")]
    Empty,
    #[error("Failed to read {file}: {reason}")]
    Read { file: String, reason: String },
}

/// Where imported markup comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
    /// Decoded text of an uploaded file.
    File { name: String, contents: String },
    /// Text pasted into the import box.
    Pasted(String),
}

/// File extensions offered by the file picker.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".html", ".htm"];

impl ImportSource {
    /// Yield the raw markup to load.
    ///
    /// Pasted text that is blank is rejected; file contents are taken as-is.
    pub fn into_markup(self) -> Result<String, ImportError> {
        match self {
            Self::File { name, contents } => {
                log::info!("Importing {} ({} bytes)", name, contents.len());
                Ok(contents)
            }
            Self::Pasted(text) => {
                if text.trim().is_empty() {
                    log::warn!("Ignoring empty paste");
                    return Err(ImportError::Empty);
                }
                log::info!("Importing pasted markup ({} bytes)", text.len());
                Ok(text)
            }
        }
    }
}

/// The `accept` attribute value for a file input.
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paste() {
        let source = ImportSource::Pasted("<p>x</p>".into());
        assert_eq!(source.into_markup().unwrap(), "<p>x</p>");
    }

    #[test]
    fn test_blank_paste_rejected() {
        assert_eq!(ImportSource::Pasted("  \n\t".into()).into_markup(), Err(ImportError::Empty));
    }

    #[test]
    fn test_file_taken_as_is() {
        let source = ImportSource::File {
            name: "poster.html".into(),
            contents: String::new(),
        };
        assert_eq!(source.into_markup().unwrap(), "");
    }

    #[test]
    fn test_accept_attribute() {
        assert_eq!(accept_attribute(), ".html,.htm");
    }
}
