//! Export: standalone poster document and clipboard text.

use crate::config::EditorConfig;
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// A file ready to be downloaded or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Wrap canvas markup in a standalone HTML document with a fixed-size container.
pub fn poster_document(markup: &str, size: u32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Poster</title>
  <style>
    body {{
      margin: 0;
      padding: 0;
      display: flex;
      align-items: center;
      justify-content: center;
      min-height: 100vh;
      background-color: #f5f5f5;
    }}
    .poster-container {{
      width: {size}px;
      height: {size}px;
      background-color: white;
      position: relative;
      box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);
    }}
  </style>
</head>
<body>
  <div class="poster-container">
    {markup}
  </div>
</body>
</html>"#
    )
}

/// Build the downloadable poster file.
pub fn export_file(markup: &str, config: &EditorConfig) -> ExportedFile {
    ExportedFile {
        file_name: config.export_file_name.clone(),
        mime_type: "text/html",
        contents: poster_document(markup, config.canvas_size),
    }
}

/// Text placed on the clipboard: the markup itself, unwrapped.
pub fn clipboard_text(markup: &str) -> String {
    markup.to_string()
}

/// Transient "copied" confirmation.
#[derive(Debug, Clone, Copy)]
pub struct CopyConfirmation {
    shown_at: Option<Instant>,
    duration: Duration,
}

impl CopyConfirmation {
    pub fn new(duration: Duration) -> Self {
        Self {
            shown_at: None,
            duration,
        }
    }

    /// Start showing the confirmation.
    pub fn show(&mut self, now: Instant) {
        self.shown_at = Some(now);
    }

    /// Whether the confirmation is visible at `now`.
    pub fn is_visible(&self, now: Instant) -> bool {
        self.shown_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.duration)
    }

    pub fn reset(&mut self) {
        self.shown_at = None;
    }
}

impl Default for CopyConfirmation {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_embeds_markup_verbatim() {
        let markup = r#"<div style="left: 30px;">Hi &amp; bye</div>"#;
        let file = export_file(markup, &EditorConfig::default());
        assert_eq!(file.file_name, "poster.html");
        assert_eq!(file.mime_type, "text/html");
        assert!(file.contents.starts_with("<!DOCTYPE html>"));
        assert!(file.contents.contains("width: 720px;"));
        assert!(file.contents.contains("height: 720px;"));
        assert_eq!(file.contents.matches(markup).count(), 1);
        assert!(file.contents.contains(&format!("<div class=\"poster-container\">\n    {markup}\n  </div>")));
    }

    #[test]
    fn test_clipboard_is_unwrapped() {
        let markup = "<p>x</p>";
        assert_eq!(clipboard_text(markup), markup);
    }

    #[test]
    fn test_copy_confirmation_expires() {
        let start = Instant::now();
        let mut confirmation = CopyConfirmation::default();
        assert!(!confirmation.is_visible(start));

        confirmation.show(start);
        assert!(confirmation.is_visible(start));
        assert!(confirmation.is_visible(start + Duration::from_millis(1999)));
        assert!(!confirmation.is_visible(start + Duration::from_secs(2)));

        confirmation.reset();
        assert!(!confirmation.is_visible(start));
    }
}
