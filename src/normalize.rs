//! HTML normalisation: wrap an uploaded fragment into a complete document.
//!
//! Uploads are fragments more often than full documents, and the conversion
//! engine needs a well-formed file on disk. The shell is fixed: a minimal
//! `<!doctype html>` document declaring UTF-8 and a placeholder title, with
//! the payload inserted verbatim as the body. No validation or sanitisation
//! happens here; tolerating malformed markup is the engine's job.

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Everything before the uploaded payload.
pub const SHELL_PROLOGUE: &str = "<!doctype html>\n<html lang=\"en\">\n<head>\n  \
                                  <meta charset=\"utf-8\">\n  <title>Document</title>\n\
                                  </head>\n<body>";

/// Everything after the uploaded payload.
pub const SHELL_EPILOGUE: &str = "</body>\n</html>\n";

/// Wrap a fragment into the fixed document shell.
///
/// The output always carries the shell and contains `fragment` verbatim,
/// for any input including the empty string.
pub fn wrap(fragment: &str) -> String {
    let mut doc = String::with_capacity(SHELL_PROLOGUE.len() + fragment.len() + SHELL_EPILOGUE.len());
    doc.push_str(SHELL_PROLOGUE);
    doc.push_str(fragment);
    doc.push_str(SHELL_EPILOGUE);
    doc
}

/// Streaming form of [`wrap`]: writes prologue, payload, and epilogue to
/// `out` without building a second copy of the payload in memory.
pub async fn write_wrapped<W>(out: &mut W, fragment: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(SHELL_PROLOGUE.as_bytes()).await?;
    out.write_all(fragment).await?;
    out.write_all(SHELL_EPILOGUE.as_bytes()).await?;
    out.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_output_contains_fragment_verbatim() {
        for fragment in ["<p>hello</p>", "", "plain text", "<täblé>ü</täblé>", "日本語 🦀"] {
            let doc = wrap(fragment);
            assert!(doc.contains(fragment), "missing payload for {fragment:?}");
            assert!(doc.starts_with("<!doctype html>"));
            assert!(doc.contains("<html lang=\"en\">"));
            assert!(doc.contains("charset=\"utf-8\""));
            assert!(doc.contains("<title>Document</title>"));
            assert!(doc.trim_end().ends_with("</html>"));
        }
    }

    #[test]
    fn empty_fragment_still_yields_the_full_shell() {
        let doc = wrap("");
        assert!(!doc.is_empty());
        assert!(doc.contains("<body></body>"));
    }

    #[test]
    fn malformed_markup_passes_through_unchanged() {
        let doc = wrap("<div><span>never closed");
        assert!(doc.contains("<div><span>never closed"));
    }

    #[tokio::test]
    async fn streaming_write_matches_the_pure_form() {
        let fragment = "<h1>Title</h1>\n<p>body</p>";
        let mut buf = std::io::Cursor::new(Vec::new());
        write_wrapped(&mut buf, fragment.as_bytes())
            .await
            .expect("write to a buffer cannot fail");
        assert_eq!(String::from_utf8(buf.into_inner()).unwrap(), wrap(fragment));
    }
}
