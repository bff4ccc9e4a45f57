use async_trait::async_trait;

/// Distributable form of a rendered certificate.
#[derive(Debug, Clone)]
pub(crate) struct ExportedDocument {
    pub(crate) filename: String,
    pub(crate) content_type: &'static str,
    pub(crate) bytes: Vec<u8>,
}

/// Boundary to the downstream document pipeline. The engine only supplies the
/// certificate text; pagination, letterheads, and distribution live behind
/// this trait.
#[async_trait]
pub(crate) trait DocumentExporter: Send + Sync {
    async fn export(&self, request_id: &str, body: &str) -> anyhow::Result<ExportedDocument>;
}

/// In-tree exporter: the rendered text verbatim, as a UTF-8 attachment.
pub(crate) struct PlainTextExporter;

#[async_trait]
impl DocumentExporter for PlainTextExporter {
    async fn export(&self, request_id: &str, body: &str) -> anyhow::Result<ExportedDocument> {
        Ok(ExportedDocument {
            filename: format!("bonafide-{request_id}.txt"),
            content_type: "text/plain; charset=utf-8",
            bytes: body.as_bytes().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plain_text_exporter_passes_the_body_through() {
        let exported =
            PlainTextExporter.export("req-9", "certificate body").await.expect("export");

        assert_eq!(exported.filename, "bonafide-req-9.txt");
        assert_eq!(exported.content_type, "text/plain; charset=utf-8");
        assert_eq!(exported.bytes, b"certificate body");
    }
}
