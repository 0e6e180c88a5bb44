//! One push: read the table, encode it, deliver it, log the response.

use sheetcal_core::{Envelope, encode_table};
use tracing::{debug, info};

use crate::error::ProviderResult;
use crate::sink::LogSink;
use crate::source::DataSource;
use crate::transport::{Delivery, Transport};

/// What a push did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    /// Rows read from the source.
    pub rows: usize,
    /// Length of the CSV document in bytes.
    pub csv_bytes: usize,
    /// Delivery outcome.
    pub delivery: Delivery,
}

/// Reads the current table and encodes it into an envelope.
pub async fn prepare(source: &dyn DataSource) -> ProviderResult<(usize, Envelope)> {
    let table = source.fetch_table().await?;
    let csv = encode_table(&table);
    debug!(
        source = source.name(),
        rows = table.len(),
        bytes = csv.len(),
        "Encoded table"
    );
    Ok((table.len(), Envelope::new(csv)))
}

/// Pushes the source's table once.
///
/// Only a failure to read the table is an error. Whatever the delivery
/// outcome, its text is written to `sink` exactly once.
pub async fn push(
    source: &dyn DataSource,
    transport: &dyn Transport,
    sink: &dyn LogSink,
) -> ProviderResult<PushReport> {
    let (rows, envelope) = prepare(source).await?;
    let csv_bytes = envelope.calendar.len();

    let delivery = transport.deliver(&envelope).await;
    sink.log(delivery.log_text());

    info!(
        transport = transport.name(),
        status = ?delivery.status(),
        rows,
        "Push finished"
    );

    Ok(PushReport {
        rows,
        csv_bytes,
        delivery,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use sheetcal_core::Table;

    use crate::error::{ProviderError, ProviderErrorCode};
    use crate::sink::RecordingSink;
    use crate::source::{BoxFuture, ErrorSource, StaticSource};

    /// Records envelopes and answers with a canned delivery.
    struct FakeTransport {
        reply: Delivery,
        seen: Mutex<Vec<Envelope>>,
    }

    impl FakeTransport {
        fn replying(reply: Delivery) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<Envelope> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        fn name(&self) -> &str {
            "fake"
        }

        fn deliver<'a>(&'a self, envelope: &'a Envelope) -> BoxFuture<'a, Delivery> {
            self.seen.lock().unwrap().push(envelope.clone());
            let reply = self.reply.clone();
            Box::pin(async move { reply })
        }
    }

    fn sample_table() -> Table {
        Table::from_rows(vec![
            vec!["Name", "Age"],
            vec!["Ann", "30"],
            vec![r#"He said "hi""#, ""],
        ])
    }

    #[tokio::test]
    async fn pushes_encoded_table() {
        let source = StaticSource::new(sample_table());
        let transport = FakeTransport::replying(Delivery::Response {
            status: 200,
            body: "Success".to_string(),
        });
        let sink = RecordingSink::new();

        let report = push(&source, &transport, &sink).await.unwrap();

        assert_eq!(report.rows, 3);
        assert!(report.delivery.is_success());
        let seen = transport.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].calendar,
            "\"Name\",\"Age\"\n\"Ann\",\"30\"\n\"He said \"\"hi\"\"\",\"\""
        );
        assert_eq!(report.csv_bytes, seen[0].calendar.len());
        insta::assert_snapshot!(
            seen[0].to_json(),
            @r#"{"calendar":"\"Name\",\"Age\"\n\"Ann\",\"30\"\n\"He said \"\"hi\"\"\",\"\""}"#
        );
        assert_eq!(sink.entries(), vec!["Success"]);
    }

    #[tokio::test]
    async fn server_error_is_logged_not_raised() {
        let source = StaticSource::new(sample_table());
        let transport = FakeTransport::replying(Delivery::Response {
            status: 500,
            body: "error".to_string(),
        });
        let sink = RecordingSink::new();

        let report = push(&source, &transport, &sink).await.unwrap();

        assert_eq!(report.delivery.status(), Some(500));
        assert_eq!(sink.entries(), vec!["error"]);
    }

    #[tokio::test]
    async fn network_failure_logs_diagnostic() {
        let source = StaticSource::new(sample_table());
        let transport = FakeTransport::replying(Delivery::Failed {
            reason: "connection refused".to_string(),
        });
        let sink = RecordingSink::new();

        let report = push(&source, &transport, &sink).await.unwrap();

        assert!(!report.delivery.is_success());
        assert_eq!(sink.entries(), vec!["connection refused"]);
    }

    #[tokio::test]
    async fn empty_table_sends_empty_document() {
        let source = StaticSource::new(Table::new());
        let transport = FakeTransport::replying(Delivery::Response {
            status: 204,
            body: String::new(),
        });
        let sink = RecordingSink::new();

        let report = push(&source, &transport, &sink).await.unwrap();

        assert_eq!(report.rows, 0);
        assert_eq!(transport.seen()[0].to_json(), r#"{"calendar":""}"#);
        assert_eq!(sink.entries(), vec![""]);
    }

    #[tokio::test]
    async fn extraction_failure_sends_nothing() {
        let source = ErrorSource::new("sheet", ProviderError::source_unavailable("no sheet"));
        let transport = FakeTransport::replying(Delivery::Response {
            status: 200,
            body: String::new(),
        });
        let sink = RecordingSink::new();

        let err = push(&source, &transport, &sink).await.unwrap_err();

        assert_eq!(err.code(), ProviderErrorCode::SourceUnavailable);
        assert!(transport.seen().is_empty());
        assert!(sink.entries().is_empty());
    }

    #[tokio::test]
    async fn prepare_is_deterministic() {
        let source = StaticSource::new(sample_table());
        let (_, first) = prepare(&source).await.unwrap();
        let (_, second) = prepare(&source).await.unwrap();
        assert_eq!(first, second);
    }
}
