//! Push command: the sheet goes to `{base_address}/update`.

use std::path::PathBuf;

use sheetcal_providers::{CsvFileSource, HttpTransport, TracingSink, TransportConfig, push};
use tracing::debug;

use crate::error::ClientResult;

/// Reads `input`, sends it once and logs the response.
///
/// Succeeds whatever the endpoint answers; only reading the input or
/// building the HTTP client can fail.
pub async fn run(input: PathBuf, endpoint: TransportConfig) -> ClientResult<()> {
    let source = CsvFileSource::new(input);
    let transport = HttpTransport::new(endpoint)?;

    let report = push(&source, &transport, &TracingSink).await?;
    debug!(
        rows = report.rows,
        csv_bytes = report.csv_bytes,
        success = report.delivery.is_success(),
        "Push complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    fn closed_port_address() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sheet.csv");
        std::fs::write(&input, "Name,Age\nAnn,30\n").unwrap();

        let endpoint = TransportConfig::new(closed_port_address(), "k");
        run(input, endpoint).await.unwrap();
    }

    #[tokio::test]
    async fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = TransportConfig::new(closed_port_address(), "k");

        let err = run(dir.path().join("missing.csv"), endpoint)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Provider(_)));
    }
}
