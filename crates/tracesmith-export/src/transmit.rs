//! Body of the hidden `transmit` subcommand: read an OTLP payload from
//! stdin and POST it. Runs inside the detached child spawned by
//! [`crate::sender`], where no one is listening for errors.
//!
//! The request carries no timeout and is never retried. A collector that
//! holds the connection open keeps this child alive that long, but the
//! child is outside the invoking CLI's process group so nothing
//! user-facing waits on it.

use std::io::Read;

/// POST whatever arrives on stdin to `url`. Never fails: the parent is
/// long gone and a lost payload costs nothing.
pub fn transmit_from_stdin(url: &str) {
    let mut body = String::new();
    if std::io::stdin().read_to_string(&mut body).is_err() || body.is_empty() {
        return;
    }
    post(url, body);
}

fn post(url: &str, body: String) {
    let Ok(runtime) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return;
    };

    runtime.block_on(async move {
        let result = reqwest::Client::new()
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await;
        match result {
            Ok(response) => {
                tracing::debug!(status = %response.status(), %url, "payload delivered");
            }
            Err(err) => {
                tracing::debug!(%err, %url, "payload dropped");
            }
        }
    });
}
