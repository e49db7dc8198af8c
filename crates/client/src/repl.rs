//! Command loop.

use std::io::Write;

use anyhow::Context;
use scanstock_gateway::{CartridgeGateway, DocsGateway};
use scanstock_store::Action;
use scanstock_sync::{ScanController, SyncError};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::command::{Command, CommandError};

fn emit<W: Write>(output: &mut W, value: &Value) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *output, value).context("failed to encode output")?;
    writeln!(output).context("failed to write output")?;
    output.flush().context("failed to flush output")
}

fn emit_view<G>(controller: &ScanController<G>, output: &mut impl Write) -> anyhow::Result<()>
where
    G: CartridgeGateway + 'static,
{
    emit(
        output,
        &json!({
            "view": controller.view_state(),
            "notification": controller.notification_message(),
        }),
    )
}

/// Outcome of an adjustment command. Not-applicable submissions are dropped
/// silently; rejected amounts are echoed back.
fn adjustment_feedback(result: Result<(), SyncError>) -> Option<Value> {
    match result {
        Ok(()) => None,
        Err(SyncError::NotApplicable) => {
            tracing::debug!("adjustment ignored: nothing scanned");
            None
        }
        Err(err) => Some(json!({ "error": err.to_string() })),
    }
}

/// Read commands from `input` until EOF or `quit`, printing the view-state
/// after each one has settled.
pub async fn run<G, D, R, W>(
    controller: &mut ScanController<G>,
    docs: &D,
    input: R,
    output: &mut W,
) -> anyhow::Result<()>
where
    G: CartridgeGateway + 'static,
    D: DocsGateway + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read command")? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                emit(output, &json!({ "error": err.to_string() }))?;
                continue;
            }
        };
        tracing::debug!(?command, "command");

        match command {
            Command::Scan(code) => controller.trigger_scan(code),
            Command::Amount(text) => controller.set_amount(text),
            Command::Adjust(kind, amount) => {
                let result = match amount {
                    Some(amount) => controller.submit_adjustment(&amount, kind),
                    None => controller.submit_buffered(kind),
                };
                if let Some(feedback) = adjustment_feedback(result) {
                    emit(output, &feedback)?;
                }
            }
            Command::Refresh => controller.refresh(),
            Command::Dismiss => controller.dismiss_error(),
            Command::Server(url) => controller
                .store()
                .dispatch(Action::SetCartridgeServerUrl(url)),
            Command::Docs(id) => {
                let base_url = controller.store().snapshot().settings.docs_server_url;
                let value = match docs.get_docs_item(&base_url, id).await {
                    Ok(rows) => json!({ "docs": rows }),
                    Err(err) => {
                        tracing::warn!(%id, error = %err, "document fetch failed");
                        json!({ "error": err.to_string() })
                    }
                };
                emit(output, &value)?;
                continue;
            }
            Command::DocSet(patch) => {
                let base_url = controller.store().snapshot().settings.docs_server_url;
                let value = match docs.update_doc(&base_url, &patch).await {
                    Ok(doc) => json!({ "doc": doc }),
                    Err(err) => {
                        tracing::warn!(id = %patch.id, error = %err, "document update failed");
                        json!({ "error": err.to_string() })
                    }
                };
                emit(output, &value)?;
                continue;
            }
            Command::Show => {}
            Command::Quit => break,
        }

        controller.settle().await;
        emit_view(controller, output)?;
    }
    Ok(())
}
