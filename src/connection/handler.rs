use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;

use crate::game::MatchCommand;
use crate::models::ClientAction;

use super::codec::FrameCodec;

/// Pump one seat's connection.
///
/// Incoming frames become [`MatchCommand`]s; payloads the manager queues on
/// `outbound` are framed and written out. Returns once the peer leaves, the
/// framing breaks, or the manager drops its end of `outbound`.
///
/// Every forwarded command is answered on `outbound`, so the next frame is
/// only read after a reply has gone out, and a command waiting for room in
/// the queue never blocks the reply path.
pub async fn handle_connection(
    seat: usize,
    mut framed: Framed<TcpStream, FrameCodec>,
    commands: mpsc::Sender<MatchCommand>,
    mut outbound: mpsc::Receiver<String>,
) {
    let mut pending: Option<MatchCommand> = None;
    let mut awaiting_reply = false;

    loop {
        tokio::select! {
            out = outbound.recv() => {
                match out {
                    Some(payload) => {
                        if let Err(err) = framed.send(payload).await {
                            tracing::error!(seat, %err, "failed to send frame");
                            break;
                        }
                        awaiting_reply = false;
                    }
                    // match finished; everything queued has been written
                    None => return,
                }
            }

            permit = commands.reserve(), if pending.is_some() => {
                let Ok(permit) = permit else {
                    return;
                };
                if let Some(cmd) = pending.take() {
                    permit.send(cmd);
                    awaiting_reply = true;
                }
            }

            frame = framed.next(), if pending.is_none() && !awaiting_reply => {
                match frame {
                    Some(Ok(payload)) => {
                        pending = Some(match ClientAction::parse(&payload) {
                            Ok(action) => MatchCommand::Action { seat, action },
                            Err(err) => MatchCommand::Malformed { seat, reason: err.to_string() },
                        });
                    }
                    Some(Err(err)) => {
                        tracing::warn!(seat, %err, "protocol violation, dropping connection");
                        break;
                    }
                    None => {
                        tracing::info!(seat, "connection closed by peer");
                        break;
                    }
                }
            }
        }
    }

    let _ = commands.send(MatchCommand::Disconnect { seat }).await;
}
