//! Per-connection handler: decode a request, run it, answer it.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. The protocol is strictly request/response: every
//! inbound frame produces exactly one outbound frame carrying the same
//! `seq`. Rule violations come back as `Response::Error` and the
//! connection stays open. Only transport failures, a clean close, or the
//! idle timeout end it.

use std::sync::Arc;

use lightcycle_game::{GameEngine, GameError};
use lightcycle_protocol::{Codec, Envelope, Request, Response};
use lightcycle_session::Clock;
use lightcycle_transport::{Connection, WebSocketConnection};
use serde::Deserialize;

use crate::LightcycleError;
use crate::server::ServerState;

/// Just enough of an envelope to echo `seq` back on a malformed request.
#[derive(Deserialize)]
struct SeqOnly {
    seq: u64,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), LightcycleError> {
    let conn_id = conn.id();
    let peer = conn.peer_addr();
    tracing::debug!(%conn_id, %peer, "handling new connection");
    state
        .engine
        .record(format!("Player accessed game from IP: {peer}"));

    loop {
        let data = match tokio::time::timeout(state.idle_timeout, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                tracing::info!(%conn_id, %peer, "connection idle, closing");
                // The peer may already be gone.
                let _ = conn.close().await;
                break;
            }
        };

        let reply = match state.codec.decode::<Envelope<Request>>(&data) {
            Ok(Envelope { seq, body }) => Envelope {
                seq,
                body: dispatch(&state.engine, body),
            },
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "malformed request");
                let seq = state
                    .codec
                    .decode::<SeqOnly>(&data)
                    .map_or(0, |partial| partial.seq);
                Envelope {
                    seq,
                    body: Response::error(400, "malformed_input", "Invalid JSON payload"),
                }
            }
        };

        let bytes = state.codec.encode(&reply)?;
        conn.send(&bytes).await?;
    }

    Ok(())
}

/// Runs one request against the engine.
pub(crate) fn dispatch<K: Clock>(engine: &GameEngine<K>, request: Request) -> Response {
    match request {
        Request::StartGame => Response::GameStarted {
            session_id: engine.start_game(),
            status: "started".to_owned(),
        },
        Request::Move {
            session_id,
            position,
        } => match engine.submit_move(&session_id, position) {
            Ok(_) => Response::MoveRecorded {
                status: "recorded".to_owned(),
            },
            Err(e) => error_response(&e),
        },
        Request::SubmitScore {
            session_id,
            final_position,
            score,
        } => match engine.submit_score(&session_id, final_position, score) {
            Ok(outcome) => Response::ScoreAccepted {
                message: "Score processed successfully".to_owned(),
                score: outcome.score,
                new_high_score: outcome.new_high_score,
                high_score: outcome.high_score,
                status: "accepted".to_owned(),
            },
            Err(e) => error_response(&e),
        },
        Request::Logs => Response::Logs {
            logs: engine.read_logs(),
        },
        Request::Leaderboard => {
            let state = engine.read_leaderboard();
            Response::Leaderboard {
                high_score: state.high_score,
                top_player: state.top_player,
            }
        }
    }
}

fn error_response(err: &GameError) -> Response {
    Response::error(err.status(), err.kind(), err.client_message())
}
