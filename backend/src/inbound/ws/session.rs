//! Per-connection WebSocket handler.
//!
//! Keeps WebSocket framing and heartbeats at the edge while the owned
//! [`DecaySubscription`] drives the payloads. The public contract pings
//! every 5s and considers a connection idle after 10s without client
//! traffic. Tests shorten these intervals to speed up feedback.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::time;
use tracing::{info, warn};

use crate::domain::{DecaySubscription, UserId};
use crate::domain::ports::DecayResponse;
use crate::inbound::ws::messages::DecayUpdate;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(500);

pub(super) async fn handle_ws_session(
    session: Session,
    stream: MessageStream,
    subscription: DecaySubscription,
) {
    WsSession::new(subscription).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    SchedulerStopped,
    Protocol(ProtocolError),
    Network(Closed),
}

struct WsSession {
    subscription: DecaySubscription,
}

impl WsSession {
    fn new(subscription: DecaySubscription) -> Self {
        Self { subscription }
    }

    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        let error = loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
                update = self.subscription.next_update() => {
                    handle_decay_update(&mut session, update).await
                }
            };

            if let Err(error) = result {
                break error;
            }
        };

        let user_id = self.subscription.user_id();
        log_shutdown_reason(user_id, &error);
        close_session_if_needed(session, close_reason_for(error)).await;

        self.subscription.cancel().await;
        info!(%user_id, "decay session closed");
    }
}

async fn handle_heartbeat_tick(
    session: &mut Session,
    last_heartbeat: &Instant,
) -> Result<(), SessionError> {
    if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionError::HeartbeatTimeout);
    }

    session.ping(b"").await.map_err(SessionError::Network)
}

async fn handle_stream_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionError> {
    let Some(message) = message else {
        return Err(SessionError::StreamClosed);
    };

    match message {
        Ok(Message::Ping(payload)) => {
            *last_heartbeat = Instant::now();
            session.pong(&payload).await.map_err(SessionError::Network)
        }
        Ok(Message::Close(reason)) => Err(SessionError::ClientClosed(reason)),
        // The channel is push-only; client frames only count as liveness.
        Ok(
            Message::Text(_)
            | Message::Pong(_)
            | Message::Binary(_)
            | Message::Continuation(_)
            | Message::Nop,
        ) => {
            *last_heartbeat = Instant::now();
            Ok(())
        }
        Err(error) => Err(SessionError::Protocol(error)),
    }
}

async fn handle_decay_update(
    session: &mut Session,
    update: Option<DecayResponse>,
) -> Result<(), SessionError> {
    let Some(update) = update else {
        return Err(SessionError::SchedulerStopped);
    };
    let payload = DecayUpdate::from(update);
    match serde_json::to_string(&payload) {
        Ok(body) => session.text(body).await.map_err(SessionError::Network),
        Err(error) => {
            warn!(error = %error, "Failed to serialize decay update");
            Ok(())
        }
    }
}

fn log_shutdown_reason(user_id: UserId, error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => {
            warn!(%user_id, "WebSocket heartbeat timeout; closing connection");
        }
        SessionError::SchedulerStopped => {
            warn!(%user_id, "decay task stopped; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(%user_id, error = %error, "WebSocket protocol error");
        }
        SessionError::Network(error) => {
            warn!(%user_id, error = %error, "WebSocket send failed; closing connection");
        }
        SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
    }
}

fn close_reason_for(error: SessionError) -> Option<Option<CloseReason>> {
    match error {
        SessionError::HeartbeatTimeout => Some(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::SchedulerStopped => Some(Some(CloseReason {
            code: CloseCode::Error,
            description: Some("decay stopped".to_owned()),
        })),
        SessionError::Protocol(_) => Some(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::ClientClosed(reason) => Some(reason),
        SessionError::StreamClosed | SessionError::Network(_) => None,
    }
}

async fn close_session_if_needed(session: Session, reason: Option<Option<CloseReason>>) {
    let Some(reason) = reason else {
        return;
    };
    if let Err(error) = session.close(reason).await {
        warn!(error = %error, "Failed to close WebSocket session");
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
