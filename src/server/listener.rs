use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionContext};
use crate::http::encoding::Encodings;
use crate::routing::Router;

/// Pause after a failed accept.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Binds `cfg.listen_addr` and serves `router` until the task is dropped.
pub async fn run(cfg: &Config, router: Router) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!(
        "Listening on {} ({} routes)",
        listener.local_addr()?,
        router.route_count()
    );

    let ctx = ConnectionContext::new(router, Encodings::default(), cfg.max_header_bytes)
        .with_max_body_bytes(cfg.max_body_bytes);
    serve(listener, ctx, cfg.max_connections).await
}

/// Accept loop over an already bound listener.
///
/// Every connection runs in its own task. At most `max_connections` run at
/// once; when all permits are taken the loop stops accepting until one is
/// returned. Failures of a single connection are logged and do not reach the
/// loop.
pub async fn serve(
    listener: TcpListener,
    ctx: ConnectionContext,
    max_connections: usize,
) -> anyhow::Result<()> {
    let permits = Arc::new(Semaphore::new(max_connections));

    loop {
        let permit = Arc::clone(&permits).acquire_owned().await?;

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let ctx = ctx.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, ctx);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {:#}", peer, e);
            }
            drop(permit);
        });
    }
}
