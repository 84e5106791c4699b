use axum::Router;
use bon::Builder;
use tokio::net::TcpListener;
use tokio_graceful_shutdown::SubsystemHandle;
use tracing::info;

/// Serves the router on an already-bound listener until shutdown is requested.
/// In-flight requests are allowed to finish.
#[derive(Builder)]
pub struct HttpServerSubsystem {
    pub(crate) listener: TcpListener,
    pub(crate) router: Router,
}

impl HttpServerSubsystem {
    pub async fn run(self, subsys: SubsystemHandle) -> std::io::Result<()> {
        let addr = self.listener.local_addr()?;
        info!(%addr, "Starting HTTP subsystem");

        let shutdown = subsys.create_cancellation_token();
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        info!("HTTP subsystem finished");
        Ok(())
    }
}
