//! Hyper server setup and request handling.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::{Request, Response, Result as HyperResult};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

use crate::router::Router;

/// HTTP server for the admin screens, bound to its listening socket.
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
}

impl Server {
    /// Binds the listening socket.
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to; port 0 picks a free port
    /// * `router` - Request router
    pub async fn bind(addr: SocketAddr, router: Router) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    /// Address the server actually listens on.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` resolves.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn serve_until<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        info!("Server listening on http://{}", self.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopped accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = accepted?;
                    self.spawn_connection(stream, peer);
                }
            }
        }
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr) {
        debug!(%peer, "Accepted connection");
        let io = TokioIo::new(stream);
        let router = Arc::clone(&self.router);

        tokio::task::spawn(async move {
            let service =
                hyper::service::service_fn(move |req| handle_request(req, Arc::clone(&router)));
            if let Err(err) = ConnectionBuilder::new(TokioExecutor::new())
                .serve_connection(io, service)
                .await
            {
                error!(%peer, "Error serving connection: {}", err);
            }
        });
    }
}

/// Routes one request, turning router failures into error responses.
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> HyperResult<Response<Full<Bytes>>> {
    let response = match router.route(req).await {
        Ok(response) => response,
        Err(err) => {
            error!("Error handling request: {}", err);
            Response::from(err)
        }
    };
    Ok(response.map(Full::new))
}
