use async_trait::async_trait;
use tcp_http::connection::ResponseWriter;
use tcp_http::handler::{Handler, HandlerError};
use tcp_http::protocol::{Headers, Request, StatusCode};
use tokio::net::tcp::OwnedWriteHalf;

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

const PORT: u16 = 42069;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = match tcp_http::server::serve(PORT, SimpleHandler).await {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };
    info!(port = server.port(), "server started, press ctrl-c to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(cause = %e, "can't listen for ctrl-c");
    }

    if let Err(e) = server.close().await {
        error!(cause = %e, "server shutdown error");
    }
}

struct SimpleHandler;

#[async_trait]
impl Handler<OwnedWriteHalf> for SimpleHandler {
    async fn call(&self, writer: &mut ResponseWriter<OwnedWriteHalf>, request: Request) -> Result<(), HandlerError> {
        match request.target() {
            "/yourproblem" => write_html(writer, StatusCode::BAD_REQUEST, "Bad Request", "Your request honestly kinda sucked.").await,
            "/myproblem" => {
                write_html(writer, StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", "Okay, you know what? This one is on me.")
                    .await
            }
            "/stream" => write_stream(writer).await,
            _ => write_html(writer, StatusCode::OK, "Success!", "Your request was an absolute banger.").await,
        }
    }
}

async fn write_html(
    writer: &mut ResponseWriter<OwnedWriteHalf>,
    status: StatusCode,
    title: &str,
    message: &str,
) -> Result<(), HandlerError> {
    let body = format!(
        "<html>\n  <head>\n    <title>{status}</title>\n  </head>\n  <body>\n    <h1>{title}</h1>\n    <p>{message}</p>\n  </body>\n</html>\n",
        status = status.as_u16(),
    );

    writer.write_status_line(status).await?;
    writer.write_headers(&Headers::default_response("text/html", body.len())).await?;
    writer.write_body(body.as_bytes()).await?;
    Ok(())
}

/// Streams a few chunks and reports the total length in a trailer.
async fn write_stream(writer: &mut ResponseWriter<OwnedWriteHalf>) -> Result<(), HandlerError> {
    let mut headers = Headers::new();
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/plain");
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Trailer", "X-Content-Length");

    writer.write_status_line(StatusCode::OK).await?;
    writer.write_headers(&headers).await?;

    let mut total = 0;
    for i in 0..10 {
        let chunk = format!("chunk number {i}\n");
        writer.write_chunked_body(chunk.as_bytes()).await?;
        total += chunk.len();
    }

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", total.to_string());
    writer.write_chunked_body_done(&trailers).await?;
    Ok(())
}
