//! Streams timestamped text chunks to a running upload registry server.
//!
//! Sends `POST /upload` with a chunked body, one chunk per interval, then
//! prints the server's response.

use clap::Parser;
use log::{error, info};
use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use upload_registry_server::utils::logging::setup_logging;

#[derive(Parser, Debug)]
#[command(name = "stream-client", about = "Stream chunked data to /upload")]
struct Args {
    #[arg(long, env = "UPLOAD_REGISTRY_HOST", default_value = "127.0.0.1")]
    host: String,
    #[arg(short, long, env = "UPLOAD_REGISTRY_PORT", default_value_t = 881)]
    port: u16,
    #[arg(short, long, default_value_t = 10, help = "Number of chunks to send")]
    chunks: u32,
    #[arg(short, long, default_value_t = 1000, help = "Delay between chunks in milliseconds")]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();
    let args = Args::parse();

    match stream_upload(&args).await {
        Ok(response) => {
            println!("Server response:\n{response}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Request error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn stream_upload(args: &Args) -> std::io::Result<String> {
    let mut stream = TcpStream::connect((args.host.as_str(), args.port)).await?;

    let head = format!(
        "POST /upload HTTP/1.1\r\n\
         Host: {}:{}\r\n\
         Content-Type: application/octet-stream\r\n\
         Transfer-Encoding: chunked\r\n\
         Connection: close\r\n\r\n",
        args.host, args.port
    );
    stream.write_all(head.as_bytes()).await?;

    let mut total_bytes = 0usize;
    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    for n in 1..=args.chunks {
        ticker.tick().await;
        let chunk = format!("Data chunk #{n} sent at {}\n", unix_millis());
        stream
            .write_all(format!("{:X}\r\n", chunk.len()).as_bytes())
            .await?;
        stream.write_all(chunk.as_bytes()).await?;
        stream.write_all(b"\r\n").await?;
        stream.flush().await?;
        total_bytes += chunk.len();
        info!("Sent {} bytes (total: {total_bytes})", chunk.len());
    }

    info!("Stopping stream...");
    stream.write_all(b"0\r\n\r\n").await?;
    stream.flush().await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_millis())
        .unwrap_or(0)
}
