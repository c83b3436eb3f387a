use crate::router::handle;
use crate::sessions::SessionStore;
use astra::Server;
use std::net::SocketAddr;

mod domain;
mod errors;
mod ingest;
mod responses;
mod router;
mod sessions;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

fn main() {
    let store = SessionStore::new();

    let addr: SocketAddr = match std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
    {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("❌ BIND_ADDR 无效: {e}");
            std::process::exit(1);
        }
    };

    println!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &store) {
        Ok(resp) => resp,
        Err(err) => {
            eprintln!("❌ 请求处理失败: {err}");
            crate::responses::error_to_response(err)
        }
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}
