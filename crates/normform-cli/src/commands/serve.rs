//! Serve command - run the HTTP normalization endpoint.

use std::net::{IpAddr, SocketAddr};

use colored::Colorize;

use crate::server::{app, state::AppState};

pub fn run(host: IpAddr, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::new(host, port);
    let state = AppState::new();

    println!(
        "{} http://{}/api/normalize-database",
        "Serving".cyan().bold(),
        addr
    );
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, addr))
}
