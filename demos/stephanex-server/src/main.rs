use anyhow::{Context, Error};
use stephanex::tag::{Access, Value};
use stephanex::{Server, ServerConfig, Tag};

const USAGE: &str = "USAGE: stephanex-server [port]";

fn main() -> Result<(), Error> {
    env_logger::init();

    let port = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<u16>().context("bad port"))
        .transpose()?
        .unwrap_or(5000);

    let server = Server::new(ServerConfig { port });
    server.add_tag(Tag::numeric(1001, "temperature", Value::Integer(21), Access::ReadWrite));
    server.add_tag(Tag::numeric(1002, "fill_count", Value::Unsigned(0), Access::ReadOnly));
    server.add_tag(Tag::numeric(1003, "target_fill_ratio", Value::Float(0.98), Access::ReadWrite));
    server.add_tag(Tag::string(2001, "product_label", "untitled", Access::ReadWrite));

    let handle = server.serve().context("could not bind listener")?;
    println!("listening on {}", handle.local_addr());

    // Block forever; Ctrl-C ends the process. `Handle::shutdown` is
    // available to callers embedding the server instead of running it
    // standalone like this demo does.
    loop {
        std::thread::sleep(std::time::Duration::from_secs(3600));
    }
}
