use anyhow::{Context, Error};
use stephanex::{Client, ClientConfig, DataType, Value};
use std::sync::Arc;

const USAGE: &str =
    "USAGE: stephanex-client <host> <port> noop\n       stephanex-client <host> <port> read-int <tag_id>\n       stephanex-client <host> <port> write-int <tag_id> <value>\n       stephanex-client <host> <port> read-string <tag_id>\n       stephanex-client <host> <port> write-string <tag_id> <value>";

fn main() -> Result<(), Error> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let host = args.next().context(USAGE)?;
    let port = args.next().context(USAGE)?.parse::<u16>().context("bad port")?;
    let command = args.next().context(USAGE)?;

    let mut config = ClientConfig::new(host.clone());
    config.port = port;
    let client = Arc::new(Client::new(config));
    client.connect().context(format!("could not connect to {host}:{port}"))?;

    match command.as_str() {
        "noop" => {
            client.no_op()?;
            println!("S: Alive");
        }
        "read-int" => {
            let tag_id: u16 = args.next().context(USAGE)?.parse()?;
            let value = client.read_value(tag_id, DataType::Integer)?;
            println!("S: {tag_id} = {value:?}");
        }
        "write-int" => {
            let tag_id: u16 = args.next().context(USAGE)?.parse()?;
            let value: i32 = args.next().context(USAGE)?.parse()?;
            client.write_value(tag_id, Value::Integer(value))?;
            println!("S: wrote {value} to {tag_id}");
        }
        "read-string" => {
            let tag_id: u16 = args.next().context(USAGE)?.parse()?;
            let value = client.read_string(tag_id)?;
            println!("S: {tag_id} = {value:?}");
        }
        "write-string" => {
            let tag_id: u16 = args.next().context(USAGE)?.parse()?;
            let value = args.next().context(USAGE)?;
            client.write_string(tag_id, &value)?;
            println!("S: wrote {value:?} to {tag_id}");
        }
        other => return Err(Error::msg(format!("unknown command `{other}`"))),
    }

    client.disconnect();
    Ok(())
}
