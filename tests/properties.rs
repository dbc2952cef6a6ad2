//! Access control, type gating, and concurrency properties (testable
//! properties 8-10 and the §5 concurrency guarantees), exercised against a
//! real server with several concurrent clients.

use std::sync::Arc;
use std::thread;

use stephanex::codec::Status;
use stephanex::registry::{InMemoryRegistry, Registry};
use stephanex::tag::{Access, DataType, Value};
use stephanex::{Client, ClientConfig, Error, Server, ServerConfig, Tag};

fn start_server() -> (stephanex::server::Handle, u16) {
    let server = Server::new(ServerConfig { port: 0 });
    server.add_tag(Tag::numeric(1, "ro", Value::Integer(1), Access::ReadOnly));
    server.add_tag(Tag::numeric(2, "wo", Value::Integer(2), Access::WriteOnly));
    server.add_tag(Tag::numeric(3, "rw", Value::Integer(3), Access::ReadWrite));
    server.add_tag(Tag::string(4, "label", "hi", Access::ReadOnly));
    server.add_tag(Tag::numeric(5, "counter", Value::Integer(0), Access::ReadWrite));
    let handle = server.serve().expect("bind should succeed on an ephemeral port");
    let port = handle.local_addr().port();
    (handle, port)
}

fn connected_client(port: u16) -> Arc<Client> {
    let mut config = ClientConfig::new("127.0.0.1");
    config.port = port;
    config.heartbeat_enabled = false;
    let client = Arc::new(Client::new(config));
    client.connect().unwrap();
    client
}

fn assert_status(error: Error, expected: Status) {
    assert!(matches!(error, Error::Status(status) if status == expected));
}

#[test]
fn access_control_matrix() {
    let (handle, port) = start_server();
    let client = connected_client(port);

    // ReadOnly: read ok, write forbidden.
    assert_eq!(client.read_value(1, DataType::Integer).unwrap(), Value::Integer(1));
    assert_status(
        client.write_value(1, Value::Integer(9)).unwrap_err(),
        Status::UnauthorizedAccess,
    );

    // WriteOnly: write ok, read forbidden.
    client.write_value(2, Value::Integer(9)).unwrap();
    assert_status(
        client.read_value(2, DataType::Integer).unwrap_err(),
        Status::UnauthorizedAccess,
    );

    // ReadWrite: both ok.
    client.write_value(3, Value::Integer(9)).unwrap();
    assert_eq!(client.read_value(3, DataType::Integer).unwrap(), Value::Integer(9));

    client.disconnect();
    handle.shutdown();
}

#[test]
fn type_gating_rejects_wrong_command_for_tag_type() {
    let (handle, port) = start_server();
    let client = connected_client(port);

    // ReadSingleValue/WriteSingleValue on a String tag.
    assert_status(
        client.read_value(4, DataType::Integer).unwrap_err(),
        Status::ImplausibleArgument,
    );
    assert_status(
        client.write_value(4, Value::Integer(1)).unwrap_err(),
        Status::ImplausibleArgument,
    );

    // ReadString/WriteString on a non-String tag.
    assert_status(client.read_string(3).unwrap_err(), Status::ImplausibleArgument);
    assert_status(
        client.write_string(3, "nope").unwrap_err(),
        Status::ImplausibleArgument,
    );

    client.disconnect();
    handle.shutdown();
}

#[test]
fn unregistered_tag_is_implausible_argument() {
    let (handle, port) = start_server();
    let client = connected_client(port);

    assert_status(
        client.read_value(9999, DataType::Integer).unwrap_err(),
        Status::ImplausibleArgument,
    );
    assert_status(
        client.write_value(9999, Value::Integer(1)).unwrap_err(),
        Status::ImplausibleArgument,
    );

    client.disconnect();
    handle.shutdown();
}

/// §5: two writes to the same tag id appear in some serial order; a
/// concurrent reader never observes a torn value — only one of the two
/// halves of a multi-byte integer, never a mix.
#[test]
fn concurrent_writes_to_one_tag_never_tear() {
    let (handle, port) = start_server();
    let writers: Vec<_> = (0..8)
        .map(|i| {
            let client = connected_client(port);
            let value = 1000 + i;
            thread::spawn(move || {
                client.write_value(5, Value::Integer(value)).unwrap();
                client.disconnect();
                value
            })
        })
        .collect();
    let written: Vec<i32> = writers.into_iter().map(|t| t.join().unwrap()).collect();

    let reader = connected_client(port);
    let Value::Integer(final_value) = reader.read_value(5, DataType::Integer).unwrap() else {
        panic!("expected an Integer value back");
    };
    assert!(written.contains(&final_value));
    reader.disconnect();

    handle.shutdown();
}

#[test]
fn client_count_reports_live_connections() {
    let registry: Arc<dyn Registry> = Arc::new(InMemoryRegistry::new());
    let server = Server::with_registry(ServerConfig { port: 0 }, Arc::clone(&registry));
    let handle = server.serve().unwrap();
    let port = handle.local_addr().port();

    assert_eq!(registry.client_count(), 0);

    let a = connected_client(port);
    let b = connected_client(port);
    thread::sleep(std::time::Duration::from_millis(50));
    assert_eq!(registry.client_count(), 2);

    a.disconnect();
    b.disconnect();
    thread::sleep(std::time::Duration::from_millis(50));
    assert_eq!(registry.client_count(), 0);

    handle.shutdown();
}
