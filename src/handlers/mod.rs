//! One submodule per command, each implementing both sides of that
//! command's exchange (§4.B): a server-side `handle` that consults the
//! [`Registry`](crate::registry::Registry) and a client-side `execute`
//! that drives the exchange over a stream and surfaces failures.
//!
//! [`NoOp`](crate::codec::Command::NoOp), `ReadSingleValue`, and
//! `WriteSingleValue` are single-frame-in, single-frame-out exchanges, so
//! their `handle` functions are pure: `RequestFrame -> ResponseFrame`, and
//! [`dispatch`] covers them directly. `ReadString` and `WriteString` are
//! multi-frame and so take the stream themselves; the server's request
//! loop calls them directly instead of going through `dispatch`.

pub mod noop;
pub mod read_string;
pub mod read_value;
pub mod write_string;
pub mod write_value;

use crate::codec::{Command, RequestFrame, ResponseFrame, Status};
use crate::registry::Registry;

/// Dispatches a single-frame-response command. Reserved commands
/// (`ReadList`, `WriteList`) become `UnknownCommand` (§4.B.6); `ReadString`
/// and `WriteString` are not handled here (see module docs).
pub fn dispatch(registry: &dyn Registry, request: RequestFrame) -> ResponseFrame {
    match request.command {
        Command::NoOp => noop::handle(request),
        Command::ReadSingleValue => read_value::handle(registry, request),
        Command::WriteSingleValue => write_value::handle(registry, request),
        Command::ReadList | Command::WriteList => unknown_command(),
        Command::ReadString | Command::WriteString => {
            unreachable!("multi-frame commands are dispatched by the server's request loop")
        }
    }
}

/// The `UnknownCommand` reply for reserved/undecodable commands: always
/// `tag_id = 0`, zero payload (§4.B.6).
pub fn unknown_command() -> ResponseFrame {
    ResponseFrame {
        status: Status::UnknownCommand,
        tag_id: 0,
        payload: [0; 4],
    }
}
