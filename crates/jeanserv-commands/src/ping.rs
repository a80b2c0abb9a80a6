//! Liveness check.

use jeanserv_core::{CommandHandler, CommandRequest, Reply, Tone};

/// Answers `ping` with `pong`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ping;

impl CommandHandler for Ping {
    fn handle(&self, request: &CommandRequest<'_>) -> Option<Reply> {
        let pong = request.palette.paint(Tone::Reply, "pong");
        Some(Reply::text(format!("{pong}\n")).with_summary("pong"))
    }
}

#[cfg(test)]
mod tests {
    use jeanserv_core::Palette;

    use super::*;

    #[test]
    fn test_plain_pong() {
        let request = CommandRequest {
            args: "",
            peer: "127.0.0.1:5000".parse().unwrap(),
            palette: Palette::plain(),
        };
        let reply = Ping.handle(&request).unwrap();
        assert_eq!(reply.payload(), b"pong\n");
        assert_eq!(reply.summary(), Some("pong"));
    }

    #[test]
    fn test_colored_pong_ends_with_newline() {
        let request = CommandRequest {
            args: "",
            peer: "127.0.0.1:5000".parse().unwrap(),
            palette: Palette::colored(),
        };
        let reply = Ping.handle(&request).unwrap();
        let text = String::from_utf8(reply.payload().to_vec()).unwrap();
        assert!(text.contains("pong"));
        assert!(text.ends_with('\n'));
    }
}
