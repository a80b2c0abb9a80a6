//! Pluggable command table.
//!
//! A message either matches a literal command exactly, or names a namespace
//! in its prefix up to the first [`NAMESPACE_DELIMITER`], in which case the
//! remainder is the handler's argument. Anything else is consumed silently.

use std::{collections::BTreeMap, fmt, net::SocketAddr, sync::Arc};

use crate::Palette;

/// Separates a namespace from its argument, as in `ascii:hello`.
pub const NAMESPACE_DELIMITER: char = ':';

/// Input handed to a command handler.
#[derive(Debug, Clone, Copy)]
pub struct CommandRequest<'a> {
    /// Argument text. Empty for literal commands.
    pub args: &'a str,
    /// Client that sent the message.
    pub peer: SocketAddr,
    /// Decoration for the reply.
    pub palette: Palette,
}

/// What a handler sends back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    payload: Vec<u8>,
    summary: Option<String>,
    close: bool,
}

impl Reply {
    /// Reply with text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::bytes(text.into().into_bytes())
    }

    /// Reply with raw bytes.
    #[must_use]
    pub const fn bytes(payload: Vec<u8>) -> Self {
        Self {
            payload,
            summary: None,
            close: false,
        }
    }

    /// Describe the reply in the session log.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// End the session once the reply has been written.
    #[must_use]
    pub const fn closing(mut self) -> Self {
        self.close = true;
        self
    }

    /// Bytes written to the client.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Session log description, if any.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Whether the session ends after this reply.
    #[must_use]
    pub const fn closes_session(&self) -> bool {
        self.close
    }
}

/// Trait for command handlers.
///
/// Returning `None` consumes the message without a reply.
pub trait CommandHandler: Send + Sync {
    /// Handle one message.
    fn handle(&self, request: &CommandRequest<'_>) -> Option<Reply>;
}

/// Handler backed by a closure. Built with [`from_fn`].
#[derive(Clone)]
pub struct FnHandler<F> {
    f: F,
}

/// Wrap a closure as a [`CommandHandler`].
pub const fn from_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&CommandRequest<'_>) -> Option<Reply> + Send + Sync,
{
    FnHandler { f }
}

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&CommandRequest<'_>) -> Option<Reply> + Send + Sync,
{
    fn handle(&self, request: &CommandRequest<'_>) -> Option<Reply> {
        (self.f)(request)
    }
}

/// Command lookup table shared by all sessions.
#[derive(Default, Clone)]
pub struct CommandTable {
    literals: BTreeMap<String, Arc<dyn CommandHandler>>,
    namespaces: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable")
            .field("literals", &self.literals.keys().collect::<Vec<_>>())
            .field("namespaces", &self.namespaces.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CommandTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command matched exactly against the whole message.
    pub fn register_literal(
        &mut self,
        name: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> &mut Self {
        self.literals.insert(name.into(), Arc::new(handler));
        self
    }

    /// Register a namespace matched against the prefix before the delimiter.
    pub fn register_namespace(
        &mut self,
        prefix: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> &mut Self {
        self.namespaces.insert(prefix.into(), Arc::new(handler));
        self
    }

    /// Find the handler for `message` and the argument it receives.
    #[must_use]
    pub fn resolve<'m>(&self, message: &'m str) -> Option<(&dyn CommandHandler, &'m str)> {
        if let Some(handler) = self.literals.get(message) {
            return Some((handler.as_ref(), ""));
        }
        let (prefix, args) = message.split_once(NAMESPACE_DELIMITER)?;
        self.namespaces
            .get(prefix)
            .map(|handler| (handler.as_ref(), args))
    }

    /// Run the matching handler, if any.
    #[must_use]
    pub fn dispatch(&self, message: &str, peer: SocketAddr, palette: Palette) -> Option<Reply> {
        let (handler, args) = self.resolve(message)?;
        handler.handle(&CommandRequest {
            args,
            peer,
            palette,
        })
    }

    /// Registered literal command names, sorted.
    pub fn literal_names(&self) -> impl Iterator<Item = &str> {
        self.literals.keys().map(String::as_str)
    }

    /// Registered namespace prefixes, sorted.
    pub fn namespace_names(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn table() -> CommandTable {
        let mut table = CommandTable::new();
        table
            .register_literal(
                "ping",
                from_fn(|_| Some(Reply::text("pong\n").with_summary("pong"))),
            )
            .register_namespace(
                "echo",
                from_fn(|req| Some(Reply::text(format!("{}\n", req.args)))),
            )
            .register_literal(
                "echo:literal",
                from_fn(|_| Some(Reply::text("literal wins\n"))),
            );
        table
    }

    #[test]
    fn test_literal_exact_match() {
        let reply = table().dispatch("ping", peer(), Palette::plain()).unwrap();
        assert_eq!(reply.payload(), b"pong\n");
        assert_eq!(reply.summary(), Some("pong"));
        assert!(!reply.closes_session());
    }

    #[test]
    fn test_literal_is_not_prefix_matched() {
        let table = table();
        assert!(table.dispatch("pingg", peer(), Palette::plain()).is_none());
        assert!(table.dispatch(" ping", peer(), Palette::plain()).is_none());
        assert!(table.dispatch("PING", peer(), Palette::plain()).is_none());
    }

    #[test]
    fn test_namespace_gets_whole_remainder() {
        let reply = table()
            .dispatch("echo:a:b c", peer(), Palette::plain())
            .unwrap();
        assert_eq!(reply.payload(), b"a:b c\n");
    }

    #[test]
    fn test_namespace_with_empty_argument() {
        let reply = table().dispatch("echo:", peer(), Palette::plain()).unwrap();
        assert_eq!(reply.payload(), b"\n");
    }

    #[test]
    fn test_namespace_requires_delimiter() {
        assert!(table().dispatch("echo", peer(), Palette::plain()).is_none());
    }

    #[test]
    fn test_literal_takes_precedence_over_namespace() {
        let reply = table()
            .dispatch("echo:literal", peer(), Palette::plain())
            .unwrap();
        assert_eq!(reply.payload(), b"literal wins\n");
    }

    #[test]
    fn test_unmatched_and_empty_messages() {
        let table = table();
        assert!(table.resolve("").is_none());
        assert!(table.resolve("unknown").is_none());
        assert!(table.resolve("nope:arg").is_none());
    }

    #[test]
    fn test_handler_sees_request_context() {
        let mut table = CommandTable::new();
        table.register_literal(
            "whoami",
            from_fn(|req| Some(Reply::text(req.peer.port().to_string()))),
        );
        let reply = table.dispatch("whoami", peer(), Palette::plain()).unwrap();
        assert_eq!(reply.payload(), b"40000");
    }

    #[test]
    fn test_handler_may_decline() {
        let mut table = CommandTable::new();
        table.register_namespace(
            "maybe",
            from_fn(|req| (!req.args.is_empty()).then(|| Reply::text(req.args))),
        );
        assert!(table.dispatch("maybe:", peer(), Palette::plain()).is_none());
        assert!(table.dispatch("maybe:x", peer(), Palette::plain()).is_some());
    }

    #[test]
    fn test_closing_reply() {
        let reply = Reply::text("bye\n").closing();
        assert!(reply.closes_session());
    }

    #[test]
    fn test_names_are_sorted() {
        let table = table();
        assert_eq!(
            table.literal_names().collect::<Vec<_>>(),
            vec!["echo:literal", "ping"]
        );
        assert_eq!(table.namespace_names().collect::<Vec<_>>(), vec!["echo"]);
    }
}
