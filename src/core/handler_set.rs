//! Registered handlers
//!
//! Both lists are copy-on-write: dispatch takes a cheap snapshot per entry and
//! registration swaps in a new list, so adding a handler never races a
//! delivery in progress.

use super::handler::{LogHandler, NoticeHandler};
use parking_lot::RwLock;
use std::sync::Arc;

pub type HandlerList = Arc<[Arc<dyn LogHandler>]>;
pub type NoticeHandlerList = Arc<[Arc<dyn NoticeHandler>]>;

pub struct HandlerSet {
    handlers: RwLock<HandlerList>,
    notice_handlers: RwLock<NoticeHandlerList>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Arc::from(Vec::new())),
            notice_handlers: RwLock::new(Arc::from(Vec::new())),
        }
    }

    pub fn add_handler(&self, handler: Arc<dyn LogHandler>) {
        let mut handlers = self.handlers.write();
        let mut next = handlers.to_vec();
        next.push(handler);
        *handlers = Arc::from(next);
    }

    pub fn add_notice_handler(&self, handler: Arc<dyn NoticeHandler>) {
        let mut handlers = self.notice_handlers.write();
        let mut next = handlers.to_vec();
        next.push(handler);
        *handlers = Arc::from(next);
    }

    /// Regular handlers in registration order.
    pub fn handlers(&self) -> HandlerList {
        self.handlers.read().clone()
    }

    /// Notice handlers in registration order.
    pub fn notice_handlers(&self) -> NoticeHandlerList {
        self.notice_handlers.read().clone()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn notice_handler_count(&self) -> usize {
        self.notice_handlers.read().len()
    }
}

impl Default for HandlerSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::MemoryHandler;

    #[test]
    fn test_registration_order() {
        let set = HandlerSet::new();
        set.add_handler(Arc::new(MemoryHandler::named("first")));
        set.add_handler(Arc::new(MemoryHandler::named("second")));

        let names: Vec<_> = set.handlers().iter().map(|h| h.name().to_string()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(set.notice_handler_count(), 0);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_registration() {
        let set = HandlerSet::new();
        set.add_handler(Arc::new(MemoryHandler::new()));
        let snapshot = set.handlers();

        set.add_handler(Arc::new(MemoryHandler::new()));
        set.add_notice_handler(Arc::new(MemoryHandler::new()));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(set.handler_count(), 2);
        assert_eq!(set.notice_handler_count(), 1);
    }
}
