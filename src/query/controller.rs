//! Query state controller
//!
//! Owns the current [`QueryDescriptor`] and hands out versioned request
//! tickets. A response is applied only if its ticket is still the latest one
//! dispatched, so when the user changes filters faster than the server
//! answers, only the last request wins.

use tracing::debug;

use super::descriptor::{FilterChange, QueryDescriptor, SortColumn};

/// Identifies one dispatched list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    version: u64,
    descriptor: QueryDescriptor,
}

impl RequestTicket {
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Descriptor the request was built from
    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }
}

/// Current query state plus the staleness guard
#[derive(Debug, Clone)]
pub struct QueryController {
    descriptor: QueryDescriptor,
    version: u64,
    dispatched: Option<u64>,
    total_pages: Option<u32>,
}

impl Default for QueryController {
    fn default() -> Self {
        Self::new(QueryDescriptor::default())
    }
}

impl QueryController {
    pub fn new(descriptor: QueryDescriptor) -> Self {
        Self {
            descriptor,
            version: 0,
            dispatched: None,
            total_pages: None,
        }
    }

    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    /// Page count from the last applied response, if any
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Apply a partial filter update; always lands on page 1
    pub fn set_filter(&mut self, change: FilterChange) -> bool {
        let next = self.descriptor.with_filter(change);
        self.replace(next)
    }

    pub fn set_sort(&mut self, column: SortColumn) -> bool {
        let next = self.descriptor.with_sort(column);
        self.replace(next)
    }

    /// Move to page `n`, clamped to the last known page count
    pub fn set_page(&mut self, n: u32) -> bool {
        let next = self.descriptor.with_page(n, self.total_pages);
        self.replace(next)
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.descriptor.page().saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        self.set_page(self.descriptor.page().saturating_sub(1))
    }

    pub fn clear_filters(&mut self) -> bool {
        let next = self.descriptor.cleared();
        self.replace(next)
    }

    /// Whether the user can page forward from here
    pub fn has_next_page(&self) -> bool {
        matches!(self.total_pages, Some(total) if self.descriptor.page() < total)
    }

    pub fn has_previous_page(&self) -> bool {
        self.descriptor.page() > 1
    }

    /// Record that a request for the current descriptor is going out
    pub fn dispatch(&mut self) -> RequestTicket {
        self.dispatched = Some(self.version);
        RequestTicket {
            version: self.version,
            descriptor: self.descriptor.clone(),
        }
    }

    /// Whether a response for `ticket` may still be applied
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.version == self.version && ticket.descriptor == self.descriptor
    }

    /// Remember the page count of an applied response
    ///
    /// Returns false and leaves state untouched when the ticket is stale.
    pub fn record_total_pages(&mut self, ticket: &RequestTicket, total_pages: u32) -> bool {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.version,
                current = self.version,
                "Ignoring page count from stale request"
            );
            return false;
        }
        self.total_pages = Some(total_pages);
        true
    }

    /// Whether the current descriptor has changed since the last dispatch
    pub fn needs_fetch(&self) -> bool {
        self.dispatched != Some(self.version)
    }

    fn replace(&mut self, next: QueryDescriptor) -> bool {
        if next == self.descriptor {
            return false;
        }
        self.descriptor = next;
        self.version += 1;
        debug!(version = self.version, query = %self.descriptor.to_query_string(), "Query changed");
        true
    }
}
