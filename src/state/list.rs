//! Encounter list session
//!
//! Couples the query controller with the list view state. Callers change the
//! query, call [`ListSession::begin_fetch`] when
//! [`ListSession::needs_fetch`] says so, run the request, and hand the result
//! back through [`ListSession::complete`] with the same ticket.

use serde::Serialize;
use tracing::{debug, info};

use super::request::ViewState;
use crate::error::FetchResult;
use crate::model::EncounterPage;
use crate::query::{FilterChange, QueryController, QueryDescriptor, RequestTicket, SortColumn};

/// The "Showing X to Y of Z" footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub first: u64,
    pub last: u64,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

impl PageWindow {
    pub fn from_page(page: &EncounterPage) -> Self {
        let per_page = u64::from(page.per_page);
        let offset = u64::from(page.page.saturating_sub(1)) * per_page;
        let shown = page.items.len() as u64;
        let (first, last) = if shown == 0 {
            (0, 0)
        } else {
            (offset + 1, offset + shown)
        };

        Self {
            first,
            last,
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} encounters",
            self.first, self.last, self.total
        )
    }

    pub fn position(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages.max(1))
    }
}

/// List page state
#[derive(Debug, Clone, Default)]
pub struct ListSession {
    controller: QueryController,
    view: ViewState<EncounterPage>,
}

impl ListSession {
    pub fn new(descriptor: QueryDescriptor) -> Self {
        Self {
            controller: QueryController::new(descriptor),
            view: ViewState::Loading,
        }
    }

    pub fn descriptor(&self) -> &QueryDescriptor {
        self.controller.descriptor()
    }

    pub fn controller(&self) -> &QueryController {
        &self.controller
    }

    pub fn view(&self) -> &ViewState<EncounterPage> {
        &self.view
    }

    pub fn needs_fetch(&self) -> bool {
        self.controller.needs_fetch()
    }

    pub fn set_filter(&mut self, change: FilterChange) -> bool {
        self.controller.set_filter(change)
    }

    pub fn set_sort(&mut self, column: SortColumn) -> bool {
        self.controller.set_sort(column)
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        self.controller.set_page(page)
    }

    pub fn next_page(&mut self) -> bool {
        self.controller.next_page()
    }

    pub fn previous_page(&mut self) -> bool {
        self.controller.previous_page()
    }

    pub fn clear_filters(&mut self) -> bool {
        self.controller.clear_filters()
    }

    pub fn toggle_race(&mut self, race: &str) -> bool {
        let next = self.descriptor().with_race_toggled(race);
        self.replace_filters(next)
    }

    pub fn toggle_disposition(&mut self, disposition: &str) -> bool {
        let next = self.descriptor().with_disposition_toggled(disposition);
        self.replace_filters(next)
    }

    /// Mark a request for the current descriptor as in flight
    pub fn begin_fetch(&mut self) -> RequestTicket {
        let ticket = self.controller.dispatch();
        self.view = ViewState::Loading;
        debug!(
            version = ticket.version(),
            query = %ticket.descriptor().to_query_string(),
            "Fetching encounters"
        );
        ticket
    }

    /// Apply a finished request
    ///
    /// Returns false, and changes nothing, if the query moved on after the
    /// ticket was issued.
    pub fn complete(&mut self, ticket: &RequestTicket, result: FetchResult<EncounterPage>) -> bool {
        if !self.controller.is_current(ticket) {
            debug!(
                version = ticket.version(),
                "Discarding stale encounter page"
            );
            return false;
        }

        if let Ok(page) = &result {
            self.controller.record_total_pages(ticket, page.total_pages);
        }
        self.view = ViewState::resolve(result, EncounterPage::is_empty);
        info!(version = ticket.version(), state = self.view.kind(), "Encounter list updated");
        true
    }

    /// Footer numbers for the page on screen
    pub fn window(&self) -> Option<PageWindow> {
        self.view.ready().map(PageWindow::from_page)
    }

    fn replace_filters(&mut self, next: QueryDescriptor) -> bool {
        let change = FilterChange::new()
            .races(next.races().to_vec())
            .dispositions(next.dispositions().to_vec());
        self.controller.set_filter(change)
    }
}
