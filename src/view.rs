//! Per-list view state: one explicit struct per screen with a
//! reducer-style transition function.
//!
//! The state machine is `Loading -> Ready -> Loading` on explicit
//! reload, with `Error` reachable only from a failed load and left only
//! by another explicit load. Dialogs are mutually exclusive overlay
//! states inside `Ready`; they never touch the loaded snapshot until
//! their confirming action writes and triggers a reload.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::{OpsdeckError, Result};
use crate::pipeline::{
    filter, paginate, sorted, ColumnSet, Direction, FilterSet, Listable, Page, PageSize,
    TimeBucket,
};

/// Dialog currently open over a ready list, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Create,
    Edit,
    Assign,
    Share,
    Details,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPhase {
    Loading,
    Ready { overlay: Overlay },
    Error { message: String },
}

/// Everything the user can adjust about how the list is presented.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filters: FilterSet,
    pub sort_field: String,
    pub direction: Direction,
    pub page_index: usize,
    pub page_size: PageSize,
    pub columns: ColumnSet,
}

impl ListQuery {
    pub fn new(columns: ColumnSet) -> Self {
        Self {
            filters: FilterSet::new(),
            // Matches the load order: newest first.
            sort_field: "created_at".to_string(),
            direction: Direction::Descending,
            page_index: 0,
            page_size: PageSize::default(),
            columns,
        }
    }
}

/// A user interaction with the list presentation.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    SetSearch(String),
    /// Toggle one accepted value inside a categorical dimension.
    ToggleDimension { dimension: String, value: String },
    SetBuckets(BTreeSet<TimeBucket>),
    SetSort { field: String, direction: Direction },
    GoToPage(usize),
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    SetPageSize(PageSize),
    ToggleColumn(String),
    ResetColumns,
    OpenOverlay(Overlay),
    CloseOverlay,
}

/// One list view: the loaded snapshot plus presentation state.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    records: Vec<T>,
    pub query: ListQuery,
    phase: ViewPhase,
    write_in_flight: bool,
}

impl<T: Listable + Clone> ListView<T> {
    pub fn new(columns: ColumnSet) -> Self {
        Self {
            records: Vec::new(),
            query: ListQuery::new(columns),
            phase: ViewPhase::Loading,
            write_in_flight: false,
        }
    }

    pub fn phase(&self) -> &ViewPhase {
        &self.phase
    }

    /// The raw loaded snapshot, unfiltered.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Run the full pipeline for the current query.
    pub fn visible_page(&self, today: NaiveDate) -> Page<T> {
        let filtered = filter(&self.records, &self.query.filters, today);
        let ordered = sorted(&filtered, &self.query.sort_field, self.query.direction);
        paginate(&ordered, self.query.page_index, self.query.page_size)
    }

    fn total_pages(&self, today: NaiveDate) -> usize {
        let matching = self
            .records
            .iter()
            .filter(|r| self.query.filters.matches(*r, today))
            .count();
        matching.div_ceil(self.query.page_size.as_usize())
    }

    /// Apply one interaction. Changing the search term, any categorical
    /// filter, the time buckets or the page size resets the page index
    /// to zero; navigation clamps at the boundaries.
    pub fn apply(&mut self, event: ViewEvent, today: NaiveDate) {
        match event {
            ViewEvent::SetSearch(term) => {
                self.query.filters.search = term;
                self.query.page_index = 0;
            }
            ViewEvent::ToggleDimension { dimension, value } => {
                let value = value.to_lowercase();
                let accepted = self.query.filters.dimensions.entry(dimension).or_default();
                if !accepted.remove(&value) {
                    accepted.insert(value);
                }
                self.query.page_index = 0;
            }
            ViewEvent::SetBuckets(buckets) => {
                self.query.filters.buckets = buckets;
                self.query.page_index = 0;
            }
            ViewEvent::SetSort { field, direction } => {
                self.query.sort_field = field;
                self.query.direction = direction;
            }
            ViewEvent::GoToPage(index) => {
                let last = self.total_pages(today).saturating_sub(1);
                self.query.page_index = index.min(last);
            }
            ViewEvent::NextPage => {
                if self.query.page_index + 1 < self.total_pages(today) {
                    self.query.page_index += 1;
                }
            }
            ViewEvent::PrevPage => {
                self.query.page_index = self.query.page_index.saturating_sub(1);
            }
            ViewEvent::FirstPage => {
                self.query.page_index = 0;
            }
            ViewEvent::LastPage => {
                self.query.page_index = self.total_pages(today).saturating_sub(1);
            }
            ViewEvent::SetPageSize(size) => {
                self.query.page_size = size;
                self.query.page_index = 0;
            }
            ViewEvent::ToggleColumn(key) => {
                self.query.columns.toggle(&key);
            }
            ViewEvent::ResetColumns => {
                self.query.columns.show_all();
            }
            ViewEvent::OpenOverlay(overlay) => {
                if let ViewPhase::Ready {
                    overlay: Overlay::None,
                } = self.phase
                {
                    self.phase = ViewPhase::Ready { overlay };
                }
            }
            ViewEvent::CloseOverlay => {
                if let ViewPhase::Ready { .. } = self.phase {
                    self.phase = ViewPhase::Ready {
                        overlay: Overlay::None,
                    };
                }
            }
        }
    }

    /// Explicit reload entry point; the only way out of `Error`.
    pub fn begin_load(&mut self) {
        self.phase = ViewPhase::Loading;
    }

    /// Install a fresh snapshot, or clear the list on a failed primary
    /// load. The page index is clamped so a shrunken result set never
    /// strands the view past the last page.
    pub fn finish_load(&mut self, outcome: Result<Vec<T>>, today: NaiveDate) {
        match outcome {
            Ok(records) => {
                self.records = records;
                self.phase = ViewPhase::Ready {
                    overlay: Overlay::None,
                };
                let last = self.total_pages(today).saturating_sub(1);
                self.query.page_index = self.query.page_index.min(last);
            }
            Err(e) => {
                self.records.clear();
                self.phase = ViewPhase::Error {
                    message: e.to_string(),
                };
            }
        }
    }

    /// Claim the single write slot for this view. A second write started
    /// before the first resolves is rejected rather than interleaved.
    pub fn begin_write(&mut self) -> Result<()> {
        if self.write_in_flight {
            return Err(OpsdeckError::WriteInFlight);
        }
        self.write_in_flight = true;
        Ok(())
    }

    /// Release the write slot. Failed writes leave the snapshot as it
    /// was; successful ones are followed by an explicit reload.
    pub fn finish_write(&mut self) {
        self.write_in_flight = false;
    }
}
