//! Catalog view pipeline
//!
//! The browsing state (query, sort, page, category) is an explicit value and every view is
//! computed by the fixed pipeline
//! `listing -> category filter -> text filter -> sort -> paginate`.
//! Nothing is cached between runs: any change to the state or the listing recomputes the
//! whole pipeline.

use crate::models::{ReportCategory, ReportEntry};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sortable report field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    #[default]
    CreationTime,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "creationtime" | "creation_time" => Ok(SortField::CreationTime),
            other => Err(format!("Invalid sort field: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Invalid sort direction: {}", other)),
        }
    }
}

/// The enumerated set of allowed page sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizes(Vec<usize>);

impl PageSizes {
    /// Build an option set; sizes are sorted and deduplicated, zero is rejected.
    pub fn new(mut options: Vec<usize>) -> Result<Self, String> {
        if options.is_empty() {
            return Err("Page size options cannot be empty".to_string());
        }
        if options.contains(&0) {
            return Err("Page size options must be greater than 0".to_string());
        }
        options.sort_unstable();
        options.dedup();
        Ok(Self(options))
    }

    pub fn contains(&self, size: usize) -> bool {
        self.0.contains(&size)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl Default for PageSizes {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE_OPTIONS.to_vec())
    }
}

/// Product configuration of the catalog view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub page_sizes: PageSizes,
    pub default_page_size: usize,
    /// Daily / monthly partitioning. Some deployments show a single flat table.
    pub categories_enabled: bool,
    /// Jump back to the first page when the query or category changes.
    pub reset_page_on_filter_change: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            page_sizes: PageSizes::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
            categories_enabled: true,
            reset_page_on_filter_change: false,
        }
    }
}

/// Serializable browsing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    pub query: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page_index: usize,
    pub page_size: usize,
    pub category: Option<ReportCategory>,
}

impl CatalogState {
    /// Newest reports first, first page, daily tab when categories are enabled.
    pub fn initial(settings: &CatalogSettings) -> Self {
        Self {
            query: String::new(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            page_index: 0,
            page_size: settings.default_page_size,
            category: settings
                .categories_enabled
                .then_some(ReportCategory::Daily),
        }
    }

    /// Check the state against the product settings.
    pub fn validate(&self, settings: &CatalogSettings) -> Result<(), String> {
        if !settings.page_sizes.contains(self.page_size) {
            return Err(format!(
                "Invalid page size {}, allowed: {:?}",
                self.page_size,
                settings.page_sizes.as_slice()
            ));
        }
        if self.category.is_some() && !settings.categories_enabled {
            return Err("Report categories are disabled".to_string());
        }
        Ok(())
    }

    /// Run the full pipeline over `listing`.
    pub fn apply(&self, listing: &[ReportEntry]) -> CatalogPage {
        let query = self.query.to_lowercase();

        let mut selected: Vec<&ReportEntry> = listing
            .iter()
            .filter(|entry| match self.category {
                Some(category) => entry.category() == Some(category),
                None => true,
            })
            .filter(|entry| query.is_empty() || entry.name.to_lowercase().contains(&query))
            .collect();

        sort_entries(&mut selected, self.sort_field, self.sort_direction);

        let total = selected.len();
        let page_size = self.page_size.max(1);
        let items = paginate(&selected, self.page_index, page_size)
            .iter()
            .map(|entry| (*entry).clone())
            .collect();

        CatalogPage {
            items,
            total,
            page_index: self.page_index,
            page_size,
            page_count: total.div_ceil(page_size),
            category: self.category,
        }
    }
}

/// One rendered page of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub items: Vec<ReportEntry>,
    /// Number of entries left after category and text filtering
    pub total: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub category: Option<ReportCategory>,
}

fn compare(a: &ReportEntry, b: &ReportEntry, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::CreationTime => a.creation_time.cmp(&b.creation_time),
    }
}

/// Stable sort; entries with equal keys keep their relative order in both directions.
pub fn sort_entries(entries: &mut [&ReportEntry], field: SortField, direction: SortDirection) {
    match direction {
        SortDirection::Asc => entries.sort_by(|a, b| compare(a, b, field)),
        SortDirection::Desc => entries.sort_by(|a, b| compare(b, a, field)),
    }
}

/// `items[page_index * page_size .. (page_index + 1) * page_size]`, clamped to the length.
///
/// An out-of-range page yields an empty slice.
pub fn paginate<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    let start = page_index.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Client-side catalog: current listing, browsing state and fetch status.
#[derive(Debug, Clone)]
pub struct CatalogView {
    settings: CatalogSettings,
    state: CatalogState,
    listing: Vec<ReportEntry>,
    loading: bool,
    last_error: Option<String>,
}

impl CatalogView {
    pub fn new(settings: CatalogSettings) -> Self {
        let state = CatalogState::initial(&settings);
        Self {
            settings,
            state,
            listing: Vec::new(),
            loading: false,
            last_error: None,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn listing(&self) -> &[ReportEntry] {
        &self.listing
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
    }

    /// Complete a listing fetch. A failed fetch leaves an empty catalog behind.
    pub fn finish_fetch(&mut self, result: Result<Vec<ReportEntry>, String>) {
        self.loading = false;
        match result {
            Ok(listing) => {
                self.listing = listing;
                self.last_error = None;
            }
            Err(message) => {
                self.listing.clear();
                self.last_error = Some(message);
            }
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.state.query {
            self.state.query = query;
            self.filter_changed();
        }
    }

    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) {
        self.state.sort_field = field;
        self.state.sort_direction = direction;
    }

    /// Ignored when categories are disabled.
    pub fn set_category(&mut self, category: ReportCategory) {
        if !self.settings.categories_enabled || self.state.category == Some(category) {
            return;
        }
        self.state.category = Some(category);
        self.filter_changed();
    }

    pub fn set_page(&mut self, page_index: usize) {
        self.state.page_index = page_index;
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), String> {
        if !self.settings.page_sizes.contains(page_size) {
            return Err(format!(
                "Invalid page size {}, allowed: {:?}",
                page_size,
                self.settings.page_sizes.as_slice()
            ));
        }
        self.state.page_size = page_size;
        Ok(())
    }

    /// The page currently on screen.
    pub fn visible(&self) -> CatalogPage {
        self.state.apply(&self.listing)
    }

    fn filter_changed(&mut self) {
        if self.settings.reset_page_on_filter_change {
            self.state.page_index = 0;
        }
    }
}
