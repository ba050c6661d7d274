//! Filter/sort/page descriptor
//!
//! `QueryDescriptor` is the immutable value that fully determines one list
//! request. Every transition returns a new descriptor; nothing mutates one in
//! place.
//!
//! ```rust
//! use ed_explorer::query::{FilterChange, Gender, QueryDescriptor, SortColumn};
//!
//! let descriptor = QueryDescriptor::default()
//!     .with_filter(FilterChange::new().gender(Some(Gender::Female)))
//!     .with_sort(SortColumn::StayId);
//!
//! assert_eq!(descriptor.page(), 1);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{QueryError, QueryResult};

/// Page size used when nothing else is configured
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size the API serves
pub const MAX_PER_PAGE: u32 = 100;

/// Patient gender filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// Single-letter wire code
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" => Ok(Gender::Male),
            "F" | "FEMALE" => Ok(Gender::Female),
            _ => Err(QueryError::InvalidGender(s.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Columns the list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    StayId,
    Intime,
    Outtime,
    Disposition,
}

impl SortColumn {
    pub fn all() -> &'static [SortColumn] {
        &[
            SortColumn::StayId,
            SortColumn::Intime,
            SortColumn::Outtime,
            SortColumn::Disposition,
        ]
    }

    /// Wire value for `sort_by`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::StayId => "stay_id",
            SortColumn::Intime => "intime",
            SortColumn::Outtime => "outtime",
            SortColumn::Disposition => "disposition",
        }
    }

    /// Column header text
    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::StayId => "Stay ID",
            SortColumn::Intime => "Arrival",
            SortColumn::Outtime => "Departure",
            SortColumn::Disposition => "Disposition",
        }
    }
}

impl FromStr for SortColumn {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "stay_id" | "stay" => Ok(SortColumn::StayId),
            "intime" | "arrival" => Ok(SortColumn::Intime),
            "outtime" | "departure" => Ok(SortColumn::Outtime),
            "disposition" => Ok(SortColumn::Disposition),
            _ => Err(QueryError::InvalidSortColumn(s.to_string())),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Arrow shown next to the active column header
    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(QueryError::InvalidSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a `YYYY-MM-DD` filter date
pub fn parse_date(raw: &str) -> QueryResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| QueryError::InvalidDate(raw.to_string()))
}

/// A partial update to the filter fields
///
/// Fields left untouched keep their current value. For the nullable fields
/// `Some(None)` clears the filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChange {
    gender: Option<Option<Gender>>,
    races: Option<Vec<String>>,
    dispositions: Option<Vec<String>>,
    date_from: Option<Option<NaiveDate>>,
    date_to: Option<Option<NaiveDate>>,
    chief_complaint: Option<Option<String>>,
}

impl FilterChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gender(mut self, gender: Option<Gender>) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Replace the race selection
    pub fn races<I, S>(mut self, races: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.races = Some(races.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the disposition selection
    pub fn dispositions<I, S>(mut self, dispositions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispositions = Some(dispositions.into_iter().map(Into::into).collect());
        self
    }

    pub fn date_from(mut self, date: Option<NaiveDate>) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: Option<NaiveDate>) -> Self {
        self.date_to = Some(date);
        self
    }

    /// Set the chief-complaint search; an empty string clears it
    pub fn chief_complaint(mut self, text: Option<impl Into<String>>) -> Self {
        let text = text.map(Into::into).filter(|t: &String| !t.is_empty());
        self.chief_complaint = Some(text);
        self
    }

    /// True when applying this change would touch no field
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything that determines one list request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryDescriptor {
    gender: Option<Gender>,
    races: Vec<String>,
    dispositions: Vec<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    chief_complaint: Option<String>,
    page: u32,
    per_page: u32,
    sort_by: SortColumn,
    sort_order: SortOrder,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl QueryDescriptor {
    /// Unfiltered first page, newest arrivals first
    ///
    /// The page size is clamped into the range the API serves.
    pub fn new(per_page: u32) -> Self {
        Self {
            gender: None,
            races: Vec::new(),
            dispositions: Vec::new(),
            date_from: None,
            date_to: None,
            chief_complaint: None,
            page: 1,
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            sort_by: SortColumn::Intime,
            sort_order: SortOrder::Desc,
        }
    }

    /// Builder method: initial ordering
    pub fn sorted(mut self, column: SortColumn, order: SortOrder) -> Self {
        self.sort_by = column;
        self.sort_order = order;
        self
    }

    /// Builder method: open directly on a page (deep links, CLI)
    ///
    /// Unlike [`with_page`](Self::with_page) there is no known page count to
    /// clamp against yet, so only the lower bound is enforced.
    pub fn starting_at(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn races(&self) -> &[String] {
        &self.races
    }

    pub fn dispositions(&self) -> &[String] {
        &self.dispositions
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    pub fn chief_complaint(&self) -> Option<&str> {
        self.chief_complaint.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn sort_by(&self) -> SortColumn {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Whether any filter field is set
    pub fn has_active_filters(&self) -> bool {
        self.gender.is_some()
            || !self.races.is_empty()
            || !self.dispositions.is_empty()
            || self.date_from.is_some()
            || self.date_to.is_some()
            || self.chief_complaint.is_some()
    }

    /// Apply a partial filter update and go back to page 1
    ///
    /// Date ordering is not checked; a reversed range is sent as-is and the
    /// server answers with an empty page.
    pub fn with_filter(&self, change: FilterChange) -> Self {
        let mut next = self.clone();

        if let Some(gender) = change.gender {
            next.gender = gender;
        }
        if let Some(races) = change.races {
            next.races = dedup_in_order(races);
        }
        if let Some(dispositions) = change.dispositions {
            next.dispositions = dedup_in_order(dispositions);
        }
        if let Some(date_from) = change.date_from {
            next.date_from = date_from;
        }
        if let Some(date_to) = change.date_to {
            next.date_to = date_to;
        }
        if let Some(chief_complaint) = change.chief_complaint {
            next.chief_complaint = chief_complaint;
        }

        next.page = 1;
        next
    }

    /// Toggle a race in the multi-select, keeping selection order
    pub fn with_race_toggled(&self, race: &str) -> Self {
        self.with_filter(FilterChange::new().races(toggled(&self.races, race)))
    }

    /// Toggle a disposition in the multi-select, keeping selection order
    pub fn with_disposition_toggled(&self, disposition: &str) -> Self {
        self.with_filter(FilterChange::new().dispositions(toggled(&self.dispositions, disposition)))
    }

    /// Click on a column header
    ///
    /// The active column flips direction; a new column starts descending.
    /// The page is kept.
    pub fn with_sort(&self, column: SortColumn) -> Self {
        let mut next = self.clone();
        if self.sort_by == column {
            next.sort_order = self.sort_order.flipped();
        } else {
            next.sort_by = column;
            next.sort_order = SortOrder::Desc;
        }
        next
    }

    /// Move to page `n`, clamped to `[1, total_pages]`
    ///
    /// Without a known page count (nothing loaded yet) the descriptor is
    /// returned unchanged.
    pub fn with_page(&self, n: u32, total_pages: Option<u32>) -> Self {
        match total_pages {
            Some(total) => {
                let mut next = self.clone();
                next.page = n.clamp(1, total.max(1));
                next
            }
            None => self.clone(),
        }
    }

    /// Drop every filter, keep sort and page size, go back to page 1
    pub fn cleared(&self) -> Self {
        Self::new(self.per_page).sorted(self.sort_by, self.sort_order)
    }

    /// Query parameters for `GET /encounters`
    ///
    /// Unset filters are omitted. Multi-valued filters repeat their key once
    /// per value in selection order. The order of keys is fixed so equal
    /// descriptors always serialize identically.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(gender) = self.gender {
            pairs.push(("gender", gender.code().to_string()));
        }
        for race in &self.races {
            pairs.push(("race", race.clone()));
        }
        for disposition in &self.dispositions {
            pairs.push(("disposition", disposition.clone()));
        }
        if let Some(date) = self.date_from {
            pairs.push(("date_from", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.date_to {
            pairs.push(("date_to", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(ref text) = self.chief_complaint {
            pairs.push(("chief_complaint", text.clone()));
        }

        pairs.push(("page", self.page.to_string()));
        pairs.push(("per_page", self.per_page.to_string()));
        pairs.push(("sort_by", self.sort_by.as_str().to_string()));
        pairs.push(("sort_order", self.sort_order.as_str().to_string()));

        pairs
    }

    /// Percent-encoded query string, without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Stable key for caching a fetched page
    pub fn cache_key(&self) -> String {
        format!("encounters?{}", self.to_query_string())
    }
}

fn dedup_in_order(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

fn toggled(current: &[String], value: &str) -> Vec<String> {
    if current.iter().any(|v| v == value) {
        current.iter().filter(|v| *v != value).cloned().collect()
    } else {
        let mut next = current.to_vec();
        next.push(value.to_string());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn on_page(page: u32) -> QueryDescriptor {
        QueryDescriptor::default().starting_at(page)
    }

    #[test]
    fn test_default_descriptor() {
        let d = QueryDescriptor::default();

        assert_eq!(d.page(), 1);
        assert_eq!(d.per_page(), 20);
        assert_eq!(d.sort_by(), SortColumn::Intime);
        assert_eq!(d.sort_order(), SortOrder::Desc);
        assert!(!d.has_active_filters());
    }

    #[test]
    fn test_per_page_is_clamped() {
        assert_eq!(QueryDescriptor::new(0).per_page(), 1);
        assert_eq!(QueryDescriptor::new(500).per_page(), MAX_PER_PAGE);
    }

    #[test]
    fn test_set_filter_resets_page() {
        let changes = vec![
            FilterChange::new().gender(Some(Gender::Male)),
            FilterChange::new().races(["WHITE"]),
            FilterChange::new().dispositions(["HOME", "ADMITTED"]),
            FilterChange::new().date_from(Some(date("2180-01-01"))),
            FilterChange::new().date_to(Some(date("2180-12-31"))),
            FilterChange::new().chief_complaint(Some("chest")),
            FilterChange::new(),
        ];

        for change in changes {
            for start in [1, 2, 7, 40] {
                assert_eq!(on_page(start).with_filter(change.clone()).page(), 1);
            }
        }
    }

    #[test]
    fn test_set_filter_scenario_gender() {
        let before = on_page(3);
        let after = before.with_filter(FilterChange::new().gender(Some(Gender::Female)));

        assert_eq!(after.gender(), Some(Gender::Female));
        assert_eq!(after.page(), 1);
        assert_eq!(after.sort_by(), SortColumn::Intime);
        assert_eq!(after.sort_order(), SortOrder::Desc);
        assert!(after.races().is_empty());
        assert!(after.dispositions().is_empty());
    }

    #[test]
    fn test_set_filter_leaves_untouched_fields() {
        let d = QueryDescriptor::default()
            .with_filter(FilterChange::new().races(["ASIAN"]).chief_complaint(Some("fever")));
        let d = d.with_filter(FilterChange::new().gender(Some(Gender::Male)));

        assert_eq!(d.races(), ["ASIAN".to_string()]);
        assert_eq!(d.chief_complaint(), Some("fever"));
        assert_eq!(d.gender(), Some(Gender::Male));
    }

    #[test]
    fn test_reversed_date_range_is_accepted() {
        let d = QueryDescriptor::default().with_filter(
            FilterChange::new()
                .date_from(Some(date("2181-01-01")))
                .date_to(Some(date("2180-01-01"))),
        );

        assert!(d.date_from() > d.date_to());
    }

    #[test]
    fn test_empty_chief_complaint_clears() {
        let d = QueryDescriptor::default().with_filter(FilterChange::new().chief_complaint(Some("pain")));
        let d = d.with_filter(FilterChange::new().chief_complaint(Some("")));
        assert_eq!(d.chief_complaint(), None);
    }

    #[test]
    fn test_multi_select_dedup_and_toggle() {
        let d = QueryDescriptor::default()
            .with_filter(FilterChange::new().races(["WHITE", "ASIAN", "WHITE", ""]));
        assert_eq!(d.races(), ["WHITE".to_string(), "ASIAN".to_string()]);

        let d = d.with_race_toggled("WHITE");
        assert_eq!(d.races(), ["ASIAN".to_string()]);

        let d = d.with_race_toggled("BLACK");
        assert_eq!(d.races(), ["ASIAN".to_string(), "BLACK".to_string()]);

        let d = d.with_disposition_toggled("HOME");
        assert_eq!(d.dispositions(), ["HOME".to_string()]);
    }

    #[test]
    fn test_set_sort_same_column_round_trip() {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            for column in SortColumn::all() {
                let d = QueryDescriptor::default().sorted(*column, order);
                let once = d.with_sort(*column);
                let twice = once.with_sort(*column);

                assert_eq!(once.sort_order(), order.flipped());
                assert_eq!(twice.sort_order(), order);
                assert_eq!(twice.sort_by(), *column);
            }
        }
    }

    #[test]
    fn test_set_sort_new_column_is_descending() {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            for current in SortColumn::all() {
                for requested in SortColumn::all().iter().filter(|c| *c != current) {
                    let d = QueryDescriptor::default().sorted(*current, order);
                    let next = d.with_sort(*requested);

                    assert_eq!(next.sort_by(), *requested);
                    assert_eq!(next.sort_order(), SortOrder::Desc);
                }
            }
        }
    }

    #[test]
    fn test_set_sort_keeps_page() {
        let d = on_page(4).with_sort(SortColumn::StayId);
        assert_eq!(d.page(), 4);
    }

    #[test]
    fn test_set_page_clamps() {
        let d = QueryDescriptor::default();

        assert_eq!(d.with_page(3, Some(10)).page(), 3);
        assert_eq!(d.with_page(0, Some(10)).page(), 1);
        assert_eq!(d.with_page(99, Some(10)).page(), 10);
        assert_eq!(d.with_page(5, Some(0)).page(), 1);
    }

    #[test]
    fn test_set_page_without_total_is_noop() {
        let d = on_page(2);
        assert_eq!(d.with_page(5, None), d);
    }

    #[test]
    fn test_clear_filters() {
        let d = QueryDescriptor::new(50)
            .sorted(SortColumn::Disposition, SortOrder::Asc)
            .with_filter(
                FilterChange::new()
                    .gender(Some(Gender::Female))
                    .races(["WHITE"])
                    .dispositions(["HOME"])
                    .date_from(Some(date("2180-01-01")))
                    .date_to(Some(date("2180-02-01")))
                    .chief_complaint(Some("cough")),
            )
            .with_page(3, Some(9));

        let cleared = d.cleared();

        assert!(!cleared.has_active_filters());
        assert_eq!(cleared.page(), 1);
        assert_eq!(cleared.per_page(), 50);
        assert_eq!(cleared.sort_by(), SortColumn::Disposition);
        assert_eq!(cleared.sort_order(), SortOrder::Asc);
    }

    #[test]
    fn test_query_pairs_default() {
        let pairs = QueryDescriptor::default().to_query_pairs();

        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_string()),
                ("per_page", "20".to_string()),
                ("sort_by", "intime".to_string()),
                ("sort_order", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_repeat_multi_values() {
        let d = QueryDescriptor::default().with_filter(
            FilterChange::new()
                .gender(Some(Gender::Male))
                .races(["WHITE", "BLACK/AFRICAN AMERICAN"])
                .dispositions(["HOME"])
                .date_from(Some(date("2180-01-01")))
                .chief_complaint(Some("chest pain")),
        );
        let pairs = d.to_query_pairs();

        let races: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| *k == "race")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(races, vec!["WHITE", "BLACK/AFRICAN AMERICAN"]);
        assert!(pairs.contains(&("gender", "M".to_string())));
        assert!(pairs.contains(&("date_from", "2180-01-01".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "date_to"));

        let query = d.to_query_string();
        assert!(query.starts_with("gender=M&race=WHITE&race=BLACK%2FAFRICAN%20AMERICAN&disposition=HOME"));
        assert!(query.contains("chief_complaint=chest%20pain"));
        assert!(query.ends_with("sort_by=intime&sort_order=desc"));
    }

    #[test]
    fn test_equal_descriptors_share_cache_key() {
        let a = QueryDescriptor::default().with_filter(FilterChange::new().races(["ASIAN"]));
        let b = QueryDescriptor::default()
            .with_filter(FilterChange::new().races(["ASIAN", "ASIAN"]));

        assert_eq!(a, b);
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), a.with_sort(SortColumn::StayId).cache_key());
    }

    #[test]
    fn test_parsing_helpers() {
        assert_eq!("f".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("stay_id".parse::<SortColumn>().unwrap(), SortColumn::StayId);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("X".parse::<Gender>().is_err());
        assert!(parse_date("2180-13-01").is_err());
    }
}
