//! Filter, sort and paginate the in-memory segment list.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::segment::Segment;

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Name,
    Distance,
    ElevationGain,
    ElevationLoss,
    CrownHolder,
    CrownDate,
    CrownTime,
    CrownPace,
    PbTime,
    PbPace,
    PbAttempts,
    Attempts,
    Difficulty,
    LastAttempt,
    Claim,
    Completed,
}

impl SortColumn {
    pub const ALL: [SortColumn; 16] = [
        SortColumn::Name,
        SortColumn::Distance,
        SortColumn::ElevationGain,
        SortColumn::ElevationLoss,
        SortColumn::CrownHolder,
        SortColumn::CrownDate,
        SortColumn::CrownTime,
        SortColumn::CrownPace,
        SortColumn::PbTime,
        SortColumn::PbPace,
        SortColumn::PbAttempts,
        SortColumn::Attempts,
        SortColumn::Difficulty,
        SortColumn::LastAttempt,
        SortColumn::Claim,
        SortColumn::Completed,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Distance => "distance",
            SortColumn::ElevationGain => "elevation_gain",
            SortColumn::ElevationLoss => "elevation_loss",
            SortColumn::CrownHolder => "crown_holder",
            SortColumn::CrownDate => "crown_date",
            SortColumn::CrownTime => "crown_time",
            SortColumn::CrownPace => "crown_pace",
            SortColumn::PbTime => "pb_time",
            SortColumn::PbPace => "pb_pace",
            SortColumn::PbAttempts => "pb_attempts",
            SortColumn::Attempts => "attempts",
            SortColumn::Difficulty => "difficulty",
            SortColumn::LastAttempt => "last_attempt",
            SortColumn::Claim => "claim",
            SortColumn::Completed => "completed",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Name => "Segment",
            SortColumn::Distance => "Distance",
            SortColumn::ElevationGain => "Gain",
            SortColumn::ElevationLoss => "Loss",
            SortColumn::CrownHolder => "Crown",
            SortColumn::CrownDate => "Crown Date",
            SortColumn::CrownTime => "Crown Time",
            SortColumn::CrownPace => "Crown Pace",
            SortColumn::PbTime => "PB Time",
            SortColumn::PbPace => "PB Pace",
            SortColumn::PbAttempts => "PB Tries",
            SortColumn::Attempts => "Attempts",
            SortColumn::Difficulty => "Difficulty",
            SortColumn::LastAttempt => "Last Attempt",
            SortColumn::Claim => "Dibs",
            SortColumn::Completed => "Done",
        }
    }

    fn key(self, s: &Segment) -> SortKey<'_> {
        match self {
            SortColumn::Name => SortKey::Text(Some(s.name.as_str())),
            SortColumn::Distance => SortKey::Float(s.distance),
            SortColumn::ElevationGain => SortKey::Float(s.elevation_gain),
            SortColumn::ElevationLoss => SortKey::Float(s.elevation_loss),
            SortColumn::CrownHolder => SortKey::Text(s.crown_holder.as_deref()),
            SortColumn::CrownDate => {
                SortKey::Int(s.crown_date.map(|d| i64::from(d.num_days_from_ce())))
            }
            SortColumn::CrownTime => SortKey::Int(s.crown_time.map(i64::from)),
            SortColumn::CrownPace => SortKey::Float(s.crown_pace),
            SortColumn::PbTime => SortKey::Int(s.pb_time.map(i64::from)),
            SortColumn::PbPace => SortKey::Float(s.pb_pace),
            SortColumn::PbAttempts => SortKey::Int(s.pb_attempts.map(i64::from)),
            SortColumn::Attempts => SortKey::Int(s.attempts.map(i64::from)),
            SortColumn::Difficulty => SortKey::Text(s.difficulty.as_deref()),
            SortColumn::LastAttempt => {
                SortKey::Int(s.last_attempt_date.map(|d| i64::from(d.num_days_from_ce())))
            }
            SortColumn::Claim => SortKey::Text(s.claim.as_deref()),
            SortColumn::Completed => SortKey::Int(Some(i64::from(s.completed))),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown sort column '{s}'"))
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// The sort a click on the `column` header produces.
    #[must_use]
    pub fn toggled_for(self, column: SortColumn) -> Self {
        if self.column == column {
            Self::new(column, self.direction.toggle())
        } else {
            Self::new(column, SortDirection::Asc)
        }
    }
}

enum SortKey<'a> {
    Text(Option<&'a str>),
    Int(Option<i64>),
    Float(Option<f64>),
}

impl SortKey<'_> {
    fn is_missing(&self) -> bool {
        match self {
            SortKey::Text(v) => v.is_none_or(|s| s.trim().is_empty()),
            SortKey::Int(v) => v.is_none(),
            SortKey::Float(v) => v.is_none_or(f64::is_nan),
        }
    }

    fn cmp_present(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(Some(a)), SortKey::Text(Some(b))) => cmp_text(a, b),
            (SortKey::Int(Some(a)), SortKey::Int(Some(b))) => a.cmp(b),
            (SortKey::Float(Some(a)), SortKey::Float(Some(b))) => a.total_cmp(b),
            _ => Ordering::Equal,
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    let lower_a = a.chars().flat_map(char::to_lowercase);
    let lower_b = b.chars().flat_map(char::to_lowercase);
    lower_a.cmp(lower_b)
}

fn compare(a: &Segment, b: &Segment, spec: SortSpec) -> Ordering {
    let (ka, kb) = (spec.column.key(a), spec.column.key(b));
    match (ka.is_missing(), kb.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = ka.cmp_present(&kb);
            match spec.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Stable sort; missing values go last in both directions.
pub fn sort_segments(segments: &mut [Segment], spec: SortSpec) {
    segments.sort_by(|a, b| compare(a, b, spec));
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClaimFilter {
    #[default]
    All,
    Claimed,
    Unclaimed,
}

macro_rules! query_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(format!("unknown {} '{other}'", stringify!($ty))),
                }
            }
        }
    };
}

query_enum!(StatusFilter { All => "all", Completed => "completed", Incomplete => "incomplete" });
query_enum!(ClaimFilter { All => "all", Claimed => "claimed", Unclaimed => "unclaimed" });

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Filter {
    pub query: String,
    pub status: StatusFilter,
    pub claim: ClaimFilter,
}

impl Filter {
    #[must_use]
    pub fn matches(&self, segment: &Segment) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Completed => segment.completed,
            StatusFilter::Incomplete => !segment.completed,
        };
        let claim_ok = match self.claim {
            ClaimFilter::All => true,
            ClaimFilter::Claimed => segment.is_claimed(),
            ClaimFilter::Unclaimed => !segment.is_claimed(),
        };
        status_ok && claim_ok && self.matches_query(segment)
    }

    fn matches_query(&self, segment: &Segment) -> bool {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            Some(segment.name.as_str()),
            segment.claim.as_deref(),
            segment.crown_holder.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub first_index: usize,
    pub last_index: usize,
    pub total: usize,
}

impl PageInfo {
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

impl Pagination {
    /// Clamps page size and page into range for `total` rows.
    #[must_use]
    pub fn page_info(&self, total: usize) -> PageInfo {
        let page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        let page_count = total.div_ceil(page_size);
        let page = self.page.clamp(1, page_count.max(1));
        let first_index = ((page - 1) * page_size).min(total);
        let last_index = (first_index + page_size).min(total);
        PageInfo {
            page,
            page_size,
            page_count,
            first_index,
            last_index,
            total,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    pub rows: Vec<Segment>,
    pub page: PageInfo,
    /// Size of the unfiltered list.
    pub unfiltered_total: usize,
}

#[must_use]
pub fn build_listing(
    segments: &[Segment],
    filter: &Filter,
    sort: SortSpec,
    pagination: Pagination,
) -> Listing {
    let mut filtered: Vec<Segment> = segments
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect();
    sort_segments(&mut filtered, sort);

    let page = pagination.page_info(filtered.len());
    let rows = filtered[page.first_index..page.last_index].to_vec();

    Listing {
        rows,
        page,
        unfiltered_total: segments.len(),
    }
}

/// Filter, sort and page as carried in query strings.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TableState {
    pub filter: Filter,
    pub sort: SortSpec,
    pub pagination: Pagination,
}

impl TableState {
    /// Reads `page`, `size`, `sort`, `dir`, `q`, `status` and `claimed`.
    /// Values that do not parse fall back to their defaults.
    #[must_use]
    pub fn from_query<S: BuildHasher>(
        query: &HashMap<String, String, S>,
        default_page_size: usize,
    ) -> Self {
        fn parsed<T: FromStr + Default, S: BuildHasher>(
            query: &HashMap<String, String, S>,
            key: &str,
        ) -> T {
            query
                .get(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or_default()
        }

        let page = query
            .get("page")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1);
        let page_size = query
            .get("size")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default_page_size);

        Self {
            filter: Filter {
                query: query.get("q").map(|q| q.trim().to_string()).unwrap_or_default(),
                status: parsed(query, "status"),
                claim: parsed(query, "claimed"),
            },
            sort: SortSpec::new(parsed(query, "sort"), parsed(query, "dir")),
            pagination: Pagination {
                page,
                page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            },
        }
    }

    #[must_use]
    pub fn with_page(&self, page: usize) -> Self {
        let mut next = self.clone();
        next.pagination.page = page;
        next
    }

    /// Header clicks go back to the first page.
    #[must_use]
    pub fn with_sort_toggled(&self, column: SortColumn) -> Self {
        let mut next = self.clone();
        next.sort = self.sort.toggled_for(column);
        next.pagination.page = 1;
        next
    }

    #[must_use]
    pub fn query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        out.append_pair("page", &self.pagination.page.to_string())
            .append_pair("size", &self.pagination.page_size.to_string())
            .append_pair("sort", self.sort.column.as_str())
            .append_pair("dir", self.sort.direction.as_str());
        if !self.filter.query.is_empty() {
            out.append_pair("q", &self.filter.query);
        }
        out.append_pair("status", self.filter.status.as_str())
            .append_pair("claimed", self.filter.claim.as_str());
        out.finish()
    }
}
