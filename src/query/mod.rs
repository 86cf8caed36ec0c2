pub mod filters;
pub mod codec;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use filters::{effective_range, Bracket, ExperienceRange, EXPERIENCE_BRACKETS};

/// Sort order offered by list views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    #[serde(rename = "A-Z")]
    AToZ,
    #[serde(rename = "Z-A")]
    ZToA,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [Self::Newest, Self::Oldest, Self::AToZ, Self::ZToA];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::Oldest => "Oldest",
            Self::AToZ => "A-Z",
            Self::ZToA => "Z-A",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sort order '{}'", s))
    }
}

/// Employment type of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    Contract,
    Intern,
}

impl JobType {
    pub const ALL: [JobType; 4] = [Self::FullTime, Self::PartTime, Self::Contract, Self::Intern];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "Full-Time",
            Self::PartTime => "Part-Time",
            Self::Contract => "Contract",
            Self::Intern => "Intern",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown job type '{}'", s))
    }
}

/// A scalar field of [`QueryState`] that can be set directly
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Page(u32),
    Search(String),
    Location(String),
    Sort(SortOrder),
}

/// How a query edit should reach the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Nothing observable changed
    None,
    /// Text fields changed; applied on the next explicit search
    Deferred,
    /// Sort, filters or page changed; needs a fetch now
    Live,
}

/// Page, search text and filters of a list view.
///
/// Every mutator returns a new state. Any edit other than setting the page
/// puts the state back on page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    search: String,
    location: String,
    sort: SortOrder,
    job_types: BTreeSet<JobType>,
    brackets: BTreeSet<Bracket>,
    experience: Option<ExperienceRange>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            location: String::new(),
            sort: SortOrder::default(),
            job_types: BTreeSet::new(),
            brackets: BTreeSet::new(),
            experience: None,
        }
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn job_types(&self) -> &BTreeSet<JobType> {
        &self.job_types
    }

    pub fn brackets(&self) -> &BTreeSet<Bracket> {
        &self.brackets
    }

    /// Envelope of the selected brackets, or a range restored from a URL
    pub fn experience_range(&self) -> Option<ExperienceRange> {
        self.experience
    }

    pub fn set_field(&self, field: Field) -> Self {
        let mut next = self.clone();
        match field {
            Field::Page(page) => {
                next.page = page.max(1);
                return next;
            }
            Field::Search(search) => next.search = search,
            Field::Location(location) => next.location = location,
            Field::Sort(sort) => next.sort = sort,
        }
        next.page = 1;
        next
    }

    pub fn toggle_job_type(&self, job_type: JobType) -> Self {
        let mut next = self.clone();
        if !next.job_types.remove(&job_type) {
            next.job_types.insert(job_type);
        }
        next.page = 1;
        next
    }

    pub fn toggle_experience_bracket(&self, bracket: Bracket) -> Self {
        let mut next = self.clone();
        if !next.brackets.remove(&bracket) {
            next.brackets.insert(bracket);
        }
        next.experience = effective_range(&next.brackets);
        next.page = 1;
        next
    }

    /// Same query, one page further. Used by "load more".
    pub fn next_page(&self) -> Self {
        let mut next = self.clone();
        next.page = self.page.saturating_add(1);
        next
    }

    /// Same page, text and sort with the structured filters cleared
    pub fn without_filters(&self) -> Self {
        Self {
            job_types: BTreeSet::new(),
            brackets: BTreeSet::new(),
            experience: None,
            ..self.clone()
        }
    }

    /// Classify the edit from `self` to `next`.
    pub fn change_to(&self, next: &QueryState) -> Change {
        if self.sort != next.sort
            || self.job_types != next.job_types
            || self.experience != next.experience
            || self.page != next.page
        {
            Change::Live
        } else if self.search != next.search || self.location != next.location {
            Change::Deferred
        } else {
            Change::None
        }
    }

    pub fn serialize(&self) -> String {
        codec::encode(self)
    }

    pub fn deserialize(input: &str) -> Self {
        codec::decode(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = QueryState::new();
        assert_eq!(q.page(), 1);
        assert_eq!(q.sort(), SortOrder::Newest);
        assert!(q.search().is_empty());
        assert!(q.experience_range().is_none());
    }

    #[test]
    fn test_set_field_resets_page() {
        let q = QueryState::new().set_field(Field::Page(4));
        assert_eq!(q.page(), 4);

        let q = q.set_field(Field::Sort(SortOrder::AToZ));
        assert_eq!(q.page(), 1);
        assert_eq!(q.sort(), SortOrder::AToZ);

        let q = q.set_field(Field::Page(3)).set_field(Field::Search("rust".into()));
        assert_eq!(q.page(), 1);
        assert_eq!(q.search(), "rust");
    }

    #[test]
    fn test_page_zero_clamps_to_one() {
        assert_eq!(QueryState::new().set_field(Field::Page(0)).page(), 1);
    }

    #[test]
    fn test_toggle_job_type_is_involution() {
        let base = QueryState::new().toggle_job_type(JobType::Contract);
        let twice = base.toggle_job_type(JobType::Intern).toggle_job_type(JobType::Intern);
        assert_eq!(twice.job_types(), base.job_types());
    }

    #[test]
    fn test_toggle_resets_page() {
        let q = QueryState::new()
            .set_field(Field::Page(5))
            .toggle_job_type(JobType::FullTime);
        assert_eq!(q.page(), 1);

        let q = q
            .set_field(Field::Page(2))
            .toggle_experience_bracket(Bracket::new(0, 1));
        assert_eq!(q.page(), 1);
    }

    #[test]
    fn test_bracket_toggle_recomputes_range() {
        let q = QueryState::new()
            .toggle_experience_bracket(Bracket::new(0, 1))
            .toggle_experience_bracket(Bracket::new(3, 5));
        assert_eq!(q.experience_range(), Some(ExperienceRange { min: 0, max: 5 }));

        let q = q.toggle_experience_bracket(Bracket::new(0, 1));
        assert_eq!(q.experience_range(), Some(ExperienceRange { min: 3, max: 5 }));

        let q = q.toggle_experience_bracket(Bracket::new(3, 5));
        assert_eq!(q.experience_range(), None);
    }

    #[test]
    fn test_change_classification() {
        let q = QueryState::new();
        assert_eq!(q.change_to(&q.clone()), Change::None);
        assert_eq!(q.change_to(&q.set_field(Field::Search("go".into()))), Change::Deferred);
        assert_eq!(q.change_to(&q.set_field(Field::Location("Oslo".into()))), Change::Deferred);
        assert_eq!(q.change_to(&q.set_field(Field::Sort(SortOrder::Oldest))), Change::Live);
        assert_eq!(q.change_to(&q.toggle_job_type(JobType::Intern)), Change::Live);
        assert_eq!(q.change_to(&q.next_page()), Change::Live);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("z-a".parse::<SortOrder>(), Ok(SortOrder::ZToA));
        assert_eq!("full-time".parse::<JobType>(), Ok(JobType::FullTime));
        assert!("Freelance".parse::<JobType>().is_err());
    }
}
