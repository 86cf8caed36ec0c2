//! Shareable URL query strings for [`QueryState`].
//!
//! Only non-default fields are written, in a fixed order, so equal states
//! always produce the same string. Decoding never fails: unknown keys are
//! ignored and malformed values leave the field at its default.

use tracing::debug;
use url::form_urlencoded;

use super::{ExperienceRange, JobType, QueryState, SortOrder};

pub const PAGE: &str = "page";
pub const SEARCH: &str = "search";
pub const LOCATION: &str = "location";
pub const SORT: &str = "sort";
pub const JOB_TYPE: &str = "jtype";
pub const EXPERIENCE: &str = "exp";

pub fn encode(state: &QueryState) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());

    if state.page > 1 {
        out.append_pair(PAGE, &state.page.to_string());
    }
    if !state.search.is_empty() {
        out.append_pair(SEARCH, &state.search);
    }
    if !state.location.is_empty() {
        out.append_pair(LOCATION, &state.location);
    }
    if state.sort != SortOrder::default() {
        out.append_pair(SORT, state.sort.as_str());
    }
    for job_type in &state.job_types {
        out.append_pair(JOB_TYPE, job_type.as_str());
    }
    if let Some(range) = state.experience {
        out.append_pair(EXPERIENCE, &range.to_string());
    }

    out.finish()
}

pub fn decode(input: &str) -> QueryState {
    let input = input.strip_prefix('?').unwrap_or(input);
    let mut state = QueryState::default();

    for (key, value) in form_urlencoded::parse(input.as_bytes()) {
        match key.as_ref() {
            PAGE => match value.parse::<u32>() {
                Ok(page) if page >= 1 => state.page = page,
                _ => debug!("Ignoring malformed page '{}'", value),
            },
            SEARCH => state.search = value.into_owned(),
            LOCATION => state.location = value.into_owned(),
            SORT => match value.parse::<SortOrder>() {
                Ok(sort) => state.sort = sort,
                Err(e) => debug!("Ignoring sort: {}", e),
            },
            JOB_TYPE => match value.parse::<JobType>() {
                Ok(job_type) => {
                    state.job_types.insert(job_type);
                }
                Err(e) => debug!("Ignoring job type: {}", e),
            },
            EXPERIENCE => match value.parse::<ExperienceRange>() {
                Ok(range) => state.experience = Some(range),
                Err(e) => debug!("Ignoring experience: {}", e),
            },
            other => debug!("Ignoring unknown query key '{}'", other),
        }
    }

    state
}
