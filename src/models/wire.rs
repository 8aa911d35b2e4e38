use chrono::NaiveDate;
use serde::{Deserialize, Serializer};

use super::ProjectId;

/// A list response: either keyed by collection name or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Projects { projects: Vec<T> },
    Tasks { tasks: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Projects { projects } => projects,
            ListBody::Tasks { tasks } => tasks,
            ListBody::Bare(items) => items,
        }
    }
}

/// Reads the calendar date out of `YYYY-MM-DD` or a full ISO timestamp.
pub fn parse_date_prefix(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let day = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
}

/// `projectId` arrives either populated (`{_id, title}`) or as a bare id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProjectRef {
    Bare(ProjectId),
    Nested {
        #[serde(rename = "_id", default)]
        mongo_id: Option<ProjectId>,
        #[serde(default)]
        id: Option<ProjectId>,
    },
}

impl ProjectRef {
    pub(crate) fn into_id(self) -> Option<ProjectId> {
        match self {
            ProjectRef::Bare(id) => Some(id),
            ProjectRef::Nested { mongo_id, id } => mongo_id.or(id),
        }
        .filter(|id| !id.is_blank())
    }
}

pub(crate) fn serialize_day<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(day) => serializer.serialize_str(&day.format("%Y-%m-%d").to_string()),
        None => serializer.serialize_none(),
    }
}
