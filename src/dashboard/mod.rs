//! Dashboard figures computed from the static JSON fixtures.

use crate::fragments::{Accept, FetchError, FragmentSource};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};

pub const FORMATIONS_FIXTURE: &str = "/assets/data/formations.json";
pub const ACTUALITES_FIXTURE: &str = "/assets/data/actualites.json";

const POPULAR_COUNT: usize = 3;
const LATEST_NEWS_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Could not fetch fixture {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: FetchError,
    },
    #[error("Malformed fixture {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Fixture {0} is not a JSON array")]
    NotAnArray(String),
}

/// Both fixtures as opaque records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub formations: Vec<Value>,
    pub actualites: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularFormation {
    pub rank: usize,
    pub name: String,
    pub students: u64,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub date: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_formations: usize,
    pub total_students: u64,
    pub popular: Vec<PopularFormation>,
    pub latest_news: Vec<NewsItem>,
}

impl DashboardData {
    #[instrument(skip(source), fields(source = source.name()))]
    pub async fn load(source: &dyn FragmentSource) -> Result<Self, FixtureError> {
        let (formations, actualites) = futures::try_join!(
            fetch_array(source, FORMATIONS_FIXTURE),
            fetch_array(source, ACTUALITES_FIXTURE),
        )?;
        info!(
            formations = formations.len(),
            actualites = actualites.len(),
            "dashboard fixtures loaded"
        );
        Ok(Self {
            formations,
            actualites,
        })
    }

    pub fn summary(&self) -> DashboardSummary {
        let total_students = self.formations.iter().map(students).sum();

        let mut ranked: Vec<&Value> = self.formations.iter().collect();
        ranked.sort_by_key(|f| std::cmp::Reverse(students(f)));
        let popular = ranked
            .into_iter()
            .take(POPULAR_COUNT)
            .enumerate()
            .map(|(index, formation)| PopularFormation {
                rank: index + 1,
                name: text_field(formation, "nom").unwrap_or_default(),
                students: students(formation),
                slug: text_field(formation, "slug"),
            })
            .collect();

        let latest_news = self
            .actualites
            .iter()
            .take(LATEST_NEWS_COUNT)
            .map(|item| NewsItem {
                title: text_field(item, "titre").unwrap_or_default(),
                date: text_field(item, "date"),
                slug: text_field(item, "slug"),
            })
            .collect();

        DashboardSummary {
            total_formations: self.formations.len(),
            total_students,
            popular,
            latest_news,
        }
    }
}

async fn fetch_array(source: &dyn FragmentSource, path: &str) -> Result<Vec<Value>, FixtureError> {
    let body = source
        .fetch(path, Accept::Json)
        .await
        .map_err(|source| FixtureError::Fetch {
            path: path.to_string(),
            source,
        })?;
    match serde_json::from_str(&body).map_err(|source| FixtureError::Malformed {
        path: path.to_string(),
        source,
    })? {
        Value::Array(records) => Ok(records),
        _ => Err(FixtureError::NotAnArray(path.to_string())),
    }
}

/// `etudiants` as a number or a string with a leading integer; anything else counts as 0.
fn students(formation: &Value) -> u64 {
    match formation.get("etudiants") {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn text_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
