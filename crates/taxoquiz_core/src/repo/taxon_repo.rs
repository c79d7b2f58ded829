//! Taxon catalog repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Answer exact-match lineage queries over the read-only catalog.
//! - Provide distinct option lists and random samples for the quiz services.
//!
//! # Invariants
//! - Taxon lists are ordered by `id` unless a query says otherwise.
//! - Distinct value lists are sorted and never contain blank values.
//! - Catalog writes call `NewTaxon::validate()` before SQL mutations.

use crate::db::DbError;
use crate::model::level::TaxonLevel;
use crate::model::selection::TaxonomySelection;
use crate::model::taxon::{Lineage, NewTaxon, Taxon, TaxonId, TaxonValidationError};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TAXON_SELECT_SQL: &str = "SELECT
    id,
    kingdom,
    phylum,
    class,
    \"order\",
    family,
    genus,
    species,
    vernacular_name,
    distinguishing_trait
FROM taxons";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by catalog and score persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaxonValidationError),
    Db(DbError),
    NotFound(TaxonId),
    InvalidData(String),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "taxon not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted quiz data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "quiz repositories require schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "quiz repositories require table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<TaxonValidationError> for RepoError {
    fn from(value: TaxonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Exact-match conjunction over lineage levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineageFilter {
    pub conditions: Vec<(TaxonLevel, String)>,
    pub exclude_ids: Vec<TaxonId>,
    pub limit: Option<u32>,
}

impl LineageFilter {
    /// Filter matching every taxon.
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter on a single level.
    pub fn matching(level: TaxonLevel, value: impl Into<String>) -> Self {
        Self::any().and(level, value)
    }

    pub fn and(mut self, level: TaxonLevel, value: impl Into<String>) -> Self {
        self.conditions.push((level, value.into()));
        self
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = TaxonId>) -> Self {
        self.exclude_ids.extend(ids);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Conditions for every non-blank value of `selection` at `levels`.
    pub fn from_selection(selection: &TaxonomySelection, levels: &[TaxonLevel]) -> Self {
        levels
            .iter()
            .filter(|level| !selection.is_blank(**level))
            .fold(Self::any(), |filter, level| {
                filter.and(*level, selection.get(*level))
            })
    }
}

/// Read-only catalog queries consumed by the quiz services.
pub trait TaxonRepository {
    fn find_by_id(&self, id: TaxonId) -> RepoResult<Option<Taxon>>;
    /// Taxa matching every condition of `filter`, ordered by id.
    fn filter_by(&self, filter: &LineageFilter) -> RepoResult<Vec<Taxon>>;
    fn all(&self) -> RepoResult<Vec<Taxon>>;
    /// Sorted distinct non-blank values of `level` among taxa matching `filter`.
    fn distinct_values(&self, level: TaxonLevel, filter: &LineageFilter)
        -> RepoResult<Vec<String>>;
    /// Up to `n` uniformly random taxa whose id is not in `exclude_ids`.
    fn random_sample(&self, n: usize, exclude_ids: &[TaxonId]) -> RepoResult<Vec<Taxon>>;
    /// Exact, case-sensitive lookup by answer label.
    fn find_by_vernacular_name(&self, name: &str) -> RepoResult<Option<Taxon>>;
}

/// SQLite-backed taxon catalog.
#[derive(Clone, Copy)]
pub struct SqliteTaxonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaxonRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        super::ensure_schema_ready(conn, "taxons")?;
        Ok(Self { conn })
    }

    /// Adds one taxon to the catalog.
    ///
    /// Seeding path only; the quiz services never write taxa.
    pub fn insert_taxon(&self, taxon: &NewTaxon) -> RepoResult<Taxon> {
        taxon.validate()?;
        let lineage = &taxon.lineage;
        self.conn.execute(
            "INSERT INTO taxons (
                kingdom,
                phylum,
                class,
                \"order\",
                family,
                genus,
                species,
                vernacular_name,
                distinguishing_trait
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                lineage.kingdom.trim(),
                lineage.phylum.trim(),
                lineage.class.trim(),
                lineage.order.trim(),
                lineage.family.trim(),
                lineage.genus.trim(),
                lineage.species.trim(),
                taxon.vernacular_name.trim(),
                taxon.distinguishing_trait.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=taxon_insert module=repo status=ok taxon_id={id}");
        self.find_by_id(id)?.ok_or(RepoError::NotFound(id))
    }

    /// Number of taxa in the catalog.
    pub fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM taxons;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative taxon count {count}")))
    }

    fn query_taxa(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Taxon>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut taxa = Vec::new();
        while let Some(row) = rows.next()? {
            taxa.push(parse_taxon_row(row)?);
        }
        Ok(taxa)
    }
}

impl TaxonRepository for SqliteTaxonRepository<'_> {
    fn find_by_id(&self, id: TaxonId) -> RepoResult<Option<Taxon>> {
        let taxa = self.query_taxa(
            &format!("{TAXON_SELECT_SQL} WHERE id = ?1;"),
            vec![Value::Integer(id)],
        )?;
        Ok(taxa.into_iter().next())
    }

    fn filter_by(&self, filter: &LineageFilter) -> RepoResult<Vec<Taxon>> {
        let mut sql = format!("{TAXON_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values = Vec::new();
        push_filter_clauses(&mut sql, &mut bind_values, filter);
        sql.push_str(" ORDER BY id ASC");
        push_limit(&mut sql, &mut bind_values, filter.limit);
        self.query_taxa(&sql, bind_values)
    }

    fn all(&self) -> RepoResult<Vec<Taxon>> {
        self.query_taxa(&format!("{TAXON_SELECT_SQL} ORDER BY id ASC;"), Vec::new())
    }

    fn distinct_values(
        &self,
        level: TaxonLevel,
        filter: &LineageFilter,
    ) -> RepoResult<Vec<String>> {
        let column = level.column();
        let mut sql = format!("SELECT DISTINCT {column} FROM taxons WHERE trim({column}) <> ''");
        let mut bind_values = Vec::new();
        push_filter_clauses(&mut sql, &mut bind_values, filter);
        sql.push_str(&format!(" ORDER BY {column} ASC"));
        push_limit(&mut sql, &mut bind_values, filter.limit);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            values.push(row.get::<_, String>(0)?);
        }
        Ok(values)
    }

    fn random_sample(&self, n: usize, exclude_ids: &[TaxonId]) -> RepoResult<Vec<Taxon>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut sql = format!("{TAXON_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values = Vec::new();
        push_exclusions(&mut sql, &mut bind_values, exclude_ids);
        sql.push_str(" ORDER BY random() LIMIT ?");
        bind_values.push(Value::Integer(i64::try_from(n).unwrap_or(i64::MAX)));
        self.query_taxa(&sql, bind_values)
    }

    fn find_by_vernacular_name(&self, name: &str) -> RepoResult<Option<Taxon>> {
        let taxa = self.query_taxa(
            &format!("{TAXON_SELECT_SQL} WHERE vernacular_name = ?1 ORDER BY id ASC LIMIT 1;"),
            vec![Value::Text(name.to_string())],
        )?;
        Ok(taxa.into_iter().next())
    }
}

fn push_filter_clauses(sql: &mut String, bind_values: &mut Vec<Value>, filter: &LineageFilter) {
    for (level, value) in &filter.conditions {
        sql.push_str(&format!(" AND {} = ?", level.column()));
        bind_values.push(Value::Text(value.clone()));
    }
    push_exclusions(sql, bind_values, &filter.exclude_ids);
}

fn push_exclusions(sql: &mut String, bind_values: &mut Vec<Value>, exclude_ids: &[TaxonId]) {
    if exclude_ids.is_empty() {
        return;
    }
    let placeholders = vec!["?"; exclude_ids.len()].join(", ");
    sql.push_str(&format!(" AND id NOT IN ({placeholders})"));
    bind_values.extend(exclude_ids.iter().map(|id| Value::Integer(*id)));
}

fn push_limit(sql: &mut String, bind_values: &mut Vec<Value>, limit: Option<u32>) {
    if let Some(limit) = limit {
        sql.push_str(" LIMIT ?");
        bind_values.push(Value::Integer(i64::from(limit)));
    }
}

fn parse_taxon_row(row: &Row<'_>) -> RepoResult<Taxon> {
    let taxon = Taxon {
        id: row.get(0)?,
        lineage: Lineage {
            kingdom: row.get(1)?,
            phylum: row.get(2)?,
            class: row.get(3)?,
            order: row.get(4)?,
            family: row.get(5)?,
            genus: row.get(6)?,
            species: row.get(7)?,
        },
        vernacular_name: row.get(8)?,
        distinguishing_trait: row.get(9)?,
    };
    if taxon.vernacular_name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank vernacular_name for taxon {}",
            taxon.id
        )));
    }
    Ok(taxon)
}
