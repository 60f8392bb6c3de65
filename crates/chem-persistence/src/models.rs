// models.rs
// Filas devueltas por las consultas SQL del almacén. Los nombres de campo
// coinciden con los alias de columna de `query.rs`.
use crate::schema;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Nullable, Text, Timestamp};
use serde::Serialize;

#[derive(Debug, Insertable)]
#[diesel(table_name = schema::archive_source)]
pub(crate) struct NewArchiveSource<'a> {
  pub name: &'a str,
  pub version: &'a str,
  pub file_name: &'a str,
  pub created_at: NaiveDateTime,
  pub created_by: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::archive_source)]
pub struct ArchiveSourceRow {
  pub id: i64,
  pub name: String,
  pub version: String,
  pub file_name: String,
  pub created_at: NaiveDateTime,
  pub created_by: String,
}

/// `(id, cadena canónica)`; entrada de migración y resolución de ids.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Serialize)]
pub struct CanonicalRow {
  #[diesel(sql_type = BigInt)]
  pub id: i64,
  #[diesel(sql_type = Text)]
  pub canonical: String,
}

#[derive(Debug, QueryableByName)]
pub(crate) struct CountRow {
  #[diesel(sql_type = BigInt)]
  pub count: i64,
}

/// Columnas de la fuente cuando una consulta se une con `archive_source`.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Serialize)]
pub struct SourceColumns {
  #[diesel(sql_type = BigInt)]
  pub source_id: i64,
  #[diesel(sql_type = Text)]
  pub source_name: String,
  #[diesel(sql_type = Text)]
  pub source_version: String,
  #[diesel(sql_type = Text)]
  pub source_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Serialize)]
pub struct ArchiveEntityRow {
  #[diesel(sql_type = BigInt)]
  pub id: i64,
  #[diesel(sql_type = Text)]
  pub canonical: String,
  #[diesel(sql_type = Timestamp)]
  pub created_at: NaiveDateTime,
  #[diesel(sql_type = Text)]
  pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Serialize)]
pub struct ArchiveEntitySourceRow {
  #[diesel(embed)]
  pub entity: ArchiveEntityRow,
  #[diesel(embed)]
  pub source: SourceColumns,
}

#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Serialize)]
pub struct WorkbenchCompoundRow {
  #[diesel(sql_type = BigInt)]
  pub id: i64,
  #[diesel(sql_type = Text)]
  pub canonical: String,
  #[diesel(sql_type = Bool)]
  pub is_building_block: bool,
  #[diesel(sql_type = Timestamp)]
  pub created_at: NaiveDateTime,
  #[diesel(sql_type = Text)]
  pub created_by: String,
  #[diesel(sql_type = Nullable<Timestamp>)]
  pub updated_at: Option<NaiveDateTime>,
  #[diesel(sql_type = Nullable<Text>)]
  pub updated_by: Option<String>,
}

/// Patrones de compuesto, reacciones y patrones de reacción.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Serialize)]
pub struct WorkbenchEntityRow {
  #[diesel(sql_type = BigInt)]
  pub id: i64,
  #[diesel(sql_type = Text)]
  pub canonical: String,
  #[diesel(sql_type = Timestamp)]
  pub created_at: NaiveDateTime,
  #[diesel(sql_type = Text)]
  pub created_by: String,
  #[diesel(sql_type = Nullable<Timestamp>)]
  pub updated_at: Option<NaiveDateTime>,
  #[diesel(sql_type = Nullable<Text>)]
  pub updated_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Serialize)]
pub struct WorkbenchCompoundSourceRow {
  #[diesel(embed)]
  pub compound: WorkbenchCompoundRow,
  #[diesel(sql_type = BigInt)]
  pub archive_id: i64,
  #[diesel(embed)]
  pub source: SourceColumns,
}

#[derive(Debug, Clone, PartialEq, Eq, QueryableByName, Serialize)]
pub struct WorkbenchEntitySourceRow {
  #[diesel(embed)]
  pub entity: WorkbenchEntityRow,
  #[diesel(sql_type = BigInt)]
  pub archive_id: i64,
  #[diesel(embed)]
  pub source: SourceColumns,
}
