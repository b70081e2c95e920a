//! Catalog metadata types and the reconstruction seam.
//!
//! The driver implements [`CatalogSource`] by reading the RDB$ system
//! tables; everything downstream of the trait is pure text generation.

mod export;

pub use export::{
    export_domains, export_procedures, export_tables, render_domain_ddl, render_procedure_ddl,
    render_table_ddl, ExportSummary,
};

use crate::error::Result;
use serde::Serialize;

/// Raw catalog encoding of a column or domain storage type.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TypeDescriptor {
    /// `RDB$FIELD_TYPE` numeric code.
    pub type_code: i32,
    /// `RDB$FIELD_LENGTH` in bytes.
    pub length: i32,
    /// `RDB$FIELD_SCALE`, stored as a negative power of ten.
    pub scale: i32,
    /// `RDB$NULL_FLAG`: NULL means nullable, 1 means NOT NULL.
    pub null_flag: Option<i32>,
}

impl TypeDescriptor {
    /// True when the catalog marks this type NOT NULL.
    pub fn is_not_null(&self) -> bool {
        self.null_flag == Some(1)
    }
}

/// One user-defined domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainRow {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// One column of a table, with its declared position.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnRow {
    pub name: String,
    pub ty: TypeDescriptor,
    pub position: i32,
}

/// One user table with its columns in declared order.
#[derive(Debug, Clone, Serialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnRow>,
}

/// One stored procedure. Parameters are intentionally not modeled; only
/// the stored body survives the export.
#[derive(Debug, Clone, Serialize)]
pub struct ProcedureRow {
    pub name: String,
    /// `RDB$PROCEDURE_SOURCE`; NULL for external or legacy procedures.
    pub source: Option<String>,
}

/// Read access to the database's own schema description.
pub trait CatalogSource {
    /// Non-system domains, excluding the auto-generated `RDB$...` column
    /// domains.
    fn domains(&mut self) -> Result<Vec<DomainRow>>;

    /// Names of non-system, non-view relations.
    fn relations(&mut self) -> Result<Vec<String>>;

    /// Columns of one relation, ordered by declared position.
    fn relation_columns(&mut self, relation: &str) -> Result<Vec<ColumnRow>>;

    /// Non-system stored procedures.
    fn procedures(&mut self) -> Result<Vec<ProcedureRow>>;
}
