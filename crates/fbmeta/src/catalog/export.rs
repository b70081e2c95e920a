//! Reconstruction of DDL scripts from catalog metadata.

use super::{CatalogSource, DomainRow, ProcedureRow, TableDef};
use crate::error::Result;
use crate::typemap::decode_field_type;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// File that aggregates every exported domain. The numeric prefix keeps
/// it first in lexicographic script order, so a re-applied export creates
/// domains before the tables that use them.
const DOMAINS_FILE: &str = "01_Domains.sql";

/// Per-kind object counts for an export run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ExportSummary {
    pub domains: usize,
    pub tables: usize,
    pub procedures: usize,
}

/// Render one `CREATE DOMAIN` statement.
pub fn render_domain_ddl(domain: &DomainRow) -> String {
    let ty = decode_field_type(domain.ty.type_code, domain.ty.length, domain.ty.scale);
    let not_null = if domain.ty.is_not_null() { " NOT NULL" } else { "" };
    format!("CREATE DOMAIN {} AS {}{};\n", domain.name, ty, not_null)
}

/// Render one complete `CREATE TABLE` statement with its columns in
/// declared order.
pub fn render_table_ddl(table: &TableDef) -> String {
    let mut out = format!("CREATE TABLE {} (\n", table.name);

    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|col| {
            let ty = decode_field_type(col.ty.type_code, col.ty.length, col.ty.scale);
            let not_null = if col.ty.is_not_null() { " NOT NULL" } else { "" };
            format!("    {} {}{}", col.name, ty, not_null)
        })
        .collect();

    out.push_str(&columns.join(",\n"));
    out.push_str("\n);\n");
    out
}

/// Render an isql-executable skeleton around a procedure's stored body.
///
/// The parameter section is not reconstructed: only the body text is kept
/// in the catalog in readable form, so the header must be completed by
/// hand from RDB$PROCEDURE_PARAMETERS. The marker comment states that.
pub fn render_procedure_ddl(procedure: &ProcedureRow) -> String {
    let body = procedure.source.as_deref().unwrap_or("");
    format!(
        "SET TERM ^ ;\n\
         CREATE OR ALTER PROCEDURE {}\n\
         /* Parameter section not reconstructed: complete it by hand from RDB$PROCEDURE_PARAMETERS */\n\
         AS\n\
         {}\n\
         ^\n\
         SET TERM ; ^\n",
        procedure.name, body
    )
}

/// Export all user domains into one aggregated `01_Domains.sql`.
///
/// No file is written when the database has no user domains.
pub fn export_domains(source: &mut dyn CatalogSource, output_dir: &Path) -> Result<usize> {
    let domains = source.domains()?;
    if domains.is_empty() {
        info!("No user domains found; skipping {}", DOMAINS_FILE);
        return Ok(0);
    }

    let mut text = String::new();
    for domain in &domains {
        text.push_str(&render_domain_ddl(domain));
    }

    std::fs::write(output_dir.join(DOMAINS_FILE), text)?;
    info!("Exported {} domain(s) into {}", domains.len(), DOMAINS_FILE);
    Ok(domains.len())
}

/// Export each user table into its own `Table_<name>.sql`.
pub fn export_tables(source: &mut dyn CatalogSource, output_dir: &Path) -> Result<usize> {
    let relations = source.relations()?;

    for name in &relations {
        let columns = source.relation_columns(name)?;
        let table = TableDef {
            name: name.clone(),
            columns,
        };
        let file = format!("Table_{}.sql", name);
        std::fs::write(output_dir.join(&file), render_table_ddl(&table))?;
        debug!("Exported table {} ({} columns)", name, table.columns.len());
    }

    info!("Exported {} table(s)", relations.len());
    Ok(relations.len())
}

/// Export each stored procedure into its own `Proc_<name>.sql`.
pub fn export_procedures(source: &mut dyn CatalogSource, output_dir: &Path) -> Result<usize> {
    let procedures = source.procedures()?;

    for procedure in &procedures {
        let file = format!("Proc_{}.sql", procedure.name);
        std::fs::write(output_dir.join(&file), render_procedure_ddl(procedure))?;
        debug!("Exported procedure {}", procedure.name);
    }

    info!("Exported {} procedure(s)", procedures.len());
    Ok(procedures.len())
}
