//! Mapping from Firebird catalog type codes to SQL type text.

/// Sentinel emitted for catalog type codes with no known mapping.
///
/// Exported DDL containing this marker is intentionally left syntactically
/// invalid: the export is best-effort, not a validator.
pub const UNKNOWN_TYPE: &str = "UNKNOWN_TYPE";

/// Decode a raw `RDB$FIELD_TYPE` / length / scale triple into SQL type text.
///
/// Pure and total: the same input always yields the same output, and
/// unrecognized codes map to [`UNKNOWN_TYPE`] instead of failing. The scale
/// stored in the catalog is a negative power of ten, so a scaled int64
/// becomes `DECIMAL(18, -scale)`; an unscaled one is a plain `BIGINT`.
pub fn decode_field_type(type_code: i32, length: i32, scale: i32) -> String {
    match type_code {
        7 => "SMALLINT".to_string(),
        8 => "INTEGER".to_string(),
        10 => "FLOAT".to_string(),
        12 => "DATE".to_string(),
        13 => "TIME".to_string(),
        14 => format!("CHAR({})", length),
        16 => {
            if scale == 0 {
                "BIGINT".to_string()
            } else {
                format!("DECIMAL(18, {})", -scale)
            }
        }
        23 => "BOOLEAN".to_string(),
        27 => "DOUBLE PRECISION".to_string(),
        35 => "TIMESTAMP".to_string(),
        37 => format!("VARCHAR({})", length),
        261 => "BLOB SUB_TYPE TEXT".to_string(),
        _ => UNKNOWN_TYPE.to_string(),
    }
}
