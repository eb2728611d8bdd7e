//! Minimal column-named table used for every tabular result.
//!
//! The service serializes tables the way pandas does, most often in the
//! default `columns` orient (`{"col": {"0": v, "1": v}}`), so parsing and
//! rendering follow pandas conventions: a positional index, `True`/`False`
//! booleans in CSV, and an empty table for `{}`.

use serde_json::{Map, Value};

/// Rectangular table of JSON cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataFrame {
    /// Build a table from column names and row-major cells.
    ///
    /// Short rows are padded with nulls, long rows truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Build a table from a column-major mapping, preserving column order.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let (names, cols): (Vec<String>, Vec<Vec<Value>>) =
            columns.into_iter().map(|(n, c)| (n.into(), c)).unzip();
        let height = cols.iter().map(Vec::len).max().unwrap_or(0);
        let rows = (0..height)
            .map(|i| {
                cols.iter()
                    .map(|c| c.get(i).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self {
            columns: names,
            rows,
        }
    }

    /// Build a table from JSON objects, one per row. Columns appear in
    /// first-seen order; keys missing from a record become null.
    pub fn from_records(records: Vec<Map<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|c| record.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    /// Parse a pandas JSON serialization.
    ///
    /// Accepts the `columns` orient, the `records` orient and the `split`
    /// orient.
    pub fn from_pandas_json(raw: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self::from_pandas_value(value))
    }

    /// Same as [`DataFrame::from_pandas_json`] for an already parsed value.
    /// Anything that is not a recognised table shape yields an empty table.
    pub fn from_pandas_value(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                let records = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .collect();
                Self::from_records(records)
            }
            Value::Object(map) if is_split_orient(&map) => Self::from_split(map),
            Value::Object(map) => Self::from_columns_orient(map),
            _ => Self::default(),
        }
    }

    fn from_split(mut map: Map<String, Value>) -> Self {
        let columns = match map.remove("columns") {
            Some(Value::Array(cols)) => cols.into_iter().map(|c| cell_label(&c)).collect(),
            _ => Vec::new(),
        };
        let rows = match map.remove("data") {
            Some(Value::Array(rows)) => rows
                .into_iter()
                .map(|row| match row {
                    Value::Array(cells) => cells,
                    other => vec![other],
                })
                .collect(),
            _ => Vec::new(),
        };
        Self::new(columns, rows)
    }

    fn from_columns_orient(map: Map<String, Value>) -> Self {
        let mut index: Vec<String> = Vec::new();
        for column in map.values() {
            if let Value::Object(cells) = column {
                for key in cells.keys() {
                    if !index.contains(key) {
                        index.push(key.clone());
                    }
                }
            }
        }
        if index.iter().all(|k| k.parse::<i64>().is_ok()) {
            index.sort_by_key(|k| k.parse::<i64>().unwrap_or_default());
        }

        let columns: Vec<String> = map.keys().cloned().collect();
        let rows = index
            .iter()
            .map(|key| {
                map.values()
                    .map(|column| match column {
                        Value::Object(cells) => cells.get(key).cloned().unwrap_or(Value::Null),
                        _ => Value::Null,
                    })
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    /// `(rows, columns)`. A table without rows reports `(0, 0)` like pandas
    /// does for an empty JSON object.
    pub fn shape(&self) -> (usize, usize) {
        if self.rows.is_empty() {
            (0, 0)
        } else {
            (self.rows.len(), self.columns.len())
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells of the named column.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|r| r.get(col)).collect())
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// CSV with a leading unnamed index column, as pandas writes it.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let header: Vec<String> = std::iter::once(String::new())
            .chain(self.columns.iter().map(|c| csv_escape(c)))
            .collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for (i, row) in self.rows.iter().enumerate() {
            let line: Vec<String> = std::iter::once(i.to_string())
                .chain(row.iter().map(|cell| csv_escape(&csv_cell(cell))))
                .collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }

    /// Pipe table with the index in the first column.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("|    |");
        for column in &self.columns {
            out.push_str(&format!(" {column} |"));
        }
        out.push('\n');
        out.push_str("|---:|");
        for _ in &self.columns {
            out.push_str(":---|");
        }
        out.push('\n');
        for (i, row) in self.rows.iter().enumerate() {
            out.push_str(&format!("| {i:>2} |"));
            for cell in row {
                out.push_str(&format!(" {} |", display_cell(cell).replace('|', "\\|")));
            }
            out.push('\n');
        }
        out
    }

    /// Serialize in the pandas `columns` orient.
    pub fn to_pandas_json(&self) -> Value {
        let mut out = Map::new();
        for (c, name) in self.columns.iter().enumerate() {
            let mut cells = Map::new();
            for (i, row) in self.rows.iter().enumerate() {
                cells.insert(i.to_string(), row.get(c).cloned().unwrap_or(Value::Null));
            }
            out.insert(name.clone(), Value::Object(cells));
        }
        Value::Object(out)
    }
}

impl std::fmt::Display for DataFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

fn is_split_orient(map: &Map<String, Value>) -> bool {
    matches!(map.get("columns"), Some(Value::Array(_)))
        && matches!(map.get("data"), Some(Value::Array(_)))
}

fn cell_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => display_cell(other),
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn names() -> DataFrame {
        DataFrame::from_columns([(
            "Name",
            vec![
                json!("John"),
                json!("Emma"),
                json!("Tom"),
                json!("Emily"),
                json!("Alex"),
            ],
        )])
    }

    #[test]
    fn test_to_csv_matches_pandas() {
        assert_eq!(
            names().to_csv(),
            ",Name\n0,John\n1,Emma\n2,Tom\n3,Emily\n4,Alex\n"
        );
    }

    #[test]
    fn test_csv_quotes_and_booleans() {
        let df = DataFrame::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![json!("x,y"), json!(true), Value::Null]],
        );
        assert_eq!(df.to_csv(), ",a,b,c\n0,\"x,y\",True,\n");
    }

    #[test]
    fn test_empty_object_is_empty_table() {
        let df = DataFrame::from_pandas_json("{}").unwrap();
        assert_eq!(df.shape(), (0, 0));
        assert!(df.is_empty());
    }

    #[test]
    fn test_columns_orient_sorts_index_numerically() {
        let df = DataFrame::from_pandas_json(
            r#"{"id": {"10": "c", "2": "b", "1": "a"}, "n": {"1": 1, "2": 2, "10": 3}}"#,
        )
        .unwrap();
        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.columns(), ["id", "n"]);
        assert_eq!(df.get(0, "id"), Some(&json!("a")));
        assert_eq!(df.get(2, "n"), Some(&json!(3)));
    }

    #[test]
    fn test_records_orient_fills_missing_keys() {
        let df = DataFrame::from_pandas_json(r#"[{"a": 1}, {"a": 2, "b": "x"}]"#).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.get(0, "b"), Some(&Value::Null));
        assert_eq!(df.column("a").unwrap(), vec![&json!(1), &json!(2)]);
    }

    #[test]
    fn test_split_orient() {
        let df = DataFrame::from_pandas_json(
            r#"{"columns": ["q", "sql"], "index": [0], "data": [["how many?", "SELECT 1"]]}"#,
        )
        .unwrap();
        assert_eq!(df.shape(), (1, 2));
        assert_eq!(df.get(0, "sql"), Some(&json!("SELECT 1")));
    }

    #[test]
    fn test_pandas_json_round_trip() {
        let df = names();
        let parsed = DataFrame::from_pandas_value(df.to_pandas_json());
        assert_eq!(parsed, df);
    }

    #[test]
    fn test_head_and_markdown() {
        let md = names().head(2).to_markdown();
        assert_eq!(md, "|    | Name |\n|---:|:---|\n|  0 | John |\n|  1 | Emma |\n");
    }
}
