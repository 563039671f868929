//! `csvjson`: convert a CSV file into a JSON array of row objects.

use csvkit::{read_header, read_input, run_main, CommonOpt};
use csvkit_core::errors::*;
use csvkit_core::inference::{infer_column, ColumnType};
use csvkit_core::table::Table;
use log::debug;
use serde_json::{Map, Number, Value};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "csvjson", about = "Convert a CSV file into JSON, typing each column per the inference engine.")]
struct Opt {
    #[structopt(flatten)]
    common: CommonOpt,

    /// Use this column's values as object keys instead of emitting an array.
    #[structopt(short = "k", long = "key")]
    key: Option<String>,

    /// Indent the output by this many spaces (default: compact).
    #[structopt(short = "i", long = "indent")]
    indent: Option<usize>,
}

fn run() -> Result<()> {
    let opt = Opt::from_args();
    debug!("Options: {:#?}", opt);

    let ctx = opt.common.build_context()?;
    let buf = read_input(&opt.common.input)?;
    let (header, reader) = read_header(&buf, &opt.common)?;
    let table = Table::materialize(reader, header.clone())?;
    let transposed = table.transpose();

    let metas: Vec<_> = (0..header.len())
        .map(|col| {
            let cells = transposed.typed_column(col, &ctx);
            infer_column(&cells, ctx.no_inference)
        })
        .collect();

    let mut row_objects = Vec::with_capacity(table.num_rows());
    for row in &table.rows {
        let mut obj = Map::new();
        for (col, name) in header.iter().enumerate() {
            let cell = row.typed_cell(col, &ctx);
            let value = cell_to_json(&cell, metas[col].inferred_type);
            obj.insert(name.clone(), value);
        }
        row_objects.push(obj);
    }

    let output = if let Some(key_col) = &opt.key {
        let key_idx = header
            .iter()
            .position(|h| h == key_col)
            .ok_or_else(|| ErrorKind::ColumnIdentifierError(key_col.clone(), "no such column name".to_string()))?;
        let mut keyed = Map::new();
        for (row, obj) in table.rows.iter().zip(row_objects.into_iter()) {
            let key = row.get(key_idx).unwrap_or("").to_string();
            if keyed.contains_key(&key) {
                return Err(ErrorKind::ValueError(format!("duplicate key {:?} in column {:?}", key, key_col)).into());
            }
            keyed.insert(key, Value::Object(obj));
        }
        Value::Object(keyed)
    } else {
        Value::Array(row_objects.into_iter().map(Value::Object).collect())
    };

    let text = match opt.indent {
        Some(_) => serde_json::to_string_pretty(&output)?,
        None => serde_json::to_string(&output)?,
    };
    println!("{}", text);
    Ok(())
}

fn cell_to_json(cell: &csvkit_core::cell::TypedCell<'_>, inferred: ColumnType) -> Value {
    if cell.is_null() {
        return Value::Null;
    }
    match inferred {
        ColumnType::Boolean => Value::Bool(cell.unsafe_bool()),
        ColumnType::Number => match cell.num() {
            Some(n) => Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null),
            None => Value::String(cell.text().to_string()),
        },
        _ => Value::String(cell.text().to_string()),
    }
}

fn main() {
    run_main(run);
}
