//! Apache Parquet output format.

use arrow::array::{ArrayRef, Date32Array, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use sophist_types::SeriesTable;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Rows per Parquet row group.
const ROW_GROUP_SIZE: usize = 100_000;

/// Parquet formatter.
///
/// The time axis is a non-null `Date32` column named `T`; every series is a
/// nullable `Float64` column. Output is Snappy-compressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetFormatter;

impl ParquetFormatter {
    /// Creates a new Parquet formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn schema(table: &SeriesTable) -> Schema {
        let mut fields = Vec::with_capacity(table.width() + 1);
        fields.push(Field::new(table.index_name(), DataType::Date32, false));
        fields.extend(
            table
                .columns()
                .iter()
                .map(|code| Field::new(code, DataType::Float64, true)),
        );
        Schema::new(fields)
    }

    fn to_batch(table: &SeriesTable, schema: Arc<Schema>) -> Result<RecordBatch, FormatError> {
        let days: Vec<i32> = table.index().iter().map(|d| days_since_epoch(*d)).collect();

        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.width() + 1);
        arrays.push(Arc::new(Date32Array::from(days)));
        for pos in 0..table.width() {
            let values: Vec<Option<f64>> = table.rows().iter().map(|cells| cells[pos]).collect();
            arrays.push(Arc::new(Float64Array::from(values)));
        }

        RecordBatch::try_new(schema, arrays).map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

impl Formatter for ParquetFormatter {
    fn write_table<W: Write + Send>(
        &self,
        table: &SeriesTable,
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(Self::schema(table));
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .set_max_row_group_size(ROW_GROUP_SIZE)
            .build();

        let batch = Self::to_batch(table, Arc::clone(&schema))?;
        let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;
        arrow_writer
            .write(&batch)
            .map_err(|e| FormatError::Parquet(e.to_string()))?;
        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
