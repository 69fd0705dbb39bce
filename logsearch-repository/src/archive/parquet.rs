//! Parquet batch codec.
//!
//! Encodes a drained batch of raw JSON events into an in-memory parquet
//! blob (schema inferred from the batch itself, snappy compression) and
//! decodes archived blobs back into events for reindexing.

use std::sync::Arc;

use arrow::json::reader::infer_json_schema_from_iterator;
use arrow::json::{ArrayWriter, ReaderBuilder};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde_json::Value;

use crate::errors::ArchiveError;

/// Encode a batch of raw events into parquet bytes.
///
/// The arrow schema is inferred from the batch, so the columns are the
/// union of the keys the events actually carry; events missing a column
/// hold nulls there. The batch must be non-empty (the flush cycle never
/// archives an empty drain).
pub fn encode_batch(events: &[Value]) -> Result<Vec<u8>, ArchiveError> {
    if events.is_empty() {
        return Err(ArchiveError::encoding("cannot encode an empty batch"));
    }

    let schema = infer_json_schema_from_iterator(events.iter().cloned().map(Ok))
        .map_err(|e| ArchiveError::encoding(e.to_string()))?;

    let mut decoder = ReaderBuilder::new(Arc::new(schema))
        .build_decoder()
        .map_err(|e| ArchiveError::encoding(e.to_string()))?;
    decoder
        .serialize(events)
        .map_err(|e| ArchiveError::encoding(e.to_string()))?;
    let batch = decoder
        .flush()
        .map_err(|e| ArchiveError::encoding(e.to_string()))?
        .ok_or_else(|| ArchiveError::encoding("no rows produced from batch"))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(props))
        .map_err(|e| ArchiveError::encoding(e.to_string()))?;
    writer
        .write(&batch)
        .map_err(|e| ArchiveError::encoding(e.to_string()))?;
    writer
        .close()
        .map_err(|e| ArchiveError::encoding(e.to_string()))?;

    Ok(buffer)
}

/// Decode an archived parquet blob back into raw events.
pub fn decode_batch(bytes: Vec<u8>) -> Result<Vec<Value>, ArchiveError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(Bytes::from(bytes))
        .map_err(|e| ArchiveError::decoding(e.to_string()))?
        .build()
        .map_err(|e| ArchiveError::decoding(e.to_string()))?;

    let mut output = Vec::new();
    let mut writer = ArrayWriter::new(&mut output);
    for batch in reader {
        let batch = batch.map_err(|e| ArchiveError::decoding(e.to_string()))?;
        writer
            .write(&batch)
            .map_err(|e| ArchiveError::decoding(e.to_string()))?;
    }
    writer
        .finish()
        .map_err(|e| ArchiveError::decoding(e.to_string()))?;

    serde_json::from_slice(&output).map_err(|e| ArchiveError::decoding(e.to_string()))
}
