use std::io::Write;

use fastrace::trace;
use thiserror::Error;
use tracing::debug;
use ustore_config::StoreConfig;
use ustore_output::{format_user, format_users};
use ustore_store::{RecordStore, StoreError};
use ustore_types::{Operation, UnknownOperation};

pub const EXIT_USAGE: u8 = 2;
pub const EXIT_DUPLICATE: u8 = 3;
pub const EXIT_NOT_FOUND: u8 = 4;
pub const EXIT_DATA: u8 = 65;
pub const EXIT_SOFTWARE: u8 = 70;
pub const EXIT_IO: u8 = 74;
pub const EXIT_CONFIG: u8 = 78;

/// Values collected from the command line for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    pub operation: Option<String>,
    pub file_name: Option<String>,
    pub item: Option<String>,
    pub id: Option<String>,
}

#[derive(Error, Debug)]
pub enum PerformError {
    #[error("-{0} flag has to be specified")]
    MissingFlag(&'static str),
    #[error(transparent)]
    UnknownOperation(#[from] UnknownOperation),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Failed to write result: {0}")]
    Output(#[source] std::io::Error),
}

impl PerformError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PerformError::MissingFlag(_) | PerformError::UnknownOperation(_) => EXIT_USAGE,
            PerformError::Store(e) => match e {
                StoreError::DuplicateId(_) => EXIT_DUPLICATE,
                StoreError::NotFound(_) => EXIT_NOT_FOUND,
                StoreError::MalformedFile(_) | StoreError::MalformedItem(_) => EXIT_DATA,
                StoreError::Json(_) => EXIT_SOFTWARE,
                StoreError::Io(_) => EXIT_IO,
            },
            PerformError::Encode(_) => EXIT_SOFTWARE,
            PerformError::Output(_) => EXIT_IO,
        }
    }
}

fn required(value: Option<String>, flag: &'static str) -> Result<String, PerformError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PerformError::MissingFlag(flag)),
    }
}

/// Validates `args`, runs the selected operation and writes its result to
/// `writer`. `add` and `remove` write nothing on success.
#[trace]
pub fn perform<W: Write>(
    args: Arguments,
    config: &StoreConfig,
    writer: &mut W,
) -> Result<(), PerformError> {
    let operation = required(args.operation, "operation")?;
    let file_name = required(args.file_name, "fileName")?;
    let operation: Operation = operation.parse()?;

    debug!("Running {} on {}", operation, file_name);
    let store = RecordStore::new(file_name, config.clone());

    let output = match operation {
        Operation::List => format_users(&store.list()?)?,
        Operation::Add => {
            let item = required(args.item, "item")?;
            store.add(&item)?;
            Vec::new()
        }
        Operation::Remove => {
            let id = required(args.id, "id")?;
            store.remove(&id)?;
            Vec::new()
        }
        Operation::FindById => {
            let id = required(args.id, "id")?;
            format_user(&store.find_by_id(&id)?)?
        }
    };

    writer.write_all(&output).map_err(PerformError::Output)?;
    writer.flush().map_err(PerformError::Output)?;
    Ok(())
}

/// Writes the error text exactly as displayed, with no trailing newline.
pub fn write_error<W: Write>(writer: &mut W, err: &PerformError) -> std::io::Result<()> {
    write!(writer, "{}", err)?;
    writer.flush()
}
