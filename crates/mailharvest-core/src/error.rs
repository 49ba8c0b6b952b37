use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("source range {0:?}: expected \"sheet,column,row\"")]
    SourceRangeShape(String),
    #[error("source range {0:?}: sheet name is empty")]
    EmptySheetName(String),
    #[error("source range {value:?}: column {token:?} is not a positive integer")]
    InvalidColumn { value: String, token: String },
    #[error("source range {value:?}: start row {token:?} is not a positive integer")]
    InvalidStartRow { value: String, token: String },
    #[error("invalid cell reference {0:?}")]
    InvalidCellRef(String),
}
