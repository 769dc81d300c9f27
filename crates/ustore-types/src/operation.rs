use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Operation selected with `-operation` for a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Add,
    Remove,
    FindById,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Operation {0} not allowed!")]
pub struct UnknownOperation(pub String);

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::List,
        Operation::Add,
        Operation::Remove,
        Operation::FindById,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Add => "add",
            Operation::Remove => "remove",
            Operation::FindById => "findById",
        }
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
