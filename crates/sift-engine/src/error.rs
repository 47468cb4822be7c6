use std::fmt;

use sift_common::DataType;

/// A problem found while resolving a call node against its spec.
///
/// Spec update functions are pure: they return one of these instead of
/// writing to the context, and the resolver renders it into the context's
/// error queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Wrong number of arguments for the spec.
    Arity {
        spec: &'static str,
        expected: &'static str,
    },
    /// The spec has no implementation for this argument type.
    Unsupported {
        spec: &'static str,
        data_type: DataType,
    },
    /// The conversion matrix has no path between these types.
    NoConversion { from: DataType, to: DataType },
    /// A CONVERT/CAST/`::` target that is not a known type name.
    InvalidTypeName { spec: &'static str, name: String },
    /// An EXTRACT/DATE_TRUNC field that is not recognized.
    InvalidField { spec: &'static str, field: String },
    /// Argument shapes or type combinations the spec cannot work with.
    Incompatible {
        spec: &'static str,
        detail: &'static str,
    },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::Arity { spec, expected } => {
                write!(f, "{spec} requires {expected}.")
            }
            TypeError::Unsupported { spec, data_type } => {
                write!(f, "{spec} is not supported for data type {data_type}.")
            }
            TypeError::NoConversion { from, to } => {
                write!(f, "Unsupported conversion from {from} to {to}.")
            }
            TypeError::InvalidTypeName { spec, name } => {
                write!(f, "Invalid data type for {spec}: {name}")
            }
            TypeError::InvalidField { spec, field } => {
                write!(f, "Invalid field specified for {spec}: {field}")
            }
            TypeError::Incompatible { spec, detail } => {
                write!(f, "{spec} {detail}.")
            }
        }
    }
}

impl std::error::Error for TypeError {}
