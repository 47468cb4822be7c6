use std::fmt;

use serde::Serialize;

/// Result-type tag carried by every token-derived value and call node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum DataType {
    #[default]
    Unknown,
    Int,
    String,
    Double,
    DateTime,
    Bool,
    Function,
    Custom,
}

impl DataType {
    /// Stable display name, also used as the CONVERT type-name spelling.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Unknown => "UNKNOWN",
            DataType::Int => "INT",
            DataType::String => "STRING",
            DataType::Double => "DOUBLE",
            DataType::DateTime => "DATETIME",
            DataType::Bool => "BOOL",
            DataType::Function => "FUNCTION",
            DataType::Custom => "CUSTOM",
        }
    }

    /// Parse a SQL type name as it appears after `::`, in CAST, or as the
    /// first argument of CONVERT. Unrecognized names yield `Unknown`.
    pub fn from_type_name(s: &str) -> DataType {
        if s.eq_ignore_ascii_case("INT") || s.eq_ignore_ascii_case("INTEGER") {
            DataType::Int
        } else if s.eq_ignore_ascii_case("DOUBLE")
            || s.eq_ignore_ascii_case("DECIMAL")
            || s.eq_ignore_ascii_case("NUMERIC")
        {
            DataType::Double
        } else if s.eq_ignore_ascii_case("STRING")
            || s.eq_ignore_ascii_case("VARCHAR")
            || s.eq_ignore_ascii_case("CHAR")
        {
            DataType::String
        } else if s.eq_ignore_ascii_case("DATETIME") {
            DataType::DateTime
        } else if s.eq_ignore_ascii_case("BOOL") || s.eq_ignore_ascii_case("BOOLEAN") {
            DataType::Bool
        } else {
            DataType::Unknown
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_round_trips() {
        for ty in [
            DataType::Int,
            DataType::String,
            DataType::Double,
            DataType::DateTime,
            DataType::Bool,
        ] {
            assert_eq!(DataType::from_type_name(ty.name()), ty);
        }
    }

    #[test]
    fn type_name_aliases() {
        assert_eq!(DataType::from_type_name("integer"), DataType::Int);
        assert_eq!(DataType::from_type_name("Varchar"), DataType::String);
        assert_eq!(DataType::from_type_name("NUMERIC"), DataType::Double);
        assert_eq!(DataType::from_type_name("boolean"), DataType::Bool);
        assert_eq!(DataType::from_type_name("blob"), DataType::Unknown);
    }
}
