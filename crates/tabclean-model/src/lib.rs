//! Table model for the tabclean pipeline.
//!
//! A [`Table`] is an ordered set of uniquely named [`Column`]s of equal length.
//! Every column carries a [`ColumnType`] fixed at load time; its cells are
//! [`Value`]s that are either a typed scalar or [`Value::Missing`].

pub mod delimiter;
pub mod error;
pub mod missing;
pub mod table;
pub mod value;

pub use delimiter::Delimiter;
pub use error::{ModelError, Result};
pub use missing::MissingTokens;
pub use table::{Column, Table};
pub use value::{ColumnType, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_type_serializes_lowercase() {
        let json = serde_json::to_string(&ColumnType::Float).expect("serialize dtype");
        assert_eq!(json, "\"float\"");
        let back: ColumnType = serde_json::from_str("\"bool\"").expect("deserialize dtype");
        assert_eq!(back, ColumnType::Bool);
    }

    #[test]
    fn delimiter_serializes_by_name() {
        let json = serde_json::to_string(&Delimiter::Tab).expect("serialize delimiter");
        assert_eq!(json, "\"tab\"");
    }
}
