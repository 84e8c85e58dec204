//! Naming helpers shared by the object-model and DB-access emitters:
//! default forward pointer and reverse collection field names, overridable
//! per-Column.

use catalog_model::naming::first_lower;
use catalog_model::Column;

/// The field name an emitter gives the forward entity pointer for an
/// outbound foreign key: `refPtrName` if set, else `firstLower(parentTable)`.
pub fn forward_pointer_name(column: &Column, parent_table: &str) -> String {
    column
        .ref_ptr_name
        .clone()
        .unwrap_or_else(|| first_lower(parent_table))
}

/// The field name for the reverse back-collection on the parent side:
/// `reversePtrName` if set, else `firstLower(childTable) + "Vector"` (C++) or
/// `+ "s"` (Java).
pub fn reverse_collection_name(column: &Column, child_table: &str, suffix: &str) -> String {
    column
        .reverse_ptr_name
        .clone()
        .unwrap_or_else(|| format!("{}{}", first_lower(child_table), suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_model::DataType;

    #[test]
    fn forward_pointer_defaults_to_first_lower_parent() {
        let col = Column::new("memberId").with_data_type(DataType::Integer);
        assert_eq!(forward_pointer_name(&col, "Member"), "member");
    }

    #[test]
    fn forward_pointer_honors_override() {
        let mut col = Column::new("authorId").with_data_type(DataType::Integer);
        col.ref_ptr_name = Some("author".into());
        assert_eq!(forward_pointer_name(&col, "Member"), "author");
    }

    #[test]
    fn reverse_collection_defaults_with_suffix() {
        let col = Column::new("memberId").with_data_type(DataType::Integer);
        assert_eq!(reverse_collection_name(&col, "Post", "Vector"), "postVector");
        assert_eq!(reverse_collection_name(&col, "Post", "s"), "posts");
    }

    #[test]
    fn reverse_collection_honors_override() {
        let mut col = Column::new("authorId").with_data_type(DataType::Integer);
        col.reverse_ptr_name = Some("writtenPosts".into());
        assert_eq!(reverse_collection_name(&col, "Post", "Vector"), "writtenPosts");
    }
}
