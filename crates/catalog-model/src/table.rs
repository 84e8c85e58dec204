//! A table definition: an ordered set of columns plus the map-table
//! heuristics used by reference resolution and code generation.

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::naming::camel_to_lower;

fn is_false(b: &bool) -> bool {
    !b
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// A table: its logical name, database name, and ordered columns.
///
/// `is_map` is one of several inputs to [`Table::looks_like_map_table_for`]
/// — setting it explicitly always satisfies that heuristic's shape test,
/// but the heuristic is otherwise a pure function of the table's columns;
/// nothing mutates it automatically.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,

    /// Snapshot of `db_name` as of the last successful emission; empty
    /// means "never emitted". Migration bookkeeping, excluded from
    /// `deep_equals`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub db_name_generated: String,

    #[serde(default)]
    pub columns: Vec<Column>,

    /// Tombstoned columns: removed by the author but retained until the
    /// next Flyway emission writes their `DROP COLUMN` statements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted_columns: Vec<Column>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_map: bool,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub version: u32,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Table {
        Table {
            name: name.into(),
            db_name: None,
            db_name_generated: String::new(),
            columns: Vec::new(),
            deleted_columns: Vec::new(),
            is_map: false,
            version: 0,
        }
    }

    pub fn db_name(&mut self) -> &str {
        if self.db_name.is_none() {
            self.db_name = Some(camel_to_lower(&self.name));
        }
        self.db_name.as_deref().unwrap()
    }

    pub fn db_name_ref(&self) -> String {
        self.db_name
            .clone()
            .unwrap_or_else(|| camel_to_lower(&self.name))
    }

    /// Has this table ever been emitted?
    pub fn is_new(&self) -> bool {
        self.db_name_generated.is_empty()
    }

    /// Appends a new column and returns a mutable reference to it, as
    /// `Table::createColumn` does.
    pub fn create_column(&mut self, name: impl Into<String>) -> &mut Column {
        self.columns.push(Column::new(name));
        self.columns.last_mut().unwrap()
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn find_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn find_primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary_key)
    }

    pub fn find_primary_key_mut(&mut self) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.is_primary_key)
    }

    /// Moves a live column into the tombstone list, as the author deleting
    /// a column in the editor would.
    pub fn delete_column(&mut self, name: &str) -> bool {
        if let Some(idx) = self.columns.iter().position(|c| c.name == name) {
            let column = self.columns.remove(idx);
            self.deleted_columns.push(column);
            true
        } else {
            false
        }
    }

    /// Sorts columns primary-key first, then by logical name.
    pub fn sort_columns(&mut self) {
        self.columns.sort_by(|a, b| {
            b.is_primary_key
                .cmp(&a.is_primary_key)
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    /// All resolved foreign-key columns on this table, in declared order.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_foreign_key())
    }

    /// True if this table looks like a map table linking itself to
    /// `target`: `is_map` is set, or the name ends in `_Map`, or the table
    /// has exactly three columns (one primary key, two foreign keys) — and
    /// at least one resolved foreign key points at `target`'s primary key.
    pub fn looks_like_map_table_for(&self, target: &Table) -> bool {
        let shape_ok = self.is_map || self.name.ends_with("_Map") || {
            let pk_count = self.columns.iter().filter(|c| c.is_primary_key).count();
            let fk_count = self.foreign_keys().count();
            self.columns.len() == 3 && pk_count == 1 && fk_count == 2
        };
        if !shape_ok {
            return false;
        }
        let Some(target_pk) = target.find_primary_key() else {
            return false;
        };
        self.foreign_keys().any(|c| {
            c.references
                .as_ref()
                .is_some_and(|r| r.table == target.name && r.column == target_pk.name)
        })
    }

    /// The foreign key column on this map table that references `target`'s
    /// primary key, mirroring `ourMapTableReference`.
    pub fn our_map_table_reference(&self, target: &Table) -> Option<&Column> {
        if !self.looks_like_map_table_for(target) {
            return None;
        }
        let target_pk = target.find_primary_key()?;
        self.foreign_keys().find(|c| {
            c.references
                .as_ref()
                .is_some_and(|r| r.table == target.name && r.column == target_pk.name)
        })
    }

    /// The first foreign key column, in declared order, on this map table
    /// whose resolved reference is not `target`'s primary key — mirroring
    /// `otherMapTableReference`.
    pub fn other_map_table_reference(&self, target: &Table) -> Option<&Column> {
        if !self.looks_like_map_table_for(target) {
            return None;
        }
        let target_pk = target.find_primary_key()?;
        self.foreign_keys().find(|c| {
            !c.references
                .as_ref()
                .is_some_and(|r| r.table == target.name && r.column == target_pk.name)
        })
    }

    /// Deep structural equality: same column count, each column matched by
    /// name and deep-equal. Mirrors `Table::deepEquals`.
    pub fn deep_equals(&self, other: &Table) -> bool {
        if self.name != other.name || self.columns.len() != other.columns.len() {
            return false;
        }
        self.columns.iter().all(|c| {
            other
                .find_column(&c.name)
                .is_some_and(|oc| c.deep_equals(oc))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::column::ColumnRef;
    use crate::datatype::DataType;

    fn fk(name: &str, target: &str, target_pk: &str) -> Column {
        let mut c = Column::new(name)
            .with_data_type(DataType::Integer)
            .with_nullable(false);
        c.references = Some(ColumnRef {
            table: target.into(),
            column: target_pk.into(),
        });
        c
    }

    #[test]
    fn create_and_find_column() {
        let mut table = Table::new("forumThread");
        table.create_column("id").set_primary_key(true);
        assert!(table.find_column("id").is_some());
        assert!(table.find_primary_key().is_some());
        assert!(table.find_column("nope").is_none());
    }

    #[test]
    fn db_name_generation() {
        let mut table = Table::new("ForumThread");
        assert_eq!(table.db_name(), "forum_thread");
    }

    #[test]
    fn delete_column_tombstones_it() {
        let mut table = Table::new("t");
        table.create_column("obsolete");
        assert!(table.delete_column("obsolete"));
        assert!(table.find_column("obsolete").is_none());
        assert_eq!(table.deleted_columns.len(), 1);
        assert!(!table.delete_column("obsolete"));
    }

    #[test]
    fn sort_columns_puts_primary_key_first_then_alphabetical() {
        let mut table = Table::new("t");
        table.create_column("zeta");
        table.create_column("id").set_primary_key(true);
        table.create_column("alpha");
        table.sort_columns();
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "alpha", "zeta"]);
    }

    #[test]
    fn looks_like_map_table_requires_three_column_shape_and_fk_into_target() {
        let mut role = Table::new("role");
        role.create_column("id").set_primary_key(true);

        let mut user = Table::new("user");
        user.create_column("id").set_primary_key(true);

        let mut map = Table::new("userRole");
        map.create_column("id").set_primary_key(true);
        map.columns.push(fk("userId", "user", "id"));
        map.columns.push(fk("roleId", "role", "id"));

        assert!(map.looks_like_map_table_for(&user));
        assert!(map.looks_like_map_table_for(&role));

        map.create_column("note");
        assert!(!map.looks_like_map_table_for(&user));
    }

    #[test]
    fn is_map_flag_or_name_suffix_satisfies_shape_without_three_columns() {
        let mut user = Table::new("user");
        user.create_column("id").set_primary_key(true);

        let mut map = Table::new("membership_Map");
        map.columns.push(fk("userId", "user", "id"));
        map.columns.push(fk("roleId", "role", "id"));
        assert!(map.looks_like_map_table_for(&user));
    }

    #[test]
    fn map_table_reference_split() {
        let mut user = Table::new("user");
        user.create_column("id").set_primary_key(true);
        let mut role = Table::new("role");
        role.create_column("id").set_primary_key(true);

        let mut map = Table::new("userRole");
        map.create_column("id").set_primary_key(true);
        map.columns.push(fk("userId", "user", "id"));
        map.columns.push(fk("roleId", "role", "id"));

        let ours = map.our_map_table_reference(&user).unwrap();
        assert_eq!(ours.name, "userId");
        let other = map.other_map_table_reference(&user).unwrap();
        assert_eq!(other.name, "roleId");
    }

    #[test]
    fn deep_equals_ignores_column_order() {
        let mut a = Table::new("t");
        a.create_column("id").set_primary_key(true);
        a.create_column("name");

        let mut b = Table::new("t");
        b.create_column("name");
        b.create_column("id").set_primary_key(true);

        assert!(a.deep_equals(&b));
    }
}
