//! A single column definition.

use serde::{Deserialize, Serialize};

use crate::datatype::DataType;
use crate::naming::camel_to_lower;

fn is_false(b: &bool) -> bool {
    !b
}

fn is_true(b: &bool) -> bool {
    *b
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

fn default_true() -> bool {
    true
}

fn default_data_type() -> DataType {
    DataType::VarChar
}

/// One column on a [`crate::Table`].
///
/// A logical (camelCase) name, an optional database-name override, a
/// datatype, length/precision/scale, nullability and key flags, an
/// unresolved reference string, and the `*Generated` snapshot fields the
/// migration differ compares the live values against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,

    /// Snapshot of `db_name` as of the last successful emission; empty
    /// means "never emitted". Migration bookkeeping, excluded from
    /// `deep_equals`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub db_name_generated: String,

    /// Unresolved `table.column` (or bare `table`, meaning "its primary
    /// key") reference string, as written in the model JSON. Kept in sync
    /// with `references` by the reference resolver.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference_str: String,

    #[serde(default = "default_data_type")]
    pub data_type: DataType,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub data_length: u32,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub precision_p: u32,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub precision_s: u32,

    /// Snapshot of the above three, as of the last successful emission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type_generated: Option<DataType>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub data_length_generated: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub precision_p_generated: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub precision_s_generated: u32,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub version: u32,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_primary_key: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub want_index: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub want_finder: bool,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub serialize: bool,

    /// Overrides the default forward entity-pointer field name
    /// (`firstLower(parentTableName)`) when two FKs on the same table
    /// would otherwise collide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_ptr_name: Option<String>,

    /// Overrides the default reverse back-collection field name on the
    /// parent side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_ptr_name: Option<String>,

    /// Resolved reference, filled in by `ref-resolver`. Never round-trips
    /// through JSON directly — `reference_str` is the persisted form.
    #[serde(skip)]
    pub references: Option<ColumnRef>,
}

/// A resolved reference target: which table, and which column (or the
/// table's primary key if the reference string named no column).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Column {
        let name = name.into();
        Column {
            name,
            db_name: None,
            db_name_generated: String::new(),
            reference_str: String::new(),
            data_type: DataType::VarChar,
            data_length: 0,
            precision_p: 0,
            precision_s: 0,
            data_type_generated: None,
            data_length_generated: 0,
            precision_p_generated: 0,
            precision_s_generated: 0,
            version: 0,
            nullable: true,
            is_primary_key: false,
            want_index: false,
            want_finder: false,
            serialize: true,
            ref_ptr_name: None,
            reverse_ptr_name: None,
            references: None,
        }
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_primary_key(mut self, is_primary_key: bool) -> Self {
        self.is_primary_key = is_primary_key;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_reference(mut self, reference_str: impl Into<String>) -> Self {
        self.reference_str = reference_str.into();
        self
    }

    /// `&mut self` equivalents of the `with_*` builders, for chaining off a
    /// reference returned by [`crate::Table::create_column`].
    pub fn set_data_type(&mut self, data_type: DataType) -> &mut Self {
        self.data_type = data_type;
        self
    }

    pub fn set_primary_key(&mut self, is_primary_key: bool) -> &mut Self {
        self.is_primary_key = is_primary_key;
        self
    }

    pub fn set_nullable(&mut self, nullable: bool) -> &mut Self {
        self.nullable = nullable;
        self
    }

    pub fn set_reference(&mut self, reference_str: impl Into<String>) -> &mut Self {
        self.reference_str = reference_str.into();
        self
    }

    pub fn set_want_index(&mut self, want_index: bool) -> &mut Self {
        self.want_index = want_index;
        self
    }

    pub fn set_want_finder(&mut self, want_finder: bool) -> &mut Self {
        self.want_finder = want_finder;
        self
    }

    pub fn set_data_length(&mut self, length: u32) -> &mut Self {
        self.data_length = length;
        self
    }

    pub fn set_precision(&mut self, p: u32, s: u32) -> &mut Self {
        self.precision_p = p;
        self.precision_s = s;
        self
    }

    /// The database column name: the explicit override if set, else the
    /// logical name run through [`camel_to_lower`], generating and
    /// remembering it the first time it's asked for.
    pub fn db_name(&mut self) -> &str {
        if self.db_name.is_none() {
            self.db_name = Some(camel_to_lower(&self.name));
        }
        self.db_name.as_deref().unwrap()
    }

    /// Same as [`Column::db_name`] but does not mutate the column, for
    /// contexts that only hold a shared reference.
    pub fn db_name_ref(&self) -> String {
        self.db_name
            .clone()
            .unwrap_or_else(|| camel_to_lower(&self.name))
    }

    pub fn is_string(&self) -> bool {
        self.data_type.is_string()
    }

    pub fn is_temporal(&self) -> bool {
        self.data_type.is_temporal()
    }

    pub fn is_foreign_key(&self) -> bool {
        self.references.is_some()
    }

    /// Has this column ever been emitted?
    pub fn is_new(&self) -> bool {
        self.db_name_generated.is_empty()
    }

    /// Does the live datatype/length/precision/scale differ from the
    /// `*_generated` snapshot?
    pub fn type_changed_since_generation(&self) -> bool {
        self.data_type_generated.is_some_and(|dt| dt != self.data_type)
            || self.data_length_generated != self.data_length
            || self.precision_p_generated != self.precision_p
            || self.precision_s_generated != self.precision_s
    }

    /// `table.column`, or `table.db_column` if `use_db_name` is set —
    /// mirrors `Column::fullName(bool)`, used when emitting
    /// `REFERENCES parent(col)` clauses.
    pub fn full_name(&self, table: &str, use_db_name: bool) -> String {
        let col = if use_db_name {
            self.db_name_ref()
        } else {
            self.name.clone()
        };
        format!("{table}.{col}")
    }

    /// `(p, s)` or `(p)`, or empty if this datatype carries no precision —
    /// mirrors `Column::precisionStr`.
    pub fn precision_str(&self) -> String {
        if !self.data_type.has_precision() || self.precision_p == 0 {
            return String::new();
        }
        if self.precision_s == 0 {
            format!("({})", self.precision_p)
        } else {
            format!("({}, {})", self.precision_p, self.precision_s)
        }
    }

    /// Snapshots the live name/type/length/precision into the `*_generated`
    /// fields, as the post-emission stamping step of the migration differ
    /// does for every column it touched.
    pub fn stamp_generated(&mut self) {
        self.db_name_generated = self.db_name_ref();
        self.data_type_generated = Some(self.data_type);
        self.data_length_generated = self.data_length;
        self.precision_p_generated = self.precision_p;
        self.precision_s_generated = self.precision_s;
    }

    /// Deep structural equality, ignoring the `*_generated` snapshot and
    /// resolved-reference fields, matching `Column::deepEquals`'s intent of
    /// detecting author-visible changes only.
    pub fn deep_equals(&self, other: &Column) -> bool {
        self.name == other.name
            && self.db_name == other.db_name
            && self.reference_str == other.reference_str
            && self.data_type == other.data_type
            && self.data_length == other.data_length
            && self.precision_p == other.precision_p
            && self.precision_s == other.precision_s
            && self.nullable == other.nullable
            && self.is_primary_key == other.is_primary_key
            && self.want_index == other.want_index
            && self.want_finder == other.want_finder
            && self.serialize == other.serialize
    }
}
